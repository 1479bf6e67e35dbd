use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::{DanceClassDto, LocationDto, LocationStats};
use crate::services::location_search::{LocationFilter, NearbyLocationsParams};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/locations", get(list_locations))
        .route("/locations/nearby", get(locations_nearby))
        .route("/locations/{id}", get(get_location))
        .route("/locations/{id}/classes", get(location_classes))
        .route("/locations/{id}/stats", get(location_stats))
}

async fn list_locations(
    State(state): State<AppState>,
    Query(filter): Query<LocationFilter>,
) -> AppResult<Json<Vec<LocationDto>>> {
    Ok(Json(state.location_search.get_locations(&filter).await?))
}

async fn locations_nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyLocationsParams>,
) -> AppResult<Json<Vec<LocationDto>>> {
    Ok(Json(
        state.location_search.get_locations_nearby(&params).await?,
    ))
}

async fn get_location(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LocationDto>> {
    Ok(Json(state.location_search.get_location(&id).await?))
}

#[derive(Debug, Default, Deserialize)]
struct LocationClassesParams {
    #[serde(default)]
    include_past: bool,
}

async fn location_classes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<LocationClassesParams>,
) -> AppResult<Json<Vec<DanceClassDto>>> {
    Ok(Json(
        state
            .class_search
            .get_classes_by_location(&id, params.include_past)
            .await?,
    ))
}

async fn location_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<LocationStats>> {
    Ok(Json(state.location_search.get_location_stats(&id).await?))
}

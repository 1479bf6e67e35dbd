use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::SpecialEventDto;
use crate::services::event_search::{EventFilter, NearbyEventsParams};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/nearby", get(events_nearby))
        .route("/events/{id}", get(get_event))
}

async fn list_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> AppResult<Json<Vec<SpecialEventDto>>> {
    Ok(Json(state.event_search.get_events(&filter).await?))
}

async fn events_nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyEventsParams>,
) -> AppResult<Json<Vec<SpecialEventDto>>> {
    Ok(Json(state.event_search.get_events_near(&params).await?))
}

async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<SpecialEventDto>> {
    Ok(Json(state.event_search.get_event(&id).await?))
}

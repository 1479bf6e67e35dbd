use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::{DanceClassDto, InstructorPublic, InstructorStats};
use crate::services::instructor_search::InstructorFilter;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/instructors", get(list_instructors))
        .route("/instructors/{id}", get(get_instructor))
        .route("/instructors/{id}/classes", get(instructor_classes))
        .route("/instructors/{id}/stats", get(instructor_stats))
}

async fn list_instructors(
    State(state): State<AppState>,
    Query(filter): Query<InstructorFilter>,
) -> AppResult<Json<Vec<InstructorPublic>>> {
    Ok(Json(
        state.instructor_search.get_instructors(&filter).await?,
    ))
}

async fn get_instructor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<InstructorPublic>> {
    Ok(Json(state.instructor_search.get_instructor(&id).await?))
}

#[derive(Debug, Default, Deserialize)]
struct InstructorClassesParams {
    #[serde(default)]
    include_past: bool,
}

async fn instructor_classes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<InstructorClassesParams>,
) -> AppResult<Json<Vec<DanceClassDto>>> {
    Ok(Json(
        state
            .class_search
            .get_classes_by_instructor(&id, params.include_past)
            .await?,
    ))
}

async fn instructor_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<InstructorStats>> {
    // 404 for unknown instructors, stats otherwise.
    state.instructor_search.get_instructor(&id).await?;
    Ok(Json(state.review_stats.instructor_stats(&id).await?))
}

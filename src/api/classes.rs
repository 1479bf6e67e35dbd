use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::{
    ClassReviewStats, DanceClassDto, RecurringSchedule, ReviewCreatePayload, ReviewPage,
    ReviewResponse, SpecialSchedule,
};
use crate::services::class_search::{ClassFilter, NearbyClassesParams};
use crate::services::review_manager::ReviewListParams;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/classes", get(list_classes))
        .route("/classes/nearby", get(classes_nearby))
        .route("/classes/{id}", get(get_class))
        .route("/classes/{id}/schedule", get(class_schedule))
        .route("/classes/{id}/special-schedules", get(class_special_schedules))
        .route("/classes/{id}/stats", get(class_stats))
        .route(
            "/classes/{id}/reviews",
            get(list_class_reviews).post(create_class_review),
        )
}

async fn list_classes(
    State(state): State<AppState>,
    Query(filter): Query<ClassFilter>,
) -> AppResult<Json<Vec<DanceClassDto>>> {
    Ok(Json(state.class_search.get_classes(&filter).await?))
}

async fn classes_nearby(
    State(state): State<AppState>,
    Query(params): Query<NearbyClassesParams>,
) -> AppResult<Json<Vec<DanceClassDto>>> {
    Ok(Json(state.class_search.get_classes_near(&params).await?))
}

async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DanceClassDto>> {
    Ok(Json(state.class_search.get_class(&id).await?))
}

async fn class_schedule(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<RecurringSchedule>>> {
    Ok(Json(state.class_search.get_recurring_schedules(&id).await?))
}

async fn class_special_schedules(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Vec<SpecialSchedule>>> {
    Ok(Json(state.class_search.get_special_schedules(&id).await?))
}

async fn class_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ClassReviewStats>> {
    Ok(Json(state.review_stats.class_stats(&id).await?))
}

async fn list_class_reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ReviewListParams>,
) -> AppResult<Json<ReviewPage>> {
    Ok(Json(
        state
            .review_manager
            .get_class_reviews_paginated(&id, &params)
            .await?,
    ))
}

async fn create_class_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReviewCreatePayload>,
) -> AppResult<(StatusCode, Json<ReviewResponse>)> {
    let review = state.review_manager.create_review(&id, &payload).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

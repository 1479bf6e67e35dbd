use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::app_state::AppState;
use crate::error::AppResult;
use crate::models::{ReviewVerification, VerifyReviewPayload};

pub fn router() -> Router<AppState> {
    Router::new().route("/reviews/{id}/verify", post(verify_review))
}

async fn verify_review(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<VerifyReviewPayload>,
) -> AppResult<(StatusCode, Json<ReviewVerification>)> {
    let verification = state.review_manager.verify_review(&id, &payload).await?;
    Ok((StatusCode::CREATED, Json(verification)))
}

// Public HTTP surface. Routers are split per resource; handlers stay thin
// and delegate to the service layer.

pub mod classes;
pub mod events;
pub mod instructors;
pub mod locations;
pub mod metadata;
pub mod reviews;

use axum::{routing::get, Json, Router};

use crate::app_state::AppState;
use crate::error::AppResult;

pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .merge(classes::router())
        .merge(locations::router())
        .merge(instructors::router())
        .merge(events::router())
        .merge(reviews::router())
        .merge(metadata::router())
        .route("/health", get(health));

    Router::new().nest("/api/public", public).with_state(state)
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> AppResult<Json<serde_json::Value>> {
    state.db.health_check().await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

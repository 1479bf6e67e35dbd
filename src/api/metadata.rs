// Metadata endpoints: the controlled vocabularies and scale descriptors a
// client needs to render search filters and the review form.

use axum::{extract::State, routing::get, Json, Router};
use serde_json::json;
use sqlx::Row;

use crate::app_state::AppState;
use crate::core::{
    DanceStyle, Facility, SkillLevel, SportsCard, Temperature, VerificationMethod,
    WaitingAreaKind, COMMENT_MAX_CHARS, COMMENT_MIN_CHARS, RATING_MAX, RATING_MIN, SLIDER_MAX,
    SLIDER_MIN,
};
use crate::error::{AppError, AppResult};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/metadata", get(metadata))
        .route("/reviews/metadata", get(review_metadata))
}

async fn metadata(State(_state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    Ok(Json(json!({
        "dance_styles": as_strings(&DanceStyle::ALL.map(|v| v.as_str())),
        "skill_levels": as_strings(&SkillLevel::ALL.map(|v| v.as_str())),
        "facilities": as_strings(&Facility::ALL.map(|v| v.as_str())),
        "sports_cards": as_strings(&SportsCard::ALL.map(|v| v.as_str())),
    })))
}

async fn review_metadata(State(state): State<AppState>) -> AppResult<Json<serde_json::Value>> {
    // Genres are an open vocabulary; report what reviewers have used so far.
    let rows = sqlx::query("SELECT DISTINCT genre FROM music_review_genres ORDER BY genre")
        .fetch_all(state.db.pool())
        .await
        .map_err(|e| AppError::Database(format!("failed to load genres: {}", e)))?;
    let genres: Vec<String> = rows.iter().map(|row| row.get("genre")).collect();

    Ok(Json(json!({
        "temperatures": as_strings(&Temperature::ALL.map(|v| v.as_str())),
        "waiting_area_types": as_strings(&WaitingAreaKind::ALL.map(|v| v.as_str())),
        "verification_methods": as_strings(&VerificationMethod::ALL.map(|v| v.as_str())),
        "sports_cards": as_strings(&SportsCard::ALL.map(|v| v.as_str())),
        "genres": genres,
        "rating_scale": { "min": RATING_MIN, "max": RATING_MAX },
        "slider_scale": { "min": SLIDER_MIN, "max": SLIDER_MAX },
        "comment_length": { "min": COMMENT_MIN_CHARS, "max": COMMENT_MAX_CHARS },
    })))
}

fn as_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// Service layer. Each service owns a cheap clone of the database handle and
// exposes the operations the public API is built from.

pub mod class_manager;
pub mod class_search;
pub mod event_search;
pub mod geo;
pub mod instructor_search;
pub mod location_search;
pub mod review_manager;
pub mod review_stats;

use sqlx::Row;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::InstructorPublic;

/// Loads an instructor's public profile with its review aggregates. Returns
/// None when the user is missing or does not hold the instructor role.
pub(crate) async fn instructor_public(
    db: &Database,
    instructor_id: &str,
) -> AppResult<Option<InstructorPublic>> {
    let row = sqlx::query(
        "SELECT u.id, u.first_name, u.last_name, u.bio, u.profile_picture_url,
                (SELECT COUNT(*) FROM dance_classes c
                  WHERE c.instructor_id = u.id AND c.is_active = 1) AS classes_count,
                (SELECT COUNT(*) FROM reviews r
                  JOIN dance_classes c ON c.id = r.class_id
                  WHERE c.instructor_id = u.id) AS reviews_count,
                (SELECT AVG(r.overall_rating) FROM reviews r
                  JOIN dance_classes c ON c.id = r.class_id
                  WHERE c.instructor_id = u.id) AS avg_rating
         FROM users u
         WHERE u.id = ? AND u.role = 'instructor'",
    )
    .bind(instructor_id)
    .fetch_optional(db.pool())
    .await
    .map_err(|e| AppError::Database(format!("failed to load instructor profile: {}", e)))?;

    Ok(row.map(|row| InstructorPublic {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        bio: row.get("bio"),
        profile_picture_url: row.get("profile_picture_url"),
        classes_count: row.get("classes_count"),
        reviews_count: row.get("reviews_count"),
        avg_rating: row.get("avg_rating"),
    }))
}

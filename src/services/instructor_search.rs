// Public instructor listings with review aggregates.

use serde::Deserialize;
use sqlx::Row;

use crate::core::{DanceStyle, InstructorSortKey};
use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::InstructorPublic;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InstructorFilter {
    /// Instructors with no reviewed classes are excluded when set.
    pub min_rating: Option<f64>,
    /// At least one active class in this style.
    pub style: Option<DanceStyle>,
    #[serde(default)]
    pub sort_by: Option<InstructorSortKey>,
}

#[derive(Clone)]
pub struct InstructorSearchService {
    db: Database,
}

impl InstructorSearchService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get_instructors(
        &self,
        filter: &InstructorFilter,
    ) -> AppResult<Vec<InstructorPublic>> {
        let mut sql = String::from(
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
             WHERE u.role = 'instructor'",
        );

        if filter.style.is_some() {
            sql.push_str(
                " AND EXISTS (SELECT 1 FROM dance_classes c
                   WHERE c.instructor_id = u.id AND c.is_active = 1 AND c.style = ?)",
            );
        }
        if filter.min_rating.is_some() {
            sql.push_str(
                " AND (SELECT AVG(r.overall_rating) FROM reviews r
                   JOIN dance_classes c ON c.id = r.class_id
                   WHERE c.instructor_id = u.id) >= ?",
            );
        }

        sql.push_str(match filter.sort_by.unwrap_or_default() {
            InstructorSortKey::RatingDesc => " ORDER BY avg_rating DESC, u.id ASC",
            InstructorSortKey::ClassesCountDesc => " ORDER BY classes_count DESC, u.id ASC",
            InstructorSortKey::Default => {
                " ORDER BY avg_rating DESC, classes_count DESC, u.id ASC"
            }
        });

        let mut query = sqlx::query(&sql);
        if let Some(style) = filter.style {
            query = query.bind(style.as_str());
        }
        if let Some(min_rating) = filter.min_rating {
            query = query.bind(min_rating);
        }

        let rows = query
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("instructor search failed: {}", e)))?;

        Ok(rows
            .into_iter()
            .map(|row| InstructorPublic {
                id: row.get("id"),
                first_name: row.get("first_name"),
                last_name: row.get("last_name"),
                bio: row.get("bio"),
                profile_picture_url: row.get("profile_picture_url"),
                classes_count: row.get("classes_count"),
                reviews_count: row.get("reviews_count"),
                avg_rating: row.get("avg_rating"),
            })
            .collect())
    }

    pub async fn get_instructor(&self, id: &str) -> AppResult<InstructorPublic> {
        super::instructor_public(&self.db, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("instructor {} not found", id)))
    }
}

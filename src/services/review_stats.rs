// Review statistics. Everything here is recomputed per request; facets with
// no reviews in scope report 0.0 rather than null.

use sqlx::Row;
use std::collections::BTreeMap;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{
    ClassReviewStats, EnvironmentStats, FacilitiesStats, InstructorStats, LocationStats,
    MusicStats, TeachingStats,
};

#[derive(Clone)]
pub struct ReviewStatsService {
    db: Database,
}

impl ReviewStatsService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Average overall rating for one class, None when it has no reviews.
    /// Used by the search engines' min-rating filter and by DTOs.
    pub async fn class_average_rating(&self, class_id: &str) -> AppResult<Option<f64>> {
        let row = sqlx::query("SELECT AVG(overall_rating) AS avg_rating FROM reviews WHERE class_id = ?")
            .bind(class_id)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("failed to compute average rating: {}", e)))?;
        Ok(row.get("avg_rating"))
    }

    pub async fn class_stats(&self, class_id: &str) -> AppResult<ClassReviewStats> {
        if self.db.get_class(class_id).await?.is_none() {
            return Err(AppError::NotFound(format!("class {} not found", class_id)));
        }

        let pool = self.db.pool();

        let head = sqlx::query(
            "SELECT COUNT(*) AS total,
                    COALESCE(SUM(is_verified), 0) AS verified,
                    COALESCE(AVG(overall_rating), 0.0) AS average_rating
             FROM reviews WHERE class_id = ?",
        )
        .bind(class_id)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::Database(format!("failed to compute review totals: {}", e)))?;

        let mut stats = ClassReviewStats {
            total_reviews: head.get("total"),
            verified_reviews: head.get("verified"),
            average_rating: head.get("average_rating"),
            ..Default::default()
        };

        let rows = sqlx::query(
            "SELECT overall_rating, COUNT(*) AS n FROM reviews
             WHERE class_id = ? GROUP BY overall_rating",
        )
        .bind(class_id)
        .fetch_all(pool)
        .await
        .map_err(|e| AppError::Database(format!("failed to compute rating distribution: {}", e)))?;
        for row in rows {
            stats
                .rating_distribution
                .insert(row.get("overall_rating"), row.get("n"));
        }

        stats.teaching = self.teaching_stats_where("r.class_id = ?", class_id).await?;

        let env = sqlx::query(
            "SELECT COALESCE(AVG(e.floor_quality), 0.0) AS floor_quality,
                    COALESCE(AVG(e.crowdedness), 0.0) AS crowdedness,
                    COALESCE(AVG(e.ventilation), 0.0) AS ventilation
             FROM environment_reviews e
             JOIN reviews r ON r.id = e.review_id
             WHERE r.class_id = ?",
        )
        .bind(class_id)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::Database(format!("failed to compute environment stats: {}", e)))?;
        stats.environment = EnvironmentStats {
            avg_floor_quality: env.get("floor_quality"),
            avg_crowdedness: env.get("crowdedness"),
            avg_ventilation: env.get("ventilation"),
            temperature_distribution: self
                .distribution(
                    "SELECT e.temperature AS k, COUNT(*) AS n
                     FROM environment_reviews e
                     JOIN reviews r ON r.id = e.review_id
                     WHERE r.class_id = ? GROUP BY e.temperature",
                    class_id,
                )
                .await?,
        };

        let music = sqlx::query(
            "SELECT COALESCE(AVG(m.volume_level), 0.0) AS volume_level,
                    COALESCE(AVG(m.style), 0.0) AS style
             FROM music_reviews m
             JOIN reviews r ON r.id = m.review_id
             WHERE r.class_id = ?",
        )
        .bind(class_id)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::Database(format!("failed to compute music stats: {}", e)))?;
        stats.music = MusicStats {
            avg_volume_level: music.get("volume_level"),
            avg_style: music.get("style"),
            genre_distribution: self
                .distribution(
                    "SELECT g.genre AS k, COUNT(*) AS n
                     FROM music_review_genres g
                     JOIN reviews r ON r.id = g.review_id
                     WHERE r.class_id = ? GROUP BY g.genre",
                    class_id,
                )
                .await?,
        };

        let fac = sqlx::query(
            "SELECT COALESCE(SUM(f.has_changing_room), 0) AS changing_rooms,
                    COALESCE(AVG(CASE WHEN f.has_changing_room = 1
                                      THEN f.changing_room_quality END), 0.0) AS changing_room_quality,
                    COALESCE(SUM(f.has_waiting_area), 0) AS waiting_areas,
                    COALESCE(SUM(COALESCE(f.waiting_area_seating, 0)), 0) AS seating
             FROM facilities_reviews f
             JOIN reviews r ON r.id = f.review_id
             WHERE r.class_id = ?",
        )
        .bind(class_id)
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::Database(format!("failed to compute facilities stats: {}", e)))?;
        stats.facilities = FacilitiesStats {
            changing_room_available: fac.get("changing_rooms"),
            avg_changing_room_quality: fac.get("changing_room_quality"),
            waiting_area_available: fac.get("waiting_areas"),
            seating_available: fac.get("seating"),
            accepted_cards_distribution: self
                .distribution(
                    "SELECT fc.sports_card AS k, COUNT(*) AS n
                     FROM facilities_review_cards fc
                     JOIN reviews r ON r.id = fc.review_id
                     WHERE r.class_id = ? GROUP BY fc.sports_card",
                    class_id,
                )
                .await?,
        };

        Ok(stats)
    }

    /// Aggregates over every review of the instructor's classes.
    pub async fn instructor_stats(&self, instructor_id: &str) -> AppResult<InstructorStats> {
        let head = sqlx::query(
            "SELECT COUNT(*) AS total,
                    COALESCE(AVG(r.overall_rating), 0.0) AS average_rating
             FROM reviews r
             JOIN dance_classes c ON c.id = r.class_id
             WHERE c.instructor_id = ?",
        )
        .bind(instructor_id)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| AppError::Database(format!("failed to compute instructor stats: {}", e)))?;

        Ok(InstructorStats {
            total_reviews: head.get("total"),
            average_rating: head.get("average_rating"),
            teaching: self
                .teaching_stats_where(
                    "r.class_id IN (SELECT id FROM dance_classes WHERE instructor_id = ?)",
                    instructor_id,
                )
                .await?,
        })
    }

    /// Review count and average rating over the classes held at a location.
    pub async fn location_stats(&self, location_id: &str) -> AppResult<LocationStats> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total,
                    COALESCE(AVG(r.overall_rating), 0.0) AS average_rating
             FROM reviews r
             JOIN dance_classes c ON c.id = r.class_id
             WHERE c.location_id = ?",
        )
        .bind(location_id)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| AppError::Database(format!("failed to compute location stats: {}", e)))?;

        Ok(LocationStats {
            total_reviews: row.get("total"),
            average_rating: row.get("average_rating"),
        })
    }

    async fn teaching_stats_where(&self, review_cond: &str, bind: &str) -> AppResult<TeachingStats> {
        let sql = format!(
            "SELECT COALESCE(AVG(t.teaching_style), 0.0) AS teaching_style,
                    COALESCE(AVG(t.feedback_approach), 0.0) AS feedback_approach,
                    COALESCE(AVG(t.pace_of_teaching), 0.0) AS pace_of_teaching,
                    COALESCE(AVG(t.breakdown_quality), 0.0) AS breakdown_quality
             FROM teaching_reviews t
             JOIN reviews r ON r.id = t.review_id
             WHERE {}",
            review_cond
        );
        let row = sqlx::query(&sql)
            .bind(bind)
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("failed to compute teaching stats: {}", e)))?;

        Ok(TeachingStats {
            avg_teaching_style: row.get("teaching_style"),
            avg_feedback_approach: row.get("feedback_approach"),
            avg_pace_of_teaching: row.get("pace_of_teaching"),
            avg_breakdown_quality: row.get("breakdown_quality"),
        })
    }

    async fn distribution(&self, sql: &str, bind: &str) -> AppResult<BTreeMap<String, i64>> {
        let rows = sqlx::query(sql)
            .bind(bind)
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("failed to compute distribution: {}", e)))?;
        Ok(rows
            .into_iter()
            .map(|row| (row.get("k"), row.get("n")))
            .collect())
    }
}

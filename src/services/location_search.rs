// Location search: filtered listings, proximity search and per-location
// review aggregates. Volumes are a few hundred venues at most, so the
// narrowing filters run over fetched rows instead of one large query.

use serde::Deserialize;
use sqlx::Row;

use crate::core::{DanceStyle, Facility, SkillLevel, SportsCard};
use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{Location, LocationDto, LocationStats};
use crate::services::geo;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationFilter {
    pub has_active_classes: Option<bool>,
    pub dance_style: Option<DanceStyle>,
    pub level: Option<SkillLevel>,
    /// At least this many active classes after style/level narrowing.
    pub min_classes: Option<i64>,
    /// Average over reviews of classes held at the location; venues with no
    /// reviewed classes are excluded when set.
    pub min_rating: Option<f64>,
    pub facility: Option<Facility>,
    pub sports_card: Option<SportsCard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearbyLocationsParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

#[derive(Clone)]
pub struct LocationSearchService {
    db: Database,
}

impl LocationSearchService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get_locations(&self, filter: &LocationFilter) -> AppResult<Vec<LocationDto>> {
        let rows = sqlx::query("SELECT * FROM locations ORDER BY name ASC, id ASC")
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("location search failed: {}", e)))?;

        let mut dtos = Vec::new();
        for row in &rows {
            let mut location = Location::from_row(row)?;
            self.db.attach_location_memberships(&mut location).await?;

            if let Some(facility) = filter.facility {
                if !location.facilities.contains(&facility) {
                    continue;
                }
            }
            if let Some(card) = filter.sports_card {
                if !location.sports_cards.contains(&card) {
                    continue;
                }
            }

            let classes_count = self
                .active_classes_count(&location.id, filter.dance_style, filter.level)
                .await?;
            if let Some(true) = filter.has_active_classes {
                if classes_count == 0 {
                    continue;
                }
            }
            if let Some(false) = filter.has_active_classes {
                if classes_count > 0 {
                    continue;
                }
            }
            if let Some(min_classes) = filter.min_classes {
                if classes_count < min_classes {
                    continue;
                }
            }

            let avg_rating = self.average_rating(&location.id).await?;
            if let Some(min_rating) = filter.min_rating {
                match avg_rating {
                    Some(avg) if avg >= min_rating => {}
                    _ => continue,
                }
            }

            dtos.push(LocationDto {
                location,
                classes_count,
                avg_rating,
                distance_km: None,
            });
        }
        Ok(dtos)
    }

    pub async fn get_location(&self, id: &str) -> AppResult<LocationDto> {
        let location = self
            .db
            .get_location(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("location {} not found", id)))?;
        let classes_count = self.active_classes_count(&location.id, None, None).await?;
        let avg_rating = self.average_rating(&location.id).await?;
        Ok(LocationDto {
            location,
            classes_count,
            avg_rating,
            distance_km: None,
        })
    }

    /// Geocoded locations within `radius_km` of a point, closest first.
    pub async fn get_locations_nearby(
        &self,
        params: &NearbyLocationsParams,
    ) -> AppResult<Vec<LocationDto>> {
        let rows = sqlx::query(
            "SELECT * FROM locations
             WHERE latitude IS NOT NULL AND longitude IS NOT NULL
             ORDER BY id ASC",
        )
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| AppError::Database(format!("nearby location search failed: {}", e)))?;

        let mut hits = Vec::new();
        for row in &rows {
            let location = Location::from_row(row)?;
            let (lat, lon) = match (location.latitude, location.longitude) {
                (Some(lat), Some(lon)) => (lat, lon),
                _ => continue,
            };
            let distance = geo::distance_km(params.latitude, params.longitude, lat, lon);
            if distance <= params.radius_km {
                hits.push((distance, location));
            }
        }
        hits.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.id.cmp(&b.1.id))
        });

        let mut dtos = Vec::with_capacity(hits.len());
        for (distance, mut location) in hits {
            self.db.attach_location_memberships(&mut location).await?;
            let classes_count = self.active_classes_count(&location.id, None, None).await?;
            let avg_rating = self.average_rating(&location.id).await?;
            dtos.push(LocationDto {
                location,
                classes_count,
                avg_rating,
                distance_km: Some(distance),
            });
        }
        Ok(dtos)
    }

    pub async fn get_location_stats(&self, id: &str) -> AppResult<LocationStats> {
        if self.db.get_location(id).await?.is_none() {
            return Err(AppError::NotFound(format!("location {} not found", id)));
        }
        let row = sqlx::query(
            "SELECT COUNT(*) AS total,
                    COALESCE(AVG(r.overall_rating), 0.0) AS average_rating
             FROM reviews r
             JOIN dance_classes c ON c.id = r.class_id
             WHERE c.location_id = ?",
        )
        .bind(id)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| AppError::Database(format!("failed to compute location stats: {}", e)))?;

        Ok(LocationStats {
            total_reviews: row.get("total"),
            average_rating: row.get("average_rating"),
        })
    }

    async fn active_classes_count(
        &self,
        location_id: &str,
        style: Option<DanceStyle>,
        level: Option<SkillLevel>,
    ) -> AppResult<i64> {
        let mut sql = String::from(
            "SELECT COUNT(*) AS n FROM dance_classes
             WHERE location_id = ? AND is_active = 1",
        );
        if style.is_some() {
            sql.push_str(" AND style = ?");
        }
        if level.is_some() {
            sql.push_str(" AND level = ?");
        }

        let mut query = sqlx::query(&sql).bind(location_id);
        if let Some(style) = style {
            query = query.bind(style.as_str());
        }
        if let Some(level) = level {
            query = query.bind(level.as_str());
        }

        let row = query
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("failed to count classes: {}", e)))?;
        Ok(row.get("n"))
    }

    async fn average_rating(&self, location_id: &str) -> AppResult<Option<f64>> {
        let row = sqlx::query(
            "SELECT AVG(r.overall_rating) AS avg_rating
             FROM reviews r
             JOIN dance_classes c ON c.id = r.class_id
             WHERE c.location_id = ?",
        )
        .bind(location_id)
        .fetch_one(self.db.pool())
        .await
        .map_err(|e| AppError::Database(format!("failed to compute rating: {}", e)))?;
        Ok(row.get("avg_rating"))
    }
}

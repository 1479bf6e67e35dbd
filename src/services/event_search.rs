// Special event search: one-off workshops and parties tied to a location
// and an instructor.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::Row;

use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{SpecialEvent, SpecialEventDto};
use crate::services::geo;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub location_id: Option<String>,
    pub instructor_id: Option<String>,
    /// Date window applied to the event start.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearbyEventsParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub limit: Option<i64>,
}

#[derive(Clone)]
pub struct EventSearchService {
    db: Database,
}

impl EventSearchService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get_events(&self, filter: &EventFilter) -> AppResult<Vec<SpecialEventDto>> {
        let mut sql = String::from("SELECT * FROM special_events WHERE 1 = 1");
        if filter.location_id.is_some() {
            sql.push_str(" AND location_id = ?");
        }
        if filter.instructor_id.is_some() {
            sql.push_str(" AND instructor_id = ?");
        }
        if filter.start_date.is_some() {
            sql.push_str(" AND date(starts_at) >= ?");
        }
        if filter.end_date.is_some() {
            sql.push_str(" AND date(starts_at) <= ?");
        }
        sql.push_str(" ORDER BY starts_at ASC, id ASC");
        if filter.limit.is_some() {
            sql.push_str(" LIMIT ?");
        }

        let mut query = sqlx::query(&sql);
        if let Some(v) = &filter.location_id {
            query = query.bind(v);
        }
        if let Some(v) = &filter.instructor_id {
            query = query.bind(v);
        }
        if let Some(v) = filter.start_date {
            query = query.bind(v);
        }
        if let Some(v) = filter.end_date {
            query = query.bind(v);
        }
        if let Some(v) = filter.limit {
            query = query.bind(v.max(0));
        }

        let rows = query
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("event search failed: {}", e)))?;

        let mut dtos = Vec::with_capacity(rows.len());
        for row in &rows {
            let event = SpecialEvent::from_row(row)?;
            dtos.push(self.to_dto(event, None).await?);
        }
        Ok(dtos)
    }

    pub async fn get_event(&self, id: &str) -> AppResult<SpecialEventDto> {
        let row = sqlx::query("SELECT * FROM special_events WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("failed to get event {}: {}", id, e)))?;
        let event = row
            .as_ref()
            .map(SpecialEvent::from_row)
            .transpose()?
            .ok_or_else(|| AppError::NotFound(format!("event {} not found", id)))?;
        self.to_dto(event, None).await
    }

    /// Events at geocoded venues within `radius_km` of a point, closest first.
    pub async fn get_events_near(
        &self,
        params: &NearbyEventsParams,
    ) -> AppResult<Vec<SpecialEventDto>> {
        let rows = sqlx::query(
            "SELECT e.*, l.latitude AS loc_lat, l.longitude AS loc_lon
             FROM special_events e
             JOIN locations l ON l.id = e.location_id
             WHERE l.latitude IS NOT NULL AND l.longitude IS NOT NULL",
        )
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| AppError::Database(format!("nearby event search failed: {}", e)))?;

        let mut hits = Vec::new();
        for row in &rows {
            let lat: f64 = row.get("loc_lat");
            let lon: f64 = row.get("loc_lon");
            let distance = geo::distance_km(params.latitude, params.longitude, lat, lon);
            if distance <= params.radius_km {
                hits.push((distance, SpecialEvent::from_row(row)?));
            }
        }
        hits.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.1.id.cmp(&b.1.id))
        });
        if let Some(limit) = params.limit {
            hits.truncate(limit.max(0) as usize);
        }

        let mut dtos = Vec::with_capacity(hits.len());
        for (distance, event) in hits {
            dtos.push(self.to_dto(event, Some(distance)).await?);
        }
        Ok(dtos)
    }

    async fn to_dto(
        &self,
        event: SpecialEvent,
        distance_km: Option<f64>,
    ) -> AppResult<SpecialEventDto> {
        let location = self.db.get_location(&event.location_id).await?;
        let instructor = super::instructor_public(&self.db, &event.instructor_id).await?;
        Ok(SpecialEventDto {
            event,
            location,
            instructor,
            distance_km,
        })
    }
}

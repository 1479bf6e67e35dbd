// Class search engine: filtered listings, proximity search and schedule
// lookups. Filters are conjunctive; every ordering ends with the id column
// so pages are deterministic.

use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use sqlx::Row;

use crate::core::{ClassSortKey, DanceStyle, SkillLevel};
use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{DanceClass, DanceClassDto, RecurringSchedule, SpecialSchedule};
use crate::services::geo;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassFilter {
    pub instructor_id: Option<String>,
    pub location_id: Option<String>,
    pub style: Option<DanceStyle>,
    pub level: Option<SkillLevel>,
    /// Together with `end_date` selects classes whose run overlaps the window.
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Classes with no reviews are excluded when set.
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub sort_by: Option<ClassSortKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NearbyClassesParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<i64>,
}

const AVG_RATING_SUBQUERY: &str =
    "(SELECT AVG(r.overall_rating) FROM reviews r WHERE r.class_id = c.id)";

#[derive(Clone)]
pub struct ClassSearchService {
    db: Database,
}

impl ClassSearchService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn get_classes(&self, filter: &ClassFilter) -> AppResult<Vec<DanceClassDto>> {
        let mut sql = format!(
            "SELECT c.*, {} AS avg_rating FROM dance_classes c WHERE c.is_active = 1",
            AVG_RATING_SUBQUERY
        );

        if filter.instructor_id.is_some() {
            sql.push_str(" AND c.instructor_id = ?");
        }
        if filter.location_id.is_some() {
            sql.push_str(" AND c.location_id = ?");
        }
        if filter.style.is_some() {
            sql.push_str(" AND c.style = ?");
        }
        if filter.level.is_some() {
            sql.push_str(" AND c.level = ?");
        }
        if filter.start_date.is_some() {
            sql.push_str(" AND c.end_date >= ?");
        }
        if filter.end_date.is_some() {
            sql.push_str(" AND c.start_date <= ?");
        }
        if filter.min_rating.is_some() {
            // NULL averages fail the comparison, so review-less classes drop out.
            sql.push_str(&format!(" AND {} >= ?", AVG_RATING_SUBQUERY));
        }

        sql.push_str(match filter.sort_by.unwrap_or_default() {
            ClassSortKey::RatingDesc => " ORDER BY avg_rating DESC, c.id ASC",
            ClassSortKey::PriceAsc => " ORDER BY c.price ASC, c.id ASC",
            ClassSortKey::PriceDesc => " ORDER BY c.price DESC, c.id ASC",
            ClassSortKey::DateDesc => " ORDER BY c.start_date DESC, c.id ASC",
            ClassSortKey::Default => " ORDER BY avg_rating DESC, c.created_at DESC, c.id ASC",
        });

        let mut query = sqlx::query(&sql);
        if let Some(v) = &filter.instructor_id {
            query = query.bind(v);
        }
        if let Some(v) = &filter.location_id {
            query = query.bind(v);
        }
        if let Some(v) = filter.style {
            query = query.bind(v.as_str());
        }
        if let Some(v) = filter.level {
            query = query.bind(v.as_str());
        }
        if let Some(v) = filter.start_date {
            query = query.bind(v);
        }
        if let Some(v) = filter.end_date {
            query = query.bind(v);
        }
        if let Some(v) = filter.min_rating {
            query = query.bind(v);
        }

        let rows = query
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("class search failed: {}", e)))?;

        let mut dtos = Vec::with_capacity(rows.len());
        for row in &rows {
            let class = DanceClass::from_row(row)?;
            let avg_rating: Option<f64> = row.get("avg_rating");
            dtos.push(self.to_dto(class, avg_rating, None).await?);
        }
        Ok(dtos)
    }

    pub async fn get_class(&self, id: &str) -> AppResult<DanceClassDto> {
        let class = self
            .db
            .get_class(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("class {} not found", id)))?;
        let avg_rating = self.average_rating(&class.id).await?;
        self.to_dto(class, avg_rating, None).await
    }

    /// Classes within `radius_km` of a point, closest first. Classes whose
    /// location is missing or not geocoded never match.
    pub async fn get_classes_near(
        &self,
        params: &NearbyClassesParams,
    ) -> AppResult<Vec<DanceClassDto>> {
        let mut sql = format!(
            "SELECT c.*, {} AS avg_rating, l.latitude AS loc_lat, l.longitude AS loc_lon
             FROM dance_classes c
             JOIN locations l ON l.id = c.location_id
             WHERE c.is_active = 1 AND l.latitude IS NOT NULL AND l.longitude IS NOT NULL",
            AVG_RATING_SUBQUERY
        );
        if params.start_date.is_some() {
            sql.push_str(" AND c.end_date >= ?");
        }
        if params.end_date.is_some() {
            sql.push_str(" AND c.start_date <= ?");
        }

        let mut query = sqlx::query(&sql);
        if let Some(v) = params.start_date {
            query = query.bind(v);
        }
        if let Some(v) = params.end_date {
            query = query.bind(v);
        }

        let rows = query
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("nearby class search failed: {}", e)))?;

        let mut hits = Vec::new();
        for row in &rows {
            let lat: f64 = row.get("loc_lat");
            let lon: f64 = row.get("loc_lon");
            let distance = geo::distance_km(params.latitude, params.longitude, lat, lon);
            if distance <= params.radius_km {
                let class = DanceClass::from_row(row)?;
                let avg_rating: Option<f64> = row.get("avg_rating");
                hits.push((distance, class, avg_rating));
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
        for (distance, class, avg_rating) in hits {
            dtos.push(self.to_dto(class, avg_rating, Some(distance)).await?);
        }
        Ok(dtos)
    }

    pub async fn get_classes_by_instructor(
        &self,
        instructor_id: &str,
        include_past: bool,
    ) -> AppResult<Vec<DanceClassDto>> {
        if super::instructor_public(&self.db, instructor_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound(format!(
                "instructor {} not found",
                instructor_id
            )));
        }
        self.classes_where("c.instructor_id = ?", instructor_id, include_past)
            .await
    }

    pub async fn get_classes_by_location(
        &self,
        location_id: &str,
        include_past: bool,
    ) -> AppResult<Vec<DanceClassDto>> {
        if self.db.get_location(location_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "location {} not found",
                location_id
            )));
        }
        self.classes_where("c.location_id = ?", location_id, include_past)
            .await
    }

    pub async fn get_recurring_schedules(
        &self,
        class_id: &str,
    ) -> AppResult<Vec<RecurringSchedule>> {
        self.require_class(class_id).await?;
        let rows = sqlx::query(
            "SELECT * FROM recurring_schedules WHERE class_id = ?
             ORDER BY day_of_week ASC, start_time ASC, id ASC",
        )
        .bind(class_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| AppError::Database(format!("failed to load schedules: {}", e)))?;

        rows.iter().map(RecurringSchedule::from_row).collect()
    }

    pub async fn get_special_schedules(&self, class_id: &str) -> AppResult<Vec<SpecialSchedule>> {
        self.require_class(class_id).await?;
        let rows = sqlx::query(
            "SELECT * FROM special_schedules WHERE class_id = ?
             ORDER BY date ASC, start_time ASC, id ASC",
        )
        .bind(class_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| AppError::Database(format!("failed to load special schedules: {}", e)))?;

        rows.iter().map(SpecialSchedule::from_row).collect()
    }

    async fn require_class(&self, class_id: &str) -> AppResult<()> {
        if self.db.get_class(class_id).await?.is_none() {
            return Err(AppError::NotFound(format!("class {} not found", class_id)));
        }
        Ok(())
    }

    async fn classes_where(
        &self,
        cond: &str,
        bind: &str,
        include_past: bool,
    ) -> AppResult<Vec<DanceClassDto>> {
        let mut sql = format!(
            "SELECT c.*, {} AS avg_rating FROM dance_classes c
             WHERE c.is_active = 1 AND {}",
            AVG_RATING_SUBQUERY, cond
        );
        if !include_past {
            sql.push_str(" AND c.end_date >= ?");
        }
        sql.push_str(" ORDER BY c.start_date DESC, c.id ASC");

        let mut query = sqlx::query(&sql).bind(bind);
        if !include_past {
            query = query.bind(Utc::now().date_naive());
        }

        let rows = query
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("class listing failed: {}", e)))?;

        let mut dtos = Vec::with_capacity(rows.len());
        for row in &rows {
            let class = DanceClass::from_row(row)?;
            let avg_rating: Option<f64> = row.get("avg_rating");
            dtos.push(self.to_dto(class, avg_rating, None).await?);
        }
        Ok(dtos)
    }

    async fn average_rating(&self, class_id: &str) -> AppResult<Option<f64>> {
        let row =
            sqlx::query("SELECT AVG(overall_rating) AS avg_rating FROM reviews WHERE class_id = ?")
                .bind(class_id)
                .fetch_one(self.db.pool())
                .await
                .map_err(|e| AppError::Database(format!("failed to compute rating: {}", e)))?;
        Ok(row.get("avg_rating"))
    }

    async fn to_dto(
        &self,
        class: DanceClass,
        avg_rating: Option<f64>,
        distance_km: Option<f64>,
    ) -> AppResult<DanceClassDto> {
        let instructor = super::instructor_public(&self.db, &class.instructor_id).await?;
        let location = match &class.location_id {
            Some(location_id) => self.db.get_location(location_id).await?,
            None => None,
        };
        Ok(DanceClassDto {
            duration_days: class.duration_days(),
            class,
            instructor,
            location,
            avg_rating,
            distance_km,
        })
    }
}

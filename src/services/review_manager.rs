// Review manager: composite review creation, filtered paginated listings
// and the verification audit trail.
//
// A review is one main row plus four facet rows plus genre/card memberships.
// Creation writes all of them in a single transaction; a failure anywhere
// rolls back everything.

use chrono::Utc;
use serde::Deserialize;
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::Row;
use uuid::Uuid;

use crate::core::{
    ReviewSortKey, SportsCard, Temperature, VerificationMethod, NOTES_MAX_CHARS, RATING_MAX,
    RATING_MIN,
};
use crate::database::Database;
use crate::error::{AppError, AppResult};
use crate::models::{
    ChangingRoom, ChangingRoomDto, Environment, FacilitiesDto, Music, ReviewAuthor,
    ReviewCreatePayload, ReviewPage, ReviewResponse, ReviewVerification, TeachingApproach,
    VerifyReviewPayload, WaitingArea, WaitingAreaDto,
};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewListParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    #[serde(default)]
    pub sort_by: Option<ReviewSortKey>,
    pub verified_only: Option<bool>,
    pub min_rating: Option<i32>,
    pub max_rating: Option<i32>,
    pub teaching_style_min: Option<i32>,
    pub teaching_style_max: Option<i32>,
    pub feedback_approach_min: Option<i32>,
    pub feedback_approach_max: Option<i32>,
    pub pace_min: Option<i32>,
    pub pace_max: Option<i32>,
    pub temperature: Option<Temperature>,
    /// Comma-separated genre list; a review matches if it carries any of them.
    pub genres: Option<String>,
    /// Comma-separated sports card list, matched the same way.
    pub cards: Option<String>,
    pub has_changing_room: Option<bool>,
    pub has_waiting_area: Option<bool>,
}

/// List params after parsing the comma-separated memberships.
struct ParsedFilters {
    verified_only: bool,
    min_rating: Option<i32>,
    max_rating: Option<i32>,
    teaching_style_min: Option<i32>,
    teaching_style_max: Option<i32>,
    feedback_approach_min: Option<i32>,
    feedback_approach_max: Option<i32>,
    pace_min: Option<i32>,
    pace_max: Option<i32>,
    temperature: Option<Temperature>,
    genres: Vec<String>,
    cards: Vec<SportsCard>,
    has_changing_room: Option<bool>,
    has_waiting_area: Option<bool>,
}

impl ReviewListParams {
    fn parse_filters(&self) -> AppResult<ParsedFilters> {
        let genres = self
            .genres
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect();

        let mut cards = Vec::new();
        if let Some(raw) = &self.cards {
            for part in raw.split(',') {
                let part = part.trim();
                if part.is_empty() {
                    continue;
                }
                cards.push(
                    part.parse::<SportsCard>()
                        .map_err(AppError::Validation)?,
                );
            }
        }

        Ok(ParsedFilters {
            verified_only: self.verified_only.unwrap_or(false),
            min_rating: self.min_rating,
            max_rating: self.max_rating,
            teaching_style_min: self.teaching_style_min,
            teaching_style_max: self.teaching_style_max,
            feedback_approach_min: self.feedback_approach_min,
            feedback_approach_max: self.feedback_approach_max,
            pace_min: self.pace_min,
            pace_max: self.pace_max,
            temperature: self.temperature,
            genres,
            cards,
            has_changing_room: self.has_changing_room,
            has_waiting_area: self.has_waiting_area,
        })
    }
}

const REVIEW_FROM: &str = "FROM reviews r
     JOIN teaching_reviews t ON t.review_id = r.id
     JOIN environment_reviews e ON e.review_id = r.id
     JOIN music_reviews m ON m.review_id = r.id
     JOIN facilities_reviews f ON f.review_id = r.id
     LEFT JOIN users u ON u.id = r.user_id
     WHERE r.class_id = ?";

const REVIEW_COLUMNS: &str = "r.*,
     t.teaching_style, t.feedback_approach, t.pace_of_teaching, t.breakdown_quality,
     e.floor_quality, e.crowdedness, e.ventilation, e.temperature,
     m.volume_level, m.style AS music_style,
     f.has_changing_room, f.changing_room_quality, f.changing_room_notes,
     f.has_waiting_area, f.waiting_area_kind, f.waiting_area_seating, f.waiting_area_notes,
     u.first_name AS author_first_name, u.last_name AS author_last_name";

#[derive(Clone)]
pub struct ReviewManagerService {
    db: Database,
}

impl ReviewManagerService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn verification_methods(&self) -> &'static [VerificationMethod] {
        &VerificationMethod::ALL
    }

    pub async fn create_review(
        &self,
        class_id: &str,
        payload: &ReviewCreatePayload,
    ) -> AppResult<ReviewResponse> {
        if self.db.get_class(class_id).await?.is_none() {
            return Err(AppError::NotFound(format!("class {} not found", class_id)));
        }
        let validated = payload.validate()?;

        let author_name = match &validated.author {
            ReviewAuthor::Anonymous(name) => Some(name.clone()),
            ReviewAuthor::User(user_id) => {
                let user = self.db.get_user(user_id).await?.ok_or_else(|| {
                    AppError::Validation(format!("user {} does not exist", user_id))
                })?;
                let existing =
                    sqlx::query("SELECT 1 FROM reviews WHERE class_id = ? AND user_id = ?")
                        .bind(class_id)
                        .bind(user_id)
                        .fetch_optional(self.db.pool())
                        .await
                        .map_err(|e| {
                            AppError::Database(format!("duplicate review check failed: {}", e))
                        })?;
                if existing.is_some() {
                    return Err(AppError::Conflict(
                        "this user has already reviewed this class".to_string(),
                    ));
                }
                Some(user.display_name())
            }
        };

        let review_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("failed to begin transaction: {}", e)))?;

        sqlx::query(
            "INSERT INTO reviews
                (id, class_id, user_id, anonymous_name, overall_rating, comment, is_verified,
                 created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, 0, ?, ?)",
        )
        .bind(&review_id)
        .bind(class_id)
        .bind(validated.author.user_id())
        .bind(validated.author.anonymous_name())
        .bind(validated.overall_rating)
        .bind(&validated.comment)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            // The partial unique index catches a concurrent duplicate the
            // pre-check above raced with.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("this user has already reviewed this class".to_string())
            }
            other => AppError::Database(format!("failed to create review: {}", other)),
        })?;

        sqlx::query(
            "INSERT INTO teaching_reviews
                (id, review_id, teaching_style, feedback_approach, pace_of_teaching, breakdown_quality)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&review_id)
        .bind(validated.teaching.teaching_style)
        .bind(validated.teaching.feedback_approach)
        .bind(validated.teaching.pace_of_teaching)
        .bind(validated.teaching.breakdown_quality)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(format!("failed to create teaching review: {}", e)))?;

        sqlx::query(
            "INSERT INTO environment_reviews
                (id, review_id, floor_quality, crowdedness, ventilation, temperature)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&review_id)
        .bind(validated.environment.floor_quality)
        .bind(validated.environment.crowdedness)
        .bind(validated.environment.ventilation)
        .bind(validated.environment.temperature.as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(format!("failed to create environment review: {}", e)))?;

        sqlx::query(
            "INSERT INTO music_reviews (id, review_id, volume_level, style) VALUES (?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&review_id)
        .bind(validated.music.volume_level)
        .bind(validated.music.style)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(format!("failed to create music review: {}", e)))?;

        for genre in &validated.music.genres {
            sqlx::query(
                "INSERT OR IGNORE INTO music_review_genres (review_id, genre) VALUES (?, ?)",
            )
            .bind(&review_id)
            .bind(genre)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("failed to attach genre: {}", e)))?;
        }

        let (has_changing_room, changing_room_quality, changing_room_notes) =
            match &validated.facilities.changing_room {
                ChangingRoom::Absent => (false, None, None),
                ChangingRoom::Present { quality, notes } => (true, Some(*quality), notes.clone()),
            };
        let (has_waiting_area, waiting_area_kind, waiting_area_seating, waiting_area_notes) =
            match &validated.facilities.waiting_area {
                WaitingArea::Absent => (false, None, None, None),
                WaitingArea::Present {
                    kind,
                    seating,
                    notes,
                } => (true, Some(kind.as_str()), Some(*seating), notes.clone()),
            };

        sqlx::query(
            "INSERT INTO facilities_reviews
                (id, review_id, has_changing_room, changing_room_quality, changing_room_notes,
                 has_waiting_area, waiting_area_kind, waiting_area_seating, waiting_area_notes)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&review_id)
        .bind(has_changing_room)
        .bind(changing_room_quality)
        .bind(&changing_room_notes)
        .bind(has_waiting_area)
        .bind(waiting_area_kind)
        .bind(waiting_area_seating)
        .bind(&waiting_area_notes)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(format!("failed to create facilities review: {}", e)))?;

        for card in &validated.facilities.accepted_cards {
            sqlx::query(
                "INSERT OR IGNORE INTO facilities_review_cards (review_id, sports_card) VALUES (?, ?)",
            )
            .bind(&review_id)
            .bind(card.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("failed to attach sports card: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("failed to commit review: {}", e)))?;

        tracing::info!(review_id = %review_id, class_id, "created review");

        Ok(ReviewResponse {
            id: review_id,
            overall_rating: validated.overall_rating,
            comment: validated.comment,
            teaching: validated.teaching,
            environment: validated.environment,
            music: validated.music,
            facilities: FacilitiesDto {
                changing_room: ChangingRoomDto::from(&validated.facilities.changing_room),
                waiting_area: WaitingAreaDto::from(&validated.facilities.waiting_area),
                accepted_cards: validated.facilities.accepted_cards,
            },
            author_name,
            verified: false,
            created_at: now,
            updated_at: now,
        })
    }

    /// Paginated, filtered review listing. Pages are 1-based;
    /// `pages = ceil(total / page_size)` and a page past the end yields an
    /// empty item list rather than an error.
    pub async fn get_class_reviews_paginated(
        &self,
        class_id: &str,
        params: &ReviewListParams,
    ) -> AppResult<ReviewPage> {
        if self.db.get_class(class_id).await?.is_none() {
            return Err(AppError::NotFound(format!("class {} not found", class_id)));
        }

        let page = params.page.unwrap_or(1);
        if page < 1 {
            return Err(AppError::Validation("page must be at least 1".to_string()));
        }
        let page_size = params
            .page_size
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(1, MAX_PAGE_SIZE);
        params.validate_bounds()?;
        let filters = params.parse_filters()?;

        let filter_sql = filter_clauses(&filters);

        let count_sql = format!("SELECT COUNT(*) AS n {}{}", REVIEW_FROM, filter_sql);
        let count_query = bind_filters(sqlx::query(&count_sql).bind(class_id), &filters);
        let total: i64 = count_query
            .fetch_one(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("review count failed: {}", e)))?
            .get("n");

        let pages = if total == 0 {
            0
        } else {
            (total + page_size - 1) / page_size
        };

        // Past the last page there is nothing to fetch; returning here also
        // keeps the OFFSET arithmetic below within i64 for arbitrary `page`.
        if page > pages {
            return Ok(ReviewPage {
                items: Vec::new(),
                total,
                page,
                pages,
                has_next: false,
                has_prev: page > 1 && total > 0,
            });
        }

        let order = match params.sort_by.unwrap_or_default() {
            ReviewSortKey::DateDesc => " ORDER BY r.created_at DESC, r.id ASC",
            ReviewSortKey::DateAsc => " ORDER BY r.created_at ASC, r.id ASC",
            ReviewSortKey::RatingDesc => " ORDER BY r.overall_rating DESC, r.id ASC",
            ReviewSortKey::RatingAsc => " ORDER BY r.overall_rating ASC, r.id ASC",
        };

        let page_sql = format!(
            "SELECT {} {}{}{} LIMIT ? OFFSET ?",
            REVIEW_COLUMNS, REVIEW_FROM, filter_sql, order
        );
        let page_query = bind_filters(sqlx::query(&page_sql).bind(class_id), &filters)
            .bind(page_size)
            .bind((page - 1) * page_size);

        let rows = page_query
            .fetch_all(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("review listing failed: {}", e)))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            items.push(self.response_from_row(row).await?);
        }

        Ok(ReviewPage {
            items,
            total,
            page,
            pages,
            has_next: page < pages,
            has_prev: page > 1 && total > 0,
        })
    }

    /// Small non-paginated slice for embedding on a class page.
    pub async fn get_class_reviews(
        &self,
        class_id: &str,
        limit: i64,
        sort_by: ReviewSortKey,
    ) -> AppResult<Vec<ReviewResponse>> {
        let params = ReviewListParams {
            page: Some(1),
            page_size: Some(limit.clamp(1, MAX_PAGE_SIZE)),
            sort_by: Some(sort_by),
            ..Default::default()
        };
        Ok(self
            .get_class_reviews_paginated(class_id, &params)
            .await?
            .items)
    }

    /// Writes an audit row and flips the review's verified flag. Audit rows
    /// are append-only.
    pub async fn verify_review(
        &self,
        review_id: &str,
        payload: &VerifyReviewPayload,
    ) -> AppResult<ReviewVerification> {
        let review = sqlx::query("SELECT id FROM reviews WHERE id = ?")
            .bind(review_id)
            .fetch_optional(self.db.pool())
            .await
            .map_err(|e| AppError::Database(format!("failed to load review: {}", e)))?;
        if review.is_none() {
            return Err(AppError::NotFound(format!("review {} not found", review_id)));
        }

        let method = payload
            .method
            .parse::<VerificationMethod>()
            .map_err(AppError::Validation)?;
        if let Some(notes) = &payload.notes {
            if notes.chars().count() > NOTES_MAX_CHARS {
                return Err(AppError::Validation(format!(
                    "verification notes must be at most {} characters",
                    NOTES_MAX_CHARS
                )));
            }
        }
        if self.db.get_user(&payload.verifier_id).await?.is_none() {
            return Err(AppError::Validation(format!(
                "verifier {} does not exist",
                payload.verifier_id
            )));
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self
            .db
            .pool()
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("failed to begin transaction: {}", e)))?;

        sqlx::query(
            "INSERT INTO review_verifications (id, review_id, verified_by, method, notes, verified_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(review_id)
        .bind(&payload.verifier_id)
        .bind(method.as_str())
        .bind(&payload.notes)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| AppError::Database(format!("failed to record verification: {}", e)))?;

        sqlx::query("UPDATE reviews SET is_verified = 1, updated_at = ? WHERE id = ?")
            .bind(now)
            .bind(review_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("failed to flag review verified: {}", e)))?;

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("failed to commit verification: {}", e)))?;

        tracing::info!(review_id, verifier_id = %payload.verifier_id, "verified review");

        Ok(ReviewVerification {
            id,
            review_id: review_id.to_string(),
            verified_by: payload.verifier_id.clone(),
            method,
            notes: payload.notes.clone(),
            verified_at: now,
        })
    }

    async fn response_from_row(&self, row: &SqliteRow) -> AppResult<ReviewResponse> {
        let review_id: String = row.get("id");

        let genre_rows =
            sqlx::query("SELECT genre FROM music_review_genres WHERE review_id = ? ORDER BY genre")
                .bind(&review_id)
                .fetch_all(self.db.pool())
                .await
                .map_err(|e| AppError::Database(format!("failed to load genres: {}", e)))?;
        let genres = genre_rows
            .iter()
            .map(|r| r.get::<String, _>("genre"))
            .collect();

        let card_rows = sqlx::query(
            "SELECT sports_card FROM facilities_review_cards WHERE review_id = ? ORDER BY sports_card",
        )
        .bind(&review_id)
        .fetch_all(self.db.pool())
        .await
        .map_err(|e| AppError::Database(format!("failed to load sports cards: {}", e)))?;
        let mut accepted_cards = Vec::with_capacity(card_rows.len());
        for card_row in &card_rows {
            let raw: String = card_row.get("sports_card");
            accepted_cards.push(
                raw.parse::<SportsCard>()
                    .map_err(|e| AppError::Internal(format!("corrupt sports card value: {}", e)))?,
            );
        }

        let temperature: String = row.get("temperature");
        let temperature = temperature
            .parse::<Temperature>()
            .map_err(|e| AppError::Internal(format!("corrupt temperature value: {}", e)))?;

        let has_changing_room: bool = row.get("has_changing_room");
        let changing_room = if has_changing_room {
            ChangingRoom::Present {
                quality: row.get("changing_room_quality"),
                notes: row.get("changing_room_notes"),
            }
        } else {
            ChangingRoom::Absent
        };

        let has_waiting_area: bool = row.get("has_waiting_area");
        let waiting_area = if has_waiting_area {
            let kind: String = row.get("waiting_area_kind");
            WaitingArea::Present {
                kind: kind.parse().map_err(|e| {
                    AppError::Internal(format!("corrupt waiting area kind: {}", e))
                })?,
                seating: row
                    .get::<Option<bool>, _>("waiting_area_seating")
                    .unwrap_or(false),
                notes: row.get("waiting_area_notes"),
            }
        } else {
            WaitingArea::Absent
        };

        let anonymous_name: Option<String> = row.get("anonymous_name");
        let author_name = match anonymous_name {
            Some(name) => Some(name),
            None => {
                let first: Option<String> = row.get("author_first_name");
                let last: Option<String> = row.get("author_last_name");
                match (first, last) {
                    (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
                    _ => None,
                }
            }
        };

        Ok(ReviewResponse {
            id: review_id,
            overall_rating: row.get("overall_rating"),
            comment: row.get("comment"),
            teaching: TeachingApproach {
                teaching_style: row.get("teaching_style"),
                feedback_approach: row.get("feedback_approach"),
                pace_of_teaching: row.get("pace_of_teaching"),
                breakdown_quality: row.get("breakdown_quality"),
            },
            environment: Environment {
                floor_quality: row.get("floor_quality"),
                crowdedness: row.get("crowdedness"),
                ventilation: row.get("ventilation"),
                temperature,
            },
            music: Music {
                volume_level: row.get("volume_level"),
                style: row.get("music_style"),
                genres,
            },
            facilities: FacilitiesDto {
                changing_room: ChangingRoomDto::from(&changing_room),
                waiting_area: WaitingAreaDto::from(&waiting_area),
                accepted_cards,
            },
            author_name,
            verified: row.get("is_verified"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

fn filter_clauses(filters: &ParsedFilters) -> String {
    let mut sql = String::new();
    if filters.verified_only {
        sql.push_str(" AND r.is_verified = 1");
    }
    if filters.min_rating.is_some() {
        sql.push_str(" AND r.overall_rating >= ?");
    }
    if filters.max_rating.is_some() {
        sql.push_str(" AND r.overall_rating <= ?");
    }
    if filters.teaching_style_min.is_some() {
        sql.push_str(" AND t.teaching_style >= ?");
    }
    if filters.teaching_style_max.is_some() {
        sql.push_str(" AND t.teaching_style <= ?");
    }
    if filters.feedback_approach_min.is_some() {
        sql.push_str(" AND t.feedback_approach >= ?");
    }
    if filters.feedback_approach_max.is_some() {
        sql.push_str(" AND t.feedback_approach <= ?");
    }
    if filters.pace_min.is_some() {
        sql.push_str(" AND t.pace_of_teaching >= ?");
    }
    if filters.pace_max.is_some() {
        sql.push_str(" AND t.pace_of_teaching <= ?");
    }
    if filters.temperature.is_some() {
        sql.push_str(" AND e.temperature = ?");
    }
    if !filters.genres.is_empty() {
        let placeholders = vec!["?"; filters.genres.len()].join(", ");
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM music_review_genres g
                 WHERE g.review_id = r.id AND g.genre IN ({}))",
            placeholders
        ));
    }
    if !filters.cards.is_empty() {
        let placeholders = vec!["?"; filters.cards.len()].join(", ");
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM facilities_review_cards fc
                 WHERE fc.review_id = r.id AND fc.sports_card IN ({}))",
            placeholders
        ));
    }
    if filters.has_changing_room.is_some() {
        sql.push_str(" AND f.has_changing_room = ?");
    }
    if filters.has_waiting_area.is_some() {
        sql.push_str(" AND f.has_waiting_area = ?");
    }
    sql
}

fn bind_filters<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    filters: &'q ParsedFilters,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    if let Some(v) = filters.min_rating {
        query = query.bind(v);
    }
    if let Some(v) = filters.max_rating {
        query = query.bind(v);
    }
    if let Some(v) = filters.teaching_style_min {
        query = query.bind(v);
    }
    if let Some(v) = filters.teaching_style_max {
        query = query.bind(v);
    }
    if let Some(v) = filters.feedback_approach_min {
        query = query.bind(v);
    }
    if let Some(v) = filters.feedback_approach_max {
        query = query.bind(v);
    }
    if let Some(v) = filters.pace_min {
        query = query.bind(v);
    }
    if let Some(v) = filters.pace_max {
        query = query.bind(v);
    }
    if let Some(v) = filters.temperature {
        query = query.bind(v.as_str());
    }
    for genre in &filters.genres {
        query = query.bind(genre);
    }
    for card in &filters.cards {
        query = query.bind(card.as_str());
    }
    if let Some(v) = filters.has_changing_room {
        query = query.bind(v);
    }
    if let Some(v) = filters.has_waiting_area {
        query = query.bind(v);
    }
    query
}

// Rating filters outside 1..=5 can never match; reject them early so typos
// surface as 400s instead of silently empty pages.
impl ReviewListParams {
    pub fn validate_bounds(&self) -> AppResult<()> {
        for (name, value) in [
            ("min_rating", self.min_rating),
            ("max_rating", self.max_rating),
        ] {
            if let Some(value) = value {
                if !(RATING_MIN..=RATING_MAX).contains(&value) {
                    return Err(AppError::Validation(format!(
                        "{} must be between {} and {}",
                        name, RATING_MIN, RATING_MAX
                    )));
                }
            }
        }
        Ok(())
    }
}

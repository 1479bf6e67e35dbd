// Domain entities, response DTOs and request payloads.
//
// Entities mirror the relational schema in `database.rs`. Conditional
// sub-review fields (changing room, waiting area) and review authorship are
// modeled as sum types so invalid combinations are unrepresentable once a
// payload has passed validation.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::core::{
    DanceStyle, Facility, ScheduleStatus, SkillLevel, SpecialScheduleStatus, SportsCard,
    Temperature, UserRole, VerificationMethod, WaitingAreaKind, COMMENT_MAX_CHARS,
    COMMENT_MIN_CHARS, NOTES_MAX_CHARS, RATING_MAX, RATING_MIN, SLIDER_MAX, SLIDER_MIN,
};
use crate::error::{AppError, AppResult};

/// Parses a TEXT column holding a vocabulary value. A value that fails to
/// parse means the row was written outside the validation path.
fn parse_col<T>(row: &SqliteRow, column: &str) -> AppResult<T>
where
    T: FromStr<Err = String>,
{
    let raw: String = row
        .try_get(column)
        .map_err(|e| AppError::Database(format!("failed to read column {}: {}", column, e)))?;
    raw.parse()
        .map_err(|e| AppError::Internal(format!("corrupt value in column {}: {}", column, e)))
}

fn get_col<'r, T>(row: &'r SqliteRow, column: &str) -> AppResult<T>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(column)
        .map_err(|e| AppError::Database(format!("failed to read column {}: {}", column, e)))
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub bio: String,
    pub profile_picture_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: get_col(row, "id")?,
            email: get_col(row, "email")?,
            first_name: get_col(row, "first_name")?,
            last_name: get_col(row, "last_name")?,
            role: parse_col(row, "role")?,
            bio: get_col(row, "bio")?,
            profile_picture_url: get_col(row, "profile_picture_url")?,
            created_at: get_col(row, "created_at")?,
            updated_at: get_col(row, "updated_at")?,
        })
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Public instructor profile with review aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct InstructorPublic {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
    pub profile_picture_url: Option<String>,
    pub classes_count: i64,
    pub reviews_count: i64,
    pub avg_rating: Option<f64>,
}

// ---------------------------------------------------------------------------
// Locations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct Location {
    pub id: String,
    pub google_place_id: Option<String>,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub url: Option<String>,
    pub facilities: Vec<Facility>,
    pub sports_cards: Vec<SportsCard>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Location {
    /// Maps the scalar columns; facility and card memberships live in join
    /// tables and are attached by the caller.
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: get_col(row, "id")?,
            google_place_id: get_col(row, "google_place_id")?,
            name: get_col(row, "name")?,
            address: get_col(row, "address")?,
            latitude: get_col(row, "latitude")?,
            longitude: get_col(row, "longitude")?,
            url: get_col(row, "url")?,
            facilities: Vec::new(),
            sports_cards: Vec::new(),
            created_at: get_col(row, "created_at")?,
            updated_at: get_col(row, "updated_at")?,
        })
    }
}

/// Location DTO for listings; `distance_km` is set by the nearby search.
#[derive(Debug, Clone, Serialize)]
pub struct LocationDto {
    #[serde(flatten)]
    pub location: Location,
    pub classes_count: i64,
    pub avg_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

/// Review aggregates for one location's classes.
#[derive(Debug, Clone, Serialize)]
pub struct LocationStats {
    pub total_reviews: i64,
    pub average_rating: f64,
}

// ---------------------------------------------------------------------------
// Dance classes and schedules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct DanceClass {
    pub id: String,
    pub name: String,
    pub description: String,
    pub instructor_id: String,
    pub level: SkillLevel,
    pub style: DanceStyle,
    pub max_capacity: i64,
    pub current_capacity: i64,
    pub price: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub location_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DanceClass {
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: get_col(row, "id")?,
            name: get_col(row, "name")?,
            description: get_col(row, "description")?,
            instructor_id: get_col(row, "instructor_id")?,
            level: parse_col(row, "level")?,
            style: parse_col(row, "style")?,
            max_capacity: get_col(row, "max_capacity")?,
            current_capacity: get_col(row, "current_capacity")?,
            price: get_col(row, "price")?,
            start_date: get_col(row, "start_date")?,
            end_date: get_col(row, "end_date")?,
            location_id: get_col(row, "location_id")?,
            is_active: get_col(row, "is_active")?,
            created_at: get_col(row, "created_at")?,
            updated_at: get_col(row, "updated_at")?,
        })
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// Class DTO with the embedded instructor/location references and the
/// recomputed review average (None when the class has no reviews).
#[derive(Debug, Clone, Serialize)]
pub struct DanceClassDto {
    #[serde(flatten)]
    pub class: DanceClass,
    pub duration_days: i64,
    pub instructor: Option<InstructorPublic>,
    pub location: Option<Location>,
    pub avg_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecurringSchedule {
    pub id: String,
    pub class_id: String,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: i64,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: ScheduleStatus,
}

impl RecurringSchedule {
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: get_col(row, "id")?,
            class_id: get_col(row, "class_id")?,
            day_of_week: get_col(row, "day_of_week")?,
            start_time: get_col(row, "start_time")?,
            end_time: get_col(row, "end_time")?,
            status: parse_col(row, "status")?,
        })
    }

    pub fn day_name(&self) -> &'static str {
        match self.day_of_week {
            0 => "Monday",
            1 => "Tuesday",
            2 => "Wednesday",
            3 => "Thursday",
            4 => "Friday",
            5 => "Saturday",
            _ => "Sunday",
        }
    }
}

/// Link from a special schedule to the recurring slot it replaces. Both the
/// schedule and the concrete date must be present together.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Replaces {
    None,
    Schedule { schedule_id: String, date: NaiveDate },
}

#[derive(Debug, Clone, Serialize)]
pub struct SpecialSchedule {
    pub id: String,
    pub class_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: SpecialScheduleStatus,
    pub replaces: Replaces,
    pub note: Option<String>,
}

impl SpecialSchedule {
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        let schedule_id: Option<String> = get_col(row, "replaced_schedule_id")?;
        let date: Option<NaiveDate> = get_col(row, "replaced_schedule_date")?;
        let replaces = match (schedule_id, date) {
            (Some(schedule_id), Some(date)) => Replaces::Schedule { schedule_id, date },
            (None, None) => Replaces::None,
            _ => {
                return Err(AppError::Internal(
                    "special schedule has a dangling replacement link".to_string(),
                ))
            }
        };
        Ok(Self {
            id: get_col(row, "id")?,
            class_id: get_col(row, "class_id")?,
            date: get_col(row, "date")?,
            start_time: get_col(row, "start_time")?,
            end_time: get_col(row, "end_time")?,
            status: parse_col(row, "status")?,
            replaces,
            note: get_col(row, "note")?,
        })
    }
}

// ---------------------------------------------------------------------------
// Special events
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SpecialEvent {
    pub id: String,
    pub name: String,
    pub description: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: i64,
    pub price: f64,
    pub location_id: String,
    pub instructor_id: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SpecialEvent {
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: get_col(row, "id")?,
            name: get_col(row, "name")?,
            description: get_col(row, "description")?,
            starts_at: get_col(row, "starts_at")?,
            capacity: get_col(row, "capacity")?,
            price: get_col(row, "price")?,
            location_id: get_col(row, "location_id")?,
            instructor_id: get_col(row, "instructor_id")?,
            image_url: get_col(row, "image_url")?,
            created_at: get_col(row, "created_at")?,
            updated_at: get_col(row, "updated_at")?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SpecialEventDto {
    #[serde(flatten)]
    pub event: SpecialEvent,
    pub location: Option<Location>,
    pub instructor: Option<InstructorPublic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

// ---------------------------------------------------------------------------
// Reviews
// ---------------------------------------------------------------------------

/// Exactly one of a registered author or an anonymous display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewAuthor {
    User(String),
    Anonymous(String),
}

impl ReviewAuthor {
    pub fn user_id(&self) -> Option<&str> {
        match self {
            ReviewAuthor::User(id) => Some(id),
            ReviewAuthor::Anonymous(_) => None,
        }
    }

    pub fn anonymous_name(&self) -> Option<&str> {
        match self {
            ReviewAuthor::User(_) => None,
            ReviewAuthor::Anonymous(name) => Some(name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeachingApproach {
    /// Structured (0) .. casual (100).
    pub teaching_style: i32,
    /// Verbal (0) .. hands-on (100).
    pub feedback_approach: i32,
    /// Methodical (0) .. fast-paced (100).
    pub pace_of_teaching: i32,
    /// Quality of move breakdowns, 1-5.
    pub breakdown_quality: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    pub floor_quality: i32,
    pub crowdedness: i32,
    pub ventilation: i32,
    pub temperature: Temperature,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Music {
    pub volume_level: i32,
    /// Classical (0) .. modern (100).
    pub style: i32,
    pub genres: Vec<String>,
}

/// Changing room report. `Present` carries the quality rating that is only
/// meaningful when a changing room exists.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangingRoom {
    Absent,
    Present { quality: i32, notes: Option<String> },
}

/// Waiting area report, same shape as [`ChangingRoom`].
#[derive(Debug, Clone, PartialEq)]
pub enum WaitingArea {
    Absent,
    Present {
        kind: WaitingAreaKind,
        seating: bool,
        notes: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Facilities {
    pub changing_room: ChangingRoom,
    pub waiting_area: WaitingArea,
    pub accepted_cards: Vec<SportsCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewVerification {
    pub id: String,
    pub review_id: String,
    pub verified_by: String,
    pub method: VerificationMethod,
    pub notes: Option<String>,
    pub verified_at: DateTime<Utc>,
}

impl ReviewVerification {
    pub fn from_row(row: &SqliteRow) -> AppResult<Self> {
        Ok(Self {
            id: get_col(row, "id")?,
            review_id: get_col(row, "review_id")?,
            verified_by: get_col(row, "verified_by")?,
            method: parse_col(row, "method")?,
            notes: get_col(row, "notes")?,
            verified_at: get_col(row, "verified_at")?,
        })
    }
}

// --- review response DTOs ---

#[derive(Debug, Clone, Serialize)]
pub struct ChangingRoomDto {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&ChangingRoom> for ChangingRoomDto {
    fn from(room: &ChangingRoom) -> Self {
        match room {
            ChangingRoom::Absent => Self {
                available: false,
                quality: None,
                notes: None,
            },
            ChangingRoom::Present { quality, notes } => Self {
                available: true,
                quality: Some(*quality),
                notes: notes.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WaitingAreaDto {
    pub available: bool,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<WaitingAreaKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seating: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<&WaitingArea> for WaitingAreaDto {
    fn from(area: &WaitingArea) -> Self {
        match area {
            WaitingArea::Absent => Self {
                available: false,
                kind: None,
                seating: None,
                notes: None,
            },
            WaitingArea::Present {
                kind,
                seating,
                notes,
            } => Self {
                available: true,
                kind: Some(*kind),
                seating: Some(*seating),
                notes: notes.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FacilitiesDto {
    pub changing_room: ChangingRoomDto,
    pub waiting_area: WaitingAreaDto,
    pub accepted_cards: Vec<SportsCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: String,
    pub overall_rating: i32,
    pub comment: String,
    pub teaching: TeachingApproach,
    pub environment: Environment,
    pub music: Music,
    pub facilities: FacilitiesDto,
    /// Anonymous display name, or the registered author's full name.
    pub author_name: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewPage {
    pub items: Vec<ReviewResponse>,
    pub total: i64,
    pub page: i64,
    pub pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

// --- review statistics DTOs ---
//
// Facets with no reviews in scope report 0.0, not null; consumers rely on
// the stats payload being fully populated.

#[derive(Debug, Clone, Default, Serialize)]
pub struct TeachingStats {
    pub avg_teaching_style: f64,
    pub avg_feedback_approach: f64,
    pub avg_pace_of_teaching: f64,
    pub avg_breakdown_quality: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EnvironmentStats {
    pub avg_floor_quality: f64,
    pub avg_crowdedness: f64,
    pub avg_ventilation: f64,
    pub temperature_distribution: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MusicStats {
    pub avg_volume_level: f64,
    pub avg_style: f64,
    pub genre_distribution: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FacilitiesStats {
    pub changing_room_available: i64,
    pub avg_changing_room_quality: f64,
    pub waiting_area_available: i64,
    pub seating_available: i64,
    pub accepted_cards_distribution: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassReviewStats {
    pub total_reviews: i64,
    pub verified_reviews: i64,
    pub average_rating: f64,
    pub rating_distribution: BTreeMap<i32, i64>,
    pub teaching: TeachingStats,
    pub environment: EnvironmentStats,
    pub music: MusicStats,
    pub facilities: FacilitiesStats,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InstructorStats {
    pub total_reviews: i64,
    pub average_rating: f64,
    pub teaching: TeachingStats,
}

// ---------------------------------------------------------------------------
// Request payloads
// ---------------------------------------------------------------------------

fn check_range(field: &str, value: i32, min: i32, max: i32) -> AppResult<()> {
    if value < min || value > max {
        return Err(AppError::Validation(format!(
            "{} must be between {} and {}, got {}",
            field, min, max, value
        )));
    }
    Ok(())
}

fn check_notes(field: &str, notes: &Option<String>) -> AppResult<()> {
    if let Some(notes) = notes {
        if notes.chars().count() > NOTES_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "{} notes must be at most {} characters",
                field, NOTES_MAX_CHARS
            )));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangingRoomPayload {
    pub available: bool,
    #[serde(default)]
    pub quality: Option<i32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ChangingRoomPayload {
    fn validate(&self) -> AppResult<ChangingRoom> {
        check_notes("changing room", &self.notes)?;
        if self.available {
            let quality = self.quality.ok_or_else(|| {
                AppError::Validation(
                    "changing room quality is required when a changing room is available"
                        .to_string(),
                )
            })?;
            check_range("changing room quality", quality, RATING_MIN, RATING_MAX)?;
            Ok(ChangingRoom::Present {
                quality,
                notes: self.notes.clone(),
            })
        } else {
            if self.quality.is_some() {
                return Err(AppError::Validation(
                    "changing room quality must be omitted when no changing room is available"
                        .to_string(),
                ));
            }
            Ok(ChangingRoom::Absent)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WaitingAreaPayload {
    pub available: bool,
    #[serde(rename = "type", default)]
    pub kind: Option<WaitingAreaKind>,
    #[serde(default)]
    pub seating: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl WaitingAreaPayload {
    fn validate(&self) -> AppResult<WaitingArea> {
        check_notes("waiting area", &self.notes)?;
        if self.available {
            let kind = self.kind.ok_or_else(|| {
                AppError::Validation(
                    "waiting area type is required when a waiting area is available".to_string(),
                )
            })?;
            Ok(WaitingArea::Present {
                kind,
                seating: self.seating.unwrap_or(false),
                notes: self.notes.clone(),
            })
        } else {
            if self.kind.is_some() || self.seating.is_some() {
                return Err(AppError::Validation(
                    "waiting area details must be omitted when no waiting area is available"
                        .to_string(),
                ));
            }
            Ok(WaitingArea::Absent)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FacilitiesPayload {
    pub changing_room: ChangingRoomPayload,
    pub waiting_area: WaitingAreaPayload,
    pub accepted_cards: Vec<SportsCard>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewCreatePayload {
    pub overall_rating: i32,
    pub comment: String,
    pub teaching: TeachingApproach,
    pub environment: Environment,
    pub music: Music,
    pub facilities: FacilitiesPayload,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub anonymous_name: Option<String>,
}

/// A [`ReviewCreatePayload`] that passed every range, membership and
/// authorship check. Only this type reaches the write path.
#[derive(Debug, Clone)]
pub struct ValidatedReview {
    pub author: ReviewAuthor,
    pub overall_rating: i32,
    pub comment: String,
    pub teaching: TeachingApproach,
    pub environment: Environment,
    pub music: Music,
    pub facilities: Facilities,
}

impl ReviewCreatePayload {
    pub fn validate(&self) -> AppResult<ValidatedReview> {
        let author = match (self.user_id.as_deref(), self.anonymous_name.as_deref()) {
            (Some(user_id), None) => ReviewAuthor::User(user_id.to_string()),
            (None, Some(name)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(AppError::Validation(
                        "anonymous_name must not be blank".to_string(),
                    ));
                }
                ReviewAuthor::Anonymous(name.to_string())
            }
            (Some(_), Some(_)) => {
                return Err(AppError::Validation(
                    "a review is either by a user or anonymous, not both".to_string(),
                ))
            }
            (None, None) => {
                return Err(AppError::Validation(
                    "either user_id or anonymous_name is required".to_string(),
                ))
            }
        };

        check_range("overall_rating", self.overall_rating, RATING_MIN, RATING_MAX)?;

        let trimmed = self.comment.trim();
        if trimmed.chars().count() < COMMENT_MIN_CHARS {
            return Err(AppError::Validation(format!(
                "comment must contain at least {} non-whitespace characters",
                COMMENT_MIN_CHARS
            )));
        }
        if trimmed.chars().count() > COMMENT_MAX_CHARS {
            return Err(AppError::Validation(format!(
                "comment must be at most {} characters",
                COMMENT_MAX_CHARS
            )));
        }

        check_range("teaching_style", self.teaching.teaching_style, SLIDER_MIN, SLIDER_MAX)?;
        check_range(
            "feedback_approach",
            self.teaching.feedback_approach,
            SLIDER_MIN,
            SLIDER_MAX,
        )?;
        check_range(
            "pace_of_teaching",
            self.teaching.pace_of_teaching,
            SLIDER_MIN,
            SLIDER_MAX,
        )?;
        check_range(
            "breakdown_quality",
            self.teaching.breakdown_quality,
            RATING_MIN,
            RATING_MAX,
        )?;

        check_range("floor_quality", self.environment.floor_quality, RATING_MIN, RATING_MAX)?;
        check_range("crowdedness", self.environment.crowdedness, RATING_MIN, RATING_MAX)?;
        check_range("ventilation", self.environment.ventilation, RATING_MIN, RATING_MAX)?;

        check_range("volume_level", self.music.volume_level, RATING_MIN, RATING_MAX)?;
        check_range("music style", self.music.style, SLIDER_MIN, SLIDER_MAX)?;
        let genres: Vec<String> = self
            .music
            .genres
            .iter()
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty())
            .collect();
        if genres.is_empty() {
            return Err(AppError::Validation(
                "at least one music genre is required".to_string(),
            ));
        }

        if self.facilities.accepted_cards.is_empty() {
            return Err(AppError::Validation(
                "at least one accepted sports card is required".to_string(),
            ));
        }

        Ok(ValidatedReview {
            author,
            overall_rating: self.overall_rating,
            comment: trimmed.to_string(),
            teaching: self.teaching,
            environment: self.environment,
            music: Music {
                volume_level: self.music.volume_level,
                style: self.music.style,
                genres,
            },
            facilities: Facilities {
                changing_room: self.facilities.changing_room.validate()?,
                waiting_area: self.facilities.waiting_area.validate()?,
                accepted_cards: self.facilities.accepted_cards.clone(),
            },
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyReviewPayload {
    pub verifier_id: String,
    pub method: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassCreatePayload {
    pub name: String,
    pub description: String,
    pub level: SkillLevel,
    pub style: DanceStyle,
    pub max_capacity: i64,
    pub price: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub location_id: Option<String>,
}

impl ClassCreatePayload {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("class name must not be blank".to_string()));
        }
        if self.max_capacity < 1 {
            return Err(AppError::Validation(
                "max_capacity must be at least 1".to_string(),
            ));
        }
        if self.price < 0.0 {
            return Err(AppError::Validation("price must not be negative".to_string()));
        }
        if self.end_date < self.start_date {
            return Err(AppError::Validation(
                "end_date must not be before start_date".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassUpdatePayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub level: Option<SkillLevel>,
    #[serde(default)]
    pub style: Option<DanceStyle>,
    #[serde(default)]
    pub max_capacity: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub location_id: Option<Option<String>>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Temperature;

    fn payload() -> ReviewCreatePayload {
        ReviewCreatePayload {
            overall_rating: 4,
            comment: "Great class, would recommend to anyone.".to_string(),
            teaching: TeachingApproach {
                teaching_style: 40,
                feedback_approach: 60,
                pace_of_teaching: 50,
                breakdown_quality: 5,
            },
            environment: Environment {
                floor_quality: 4,
                crowdedness: 3,
                ventilation: 4,
                temperature: Temperature::Moderate,
            },
            music: Music {
                volume_level: 3,
                style: 70,
                genres: vec!["Salsa".to_string()],
            },
            facilities: FacilitiesPayload {
                changing_room: ChangingRoomPayload {
                    available: true,
                    quality: Some(4),
                    notes: None,
                },
                waiting_area: WaitingAreaPayload {
                    available: false,
                    kind: None,
                    seating: None,
                    notes: None,
                },
                accepted_cards: vec![SportsCard::Multisport],
            },
            user_id: Some("user-1".to_string()),
            anonymous_name: None,
        }
    }

    #[test]
    fn valid_payload_passes() {
        let validated = payload().validate().unwrap();
        assert_eq!(validated.author, ReviewAuthor::User("user-1".to_string()));
        assert_eq!(validated.music.genres, vec!["salsa".to_string()]);
        assert!(matches!(
            validated.facilities.changing_room,
            ChangingRoom::Present { quality: 4, .. }
        ));
    }

    #[test]
    fn authorship_must_be_exclusive() {
        let mut both = payload();
        both.anonymous_name = Some("Dancer".to_string());
        assert!(matches!(both.validate(), Err(AppError::Validation(_))));

        let mut neither = payload();
        neither.user_id = None;
        assert!(matches!(neither.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn out_of_range_rating_fails() {
        let mut p = payload();
        p.overall_rating = 6;
        assert!(matches!(p.validate(), Err(AppError::Validation(_))));

        let mut p = payload();
        p.teaching.teaching_style = 101;
        assert!(matches!(p.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn short_comment_fails() {
        let mut p = payload();
        p.comment = "   short   ".to_string();
        assert!(matches!(p.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn changing_room_quality_requires_availability() {
        let mut p = payload();
        p.facilities.changing_room = ChangingRoomPayload {
            available: false,
            quality: Some(3),
            notes: None,
        };
        assert!(matches!(p.validate(), Err(AppError::Validation(_))));

        let mut p = payload();
        p.facilities.changing_room = ChangingRoomPayload {
            available: true,
            quality: None,
            notes: None,
        };
        assert!(matches!(p.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn waiting_area_type_required_when_available() {
        let mut p = payload();
        p.facilities.waiting_area = WaitingAreaPayload {
            available: true,
            kind: None,
            seating: Some(true),
            notes: None,
        };
        assert!(matches!(p.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn empty_genre_list_fails() {
        let mut p = payload();
        p.music.genres = vec!["   ".to_string()];
        assert!(matches!(p.validate(), Err(AppError::Validation(_))));
    }
}

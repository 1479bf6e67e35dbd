// Database layer - SQLite connection pool, schema initialization and the
// low-level entity writes shared by services and tests.

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::str::FromStr;
use uuid::Uuid;

use crate::core::{
    DanceStyle, Facility, ScheduleStatus, SkillLevel, SpecialScheduleStatus, SportsCard, UserRole,
};
use crate::error::{AppError, AppResult};
use crate::models::{
    DanceClass, Location, RecurringSchedule, Replaces, SpecialEvent, SpecialSchedule, User,
};

/// New-row arguments for the low-level writes. Request payload validation
/// happens above this layer.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub bio: String,
    pub profile_picture_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct NewLocation {
    pub google_place_id: Option<String>,
    pub name: String,
    pub address: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub url: Option<String>,
    pub facilities: Vec<Facility>,
    pub sports_cards: Vec<SportsCard>,
}

#[derive(Debug, Clone)]
pub struct NewSpecialEvent {
    pub name: String,
    pub description: String,
    pub starts_at: chrono::DateTime<Utc>,
    pub capacity: i64,
    pub price: f64,
    pub location_id: String,
    pub instructor_id: String,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewRecurringSchedule {
    pub class_id: String,
    pub day_of_week: i64,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub status: ScheduleStatus,
}

#[derive(Debug, Clone)]
pub struct NewSpecialSchedule {
    pub class_id: String,
    pub date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub end_time: chrono::NaiveTime,
    pub status: SpecialScheduleStatus,
    pub replaces: Replaces,
    pub note: Option<String>,
}

/// Async database handle backed by a SQLx connection pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::Database(format!("invalid database url: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("failed to connect to database: {}", e)))?;

        Ok(Self { pool })
    }

    /// In-memory database with the schema applied, for tests. The pool is
    /// pinned to a single connection: every `:memory:` connection is its own
    /// database, so a wider pool would scatter the schema.
    pub async fn connect_in_memory() -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Database(format!("invalid database url: {}", e)))?
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .map_err(|e| AppError::Database(format!("failed to open in-memory database: {}", e)))?;
        let db = Self { pool };
        db.init().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("health check failed: {}", e)))?;
        Ok(())
    }

    /// Creates the schema idempotently. The authorship rule on reviews (user
    /// or anonymous name, never both) is validated above this layer because
    /// deleting a user intentionally SET NULLs user_id; the one-review-per-
    /// user-per-class rule is a partial unique index so concurrent submitters
    /// lose at the database and surface a conflict.
    pub async fn init(&self) -> AppResult<()> {
        let statements = [
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL,
                role TEXT NOT NULL,
                bio TEXT NOT NULL DEFAULT '',
                profile_picture_url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS locations (
                id TEXT PRIMARY KEY,
                google_place_id TEXT UNIQUE,
                name TEXT NOT NULL,
                address TEXT NOT NULL,
                latitude REAL,
                longitude REAL,
                url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS location_facilities (
                location_id TEXT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
                facility TEXT NOT NULL,
                PRIMARY KEY (location_id, facility)
            )",
            "CREATE TABLE IF NOT EXISTS location_sports_cards (
                location_id TEXT NOT NULL REFERENCES locations(id) ON DELETE CASCADE,
                sports_card TEXT NOT NULL,
                PRIMARY KEY (location_id, sports_card)
            )",
            "CREATE TABLE IF NOT EXISTS dance_classes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                instructor_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                level TEXT NOT NULL,
                style TEXT NOT NULL,
                max_capacity INTEGER NOT NULL,
                current_capacity INTEGER NOT NULL DEFAULT 0,
                price REAL NOT NULL,
                start_date TEXT NOT NULL,
                end_date TEXT NOT NULL,
                location_id TEXT REFERENCES locations(id) ON DELETE SET NULL,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS recurring_schedules (
                id TEXT PRIMARY KEY,
                class_id TEXT NOT NULL REFERENCES dance_classes(id) ON DELETE CASCADE,
                day_of_week INTEGER NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'active'
            )",
            "CREATE TABLE IF NOT EXISTS special_schedules (
                id TEXT PRIMARY KEY,
                class_id TEXT NOT NULL REFERENCES dance_classes(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'scheduled',
                replaced_schedule_id TEXT REFERENCES recurring_schedules(id) ON DELETE SET NULL,
                replaced_schedule_date TEXT,
                note TEXT
            )",
            "CREATE TABLE IF NOT EXISTS special_events (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                description TEXT NOT NULL,
                starts_at TEXT NOT NULL,
                capacity INTEGER NOT NULL,
                price REAL NOT NULL,
                location_id TEXT NOT NULL REFERENCES locations(id),
                instructor_id TEXT NOT NULL REFERENCES users(id),
                image_url TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS reviews (
                id TEXT PRIMARY KEY,
                class_id TEXT NOT NULL REFERENCES dance_classes(id) ON DELETE CASCADE,
                user_id TEXT REFERENCES users(id) ON DELETE SET NULL,
                anonymous_name TEXT,
                overall_rating INTEGER NOT NULL,
                comment TEXT NOT NULL,
                is_verified INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )",
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_reviews_class_user
                ON reviews(class_id, user_id) WHERE user_id IS NOT NULL",
            "CREATE TABLE IF NOT EXISTS teaching_reviews (
                id TEXT PRIMARY KEY,
                review_id TEXT NOT NULL UNIQUE REFERENCES reviews(id) ON DELETE CASCADE,
                teaching_style INTEGER NOT NULL,
                feedback_approach INTEGER NOT NULL,
                pace_of_teaching INTEGER NOT NULL,
                breakdown_quality INTEGER NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS environment_reviews (
                id TEXT PRIMARY KEY,
                review_id TEXT NOT NULL UNIQUE REFERENCES reviews(id) ON DELETE CASCADE,
                floor_quality INTEGER NOT NULL,
                crowdedness INTEGER NOT NULL,
                ventilation INTEGER NOT NULL,
                temperature TEXT NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS music_reviews (
                id TEXT PRIMARY KEY,
                review_id TEXT NOT NULL UNIQUE REFERENCES reviews(id) ON DELETE CASCADE,
                volume_level INTEGER NOT NULL,
                style INTEGER NOT NULL
            )",
            "CREATE TABLE IF NOT EXISTS music_review_genres (
                review_id TEXT NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
                genre TEXT NOT NULL,
                PRIMARY KEY (review_id, genre)
            )",
            "CREATE TABLE IF NOT EXISTS facilities_reviews (
                id TEXT PRIMARY KEY,
                review_id TEXT NOT NULL UNIQUE REFERENCES reviews(id) ON DELETE CASCADE,
                has_changing_room INTEGER NOT NULL,
                changing_room_quality INTEGER,
                changing_room_notes TEXT,
                has_waiting_area INTEGER NOT NULL,
                waiting_area_kind TEXT,
                waiting_area_seating INTEGER,
                waiting_area_notes TEXT
            )",
            "CREATE TABLE IF NOT EXISTS facilities_review_cards (
                review_id TEXT NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
                sports_card TEXT NOT NULL,
                PRIMARY KEY (review_id, sports_card)
            )",
            "CREATE TABLE IF NOT EXISTS review_verifications (
                id TEXT PRIMARY KEY,
                review_id TEXT NOT NULL REFERENCES reviews(id) ON DELETE CASCADE,
                verified_by TEXT NOT NULL REFERENCES users(id),
                method TEXT NOT NULL,
                notes TEXT,
                verified_at TEXT NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_classes_instructor ON dance_classes(instructor_id)",
            "CREATE INDEX IF NOT EXISTS idx_classes_location ON dance_classes(location_id)",
            "CREATE INDEX IF NOT EXISTS idx_classes_dates ON dance_classes(start_date, end_date)",
            "CREATE INDEX IF NOT EXISTS idx_reviews_class ON reviews(class_id)",
            "CREATE INDEX IF NOT EXISTS idx_events_starts_at ON special_events(starts_at)",
        ];

        for ddl in statements {
            sqlx::query(ddl)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::Database(format!("schema init failed: {}", e)))?;
        }

        Ok(())
    }

    // --- users ---

    pub async fn create_user(&self, new: NewUser) -> AppResult<User> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, email, first_name, last_name, role, bio, profile_picture_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.email)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(new.role.as_str())
        .bind(&new.bio)
        .bind(&new.profile_picture_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict(format!("user with email {} already exists", new.email))
            }
            other => AppError::Database(format!("failed to create user: {}", other)),
        })?;

        Ok(User {
            id,
            email: new.email,
            first_name: new.first_name,
            last_name: new.last_name,
            role: new.role,
            bio: new.bio,
            profile_picture_url: new.profile_picture_url,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_user(&self, id: &str) -> AppResult<Option<User>> {
        let row = sqlx::query("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("failed to get user {}: {}", id, e)))?;

        row.as_ref().map(User::from_row).transpose()
    }

    // --- locations ---

    pub async fn create_location(&self, new: NewLocation) -> AppResult<Location> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("failed to begin transaction: {}", e)))?;

        sqlx::query(
            "INSERT INTO locations (id, google_place_id, name, address, latitude, longitude, url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.google_place_id)
        .bind(&new.name)
        .bind(&new.address)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(&new.url)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("location with this place id already exists".to_string())
            }
            other => AppError::Database(format!("failed to create location: {}", other)),
        })?;

        for facility in &new.facilities {
            sqlx::query(
                "INSERT OR IGNORE INTO location_facilities (location_id, facility) VALUES (?, ?)",
            )
            .bind(&id)
            .bind(facility.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("failed to attach facility: {}", e)))?;
        }

        for card in &new.sports_cards {
            sqlx::query(
                "INSERT OR IGNORE INTO location_sports_cards (location_id, sports_card) VALUES (?, ?)",
            )
            .bind(&id)
            .bind(card.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::Database(format!("failed to attach sports card: {}", e)))?;
        }

        tx.commit()
            .await
            .map_err(|e| AppError::Database(format!("failed to commit location: {}", e)))?;

        Ok(Location {
            id,
            google_place_id: new.google_place_id,
            name: new.name,
            address: new.address,
            latitude: new.latitude,
            longitude: new.longitude,
            url: new.url,
            facilities: new.facilities,
            sports_cards: new.sports_cards,
            created_at: now,
            updated_at: now,
        })
    }

    pub async fn get_location(&self, id: &str) -> AppResult<Option<Location>> {
        let row = sqlx::query("SELECT * FROM locations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("failed to get location {}: {}", id, e)))?;

        match row {
            Some(row) => {
                let mut location = Location::from_row(&row)?;
                self.attach_location_memberships(&mut location).await?;
                Ok(Some(location))
            }
            None => Ok(None),
        }
    }

    /// Loads the facility and sports-card join rows for a location.
    pub async fn attach_location_memberships(&self, location: &mut Location) -> AppResult<()> {
        let rows = sqlx::query(
            "SELECT facility FROM location_facilities WHERE location_id = ? ORDER BY facility",
        )
        .bind(&location.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("failed to load facilities: {}", e)))?;

        location.facilities = rows
            .iter()
            .map(|row| {
                let raw: String = row.get("facility");
                raw.parse::<Facility>()
                    .map_err(|e| AppError::Internal(format!("corrupt facility value: {}", e)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        let rows = sqlx::query(
            "SELECT sports_card FROM location_sports_cards WHERE location_id = ? ORDER BY sports_card",
        )
        .bind(&location.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("failed to load sports cards: {}", e)))?;

        location.sports_cards = rows
            .iter()
            .map(|row| {
                let raw: String = row.get("sports_card");
                raw.parse::<SportsCard>()
                    .map_err(|e| AppError::Internal(format!("corrupt sports card value: {}", e)))
            })
            .collect::<AppResult<Vec<_>>>()?;

        Ok(())
    }

    // --- classes & schedules ---

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_class(
        &self,
        instructor_id: &str,
        name: &str,
        description: &str,
        level: SkillLevel,
        style: DanceStyle,
        max_capacity: i64,
        price: f64,
        start_date: chrono::NaiveDate,
        end_date: chrono::NaiveDate,
        location_id: Option<&str>,
    ) -> AppResult<DanceClass> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO dance_classes
                (id, name, description, instructor_id, level, style, max_capacity, current_capacity,
                 price, start_date, end_date, location_id, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?, ?, 1, ?, ?)",
        )
        .bind(&id)
        .bind(name)
        .bind(description)
        .bind(instructor_id)
        .bind(level.as_str())
        .bind(style.as_str())
        .bind(max_capacity)
        .bind(price)
        .bind(start_date)
        .bind(end_date)
        .bind(location_id)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("failed to create class: {}", e)))?;

        let row = sqlx::query("SELECT * FROM dance_classes WHERE id = ?")
            .bind(&id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("failed to reload class: {}", e)))?;
        DanceClass::from_row(&row)
    }

    pub async fn get_class(&self, id: &str) -> AppResult<Option<DanceClass>> {
        let row = sqlx::query("SELECT * FROM dance_classes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::Database(format!("failed to get class {}: {}", id, e)))?;

        row.as_ref().map(DanceClass::from_row).transpose()
    }

    pub async fn create_recurring_schedule(
        &self,
        new: NewRecurringSchedule,
    ) -> AppResult<RecurringSchedule> {
        if !(0..=6).contains(&new.day_of_week) {
            return Err(AppError::Validation(
                "day_of_week must be between 0 (Monday) and 6 (Sunday)".to_string(),
            ));
        }

        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO recurring_schedules (id, class_id, day_of_week, start_time, end_time, status)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.class_id)
        .bind(new.day_of_week)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("failed to create recurring schedule: {}", e)))?;

        Ok(RecurringSchedule {
            id,
            class_id: new.class_id,
            day_of_week: new.day_of_week,
            start_time: new.start_time,
            end_time: new.end_time,
            status: new.status,
        })
    }

    pub async fn create_special_schedule(
        &self,
        new: NewSpecialSchedule,
    ) -> AppResult<SpecialSchedule> {
        let id = Uuid::new_v4().to_string();
        let (replaced_id, replaced_date) = match &new.replaces {
            Replaces::None => (None, None),
            Replaces::Schedule { schedule_id, date } => (Some(schedule_id.clone()), Some(*date)),
        };

        sqlx::query(
            "INSERT INTO special_schedules
                (id, class_id, date, start_time, end_time, status, replaced_schedule_id, replaced_schedule_date, note)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.class_id)
        .bind(new.date)
        .bind(new.start_time)
        .bind(new.end_time)
        .bind(new.status.as_str())
        .bind(&replaced_id)
        .bind(replaced_date)
        .bind(&new.note)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("failed to create special schedule: {}", e)))?;

        Ok(SpecialSchedule {
            id,
            class_id: new.class_id,
            date: new.date,
            start_time: new.start_time,
            end_time: new.end_time,
            status: new.status,
            replaces: new.replaces,
            note: new.note,
        })
    }

    // --- special events ---

    pub async fn create_event(&self, new: NewSpecialEvent) -> AppResult<SpecialEvent> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO special_events
                (id, name, description, starts_at, capacity, price, location_id, instructor_id, image_url, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.starts_at)
        .bind(new.capacity)
        .bind(new.price)
        .bind(&new.location_id)
        .bind(&new.instructor_id)
        .bind(&new.image_url)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::Database(format!("failed to create event: {}", e)))?;

        Ok(SpecialEvent {
            id,
            name: new.name,
            description: new.description,
            starts_at: new.starts_at,
            capacity: new.capacity,
            price: new.price,
            location_id: new.location_id,
            instructor_id: new.instructor_id,
            image_url: new.image_url,
            created_at: now,
            updated_at: now,
        })
    }
}

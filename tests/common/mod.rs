#![allow(dead_code)]

use chrono::NaiveDate;
use uuid::Uuid;

use danceclub::config::{Config, DatabaseConfig, ServerConfig};
use danceclub::core::{DanceStyle, SkillLevel, SportsCard, Temperature, UserRole};
use danceclub::database::{Database, NewLocation, NewUser};
use danceclub::models::{
    ChangingRoomPayload, DanceClass, Environment, FacilitiesPayload, Location, Music,
    ReviewCreatePayload, TeachingApproach, User, WaitingAreaPayload,
};
use danceclub::AppState;

pub const WARSAW: (f64, f64) = (52.2297, 21.0122);
pub const KRAKOW: (f64, f64) = (50.0647, 19.9450);

pub async fn test_state() -> AppState {
    let db = Database::connect_in_memory().await.unwrap();
    let config = Config {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
    };
    AppState::with_database(db, config)
}

pub async fn make_user(db: &Database, role: UserRole) -> User {
    db.create_user(NewUser {
        email: format!("{}@example.com", Uuid::new_v4()),
        first_name: "Anna".to_string(),
        last_name: "Kowalska".to_string(),
        role,
        bio: String::new(),
        profile_picture_url: None,
    })
    .await
    .unwrap()
}

pub async fn make_instructor(db: &Database) -> User {
    make_user(db, UserRole::Instructor).await
}

pub async fn make_location(db: &Database, name: &str, coords: Option<(f64, f64)>) -> Location {
    db.create_location(NewLocation {
        name: name.to_string(),
        address: "ul. Testowa 1".to_string(),
        latitude: coords.map(|c| c.0),
        longitude: coords.map(|c| c.1),
        ..Default::default()
    })
    .await
    .unwrap()
}

pub async fn make_class(
    db: &Database,
    instructor_id: &str,
    location_id: Option<&str>,
    style: DanceStyle,
    level: SkillLevel,
    price: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> DanceClass {
    db.insert_class(
        instructor_id,
        "Test class",
        "A class for tests",
        level,
        style,
        20,
        price,
        start,
        end,
        location_id,
    )
    .await
    .unwrap()
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn anonymous_review(name: &str, rating: i32) -> ReviewCreatePayload {
    let mut payload = user_review("ignored", rating);
    payload.user_id = None;
    payload.anonymous_name = Some(name.to_string());
    payload
}

pub fn user_review(user_id: &str, rating: i32) -> ReviewCreatePayload {
    ReviewCreatePayload {
        overall_rating: rating,
        comment: "Great class, friendly crowd and a patient teacher.".to_string(),
        teaching: TeachingApproach {
            teaching_style: 40,
            feedback_approach: 60,
            pace_of_teaching: 50,
            breakdown_quality: 4,
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
            genres: vec!["salsa".to_string()],
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
        user_id: Some(user_id.to_string()),
        anonymous_name: None,
    }
}

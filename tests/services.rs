mod common;

use sqlx::Row;

use common::*;
use danceclub::core::{
    ClassSortKey, DanceStyle, ReviewSortKey, SkillLevel, SportsCard, Temperature, UserRole,
    WaitingAreaKind,
};
use danceclub::error::AppError;
use danceclub::models::{
    ChangingRoomPayload, ClassCreatePayload, ClassUpdatePayload, VerifyReviewPayload,
    WaitingAreaPayload,
};
use danceclub::services::class_search::{ClassFilter, NearbyClassesParams};
use danceclub::services::event_search::{EventFilter, NearbyEventsParams};
use danceclub::services::instructor_search::InstructorFilter;
use danceclub::services::location_search::{LocationFilter, NearbyLocationsParams};
use danceclub::services::review_manager::ReviewListParams;
use danceclub::Database;

#[tokio::test]
async fn file_backed_database_initializes_idempotently() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("danceclub.db").display());

    let db = Database::connect(&url).await.unwrap();
    db.init().await.unwrap();
    db.init().await.unwrap();
    db.health_check().await.unwrap();
}

#[tokio::test]
async fn class_filters_are_conjunctive() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;

    let salsa_beginner = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;
    make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Advanced,
        60.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;
    make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Tango,
        SkillLevel::Beginner,
        70.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;

    let filter = ClassFilter {
        style: Some(DanceStyle::Salsa),
        level: Some(SkillLevel::Beginner),
        ..Default::default()
    };
    let found = state.class_search.get_classes(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].class.id, salsa_beginner.id);
}

#[tokio::test]
async fn date_window_matches_overlapping_runs() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;

    let autumn = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Latin,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 11, 30),
    )
    .await;
    make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Latin,
        SkillLevel::Beginner,
        50.0,
        date(2027, 1, 10),
        date(2027, 3, 31),
    )
    .await;

    // Window overlapping only the autumn run, including a partial overlap.
    let filter = ClassFilter {
        start_date: Some(date(2026, 11, 1)),
        end_date: Some(date(2026, 12, 15)),
        ..Default::default()
    };
    let found = state.class_search.get_classes(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].class.id, autumn.id);
}

#[tokio::test]
async fn min_rating_excludes_unreviewed_classes() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;

    let reviewed = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;
    make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;

    state
        .review_manager
        .create_review(&reviewed.id, &anonymous_review("Ola", 5))
        .await
        .unwrap();

    let filter = ClassFilter {
        min_rating: Some(4.0),
        ..Default::default()
    };
    let found = state.class_search.get_classes(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].class.id, reviewed.id);
    assert_eq!(found[0].avg_rating, Some(5.0));
}

#[tokio::test]
async fn price_sort_is_deterministic() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;

    for price in [70.0, 50.0, 60.0] {
        make_class(
            &state.db,
            &instructor.id,
            None,
            DanceStyle::Salsa,
            SkillLevel::Beginner,
            price,
            date(2026, 9, 1),
            date(2026, 12, 20),
        )
        .await;
    }

    let filter = ClassFilter {
        sort_by: Some(ClassSortKey::PriceAsc),
        ..Default::default()
    };
    let found = state.class_search.get_classes(&filter).await.unwrap();
    let prices: Vec<f64> = found.iter().map(|c| c.class.price).collect();
    assert_eq!(prices, vec![50.0, 60.0, 70.0]);
}

#[tokio::test]
async fn nearby_classes_use_great_circle_distance() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let krakow = make_location(&state.db, "Krakow studio", Some(KRAKOW)).await;
    let ungeocoded = make_location(&state.db, "Mystery studio", None).await;

    make_class(
        &state.db,
        &instructor.id,
        Some(&krakow.id),
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;
    make_class(
        &state.db,
        &instructor.id,
        Some(&ungeocoded.id),
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;

    let near = NearbyClassesParams {
        latitude: WARSAW.0,
        longitude: WARSAW.1,
        radius_km: 10.0,
        start_date: None,
        end_date: None,
        limit: None,
    };
    assert!(state
        .class_search
        .get_classes_near(&near)
        .await
        .unwrap()
        .is_empty());

    let wide = NearbyClassesParams {
        radius_km: 300.0,
        ..near
    };
    let found = state.class_search.get_classes_near(&wide).await.unwrap();
    assert_eq!(found.len(), 1);
    let distance = found[0].distance_km.unwrap();
    assert!((distance - 252.0).abs() < 5.0, "got {}", distance);
}

#[tokio::test]
async fn review_creation_is_atomic_and_duplicates_conflict() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let student = make_user(&state.db, UserRole::Student).await;
    let class = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;

    let created = state
        .review_manager
        .create_review(&class.id, &user_review(&student.id, 4))
        .await
        .unwrap();
    assert_eq!(created.author_name, Some(student.display_name()));
    assert!(!created.verified);

    let again = state
        .review_manager
        .create_review(&class.id, &user_review(&student.id, 5))
        .await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    // Nothing from the rejected attempt leaked into the facet tables.
    for table in [
        "reviews",
        "teaching_reviews",
        "environment_reviews",
        "music_reviews",
        "facilities_reviews",
    ] {
        let sql = format!("SELECT COUNT(*) AS n FROM {}", table);
        let n: i64 = sqlx::query(&sql)
            .fetch_one(state.db.pool())
            .await
            .unwrap()
            .get("n");
        assert_eq!(n, 1, "table {}", table);
    }
}

#[tokio::test]
async fn invalid_review_payload_writes_nothing() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let class = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;

    let mut payload = anonymous_review("Ola", 4);
    payload.overall_rating = 9;
    let result = state.review_manager.create_review(&class.id, &payload).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let n: i64 = sqlx::query("SELECT COUNT(*) AS n FROM reviews")
        .fetch_one(state.db.pool())
        .await
        .unwrap()
        .get("n");
    assert_eq!(n, 0);
}

#[tokio::test]
async fn review_pagination_arithmetic() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let class = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;

    for i in 0..7 {
        state
            .review_manager
            .create_review(
                &class.id,
                &anonymous_review(&format!("Reviewer {}", i), 1 + (i % 5)),
            )
            .await
            .unwrap();
    }

    let params = ReviewListParams {
        page: Some(1),
        page_size: Some(3),
        ..Default::default()
    };
    let page1 = state
        .review_manager
        .get_class_reviews_paginated(&class.id, &params)
        .await
        .unwrap();
    assert_eq!(page1.total, 7);
    assert_eq!(page1.pages, 3);
    assert_eq!(page1.items.len(), 3);
    assert!(page1.has_next);
    assert!(!page1.has_prev);

    let params = ReviewListParams {
        page: Some(3),
        page_size: Some(3),
        ..Default::default()
    };
    let page3 = state
        .review_manager
        .get_class_reviews_paginated(&class.id, &params)
        .await
        .unwrap();
    assert_eq!(page3.items.len(), 1);
    assert!(!page3.has_next);
    assert!(page3.has_prev);

    // A page past the end is empty rather than an error.
    let params = ReviewListParams {
        page: Some(5),
        page_size: Some(3),
        ..Default::default()
    };
    let beyond = state
        .review_manager
        .get_class_reviews_paginated(&class.id, &params)
        .await
        .unwrap();
    assert!(beyond.items.is_empty());
    assert!(!beyond.has_next);
    assert!(beyond.has_prev);

    // Even an absurdly large page number stays an empty page, not a panic.
    let params = ReviewListParams {
        page: Some(i64::MAX),
        page_size: Some(100),
        ..Default::default()
    };
    let far_beyond = state
        .review_manager
        .get_class_reviews_paginated(&class.id, &params)
        .await
        .unwrap();
    assert!(far_beyond.items.is_empty());
    assert_eq!(far_beyond.total, 7);
    assert!(!far_beyond.has_next);
    assert!(far_beyond.has_prev);
}

#[tokio::test]
async fn review_filters_and_sorts() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let class = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;

    for (name, rating) in [("A", 2), ("B", 4), ("C", 5)] {
        let mut payload = anonymous_review(name, rating);
        if rating == 5 {
            payload.music.genres = vec!["bachata".to_string()];
        }
        state
            .review_manager
            .create_review(&class.id, &payload)
            .await
            .unwrap();
    }

    let params = ReviewListParams {
        min_rating: Some(4),
        sort_by: Some(ReviewSortKey::RatingAsc),
        ..Default::default()
    };
    let page = state
        .review_manager
        .get_class_reviews_paginated(&class.id, &params)
        .await
        .unwrap();
    let ratings: Vec<i32> = page.items.iter().map(|r| r.overall_rating).collect();
    assert_eq!(ratings, vec![4, 5]);

    let params = ReviewListParams {
        genres: Some("bachata".to_string()),
        ..Default::default()
    };
    let page = state
        .review_manager
        .get_class_reviews_paginated(&class.id, &params)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].overall_rating, 5);
}

#[tokio::test]
async fn review_facet_filters_compose() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let admin = make_user(&state.db, UserRole::Admin).await;
    let class = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;

    // Low-slider, cold studio, indoor waiting area, medicover.
    let mut chill = anonymous_review("Chill", 5);
    chill.teaching.teaching_style = 20;
    chill.teaching.feedback_approach = 30;
    chill.teaching.pace_of_teaching = 25;
    chill.environment.temperature = Temperature::Cool;
    chill.facilities.waiting_area = WaitingAreaPayload {
        available: true,
        kind: Some(WaitingAreaKind::Indoor),
        seating: Some(true),
        notes: None,
    };
    chill.facilities.accepted_cards = vec![SportsCard::Medicover];
    let chill = state
        .review_manager
        .create_review(&class.id, &chill)
        .await
        .unwrap();

    // High-slider, hot studio, no changing room, no waiting area.
    let mut warm = anonymous_review("Warm", 3);
    warm.teaching.teaching_style = 85;
    warm.teaching.feedback_approach = 90;
    warm.teaching.pace_of_teaching = 80;
    warm.environment.temperature = Temperature::Warm;
    warm.facilities.changing_room = ChangingRoomPayload {
        available: false,
        quality: None,
        notes: None,
    };
    state
        .review_manager
        .create_review(&class.id, &warm)
        .await
        .unwrap();

    state
        .review_manager
        .verify_review(
            &chill.id,
            &VerifyReviewPayload {
                verifier_id: admin.id.clone(),
                method: "in_person".to_string(),
                notes: None,
            },
        )
        .await
        .unwrap();

    // Stacking every facet filter at once narrows to the verified cold review;
    // each clause needs its bind, so a mismatch fails here loudly.
    let params = ReviewListParams {
        verified_only: Some(true),
        teaching_style_min: Some(10),
        teaching_style_max: Some(50),
        feedback_approach_min: Some(20),
        feedback_approach_max: Some(40),
        pace_min: Some(10),
        pace_max: Some(40),
        temperature: Some(Temperature::Cool),
        cards: Some("medicover".to_string()),
        has_changing_room: Some(true),
        has_waiting_area: Some(true),
        ..Default::default()
    };
    let page = state
        .review_manager
        .get_class_reviews_paginated(&class.id, &params)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].id, chill.id);
    assert!(page.items[0].verified);

    // Tightening one bound past the match drops it.
    let params = ReviewListParams {
        teaching_style_min: Some(50),
        temperature: Some(Temperature::Cool),
        ..Default::default()
    };
    let page = state
        .review_manager
        .get_class_reviews_paginated(&class.id, &params)
        .await
        .unwrap();
    assert_eq!(page.total, 0);

    // Boolean facet filters also match the negative case.
    let params = ReviewListParams {
        has_waiting_area: Some(false),
        ..Default::default()
    };
    let page = state
        .review_manager
        .get_class_reviews_paginated(&class.id, &params)
        .await
        .unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].overall_rating, 3);
}

#[tokio::test]
async fn review_slice_and_method_vocabulary() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let class = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;
    for (name, rating) in [("A", 2), ("B", 5), ("C", 4)] {
        state
            .review_manager
            .create_review(&class.id, &anonymous_review(name, rating))
            .await
            .unwrap();
    }

    let top = state
        .review_manager
        .get_class_reviews(&class.id, 2, ReviewSortKey::RatingDesc)
        .await
        .unwrap();
    let ratings: Vec<i32> = top.iter().map(|r| r.overall_rating).collect();
    assert_eq!(ratings, vec![5, 4]);

    let methods: Vec<&str> = state
        .review_manager
        .verification_methods()
        .iter()
        .map(|m| m.as_str())
        .collect();
    assert_eq!(methods, vec!["in_person", "video", "photo"]);
}

#[tokio::test]
async fn class_stats_average_and_empty_default() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let class = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;

    let empty = state.review_stats.class_stats(&class.id).await.unwrap();
    assert_eq!(empty.total_reviews, 0);
    assert_eq!(empty.average_rating, 0.0);
    assert_eq!(empty.teaching.avg_breakdown_quality, 0.0);
    assert_eq!(
        state
            .review_stats
            .class_average_rating(&class.id)
            .await
            .unwrap(),
        None
    );

    for (name, rating) in [("A", 3), ("B", 4), ("C", 5)] {
        state
            .review_manager
            .create_review(&class.id, &anonymous_review(name, rating))
            .await
            .unwrap();
    }

    let stats = state.review_stats.class_stats(&class.id).await.unwrap();
    assert_eq!(stats.total_reviews, 3);
    assert!((stats.average_rating - 4.0).abs() < 1e-9);
    assert_eq!(stats.rating_distribution.get(&3), Some(&1));
    assert_eq!(stats.rating_distribution.get(&5), Some(&1));
    assert_eq!(stats.environment.temperature_distribution.get("moderate"), Some(&3));
    assert_eq!(stats.music.genre_distribution.get("salsa"), Some(&3));
    assert_eq!(
        stats
            .facilities
            .accepted_cards_distribution
            .get(SportsCard::Multisport.as_str()),
        Some(&3)
    );
    assert_eq!(stats.facilities.changing_room_available, 3);
    assert!((stats.facilities.avg_changing_room_quality - 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn verification_flips_flag_and_records_audit() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let admin = make_user(&state.db, UserRole::Admin).await;
    let class = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;
    let review = state
        .review_manager
        .create_review(&class.id, &anonymous_review("Ola", 4))
        .await
        .unwrap();

    let bad_method = state
        .review_manager
        .verify_review(
            &review.id,
            &VerifyReviewPayload {
                verifier_id: admin.id.clone(),
                method: "email".to_string(),
                notes: None,
            },
        )
        .await;
    assert!(matches!(bad_method, Err(AppError::Validation(_))));

    let verification = state
        .review_manager
        .verify_review(
            &review.id,
            &VerifyReviewPayload {
                verifier_id: admin.id.clone(),
                method: "in_person".to_string(),
                notes: Some("spoke with the reviewer".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(verification.review_id, review.id);

    let stats = state.review_stats.class_stats(&class.id).await.unwrap();
    assert_eq!(stats.verified_reviews, 1);

    let audits: i64 = sqlx::query("SELECT COUNT(*) AS n FROM review_verifications")
        .fetch_one(state.db.pool())
        .await
        .unwrap()
        .get("n");
    assert_eq!(audits, 1);
}

#[tokio::test]
async fn class_lifecycle_enforces_ownership() {
    let state = test_state().await;
    let owner = make_instructor(&state.db).await;
    let other = make_instructor(&state.db).await;
    let admin = make_user(&state.db, UserRole::Admin).await;
    let student = make_user(&state.db, UserRole::Student).await;

    let payload = ClassCreatePayload {
        name: "Salsa basics".to_string(),
        description: "Eight-week beginner course".to_string(),
        level: SkillLevel::Beginner,
        style: DanceStyle::Salsa,
        max_capacity: 20,
        price: 80.0,
        start_date: date(2026, 9, 1),
        end_date: date(2026, 10, 31),
        location_id: None,
    };

    let not_instructor = state.class_manager.create_class(&student.id, &payload).await;
    assert!(matches!(not_instructor, Err(AppError::Validation(_))));

    let class = state
        .class_manager
        .create_class(&owner.id, &payload)
        .await
        .unwrap();

    let patch = ClassUpdatePayload {
        price: Some(90.0),
        ..Default::default()
    };
    let forbidden = state
        .class_manager
        .update_class(&class.id, &other.id, &patch)
        .await;
    assert!(matches!(forbidden, Err(AppError::Forbidden(_))));

    let updated = state
        .class_manager
        .update_class(&class.id, &admin.id, &patch)
        .await
        .unwrap();
    assert_eq!(updated.price, 90.0);

    state
        .review_manager
        .create_review(&class.id, &anonymous_review("Ola", 5))
        .await
        .unwrap();
    state
        .class_manager
        .delete_class(&class.id, &owner.id)
        .await
        .unwrap();

    let orphans: i64 = sqlx::query("SELECT COUNT(*) AS n FROM reviews")
        .fetch_one(state.db.pool())
        .await
        .unwrap()
        .get("n");
    assert_eq!(orphans, 0);
}

#[tokio::test]
async fn location_filters_and_stats() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let busy = make_location(&state.db, "Busy studio", Some(WARSAW)).await;
    let quiet = make_location(&state.db, "Quiet studio", Some(KRAKOW)).await;

    for _ in 0..2 {
        make_class(
            &state.db,
            &instructor.id,
            Some(&busy.id),
            DanceStyle::Salsa,
            SkillLevel::Beginner,
            50.0,
            date(2026, 9, 1),
            date(2026, 12, 20),
        )
        .await;
    }
    let quiet_class = make_class(
        &state.db,
        &instructor.id,
        Some(&quiet.id),
        DanceStyle::Tango,
        SkillLevel::Advanced,
        60.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;

    let filter = LocationFilter {
        dance_style: Some(DanceStyle::Salsa),
        min_classes: Some(2),
        ..Default::default()
    };
    let found = state.location_search.get_locations(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].location.id, busy.id);
    assert_eq!(found[0].classes_count, 2);

    state
        .review_manager
        .create_review(&quiet_class.id, &anonymous_review("Ola", 5))
        .await
        .unwrap();
    let stats = state
        .location_search
        .get_location_stats(&quiet.id)
        .await
        .unwrap();
    assert_eq!(stats.total_reviews, 1);
    assert!((stats.average_rating - 5.0).abs() < 1e-9);

    let nearby = state
        .location_search
        .get_locations_nearby(&NearbyLocationsParams {
            latitude: WARSAW.0,
            longitude: WARSAW.1,
            radius_km: 300.0,
        })
        .await
        .unwrap();
    assert_eq!(nearby.len(), 2);
    assert_eq!(nearby[0].location.id, busy.id);
    assert!(nearby[1].distance_km.unwrap() > nearby[0].distance_km.unwrap());
}

#[tokio::test]
async fn instructor_listing_carries_aggregates() {
    let state = test_state().await;
    let reviewed = make_instructor(&state.db).await;
    let unreviewed = make_instructor(&state.db).await;

    let class = make_class(
        &state.db,
        &reviewed.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;
    make_class(
        &state.db,
        &unreviewed.id,
        None,
        DanceStyle::Tango,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;
    state
        .review_manager
        .create_review(&class.id, &anonymous_review("Ola", 4))
        .await
        .unwrap();

    let all = state
        .instructor_search
        .get_instructors(&InstructorFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let filter = InstructorFilter {
        min_rating: Some(3.0),
        ..Default::default()
    };
    let found = state.instructor_search.get_instructors(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, reviewed.id);
    assert_eq!(found[0].classes_count, 1);
    assert_eq!(found[0].reviews_count, 1);
    assert_eq!(found[0].avg_rating, Some(4.0));

    let stats = state
        .review_stats
        .instructor_stats(&reviewed.id)
        .await
        .unwrap();
    assert_eq!(stats.total_reviews, 1);
    assert!((stats.average_rating - 4.0).abs() < 1e-9);
    assert!((stats.teaching.avg_breakdown_quality - 4.0).abs() < 1e-9);
}

#[tokio::test]
async fn event_search_filters_and_distance() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let warsaw = make_location(&state.db, "Warsaw hall", Some(WARSAW)).await;
    let krakow = make_location(&state.db, "Krakow hall", Some(KRAKOW)).await;

    let september = state
        .db
        .create_event(danceclub::database::NewSpecialEvent {
            name: "Salsa night".to_string(),
            description: "Open party".to_string(),
            starts_at: "2026-09-12T19:00:00Z".parse().unwrap(),
            capacity: 100,
            price: 20.0,
            location_id: warsaw.id.clone(),
            instructor_id: instructor.id.clone(),
            image_url: None,
        })
        .await
        .unwrap();
    state
        .db
        .create_event(danceclub::database::NewSpecialEvent {
            name: "Tango gala".to_string(),
            description: "Winter gala".to_string(),
            starts_at: "2026-12-05T20:00:00Z".parse().unwrap(),
            capacity: 80,
            price: 35.0,
            location_id: krakow.id.clone(),
            instructor_id: instructor.id.clone(),
            image_url: None,
        })
        .await
        .unwrap();

    let filter = EventFilter {
        start_date: Some(date(2026, 9, 1)),
        end_date: Some(date(2026, 9, 30)),
        ..Default::default()
    };
    let found = state.event_search.get_events(&filter).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].event.id, september.id);

    let nearby = state
        .event_search
        .get_events_near(&NearbyEventsParams {
            latitude: WARSAW.0,
            longitude: WARSAW.1,
            radius_km: 50.0,
            limit: None,
        })
        .await
        .unwrap();
    assert_eq!(nearby.len(), 1);
    assert_eq!(nearby[0].event.id, september.id);

    let missing = state.event_search.get_event("nope").await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn special_schedules_link_replaced_slots() {
    let state = test_state().await;
    let instructor = make_instructor(&state.db).await;
    let class = make_class(
        &state.db,
        &instructor.id,
        None,
        DanceStyle::Salsa,
        SkillLevel::Beginner,
        50.0,
        date(2026, 9, 1),
        date(2026, 12, 20),
    )
    .await;

    let weekly = state
        .db
        .create_recurring_schedule(danceclub::database::NewRecurringSchedule {
            class_id: class.id.clone(),
            day_of_week: 2,
            start_time: "19:00:00".parse().unwrap(),
            end_time: "20:30:00".parse().unwrap(),
            status: danceclub::core::ScheduleStatus::Active,
        })
        .await
        .unwrap();

    state
        .db
        .create_special_schedule(danceclub::database::NewSpecialSchedule {
            class_id: class.id.clone(),
            date: date(2026, 10, 7),
            start_time: "18:00:00".parse().unwrap(),
            end_time: "19:30:00".parse().unwrap(),
            status: danceclub::core::SpecialScheduleStatus::Rescheduled,
            replaces: danceclub::models::Replaces::Schedule {
                schedule_id: weekly.id.clone(),
                date: date(2026, 10, 6),
            },
            note: Some("moved for a workshop".to_string()),
        })
        .await
        .unwrap();

    let schedule = state
        .class_search
        .get_recurring_schedules(&class.id)
        .await
        .unwrap();
    assert_eq!(schedule.len(), 1);
    assert_eq!(schedule[0].day_name(), "Wednesday");

    let specials = state
        .class_search
        .get_special_schedules(&class.id)
        .await
        .unwrap();
    assert_eq!(specials.len(), 1);
    match &specials[0].replaces {
        danceclub::models::Replaces::Schedule { schedule_id, date: d } => {
            assert_eq!(schedule_id, &weekly.id);
            assert_eq!(*d, date(2026, 10, 6));
        }
        other => panic!("expected a replacement link, got {:?}", other),
    }
}

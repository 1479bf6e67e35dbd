use crate::{
    config::Config,
    database::Database,
    services::{
        class_manager::ClassManagerService, class_search::ClassSearchService,
        event_search::EventSearchService, instructor_search::InstructorSearchService,
        location_search::LocationSearchService, review_manager::ReviewManagerService,
        review_stats::ReviewStatsService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub class_search: ClassSearchService,
    pub location_search: LocationSearchService,
    pub instructor_search: InstructorSearchService,
    pub event_search: EventSearchService,
    pub class_manager: ClassManagerService,
    pub review_manager: ReviewManagerService,
    pub review_stats: ReviewStatsService,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let db = Database::connect(&config.database.url).await?;
        db.init().await?;
        Ok(Self::with_database(db, config))
    }

    pub fn with_database(db: Database, config: Config) -> Self {
        Self {
            class_search: ClassSearchService::new(db.clone()),
            location_search: LocationSearchService::new(db.clone()),
            instructor_search: InstructorSearchService::new(db.clone()),
            event_search: EventSearchService::new(db.clone()),
            class_manager: ClassManagerService::new(db.clone()),
            review_manager: ReviewManagerService::new(db.clone()),
            review_stats: ReviewStatsService::new(db.clone()),
            db,
            config,
        }
    }
}

use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::{DatabaseError, DatabaseManager, JobRepository, UserRepository};
use crate::services::{mailer, Geocoder, MapQuestGeocoder, Mailer, ResumeStore};

/// Shared handles passed to every handler. Cloning is cheap: the pool and the
/// service clients are reference counted.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseManager,
    pub users: UserRepository,
    pub jobs: JobRepository,
    pub geocoder: Arc<dyn Geocoder>,
    pub mailer: Arc<dyn Mailer>,
    pub resumes: ResumeStore,
}

impl AppState {
    pub fn new(db: DatabaseManager, geocoder: Arc<dyn Geocoder>, mailer: Arc<dyn Mailer>, resumes: ResumeStore) -> Self {
        let pool = db.pool().clone();
        Self {
            users: UserRepository::new(pool.clone()),
            jobs: JobRepository::new(pool),
            db,
            geocoder,
            mailer,
            resumes,
        }
    }

    /// Wires the production services from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self, DatabaseError> {
        let db = DatabaseManager::connect_lazy(&config.database)?;
        Ok(Self::new(
            db,
            Arc::new(MapQuestGeocoder::new(&config.geocoder)),
            mailer::from_config(&config.mail),
            ResumeStore::from_config(&config.server),
        ))
    }
}

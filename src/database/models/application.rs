use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A job-seeker's application to a job, with the stored resume file name
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub resume: String,
    pub applied_at: DateTime<Utc>,
}

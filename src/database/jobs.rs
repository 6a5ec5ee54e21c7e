use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{Application, Job, JobChanges, JobStats, Location, NewJob};
use crate::database::query_builder::QueryBuilder;
use crate::filter::api_filters::escape_like;
use crate::filter::Filter;

/// Mean earth radius used for radius searches
pub const EARTH_RADIUS_MILES: f64 = 3963.0;

/// Store access for jobs and the applications made to them
#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Runs a filter built over the jobs collection
    pub async fn select_any(&self, filter: &Filter) -> Result<Vec<Value>, DatabaseError> {
        QueryBuilder::new(filter).select_all(&self.pool).await
    }

    pub async fn create(&self, job: &NewJob, location: &Location, owner: Uuid) -> Result<Job, DatabaseError> {
        let created = sqlx::query_as::<_, Job>(
            "INSERT INTO jobs (id, title, slug, description, email, address, \
             longitude, latitude, formatted_address, city, state, zipcode, country, \
             company, industry, job_type, min_education, positions, experience, salary, \
             last_date, user_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, \
             COALESCE($21, now() + INTERVAL '7 days'), $22) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&job.title)
        .bind(&job.slug)
        .bind(&job.description)
        .bind(&job.email)
        .bind(&job.address)
        .bind(location.longitude)
        .bind(location.latitude)
        .bind(&location.formatted_address)
        .bind(&location.city)
        .bind(&location.state)
        .bind(&location.zipcode)
        .bind(&location.country)
        .bind(&job.company)
        .bind(&job.industry)
        .bind(&job.job_type)
        .bind(&job.min_education)
        .bind(job.positions)
        .bind(&job.experience)
        .bind(job.salary)
        .bind(job.last_date)
        .bind(owner)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Job>, DatabaseError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    pub async fn find_by_id_and_slug(&self, id: Uuid, slug: &str) -> Result<Option<Job>, DatabaseError> {
        let job = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE id = $1 AND slug = $2")
            .bind(id)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    pub async fn update(&self, id: Uuid, changes: &JobChanges) -> Result<Job, DatabaseError> {
        let location = changes.location.as_ref();
        let updated = sqlx::query_as::<_, Job>(
            "UPDATE jobs SET \
             title = COALESCE($2, title), \
             slug = COALESCE($3, slug), \
             description = COALESCE($4, description), \
             email = COALESCE($5, email), \
             address = COALESCE($6, address), \
             company = COALESCE($7, company), \
             industry = COALESCE($8, industry), \
             job_type = COALESCE($9, job_type), \
             min_education = COALESCE($10, min_education), \
             positions = COALESCE($11, positions), \
             experience = COALESCE($12, experience), \
             salary = COALESCE($13, salary), \
             last_date = COALESCE($14, last_date), \
             longitude = CASE WHEN $15 THEN $16 ELSE longitude END, \
             latitude = CASE WHEN $15 THEN $17 ELSE latitude END, \
             formatted_address = CASE WHEN $15 THEN $18 ELSE formatted_address END, \
             city = CASE WHEN $15 THEN $19 ELSE city END, \
             state = CASE WHEN $15 THEN $20 ELSE state END, \
             zipcode = CASE WHEN $15 THEN $21 ELSE zipcode END, \
             country = CASE WHEN $15 THEN $22 ELSE country END, \
             version = version + 1 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(&changes.title)
        .bind(&changes.slug)
        .bind(&changes.description)
        .bind(&changes.email)
        .bind(&changes.address)
        .bind(&changes.company)
        .bind(&changes.industry)
        .bind(&changes.job_type)
        .bind(&changes.min_education)
        .bind(changes.positions)
        .bind(&changes.experience)
        .bind(changes.salary)
        .bind(changes.last_date)
        .bind(location.is_some())
        .bind(location.and_then(|l| l.longitude))
        .bind(location.and_then(|l| l.latitude))
        .bind(location.and_then(|l| l.formatted_address.clone()))
        .bind(location.and_then(|l| l.city.clone()))
        .bind(location.and_then(|l| l.state.clone()))
        .bind(location.and_then(|l| l.zipcode.clone()))
        .bind(location.and_then(|l| l.country.clone()))
        .fetch_optional(&self.pool)
        .await?;
        updated.ok_or_else(|| DatabaseError::NotFound("Job not found".to_string()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Jobs whose coordinates lie within `miles` of the given point (haversine distance)
    pub async fn within_radius(&self, longitude: f64, latitude: f64, miles: f64) -> Result<Vec<Job>, DatabaseError> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT * FROM jobs \
             WHERE longitude IS NOT NULL AND latitude IS NOT NULL \
             AND 2 * $4 * asin(LEAST(1.0, sqrt( \
                 power(sin(radians(latitude - $2) / 2), 2) + \
                 cos(radians($2)) * cos(radians(latitude)) * power(sin(radians(longitude - $1) / 2), 2) \
             ))) <= $3 \
             ORDER BY posting_date DESC, id",
        )
        .bind(longitude)
        .bind(latitude)
        .bind(miles)
        .bind(EARTH_RADIUS_MILES)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    /// Salary and position aggregates per experience level over jobs whose title
    /// contains `topic`
    pub async fn stats(&self, topic: &str) -> Result<Vec<JobStats>, DatabaseError> {
        let stats = sqlx::query_as::<_, JobStats>(
            "SELECT experience, \
             COUNT(*) AS total_jobs, \
             AVG(salary)::float8 AS avg_salary, \
             AVG(positions)::float8 AS avg_positions, \
             MIN(salary) AS min_salary, \
             MAX(salary) AS max_salary \
             FROM jobs WHERE title ILIKE $1 \
             GROUP BY experience ORDER BY experience",
        )
        .bind(format!("%{}%", escape_like(topic)))
        .fetch_all(&self.pool)
        .await?;
        Ok(stats)
    }

    pub async fn published_by(&self, owner: Uuid) -> Result<Vec<Job>, DatabaseError> {
        let jobs = sqlx::query_as::<_, Job>("SELECT * FROM jobs WHERE user_id = $1 ORDER BY posting_date DESC, id")
            .bind(owner)
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    pub async fn applied_by(&self, applicant: Uuid) -> Result<Vec<Job>, DatabaseError> {
        let jobs = sqlx::query_as::<_, Job>(
            "SELECT j.* FROM jobs j JOIN job_applications a ON a.job_id = j.id \
             WHERE a.user_id = $1 ORDER BY a.applied_at DESC",
        )
        .bind(applicant)
        .fetch_all(&self.pool)
        .await?;
        Ok(jobs)
    }

    pub async fn has_applied(&self, job_id: Uuid, applicant: Uuid) -> Result<bool, DatabaseError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM job_applications WHERE job_id = $1 AND user_id = $2)",
        )
        .bind(job_id)
        .bind(applicant)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn add_application(&self, job_id: Uuid, applicant: Uuid, resume: &str) -> Result<Application, DatabaseError> {
        let application = sqlx::query_as::<_, Application>(
            "INSERT INTO job_applications (job_id, user_id, resume) VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(job_id)
        .bind(applicant)
        .bind(resume)
        .fetch_one(&self.pool)
        .await?;
        Ok(application)
    }

    /// Resume files submitted to one job
    pub async fn resumes_for_job(&self, job_id: Uuid) -> Result<Vec<String>, DatabaseError> {
        let resumes = sqlx::query_scalar("SELECT resume FROM job_applications WHERE job_id = $1")
            .bind(job_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(resumes)
    }

    /// Resume files that disappear with an account: those the user submitted and
    /// those submitted to the user's own jobs
    pub async fn resumes_for_account(&self, user_id: Uuid) -> Result<Vec<String>, DatabaseError> {
        let resumes = sqlx::query_scalar(
            "SELECT resume FROM job_applications \
             WHERE user_id = $1 OR job_id IN (SELECT id FROM jobs WHERE user_id = $1)",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(resumes)
    }
}

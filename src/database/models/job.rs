use chrono::{DateTime, Utc};
use serde::{ser::SerializeMap, Deserialize, Serialize, Serializer};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;
use crate::validation::{is_valid_email, FieldErrors};

pub const INDUSTRIES: &[&str] = &[
    "Business",
    "Information Technology",
    "Banking",
    "Education/Training",
    "Telecommunication",
    "Others",
];
pub const JOB_TYPES: &[&str] = &["Permanent", "Temporary", "Internship"];
pub const EDUCATION_LEVELS: &[&str] = &["Bachelors", "Masters", "Phd"];
pub const EXPERIENCE_LEVELS: &[&str] = &["No Experience", "1 Year - 2 Years", "2 Years - 5 Years", "5 Years+"];

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Geocoded position of a job. Serializes as a GeoJSON-style point, or `null`
/// when the job has not been geocoded.
#[derive(Debug, Clone, Default, PartialEq, FromRow)]
pub struct Location {
    pub longitude: Option<f64>,
    pub latitude: Option<f64>,
    pub formatted_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub country: Option<String>,
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (Some(lng), Some(lat)) = (self.longitude, self.latitude) else {
            return serializer.serialize_none();
        };
        let mut map = serializer.serialize_map(Some(7))?;
        map.serialize_entry("type", "Point")?;
        map.serialize_entry("coordinates", &[lng, lat])?;
        map.serialize_entry("formattedAddress", &self.formatted_address)?;
        map.serialize_entry("city", &self.city)?;
        map.serialize_entry("state", &self.state)?;
        map.serialize_entry("zipcode", &self.zipcode)?;
        map.serialize_entry("country", &self.country)?;
        map.end()
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub email: Option<String>,
    pub address: String,
    #[sqlx(flatten)]
    pub location: Location,
    pub company: String,
    pub industry: Vec<String>,
    pub job_type: String,
    pub min_education: String,
    pub positions: i32,
    pub experience: String,
    pub salary: i64,
    pub posting_date: DateTime<Utc>,
    pub last_date: DateTime<Utc>,
    #[serde(rename = "user")]
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub version: i32,
}

impl Job {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    pub fn is_closed(&self, now: DateTime<Utc>) -> bool {
        self.last_date < now
    }
}

/// Accepts numbers sent either as JSON numbers or as numeric strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Numeric {
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            Numeric::Int(i) => Some(*i),
            Numeric::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            Numeric::Float(_) => None,
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        }
    }
}

/// Body of create and update requests. Every field is optional here; which ones
/// are required depends on the operation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub company: Option<String>,
    pub industry: Option<OneOrMany>,
    pub job_type: Option<String>,
    pub min_education: Option<String>,
    pub positions: Option<Numeric>,
    pub experience: Option<String>,
    pub salary: Option<Numeric>,
    pub last_date: Option<DateTime<Utc>>,
}

/// Validated input for a new job; location is filled in by the geocoder.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub slug: String,
    pub description: String,
    pub email: Option<String>,
    pub address: String,
    pub company: String,
    pub industry: Vec<String>,
    pub job_type: String,
    pub min_education: String,
    pub positions: i32,
    pub experience: String,
    pub salary: i64,
    pub last_date: Option<DateTime<Utc>>,
}

/// Validated partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default)]
pub struct JobChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub location: Option<Location>,
    pub company: Option<String>,
    pub industry: Option<Vec<String>>,
    pub job_type: Option<String>,
    pub min_education: Option<String>,
    pub positions: Option<i32>,
    pub experience: Option<String>,
    pub salary: Option<i64>,
    pub last_date: Option<DateTime<Utc>>,
}

impl JobRequest {
    pub fn validate_new(self) -> Result<NewJob, ApiError> {
        let mut errors = FieldErrors::new();

        let title = errors.required("title", self.title.as_deref(), "Please enter job title.");
        let description = errors.required("description", self.description.as_deref(), "Please enter job description.");
        let address = errors.required("address", self.address.as_deref(), "Please enter an address.");
        let company = errors.required("company", self.company.as_deref(), "Please enter company name.");
        let job_type = errors.required("jobType", self.job_type.as_deref(), "Please enter job type.");
        let min_education = errors.required(
            "minEducation",
            self.min_education.as_deref(),
            "Please enter minimum education for the job.",
        );
        let experience = errors.required(
            "experience",
            self.experience.as_deref(),
            "Please enter experience required for the job",
        );
        if self.industry.is_none() {
            errors.add("industry", "Please enter industry for the job.");
        }
        if self.salary.is_none() {
            errors.add("salary", "Please enter expected salary for this job.");
        }

        let checked = check_fields(&mut errors, &self);
        errors.finish()?;

        let (Some(title), Some(description), Some(address), Some(company), Some(job_type), Some(min_education), Some(experience)) =
            (title, description, address, company, job_type, min_education, experience)
        else {
            return Err(ApiError::validation_error("Invalid job data", None));
        };

        Ok(NewJob {
            title: title.to_string(),
            slug: slugify(title),
            description: description.to_string(),
            email: checked.email,
            address: address.to_string(),
            company: company.to_string(),
            industry: checked.industry.unwrap_or_default(),
            job_type: job_type.to_string(),
            min_education: min_education.to_string(),
            positions: checked.positions.unwrap_or(1),
            experience: experience.to_string(),
            salary: checked.salary.unwrap_or_default(),
            last_date: self.last_date,
        })
    }

    pub fn validate_changes(self) -> Result<JobChanges, ApiError> {
        let mut errors = FieldErrors::new();

        let mut require = |field: &str, value: &Option<String>, message: &str| -> Option<String> {
            value
                .as_deref()
                .and_then(|v| errors.required(field, Some(v), message))
                .map(str::to_string)
        };
        let title = require("title", &self.title, "Please enter job title.");
        let description = require("description", &self.description, "Please enter job description.");
        let address = require("address", &self.address, "Please enter an address.");
        let company = require("company", &self.company, "Please enter company name.");
        let job_type = require("jobType", &self.job_type, "Please enter job type.");
        let min_education = require("minEducation", &self.min_education, "Please enter minimum education for the job.");
        let experience = require("experience", &self.experience, "Please enter experience required for the job");

        let checked = check_fields(&mut errors, &self);
        errors.finish()?;

        Ok(JobChanges {
            slug: title.as_deref().map(slugify),
            title,
            description,
            email: checked.email,
            address,
            location: None,
            company,
            industry: checked.industry,
            job_type,
            min_education,
            positions: checked.positions,
            experience,
            salary: checked.salary,
            last_date: self.last_date,
        })
    }
}

struct CheckedFields {
    email: Option<String>,
    industry: Option<Vec<String>>,
    positions: Option<i32>,
    salary: Option<i64>,
}

/// Length, enumeration and number rules shared by create and update.
fn check_fields(errors: &mut FieldErrors, req: &JobRequest) -> CheckedFields {
    if let Some(title) = req.title.as_deref() {
        if title.trim().chars().count() > MAX_TITLE_LEN {
            errors.add("title", "Job title cannot exceed 100 characters.");
        }
    }
    if let Some(description) = req.description.as_deref() {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            errors.add("description", "Job description cannot exceed 1000 characters.");
        }
    }

    let email = match req.email.as_deref().map(str::trim) {
        Some("") | None => None,
        Some(email) => {
            if !is_valid_email(email) {
                errors.add("email", "Please enter valid email address.");
            }
            Some(email.to_string())
        }
    };

    let industry = req.industry.clone().map(OneOrMany::into_vec);
    if let Some(values) = industry.as_ref() {
        if values.is_empty() {
            errors.add("industry", "Please enter industry for the job.");
        } else if !values.iter().all(|v| INDUSTRIES.contains(&v.as_str())) {
            errors.add("industry", "Please select correct option for industry.");
        }
    }
    if let Some(job_type) = req.job_type.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        errors.one_of("jobType", job_type, JOB_TYPES, "Please select correct option for job type.");
    }
    if let Some(level) = req.min_education.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        errors.one_of("minEducation", level, EDUCATION_LEVELS, "Please select correct option for Education");
    }
    if let Some(level) = req.experience.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        errors.one_of("experience", level, EXPERIENCE_LEVELS, "Please select correct option for experience.");
    }

    let positions = req.positions.as_ref().and_then(|p| {
        let value = p.to_i64().and_then(|n| i32::try_from(n).ok()).filter(|n| *n >= 1);
        if value.is_none() {
            errors.add("positions", "Positions must be a positive whole number.");
        }
        value
    });
    let salary = req.salary.as_ref().and_then(|s| {
        let value = s.to_i64().filter(|n| *n >= 0);
        if value.is_none() {
            errors.add("salary", "Salary must be a non-negative whole number.");
        }
        value
    });

    CheckedFields {
        email,
        industry,
        positions,
        salary,
    }
}

/// Lowercase, hyphen separated form of a title: "Senior Rust Dev!" -> "senior-rust-dev".
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Aggregate over the jobs in one experience bucket
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobStats {
    pub experience: String,
    pub total_jobs: i64,
    pub avg_salary: f64,
    pub avg_positions: f64,
    pub min_salary: i64,
    pub max_salary: i64,
}

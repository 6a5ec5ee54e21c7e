use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;
use crate::validation::{is_valid_email, FieldErrors};

pub const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    #[serde(alias = "employeer")]
    Employer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Employer => "employer",
            Role::Admin => "admin",
        }
    }

    /// Roles a client may pick for itself at registration
    pub fn parse_self_assignable(value: &str) -> Option<Self> {
        match value {
            "user" => Some(Role::User),
            "employer" | "employeer" => Some(Role::Employer),
            _ => None,
        }
    }
}

impl TryFrom<String> for Role {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "user" => Ok(Role::User),
            "employer" | "employeer" => Ok(Role::Employer),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub reset_password_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_password_expire: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub version: i32,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Registration input that passed validation
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<NewUser, ApiError> {
        let mut errors = FieldErrors::new();

        let name = errors.required("name", self.name.as_deref(), "Please enter name.");
        let email = errors.required("email", self.email.as_deref(), "Please enter email.");
        if let Some(email) = email {
            if !is_valid_email(email) {
                errors.add("email", "Please enter valid email.");
            }
        }
        let password = validate_password(&mut errors, "password", self.password.as_deref());
        let role = match self.role.as_deref().map(str::trim) {
            None | Some("") => Some(Role::User),
            Some(value) => {
                let role = Role::parse_self_assignable(value);
                if role.is_none() {
                    errors.add("role", "Please select correct role");
                }
                role
            }
        };

        let new_user = match (name, email, password, role) {
            (Some(name), Some(email), Some(password), Some(role)) if errors.is_empty() => NewUser {
                name: name.to_string(),
                email: email.to_lowercase(),
                password: password.to_string(),
                role,
            },
            _ => {
                errors.finish()?;
                return Err(ApiError::validation_error("Invalid user data", None));
            }
        };
        Ok(new_user)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    /// Returns the trimmed (name, email) pair; absent fields keep their stored value.
    pub fn validate(self) -> Result<(Option<String>, Option<String>), ApiError> {
        let mut errors = FieldErrors::new();

        let name = match self.name.as_deref() {
            Some(raw) => errors.required("name", Some(raw), "Please enter name.").map(str::to_string),
            None => None,
        };
        let email = match self.email.as_deref() {
            Some(raw) => errors
                .required("email", Some(raw), "Please enter email.")
                .map(str::to_lowercase),
            None => None,
        };
        if let Some(email) = email.as_deref() {
            if !is_valid_email(email) {
                errors.add("email", "Please enter valid email.");
            }
        }

        errors.finish()?;
        Ok((name, email))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub password: Option<String>,
}

/// Shared password rule: present and at least eight characters.
pub fn validate_password<'a>(errors: &mut FieldErrors, field: &str, value: Option<&'a str>) -> Option<&'a str> {
    match value {
        None | Some("") => {
            errors.add(field, "Please enter password.");
            None
        }
        Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
            errors.add(field, "Password must be 8 characters long.");
            None
        }
        Some(p) => Some(p),
    }
}

/// Title and posting date of a job owned by the user, shown on the profile
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PostedJob {
    pub id: Uuid,
    pub title: String,
    pub posting_date: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    pub jobs_posted: Vec<PostedJob>,
}

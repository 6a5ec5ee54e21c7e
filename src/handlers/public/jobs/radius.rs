// handlers/public/jobs/radius.rs - GET /api/v1/jobs/:zipcode/:distance handler

use axum::extract::{Path, State};

use crate::database::models::Job;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::GeocodeError;
use crate::state::AppState;

/// Jobs within `distance` miles of the geocoded postal code.
pub async fn jobs_in_radius_get(
    State(state): State<AppState>,
    Path((zipcode, distance)): Path<(String, String)>,
) -> ApiResult<Vec<Job>> {
    let miles = parse_distance(&distance)?;

    let origin = state.geocoder.geocode(&zipcode).await?;
    let (Some(longitude), Some(latitude)) = (origin.longitude, origin.latitude) else {
        return Err(GeocodeError::NoMatch(zipcode).into());
    };

    let jobs = state.jobs.within_radius(longitude, latitude, miles).await?;
    Ok(ApiResponse::counted(jobs))
}

fn parse_distance(raw: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|d| d.is_finite() && *d >= 0.0)
        .ok_or_else(|| ApiError::field_error("distance", "Distance must be a non-negative number of miles"))
}

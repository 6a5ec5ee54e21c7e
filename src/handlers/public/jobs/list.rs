// handlers/public/jobs/list.rs - GET /api/v1/jobs handler

use axum::extract::{RawQuery, State};
use serde_json::Value;

use crate::filter::{ApiFilters, Filter, FilterRequest, JOBS};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Lists jobs through the full query-string pipeline:
/// `?jobType=Permanent&salary[gte]=50000&q=rust-dev&sort=-salary&fields=title&page=2&limit=5`
pub async fn jobs_get(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<Vec<Value>> {
    let request = FilterRequest::parse(query.as_deref().unwrap_or_default());
    let filter = ApiFilters::new(Filter::new(&JOBS), &request)
        .filter()?
        .search_by_query()?
        .sort()?
        .limit_fields()?
        .paginate()
        .into_query();

    let jobs = state.jobs.select_any(&filter).await?;
    Ok(ApiResponse::results(jobs))
}

// handlers/elevated/users/list.rs - GET /api/v1/users handler

use axum::extract::{RawQuery, State};
use serde_json::Value;

use crate::filter::{ApiFilters, Filter, FilterRequest, USERS};
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// Lists accounts with the same query-string pipeline as the job list. Credentials
/// are not in the users catalogue and so can neither be selected nor filtered on.
/// `count` is the total number of matches across all pages.
pub async fn users_get(State(state): State<AppState>, RawQuery(query): RawQuery) -> ApiResult<Vec<Value>> {
    let request = FilterRequest::parse(query.as_deref().unwrap_or_default());
    let filter = ApiFilters::new(Filter::new(&USERS), &request)
        .filter()?
        .search_by_query()?
        .sort()?
        .limit_fields()?
        .paginate()
        .into_query();

    let users = state.users.select_any(&filter).await?;
    let total = state.users.count_any(&filter).await?;
    Ok(ApiResponse::results(users).with_count(usize::try_from(total).unwrap_or_default()))
}

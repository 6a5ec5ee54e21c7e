use serde_json::Value;

use super::error::FilterError;
use super::filter::{Filter, Projection};
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::request::FilterRequest;
use super::types::{FilterOp, FilterWhereInfo};
use crate::config;

/// Applies the query-string driven stages (filter, search, sort, projection,
/// pagination) to a base query. Stages may run in any order; paging is rendered
/// last in the generated SQL regardless.
pub struct ApiFilters<'a> {
    query: Filter,
    request: &'a FilterRequest,
}

impl<'a> ApiFilters<'a> {
    pub fn new(query: Filter, request: &'a FilterRequest) -> Self {
        Self { query, request }
    }

    pub fn filter(mut self) -> Result<Self, FilterError> {
        let conditions = FilterWhere::parse(self.query.collection(), self.request.predicates())?;
        self.query = self.query.find(conditions);
        Ok(self)
    }

    /// `q=senior-rust` matches documents whose search field contains "senior rust",
    /// ignoring case.
    pub fn search_by_query(mut self) -> Result<Self, FilterError> {
        let Some(q) = self.request.text("q") else {
            return Ok(self);
        };
        let term = q.split('-').collect::<Vec<_>>().join(" ");
        if term.trim().is_empty() {
            return Ok(self);
        }

        let collection = self.query.collection();
        let field = collection
            .field(collection.search_field)
            .ok_or_else(|| FilterError::UnknownField(collection.search_field.to_string()))?;
        let condition = FilterWhereInfo {
            field,
            operator: FilterOp::ILike,
            data: Value::String(format!("%{}%", escape_like(&term))),
        };
        self.query = self.query.find(vec![condition]);
        Ok(self)
    }

    pub fn sort(mut self) -> Result<Self, FilterError> {
        let spec = self
            .request
            .text("sort")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(self.query.collection().default_sort);
        let order = FilterOrder::validate_and_parse(self.query.collection(), spec)?;
        self.query = self.query.sort(order);
        Ok(self)
    }

    pub fn limit_fields(mut self) -> Result<Self, FilterError> {
        let projection = match self.request.text("fields") {
            Some(spec) => Projection::parse(self.query.collection(), spec)?,
            None => Projection::Default,
        };
        self.query = self.query.select(projection);
        Ok(self)
    }

    pub fn paginate(mut self) -> Self {
        let page = positive(self.request.text("page")).unwrap_or(1);
        let limit = positive(self.request.text("limit"))
            .unwrap_or(config::config().filter.default_page_size);

        self.query = self.query.limit(limit);
        let applied = self.query.applied_limit().unwrap_or(limit);
        self.query = self.query.skip((page - 1).saturating_mul(applied));
        self
    }

    pub fn into_query(self) -> Filter {
        self.query
    }
}

fn positive(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok()).filter(|n| *n >= 1)
}

pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

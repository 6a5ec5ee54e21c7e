use super::catalog::Collection;
use super::error::FilterError;
use super::types::{FilterOrderInfo, SortDirection};

pub struct FilterOrder;

impl FilterOrder {
    /// Parses `-salary,title`: comma separated field names, a leading `-` sorts
    /// descending.
    pub fn validate_and_parse(collection: &Collection, spec: &str) -> Result<Vec<FilterOrderInfo>, FilterError> {
        let mut out = Vec::new();
        for part in spec.split(',') {
            let trimmed = part.trim();
            if trimmed.is_empty() {
                continue;
            }

            let (name, sort) = match trimmed.strip_prefix('-') {
                Some(name) => (name, SortDirection::Desc),
                None => (trimmed.strip_prefix('+').unwrap_or(trimmed), SortDirection::Asc),
            };

            let field = collection
                .field(name)
                .ok_or_else(|| FilterError::UnknownField(name.to_string()))?;
            if !field.sortable {
                return Err(FilterError::FieldNotSortable(name.to_string()));
            }
            out.push(FilterOrderInfo { field, sort });
        }
        Ok(out)
    }

    pub fn generate(infos: &[FilterOrderInfo]) -> String {
        if infos.is_empty() {
            return String::new();
        }
        let parts: Vec<String> = infos
            .iter()
            .map(|i| format!("{} {}", i.field.sql(), i.sort.to_sql()))
            .collect();
        format!("ORDER BY {}", parts.join(", "))
    }
}

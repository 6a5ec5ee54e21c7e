use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;
use uuid::Uuid;

use super::catalog::{Collection, FieldKind, FieldSpec};
use super::error::FilterError;
use super::request::FilterValue;
use super::types::{FilterOp, FilterWhereInfo};

pub struct FilterWhere {
    param_values: Vec<Value>,
    param_index: usize,
}

impl FilterWhere {
    pub fn new(starting_param_index: usize) -> Self {
        Self {
            param_values: vec![],
            param_index: starting_param_index,
        }
    }

    /// Turns field predicates into typed conditions. Operators are only recognised as
    /// keys nested under a field, so a parameter that happens to be named `gt` is
    /// treated like any other field name.
    pub fn parse<'a>(
        collection: &Collection,
        predicates: impl IntoIterator<Item = (&'a str, &'a FilterValue)>,
    ) -> Result<Vec<FilterWhereInfo>, FilterError> {
        let mut conditions = vec![];

        for (name, value) in predicates {
            let field = collection
                .field(name)
                .ok_or_else(|| FilterError::UnknownField(name.to_string()))?;
            if !field.filterable {
                return Err(FilterError::FieldNotFilterable(name.to_string()));
            }

            match value {
                FilterValue::Text(s) => conditions.push(FilterWhereInfo {
                    field,
                    operator: FilterOp::Eq,
                    data: coerce(field, s)?,
                }),
                FilterValue::List(items) => conditions.push(FilterWhereInfo {
                    field,
                    operator: FilterOp::In,
                    data: coerce_all(field, items.iter().map(String::as_str))?,
                }),
                FilterValue::Nested(ops) => {
                    for (op_key, op_value) in ops {
                        let operator = FilterOp::from_key(op_key)
                            .ok_or_else(|| FilterError::UnsupportedOperator(op_key.clone()))?;
                        conditions.push(Self::parse_operator(field, operator, op_value)?);
                    }
                }
            }
        }

        Ok(conditions)
    }

    fn parse_operator(
        field: &'static FieldSpec,
        operator: FilterOp,
        value: &FilterValue,
    ) -> Result<FilterWhereInfo, FilterError> {
        let data = match (operator, value) {
            (FilterOp::In, FilterValue::Text(s)) => {
                coerce_all(field, s.split(',').map(str::trim).filter(|s| !s.is_empty()))?
            }
            (FilterOp::In, FilterValue::List(items)) => {
                coerce_all(field, items.iter().map(String::as_str))?
            }
            (_, FilterValue::Text(s)) => {
                if field.kind == FieldKind::TextList {
                    return Err(FilterError::InvalidOperatorData(format!(
                        "{} cannot be compared with {}",
                        field.name,
                        operator.to_sql()
                    )));
                }
                coerce(field, s)?
            }
            _ => {
                return Err(FilterError::InvalidOperatorData(format!(
                    "{} expects a single value",
                    field.name
                )))
            }
        };

        Ok(FilterWhereInfo { field, operator, data })
    }

    pub fn generate(
        conditions: &[FilterWhereInfo],
        starting_param_index: usize,
    ) -> Result<(String, Vec<Value>), FilterError> {
        let mut filter_where = Self::new(starting_param_index);
        filter_where.build(conditions)
    }

    fn build(&mut self, conditions: &[FilterWhereInfo]) -> Result<(String, Vec<Value>), FilterError> {
        let mut sql_conditions = vec![];
        for condition in conditions {
            sql_conditions.push(self.build_sql_condition(condition)?);
        }
        Ok((sql_conditions.join(" AND "), std::mem::take(&mut self.param_values)))
    }

    fn build_sql_condition(&mut self, condition: &FilterWhereInfo) -> Result<String, FilterError> {
        let field = condition.field;
        let column = field.sql();

        match condition.operator {
            FilterOp::Eq if field.kind == FieldKind::TextList => {
                Ok(format!("{} = ANY({})", self.param(field, condition.data.clone()), column))
            }
            FilterOp::Eq => {
                if condition.data.is_null() {
                    Ok(format!("{} IS NULL", column))
                } else {
                    Ok(format!("{} = {}", column, self.param(field, condition.data.clone())))
                }
            }
            FilterOp::Gt | FilterOp::Gte | FilterOp::Lt | FilterOp::Lte | FilterOp::ILike => Ok(format!(
                "{} {} {}",
                column,
                condition.operator.to_sql(),
                self.param(field, condition.data.clone())
            )),
            FilterOp::In => {
                let Value::Array(values) = &condition.data else {
                    return Err(FilterError::InvalidOperatorData(format!(
                        "{} expects a list",
                        field.name
                    )));
                };
                if values.is_empty() {
                    return Ok("1=0".to_string());
                }
                let params: Vec<String> = values.iter().map(|v| self.param(field, v.clone())).collect();
                if field.kind == FieldKind::TextList {
                    Ok(format!("{} && ARRAY[{}]::text[]", column, params.join(", ")))
                } else {
                    Ok(format!("{} IN ({})", column, params.join(", ")))
                }
            }
        }
    }

    fn param(&mut self, field: &FieldSpec, value: Value) -> String {
        self.param_values.push(value);
        self.param_index += 1;
        match field.kind {
            FieldKind::Id => format!("${}::uuid", self.param_index),
            FieldKind::Timestamp => format!("${}::timestamptz", self.param_index),
            _ => format!("${}", self.param_index),
        }
    }
}

fn coerce_all<'a>(
    field: &FieldSpec,
    items: impl Iterator<Item = &'a str>,
) -> Result<Value, FilterError> {
    items
        .map(|s| coerce(field, s))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

/// Converts raw query text into a value of the field's kind.
pub fn coerce(field: &FieldSpec, raw: &str) -> Result<Value, FilterError> {
    let invalid = || FilterError::InvalidValue {
        field: field.name.to_string(),
        expected: field.kind.describe(),
        value: raw.to_string(),
    };
    let trimmed = raw.trim();

    match field.kind {
        FieldKind::Text | FieldKind::TextList => Ok(Value::String(raw.to_string())),
        FieldKind::Id => Uuid::parse_str(trimmed)
            .map(|id| Value::String(id.to_string()))
            .map_err(|_| invalid()),
        FieldKind::Integer => trimmed.parse::<i64>().map(Value::from).map_err(|_| invalid()),
        FieldKind::Float => trimmed
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(invalid),
        FieldKind::Timestamp => parse_timestamp(trimmed)
            .map(|ts| Value::String(ts.to_rfc3339()))
            .ok_or_else(invalid),
        FieldKind::Json => Err(FilterError::FieldNotFilterable(field.name.to_string())),
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::catalog::{JOBS, USERS};
    use crate::filter::request::FilterRequest;
    use serde_json::json;

    fn where_sql(query: &str) -> Result<(String, Vec<Value>), FilterError> {
        let request = FilterRequest::parse_with(query, &["positions".to_string()]);
        let conditions = FilterWhere::parse(&JOBS, request.predicates())?;
        FilterWhere::generate(&conditions, 0)
    }

    #[test]
    fn plain_value_is_equality() {
        let (sql, params) = where_sql("jobType=Permanent").unwrap();
        assert_eq!(sql, "\"job_type\" = $1");
        assert_eq!(params, vec![json!("Permanent")]);
    }

    #[test]
    fn comparison_suffixes_map_to_operators() {
        let (sql, params) = where_sql("salary[gt]=100&salary[lte]=500").unwrap();
        // nested keys are ordered alphabetically
        assert_eq!(sql, "\"salary\" > $1 AND \"salary\" <= $2");
        assert_eq!(params, vec![json!(100), json!(500)]);
    }

    #[test]
    fn in_accepts_comma_separated_text() {
        let (sql, params) = where_sql("jobType[in]=Permanent,Internship").unwrap();
        assert_eq!(sql, "\"job_type\" IN ($1, $2)");
        assert_eq!(params, vec![json!("Permanent"), json!("Internship")]);
    }

    #[test]
    fn empty_in_matches_nothing() {
        let (sql, params) = where_sql("jobType[in]=").unwrap();
        assert_eq!(sql, "1=0");
        assert!(params.is_empty());
    }

    #[test]
    fn repeated_whitelisted_key_is_membership() {
        let (sql, params) = where_sql("positions=1&positions=3").unwrap();
        assert_eq!(sql, "\"positions\" IN ($1, $2)");
        assert_eq!(params, vec![json!(1), json!(3)]);
    }

    #[test]
    fn list_fields_use_array_operators() {
        let (sql, _) = where_sql("industry=Banking").unwrap();
        assert_eq!(sql, "$1 = ANY(\"industry\")");

        let (sql, params) = where_sql("industry[in]=Banking,Others").unwrap();
        assert_eq!(sql, "\"industry\" && ARRAY[$1, $2]::text[]");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn typed_fields_are_cast() {
        let id = Uuid::new_v4();
        let (sql, params) = where_sql(&format!("user={}&lastDate[gte]=2024-01-31", id)).unwrap();
        assert_eq!(sql, "\"last_date\" >= $1::timestamptz AND \"user_id\" = $2::uuid");
        assert_eq!(params[0], json!("2024-01-31T00:00:00+00:00"));
        assert_eq!(params[1], json!(id.to_string()));
    }

    #[test]
    fn rejects_values_of_the_wrong_kind() {
        let err = where_sql("salary[gt]=lots").unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { ref field, .. } if field == "salary"));

        assert!(where_sql("user=not-a-uuid").is_err());
        assert!(where_sql("postingDate[lt]=yesterday").is_err());
    }

    #[test]
    fn rejects_unknown_fields_and_operators() {
        assert!(matches!(where_sql("colour=red"), Err(FilterError::UnknownField(_))));
        assert!(matches!(
            where_sql("salary[between]=1"),
            Err(FilterError::UnsupportedOperator(_))
        ));
        assert!(matches!(
            where_sql("location=x"),
            Err(FilterError::FieldNotFilterable(_))
        ));
    }

    #[test]
    fn top_level_operator_names_are_ordinary_fields() {
        assert!(matches!(where_sql("gt=5"), Err(FilterError::UnknownField(f)) if f == "gt"));
    }

    #[test]
    fn comparisons_on_list_fields_are_rejected() {
        assert!(matches!(
            where_sql("industry[gt]=B"),
            Err(FilterError::InvalidOperatorData(_))
        ));
    }

    #[test]
    fn parameter_numbering_continues_from_start_index() {
        let request = FilterRequest::parse_with("role=employer", &[]);
        let conditions = FilterWhere::parse(&USERS, request.predicates()).unwrap();
        let (sql, _) = FilterWhere::generate(&conditions, 2).unwrap();
        assert_eq!(sql, "\"role\" = $3");
    }
}

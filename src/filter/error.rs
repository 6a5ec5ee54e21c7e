use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error("Field cannot be filtered: {0}")]
    FieldNotFilterable(String),

    #[error("Field cannot be sorted: {0}")]
    FieldNotSortable(String),

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Invalid operator data: {0}")]
    InvalidOperatorData(String),

    #[error("Invalid value for {field}: expected {expected}, got '{value}'")]
    InvalidValue {
        field: String,
        expected: &'static str,
        value: String,
    },

    #[error("Projection cannot mix inclusion and exclusion")]
    MixedProjection,
}

impl FilterError {
    /// Query parameter the error refers to, when there is one
    pub fn field(&self) -> Option<&str> {
        match self {
            FilterError::UnknownField(f)
            | FilterError::FieldNotFilterable(f)
            | FilterError::FieldNotSortable(f) => Some(f),
            FilterError::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }
}

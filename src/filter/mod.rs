pub mod api_filters;
pub mod catalog;
pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod request;
pub mod types;

pub use api_filters::ApiFilters;
pub use catalog::{Collection, FieldKind, FieldSpec, JOBS, USERS};
pub use error::FilterError;
pub use filter::{Filter, Projection};
pub use request::{FilterRequest, FilterValue};
pub use types::*;

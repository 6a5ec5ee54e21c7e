pub mod jobs;
pub mod manager;
pub mod models;
pub mod query_builder;
pub mod users;

pub use jobs::JobRepository;
pub use manager::{DatabaseError, DatabaseManager};
pub use query_builder::QueryBuilder;
pub use users::UserRepository;

pub mod application;
pub mod job;
pub mod user;

pub use application::Application;
pub use job::{Job, JobChanges, JobRequest, JobStats, Location, NewJob};
pub use user::{NewUser, PostedJob, Profile, Role, User};

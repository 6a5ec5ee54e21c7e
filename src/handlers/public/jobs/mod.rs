// handlers/public/jobs/mod.rs - Job browsing

pub mod list;   // GET /api/v1/jobs
pub mod radius; // GET /api/v1/jobs/:zipcode/:distance
pub mod show;   // GET /api/v1/job/:id/:slug
pub mod stats;  // GET /api/v1/stats/:topic

pub use list::jobs_get;
pub use radius::jobs_in_radius_get;
pub use show::job_get;
pub use stats::job_stats_get;

// handlers/protected/mod.rs - Protected handlers (token required)
//
// Every route here runs behind jwt_auth_middleware, which puts an AuthUser in the
// request extensions. Role gates are applied per route group in the server.

pub mod jobs; // job-seeker and employer job operations
pub mod user; // the signed-in account

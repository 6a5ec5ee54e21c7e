// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Account creation, token acquisition, password recovery and job browsing.

pub mod auth;
pub mod jobs;

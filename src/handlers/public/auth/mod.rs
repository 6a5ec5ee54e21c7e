// handlers/public/auth/mod.rs - Token acquisition and password recovery

pub mod login;    // POST /api/v1/login
pub mod password; // POST /api/v1/password/forgot, /api/v1/password/reset/:token
pub mod register; // POST /api/v1/register

pub use login::login_post;
pub use password::{forgot_password_post, reset_password_post};
pub use register::register_post;

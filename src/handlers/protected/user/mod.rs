// handlers/protected/user/mod.rs - The signed-in account

pub mod logout;   // GET /api/v1/logout
pub mod password; // PUT /api/v1/password/update
pub mod profile;  // GET /api/v1/me, PUT /api/v1/me/update, DELETE /api/v1/me/delete

pub use logout::logout_get;
pub use password::password_update_put;
pub use profile::{me_delete, me_get, me_update_put};

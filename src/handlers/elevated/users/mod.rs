// handlers/elevated/users/mod.rs - Account administration

pub mod delete; // DELETE /api/v1/user/:id
pub mod list;   // GET /api/v1/users

pub use delete::user_delete;
pub use list::users_get;

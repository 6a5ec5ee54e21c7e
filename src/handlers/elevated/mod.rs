// handlers/elevated/mod.rs - Admin-only handlers
//
// Routes here sit behind the token gate and the admin role gate.

pub mod users;

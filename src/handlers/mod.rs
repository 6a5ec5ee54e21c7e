// handlers/mod.rs - Handlers grouped by access tier
//
// Public (no token) → Protected (valid token, some groups role gated) → Elevated (admin)

pub mod public;
pub mod protected;
pub mod elevated;

use uuid::Uuid;

use crate::error::ApiError;

/// Path ids that are not UUIDs cannot name a stored resource.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ApiError::not_found("Resource not found. Invalid id"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_not_found() {
        let err = parse_id("507f1f77bcf86cd799439011").unwrap_err();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.message(), "Resource not found. Invalid id");

        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }
}

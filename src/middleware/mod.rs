pub mod auth;
pub mod rate_limit;
pub mod response;
pub mod sanitize;
pub mod security_headers;

pub use auth::{authorize, authorize_roles, jwt_auth_middleware, AuthUser};
pub use rate_limit::{rate_limit_middleware, IpRateLimiter};
pub use response::{ApiResponse, ApiResult};
pub use sanitize::SanitizedJson;
pub use security_headers::security_headers;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub filter: FilterConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub mail: MailConfig,
    pub geocoder: GeocoderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub file_upload_path: String,
    pub max_file_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    pub max_limit: Option<i64>,
    pub default_page_size: i64,
    /// Query keys that may repeat and keep every value (parameter pollution guard)
    pub repeatable_params: Vec<String>,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub run_migrations: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub enable_rate_limiting: bool,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub require_https: bool,
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cookie_expiry_days: i64,
    pub bcrypt_cost: u32,
    pub reset_token_expiry_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub api_url: Option<String>,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub from_name: String,
    pub from_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub api_url: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").or_else(|_| env::var("NODE_ENV")).as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    fn with_env_overrides(mut self) -> Self {
        // Server overrides
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("FILE_UPLOAD_PATH") {
            self.server.file_upload_path = v;
        }
        if let Ok(v) = env::var("MAX_FILE_SIZE") {
            self.server.max_file_size = v.parse().unwrap_or(self.server.max_file_size);
        }

        // Filter overrides
        if let Ok(v) = env::var("FILTER_MAX_LIMIT") {
            self.filter.max_limit = v.parse().ok();
        }
        if let Ok(v) = env::var("FILTER_DEFAULT_PAGE_SIZE") {
            self.filter.default_page_size = v.parse().unwrap_or(self.filter.default_page_size);
        }
        if let Ok(v) = env::var("FILTER_REPEATABLE_PARAMS") {
            self.filter.repeatable_params = split_list(&v);
        }
        if let Ok(v) = env::var("FILTER_DEBUG_LOGGING") {
            self.filter.debug_logging = v.parse().unwrap_or(self.filter.debug_logging);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Ok(v) = env::var("DATABASE_RUN_MIGRATIONS") {
            self.database.run_migrations = v.parse().unwrap_or(self.database.run_migrations);
        }

        // API overrides
        if let Ok(v) = env::var("API_ENABLE_RATE_LIMITING") {
            self.api.enable_rate_limiting = v.parse().unwrap_or(self.api.enable_rate_limiting);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_REQUESTS") {
            self.api.rate_limit_requests = v.parse().unwrap_or(self.api.rate_limit_requests);
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_WINDOW_SECS") {
            self.api.rate_limit_window_secs = v.parse().unwrap_or(self.api.rate_limit_window_secs);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_REQUIRE_HTTPS") {
            self.security.require_https = v.parse().unwrap_or(self.security.require_https);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("JWT_EXPIRES_TIME") {
            self.security.jwt_expiry_hours = parse_hours(&v).unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("COOKIE_EXPIRES_TIME") {
            self.security.cookie_expiry_days = v.parse().unwrap_or(self.security.cookie_expiry_days);
        }
        if let Ok(v) = env::var("BCRYPT_COST") {
            self.security.bcrypt_cost = v.parse().unwrap_or(self.security.bcrypt_cost);
        }

        // Mail overrides
        if let Ok(v) = env::var("MAIL_API_URL") {
            self.mail.api_url = Some(v);
        }
        if let Ok(v) = env::var("MAIL_API_KEY") {
            self.mail.api_key = Some(v);
        }
        if let Ok(v) = env::var("SMTP_FROM_NAME") {
            self.mail.from_name = v;
        }
        if let Ok(v) = env::var("SMTP_FROM_EMAIL") {
            self.mail.from_email = v;
        }

        // Geocoder overrides
        if let Ok(v) = env::var("GEOCODER_API_URL") {
            self.geocoder.api_url = v;
        }
        if let Ok(v) = env::var("GEOCODER_API_KEY") {
            self.geocoder.api_key = Some(v);
        }

        self
    }

    fn base(environment: Environment) -> Self {
        Self {
            environment,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 5000,
                file_upload_path: "./public/uploads".to_string(),
                max_file_size: 2_000_000,
            },
            filter: FilterConfig {
                max_limit: Some(1000),
                default_page_size: 10,
                repeatable_params: vec!["positions".to_string()],
                debug_logging: false,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                run_migrations: true,
            },
            api: ApiConfig {
                enable_rate_limiting: true,
                rate_limit_requests: 100,
                rate_limit_window_secs: 10 * 60,
                enable_request_logging: false,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
            },
            security: SecurityConfig {
                require_https: false,
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7, // 1 week
                cookie_expiry_days: 7,
                bcrypt_cost: 10,
                reset_token_expiry_minutes: 30,
            },
            mail: MailConfig {
                api_url: None,
                api_key: None,
                from_name: "Jobbee".to_string(),
                from_email: "noreply@jobbee.local".to_string(),
            },
            geocoder: GeocoderConfig {
                api_url: "https://www.mapquestapi.com/geocoding/v1/address".to_string(),
                api_key: None,
            },
        }
    }

    pub fn development() -> Self {
        let mut config = Self::base(Environment::Development);
        config.filter.debug_logging = true;
        config.api.enable_request_logging = true;
        // Local runs work without a .env; staging and production must set JWT_SECRET
        config.security.jwt_secret = "jobbee-development-secret".to_string();
        config
    }

    pub fn staging() -> Self {
        let mut config = Self::base(Environment::Staging);
        config.filter.max_limit = Some(500);
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config.api.enable_request_logging = true;
        config.api.max_request_size_bytes = 5 * 1024 * 1024; // 5MB
        config.security.require_https = true;
        config.security.jwt_expiry_hours = 24;
        config
    }

    pub fn production() -> Self {
        let mut config = Self::base(Environment::Production);
        config.filter.max_limit = Some(100);
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config.database.run_migrations = false;
        config.api.max_request_size_bytes = 5 * 1024 * 1024; // 5MB
        config.security.require_https = true;
        config.security.jwt_expiry_hours = 24;
        config
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Accepts plain hour counts as well as `<n>h` / `<n>d` suffixed lifetimes.
fn parse_hours(value: &str) -> Option<u64> {
    let value = value.trim();
    if let Some(days) = value.strip_suffix('d') {
        return days.parse::<u64>().ok().map(|d| d * 24);
    }
    value.strip_suffix('h').unwrap_or(value).parse().ok()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        $crate::config::CONFIG.is_development()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.filter.max_limit, Some(1000));
        assert_eq!(config.filter.default_page_size, 10);
        assert!(config.api.enable_rate_limiting);
        assert_eq!(config.api.rate_limit_requests, 100);
        assert_eq!(config.api.rate_limit_window_secs, 600);
        assert!(config.is_development());
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert_eq!(config.filter.max_limit, Some(100));
        assert!(config.security.require_https);
        assert!(!config.database.run_migrations);
        assert!(config.security.jwt_secret.is_empty());
        assert!(!config.is_development());
    }

    #[test]
    fn positions_is_repeatable_by_default() {
        let config = AppConfig::staging();
        assert_eq!(config.filter.repeatable_params, vec!["positions".to_string()]);
    }

    #[test]
    fn parses_jwt_lifetimes() {
        assert_eq!(parse_hours("12"), Some(12));
        assert_eq!(parse_hours("6h"), Some(6));
        assert_eq!(parse_hours("7d"), Some(168));
        assert_eq!(parse_hours("soon"), None);
    }

    #[test]
    fn splits_comma_lists() {
        assert_eq!(split_list(" positions, tags ,,"), vec!["positions", "tags"]);
    }
}

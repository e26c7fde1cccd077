// Server configuration loaded from environment variables.
// Decision: No DATABASE_URL means dev mode with in-memory storage

use axum::http::HeaderValue;

/// Default bind address
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// PostgreSQL connection string. `None` selects the in-memory backend.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    /// Prefix for all API routes, e.g. "/api" gives /api/v1/events
    pub api_prefix: String,
    /// Only needed when a client is served from a different origin
    pub cors_origins: Vec<HeaderValue>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            api_prefix: String::new(),
            cors_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = lookup("DATABASE_URL").filter(|s| !s.trim().is_empty());

        let host = lookup("HOST")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(port = %raw, "Invalid PORT, using default {}", DEFAULT_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        let api_prefix = lookup("API_PREFIX")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_default();

        // Example: CORS_ALLOWED_ORIGINS="https://app.example.com,https://admin.example.com"
        let cors_origins = lookup("CORS_ALLOWED_ORIGINS")
            .filter(|s| !s.is_empty())
            .map(|s| s.split(',').filter_map(|s| s.trim().parse().ok()).collect())
            .unwrap_or_default();

        Self {
            database_url,
            host,
            port,
            api_prefix,
            cors_origins,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn is_dev_mode(&self) -> bool {
        self.database_url.is_none()
    }
}

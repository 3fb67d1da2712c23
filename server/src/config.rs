// Configuration for the web front end and its remote client

use std::{str::FromStr, time::Duration};

use voice_client::{ClientConfig, DEFAULT_BASE_URL};

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    pub remote_base_url: String,
    pub remote_timeout_secs: Option<u64>,
    pub remote_max_retries: u32,
    pub remote_retry_backoff_ms: u64,
    pub request_timeout_secs: u64,
    pub rate_limit_per_minute: u32,
    pub cors_allowed_origins: Option<Vec<String>>,
    pub session_ttl_secs: u64,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8085,
            remote_base_url: DEFAULT_BASE_URL.to_string(),
            remote_timeout_secs: None,
            remote_max_retries: 0,
            remote_retry_backoff_ms: 500,
            request_timeout_secs: 300,
            rate_limit_per_minute: 60,
            cors_allowed_origins: None,
            session_ttl_secs: 3600,
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let remote_base_url = std::env::var("REMOTE_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.remote_base_url);

        let remote_timeout_secs = std::env::var("REMOTE_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse().ok());

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .ok()
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            });

        Self {
            port: env_or("PORT", defaults.port),
            remote_base_url,
            remote_timeout_secs,
            remote_max_retries: env_or("REMOTE_MAX_RETRIES", defaults.remote_max_retries),
            remote_retry_backoff_ms: env_or("REMOTE_RETRY_BACKOFF_MS", defaults.remote_retry_backoff_ms),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            rate_limit_per_minute: env_or("RATE_LIMIT_PER_MINUTE", defaults.rate_limit_per_minute),
            cors_allowed_origins,
            session_ttl_secs: env_or("SESSION_TTL_SECS", defaults.session_ttl_secs),
            max_upload_bytes: env_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }

    /// Replenish period of the global rate limiter: one request every
    /// `60000 / per_minute` ms, never below 1 ms.
    pub fn rate_limit_period_ms(&self) -> u64 {
        (60_000 / u64::from(self.rate_limit_per_minute.max(1))).max(1)
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.remote_base_url.clone(),
            timeout: self.remote_timeout_secs.map(Duration::from_secs),
            max_retries: self.remote_max_retries,
            retry_backoff: Duration::from_millis(self.remote_retry_backoff_ms),
            temp_dir: None,
        }
    }
}

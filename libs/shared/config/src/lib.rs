use std::env;
use std::time::Duration;
use tracing::warn;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the clinic REST backend, without trailing slash.
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            api_url: env::var("CLINIC_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| {
                    warn!("CLINIC_API_URL not set, using empty value");
                    String::new()
                }),
            request_timeout_secs: env::var("CLINIC_API_TIMEOUT_SECS")
                .ok()
                .and_then(|raw| match raw.parse() {
                    Ok(secs) => Some(secs),
                    Err(_) => {
                        warn!("CLINIC_API_TIMEOUT_SECS is not a number: {}", raw);
                        None
                    }
                })
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            port: env::var("DASHBOARD_PORT")
                .ok()
                .and_then(|raw| match raw.parse() {
                    Ok(port) => Some(port),
                    Err(_) => {
                        warn!("DASHBOARD_PORT is not a valid port: {}", raw);
                        None
                    }
                })
                .unwrap_or(DEFAULT_PORT),
        };

        if !config.is_configured() {
            warn!("Dashboard not fully configured - missing CLINIC_API_URL");
        }

        config
    }

    /// Config pointing at an explicit backend, used by tests and embedders.
    pub fn with_api_url(api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            request_timeout_secs: DEFAULT_TIMEOUT_SECS,
            port: DEFAULT_PORT,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_url.is_empty()
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

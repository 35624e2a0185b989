use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Minutes an admin elevation stays valid after an elevated login.
    pub elevation_window_mins: u64,
    /// Delay before the single silent retry of a failed login request.
    pub login_retry_delay_ms: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("IMA_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("IMA_API_BASE_URL") {
            self.api.base_url = v;
        }
        if let Ok(v) = env::var("IMA_API_TIMEOUT_SECS") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }
        if let Ok(v) = env::var("IMA_ELEVATION_WINDOW_MINS") {
            self.security.elevation_window_mins =
                v.parse().unwrap_or(self.security.elevation_window_mins);
        }
        if let Ok(v) = env::var("IMA_LOGIN_RETRY_DELAY_MS") {
            self.security.login_retry_delay_ms =
                v.parse().unwrap_or(self.security.login_retry_delay_ms);
        }
        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                base_url: "http://localhost:8000".to_string(),
                request_timeout_secs: 30,
            },
            security: SecurityConfig {
                elevation_window_mins: 15,
                login_retry_delay_ms: 1500,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                base_url: "https://api.example.com".to_string(),
                request_timeout_secs: 15,
            },
            security: SecurityConfig {
                elevation_window_mins: 15,
                login_retry_delay_ms: 1500,
            },
        }
    }
}

impl SecurityConfig {
    pub fn elevation_window(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.elevation_window_mins as i64)
    }

    pub fn login_retry_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.login_retry_delay_ms)
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

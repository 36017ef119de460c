use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};
use url::Url;

use crate::constants::{
    DEFAULT_ERROR_TOAST_MS, DEFAULT_LONG_PRESS_THRESHOLD_MS, DEFAULT_PAGE_SIZE,
    DEFAULT_SUCCESS_TOAST_MS, DEFAULT_UPLOAD_CHUNK_SIZE,
};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    /// Taken from `APP_ENV` by [`AppConfig::load`], never from sources.
    #[serde(skip_deserializing, default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_backend_host")]
    pub backend_host: String,

    /// 0 disables the client-side timeout.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default = "default_page_size")]
    pub page_size: u32,

    #[serde(default = "default_long_press_threshold")]
    pub long_press_threshold_ms: u64,

    #[serde(default = "default_success_toast")]
    pub success_toast_ms: u64,

    #[serde(default = "default_error_toast")]
    pub error_toast_ms: u64,

    #[serde(default = "default_upload_chunk_size")]
    pub upload_chunk_size: usize,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_backend_host() -> String {
    "http://127.0.0.1:8080".to_string()
}
fn default_request_timeout() -> u64 {
    30
}
fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}
fn default_long_press_threshold() -> u64 {
    DEFAULT_LONG_PRESS_THRESHOLD_MS
}
fn default_success_toast() -> u64 {
    DEFAULT_SUCCESS_TOAST_MS
}
fn default_error_toast() -> u64 {
    DEFAULT_ERROR_TOAST_MS
}
fn default_upload_chunk_size() -> usize {
    DEFAULT_UPLOAD_CHUNK_SIZE
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            env: default_env(),
            backend_host: default_backend_host(),
            request_timeout_secs: default_request_timeout(),
            page_size: default_page_size(),
            long_press_threshold_ms: default_long_press_threshold(),
            success_toast_ms: default_success_toast(),
            error_toast_ms: default_error_toast(),
            upload_chunk_size: default_upload_chunk_size(),
        }
    }
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Loads configuration, optionally layering an explicit file over the
    /// `config/` directory defaults.
    pub fn load(explicit_file: Option<&str>) -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let mut builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false));

        if let Some(path) = explicit_file {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let builder = builder.add_source(
            Environment::with_prefix("APP")
                .prefix_separator("_")
                .ignore_empty(true),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        match Url::parse(&self.backend_host) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
                if self.is_production() && url.scheme() == "http" {
                    errors.push("BACKEND_HOST must use https in production".to_string());
                }
            }
            Ok(_) => errors.push("BACKEND_HOST must start with http:// or https://".to_string()),
            Err(e) => errors.push(format!("BACKEND_HOST is not a valid url: {}", e)),
        }
        if self.page_size == 0 {
            errors.push("PAGE_SIZE must be at least 1".to_string());
        }
        if self.long_press_threshold_ms == 0 {
            errors.push("LONG_PRESS_THRESHOLD_MS must be at least 1".to_string());
        }
        if self.upload_chunk_size == 0 {
            errors.push("UPLOAD_CHUNK_SIZE must be at least 1".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        match self.request_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    pub fn long_press_threshold(&self) -> Duration {
        Duration::from_millis(self.long_press_threshold_ms)
    }

    pub fn success_toast(&self) -> Duration {
        Duration::from_millis(self.success_toast_ms)
    }

    pub fn error_toast(&self) -> Duration {
        Duration::from_millis(self.error_toast_ms)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass_validation() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.page_size, 20);
        assert_eq!(config.long_press_threshold(), Duration::from_millis(500));
    }

    #[test]
    fn rejects_non_http_backend() {
        let config = AppConfig {
            backend_host: "ftp://example.com".into(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn production_requires_https() {
        let config = AppConfig {
            env: AppEnvironment::Production,
            ..AppConfig::default()
        };
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("https"));
    }

    #[test]
    fn zero_timeout_disables_it() {
        let config = AppConfig {
            request_timeout_secs: 0,
            ..AppConfig::default()
        };
        assert_eq!(config.request_timeout(), None);
    }

    #[test]
    fn mixed_case_env_key_does_not_break_deserialization() {
        let config: AppConfig = Config::builder()
            .set_override("env", "Production")
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.env, AppEnvironment::Development);
        assert_eq!("Production".parse::<AppEnvironment>().unwrap(), AppEnvironment::Production);
    }
}

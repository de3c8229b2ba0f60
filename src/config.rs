use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    // Content API
    pub api_endpoint: String,
    pub access_token: Option<String>,
    pub document_type: String,
    pub page_size: u32,
    pub http_timeout: Duration,
    pub master_ref_ttl: Duration,

    // Static generation
    pub revalidate_after: Duration,
    pub output_dir: PathBuf,

    // Web Server
    pub web_host: String,
    pub web_port: u16,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required environment variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            // Content API
            api_endpoint: required_env("PRISMIC_API_ENDPOINT")?,
            access_token: optional_env("PRISMIC_ACCESS_TOKEN"),
            document_type: env_or_default("POST_DOCUMENT_TYPE", "post"),
            page_size: parse_env_u32("PAGE_SIZE", 20)?,
            http_timeout: Duration::from_secs(parse_env_u64("HTTP_TIMEOUT_SECS", 30)?),
            master_ref_ttl: Duration::from_secs(parse_env_u64(
                "MASTER_REF_TTL_SECS",
                crate::constants::MASTER_REF_TTL_SECS,
            )?),

            // Static generation
            revalidate_after: Duration::from_secs(parse_env_u64(
                "REVALIDATE_SECS",
                crate::constants::REVALIDATE_SECS,
            )?),
            output_dir: PathBuf::from(env_or_default("OUTPUT_DIR", "./out")),

            // Web Server
            web_host: env_or_default("WEB_HOST", "0.0.0.0"),
            web_port: parse_env_u16("WEB_PORT", 3000)?,
        })
    }

    /// Configuration pointing at a local endpoint, for tests.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_endpoint: "http://127.0.0.1:9/api/v2".to_string(),
            access_token: None,
            document_type: "post".to_string(),
            page_size: 20,
            http_timeout: Duration::from_secs(5),
            master_ref_ttl: Duration::from_secs(crate::constants::MASTER_REF_TTL_SECS),
            revalidate_after: Duration::from_secs(crate::constants::REVALIDATE_SECS),
            output_dir: PathBuf::from("./out"),
            web_host: "127.0.0.1".to_string(),
            web_port: 3000,
        }
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_endpoint.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "PRISMIC_API_ENDPOINT".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if let Err(e) = url::Url::parse(&self.api_endpoint) {
            return Err(ConfigError::InvalidValue {
                name: "PRISMIC_API_ENDPOINT".to_string(),
                message: e.to_string(),
            });
        }
        if self.document_type.is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "POST_DOCUMENT_TYPE".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        // Prismic rejects page sizes outside 1..=100
        if self.page_size == 0 || self.page_size > 100 {
            return Err(ConfigError::InvalidValue {
                name: "PAGE_SIZE".to_string(),
                message: format!("must be between 1 and 100, got {}", self.page_size),
            });
        }
        if self.revalidate_after.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "REVALIDATE_SECS".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

fn required_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_u64(name: &str, default: u64) -> Result<u64, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u32(name: &str, default: u32) -> Result<u32, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_u16(name: &str, default: u16) -> Result<u16, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

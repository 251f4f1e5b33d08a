//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `CAMPUS_USERS_URL` - Base URL of the users/auth service (default: <http://localhost:8083>)
//! - `CAMPUS_COURSES_URL` - Base URL of the courses service (default: <http://localhost:8080>)
//! - `CAMPUS_CREDENTIALS_PATH` - Durable credential record location
//!   (default: `.campus/credentials.json`)
//! - `CAMPUS_HEALTH_INTERVAL_SECS` - Service health polling interval (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_USERS_URL: &str = "http://localhost:8083";
const DEFAULT_COURSES_URL: &str = "http://localhost:8080";
const DEFAULT_CREDENTIALS_PATH: &str = ".campus/credentials.json";
const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client configuration for the portal services.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the users/auth service (login, registration, health).
    pub users_url: Url,
    /// Base URL of the courses service (course files).
    pub courses_url: Url,
    /// Where the persisted credential record lives.
    pub credentials_path: PathBuf,
    /// Interval between service health polls.
    pub health_interval: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables, falling back to the
    /// portal's development defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvVar`] if a URL or interval value does
    /// not parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let users_url = env_url("CAMPUS_USERS_URL", DEFAULT_USERS_URL)?;
        let courses_url = env_url("CAMPUS_COURSES_URL", DEFAULT_COURSES_URL)?;

        let credentials_path = std::env::var("CAMPUS_CREDENTIALS_PATH")
            .map_or_else(|_| PathBuf::from(DEFAULT_CREDENTIALS_PATH), PathBuf::from);

        let health_interval = match std::env::var("CAMPUS_HEALTH_INTERVAL_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.parse().map_err(|_| {
                    ConfigError::InvalidEnvVar(
                        "CAMPUS_HEALTH_INTERVAL_SECS".to_owned(),
                        format!("expected seconds, got {raw:?}"),
                    )
                })?;
                Duration::from_secs(secs)
            }
            Err(_) => Duration::from_secs(DEFAULT_HEALTH_INTERVAL_SECS),
        };

        Ok(Self {
            users_url,
            courses_url,
            credentials_path,
            health_interval,
        })
    }
}

fn env_url(name: &str, default: &str) -> Result<Url, ConfigError> {
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_owned());
    Url::parse(&raw).map_err(|e| ConfigError::InvalidEnvVar(name.to_owned(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse() {
        // Defaults must always yield a valid config in a clean environment.
        let users = Url::parse(DEFAULT_USERS_URL).expect("users default");
        let courses = Url::parse(DEFAULT_COURSES_URL).expect("courses default");
        assert_eq!(users.port(), Some(8083));
        assert_eq!(courses.port(), Some(8080));
    }
}

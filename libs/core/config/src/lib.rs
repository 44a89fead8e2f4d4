pub mod server;
pub mod tracing;

use std::env;
use std::str::FromStr;
use thiserror::Error;

/// Configuration error type
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable '{0}' is required but not set")]
    MissingEnvVar(String),

    #[error("Failed to parse environment variable '{key}': {details}")]
    ParseError { key: String, details: String },
}

/// Deployment environment, selected by `APP_ENV`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    /// `APP_ENV=production` (any case) selects production; anything else is development
    pub fn from_env() -> Self {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        if app_env.eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

/// Trait for configuration that can be loaded from environment variables
pub trait FromEnv: Sized {
    fn from_env() -> Result<Self, ConfigError>;
}

/// Value of `key`, or `default` when unset
pub fn env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Value of `key`, or `MissingEnvVar` when unset
pub fn env_required(key: &str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Parse `key` into `T`, falling back to `default` when unset.
///
/// A set but unparsable value is an error, never silently replaced.
pub fn env_parse_or<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::ParseError {
            key: key.to_string(),
            details: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_defaults_to_development() {
        temp_env::with_var_unset("APP_ENV", || {
            let env = Environment::from_env();
            assert_eq!(env, Environment::Development);
            assert!(env.is_development());
            assert!(!env.is_production());
        });
    }

    #[test]
    fn test_environment_production_case_insensitive() {
        for value in ["production", "PRODUCTION", "Production"] {
            temp_env::with_var("APP_ENV", Some(value), || {
                assert_eq!(Environment::from_env(), Environment::Production);
            });
        }
    }

    #[test]
    fn test_environment_unknown_defaults_to_development() {
        temp_env::with_var("APP_ENV", Some("staging"), || {
            assert_eq!(Environment::from_env(), Environment::Development);
        });
    }

    #[test]
    fn test_env_or_default() {
        temp_env::with_var("USERS_TEST_VAR", Some("set"), || {
            assert_eq!(env_or_default("USERS_TEST_VAR", "fallback"), "set");
        });
        temp_env::with_var_unset("USERS_TEST_VAR", || {
            assert_eq!(env_or_default("USERS_TEST_VAR", "fallback"), "fallback");
        });
    }

    #[test]
    fn test_env_required_missing() {
        temp_env::with_var_unset("USERS_REQUIRED", || {
            let err = env_required("USERS_REQUIRED").unwrap_err();
            assert!(err.to_string().contains("USERS_REQUIRED"));
            assert!(matches!(err, ConfigError::MissingEnvVar(_)));
        });
    }

    #[test]
    fn test_env_parse_or() {
        temp_env::with_var("USERS_POOL", Some(" 42 "), || {
            assert_eq!(env_parse_or("USERS_POOL", 7u32).unwrap(), 42);
        });
        temp_env::with_var_unset("USERS_POOL", || {
            assert_eq!(env_parse_or("USERS_POOL", 7u32).unwrap(), 7);
        });
    }

    #[test]
    fn test_env_parse_or_invalid() {
        temp_env::with_var("USERS_POOL", Some("many"), || {
            let err = env_parse_or("USERS_POOL", 7u32).unwrap_err();
            assert!(
                matches!(err, ConfigError::ParseError { ref key, .. } if key == "USERS_POOL")
            );
        });
    }
}

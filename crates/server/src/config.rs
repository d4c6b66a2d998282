use std::{fmt::Display, str::FromStr, time::Duration};

use thiserror::Error;
use tracing::info;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub backend_base_url: Url,
    pub host: String,
    pub port: u16,
    pub upstream_timeout: Duration,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup (the process env in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_url = lookup("BACKEND_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("BACKEND_BASE_URL"))?;
        let backend_base_url = Url::parse(raw_url.trim()).map_err(|e| ConfigError::Invalid {
            key: "BACKEND_BASE_URL",
            message: e.to_string(),
        })?;
        if !matches!(backend_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "BACKEND_BASE_URL",
                message: format!("unsupported scheme `{}`", backend_base_url.scheme()),
            });
        }

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(&lookup, "PORT", 3000u16)?;
        let timeout_secs = parse_or(&lookup, "UPSTREAM_TIMEOUT_SECS", 90u64)?;

        Ok(Self {
            backend_base_url,
            host,
            port,
            upstream_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ServerConfig::from_lookup(lookup(&[("BACKEND_BASE_URL", "http://backend:8000")]))
                .unwrap();

        assert_eq!(config.backend_base_url.as_str(), "http://backend:8000/");
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
        assert_eq!(config.upstream_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("BACKEND_BASE_URL", "https://api.example.com/v1"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
            ("UPSTREAM_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert_eq!(config.upstream_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_missing_backend_url() {
        let err = ServerConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("BACKEND_BASE_URL")));

        let err = ServerConfig::from_lookup(lookup(&[("BACKEND_BASE_URL", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(_)));
    }

    #[test]
    fn test_invalid_values() {
        let err = ServerConfig::from_lookup(lookup(&[("BACKEND_BASE_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BACKEND_BASE_URL", .. }));

        let err = ServerConfig::from_lookup(lookup(&[
            ("BACKEND_BASE_URL", "http://backend:8000"),
            ("PORT", "eighty"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}

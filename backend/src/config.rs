//! Runtime configuration read from the environment (and an optional `.env`
//! file).
//!
//! | Variable | Default |
//! |---|---|
//! | `DASHBOARD_HOST` | `127.0.0.1` |
//! | `DASHBOARD_PORT` | `3000` |
//! | `DATABASE_URL` | `sqlite:orders.db` |
//! | `RECEIVABLE_TERM_DAYS` | `30` |
//! | `ORDERS_PER_PAGE` | `15` |
//! | `CORS_ORIGIN` | `http://localhost:8080` |

use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use tracing::info;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value '{value}' for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub receivable_term_days: i64,
    pub orders_per_page: u32,
    pub cors_origin: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
            database_url: "sqlite:orders.db".to_string(),
            receivable_term_days: 30,
            orders_per_page: 15,
            cors_origin: "http://localhost:8080".to_string(),
        }
    }
}

fn parse_var<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            name,
            reason: e.to_string(),
            value,
        }),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok(); // Load .env file if present
        let config = Self::from_lookup(|name| env::var(name).ok())?;
        info!("Application configuration loaded successfully.");
        Ok(config)
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let receivable_term_days =
            parse_var("RECEIVABLE_TERM_DAYS", lookup("RECEIVABLE_TERM_DAYS"), defaults.receivable_term_days)?;
        if receivable_term_days < 0 {
            return Err(ConfigError::Invalid {
                name: "RECEIVABLE_TERM_DAYS",
                value: receivable_term_days.to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        let orders_per_page = parse_var("ORDERS_PER_PAGE", lookup("ORDERS_PER_PAGE"), defaults.orders_per_page)?;
        if orders_per_page == 0 {
            return Err(ConfigError::Invalid {
                name: "ORDERS_PER_PAGE",
                value: "0".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(Self {
            server_host: lookup("DASHBOARD_HOST").unwrap_or(defaults.server_host),
            server_port: parse_var("DASHBOARD_PORT", lookup("DASHBOARD_PORT"), defaults.server_port)?,
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            receivable_term_days,
            orders_per_page,
            cors_origin: lookup("CORS_ORIGIN").unwrap_or(defaults.cors_origin),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DASHBOARD_PORT", "8088"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("RECEIVABLE_TERM_DAYS", "45"),
            ("ORDERS_PER_PAGE", "50"),
        ]))
        .unwrap();
        assert_eq!(config.server_port, 8088);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.receivable_term_days, 45);
        assert_eq!(config.orders_per_page, 50);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("DASHBOARD_PORT", "http")])).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DASHBOARD_PORT", .. }));

        assert!(AppConfig::from_lookup(lookup_from(&[("ORDERS_PER_PAGE", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup_from(&[("RECEIVABLE_TERM_DAYS", "-1")])).is_err());
    }
}

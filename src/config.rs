use std::{env, net::SocketAddr, str::FromStr};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid environment variable format for {0}: {1}")]
    InvalidVar(String, String),
}

#[derive(Clone, Debug)] // Clone needed if passed around, Debug for logging
pub struct Config {
    pub bind_address: SocketAddr,
    pub database_url: String,
    pub database_max_connections: u32,
    // Insert default categories and sample photos on an empty store
    pub seed_sample_data: bool,
    // When unset, CORS allows any origin
    pub cors_allowed_origin: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (ignores errors, relies on env vars otherwise)
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_address_str = lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string());
        let bind_address = SocketAddr::from_str(&bind_address_str)
            .map_err(|e| ConfigError::InvalidVar("BIND_ADDRESS".into(), e.to_string()))?;

        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://portfolio.db?mode=rwc".to_string());
        if database_url.trim().is_empty() {
            return Err(ConfigError::MissingVar("DATABASE_URL".into()));
        }

        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => {
                let value = raw.trim().parse::<u32>().map_err(|e| {
                    ConfigError::InvalidVar("DATABASE_MAX_CONNECTIONS".into(), e.to_string())
                })?;
                if value == 0 {
                    return Err(ConfigError::InvalidVar(
                        "DATABASE_MAX_CONNECTIONS".into(),
                        "must be at least 1".into(),
                    ));
                }
                value
            }
            None => 5,
        };

        let seed_sample_data = match lookup("SEED_SAMPLE_DATA") {
            Some(raw) => parse_flag(&raw)
                .ok_or_else(|| ConfigError::InvalidVar("SEED_SAMPLE_DATA".into(), raw.clone()))?,
            None => true,
        };

        let cors_allowed_origin =
            lookup("CORS_ALLOWED_ORIGIN").filter(|origin| !origin.trim().is_empty());

        Ok(Config {
            bind_address,
            database_url,
            database_max_connections,
            seed_sample_data,
            cors_allowed_origin,
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.database_url, "sqlite://portfolio.db?mode=rwc");
        assert_eq!(config.database_max_connections, 5);
        assert!(config.seed_sample_data);
        assert!(config.cors_allowed_origin.is_none());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = config_from(&[
            ("BIND_ADDRESS", "127.0.0.1:9000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("DATABASE_MAX_CONNECTIONS", "2"),
            ("SEED_SAMPLE_DATA", "no"),
            ("CORS_ALLOWED_ORIGIN", "http://localhost:3000"),
        ])
        .unwrap();
        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.database_max_connections, 2);
        assert!(!config.seed_sample_data);
        assert_eq!(config.cors_allowed_origin.as_deref(), Some("http://localhost:3000"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            config_from(&[("BIND_ADDRESS", "not-an-address")]),
            Err(ConfigError::InvalidVar(name, _)) if name == "BIND_ADDRESS"
        ));
        assert!(matches!(
            config_from(&[("DATABASE_MAX_CONNECTIONS", "0")]),
            Err(ConfigError::InvalidVar(name, _)) if name == "DATABASE_MAX_CONNECTIONS"
        ));
        assert!(matches!(
            config_from(&[("SEED_SAMPLE_DATA", "maybe")]),
            Err(ConfigError::InvalidVar(name, _)) if name == "SEED_SAMPLE_DATA"
        ));
        assert!(matches!(
            config_from(&[("DATABASE_URL", "  ")]),
            Err(ConfigError::MissingVar(name)) if name == "DATABASE_URL"
        ));
    }
}

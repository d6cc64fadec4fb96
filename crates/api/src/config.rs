//! Process configuration, read from environment variables.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `BIND_ADDR` | `0.0.0.0:8080` |
//! | `JWT_SECRET` | insecure dev secret (logged as a warning) |
//! | `USE_PERSISTENT_STORES` | `false` |
//! | `DATABASE_URL` | required when `USE_PERSISTENT_STORES=true` |

use std::net::SocketAddr;

use thiserror::Error;
use tracing::warn;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    InMemory,
    Postgres { database_url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub storage: StorageConfig,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR '{0}'")]
    InvalidBindAddr(String),

    #[error("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")]
    MissingDatabaseUrl,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_addr
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddr(raw_addr.clone()))?;

        let jwt_secret = match lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET.to_string()
            }
        };

        let use_persistent = match lookup("USE_PERSISTENT_STORES") {
            None => false,
            Some(raw) => raw.trim().parse::<bool>().unwrap_or_else(|_| {
                warn!(value = %raw, "USE_PERSISTENT_STORES is not a bool, falling back to in-memory");
                false
            }),
        };

        let storage = if use_persistent {
            let database_url = lookup("DATABASE_URL")
                .filter(|s| !s.trim().is_empty())
                .ok_or(ConfigError::MissingDatabaseUrl)?;
            StorageConfig::Postgres { database_url }
        } else {
            StorageConfig::InMemory
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            storage,
        })
    }

    /// In-memory configuration bound to an ephemeral local port.
    pub fn in_memory(jwt_secret: impl Into<String>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            jwt_secret: jwt_secret.into(),
            storage: StorageConfig::InMemory,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_in_memory_on_port_8080() {
        let config = ApiConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR.parse().unwrap());
        assert_eq!(config.jwt_secret, DEV_JWT_SECRET);
        assert_eq!(config.storage, StorageConfig::InMemory);
    }

    #[test]
    fn persistent_stores_need_a_database_url() {
        let err = ApiConfig::from_lookup(lookup(&[("USE_PERSISTENT_STORES", "true")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingDatabaseUrl);

        let config = ApiConfig::from_lookup(lookup(&[
            ("USE_PERSISTENT_STORES", "true"),
            ("DATABASE_URL", "postgres://localhost/letmeask"),
            ("JWT_SECRET", "s3cret"),
            ("BIND_ADDR", "127.0.0.1:9000"),
        ]))
        .unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::Postgres {
                database_url: "postgres://localhost/letmeask".to_string()
            }
        );
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn unparseable_flag_falls_back_to_in_memory() {
        let config = ApiConfig::from_lookup(lookup(&[("USE_PERSISTENT_STORES", "yes please")])).unwrap();
        assert_eq!(config.storage, StorageConfig::InMemory);
    }

    #[test]
    fn bad_bind_addr_is_rejected() {
        let err = ApiConfig::from_lookup(lookup(&[("BIND_ADDR", "localhost")])).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr(_)));
    }
}

//! Configuration loading and representation.
//!
//! Everything comes from environment variables; [`AppConfig::from_lookup`]
//! takes the lookup as a function so tests never touch the process
//! environment.

use std::str::FromStr;

use thiserror::Error;

pub const DEFAULT_DATABASE: &str = "sample_mflix";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} has an invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Which `DocumentStore` backs the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Mongo,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(Self::Mongo),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(format!("expected 'mongo' or 'memory', got '{other}'")),
        }
    }
}

/// Connection settings for the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub kind: StoreKind,
    /// Required when `kind` is `Mongo`.
    pub uri: Option<String>,
    pub database: String,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl HttpConfig {
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub http: HttpConfig,
}

impl AppConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` to resolve variable names.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let kind = match get("MFLIX_STORE") {
            Some(raw) => raw.parse::<StoreKind>().map_err(|reason| ConfigError::Invalid {
                var: "MFLIX_STORE",
                value: raw,
                reason,
            })?,
            None => StoreKind::Mongo,
        };

        let uri = get("MONGODB_URI");
        if kind == StoreKind::Mongo && uri.is_none() {
            return Err(ConfigError::Missing("MONGODB_URI"));
        }

        let port = match get("MFLIX_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| ConfigError::Invalid {
                var: "MFLIX_PORT",
                value: raw.clone(),
                reason: e.to_string(),
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            store: StoreConfig {
                kind,
                uri,
                database: get("MONGODB_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            },
            http: HttpConfig {
                host: get("MFLIX_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
                port,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_with_uri() {
        let config = load(&[("MONGODB_URI", "mongodb://localhost:27017")]).unwrap();
        assert_eq!(config.store.kind, StoreKind::Mongo);
        assert_eq!(config.store.database, "sample_mflix");
        assert_eq!(config.http.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn mongo_requires_uri() {
        assert_eq!(load(&[]).unwrap_err(), ConfigError::Missing("MONGODB_URI"));
        assert_eq!(
            load(&[("MONGODB_URI", "  ")]).unwrap_err(),
            ConfigError::Missing("MONGODB_URI")
        );
    }

    #[test]
    fn memory_store_needs_no_uri() {
        let config = load(&[("MFLIX_STORE", "memory"), ("MFLIX_PORT", "3000")]).unwrap();
        assert_eq!(config.store.kind, StoreKind::Memory);
        assert_eq!(config.store.uri, None);
        assert_eq!(config.http.port, 3000);
    }

    #[test]
    fn invalid_values_are_reported() {
        let err = load(&[("MFLIX_STORE", "redis")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "MFLIX_STORE", .. }));

        let err = load(&[("MFLIX_STORE", "memory"), ("MFLIX_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: "MFLIX_PORT", .. }));
    }
}

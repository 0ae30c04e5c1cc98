//! Database connection configuration
//!
//! Read from the environment (`DB_HOST`, `DB_PORT`, `DB_USER`,
//! `DB_PASSWORD`, `DB_NAME`, `DB_SSL_MODE`), with serde support for
//! file-based overrides.

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};

/// PostgreSQL connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DbConfig {
    /// Host to connect to (default: "localhost")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to connect to (default: 5432)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Role name (default: "postgres")
    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    /// Database name (default: "postgres")
    #[serde(default = "default_database")]
    pub database: String,

    /// libpq-style ssl mode: disable, allow, prefer, require, verify-ca,
    /// verify-full (default: "prefer")
    #[serde(default = "default_ssl_mode")]
    pub ssl_mode: String,

    /// Pool size (default: 8)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_user() -> String {
    "postgres".to_string()
}

fn default_database() -> String {
    "postgres".to_string()
}

fn default_ssl_mode() -> String {
    "prefer".to_string()
}

fn default_max_connections() -> u32 {
    8
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            database: default_database(),
            ssl_mode: default_ssl_mode(),
            max_connections: default_max_connections(),
        }
    }
}

impl DbConfig {
    /// Build a config from `DB_*` environment variables, defaulting any
    /// that are unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("DB_HOST", defaults.host),
            port: std::env::var("DB_PORT")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(defaults.port),
            user: env_or("DB_USER", defaults.user),
            password: env_or("DB_PASSWORD", defaults.password),
            database: env_or("DB_NAME", defaults.database),
            ssl_mode: env_or("DB_SSL_MODE", defaults.ssl_mode),
            max_connections: defaults.max_connections,
        }
    }

    /// Driver connect options for this configuration
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.database)
            .ssl_mode(self.parsed_ssl_mode())
    }

    fn parsed_ssl_mode(&self) -> PgSslMode {
        match self.ssl_mode.to_ascii_lowercase().as_str() {
            "disable" => PgSslMode::Disable,
            "allow" => PgSslMode::Allow,
            "require" => PgSslMode::Require,
            "verify-ca" => PgSslMode::VerifyCa,
            "verify-full" => PgSslMode::VerifyFull,
            _ => PgSslMode::Prefer,
        }
    }
}

fn env_or(name: &str, default: String) -> String {
    std::env::var(name).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DbConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 5432);
        assert_eq!(config.user, "postgres");
        assert_eq!(config.ssl_mode, "prefer");
    }

    #[test]
    fn test_unknown_ssl_mode_falls_back_to_prefer() {
        let config = DbConfig {
            ssl_mode: "bogus".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.parsed_ssl_mode(), PgSslMode::Prefer));

        let config = DbConfig {
            ssl_mode: "DISABLE".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.parsed_ssl_mode(), PgSslMode::Disable));
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let config: DbConfig = serde_json::from_str(r#"{"host": "db.internal"}"#).unwrap();
        assert_eq!(config.host, "db.internal");
        assert_eq!(config.port, 5432);
        assert_eq!(config.database, "postgres");
    }
}

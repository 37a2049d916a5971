//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `REGISTRO_CONFIG`
//! environment variable.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `REGISTRO_` override YAML values
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `REGISTRO_DATABASE__PATH=/data/registry.db` sets the `database.path` field.
//!
//! ```bash
//! # Override server port
//! REGISTRO_PORT=8080
//!
//! # Point at a different SQLite file
//! REGISTRO_DATABASE__PATH=/data/colaboradores.db
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Yaml},
};
use serde::{Deserialize, Serialize};

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "REGISTRO_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    /// Useful for CI/CD pipelines to catch config errors before deployment.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// This is the root configuration structure loaded from YAML and environment variables.
/// All fields have sensible defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// SQLite database settings
    pub database: DatabaseConfig,
    /// CORS settings for browser clients
    pub cors: CorsConfig,
}

/// SQLite database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file
    pub path: String,
    /// Create the database file if it doesn't exist yet
    pub create_if_missing: bool,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "colaboradores.db".to_string(),
            create_if_missing: true,
            max_connections: 5,
            acquire_timeout_secs: 30,
        }
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests; "*" allows all origins
    pub allowed_origins: Vec<String>,
    /// Cache preflight requests for this many seconds
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:5173".to_string()],
            max_age: Some(3600),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            database: DatabaseConfig::default(),
            cors: CorsConfig::default(),
        }
    }
}

impl Config {
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        Self::figment(args).extract()
    }

    fn figment(args: &Args) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Yaml::file(&args.config))
            .merge(Env::prefixed("REGISTRO_").split("__"))
    }

    /// Socket address string the HTTP server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// SQLite connection options derived from the database section
    pub fn connect_options(&self) -> sqlx::sqlite::SqliteConnectOptions {
        sqlx::sqlite::SqliteConnectOptions::new()
            .filename(&self.database.path)
            .create_if_missing(self.database.create_if_missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(path: &str) -> Args {
        Args {
            config: path.to_string(),
            validate: false,
        }
    }

    #[test]
    fn defaults_when_no_file() {
        figment::Jail::expect_with(|_jail| {
            let config = Config::load(&args_for("missing.yaml")).expect("defaults should load");
            assert_eq!(config.port, 3001);
            assert_eq!(config.database.path, "colaboradores.db");
            Ok(())
        });
    }

    #[test]
    fn yaml_file_overrides_defaults() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "config.yaml",
                r#"
                port: 9000
                database:
                  path: /tmp/registry.db
                "#,
            )?;
            let config = Config::load(&args_for("config.yaml")).expect("config should load");
            assert_eq!(config.port, 9000);
            assert_eq!(config.database.path, "/tmp/registry.db");
            // Untouched sections keep their defaults
            assert!(config.database.create_if_missing);
            Ok(())
        });
    }

    #[test]
    fn env_overrides_yaml() {
        figment::Jail::expect_with(|jail| {
            jail.create_file("config.yaml", "port: 9000")?;
            jail.set_env("REGISTRO_PORT", "9001");
            jail.set_env("REGISTRO_DATABASE__MAX_CONNECTIONS", "2");
            let config = Config::load(&args_for("config.yaml")).expect("config should load");
            assert_eq!(config.port, 9001);
            assert_eq!(config.database.max_connections, 2);
            Ok(())
        });
    }
}

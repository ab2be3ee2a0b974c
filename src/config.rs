//! Application configuration
//!
//! Loaded from a TOML file (default `~/.config/coworking-service/config.toml`).
//! A missing file yields defaults; a handful of environment variables
//! override file values for container deployments.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::DatabaseConfig;

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "COWORKING_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            shutdown_timeout: 30,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSection {
    pub url: String,
}

impl Default for DatabaseSection {
    fn default() -> Self {
        Self {
            url: DatabaseConfig::default().url,
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        let jwt = JwtConfig::default();
        Self {
            jwt_secret: jwt.secret,
            jwt_expiration_minutes: jwt.expiration_minutes,
        }
    }
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiration_minutes", &self.jwt_expiration_minutes)
            .finish()
    }
}

/// Bootstrap administrator, created only while the user table is empty
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            password: "admin".to_string(),
        }
    }
}

impl fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminConfig")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing` filter directive, e.g. `info` or `coworking=debug,info`
    pub level: String,
    /// `text` or `json`
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSection,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Read `path`, falling back to defaults when the file does not exist.
    /// Environment overrides are applied in both cases.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = fs::read_to_string(path)?;
            Self::from_toml(&raw)?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn from_toml(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// `DATABASE_URL`, `JWT_SECRET`, `ADMIN_EMAIL` and `ADMIN_PASSWORD`
    /// take precedence over the file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        if let Some(url) = get("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(secret) = get("JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        if let Some(email) = get("ADMIN_EMAIL") {
            self.admin.email = email;
        }
        if let Some(password) = get("ADMIN_PASSWORD") {
            self.admin.password = password;
        }
    }

    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.database.url.clone(),
        }
    }

    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.security.jwt_secret.clone(),
            expiration_minutes: self.security.jwt_expiration_minutes,
            ..JwtConfig::default()
        }
    }
}

/// `$COWORKING_CONFIG`, else `~/.config/coworking-service/config.toml`.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var(CONFIG_ENV) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("coworking-service")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults_for_the_rest() {
        let cfg = AppConfig::from_toml(
            r#"
            [server]
            port = 9090

            [security]
            jwt_secret = "s3cret"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9090);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.security.jwt_secret, "s3cret");
        assert_eq!(cfg.security.jwt_expiration_minutes, 30);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(matches!(
            AppConfig::from_toml("[server\nport = 1"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut cfg = AppConfig::default();
        cfg.apply_env(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".into()),
            "JWT_SECRET" => Some("from-env".into()),
            "ADMIN_PASSWORD" => Some(String::new()),
            _ => None,
        });
        assert_eq!(cfg.database.url, "sqlite::memory:");
        assert_eq!(cfg.jwt_config().secret, "from-env");
        assert_eq!(cfg.admin.password, "admin");
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = std::env::temp_dir().join(format!("coworking-cfg-{}", uuid::Uuid::new_v4()));
        let path = dir.join("config.toml");
        fs::create_dir_all(&dir).unwrap();
        fs::write(&path, "[server]\nport = 8123\n\n[logging]\nformat = \"json\"\n").unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.server.port, 8123);
        assert_eq!(loaded.logging.format, "json");
        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("coworking-does-not-exist.toml");
        let cfg = AppConfig::load(&path).unwrap();
        assert_eq!(cfg.server.port, 8000);
    }
}

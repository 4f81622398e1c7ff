//! Server configuration from environment variables.

use std::{env, fmt, path::PathBuf};

use tower_sessions::cookie::Key;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Signs the session cookie. At least 64 bytes.
    pub session_secret: String,
    pub host: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    /// Body limit for listing forms, which carry the image upload.
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first outside production.
    ///
    /// Required:
    /// - `SESSION_SECRET`
    ///
    /// Optional:
    /// - `DATABASE_URL` (default: `sqlite:wanderlust.db?mode=rwc`)
    /// - `HOST` / `PORT` (default: `0.0.0.0` / `8080`)
    /// - `UPLOAD_DIR` (default: `uploads`)
    /// - `MAX_UPLOAD_BYTES` (default: 10 MiB)
    pub fn from_env() -> Result<Self, ConfigError> {
        if env::var("APP_ENV").as_deref() != Ok("production") {
            dotenv::dotenv().ok();
        }
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let session_secret = var("SESSION_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("SESSION_SECRET".to_string()))?;
        if session_secret.len() < 64 {
            return Err(ConfigError::InvalidValue {
                name: "SESSION_SECRET".to_string(),
                reason: "must be at least 64 bytes".to_string(),
            });
        }

        Ok(Config {
            database_url: var("DATABASE_URL").unwrap_or_else(|| "sqlite:wanderlust.db?mode=rwc".to_string()),
            session_secret,
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse(&var, "PORT", 8080)?,
            upload_dir: var("UPLOAD_DIR").unwrap_or_else(|| "uploads".to_string()).into(),
            max_upload_bytes: parse(&var, "MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn session_key(&self) -> Result<Key, ConfigError> {
        Key::try_from(self.session_secret.as_bytes()).map_err(|e| ConfigError::InvalidValue {
            name: "SESSION_SECRET".to_string(),
            reason: e.to_string(),
        })
    }
}

fn parse<T: std::str::FromStr>(var: &impl Fn(&str) -> Option<String>, name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: fmt::Display,
{
    match var(name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name: name.to_string(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("session_secret", &"<redacted>")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("upload_dir", &self.upload_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for environment variable {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

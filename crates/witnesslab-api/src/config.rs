//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use witnesslab_episode::domain::mapper::DEFAULT_CURRENT_USER;

use crate::error::AppError;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_URL: &str = "sqlite://witnesslab.db?mode=rwc";
const DEFAULT_TICK_MS: u64 = 2000;

/// Settings for one server process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Device-local key-value store.
    pub database_url: String,
    /// Pacing interval between automatic advances.
    pub tick_interval: Duration,
    /// Directory of authored episodes. Bundled episodes are served when
    /// unset.
    pub content_dir: Option<PathBuf>,
    /// Display name for the `user` speaker code.
    pub current_user: String,
}

impl AppConfig {
    /// Reads the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` for unparsable values.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, applying defaults for unset keys.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `PORT` is not a valid u16 or
    /// `WITNESSLAB_TICK_MS` is not a positive integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned());
        let port = match lookup("PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|e| AppError::Config(format!("PORT must be a valid u16: {e}")))?,
            None => DEFAULT_PORT,
        };
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned());
        let tick_ms = match lookup("WITNESSLAB_TICK_MS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("WITNESSLAB_TICK_MS must be an integer: {e}"))
            })?,
            None => DEFAULT_TICK_MS,
        };
        if tick_ms == 0 {
            return Err(AppError::Config(
                "WITNESSLAB_TICK_MS must be greater than zero".to_owned(),
            ));
        }
        let content_dir = lookup("WITNESSLAB_CONTENT_DIR")
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);
        let current_user = lookup("WITNESSLAB_CURRENT_USER")
            .unwrap_or_else(|| DEFAULT_CURRENT_USER.to_owned());

        Ok(Self {
            host,
            port,
            database_url,
            tick_interval: Duration::from_millis(tick_ms),
            content_dir,
            current_user,
        })
    }

    /// The socket address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `HOST:PORT` is not a socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

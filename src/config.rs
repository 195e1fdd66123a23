//! Server configuration from the environment.

use axum::http::HeaderValue;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use tracing::{debug, info, instrument};

/// Default store connection string.
pub const DEFAULT_DATABASE_URL: &str = "game_results.db";
/// Default allowed cross-origin source (the frontend dev server).
pub const DEFAULT_FRONT_ORIGIN: &str = "http://localhost:4200";
/// Default bind address.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default listening port.
pub const DEFAULT_PORT: u16 = 5000;

/// Runtime configuration for the result server.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Store connection string.
    #[setters(into)]
    database_url: String,
    /// Origin allowed to make cross-origin requests.
    #[setters(into)]
    front_origin: String,
    /// Address to bind to.
    #[setters(into)]
    host: String,
    /// Port to listen on.
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            front_origin: DEFAULT_FRONT_ORIGIN.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from process environment variables.
    ///
    /// Reads `DATABASE_URL`, `FRONT_ORIGIN`, `HOST` and `PORT`, falling back to
    /// defaults for unset variables. Call `dotenvy::dotenv()` first to pick up
    /// a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PORT` is not a valid port number.
    #[instrument]
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `PORT` is not a valid port number.
    #[instrument(skip(lookup))]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(url) = lookup("DATABASE_URL") {
            config.database_url = url;
        }
        if let Some(origin) = lookup("FRONT_ORIGIN") {
            config.front_origin = origin;
        }
        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            config.port = port
                .parse()
                .map_err(|e| ConfigError::new(format!("Invalid PORT '{}': {}", port, e)))?;
        }

        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Returns the `host:port` pair to bind the listener to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured origin into a header value for the CORS layer.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the origin contains characters not allowed
    /// in an HTTP header.
    #[instrument(skip(self), fields(front_origin = %self.front_origin))]
    pub fn cors_origin(&self) -> Result<HeaderValue, ConfigError> {
        let origin = HeaderValue::from_str(&self.front_origin).map_err(|e| {
            ConfigError::new(format!("Invalid FRONT_ORIGIN '{}': {}", self.front_origin, e))
        })?;
        info!("CORS origin accepted");
        Ok(origin)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = ServerConfig::from_lookup(lookup_from(&[])).expect("defaults");
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ServerConfig::from_lookup(lookup_from(&[
            ("DATABASE_URL", "/tmp/scores.db"),
            ("FRONT_ORIGIN", "https://game.example"),
            ("HOST", "127.0.0.1"),
            ("PORT", "8080"),
        ]))
        .expect("valid config");

        assert_eq!(config.database_url(), "/tmp/scores.db");
        assert_eq!(config.front_origin(), "https://game.example");
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn invalid_port_is_rejected() {
        let result = ServerConfig::from_lookup(lookup_from(&[("PORT", "not-a-port")]));
        assert!(result.is_err());
    }

    #[test]
    fn setters_override_fields() {
        let config = ServerConfig::default().with_port(9000).with_host("localhost");
        assert_eq!(config.bind_addr(), "localhost:9000");
    }

    #[test]
    fn invalid_origin_is_rejected() {
        let config = ServerConfig::default().with_front_origin("bad\norigin");
        assert!(config.cors_origin().is_err());
    }
}

//! Process configuration, read from the environment.
//!
//! A `.env` file in the working directory is loaded first if present; real
//! environment variables win over it.

use std::net::SocketAddr;

use thiserror::Error;

use crate::write_router::WriteMode;

pub const DEFAULT_STREAM_KEY: &str = "quotedesk:events";
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
pub const DEFAULT_MAX_SEARCH_ELEMENTS: usize = 100;
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} is not a valid {expected}: {value:?}")]
    Invalid {
        var: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Publish mutations to the event stream instead of writing them.
    pub stream_consume: bool,
    /// Postgres URL; `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub redis_url: String,
    /// The one stream every outbound event goes to.
    pub stream_key: String,
    /// Upper bound on results per storage lookup.
    pub max_search_elements: usize,
    pub listen_addr: SocketAddr,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            stream_consume: false,
            database_url: None,
            redis_url: DEFAULT_REDIS_URL.to_string(),
            stream_key: DEFAULT_STREAM_KEY.to_string(),
            max_search_elements: DEFAULT_MAX_SEARCH_ELEMENTS,
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let stream_consume = match lookup("STREAM_CONSUME") {
            Some(v) => parse_bool("STREAM_CONSUME", &v)?,
            None => false,
        };

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let redis_url = lookup("REDIS_URL").unwrap_or_else(|| DEFAULT_REDIS_URL.to_string());
        let stream_key = lookup("EVENTS_STREAM_KEY").unwrap_or_else(|| DEFAULT_STREAM_KEY.to_string());

        let max_search_elements = match lookup("MAX_SEARCH_ELEMENTS") {
            Some(v) => match v.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "MAX_SEARCH_ELEMENTS",
                        expected: "positive integer",
                        value: v,
                    });
                }
            },
            None => DEFAULT_MAX_SEARCH_ELEMENTS,
        };

        let listen_addr_raw = lookup("LISTEN_ADDR").unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr = listen_addr_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::Invalid {
                var: "LISTEN_ADDR",
                expected: "socket address",
                value: listen_addr_raw.clone(),
            })?;

        Ok(Self {
            stream_consume,
            database_url,
            redis_url,
            stream_key,
            max_search_elements,
            listen_addr,
        })
    }

    pub fn write_mode(&self) -> WriteMode {
        if self.stream_consume {
            WriteMode::Streaming
        } else {
            WriteMode::Direct
        }
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            expected: "boolean",
            value: value.to_string(),
        }),
    }
}

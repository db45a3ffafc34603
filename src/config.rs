//! Relay configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).
//!
//! | Key                        | Default   |
//! |----------------------------|-----------|
//! | `LISTEN_ADDR`              | unset     |
//! | `HOST`                     | `0.0.0.0` |
//! | `PORT`                     | `3000`    |
//! | `STATIC_DIR`               | `public`  |
//! | `OUTBOUND_QUEUE_CAPACITY`  | `256`     |
//! | `LOG_FORMAT`               | `pretty`  |

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::RelayError;

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default per-connection outbound queue capacity.
pub const DEFAULT_OUTBOUND_QUEUE_CAPACITY: usize = 256;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, multi-field lines.
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(RelayError::Config(format!("unknown LOG_FORMAT {other:?}"))),
        }
    }
}

/// Top-level relay configuration.
///
/// Loaded once at startup via [`RelayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Socket address to bind the HTTP server to.
    pub listen_addr: SocketAddr,

    /// Directory served as the static front end.
    pub static_dir: PathBuf,

    /// Capacity of each connection's outbound event queue.
    pub outbound_queue_capacity: usize,

    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
            static_dir: PathBuf::from("public"),
            outbound_queue_capacity: DEFAULT_OUTBOUND_QUEUE_CAPACITY,
            log_format: LogFormat::Pretty,
        }
    }
}

impl RelayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] if `LISTEN_ADDR`, `HOST` or
    /// `LOG_FORMAT` is set but cannot be parsed.
    pub fn from_env() -> Result<Self, RelayError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// `LISTEN_ADDR` wins over `HOST`/`PORT` when set. Numeric values that
    /// fail to parse fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Config`] on an unparseable address or log
    /// format.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RelayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let listen_addr = match lookup("LISTEN_ADDR") {
            Some(addr) => addr
                .parse::<SocketAddr>()
                .map_err(|e| RelayError::Config(format!("LISTEN_ADDR {addr:?}: {e}")))?,
            None => {
                let host = match lookup("HOST") {
                    Some(host) => host
                        .parse::<IpAddr>()
                        .map_err(|e| RelayError::Config(format!("HOST {host:?}: {e}")))?,
                    None => defaults.listen_addr.ip(),
                };
                let port = parse_or(lookup("PORT"), DEFAULT_PORT);
                SocketAddr::new(host, port)
            }
        };

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.static_dir);

        let outbound_queue_capacity = parse_or(
            lookup("OUTBOUND_QUEUE_CAPACITY"),
            DEFAULT_OUTBOUND_QUEUE_CAPACITY,
        );

        let log_format = match lookup("LOG_FORMAT") {
            Some(format) => format.parse()?,
            None => defaults.log_format,
        };

        Ok(Self {
            listen_addr,
            static_dir,
            outbound_queue_capacity,
            log_format,
        })
    }
}

/// Parses an optional value as `T`, returning `default` on missing or
/// invalid input.
fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

//! Server configuration loaded from environment variables.
//!
//! | Variable | Default | Meaning |
//! |---|---|---|
//! | `HOST` | `0.0.0.0` | IP address to listen on |
//! | `PORT` | `3000` | port to listen on |
//! | `ROOM_CODE_ATTEMPTS` | `1000` | random codes tried per room creation |
//! | `LOG_LEVEL` | `info` | default level when `RUST_LOG` is unset |

use std::net::SocketAddr;

use parlor_room::RegistryConfig;

use crate::ParlorError;

/// Everything the `parlor-server` binary needs to start.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Socket address to bind the listener to.
    pub listen_addr: SocketAddr,

    /// Registry settings.
    pub registry: RegistryConfig,

    /// Default log level.
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            registry: RegistryConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from the process environment.
    ///
    /// Unset or unparsable numbers fall back to their defaults.
    ///
    /// # Errors
    /// [`ParlorError::Config`] if `HOST` and `PORT` don't form a socket
    /// address.
    pub fn from_env() -> Result<Self, ParlorError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ParlorError> {
        let defaults = Self::default();

        let host = lookup("HOST").unwrap_or_else(|| defaults.listen_addr.ip().to_string());
        let port: u16 = parse_or(lookup("PORT"), defaults.listen_addr.port());
        let listen_addr = format_addr(&host, port)
            .parse()
            .map_err(|e| ParlorError::Config(format!("bad listen address {host}:{port}: {e}")))?;

        let registry = RegistryConfig {
            max_code_attempts: parse_or(
                lookup("ROOM_CODE_ATTEMPTS"),
                defaults.registry.max_code_attempts,
            ),
        };

        let log_level = lookup("LOG_LEVEL").unwrap_or(defaults.log_level);

        Ok(Self {
            listen_addr,
            registry,
            log_level,
        })
    }
}

/// Brackets bare IPv6 hosts so the result parses as a `SocketAddr`.
fn format_addr(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

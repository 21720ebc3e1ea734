//! Server configuration read from the environment

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_THREAD_TTL_SECS: u64 = 60 * 60;

/// Where the HTTP server listens and how long idle threads are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind: IpAddr,
    pub port: u16,
    /// Threads idle longer than this are dropped from memory
    pub thread_ttl: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            thread_ttl: Duration::from_secs(DEFAULT_THREAD_TTL_SECS),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_vars(
            std::env::var("CHATBOT_BIND").ok().as_deref(),
            std::env::var("CHATBOT_PORT").ok().as_deref(),
            std::env::var("CHATBOT_THREAD_TTL_SECS").ok().as_deref(),
        )
    }

    /// Unparseable values fall back to the defaults with a warning
    fn from_vars(bind: Option<&str>, port: Option<&str>, ttl_secs: Option<&str>) -> Self {
        let defaults = Self::default();
        let bind = bind.map_or(defaults.bind, |raw| {
            raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid CHATBOT_BIND, using default");
                defaults.bind
            })
        });
        let port = port.map_or(defaults.port, |raw| {
            raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid CHATBOT_PORT, using default");
                defaults.port
            })
        });
        let thread_ttl = ttl_secs.map_or(defaults.thread_ttl, |raw| {
            match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %raw, "Invalid CHATBOT_THREAD_TTL_SECS, using default");
                    defaults.thread_ttl
                }
            }
        });
        Self {
            bind,
            port,
            thread_ttl,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

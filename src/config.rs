//! Draw configuration constants and server settings

use std::env;

use crate::error::LotteryError;

/// Highest number in the pool; the pool holds 1..=POOL_SIZE
pub const POOL_SIZE: u8 = 36;

/// Rolling animation tick period in milliseconds
pub const ROLL_TICK_MS: u64 = 100;

/// Default bind host
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port
pub const DEFAULT_PORT: u16 = 8080;

/// Broadcast channel capacity
pub const BROADCAST_CAPACITY: usize = 100;

/// Default draw event log path
pub const DEFAULT_EVENT_LOG_FILE: &str = "draw_events.log";

/// Server settings, read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Draw event log path, `None` when event logging is off
    pub event_log: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            event_log: Some(DEFAULT_EVENT_LOG_FILE.to_string()),
        }
    }
}

impl ServerConfig {
    /// Load config from `LOTTERY_HOST`, `LOTTERY_PORT` and `LOTTERY_EVENT_LOG`
    pub fn from_env() -> Result<Self, LotteryError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, LotteryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("LOTTERY_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("LOTTERY_PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| LotteryError::InvalidConfig {
                    key: "LOTTERY_PORT",
                    value: raw.clone(),
                })?,
            None => DEFAULT_PORT,
        };

        let event_log = match lookup("LOTTERY_EVENT_LOG") {
            Some(path) if path.trim().is_empty() || path.trim().eq_ignore_ascii_case("off") => None,
            Some(path) => Some(path),
            None => Some(DEFAULT_EVENT_LOG_FILE.to_string()),
        };

        Ok(Self { host, port, event_log })
    }

    /// Full bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

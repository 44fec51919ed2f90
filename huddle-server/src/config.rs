use crate::error::ServerError;
use std::net::SocketAddr;

pub const ENV_ADDR: &str = "HUDDLE_ADDR";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `HUDDLE_ADDR`.
    pub fn from_env() -> Result<Self, ServerError> {
        match std::env::var(ENV_ADDR) {
            Ok(addr) if !addr.trim().is_empty() => Self::with_addr(&addr),
            _ => Ok(Self::default()),
        }
    }

    pub fn with_addr(addr: &str) -> Result<Self, ServerError> {
        let addr = addr
            .trim()
            .parse()
            .map_err(|_| ServerError::InvalidAddr(addr.to_owned()))?;
        Ok(Self { addr })
    }
}

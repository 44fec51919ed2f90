use crate::error::ConfigError;
use crate::transport::TransportConfig;
use huddle_core::utils::{DEFAULT_REMOTE_SLOTS, DEFAULT_SIGNALING_URL};
use huddle_core::{IceServerConfig, RoomId};
use serde::{Deserialize, Serialize};

pub const ENV_SIGNALING_URL: &str = "HUDDLE_SIGNALING_URL";
pub const ENV_ROOM: &str = "HUDDLE_ROOM";
pub const ENV_SLOTS: &str = "HUDDLE_SLOTS";
pub const ENV_ICE_URL: &str = "HUDDLE_ICE_URL";
pub const ENV_ICE_USERNAME: &str = "HUDDLE_ICE_USERNAME";
pub const ENV_ICE_CREDENTIAL: &str = "HUDDLE_ICE_CREDENTIAL";

/// Settings of one participant in a call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CallConfig {
    pub signaling_url: String,
    pub room: RoomId,
    /// Relay endpoints handed to every peer connection.
    pub ice_servers: Vec<IceServerConfig>,
    /// Number of remote render targets, i.e. how many peers can be shown at once.
    pub remote_slots: usize,
}

impl Default for CallConfig {
    fn default() -> Self {
        Self {
            signaling_url: DEFAULT_SIGNALING_URL.to_owned(),
            room: RoomId::from("default"),
            ice_servers: TransportConfig::default().ice_servers,
            remote_slots: DEFAULT_REMOTE_SLOTS,
        }
    }
}

impl CallConfig {
    /// Defaults overridden by `HUDDLE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_vars(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub(crate) fn apply_vars<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(url) = var(ENV_SIGNALING_URL) {
            self.signaling_url = url;
        }
        if let Some(room) = var(ENV_ROOM) {
            self.room = RoomId::from(room);
        }
        if let Some(slots) = var(ENV_SLOTS) {
            self.remote_slots = slots.trim().parse().map_err(|_| ConfigError::InvalidValue {
                name: ENV_SLOTS,
                value: slots.clone(),
            })?;
        }
        if let Some(url) = var(ENV_ICE_URL) {
            // An explicit relay replaces the public STUN defaults.
            self.ice_servers = vec![IceServerConfig {
                urls: url.split(',').map(|u| u.trim().to_owned()).collect(),
                username: var(ENV_ICE_USERNAME),
                credential: var(ENV_ICE_CREDENTIAL),
            }];
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.signaling_url.starts_with("ws://") || self.signaling_url.starts_with("wss://")) {
            return Err(ConfigError::SignalingUrl(self.signaling_url.clone()));
        }
        if self.remote_slots == 0 {
            return Err(ConfigError::NoRemoteSlots);
        }
        if let Some(idx) = self.ice_servers.iter().position(|s| s.urls.is_empty()) {
            return Err(ConfigError::EmptyIceServer(idx));
        }
        Ok(())
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            ice_servers: self.ice_servers.clone(),
        }
    }
}

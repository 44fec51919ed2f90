use huddle_core::PeerId;
use std::net::SocketAddr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("peer {0} is not connected")]
    UnknownPeer(PeerId),
    #[error("peer {0} is not in your room")]
    NotInRoom(PeerId),
    #[error("join a room before sending {0}")]
    NoRoom(&'static str),
    #[error("unexpected {0} message from a client")]
    Unexpected(&'static str),
    #[error("connection to {0} is closed")]
    Closed(PeerId),
    #[error("failed to encode signal message: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("invalid listen address {0:?}")]
    InvalidAddr(String),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

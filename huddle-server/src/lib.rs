mod config;
mod error;
mod room;
mod signaling;

pub use config::*;
pub use error::*;
pub use room::*;
pub use signaling::*;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::info;

/// `/ws` upgrades to a signaling session; `/health` answers `ok`.
pub fn router(service: SignalingService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(health))
        .with_state(service)
}

/// Binds `config.addr` and serves until the task is cancelled.
pub async fn serve(config: ServerConfig) -> Result<(), ServerError> {
    let listener = TcpListener::bind(config.addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: config.addr,
            source,
        })?;
    info!("Signaling server listening on ws://{}/ws", config.addr);

    run(listener, SignalingService::new()).await
}

pub async fn run(listener: TcpListener, service: SignalingService) -> Result<(), ServerError> {
    axum::serve(listener, router(service))
        .await
        .map_err(ServerError::Serve)
}

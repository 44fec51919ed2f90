use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use huddle_client::{CallConfig, CallSession, WebRtcTransport, WsSignaling};
use huddle_core::{IceServerConfig, RoomId};
use huddle_server::ServerConfig;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huddle")]
#[command(bin_name = "huddle")]
#[command(about = "Multi-party video calls over a room-based signaling server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the signaling server.
    Serve {
        /// Listen address [env: HUDDLE_ADDR, default: 0.0.0.0:3000]
        #[arg(long)]
        addr: Option<String>,
    },
    /// Join a room as a headless participant.
    Join(JoinArgs),
}

/// Flags override the matching `HUDDLE_*` environment variables.
#[derive(clap::Args)]
struct JoinArgs {
    /// Signaling server WebSocket URL
    #[arg(long)]
    url: Option<String>,

    #[arg(long)]
    room: Option<String>,

    /// Number of remote peers shown at once
    #[arg(long)]
    slots: Option<usize>,

    /// Comma-separated STUN/TURN urls replacing the defaults
    #[arg(long)]
    ice: Option<String>,

    #[arg(long, requires = "ice")]
    ice_username: Option<String>,

    #[arg(long, requires = "ice")]
    ice_credential: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Serve { addr } => serve(addr).await,
        Commands::Join(args) => join(args).await,
    }
}

async fn serve(addr: Option<String>) -> Result<()> {
    let config = match addr {
        Some(addr) => ServerConfig::with_addr(&addr)?,
        None => ServerConfig::from_env()?,
    };

    println!(
        "{} {}",
        "🚀 Signaling server on".green().bold(),
        format!("ws://{}/ws", config.addr).cyan()
    );

    tokio::select! {
        res = huddle_server::serve(config) => res.context("Signaling server stopped")?,
        _ = tokio::signal::ctrl_c() => println!("{}", "Shutting down".yellow()),
    }
    Ok(())
}

async fn join(args: JoinArgs) -> Result<()> {
    let config = call_config(args)?;

    let (signaling, inbound) = WsSignaling::connect(&config.signaling_url, config.room.clone())
        .await
        .with_context(|| format!("Failed to reach {}", config.signaling_url))?;

    let session = CallSession::headless(
        &config,
        Arc::new(WebRtcTransport::new()),
        Arc::new(signaling.clone()),
    );
    let mut call = tokio::spawn(session.run(inbound));

    println!(
        "{} {} {}",
        "📞 Joined".green().bold(),
        config.room.to_string().cyan(),
        format!("({} remote slots)", config.remote_slots).dimmed()
    );

    tokio::select! {
        res = &mut call => {
            res.context("Call task failed")?;
            println!("{}", "Signaling server closed the call".yellow());
            return Ok(());
        }
        res = tokio::signal::ctrl_c() => res.context("Failed to listen for Ctrl-C")?,
    }

    info!("Leaving room {}", config.room);
    signaling.hang_up();
    call.await.context("Call task failed")?;

    println!("{}", "👋 Left the call".green());
    Ok(())
}

fn call_config(args: JoinArgs) -> Result<CallConfig> {
    let mut config = CallConfig::from_env().context("Invalid HUDDLE_* environment")?;

    if let Some(url) = args.url {
        config.signaling_url = url;
    }
    if let Some(room) = args.room {
        config.room = RoomId::from(room);
    }
    if let Some(slots) = args.slots {
        config.remote_slots = slots;
    }
    if let Some(ice) = args.ice {
        config.ice_servers = vec![IceServerConfig {
            urls: ice.split(',').map(|u| u.trim().to_owned()).collect(),
            username: args.ice_username,
            credential: args.ice_credential,
        }];
    }

    config.validate()?;
    Ok(config)
}

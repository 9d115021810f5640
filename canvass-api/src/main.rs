//! canvass-api - Survey response collection and report delivery service
//!
//! Collects survey responses from untrusted end users (at most one per
//! (survey, phone) key, enforced by the store), notifies a side channel on
//! every recorded response, and delivers compiled reports to administrators
//! on demand.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use canvass_api::channels::{DeliveryChannel, NotifyChannel, TelegramChannel};
use canvass_api::services::notify::run_notifier;
use canvass_api::{build_router, AppState};
use canvass_common::config::Config;
use canvass_common::db::init_database;
use canvass_common::events::EventBus;

#[derive(Debug, Parser)]
#[command(name = "canvass-api", about = "Survey response collection service")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Canvass survey service v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();
    let config = Arc::new(Config::load(args.config.as_deref())?);

    let pool = init_database(&config.database_path).await?;
    info!("Database ready: {}", config.database_path.display());

    // One channel client serves both roles when credentials are present
    let telegram = config.telegram.as_ref().map(TelegramChannel::new).map(Arc::new);
    let notify_channel: Option<Arc<dyn NotifyChannel>> =
        telegram.clone().map(|c| c as Arc<dyn NotifyChannel>);
    let delivery_channel: Option<Arc<dyn DeliveryChannel>> =
        telegram.map(|c| c as Arc<dyn DeliveryChannel>);

    if notify_channel.is_none() {
        info!("Telegram channel not configured; notifications disabled, export will fail");
    }

    // The notification dispatcher outlives any request; it consumes the bus
    // from a detached task so submission latency never depends on it
    let events = EventBus::default();
    tokio::spawn(run_notifier(events.subscribe(), notify_channel));

    let state = AppState::new(pool, config.clone(), events, delivery_channel);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("canvass-api listening on http://{}", config.bind_address);
    info!("Health check: http://{}/health", config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}

mod bot;
mod config;
mod database;
mod keepalive;
mod ledger;
mod scheduler;
mod utils;

use anyhow::Result;
use config::Config;
use ledger::{AttendanceLedger, Clock, LedgerSettings, SystemClock};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "discord_fishing=info,poise=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env()?;
    let offset = utils::time::reference_offset(config.utc_offset_hours)?;

    // A corrupt ledger stops startup here rather than running on an empty one
    let store = database::open_store(&config).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let settings = LedgerSettings {
        offset,
        name_matching: config.name_matching,
        retention_days: config.retention_days,
    };
    let ledger = Arc::new(Mutex::new(
        AttendanceLedger::open(store, clock.clone(), settings).await?,
    ));

    scheduler::spawn_daily_reset(ledger.clone(), clock, offset);

    if let Some(port) = config.keepalive_port {
        tokio::spawn(async move {
            if let Err(e) = keepalive::serve(port).await {
                tracing::error!("Keep-alive listener stopped: {:?}", e);
            }
        });
    }

    // Create and start the bot
    let mut client = bot::create_bot(config, ledger).await?;

    tracing::info!("Starting Discord bot...");

    if let Err(why) = client.start().await {
        tracing::error!("Client error: {:?}", why);
    }

    Ok(())
}

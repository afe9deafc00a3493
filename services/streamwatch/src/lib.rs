//! Streamwatch - Twitch live-status monitor
//!
//! Polls the Twitch Helix API for a fixed set of channels, detects
//! online/offline transitions, and pushes notifications through Gotify.

pub mod config;
pub mod engine;
pub mod error;
pub mod gotify;
pub mod io;
pub mod monitor;
pub mod notifier;
pub mod state;
pub mod token;
pub mod twitch;

pub use config::{load_env_file, Config};
pub use error::{Result, StreamwatchError};

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::engine::Engine;
use crate::gotify::GotifyNotifier;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::monitor::StatusFetcher;
use crate::notifier::Notifier;
use crate::token::TokenCache;
use crate::twitch::TwitchStatusFetcher;

/// Run the monitor with the given configuration until Ctrl-C
pub async fn run(config: Config) -> Result<()> {
    config.validate()?;

    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::new()?);
    let cancel = CancellationToken::new();

    let tokens = TokenCache::new(&config.client_id, &config.client_secret, Arc::clone(&http));
    let fetcher: Arc<dyn StatusFetcher> = Arc::new(TwitchStatusFetcher::new(
        &config.client_id,
        tokens,
        Arc::clone(&http),
    ));
    let notifier: Arc<dyn Notifier> = Arc::new(GotifyNotifier::new(
        &config.gotify_url,
        &config.gotify_token,
        Arc::clone(&http),
    ));

    let mut engine = Engine::new(&config, fetcher, notifier, cancel.clone());

    // Setup shutdown handler
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Shutdown signal received");
        cancel_for_signal.cancel();
    });

    tracing::info!(
        "Streamwatch started, polling every {} s",
        config.poll_interval.as_secs()
    );

    engine.run().await?;

    tracing::info!("Streamwatch stopped");
    Ok(())
}

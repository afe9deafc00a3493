//! Engine: baselines channel state, then polls, diffs and notifies

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::monitor::{ChannelState, StatusFetcher, Transition};
use crate::notifier::{notify_best_effort, Notification, Notifier};
use crate::state::StatusTable;
use crate::StreamwatchError;

/// Consecutive failed cycles after which a warning is logged
const ERROR_WARN_THRESHOLD: u32 = 5;

/// The engine owns the status table and drives the poll loop
#[derive(Debug)]
pub struct Engine {
    fetcher: Arc<dyn StatusFetcher>,
    notifier: Arc<dyn Notifier>,
    poll_interval: Duration,
    table: StatusTable,
    cancel: CancellationToken,
}

impl Engine {
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn StatusFetcher>,
        notifier: Arc<dyn Notifier>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            poll_interval: config.poll_interval,
            table: StatusTable::new(&config.channels),
            cancel,
        }
    }

    pub fn table(&self) -> &StatusTable {
        &self.table
    }

    /// Announce startup, capture the baseline, then poll until cancelled.
    ///
    /// Only an empty channel list is fatal; every later failure is logged and
    /// the loop carries on.
    pub async fn run(&mut self) -> crate::Result<()> {
        if self.table.is_empty() {
            tracing::error!("No channels configured, set CHANNELS");
            return Err(StreamwatchError::Config(
                "no channels configured".to_string(),
            ));
        }

        self.announce_startup().await;
        self.baseline().await;

        let channels = self.channel_names();
        tracing::info!(
            "Monitoring {} channel(s): {}",
            channels.len(),
            channels.join(", ")
        );

        loop {
            if let Err(e) = self.poll_once().await {
                let errors = self.table.record_error();
                tracing::warn!("Poll cycle failed, keeping previous state: {}", e);
                if errors == ERROR_WARN_THRESHOLD {
                    tracing::warn!("{} consecutive poll cycles have failed", errors);
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(self.poll_interval) => {}
                _ = self.cancel.cancelled() => {
                    tracing::debug!("Polling loop cancelled");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Send the fixed startup notification
    pub async fn announce_startup(&self) {
        tracing::info!("Sending startup notification");
        notify_best_effort(self.notifier.as_ref(), &Notification::startup()).await;
    }

    /// Fetch once and record the result as the starting state.
    ///
    /// Channels already live get an "already live" notification. On failure
    /// the table stays Unknown and the first poll adopts the baseline.
    pub async fn baseline(&mut self) {
        tracing::info!("Checking initial stream status");
        let channels = self.channel_names();
        let status = match self.fetcher.fetch_status(&channels).await {
            Ok(status) => status,
            Err(e) => {
                tracing::error!("Error checking initial stream status: {}", e);
                return;
            }
        };

        for name in &channels {
            match status.get(name) {
                Some(true) => {
                    notify_best_effort(self.notifier.as_ref(), &Notification::already_live(name))
                        .await
                }
                Some(false) => tracing::info!("{} is currently offline at startup", name),
                None => tracing::warn!("No status returned for {}", name),
            }
        }
        self.table.apply(&status);
    }

    /// Run one fetch/diff/notify cycle.
    ///
    /// Returns the transitions that were notified. A fetch error leaves the
    /// table untouched.
    pub async fn poll_once(&mut self) -> crate::Result<Vec<(String, Transition)>> {
        let channels = self.channel_names();
        let status = self.fetcher.fetch_status(&channels).await?;
        self.table.record_success();

        let mut transitions = Vec::new();
        for name in &channels {
            let Some(&live) = status.get(name) else {
                tracing::warn!("No status returned for {}", name);
                continue;
            };
            let current = ChannelState::from(live);
            let previous = self
                .table
                .set(name, current)
                .unwrap_or(ChannelState::Unknown);

            tracing::debug!("Poll '{}': {} -> {}", name, previous, current);

            if previous == ChannelState::Unknown {
                tracing::debug!("Adopted {} as baseline for {}", current, name);
                continue;
            }

            if let Some(transition) = Transition::between(previous, current) {
                let notification = match transition {
                    Transition::WentLive => Notification::went_live(name),
                    Transition::EndedStream => Notification::ended_stream(name),
                };
                notify_best_effort(self.notifier.as_ref(), &notification).await;
                transitions.push((name.clone(), transition));
            }
        }

        Ok(transitions)
    }

    fn channel_names(&self) -> Vec<String> {
        self.table.names().map(str::to_string).collect()
    }
}

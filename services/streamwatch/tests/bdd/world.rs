//! BDD test world for streamwatch

use std::sync::Arc;
use std::time::Duration;

use cucumber::World;
use tokio_util::sync::CancellationToken;

use streamwatch::engine::Engine;
use streamwatch::monitor::{StatusFetcher, StatusMap, Transition};
use streamwatch::notifier::Notifier;
use streamwatch::Config;

use crate::doubles::{FakeTwitch, RecordingNotifier, ScriptedFetcher};

#[derive(Debug, Default, World)]
pub struct StreamwatchWorld {
    pub channels: Vec<String>,

    // Engine testing
    pub fetcher: Arc<ScriptedFetcher>,
    pub notifier: Arc<RecordingNotifier>,
    pub engine: Option<Engine>,
    pub poll_result: Option<streamwatch::Result<Vec<(String, Transition)>>>,
    pub run_result: Option<streamwatch::Result<()>>,

    // Fetcher testing
    pub twitch: Arc<FakeTwitch>,
    pub status_result: Option<streamwatch::Result<StatusMap>>,
}

impl StreamwatchWorld {
    pub fn config(&self) -> Config {
        Config {
            client_id: "test-client".to_string(),
            client_secret: "test-secret".to_string(),
            channels: self.channels.clone(),
            gotify_url: "http://gotify.invalid".to_string(),
            gotify_token: "test-token".to_string(),
            poll_interval: Duration::from_millis(10),
        }
    }

    pub fn new_engine(&self, cancel: CancellationToken) -> Engine {
        Engine::new(
            &self.config(),
            Arc::clone(&self.fetcher) as Arc<dyn StatusFetcher>,
            Arc::clone(&self.notifier) as Arc<dyn Notifier>,
            cancel,
        )
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        if self.engine.is_none() {
            self.engine = Some(self.new_engine(CancellationToken::new()));
        }
        self.engine.as_mut().expect("engine just built")
    }
}

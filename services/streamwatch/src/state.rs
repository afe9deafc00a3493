//! Last-known status of every watched channel

use crate::monitor::{ChannelState, StatusMap};

/// Status of a single channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelStatus {
    pub name: String,
    pub state: ChannelState,
}

/// Table of channel states carried between poll cycles, in configured order
#[derive(Debug, Clone, Default)]
pub struct StatusTable {
    channels: Vec<ChannelStatus>,
    consecutive_errors: u32,
}

impl StatusTable {
    pub fn new(channel_names: &[String]) -> Self {
        let channels = channel_names
            .iter()
            .map(|name| ChannelStatus {
                name: name.clone(),
                state: ChannelState::Unknown,
            })
            .collect();

        Self {
            channels,
            consecutive_errors: 0,
        }
    }

    /// Get a channel's current state
    pub fn get(&self, name: &str) -> Option<ChannelState> {
        self.channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.state)
    }

    /// Set a channel's state, returning the previous one
    pub fn set(&mut self, name: &str, state: ChannelState) -> Option<ChannelState> {
        self.channels
            .iter_mut()
            .find(|c| c.name == name)
            .map(|c| std::mem::replace(&mut c.state, state))
    }

    /// Overwrite every channel with the state found in `status`.
    ///
    /// Channels missing from `status` are left untouched.
    pub fn apply(&mut self, status: &StatusMap) {
        for channel in &mut self.channels {
            if let Some(live) = status.get(&channel.name) {
                channel.state = ChannelState::from(*live);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Channel names in configured order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.name.as_str())
    }

    /// Record a failed poll cycle, returning the running count
    pub fn record_error(&mut self) -> u32 {
        self.consecutive_errors += 1;
        self.consecutive_errors
    }

    pub fn record_success(&mut self) {
        self.consecutive_errors = 0;
    }
}

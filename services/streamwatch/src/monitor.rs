//! Status fetcher trait and channel state types

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;

/// Channel login -> currently live
pub type StatusMap = HashMap<String, bool>;

/// The last known state of a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Online,
    Offline,
    Unknown,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChannelState::Online => write!(f, "Online"),
            ChannelState::Offline => write!(f, "Offline"),
            ChannelState::Unknown => write!(f, "Unknown"),
        }
    }
}

impl From<bool> for ChannelState {
    fn from(live: bool) -> Self {
        if live {
            ChannelState::Online
        } else {
            ChannelState::Offline
        }
    }
}

/// An edge between two observed states that warrants a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    WentLive,
    EndedStream,
}

impl Transition {
    /// Classify a change; `None` for no-ops and for adopting a first baseline
    pub fn between(previous: ChannelState, current: ChannelState) -> Option<Self> {
        match (previous, current) {
            (ChannelState::Offline, ChannelState::Online) => Some(Transition::WentLive),
            (ChannelState::Online, ChannelState::Offline) => Some(Transition::EndedStream),
            _ => None,
        }
    }
}

/// Source of channel liveness
#[async_trait]
pub trait StatusFetcher: Send + Sync + fmt::Debug {
    /// Fetch the live state of every given channel.
    ///
    /// Either every channel is present in the result or an error is returned.
    async fn fetch_status(&self, channels: &[String]) -> crate::Result<StatusMap>;
}

//! Connection tracking annotations.
//!
//! Conntrack state is a sidecar on the path data: the simulator copies the
//! visited node's entry onto the step untouched, it never advances states.

use serde::{Deserialize, Serialize};

/// TCP connection tracking states as conntrack reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConntrackState {
    New,
    SynSent,
    SynRecv,
    Established,
    FinWait,
    CloseWait,
    LastAck,
    TimeWait,
    Closed,
}

impl ConntrackState {
    /// Human-readable description of the state.
    pub fn describe(&self) -> &'static str {
        match self {
            ConntrackState::New => "New connection. First packet seen, no reply yet.",
            ConntrackState::SynSent => "SYN packet sent. Waiting for SYN-ACK from remote.",
            ConntrackState::SynRecv => "SYN received, SYN-ACK sent. Awaiting final ACK.",
            ConntrackState::Established => {
                "Connection established. Bidirectional traffic allowed."
            }
            ConntrackState::FinWait => "FIN sent. Waiting for remote to acknowledge close.",
            ConntrackState::CloseWait => "FIN received. Waiting for application to close.",
            ConntrackState::LastAck => "Sent final FIN. Waiting for last ACK.",
            ConntrackState::TimeWait => "Connection closed. Waiting for stale packets (2MSL).",
            ConntrackState::Closed => "Connection fully closed. Entry will be removed.",
        }
    }
}

/// A conntrack table entry as seen while a function runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConntrackEntry {
    pub state: ConntrackState,
    pub description: String,
    /// Seconds until the entry expires, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u32>,
}

impl ConntrackEntry {
    pub fn new(state: ConntrackState) -> Self {
        Self {
            state,
            description: state.describe().to_string(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, seconds: u32) -> Self {
        self.timeout = Some(seconds);
        self
    }
}

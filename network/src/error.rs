// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors raised at the AI transport boundary

use std::time::Duration;

use abalone_core::GameError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BridgeError {
    /// No connection has been established, or it was lost
    #[error("AI service is not connected")]
    NotConnected,

    /// The bridge was closed while the request was waiting
    #[error("AI bridge closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The peer sent something that is not a valid message
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("AI service did not answer within {0:?}")]
    Timeout(Duration),
}

impl BridgeError {
    /// True when the failure means the connection is gone
    pub fn is_connection_loss(&self) -> bool {
        matches!(self, BridgeError::NotConnected | BridgeError::Closed | BridgeError::Io(_))
    }

    /// The session-level error this failure surfaces as, if any
    pub fn to_game_error(&self) -> Option<GameError> {
        self.is_connection_loss().then_some(GameError::ConnectionUnavailable)
    }
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::Protocol(err.to_string())
    }
}

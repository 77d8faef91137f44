// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bridge between a game session and the remote AI service.
//!
//! The bridge owns the transport and an explicit [`ConnectionState`]. Moves
//! are requested through an [`AiRequester`] handle so a request can run on
//! its own task while the session keeps processing input. Closing the
//! bridge wakes every waiting requester with [`BridgeError::Closed`].

use std::sync::Arc;
use std::time::Duration;

use abalone_core::{transition, AiAction, AiRequest, BoardState, ConnectionState, GameError, Limits, MoveTransition};
use tokio::sync::{watch, Mutex};
use tokio::time::timeout;

use crate::error::BridgeError;
use crate::protocol::MoveRequest;
use crate::transport::AiTransport;

type SharedTransport = Arc<Mutex<Box<dyn AiTransport>>>;

/// Timeouts applied by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BridgeTimeouts {
    pub connect: Duration,
    pub request: Duration,
}

impl Default for BridgeTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            request: Duration::from_secs(60),
        }
    }
}

pub struct AiBridge {
    transport: SharedTransport,
    state: ConnectionState,
    timeouts: BridgeTimeouts,
    /// `true` while closed; requesters watch it to abandon their wait
    closed: watch::Sender<bool>,
}

impl AiBridge {
    pub fn new(transport: Box<dyn AiTransport>, timeouts: BridgeTimeouts) -> Self {
        let (closed, _) = watch::channel(true);
        Self {
            transport: Arc::new(Mutex::new(transport)),
            state: ConnectionState::Disconnected,
            timeouts,
            closed,
        }
    }

    /// Connect the transport. Failure is reported, never raised.
    ///
    /// A live connection is kept as is.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn connect(&mut self) -> ConnectionState {
        if self.state == ConnectionState::Connected {
            tracing::debug!("AI service already connected");
            return self.state;
        }
        // Wake any requester still holding the transport
        self.closed.send_replace(true);

        let mut transport = self.transport.lock().await;
        let peer = transport.describe();
        let result = match timeout(self.timeouts.connect, transport.connect()).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::Timeout(self.timeouts.connect)),
        };

        self.state = match result {
            Ok(()) => {
                self.closed.send_replace(false);
                ConnectionState::Connected
            }
            Err(e) => {
                tracing::warn!("Unable to connect to AI service at {}: {}", peer, e);
                ConnectionState::Disconnected
            }
        };
        self.state
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.state
    }

    /// Record a failure seen by a requester
    pub fn report(&mut self, error: &BridgeError) {
        if error.is_connection_loss() && self.state == ConnectionState::Connected {
            tracing::warn!("AI connection lost: {}", error);
            self.state = ConnectionState::Disconnected;
        }
    }

    /// Handle for issuing requests from another task
    pub fn requester(&self) -> AiRequester {
        AiRequester {
            transport: self.transport.clone(),
            closed: self.closed.subscribe(),
            connected: self.state == ConnectionState::Connected,
            timeout: self.timeouts.request,
        }
    }

    /// Ask for the move on `turn`, computed against `board`
    pub async fn request_move(&self, board: BoardState, turn: u32, limits: &Limits) -> Result<AiAction, BridgeError> {
        self.requester().request(AiRequest::new(board, turn, limits)).await
    }

    /// Rebuild the local transition for `action`; never touches `board`
    pub fn translate(&self, action: &AiAction, board: &BoardState) -> Result<MoveTransition, GameError> {
        transition::from_external_action(board, action)
    }

    /// Cancel pending waits and close the transport
    pub async fn close(&mut self) {
        self.closed.send_replace(true);
        self.transport.lock().await.close().await;
        if self.state == ConnectionState::Connected {
            tracing::info!("AI bridge closed");
        }
        self.state = ConnectionState::Disconnected;
    }
}

/// A cloneable way to issue one request without borrowing the bridge
pub struct AiRequester {
    transport: SharedTransport,
    closed: watch::Receiver<bool>,
    connected: bool,
    timeout: Duration,
}

impl AiRequester {
    pub async fn request(mut self, packet: AiRequest) -> Result<AiAction, BridgeError> {
        if !self.connected || *self.closed.borrow() {
            return Err(BridgeError::NotConnected);
        }

        let request = MoveRequest::new(packet);
        let id = request.request_id;
        let turn = request.packet.turn;
        tracing::debug!("Sending AI request {} for turn {}", id, turn);

        let transport = self.transport.clone();
        let limit = self.timeout;
        let exchange = async move {
            let mut transport = transport.lock().await;
            timeout(limit, transport.request(request)).await
        };

        tokio::select! {
            result = exchange => match result {
                Ok(Ok(response)) => {
                    tracing::info!("AI answered request {} for turn {}", id, turn);
                    Ok(response.action)
                }
                Ok(Err(e)) => Err(e),
                Err(_) => Err(BridgeError::Timeout(limit)),
            },
            _ = self.closed.wait_for(|closed| *closed) => {
                tracing::debug!("Request {} cancelled by close", id);
                Err(BridgeError::Closed)
            }
        }
    }
}

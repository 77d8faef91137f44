// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common utilities for network integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use abalone_core::{AiAction, Color, MoveResolver};
use abalone_network::{AiTransport, BridgeError, MoveRequest, MoveResponse, SessionUpdate};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use tokio::sync::{mpsc, Notify};

// Initialize logging for tests
static INIT_LOGGING: Lazy<()> = Lazy::new(|| {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
});

pub fn init_logging() {
    Lazy::force(&INIT_LOGGING);
}

type Responder = Box<dyn FnMut(&MoveRequest) -> Option<AiAction> + Send + Sync>;

/// In-memory AI service driven by a closure.
///
/// A responder returning `None` never answers.
pub struct ScriptedTransport {
    connected: bool,
    refuse: Arc<AtomicBool>,
    gate: Option<Arc<Notify>>,
    respond: Responder,
    requests: Arc<Mutex<Vec<MoveRequest>>>,
}

impl ScriptedTransport {
    pub fn new(respond: impl FnMut(&MoveRequest) -> Option<AiAction> + Send + Sync + 'static) -> Self {
        Self {
            connected: false,
            refuse: Arc::new(AtomicBool::new(false)),
            gate: None,
            respond: Box::new(respond),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A service that plays the first legal move it finds
    pub fn first_legal() -> Self {
        Self::new(|request| Some(first_legal_action(request)))
    }

    /// Answers wait until the returned gate is notified once per answer
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    /// Shared switch that makes `connect` fail while set
    pub fn refuse_switch(&self) -> Arc<AtomicBool> {
        self.refuse.clone()
    }

    /// Requests seen so far
    pub fn log(&self) -> Arc<Mutex<Vec<MoveRequest>>> {
        self.requests.clone()
    }
}

#[async_trait]
impl AiTransport for ScriptedTransport {
    fn describe(&self) -> String {
        "scripted".to_string()
    }

    async fn connect(&mut self) -> Result<(), BridgeError> {
        if self.refuse.load(Ordering::SeqCst) {
            return Err(BridgeError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "refused",
            )));
        }
        self.connected = true;
        Ok(())
    }

    async fn request(&mut self, request: MoveRequest) -> Result<MoveResponse, BridgeError> {
        if !self.connected {
            return Err(BridgeError::NotConnected);
        }
        self.requests.lock().unwrap().push(request.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match (self.respond)(&request) {
            Some(action) => Ok(MoveResponse {
                request_id: request.request_id,
                action,
            }),
            None => std::future::pending().await,
        }
    }

    async fn close(&mut self) {
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

/// The first legal move for the color to play in `request`
pub fn first_legal_action(request: &MoveRequest) -> AiAction {
    let packet = &request.packet;
    let color = Color::for_turn(packet.turn);
    let moves = MoveResolver::legal_moves(&packet.state, color);
    let chosen = &moves[0];
    AiAction {
        turn: packet.turn,
        marbles: chosen.origins().to_vec(),
        direction: chosen.direction,
        time: 0.5,
        state: packet.state,
    }
}

/// Receive updates until one satisfies `pred`
pub async fn wait_for<F>(updates: &mut mpsc::Receiver<SessionUpdate>, mut pred: F) -> SessionUpdate
where
    F: FnMut(&SessionUpdate) -> bool,
{
    let search = async {
        while let Some(update) = updates.recv().await {
            if pred(&update) {
                return update;
            }
        }
        panic!("driver closed the update channel");
    };
    tokio::time::timeout(Duration::from_secs(30), search)
        .await
        .expect("timed out waiting for update")
}

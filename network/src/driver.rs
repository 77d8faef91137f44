// SPDX-License-Identifier: MIT OR Apache-2.0

//! Async driver that runs one game session.
//!
//! User commands, clock ticks and AI responses all arrive as messages and
//! are handled one at a time by [`SessionDriver::run`], so the session is
//! only ever mutated from this loop.

use std::time::Duration;

use abalone_core::{
    AiAction, AiReceipt, ClockPhase, ConnectionState, GameError, GameOutcome, GameSession, MoveRecord, SessionView,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::bridge::AiBridge;
use crate::error::BridgeError;
use crate::msg::{Notice, SessionUpdate, UserCommand};
use crate::schedule::ClockSchedule;

const CHANNEL_SIZE: usize = 64;

/// Tunables of the driver loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSettings {
    pub tick_interval: Duration,
    /// Failed AI answers in a row before requests are put on hold
    pub max_ai_failures: u32,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            tick_interval: abalone_core::clock::TICK_INTERVAL,
            max_ai_failures: 3,
        }
    }
}

/// Events produced by the driver's own tasks
#[derive(Debug, Clone)]
enum DriverEvent {
    Tick,
    Ai {
        generation: u64,
        result: Result<AiAction, String>,
        connection_lost: bool,
    },
}

/// Front-end side of a running driver
pub struct DriverHandle {
    pub commands: mpsc::Sender<UserCommand>,
    pub updates: mpsc::Receiver<SessionUpdate>,
    pub task: JoinHandle<GameSession>,
}

/// Spawn a driver for `session` on the current runtime
pub fn spawn(session: GameSession, bridge: AiBridge, settings: DriverSettings) -> DriverHandle {
    let (command_tx, command_rx) = mpsc::channel(CHANNEL_SIZE);
    let (update_tx, update_rx) = mpsc::channel(CHANNEL_SIZE);
    let driver = SessionDriver::new(session, bridge, update_tx, settings);
    DriverHandle {
        commands: command_tx,
        updates: update_rx,
        task: tokio::spawn(driver.run(command_rx)),
    }
}

pub struct SessionDriver {
    session: GameSession,
    bridge: AiBridge,
    schedule: ClockSchedule,
    settings: DriverSettings,
    updates: mpsc::Sender<SessionUpdate>,
    events_tx: mpsc::Sender<DriverEvent>,
    events_rx: mpsc::Receiver<DriverEvent>,
    ai_failures: u32,
    reconnect_notified: bool,
    last_outcome: Option<GameOutcome>,
    frontend_gone: bool,
}

impl SessionDriver {
    pub fn new(
        session: GameSession,
        bridge: AiBridge,
        updates: mpsc::Sender<SessionUpdate>,
        settings: DriverSettings,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::channel(CHANNEL_SIZE);
        Self {
            session,
            bridge,
            schedule: ClockSchedule::new(settings.tick_interval),
            settings,
            updates,
            events_tx,
            events_rx,
            ai_failures: 0,
            reconnect_notified: false,
            last_outcome: None,
            frontend_gone: false,
        }
    }

    /// Process messages until `Quit`, the command channel closes or the
    /// front end goes away. Returns the final session.
    #[tracing::instrument(name = "network.driver", skip_all)]
    pub async fn run(mut self, mut commands: mpsc::Receiver<UserCommand>) -> GameSession {
        if self.session.config().ai_color().is_some() {
            let state = self.bridge.connect().await;
            self.notify(Notice::Connection(state)).await;
        }
        if !self.session.needs_explicit_start() {
            self.start().await;
        }
        self.after_step().await;
        self.publish_view().await;

        while !self.frontend_gone {
            let changed = tokio::select! {
                command = commands.recv() => match command {
                    None | Some(UserCommand::Quit) => break,
                    Some(command) => {
                        self.handle_command(command).await;
                        true
                    }
                },
                Some(event) = self.events_rx.recv() => self.handle_event(event).await,
            };
            self.after_step().await;
            if changed {
                self.publish_view().await;
            }
        }

        tracing::info!("Session driver shutting down");
        self.schedule.stop();
        self.bridge.close().await;
        self.session
    }

    async fn handle_command(&mut self, command: UserCommand) {
        tracing::debug!("Command {:?}", command);
        let result = match command {
            UserCommand::Click(cell) => self.session.cell_clicked(cell).map(|r| r.map(Notice::MoveApplied)),
            UserCommand::Hover(cell) => {
                self.session.hover_entered(cell);
                Ok(None)
            }
            UserCommand::Leave => {
                self.session.hover_exited();
                Ok(None)
            }
            UserCommand::Move { cells, direction } => self
                .session
                .play(&cells, direction)
                .map(|r| Some(Notice::MoveApplied(r))),
            UserCommand::Start => {
                self.start().await;
                Ok(None)
            }
            UserCommand::Pause => self.session.toggle_pause().map(|_| None),
            UserCommand::Undo => {
                self.session.undo();
                self.ai_failures = 0;
                Ok(None)
            }
            UserCommand::Reset => {
                self.session.reset();
                self.ai_failures = 0;
                if !self.session.needs_explicit_start() {
                    self.start().await;
                }
                Ok(None)
            }
            UserCommand::Stop => {
                self.session.stop();
                Ok(None)
            }
            UserCommand::Continue => self.session.continue_game().map(|_| None),
            UserCommand::Accept => self.session.accept_ai_move().map(|r| r.map(Notice::MoveApplied)),
            UserCommand::Reject => {
                self.session.reject_ai_move();
                Ok(None)
            }
            UserCommand::RequestAi => {
                self.ai_failures = 0;
                self.session.request_ai_again();
                Ok(None)
            }
            UserCommand::Reconnect => {
                let state = self.bridge.connect().await;
                self.reconnect_notified = false;
                self.notify(Notice::Connection(state)).await;
                // A game that could not start without the AI starts now
                if state == ConnectionState::Connected
                    && self.session.clock().phase() == ClockPhase::Idle
                    && !self.session.needs_explicit_start()
                {
                    self.start().await;
                }
                Ok(None)
            }
            UserCommand::Quit => Ok(None),
        };

        match result {
            Ok(Some(notice)) => {
                self.notify(notice).await;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!("Command refused: {}", e);
                self.send(SessionUpdate::Error(e)).await;
            }
        }
    }

    /// Returns whether the change warrants a new view
    async fn handle_event(&mut self, event: DriverEvent) -> bool {
        match event {
            DriverEvent::Tick => {
                if self.session.tick(self.settings.tick_interval).is_some() {
                    return true;
                }
                let clock = self.session.clock();
                let update = SessionUpdate::Clock {
                    turn: clock.turn(),
                    remaining_ms: clock.remaining_ms(),
                };
                self.send(update).await;
                false
            }
            DriverEvent::Ai {
                generation,
                result,
                connection_lost,
            } => {
                self.handle_ai_result(generation, result, connection_lost).await;
                true
            }
        }
    }

    async fn handle_ai_result(&mut self, generation: u64, result: Result<AiAction, String>, connection_lost: bool) {
        let action = match result {
            Ok(action) => action,
            Err(reason) => {
                tracing::warn!("AI request failed: {}", reason);
                self.session.ai_request_failed(generation);
                if connection_lost {
                    self.bridge.report(&BridgeError::NotConnected);
                    self.notify(Notice::ReconnectNeeded).await;
                    self.reconnect_notified = true;
                } else {
                    self.count_ai_failure().await;
                }
                return;
            }
        };

        let outdated = generation != self.session.generation();
        match self.session.receive_ai_action(generation, action) {
            Ok(AiReceipt::Applied(record)) => {
                self.ai_failures = 0;
                self.notify(Notice::MoveApplied(record)).await;
            }
            Ok(AiReceipt::Pending) => {
                self.ai_failures = 0;
                self.notify(Notice::AiPending).await;
            }
            Err(e) => {
                let retryable = !outdated && matches!(e, GameError::StaleAiAction | GameError::IllegalMove);
                self.notify(Notice::AiDiscarded(e)).await;
                if retryable {
                    self.count_ai_failure().await;
                }
            }
        }
    }

    async fn count_ai_failure(&mut self) {
        self.ai_failures += 1;
        if self.ai_failures >= self.settings.max_ai_failures {
            tracing::warn!("AI failed {} times in a row, holding requests", self.ai_failures);
            self.session.hold_ai_requests();
            self.notify(Notice::AiOnHold).await;
        }
    }

    async fn start(&mut self) {
        if let Err(e) = self.session.start(self.bridge.connection_state()) {
            if e == GameError::ConnectionUnavailable {
                self.notify(Notice::ReconnectNeeded).await;
            }
            self.send(SessionUpdate::Error(e)).await;
        }
    }

    /// Bring the tick schedule and AI requests in line with the session.
    async fn after_step(&mut self) {
        let ticking = self.session.clock().phase() == ClockPhase::Running && self.session.clock().is_timed();
        if ticking && !self.schedule.is_active() {
            self.schedule.start(self.events_tx.clone(), DriverEvent::Tick);
        } else if !ticking && self.schedule.is_active() {
            self.schedule.stop();
        }

        if let Some(outcome) = self.session.outcome().copied() {
            if self.last_outcome != Some(outcome) {
                self.last_outcome = Some(outcome);
                self.notify(Notice::GameOver(outcome)).await;
            }
        } else {
            self.last_outcome = None;
        }

        self.request_ai_if_due().await;
    }

    async fn request_ai_if_due(&mut self) {
        if !self.session.ai_to_move() {
            return;
        }
        if self.bridge.connection_state() != ConnectionState::Connected {
            if !self.reconnect_notified {
                self.reconnect_notified = true;
                self.notify(Notice::ReconnectNeeded).await;
            }
            return;
        }

        let Some(ticket) = self.session.next_ai_request() else {
            return;
        };
        let requester = self.bridge.requester();
        let events = self.events_tx.clone();
        tokio::spawn(async move {
            let result = requester.request(ticket.request).await;
            let event = DriverEvent::Ai {
                generation: ticket.generation,
                connection_lost: result.as_ref().is_err_and(BridgeError::is_connection_loss),
                result: result.map_err(|e| e.to_string()),
            };
            // The driver may already be gone
            let _ = events.send(event).await;
        });
    }

    async fn publish_view(&mut self) {
        let view = SessionView::from(&self.session);
        self.send(SessionUpdate::View(Box::new(view))).await;
    }

    async fn notify(&mut self, notice: Notice) {
        if let Notice::MoveApplied(MoveRecord { turn, color, .. }) = &notice {
            tracing::debug!("Turn {} played by {:?}", turn, color);
        }
        self.send(SessionUpdate::Notice(notice)).await;
    }

    async fn send(&mut self, update: SessionUpdate) {
        if self.updates.send(update).await.is_err() && !self.frontend_gone {
            tracing::info!("Front end went away");
            self.frontend_gone = true;
        }
    }
}

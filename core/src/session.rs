// SPDX-License-Identifier: MIT OR Apache-2.0

//! The game session: single owner of the board, clock and history.
//!
//! Every change to the game goes through [`GameSession`]. Human moves and AI
//! moves end up in the same [`GameSession::apply_move`]; clock ticks and AI
//! responses are fed in by the driver one at a time, so there is never more
//! than one mutation in flight.
//!
//! AI requests are tagged with a generation number. Undo, reset and stop
//! bump the generation, which makes any response still in flight
//! recognisably outdated when it finally arrives.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::board::BoardState;
use crate::clock::{ClockPhase, Tick, TurnClock};
use crate::config::{AiMode, GameMode, Limits, SessionConfig};
use crate::hex::{Cell, Direction};
use crate::record::{History, MoveRecord};
use crate::resolver::MoveResolver;
use crate::selection::Selection;
use crate::transition::{self, AiAction, MoveTransition};
use crate::{Color, GameError, LimitKind};

/// Time limit sent to the AI when time limits are off
const UNTIMED_AI_SECONDS: u32 = 10;
/// Move limit sent to the AI when move limits are off
const UNLIMITED_AI_MOVES: u32 = 80;

/// Whether the AI service can currently be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    Connected,
    Disconnected,
}

/// The request packet for the AI service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiRequest {
    pub turn_limit: u32,
    pub time_limit: u32,
    pub turn: u32,
    pub state: BoardState,
}

impl AiRequest {
    /// Packet for the move on `turn`, computed by the color moving on that turn
    pub fn new(state: BoardState, turn: u32, limits: &Limits) -> Self {
        let mover = Color::for_turn(turn);
        let time_limit = if limits.enforce_time {
            (limits.time_ms(mover) / 1000) as u32
        } else {
            UNTIMED_AI_SECONDS
        };
        let turn_limit = if limits.enforce_moves {
            limits.moves(mover)
        } else {
            UNLIMITED_AI_MOVES
        };
        Self {
            turn_limit,
            time_limit,
            turn,
            state,
        }
    }
}

/// An issued AI request, tagged with the session generation it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct AiTicket {
    pub generation: u64,
    pub request: AiRequest,
}

/// An AI move waiting for the player's decision
#[derive(Debug, Clone, PartialEq)]
pub struct PendingAiMove {
    pub action: AiAction,
    pub transition: MoveTransition,
}

/// What happened to an AI response
#[derive(Debug, Clone, PartialEq)]
pub enum AiReceipt {
    Applied(MoveRecord),
    /// Waiting for [`GameSession::accept_ai_move`] or [`GameSession::reject_ai_move`]
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeReason {
    /// Combined move limit reached
    MoveLimit,
    /// The active player ran out of time
    TimeLimit,
    /// Enough marbles were pushed off the board
    PushedOff,
    /// The game was stopped by a player
    Stopped,
}

/// How and for whom a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub reason: OutcomeReason,
    /// `None` for a draw or an undecided stopped game
    pub winner: Option<Color>,
}

#[derive(Debug, Clone)]
pub struct GameSession {
    config: SessionConfig,
    board: BoardState,
    /// Board before the last move; single-level undo
    previous: Option<BoardState>,
    clock: TurnClock,
    history: History,
    selection: Selection,
    preview: Option<MoveTransition>,
    pending_ai: Option<PendingAiMove>,
    /// Generation of the AI request in flight
    awaiting_ai: Option<u64>,
    /// Set after a rejected AI move so no request is issued until the player acts
    ai_on_hold: bool,
    generation: u64,
    outcome: Option<GameOutcome>,
    starting_counts: (usize, usize),
}

impl GameSession {
    /// Create a new game from its configuration. The clock starts idle.
    pub fn new(config: SessionConfig) -> Self {
        let _span = tracing::info_span!("core.session", mode = ?config.mode).entered();
        let board = config.starting_board();
        tracing::info!(
            "New {:?} game, layout {:?}, player {:?}",
            config.mode,
            config.layout,
            config.player_color
        );

        Self {
            clock: TurnClock::new(config.limits),
            starting_counts: (board.count(Color::Black), board.count(Color::White)),
            board,
            config,
            previous: None,
            history: History::default(),
            selection: Selection::empty(),
            preview: None,
            pending_ai: None,
            awaiting_ai: None,
            ai_on_hold: false,
            generation: 0,
            outcome: None,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn preview(&self) -> Option<&MoveTransition> {
        self.preview.as_ref()
    }

    pub fn pending_ai(&self) -> Option<&PendingAiMove> {
        self.pending_ai.as_ref()
    }

    pub fn outcome(&self) -> Option<&GameOutcome> {
        self.outcome.as_ref()
    }

    pub fn is_awaiting_ai(&self) -> bool {
        self.awaiting_ai.is_some()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn can_undo(&self) -> bool {
        self.previous.is_some()
    }

    /// Whether the player has to start the game by hand.
    ///
    /// Untimed games start as soon as they are set up.
    pub fn needs_explicit_start(&self) -> bool {
        self.config.limits.enforce_time
    }

    /// Marbles of `color` pushed off the board so far
    pub fn lost(&self, color: Color) -> usize {
        let start = match color {
            Color::Black => self.starting_counts.0,
            Color::White => self.starting_counts.1,
        };
        start.saturating_sub(self.board.count(color))
    }

    /// Idle -> Running. A game against the AI needs a live connection.
    pub fn start(&mut self, connection: ConnectionState) -> Result<(), GameError> {
        self.ensure_playable()?;
        if self.config.mode == GameMode::HumanVsAi && connection != ConnectionState::Connected {
            tracing::warn!("Cannot start: AI service not connected");
            return Err(GameError::ConnectionUnavailable);
        }
        if self.clock.start() {
            tracing::info!("Game started");
        }
        Ok(())
    }

    /// Running <-> Paused
    pub fn toggle_pause(&mut self) -> Result<ClockPhase, GameError> {
        self.ensure_playable()?;
        match self.clock.phase() {
            ClockPhase::Idle => return Err(GameError::NotStarted),
            ClockPhase::Running => {
                self.clock.pause();
            }
            ClockPhase::Paused => {
                self.clock.resume();
            }
            ClockPhase::Ended => return Err(GameError::GameOver),
        }
        Ok(self.clock.phase())
    }

    /// End the game at the player's request
    pub fn stop(&mut self) {
        if self.outcome.is_some() {
            return;
        }
        self.finish(OutcomeReason::Stopped, self.leader());
    }

    /// Resume a stopped game, unless it already ran past its move limit
    pub fn continue_game(&mut self) -> Result<(), GameError> {
        let Some(outcome) = self.outcome else {
            return Ok(());
        };
        if outcome.reason == OutcomeReason::Stopped && self.clock.reopen() {
            self.outcome = None;
            return Ok(());
        }
        self.ensure_playable()
    }

    /// Back to the starting board with an idle clock
    pub fn reset(&mut self) {
        tracing::info!("Game reset");
        self.board = self.config.starting_board();
        self.clock = TurnClock::new(self.config.limits);
        self.history.clear();
        self.previous = None;
        self.outcome = None;
        self.clear_interaction();
        self.discard_ai();
    }

    /// Restore the board before the last move.
    ///
    /// Only one level is kept: a second undo in a row does nothing and
    /// returns `false`.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.previous.take() else {
            return false;
        };

        self.board = previous;
        self.history.pop();
        self.clock.revert_turn();
        self.outcome = None;
        self.clear_interaction();
        self.discard_ai();
        tracing::info!("Undo to turn {}", self.clock.turn());
        true
    }

    /// Color allowed to select marbles right now, if any
    pub fn mover(&self) -> Option<Color> {
        if self.outcome.is_some() || self.pending_ai.is_some() {
            return None;
        }
        if !matches!(self.clock.phase(), ClockPhase::Running | ClockPhase::Paused) {
            return None;
        }
        let active = self.clock.active_color();
        if self.config.ai_color() == Some(active) {
            return None;
        }
        Some(active)
    }

    /// A cell was clicked on the board.
    ///
    /// With a move preview showing, any click outside the selection plays
    /// the previewed move.
    pub fn cell_clicked(&mut self, cell: Cell) -> Result<Option<MoveRecord>, GameError> {
        self.ensure_playable()?;
        if self.clock.phase() == ClockPhase::Idle {
            return Err(GameError::NotStarted);
        }
        let Some(mover) = self.mover() else {
            return Ok(None);
        };

        if self.selection.contains(cell) {
            self.clear_interaction();
            return Ok(None);
        }

        if let Some(preview) = self.preview.take() {
            let elapsed = self.clock.elapsed_secs();
            return self.apply_move(preview, elapsed).map(Some);
        }

        let next = self.selection.try_extend(cell, &self.board, mover);
        if next == self.selection {
            tracing::debug!("{}", GameError::InvalidSelection);
        }
        self.selection = next;
        Ok(None)
    }

    /// The pointer entered a cell. Returns true when a legal move preview is
    /// now showing.
    pub fn hover_entered(&mut self, cell: Cell) -> bool {
        self.preview = None;
        if self.selection.is_empty() || self.mover().is_none() {
            return false;
        }
        self.preview = MoveResolver::preview(&self.selection, cell, &self.board);
        if self.preview.is_none() {
            tracing::debug!("No legal move toward {}", cell);
        }
        self.preview.is_some()
    }

    pub fn hover_exited(&mut self) {
        self.preview = None;
    }

    /// Select `cells` and move them in `direction` in one step
    pub fn play(&mut self, cells: &[Cell], direction: Direction) -> Result<MoveRecord, GameError> {
        self.ensure_playable()?;
        if self.clock.phase() == ClockPhase::Idle {
            return Err(GameError::NotStarted);
        }
        let mover = self.mover().ok_or(GameError::IllegalMove)?;
        let selection = Selection::from_cells(cells, &self.board)?;
        if selection.color(&self.board) != Some(mover) {
            return Err(GameError::InvalidSelection);
        }
        let transition = MoveResolver::resolve(&selection, direction, &self.board).ok_or(GameError::IllegalMove)?;
        let elapsed = self.clock.elapsed_secs();
        self.apply_move(transition, elapsed)
    }

    /// Apply a resolved move. Both human and AI moves end up here.
    pub fn apply_move(&mut self, transition: MoveTransition, elapsed: f64) -> Result<MoveRecord, GameError> {
        self.ensure_playable()?;
        let color = self.clock.active_color();
        if transition.mover() != Some(color) {
            return Err(GameError::IllegalMove);
        }
        // Re-resolve so a transition built against an older board cannot land.
        let fresh = MoveResolver::resolve(&transition.selection, transition.direction, &self.board);
        if fresh.as_ref() != Some(&transition) {
            tracing::debug!("{} on turn {}", GameError::IllegalMove, self.clock.turn());
            return Err(GameError::IllegalMove);
        }

        let next = transition::apply(&self.board, &transition);
        let record = MoveRecord {
            turn: self.clock.turn(),
            color,
            marbles: transition.origins().to_vec(),
            direction: transition.direction,
            elapsed,
            board: next,
            pushed_off: transition.pushed_off(),
        };
        tracing::info!("{}", record);

        self.previous = Some(self.board);
        self.board = next;
        self.history.push(record.clone());
        self.clock.advance_turn();
        self.clear_interaction();
        self.pending_ai = None;
        self.ai_on_hold = false;

        if self.lost(color.opposite()) >= self.config.marbles_to_win {
            tracing::info!("{:?} pushed off {} marbles", color, self.lost(color.opposite()));
            self.finish(OutcomeReason::PushedOff, Some(color));
        } else if self.clock.check_limits() {
            self.finish(OutcomeReason::MoveLimit, self.leader());
        }

        Ok(record)
    }

    /// Feed one clock tick. Returns the outcome if the active player ran out
    /// of time.
    pub fn tick(&mut self, interval: Duration) -> Option<GameOutcome> {
        if self.outcome.is_some() {
            return None;
        }
        match self.clock.tick(interval) {
            Tick::Expired => {
                let loser = self.clock.active_color();
                tracing::info!("{:?} ran out of time on turn {}", loser, self.clock.turn());
                self.finish(OutcomeReason::TimeLimit, Some(loser.opposite()));
                self.outcome
            }
            Tick::Counting | Tick::Ignored => None,
        }
    }

    /// Whether the session wants a move from the AI now
    pub fn ai_to_move(&self) -> bool {
        self.outcome.is_none()
            && self.config.ai_color() == Some(self.clock.active_color())
            && matches!(self.clock.phase(), ClockPhase::Running | ClockPhase::Paused)
            && self.pending_ai.is_none()
            && self.awaiting_ai.is_none()
            && !self.ai_on_hold
    }

    /// Issue the next AI request if it is the AI's turn
    pub fn next_ai_request(&mut self) -> Option<AiTicket> {
        if !self.ai_to_move() {
            return None;
        }

        let turn = self.clock.turn();
        self.awaiting_ai = Some(self.generation);
        tracing::info!("Requesting AI move for turn {}", turn);
        Some(AiTicket {
            generation: self.generation,
            request: AiRequest::new(self.board, turn, &self.config.limits),
        })
    }

    /// Handle the AI's answer to the request issued under `generation`.
    ///
    /// Answers to outdated requests and actions that do not resolve against
    /// the current board fail without changing anything.
    pub fn receive_ai_action(&mut self, generation: u64, action: AiAction) -> Result<AiReceipt, GameError> {
        if self.awaiting_ai != Some(generation) || generation != self.generation {
            tracing::warn!(
                "Discarding AI action from generation {} (current {})",
                generation,
                self.generation
            );
            return Err(GameError::StaleAiAction);
        }
        self.awaiting_ai = None;
        self.ensure_playable()?;

        if action.turn != self.clock.turn() {
            tracing::warn!("AI action for turn {} arrived on turn {}", action.turn, self.clock.turn());
            return Err(GameError::StaleAiAction);
        }
        let transition = transition::from_external_action(&self.board, &action)?;
        if transition.mover() != self.config.ai_color() {
            return Err(GameError::IllegalMove);
        }

        match self.config.ai_mode {
            AiMode::AutoApply => self.apply_move(transition, action.time).map(AiReceipt::Applied),
            AiMode::ConfirmFirst => {
                self.clock.pause();
                self.pending_ai = Some(PendingAiMove { action, transition });
                Ok(AiReceipt::Pending)
            }
        }
    }

    /// The AI request under `generation` failed in transport
    pub fn ai_request_failed(&mut self, generation: u64) {
        if self.awaiting_ai == Some(generation) {
            self.awaiting_ai = None;
        }
    }

    /// Apply the pending AI move
    pub fn accept_ai_move(&mut self) -> Result<Option<MoveRecord>, GameError> {
        let Some(pending) = self.pending_ai.take() else {
            return Ok(None);
        };
        self.apply_move(pending.transition, pending.action.time).map(Some)
    }

    /// Discard the pending AI move, leaving the game as it was.
    ///
    /// No new request goes out until the player asks for one or undoes.
    pub fn reject_ai_move(&mut self) -> bool {
        if self.pending_ai.take().is_none() {
            return false;
        }
        self.ai_on_hold = true;
        tracing::info!("AI move rejected on turn {}", self.clock.turn());
        true
    }

    /// Stop issuing AI requests until [`GameSession::request_ai_again`]
    pub fn hold_ai_requests(&mut self) {
        self.ai_on_hold = true;
    }

    /// Allow a new AI request after a rejected or failed move
    pub fn request_ai_again(&mut self) {
        self.ai_on_hold = false;
    }

    /// Leading color by marbles lost, `None` when level
    pub fn leader(&self) -> Option<Color> {
        let (black, white) = (self.lost(Color::Black), self.lost(Color::White));
        match black.cmp(&white) {
            std::cmp::Ordering::Less => Some(Color::Black),
            std::cmp::Ordering::Greater => Some(Color::White),
            std::cmp::Ordering::Equal => None,
        }
    }

    fn finish(&mut self, reason: OutcomeReason, winner: Option<Color>) {
        tracing::info!("Game over: {:?}, winner {:?}", reason, winner);
        self.clock.end();
        self.outcome = Some(GameOutcome { reason, winner });
        self.clear_interaction();
        self.discard_ai();
    }

    fn ensure_playable(&self) -> Result<(), GameError> {
        match self.outcome {
            None => Ok(()),
            Some(GameOutcome {
                reason: OutcomeReason::MoveLimit,
                ..
            }) => Err(GameError::LimitExceeded(LimitKind::Moves)),
            Some(GameOutcome {
                reason: OutcomeReason::TimeLimit,
                ..
            }) => Err(GameError::LimitExceeded(LimitKind::Time)),
            Some(_) => Err(GameError::GameOver),
        }
    }

    fn clear_interaction(&mut self) {
        self.selection = Selection::empty();
        self.preview = None;
    }

    /// Forget any pending or in-flight AI move
    fn discard_ai(&mut self) {
        self.generation += 1;
        self.awaiting_ai = None;
        self.pending_ai = None;
        self.ai_on_hold = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(name: &str) -> Cell {
        name.parse().unwrap()
    }

    fn started(config: SessionConfig) -> GameSession {
        let mut session = GameSession::new(config);
        session.start(ConnectionState::Connected).unwrap();
        session
    }

    #[test]
    fn click_hover_click_plays_a_move() {
        let mut session = started(SessionConfig::default());
        assert_eq!(session.cell_clicked(cell("C3")).unwrap(), None);
        assert!(session.hover_entered(cell("D4")));
        let record = session.cell_clicked(cell("D4")).unwrap().unwrap();
        assert_eq!(record.turn, 1);
        assert_eq!(session.clock().turn(), 2);
        assert!(session.selection().is_empty());
        assert_eq!(session.board().get(cell("D4")), crate::Marble::Black);
    }

    #[test]
    fn wrong_color_click_is_ignored() {
        let mut session = started(SessionConfig::default());
        session.cell_clicked(cell("G5")).unwrap();
        assert!(session.selection().is_empty());
    }

    #[test]
    fn clicks_before_start_are_rejected() {
        let config = SessionConfig {
            limits: Limits {
                enforce_time: true,
                ..Limits::default()
            },
            ..SessionConfig::default()
        };
        let mut session = GameSession::new(config);
        assert!(session.needs_explicit_start());
        assert_eq!(session.cell_clicked(cell("C3")), Err(GameError::NotStarted));
    }

    #[test]
    fn pve_start_requires_connection() {
        let config = SessionConfig {
            mode: GameMode::HumanVsAi,
            ..SessionConfig::default()
        };
        let mut session = GameSession::new(config);
        assert_eq!(
            session.start(ConnectionState::Disconnected),
            Err(GameError::ConnectionUnavailable)
        );
        assert_eq!(session.clock().phase(), ClockPhase::Idle);
    }

    #[test]
    fn stop_then_continue() {
        let mut session = started(SessionConfig::default());
        session.stop();
        assert_eq!(session.outcome().map(|o| o.reason), Some(OutcomeReason::Stopped));
        assert_eq!(session.play(&[cell("C3")], Direction::NorthEast), Err(GameError::GameOver));
        session.continue_game().unwrap();
        assert!(session.outcome().is_none());
        assert!(session.play(&[cell("C3")], Direction::NorthEast).is_ok());
    }

    #[test]
    fn ai_request_packet_uses_ai_limits() {
        let config = SessionConfig {
            mode: GameMode::HumanVsAi,
            player_color: Color::White,
            limits: Limits {
                black_moves: 30,
                white_moves: 40,
                black_seconds: 15,
                enforce_moves: true,
                enforce_time: true,
                ..Limits::default()
            },
            ..SessionConfig::default()
        };
        let mut session = started(config);
        let ticket = session.next_ai_request().unwrap();
        assert_eq!(ticket.request.turn, 1);
        assert_eq!(ticket.request.turn_limit, 30);
        assert_eq!(ticket.request.time_limit, 15);
        assert!(session.next_ai_request().is_none());
    }
}

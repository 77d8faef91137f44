// SPDX-License-Identifier: MIT OR Apache-2.0

//! Abalone Core - Game Rules and Board Logic
//!
//! This crate provides the core game functionality including:
//! - Hexagonal board geometry and cell notation
//! - Marble-group selection and move resolution (broadside and sumito)
//! - Immutable board state transitions, including AI-supplied moves
//! - The turn clock, move history and the game session state machine

#![deny(unsafe_code)]
#![deny(clippy::all)]

pub mod board;
pub mod clock;
pub mod config;
pub mod hex;
pub mod record;
pub mod resolver;
pub mod selection;
pub mod session;
pub mod transition;
pub mod view;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use thiserror::Error;

pub use board::{BoardState, Layout};
pub use clock::{ClockPhase, TurnClock};
pub use config::{AiMode, GameMode, Limits, SessionConfig};
pub use hex::{Cell, Direction};
pub use record::{History, MoveRecord};
pub use resolver::MoveResolver;
pub use selection::Selection;
pub use session::{
    AiReceipt, AiRequest, AiTicket, ConnectionState, GameOutcome, GameSession, OutcomeReason, PendingAiMove,
};
pub use transition::{AiAction, Destination, MoveKind, MoveTransition, Step};
pub use view::SessionView;

/// Player color (Black moves on odd turns, White on even turns)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    /// Black player (moves first)
    Black,
    /// White player
    White,
}

impl Color {
    /// Returns the opposite color
    pub fn opposite(&self) -> Self {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// The color that moves on the given turn number
    pub fn for_turn(turn: u32) -> Self {
        if turn % 2 == 1 {
            Color::Black
        } else {
            Color::White
        }
    }

    /// Single-letter tag used in history lines and the ASCII board
    pub fn letter(&self) -> char {
        match self {
            Color::Black => 'B',
            Color::White => 'W',
        }
    }
}

/// Occupant of a board cell.
///
/// The numeric values are the ones the AI service uses on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Marble {
    #[default]
    Empty = 0,
    White = 1,
    Black = 2,
}

impl Marble {
    /// The player owning this marble, if any
    pub fn color(&self) -> Option<Color> {
        match self {
            Marble::Empty => None,
            Marble::White => Some(Color::White),
            Marble::Black => Some(Color::Black),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Marble::Empty)
    }
}

impl From<Color> for Marble {
    fn from(color: Color) -> Self {
        match color {
            Color::Black => Marble::Black,
            Color::White => Marble::White,
        }
    }
}

/// Which limit ended a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitKind {
    /// Combined move limit of both players was reached
    Moves,
    /// The active player's per-turn time ran out
    Time,
}

/// Errors that can occur during game play.
///
/// None of these is fatal: every variant leaves the board and the clock at
/// the last successfully applied move.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Clicked cells do not form a group the mover may select
    #[error("Invalid selection")]
    InvalidSelection,

    /// The move is not legal on the current board
    #[error("Illegal move")]
    IllegalMove,

    /// An AI action refers to a board that is no longer current
    #[error("AI action refers to a stale board")]
    StaleAiAction,

    /// The AI service is not connected
    #[error("AI service is not connected")]
    ConnectionUnavailable,

    /// A move or time limit was reached
    #[error("{0:?} limit reached")]
    LimitExceeded(LimitKind),

    /// Text could not be parsed as a board cell
    #[error("Invalid cell: {0}")]
    InvalidCell(String),

    /// Text could not be parsed as a direction
    #[error("Invalid direction: {0}")]
    InvalidDirection(String),

    /// The game has not been started yet
    #[error("Game not started")]
    NotStarted,

    /// The game is over
    #[error("Game is over")]
    GameOver,
}

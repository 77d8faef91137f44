// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board state transitions.
//!
//! A [`MoveTransition`] lists every marble a move displaces. Applying it
//! never mutates the input board; the next state is computed in one pass by
//! clearing all origins before writing any destination, so no step can
//! overwrite a marble another step still has to move.

use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::hex::{Cell, Direction};
use crate::resolver::MoveResolver;
use crate::selection::Selection;
use crate::{Color, GameError, Marble};

/// Where a displaced marble ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Destination {
    Cell(Cell),
    /// Pushed past the edge and removed from play
    OffBoard,
}

/// One marble's displacement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub from: Cell,
    pub to: Destination,
    pub marble: Marble,
}

/// Move class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveKind {
    /// Sideways slide, perpendicular to the group's line
    Broadside,
    /// Slide along the group's line, pushing `pushed` opposing marbles
    Inline { pushed: usize },
}

/// Every displacement caused by one legal move.
///
/// Steps are ordered from the far end of the push back to the rear of the
/// moving group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTransition {
    pub selection: Selection,
    pub direction: Direction,
    pub kind: MoveKind,
    pub steps: Vec<Step>,
}

impl MoveTransition {
    /// Color of the moving group
    pub fn mover(&self) -> Option<Color> {
        self.steps
            .iter()
            .rev()
            .find_map(|s| s.marble.color())
    }

    /// Origin cells of the moving group
    pub fn origins(&self) -> &[Cell] {
        self.selection.cells()
    }

    /// Number of marbles this move pushes off the board
    pub fn pushed_off(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| s.to == Destination::OffBoard)
            .count()
    }

    /// Cells the moving group lands on; the move preview
    pub fn support_line(&self) -> Vec<Cell> {
        self.steps
            .iter()
            .filter(|s| self.selection.contains(s.from))
            .filter_map(|s| match s.to {
                Destination::Cell(c) => Some(c),
                Destination::OffBoard => None,
            })
            .collect()
    }

    /// Produce the board after this move
    pub fn apply_to(&self, board: &BoardState) -> BoardState {
        apply(board, self)
    }
}

/// Compute the board that results from `transition`.
pub fn apply(board: &BoardState, transition: &MoveTransition) -> BoardState {
    let cleared = transition
        .steps
        .iter()
        .fold(*board, |b, step| b.with(step.from, Marble::Empty));

    transition
        .steps
        .iter()
        .fold(cleared, |b, step| match step.to {
            Destination::Cell(cell) => b.with(cell, step.marble),
            Destination::OffBoard => b,
        })
}

/// A move chosen by the remote AI, as received over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAction {
    /// Turn the move was computed for
    pub turn: u32,
    /// Origin cells of the moving group
    pub marbles: Vec<Cell>,
    pub direction: Direction,
    /// Seconds the AI spent on the move
    #[serde(default)]
    pub time: f64,
    /// Board the AI computed the move against
    pub state: BoardState,
}

/// Rebuild the local transition for a remote action.
///
/// The action is re-resolved against `board`. It fails with
/// [`GameError::StaleAiAction`] if the action was computed against a
/// different board, and with [`GameError::IllegalMove`] if the group or
/// direction does not resolve to a legal move.
pub fn from_external_action(board: &BoardState, action: &AiAction) -> Result<MoveTransition, GameError> {
    if action.state != *board {
        tracing::warn!("AI action for turn {} refers to a stale board", action.turn);
        return Err(GameError::StaleAiAction);
    }

    let selection = Selection::from_cells(&action.marbles, board).map_err(|_| GameError::IllegalMove)?;
    MoveResolver::resolve(&selection, action.direction, board).ok_or_else(|| {
        tracing::warn!(
            "AI action for turn {} is illegal: {:?} {}",
            action.turn,
            action.marbles,
            action.direction
        );
        GameError::IllegalMove
    })
}

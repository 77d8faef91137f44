// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only projection of a session for presentation.
//!
//! Renderers and info panels consume a [`SessionView`]; they never reach
//! into the session itself.

use serde::Serialize;

use crate::clock::ClockPhase;
use crate::hex::{Cell, Direction};
use crate::session::{GameOutcome, GameSession};
use crate::{Color, Marble};

/// Per-cell render state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellView {
    pub cell: Cell,
    pub marble: Marble,
    pub selected: bool,
    /// Part of the hovered move's support line
    pub preview: bool,
}

/// Info-panel state of one player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub color: Color,
    pub active: bool,
    /// Seconds left this turn; zero while the other player moves
    pub time_left: f64,
    pub marbles: usize,
    pub lost: usize,
    pub history: Vec<String>,
}

/// An AI move waiting for confirmation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingView {
    pub marbles: Vec<Cell>,
    pub direction: Direction,
    pub support_line: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub cells: Vec<CellView>,
    pub turn: u32,
    /// Combined move limit shown as "turn / limit"
    pub turn_limit: Option<u32>,
    pub phase: ClockPhase,
    pub timed: bool,
    /// Countdown as a 0-100 ratio
    pub progress: f64,
    pub black: PlayerView,
    pub white: PlayerView,
    pub awaiting_ai: bool,
    pub pending_ai: Option<PendingView>,
    pub can_undo: bool,
    pub outcome: Option<GameOutcome>,
}

impl From<&GameSession> for SessionView {
    fn from(session: &GameSession) -> Self {
        let selection = session.selection();
        let support_line = session.preview().map(|t| t.support_line()).unwrap_or_default();
        let cells = session
            .board()
            .cells()
            .map(|(cell, marble)| CellView {
                cell,
                marble,
                selected: selection.contains(cell),
                preview: support_line.contains(&cell),
            })
            .collect();

        let clock = session.clock();
        let player = |color: Color| {
            let active = clock.active_color() == color;
            PlayerView {
                color,
                active,
                time_left: if active { clock.remaining_secs() } else { 0.0 },
                marbles: session.board().count(color),
                lost: session.lost(color),
                history: session.history().lines_for(color),
            }
        };

        SessionView {
            cells,
            turn: clock.turn(),
            turn_limit: clock.limits().total_moves(),
            phase: clock.phase(),
            timed: clock.is_timed(),
            progress: clock.ratio(),
            black: player(Color::Black),
            white: player(Color::White),
            awaiting_ai: session.is_awaiting_ai(),
            pending_ai: session.pending_ai().map(|p| PendingView {
                marbles: p.transition.origins().to_vec(),
                direction: p.transition.direction,
                support_line: p.transition.support_line(),
            }),
            can_undo: session.can_undo(),
            outcome: session.outcome().copied(),
        }
    }
}

impl SessionView {
    /// Render state of one cell
    pub fn cell(&self, cell: Cell) -> Option<&CellView> {
        self.cells.iter().find(|c| c.cell == cell)
    }
}

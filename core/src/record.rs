// SPDX-License-Identifier: MIT OR Apache-2.0

//! Move history

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::board::BoardState;
use crate::hex::{Cell, Direction};
use crate::Color;

/// One applied move. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub turn: u32,
    pub color: Color,
    /// Origin cells of the moving group
    pub marbles: Vec<Cell>,
    pub direction: Direction,
    /// Seconds the mover spent on the turn
    pub elapsed: f64,
    /// Board after the move
    pub board: BoardState,
    /// Opposing marbles pushed off by this move
    pub pushed_off: usize,
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let group: Vec<String> = self.marbles.iter().map(Cell::to_string).collect();
        write!(
            f,
            "{}. {} {} {} {:.1}s",
            self.turn,
            self.color.letter(),
            group.join("-"),
            self.direction,
            self.elapsed
        )?;
        if self.pushed_off > 0 {
            write!(f, " (+{})", self.pushed_off)?;
        }
        Ok(())
    }
}

/// Append-only list of applied moves; only undo pops.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    records: Vec<MoveRecord>,
}

impl History {
    pub fn push(&mut self, record: MoveRecord) {
        self.records.push(record);
    }

    /// Remove the latest record (undo)
    pub fn pop(&mut self) -> Option<MoveRecord> {
        self.records.pop()
    }

    pub fn last(&self) -> Option<&MoveRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MoveRecord> {
        self.records.iter()
    }

    /// History lines of one player, oldest first
    pub fn lines_for(&self, color: Color) -> Vec<String> {
        self.records
            .iter()
            .filter(|r| r.color == color)
            .map(ToString::to_string)
            .collect()
    }

    /// Marbles `color` has pushed off so far
    pub fn pushed_off_by(&self, color: Color) -> usize {
        self.records
            .iter()
            .filter(|r| r.color == color)
            .map(|r| r.pushed_off)
            .sum()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(turn: u32, pushed_off: usize) -> MoveRecord {
        MoveRecord {
            turn,
            color: Color::for_turn(turn),
            marbles: vec!["C3".parse().unwrap(), "C4".parse().unwrap()],
            direction: Direction::NorthEast,
            elapsed: 4.0,
            board: BoardState::default(),
            pushed_off,
        }
    }

    #[test]
    fn history_line_format() {
        assert_eq!(record(3, 0).to_string(), "3. B C3-C4 NE 4.0s");
        assert_eq!(record(4, 1).to_string(), "4. W C3-C4 NE 4.0s (+1)");
    }

    #[test]
    fn lines_are_split_by_color() {
        let mut history = History::default();
        for turn in 1..=5 {
            history.push(record(turn, turn as usize % 2));
        }
        assert_eq!(history.lines_for(Color::Black).len(), 3);
        assert_eq!(history.lines_for(Color::White).len(), 2);
        assert_eq!(history.pushed_off_by(Color::Black), 3);
        assert_eq!(history.pushed_off_by(Color::White), 0);
    }
}

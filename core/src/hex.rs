// SPDX-License-Identifier: MIT OR Apache-2.0

//! Hexagonal board geometry.
//!
//! Cells use the standard Abalone notation: a row letter `A`..`I` counted
//! from Black's side and a diagonal number `1`..`9`. Moving "up" a row keeps
//! the number (north-west) or increments it (north-east).

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt;
use std::str::FromStr;

use crate::GameError;

/// Number of rows (and diagonals) on the board
pub const ROWS: i8 = 9;

/// Number of cells on the board
pub const CELL_COUNT: usize = 61;

/// One of the six unit steps on the hex grid.
///
/// The discriminants are the direction indices exchanged with the AI service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum Direction {
    East = 0,
    NorthEast = 1,
    NorthWest = 2,
    West = 3,
    SouthWest = 4,
    SouthEast = 5,
}

impl Direction {
    /// All directions in index order
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::NorthEast,
        Direction::NorthWest,
        Direction::West,
        Direction::SouthWest,
        Direction::SouthEast,
    ];

    /// (row, column) delta of one step
    pub fn delta(&self) -> (i8, i8) {
        match self {
            Direction::East => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::NorthWest => (1, 0),
            Direction::West => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::SouthEast => (-1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::East => Direction::West,
            Direction::NorthEast => Direction::SouthWest,
            Direction::NorthWest => Direction::SouthEast,
            Direction::West => Direction::East,
            Direction::SouthWest => Direction::NorthEast,
            Direction::SouthEast => Direction::NorthWest,
        }
    }

    /// True when both directions lie on the same axis
    pub fn is_parallel(&self, other: Direction) -> bool {
        *self == other || *self == other.opposite()
    }

    /// Direction of the single step from `from` to `to`, or `None` when the
    /// cells are not adjacent.
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        let delta = (to.row - from.row, to.col - from.col);
        Direction::ALL.into_iter().find(|d| d.delta() == delta)
    }

    /// Look up a direction by its wire index
    pub fn from_index(index: u8) -> Option<Direction> {
        Direction::ALL.get(index as usize).copied()
    }

    /// Compass abbreviation used in history lines and the CLI
    pub fn abbrev(&self) -> &'static str {
        match self {
            Direction::East => "E",
            Direction::NorthEast => "NE",
            Direction::NorthWest => "NW",
            Direction::West => "W",
            Direction::SouthWest => "SW",
            Direction::SouthEast => "SE",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbrev())
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Direction::ALL
            .into_iter()
            .find(|d| d.abbrev() == upper)
            .ok_or_else(|| GameError::InvalidDirection(s.to_string()))
    }
}

/// A position on the hexagonal board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Cell {
    /// Row, 0 (`A`) to 8 (`I`)
    pub row: i8,
    /// Diagonal, 1 to 9
    pub col: i8,
}

impl Cell {
    /// Create a cell, returning `None` if it is not on the board
    pub fn new(row: i8, col: i8) -> Option<Self> {
        let cell = Self { row, col };
        cell.is_on_board().then_some(cell)
    }

    /// Check if the coordinates address one of the 61 board cells
    pub fn is_on_board(&self) -> bool {
        let diff = self.col - self.row;
        (0..ROWS).contains(&self.row) && (1..=ROWS).contains(&self.col) && (-3..=5).contains(&diff)
    }

    /// The adjacent cell in `direction`, or `None` past the edge
    pub fn step(&self, direction: Direction) -> Option<Cell> {
        let (dr, dc) = direction.delta();
        Cell::new(self.row + dr, self.col + dc)
    }

    /// On-board neighbours together with the direction leading to them
    pub fn neighbors(&self) -> impl Iterator<Item = (Direction, Cell)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| self.step(d).map(|c| (d, c)))
    }

    pub fn is_adjacent(&self, other: Cell) -> bool {
        Direction::between(*self, other).is_some()
    }

    /// All board cells, row by row from `A1` to `I9`
    pub fn all() -> impl Iterator<Item = Cell> {
        (0..ROWS).flat_map(|row| (1..=ROWS).filter_map(move |col| Cell::new(row, col)))
    }

    /// Dense index into a 9x9 backing array
    pub(crate) fn index(&self) -> usize {
        (self.row as usize) * (ROWS as usize) + (self.col as usize - 1)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'A' + self.row as u8) as char, self.col)
    }
}

impl FromStr for Cell {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::InvalidCell(s.to_string());
        let mut chars = s.trim().chars();
        let letter = chars.next().ok_or_else(invalid)?.to_ascii_uppercase();
        if !letter.is_ascii_uppercase() {
            return Err(invalid());
        }
        let col: i8 = chars.as_str().parse().map_err(|_| invalid())?;
        let row = (letter as u8 - b'A') as i8;
        Cell::new(row, col).ok_or_else(invalid)
    }
}

impl From<Cell> for String {
    fn from(cell: Cell) -> Self {
        cell.to_string()
    }
}

impl TryFrom<String> for Cell {
    type Error = GameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(s: &str) -> Cell {
        s.parse().unwrap()
    }

    #[test]
    fn board_has_61_cells() {
        assert_eq!(Cell::all().count(), CELL_COUNT);
        assert!(Cell::new(0, 6).is_none());
        assert!(Cell::new(8, 4).is_none());
        assert!(Cell::new(4, 9).is_some());
    }

    #[test]
    fn notation_round_trip() {
        for c in Cell::all() {
            assert_eq!(c.to_string().parse::<Cell>().unwrap(), c);
        }
        assert!("J1".parse::<Cell>().is_err());
        assert!("A6".parse::<Cell>().is_err());
        assert!("e5".parse::<Cell>().is_ok());
    }

    #[test]
    fn centre_has_six_neighbours_corner_three() {
        assert_eq!(cell("E5").neighbors().count(), 6);
        assert_eq!(cell("A1").neighbors().count(), 3);
        assert_eq!(cell("I9").neighbors().count(), 3);
    }

    #[test]
    fn direction_between_adjacent_cells() {
        assert_eq!(Direction::between(cell("A1"), cell("B2")), Some(Direction::NorthEast));
        assert_eq!(Direction::between(cell("A1"), cell("B1")), Some(Direction::NorthWest));
        assert_eq!(Direction::between(cell("B2"), cell("A1")), Some(Direction::SouthWest));
        assert_eq!(Direction::between(cell("A1"), cell("A3")), None);
        assert_eq!(Direction::between(cell("A1"), cell("A1")), None);
    }

    #[test]
    fn direction_parse_errors_name_the_direction() {
        assert_eq!("ne".parse::<Direction>(), Ok(Direction::NorthEast));
        assert_eq!(
            "UP".parse::<Direction>(),
            Err(GameError::InvalidDirection("UP".to_string()))
        );
    }

    #[test]
    fn step_off_edge_is_none() {
        assert_eq!(cell("A1").step(Direction::SouthWest), None);
        assert_eq!(cell("E9").step(Direction::East), None);
        assert_eq!(cell("E5").step(Direction::East), Some(cell("E6")));
    }
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board representation and starting layouts

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::hex::{Cell, ROWS};
use crate::{Color, Marble};

const BACKING: usize = (ROWS as usize) * (ROWS as usize);

/// Marble positions on the 61-cell board.
///
/// A `BoardState` is a value: transitions produce a new state and never
/// modify an existing one. On the wire it is a map from cell notation to
/// marble for every occupied cell.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "BTreeMap<Cell, Marble>", from = "BTreeMap<Cell, Marble>")]
pub struct BoardState {
    cells: [Marble; BACKING],
}

impl BoardState {
    /// An empty board
    pub fn empty() -> Self {
        Self {
            cells: [Marble::Empty; BACKING],
        }
    }

    /// Build a board from the cells of each color
    pub fn from_cells(black: &[Cell], white: &[Cell]) -> Self {
        let mut board = Self::empty();
        for &cell in black {
            board.cells[cell.index()] = Marble::Black;
        }
        for &cell in white {
            board.cells[cell.index()] = Marble::White;
        }
        board
    }

    /// Get the marble at the specified cell
    pub fn get(&self, cell: Cell) -> Marble {
        self.cells[cell.index()]
    }

    /// A copy of this board with `cell` set to `marble`
    pub fn with(&self, cell: Cell, marble: Marble) -> Self {
        let mut next = *self;
        next.cells[cell.index()] = marble;
        next
    }

    /// Number of marbles of `color` still on the board
    pub fn count(&self, color: Color) -> usize {
        let marble = Marble::from(color);
        Cell::all().filter(|c| self.get(*c) == marble).count()
    }

    /// Cells holding a marble of `color`
    pub fn occupied(&self, color: Color) -> Vec<Cell> {
        let marble = Marble::from(color);
        Cell::all().filter(|c| self.get(*c) == marble).collect()
    }

    /// Every cell with its occupant, row by row
    pub fn cells(&self) -> impl Iterator<Item = (Cell, Marble)> + '_ {
        Cell::all().map(move |c| (c, self.get(c)))
    }
}

impl Default for BoardState {
    fn default() -> Self {
        Layout::Standard.board()
    }
}

impl fmt::Debug for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.cells().filter(|(_, m)| !m.is_empty()).map(|(c, m)| (c.to_string(), m)))
            .finish()
    }
}

impl From<BoardState> for BTreeMap<Cell, Marble> {
    fn from(board: BoardState) -> Self {
        board.cells().filter(|(_, m)| !m.is_empty()).collect()
    }
}

impl From<BTreeMap<Cell, Marble>> for BoardState {
    fn from(map: BTreeMap<Cell, Marble>) -> Self {
        let mut board = BoardState::empty();
        for (cell, marble) in map {
            board.cells[cell.index()] = marble;
        }
        board
    }
}

/// Starting positions offered by the settings screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Layout {
    /// Fourteen marbles per side filling the first two rows and the middle of the third
    #[default]
    Standard,
    /// Two daisies per color, touching the opponent's along the edge
    BelgianDaisy,
    /// Two daisies per color, one row in from the edge
    GermanDaisy,
}

impl Layout {
    /// Build the starting board for this layout
    pub fn board(&self) -> BoardState {
        let (black, white): (&[&str], &[&str]) = match self {
            Layout::Standard => (
                &[
                    "A1", "A2", "A3", "A4", "A5", "B1", "B2", "B3", "B4", "B5", "B6", "C3", "C4",
                    "C5",
                ],
                &[
                    "I5", "I6", "I7", "I8", "I9", "H4", "H5", "H6", "H7", "H8", "H9", "G5", "G6",
                    "G7",
                ],
            ),
            Layout::BelgianDaisy => (
                &[
                    "A1", "A2", "B1", "B2", "B3", "C2", "C3", "I8", "I9", "H7", "H8", "H9", "G7",
                    "G8",
                ],
                &[
                    "A4", "A5", "B4", "B5", "B6", "C5", "C6", "I5", "I6", "H4", "H5", "H6", "G4",
                    "G5",
                ],
            ),
            Layout::GermanDaisy => (
                &[
                    "B1", "B2", "C1", "C2", "C3", "D2", "D3", "F7", "F8", "G7", "G8", "G9", "H8",
                    "H9",
                ],
                &[
                    "B5", "B6", "C5", "C6", "C7", "D6", "D7", "F3", "F4", "G3", "G4", "G5", "H4",
                    "H5",
                ],
            ),
        };
        BoardState::from_cells(&parse_all(black), &parse_all(white))
    }
}

fn parse_all(cells: &[&str]) -> Vec<Cell> {
    cells.iter().filter_map(|s| s.parse().ok()).collect()
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Marble-group selection

use serde::{Deserialize, Serialize};

use crate::board::BoardState;
use crate::hex::{Cell, Direction};
use crate::{Color, GameError, Marble};

/// Largest group that may move together
pub const MAX_GROUP: usize = 3;

/// A contiguous straight line of 1-3 marbles of one color.
///
/// Cells are kept sorted, so consecutive cells always step East, North-East
/// or North-West.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    cells: Vec<Cell>,
}

impl Selection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Validate an arbitrary set of cells as a movable group.
    ///
    /// Order does not matter; duplicates, gaps, bends, mixed colors, empty
    /// cells and groups larger than three are rejected.
    pub fn from_cells(cells: &[Cell], board: &BoardState) -> Result<Self, GameError> {
        if cells.is_empty() || cells.len() > MAX_GROUP {
            return Err(GameError::InvalidSelection);
        }

        let mut sorted = cells.to_vec();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != cells.len() {
            return Err(GameError::InvalidSelection);
        }

        let marble = board.get(sorted[0]);
        if marble.is_empty() || sorted.iter().any(|c| board.get(*c) != marble) {
            return Err(GameError::InvalidSelection);
        }

        let mut axis = None;
        for pair in sorted.windows(2) {
            let step = Direction::between(pair[0], pair[1]).ok_or(GameError::InvalidSelection)?;
            match axis {
                None => axis = Some(step),
                Some(a) if a == step => {}
                Some(_) => return Err(GameError::InvalidSelection),
            }
        }

        Ok(Self { cells: sorted })
    }

    /// Selected cells in line order
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// Direction from the first cell to the second; `None` for fewer than two
    pub fn axis(&self) -> Option<Direction> {
        match self.cells.as_slice() {
            [a, b, ..] => Direction::between(*a, *b),
            _ => None,
        }
    }

    /// Color of the selected marbles
    pub fn color(&self, board: &BoardState) -> Option<Color> {
        self.cells.first().and_then(|c| board.get(*c).color())
    }

    /// Apply one click to the current selection.
    ///
    /// Re-clicking a selected cell clears the selection. Clicks on cells
    /// that do not hold one of `mover`'s marbles leave it unchanged. A click
    /// that extends the line at either end is accepted while the group is
    /// below three marbles; any other click restarts the selection there.
    pub fn try_extend(&self, clicked: Cell, board: &BoardState, mover: Color) -> Selection {
        if self.contains(clicked) {
            tracing::debug!("Deselecting group at {}", clicked);
            return Selection::empty();
        }

        if board.get(clicked) != Marble::from(mover) {
            tracing::debug!("Ignoring click on {}: not a {:?} marble", clicked, mover);
            return self.clone();
        }

        if !self.is_empty() && self.len() < MAX_GROUP {
            let mut candidate = self.cells.clone();
            candidate.push(clicked);
            if let Ok(extended) = Selection::from_cells(&candidate, board) {
                return extended;
            }
        }

        Selection {
            cells: vec![clicked],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(names: &[&str]) -> Vec<Cell> {
        names.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn board() -> BoardState {
        BoardState::from_cells(&cells(&["C3", "C4", "C5", "C6", "D4"]), &cells(&["C7", "E5"]))
    }

    #[test]
    fn first_click_needs_mover_color() {
        let c3 = "C3".parse().unwrap();
        let c7 = "C7".parse().unwrap();
        let e1 = "E1".parse().unwrap();
        assert_eq!(Selection::empty().try_extend(c3, &board(), Color::Black).cells(), &[c3]);
        assert!(Selection::empty().try_extend(c7, &board(), Color::Black).is_empty());
        assert!(Selection::empty().try_extend(e1, &board(), Color::Black).is_empty());
    }

    #[test]
    fn extends_line_in_either_order() {
        let b = board();
        let mut sel = Selection::empty();
        for name in ["C4", "C5", "C3"] {
            sel = sel.try_extend(name.parse().unwrap(), &b, Color::Black);
        }
        assert_eq!(sel.cells(), cells(&["C3", "C4", "C5"]).as_slice());
        assert_eq!(sel.axis(), Some(Direction::East));
    }

    #[test]
    fn bent_or_gapped_click_restarts() {
        let b = board();
        let sel = Selection::from_cells(&cells(&["C3", "C4"]), &b).unwrap();
        let d4 = "D4".parse().unwrap();
        assert_eq!(sel.try_extend(d4, &b, Color::Black).cells(), &[d4]);
        let c6 = "C6".parse().unwrap();
        assert_eq!(sel.try_extend(c6, &b, Color::Black).cells(), &[c6]);
    }

    #[test]
    fn fourth_click_restarts() {
        let b = board();
        let sel = Selection::from_cells(&cells(&["C3", "C4", "C5"]), &b).unwrap();
        let c6 = "C6".parse().unwrap();
        assert_eq!(sel.try_extend(c6, &b, Color::Black).cells(), &[c6]);
    }

    #[test]
    fn reclick_deselects() {
        let b = board();
        let sel = Selection::from_cells(&cells(&["C3", "C4"]), &b).unwrap();
        assert!(sel.try_extend("C4".parse().unwrap(), &b, Color::Black).is_empty());
    }

    #[test]
    fn mixed_colors_rejected() {
        let b = board();
        assert_eq!(
            Selection::from_cells(&cells(&["C6", "C7"]), &b),
            Err(GameError::InvalidSelection)
        );
    }
}

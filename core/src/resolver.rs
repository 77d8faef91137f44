// SPDX-License-Identifier: MIT OR Apache-2.0

//! Move legality and displacement.
//!
//! Two move classes exist. A broadside slides the group sideways into empty
//! cells. An in-line move slides the group along its own line and may push
//! a shorter run of opposing marbles (sumito): 2 against 1, 3 against 1 or
//! 3 against 2. The cell behind the pushed run must be empty or off the
//! board, in which case the last pushed marble leaves play.

use crate::board::BoardState;
use crate::hex::{Cell, Direction};
use crate::selection::{Selection, MAX_GROUP};
use crate::transition::{Destination, MoveKind, MoveTransition, Step};
use crate::{Color, Marble};

/// Stateless move resolution
pub struct MoveResolver;

impl MoveResolver {
    /// Resolve `selection` moving in `direction` on `board`.
    ///
    /// Returns `None` for any illegal move; the board is never touched.
    pub fn resolve(selection: &Selection, direction: Direction, board: &BoardState) -> Option<MoveTransition> {
        // The selection may have been made against an earlier board.
        let selection = Selection::from_cells(selection.cells(), board).ok()?;
        let color = selection.color(board)?;

        match selection.axis() {
            Some(axis) if !axis.is_parallel(direction) => Self::broadside(selection, direction, board, color),
            _ => Self::inline(selection, direction, board, color),
        }
    }

    fn broadside(
        selection: Selection,
        direction: Direction,
        board: &BoardState,
        color: Color,
    ) -> Option<MoveTransition> {
        let mut steps = Vec::with_capacity(selection.len());
        for &from in selection.cells() {
            let to = from.step(direction)?;
            if !board.get(to).is_empty() {
                return None;
            }
            steps.push(Step {
                from,
                to: Destination::Cell(to),
                marble: Marble::from(color),
            });
        }

        Some(MoveTransition {
            selection,
            direction,
            kind: MoveKind::Broadside,
            steps,
        })
    }

    fn inline(selection: Selection, direction: Direction, board: &BoardState, color: Color) -> Option<MoveTransition> {
        let own = Marble::from(color);
        let opponent = Marble::from(color.opposite());

        // Walk from the front of the group: the marble with nothing of the
        // group ahead of it in `direction`.
        let mut group: Vec<Cell> = selection.cells().to_vec();
        if selection.axis() != Some(direction) {
            group.reverse();
        }
        let front = *group.last()?;

        let mut run = Vec::new();
        let mut ahead = front.step(direction);
        while let Some(cell) = ahead {
            if board.get(cell) != opponent {
                break;
            }
            run.push(cell);
            if run.len() >= selection.len() {
                tracing::debug!("Sumito blocked: {} cannot push {}", selection.len(), run.len());
                return None;
            }
            ahead = cell.step(direction);
        }

        match ahead {
            // Our own marbles never leave the board.
            None if run.is_empty() => return None,
            None => {}
            Some(cell) if board.get(cell).is_empty() => {}
            Some(_) => return None,
        }

        let mut steps = Vec::with_capacity(group.len() + run.len());
        for &from in run.iter().rev() {
            steps.push(Step {
                from,
                to: from.step(direction).map_or(Destination::OffBoard, Destination::Cell),
                marble: opponent,
            });
        }
        for &from in group.iter().rev() {
            steps.push(Step {
                from,
                to: Destination::Cell(from.step(direction)?),
                marble: own,
            });
        }

        Some(MoveTransition {
            selection,
            direction,
            kind: MoveKind::Inline { pushed: run.len() },
            steps,
        })
    }

    /// Directions in which a hover over `target` could move the group.
    ///
    /// A target adjacent to several selected marbles can mean more than one
    /// direction; they are returned in selection order.
    pub fn candidate_directions(selection: &Selection, target: Cell) -> Vec<Direction> {
        if selection.contains(target) {
            return Vec::new();
        }

        let mut directions = Vec::new();
        for &cell in selection.cells() {
            if let Some(d) = Direction::between(cell, target) {
                if !directions.contains(&d) {
                    directions.push(d);
                }
            }
        }
        directions
    }

    /// First legal move toward a hovered cell, if any
    pub fn preview(selection: &Selection, target: Cell, board: &BoardState) -> Option<MoveTransition> {
        Self::candidate_directions(selection, target)
            .into_iter()
            .find_map(|d| Self::resolve(selection, d, board))
    }

    /// Every legal move for `color` on `board`
    pub fn legal_moves(board: &BoardState, color: Color) -> Vec<MoveTransition> {
        let mut moves = Vec::new();
        for start in board.occupied(color) {
            for group in groups_from(start, board, color) {
                for direction in Direction::ALL {
                    if let Some(t) = Self::resolve(&group, direction, board) {
                        moves.push(t);
                    }
                }
            }
        }
        moves
    }
}

/// Groups whose first (lowest) cell is `start`
fn groups_from(start: Cell, board: &BoardState, color: Color) -> Vec<Selection> {
    let own = Marble::from(color);
    let mut groups = Vec::new();
    if let Ok(single) = Selection::from_cells(&[start], board) {
        groups.push(single);
    }

    for axis in [Direction::East, Direction::NorthEast, Direction::NorthWest] {
        let mut cells = vec![start];
        let mut cur = start;
        while cells.len() < MAX_GROUP {
            match cur.step(axis) {
                Some(next) if board.get(next) == own => {
                    cells.push(next);
                    cur = next;
                    if let Ok(group) = Selection::from_cells(&cells, board) {
                        groups.push(group);
                    }
                }
                _ => break,
            }
        }
    }
    groups
}

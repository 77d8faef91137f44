// SPDX-License-Identifier: MIT OR Apache-2.0

use abalone_core::{
    transition, BoardState, Cell, Color, Destination, Direction, Marble, MoveKind, MoveResolver, Selection,
};

fn cells(names: &[&str]) -> Vec<Cell> {
    names.iter().map(|s| s.parse().unwrap()).collect()
}

fn cell(name: &str) -> Cell {
    name.parse().unwrap()
}

#[test]
fn three_push_two_off_the_edge() {
    // North-east diagonal E5 F6 G7 H8 I9; the edge follows I9.
    let black = cells(&["E5", "F6", "G7"]);
    let white = cells(&["H8", "I9"]);
    let board = BoardState::from_cells(&black, &white);

    let selection = Selection::from_cells(&black, &board).unwrap();
    let t = MoveResolver::resolve(&selection, Direction::NorthEast, &board).expect("3 v 2 is legal");

    assert_eq!(t.kind, MoveKind::Inline { pushed: 2 });
    assert_eq!(t.steps.len(), 5, "all five marbles move");
    assert_eq!(t.steps[0].from, cell("I9"));
    assert_eq!(t.steps[0].to, Destination::OffBoard);
    assert_eq!(t.pushed_off(), 1);

    let next = transition::apply(&board, &t);
    for name in ["F6", "G7", "H8"] {
        assert_eq!(next.get(cell(name)), Marble::Black, "{}", name);
    }
    assert_eq!(next.get(cell("E5")), Marble::Empty);
    assert_eq!(next.get(cell("I9")), Marble::White);
    assert_eq!(next.count(Color::Black), 3);
    assert_eq!(next.count(Color::White), 1);
}

#[test]
fn three_push_two_into_empty_cell() {
    let black = cells(&["E1", "E2", "E3"]);
    let white = cells(&["E4", "E5"]);
    let board = BoardState::from_cells(&black, &white);
    let selection = Selection::from_cells(&black, &board).unwrap();
    let t = MoveResolver::resolve(&selection, Direction::East, &board).unwrap();

    assert_eq!(t.pushed_off(), 0);
    let next = t.apply_to(&board);
    assert_eq!(next.occupied(Color::Black), cells(&["E2", "E3", "E4"]));
    assert_eq!(next.occupied(Color::White), cells(&["E5", "E6"]));
}

#[test]
fn two_cannot_push_two() {
    let black = cells(&["E2", "E3"]);
    let white = cells(&["E4", "E5"]);
    let board = BoardState::from_cells(&black, &white);
    let selection = Selection::from_cells(&black, &board).unwrap();
    assert!(MoveResolver::resolve(&selection, Direction::East, &board).is_none());
}

#[test]
fn group_pushing_backward_uses_its_rear_as_front() {
    let black = cells(&["E4", "E5"]);
    let white = cells(&["E3"]);
    let board = BoardState::from_cells(&black, &white);
    let selection = Selection::from_cells(&black, &board).unwrap();
    let t = MoveResolver::resolve(&selection, Direction::West, &board).unwrap();
    let next = t.apply_to(&board);
    assert_eq!(next.occupied(Color::Black), cells(&["E3", "E4"]));
    assert_eq!(next.occupied(Color::White), cells(&["E2"]));
}

#[test]
fn broadside_blocked_by_either_color() {
    let black = cells(&["D3", "D4"]);
    for blocker in [Marble::Black, Marble::White] {
        let board = BoardState::from_cells(&black, &[]).with(cell("E5"), blocker);
        let selection = Selection::from_cells(&black, &board).unwrap();
        // D3->E4, D4->E5
        assert!(MoveResolver::resolve(&selection, Direction::NorthEast, &board).is_none());
    }
}

#[test]
fn broadside_cannot_push() {
    let black = cells(&["D3", "D4"]);
    let white = cells(&["E4"]);
    let board = BoardState::from_cells(&black, &white);
    let selection = Selection::from_cells(&black, &board).unwrap();
    assert!(MoveResolver::resolve(&selection, Direction::NorthEast, &board).is_none());
}

#[test]
fn stale_selection_does_not_resolve() {
    let board = BoardState::from_cells(&cells(&["D3", "D4"]), &[]);
    let selection = Selection::from_cells(&cells(&["D3", "D4"]), &board).unwrap();
    let moved = board.with(cell("D4"), Marble::Empty);
    assert!(MoveResolver::resolve(&selection, Direction::East, &moved).is_none());
}

// SPDX-License-Identifier: MIT OR Apache-2.0

// Rendering a live session: selection marks, move preview and the info panel
use abalone_cli::{parse_input, render_view, Input};
use abalone_core::{Cell, ConnectionState, GameSession, SessionConfig, SessionView};
use abalone_network::UserCommand;

fn cell(name: &str) -> Cell {
    name.parse().unwrap()
}

fn line_for_row(output: &str, row: char) -> String {
    output
        .lines()
        .find(|l| l.starts_with(row))
        .unwrap()
        .to_string()
}

#[test]
fn selection_and_preview_are_marked() {
    let mut session = GameSession::new(SessionConfig::default());
    session.start(ConnectionState::Connected).unwrap();

    let Input::Command(UserCommand::Click(c3)) = parse_input("click C3").unwrap() else {
        panic!("expected a click");
    };
    session.cell_clicked(c3).unwrap();
    session.hover_entered(cell("D4"));

    let output = render_view(&SessionView::from(&session));
    // C3 is the first black marble of row C, D4 the hovered empty target
    assert_eq!(line_for_row(&output, 'C'), "C   · · ◉ ● ● · · 8");
    assert!(line_for_row(&output, 'D').contains('*'));
    assert!(output.contains("Turn 1 (running)"));
    assert!(output.contains("> Black: 14 on board, 0 lost"));
}

#[test]
fn history_and_turn_after_a_move() {
    let mut session = GameSession::new(SessionConfig::default());
    session.start(ConnectionState::Connected).unwrap();
    session
        .play(&[cell("C3"), cell("C4")], abalone_core::Direction::NorthEast)
        .unwrap();

    let output = render_view(&SessionView::from(&session));
    assert!(output.contains("Turn 2 (running)"));
    assert!(output.contains("> White: 14 on board, 0 lost"));
    assert!(output.contains("[1. B C3-C4 NE"));
    assert_eq!(line_for_row(&output, 'D'), "D  · · · ● ● · · · 9");
}

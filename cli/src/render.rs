// SPDX-License-Identifier: MIT OR Apache-2.0

//! ASCII board rendering for the CLI.
//!
//! Row `I` is printed on top so Black plays "up" the screen. Each row is
//! indented by its distance from the middle row, which lines the diagonals
//! up as on a physical board.

use abalone_core::hex::ROWS;
use abalone_core::{BoardState, Cell, ClockPhase, Color, Marble, OutcomeReason, SessionView};
use abalone_network::{Notice, SessionUpdate};

/// Render a bare board
pub fn render_board(board: &BoardState) -> String {
    draw(|cell| marble_symbol(board.get(cell), false))
}

/// Render the board with selection and preview marks plus the info panel
pub fn render_view(view: &SessionView) -> String {
    let mut output = draw(|cell| match view.cell(cell) {
        Some(c) if c.marble.is_empty() && c.preview => '*',
        Some(c) => marble_symbol(c.marble, c.selected),
        None => '?',
    });

    output.push('\n');
    output.push_str(&turn_line(view));
    output.push('\n');
    for player in [&view.black, &view.white] {
        let marker = if player.active { '>' } else { ' ' };
        output.push_str(&format!(
            "{} {:?}: {} on board, {} lost",
            marker, player.color, player.marbles, player.lost
        ));
        if view.timed && player.active {
            output.push_str(&format!(", {:.1}s left", player.time_left));
        }
        if let Some(last) = player.history.last() {
            output.push_str(&format!("  [{}]", last));
        }
        output.push('\n');
    }

    if let Some(pending) = &view.pending_ai {
        let cells: Vec<String> = pending.marbles.iter().map(Cell::to_string).collect();
        output.push_str(&format!(
            "AI proposes {} {} (accept / reject)\n",
            cells.join("-"),
            pending.direction
        ));
    } else if view.awaiting_ai {
        output.push_str("Waiting for the AI...\n");
    }
    if let Some(outcome) = &view.outcome {
        output.push_str(&outcome_line(outcome.reason, outcome.winner));
        output.push('\n');
    }
    output
}

/// One-line text for non-view updates; `None` for updates not worth printing
pub fn describe_update(update: &SessionUpdate) -> Option<String> {
    match update {
        SessionUpdate::View(_) | SessionUpdate::Clock { .. } => None,
        SessionUpdate::Error(error) => Some(format!("! {}", error)),
        SessionUpdate::Notice(notice) => Some(match notice {
            Notice::MoveApplied(record) => record.to_string(),
            Notice::AiPending => "AI move ready for review".to_string(),
            Notice::AiDiscarded(reason) => format!("AI answer dropped: {}", reason),
            Notice::AiOnHold => "AI keeps failing; type 'ai' to ask again".to_string(),
            Notice::Connection(state) => format!("AI service: {:?}", state),
            Notice::ReconnectNeeded => "AI service unavailable; type 'reconnect'".to_string(),
            Notice::GameOver(outcome) => outcome_line(outcome.reason, outcome.winner),
        }),
    }
}

fn turn_line(view: &SessionView) -> String {
    let turn = match view.turn_limit {
        Some(limit) => format!("Turn {}/{}", view.turn, limit),
        None => format!("Turn {}", view.turn),
    };
    let phase = match view.phase {
        ClockPhase::Idle => "not started",
        ClockPhase::Running => "running",
        ClockPhase::Paused => "paused",
        ClockPhase::Ended => "ended",
    };
    format!("{} ({})", turn, phase)
}

fn outcome_line(reason: OutcomeReason, winner: Option<Color>) -> String {
    let why = match reason {
        OutcomeReason::MoveLimit => "move limit reached",
        OutcomeReason::TimeLimit => "time ran out",
        OutcomeReason::PushedOff => "marbles pushed off",
        OutcomeReason::Stopped => "game stopped",
    };
    match winner {
        Some(color) => format!("Game over ({}): {:?} wins", why, color),
        None => format!("Game over ({}): no winner", why),
    }
}

fn marble_symbol(marble: Marble, selected: bool) -> char {
    match (marble, selected) {
        (Marble::Black, false) => '●',
        (Marble::Black, true) => '◉',
        (Marble::White, false) => '○',
        (Marble::White, true) => '◎',
        (Marble::Empty, _) => '·',
    }
}

fn draw(symbol: impl Fn(Cell) -> char) -> String {
    let mut output = String::new();
    let middle = ROWS / 2;

    for row in (0..ROWS).rev() {
        let letter = (b'A' + row as u8) as char;
        let indent = (row - middle).unsigned_abs() as usize;
        output.push(letter);
        output.push(' ');
        output.push_str(&" ".repeat(indent));

        let row_cells: Vec<String> = (1..=ROWS)
            .filter_map(|col| Cell::new(row, col))
            .map(|cell| symbol(cell).to_string())
            .collect();
        output.push_str(&row_cells.join(" "));

        // Diagonals 6..9 start at the right end of the row above
        if row < middle {
            output.push_str(&format!(" {}", row + middle + 2));
        }
        output.push('\n');
    }

    // Diagonals 1..5 below row A
    output.push_str(&" ".repeat(2 + middle as usize + 1));
    let labels: Vec<String> = (1..=middle + 1).map(|d| d.to_string()).collect();
    output.push_str(&labels.join(" "));
    output.push('\n');
    output
}

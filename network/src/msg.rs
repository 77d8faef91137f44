// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message types between a front end and the session driver.

use abalone_core::{Cell, ConnectionState, Direction, GameError, GameOutcome, MoveRecord, SessionView};

/// Messages sent from the front end to the driver
#[derive(Debug, Clone, PartialEq)]
pub enum UserCommand {
    /// A board cell was clicked
    Click(Cell),
    /// The pointer entered a cell
    Hover(Cell),
    /// The pointer left the hovered cell
    Leave,
    /// Select a group and move it in one step
    Move { cells: Vec<Cell>, direction: Direction },
    Start,
    /// Toggle pause
    Pause,
    Undo,
    Reset,
    Stop,
    Continue,
    /// Apply the pending AI move
    Accept,
    /// Discard the pending AI move
    Reject,
    /// Ask the AI again after a rejected or failed move
    RequestAi,
    /// Retry the AI connection
    Reconnect,
    /// Shut the driver down
    Quit,
}

/// Things worth telling the player about
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    MoveApplied(MoveRecord),
    /// An AI move waits for accept or reject
    AiPending,
    /// An AI answer was dropped without touching the game
    AiDiscarded(GameError),
    /// The AI kept failing; requests are on hold until `RequestAi`
    AiOnHold,
    Connection(ConnectionState),
    /// The AI is needed but not connected
    ReconnectNeeded,
    GameOver(GameOutcome),
}

/// Messages sent from the driver to the front end
#[derive(Debug, Clone, PartialEq)]
pub enum SessionUpdate {
    /// Full state after a change
    View(Box<SessionView>),
    /// Clock progress between views
    Clock { turn: u32, remaining_ms: u64 },
    Notice(Notice),
    /// A command was refused; the game is unchanged
    Error(GameError),
}

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal front end for the Abalone client: input parsing and board rendering

pub mod command;
pub mod render;

pub use command::{parse_input, Input, HELP};
pub use render::{describe_update, render_board, render_view};

// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parsing of typed player input into driver commands.

use abalone_core::{Cell, Direction};
use abalone_network::UserCommand;
use anyhow::{anyhow, bail, Context, Result};

/// Command summary printed by `help`
pub const HELP: &str = "\
Commands:
  click <cell>               select or deselect a marble (e.g. click C3)
  hover <cell> | leave       preview the move towards a cell
  move <cells..> <dir>       move a group, e.g. move C3 C4 NE
  start | pause | stop | continue
  undo | reset
  accept | reject            confirm or discard a pending AI move
  ai                         ask the AI again
  reconnect                  retry the AI service
  show                       print the board again
  quit";

/// One line of player input
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Command(UserCommand),
    Help,
    /// Reprint the last board
    Show,
}

/// Parse a line such as `move C3 C4 NE`
pub fn parse_input(line: &str) -> Result<Input> {
    let mut words = line.split_whitespace();
    let keyword = words
        .next()
        .ok_or_else(|| anyhow!("Empty input"))?
        .to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let command = match keyword.as_str() {
        "help" | "?" => return Ok(Input::Help),
        "show" | "board" => return Ok(Input::Show),
        "click" => UserCommand::Click(single_cell(&args)?),
        "hover" => UserCommand::Hover(single_cell(&args)?),
        "leave" => UserCommand::Leave,
        "move" | "m" => parse_move(&args)?,
        "start" => UserCommand::Start,
        "pause" => UserCommand::Pause,
        "undo" => UserCommand::Undo,
        "reset" => UserCommand::Reset,
        "stop" => UserCommand::Stop,
        "continue" => UserCommand::Continue,
        "accept" => UserCommand::Accept,
        "reject" => UserCommand::Reject,
        "ai" => UserCommand::RequestAi,
        "reconnect" => UserCommand::Reconnect,
        "quit" | "exit" => UserCommand::Quit,
        other => bail!("Unknown command '{}'. Type 'help' for a list.", other),
    };
    Ok(Input::Command(command))
}

fn single_cell(args: &[&str]) -> Result<Cell> {
    match args {
        [cell] => cell.parse().context("Expected a cell such as E5"),
        _ => bail!("Expected exactly one cell"),
    }
}

fn parse_move(args: &[&str]) -> Result<UserCommand> {
    let Some((direction, cells)) = args.split_last() else {
        bail!("Usage: move <cells..> <direction>");
    };
    if cells.is_empty() || cells.len() > 3 {
        bail!("A move takes one to three cells");
    }
    let direction: Direction = direction
        .parse()
        .map_err(|_| anyhow!("Unknown direction '{}'. Use E, NE, NW, W, SW or SE.", direction))?;
    let cells = cells
        .iter()
        .map(|c| c.parse::<Cell>().with_context(|| format!("Bad cell '{}'", c)))
        .collect::<Result<Vec<_>>>()?;
    Ok(UserCommand::Move { cells, direction })
}

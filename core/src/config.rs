// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session configuration chosen on the settings screen

use serde::{Deserialize, Serialize};

use crate::board::{BoardState, Layout};
use crate::Color;

/// Who plays against whom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// Two humans sharing one board
    #[default]
    #[serde(rename = "pvp")]
    HumanVsHuman,
    /// A human against the remote AI service
    #[serde(rename = "pve")]
    HumanVsAi,
}

/// How a move returned by the AI reaches the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AiMode {
    /// Apply the move as soon as it arrives
    #[default]
    AutoApply,
    /// Hold the move until the player accepts or rejects it
    ConfirmFirst,
}

/// Per-color move and time limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub black_moves: u32,
    pub white_moves: u32,
    /// Seconds per turn for Black
    pub black_seconds: u32,
    /// Seconds per turn for White
    pub white_seconds: u32,
    pub enforce_moves: bool,
    pub enforce_time: bool,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            black_moves: 40,
            white_moves: 40,
            black_seconds: 20,
            white_seconds: 20,
            enforce_moves: false,
            enforce_time: false,
        }
    }
}

impl Limits {
    /// Move limit of one color
    pub fn moves(&self, color: Color) -> u32 {
        match color {
            Color::Black => self.black_moves,
            Color::White => self.white_moves,
        }
    }

    /// Per-turn time of one color in milliseconds
    pub fn time_ms(&self, color: Color) -> u64 {
        let seconds = match color {
            Color::Black => self.black_seconds,
            Color::White => self.white_seconds,
        };
        u64::from(seconds) * 1000
    }

    /// Combined move limit, or `None` when the game never ends on move count.
    ///
    /// A zero limit for either color disables the check.
    pub fn total_moves(&self) -> Option<u32> {
        if !self.enforce_moves || self.black_moves == 0 || self.white_moves == 0 {
            return None;
        }
        Some(self.black_moves.saturating_add(self.white_moves))
    }
}

/// Everything the core needs to run one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub mode: GameMode,
    /// Color of the local player when playing the AI
    pub player_color: Color,
    pub layout: Layout,
    pub ai_mode: AiMode,
    /// Marbles a player must push off to win
    pub marbles_to_win: usize,
    pub limits: Limits,
    /// Explicit starting board; overrides `layout` when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_board: Option<BoardState>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::HumanVsHuman,
            player_color: Color::Black,
            layout: Layout::Standard,
            initial_board: None,
            limits: Limits::default(),
            ai_mode: AiMode::AutoApply,
            marbles_to_win: 6,
        }
    }
}

impl SessionConfig {
    /// Board the game starts (and resets) from
    pub fn starting_board(&self) -> BoardState {
        self.initial_board.unwrap_or_else(|| self.layout.board())
    }

    /// Color the AI plays, if this is a game against the AI
    pub fn ai_color(&self) -> Option<Color> {
        match self.mode {
            GameMode::HumanVsHuman => None,
            GameMode::HumanVsAi => Some(self.player_color.opposite()),
        }
    }
}

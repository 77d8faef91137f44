// SPDX-License-Identifier: MIT OR Apache-2.0

//! Turn counter and per-turn countdown.
//!
//! The clock is a plain state machine: `Idle -> Running <-> Paused -> Ended`.
//! It does not schedule anything itself; the session driver owns the tick
//! schedule and feeds [`TurnClock::tick`] on a fixed interval.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Limits;
use crate::Color;

/// Default tick interval (ten ticks per second)
pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockPhase {
    /// Not started
    Idle,
    Running,
    Paused,
    /// A limit was reached or the game was stopped
    Ended,
}

/// Result of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Time was deducted and some remains
    Counting,
    /// This tick used up the active player's time
    Expired,
    /// Nothing happened: not running, untimed, or already at zero
    Ignored,
}

#[derive(Debug, Clone)]
pub struct TurnClock {
    limits: Limits,
    turn: u32,
    remaining_ms: u64,
    /// Remaining time of the previous turn when it was advanced, for undo
    previous_remaining_ms: Option<u64>,
    phase: ClockPhase,
}

impl TurnClock {
    pub fn new(limits: Limits) -> Self {
        Self {
            limits,
            turn: 1,
            remaining_ms: limits.time_ms(Color::for_turn(1)),
            previous_remaining_ms: None,
            phase: ClockPhase::Idle,
        }
    }

    /// Current turn number; odd turns belong to Black
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn active_color(&self) -> Color {
        Color::for_turn(self.turn)
    }

    pub fn phase(&self) -> ClockPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == ClockPhase::Running
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Whether the countdown is in effect at all
    pub fn is_timed(&self) -> bool {
        self.limits.enforce_time
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Remaining time of the active color in seconds
    pub fn remaining_secs(&self) -> f64 {
        self.remaining_ms as f64 / 1000.0
    }

    /// Seconds the active color has used this turn
    pub fn elapsed_secs(&self) -> f64 {
        let limit = self.limits.time_ms(self.active_color());
        limit.saturating_sub(self.remaining_ms) as f64 / 1000.0
    }

    /// Remaining time as a 0-100 display ratio
    pub fn ratio(&self) -> f64 {
        let limit = self.limits.time_ms(self.active_color());
        if limit == 0 {
            return 0.0;
        }
        self.remaining_ms as f64 / limit as f64 * 100.0
    }

    /// Idle -> Running, with the full allowance for the active color
    pub fn start(&mut self) -> bool {
        if self.phase != ClockPhase::Idle {
            return false;
        }
        self.remaining_ms = self.limits.time_ms(self.active_color());
        self.phase = ClockPhase::Running;
        true
    }

    /// Deduct one interval from the active color's time
    pub fn tick(&mut self, interval: Duration) -> Tick {
        if !self.is_running() || !self.is_timed() || self.remaining_ms == 0 {
            return Tick::Ignored;
        }

        self.remaining_ms = self.remaining_ms.saturating_sub(interval.as_millis() as u64);
        if self.remaining_ms == 0 {
            tracing::debug!("Turn {} out of time", self.turn);
            Tick::Expired
        } else {
            Tick::Counting
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != ClockPhase::Running {
            return false;
        }
        self.phase = ClockPhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != ClockPhase::Paused {
            return false;
        }
        self.phase = ClockPhase::Running;
        true
    }

    /// Move to the next turn after a move was applied.
    ///
    /// The new active color starts with its full allowance and a paused
    /// clock resumes.
    pub fn advance_turn(&mut self) {
        self.previous_remaining_ms = Some(self.remaining_ms);
        self.turn += 1;
        self.remaining_ms = self.limits.time_ms(self.active_color());
        if self.phase == ClockPhase::Paused {
            self.phase = ClockPhase::Running;
        }
    }

    /// Step back one turn for undo. Leaves the clock paused.
    pub fn revert_turn(&mut self) -> bool {
        if self.turn <= 1 {
            return false;
        }
        self.turn -= 1;
        self.remaining_ms = self
            .previous_remaining_ms
            .take()
            .unwrap_or_else(|| self.limits.time_ms(self.active_color()));
        if self.phase != ClockPhase::Idle {
            self.phase = ClockPhase::Paused;
        }
        true
    }

    /// True once the turn number has passed the combined move limit
    pub fn moves_exhausted(&self) -> bool {
        matches!(self.limits.total_moves(), Some(total) if self.turn > total)
    }

    /// End the clock if the combined move limit has been passed
    pub fn check_limits(&mut self) -> bool {
        if self.moves_exhausted() {
            tracing::info!("Move limit reached at turn {}", self.turn);
            self.phase = ClockPhase::Ended;
            return true;
        }
        false
    }

    pub fn end(&mut self) {
        self.phase = ClockPhase::Ended;
    }

    /// Leave `Ended` after an explicit stop, as long as no limit was hit
    pub fn reopen(&mut self) -> bool {
        if self.phase != ClockPhase::Ended || self.moves_exhausted() {
            return false;
        }
        self.phase = ClockPhase::Paused;
        true
    }
}

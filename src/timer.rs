//! Focus timer - pomodoro countdown state
//!
//! The timer owns no clock. Callers advance it once per second with
//! [`FocusTimer::tick`] while it is running.

use crate::config::TimerConfig;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerMode {
    Focus,
    ShortBreak,
    LongBreak,
}

impl TimerMode {
    pub fn label(&self) -> &'static str {
        match self {
            TimerMode::Focus => "Focus",
            TimerMode::ShortBreak => "Short Break",
            TimerMode::LongBreak => "Long Break",
        }
    }

    /// Length of the mode in minutes under `config`
    pub fn minutes(&self, config: &TimerConfig) -> u32 {
        match self {
            TimerMode::Focus => config.focus_minutes,
            TimerMode::ShortBreak => config.short_break_minutes,
            TimerMode::LongBreak => config.long_break_minutes,
        }
    }

    /// Length of the mode in seconds, capped at `u32::MAX`
    pub fn seconds(&self, config: &TimerConfig) -> u32 {
        self.minutes(config).saturating_mul(60)
    }
}

impl FromStr for TimerMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "focus" | "work" => Ok(TimerMode::Focus),
            "short" | "short-break" | "short_break" => Ok(TimerMode::ShortBreak),
            "long" | "long-break" | "long_break" => Ok(TimerMode::LongBreak),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Result of advancing the timer by one second
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// Not running; nothing changed
    Idle,
    /// Still counting; seconds left
    Counting(u32),
    /// Reached zero and reset to the full duration
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FocusTimer {
    mode: TimerMode,
    total_seconds: u32,
    remaining_seconds: u32,
    state: TimerState,
    #[serde(skip)]
    config: TimerConfig,
}

impl FocusTimer {
    /// A fresh timer in Focus mode
    pub fn new(config: TimerConfig) -> Self {
        let total = TimerMode::Focus.seconds(&config);
        Self {
            mode: TimerMode::Focus,
            total_seconds: total,
            remaining_seconds: total,
            state: TimerState::Idle,
            config,
        }
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn total_seconds(&self) -> u32 {
        self.total_seconds
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Switch mode; always stops and resets first
    pub fn set_mode(&mut self, mode: TimerMode) {
        self.cancel();
        self.mode = mode;
        self.total_seconds = mode.seconds(&self.config);
        self.remaining_seconds = self.total_seconds;
    }

    /// Shift the duration by `delta_seconds`.
    ///
    /// Ignored while running, and when the result would not be positive.
    pub fn adjust(&mut self, delta_seconds: i64) -> bool {
        if self.is_running() {
            return false;
        }
        let updated = i64::from(self.remaining_seconds) + delta_seconds;
        if updated <= 0 || updated > i64::from(u32::MAX) {
            return false;
        }
        self.total_seconds = updated as u32;
        self.remaining_seconds = updated as u32;
        true
    }

    /// Start, pause, or resume
    pub fn toggle(&mut self) {
        self.state = match self.state {
            TimerState::Running => TimerState::Paused,
            TimerState::Idle | TimerState::Paused => TimerState::Running,
        };
    }

    /// Stop and rewind to the full duration
    pub fn cancel(&mut self) {
        self.state = TimerState::Idle;
        self.remaining_seconds = self.total_seconds;
    }

    pub fn tick(&mut self) -> Tick {
        if !self.is_running() {
            return Tick::Idle;
        }
        if self.remaining_seconds > 0 {
            self.remaining_seconds -= 1;
            Tick::Counting(self.remaining_seconds)
        } else {
            self.cancel();
            Tick::Finished
        }
    }

    /// Remaining time as `MM:SS`
    pub fn display(&self) -> String {
        format!(
            "{:02}:{:02}",
            self.remaining_seconds / 60,
            self.remaining_seconds % 60
        )
    }

    /// Fraction of the duration still left, `0.0..=1.0`
    pub fn progress(&self) -> f64 {
        if self.total_seconds == 0 {
            return 0.0;
        }
        f64::from(self.remaining_seconds) / f64::from(self.total_seconds)
    }

    pub fn start_label(&self) -> &'static str {
        match self.state {
            TimerState::Idle => "Start",
            TimerState::Running => "Pause",
            TimerState::Paused => "Resume",
        }
    }
}

impl Default for FocusTimer {
    fn default() -> Self {
        Self::new(TimerConfig::default())
    }
}

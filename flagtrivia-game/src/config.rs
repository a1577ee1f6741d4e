//! Match configuration.
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BOARD_SIZE, DEFAULT_HOLE_COUNT, DEFAULT_PLAYERS, DEFAULT_TIME_LIMIT_SECS,
    MAX_BOARD_SIZE, MAX_PLAYERS, MAX_TIME_LIMIT_SECS, MIN_BOARD_SIZE, MIN_PLAYERS,
    MIN_TIME_LIMIT_SECS,
};
use crate::error::ConfigError;

/// How categories are laid out across the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryPolicy {
    /// `CATEGORIES[(row + col) % len]`, reproducible without any randomness.
    #[default]
    Checkerboard,
    /// Each cell draws its category uniformly from the match RNG.
    UniformRandom,
}

/// Everything needed to set up a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "MatchConfig::default_players")]
    pub players: u8,
    #[serde(default = "MatchConfig::default_board_size")]
    pub board_size: u8,
    #[serde(default = "MatchConfig::default_hole_count")]
    pub hole_count: u16,
    /// Answer timer for the presentation layer; the engine only forwards it.
    #[serde(default = "MatchConfig::default_time_limit")]
    pub time_limit_secs: u16,
    #[serde(default)]
    pub category_policy: CategoryPolicy,
    #[serde(default)]
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            players: DEFAULT_PLAYERS,
            board_size: DEFAULT_BOARD_SIZE,
            hole_count: DEFAULT_HOLE_COUNT,
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            category_policy: CategoryPolicy::default(),
            seed: 0,
        }
    }
}

impl MatchConfig {
    const fn default_players() -> u8 {
        DEFAULT_PLAYERS
    }

    const fn default_board_size() -> u8 {
        DEFAULT_BOARD_SIZE
    }

    const fn default_hole_count() -> u16 {
        DEFAULT_HOLE_COUNT
    }

    const fn default_time_limit() -> u16 {
        DEFAULT_TIME_LIMIT_SECS
    }

    #[must_use]
    pub const fn with_players(mut self, players: u8) -> Self {
        self.players = players;
        self
    }

    #[must_use]
    pub const fn with_board_size(mut self, board_size: u8) -> Self {
        self.board_size = board_size;
        self
    }

    #[must_use]
    pub const fn with_hole_count(mut self, hole_count: u16) -> Self {
        self.hole_count = hole_count;
        self
    }

    #[must_use]
    pub const fn with_time_limit(mut self, secs: u16) -> Self {
        self.time_limit_secs = secs;
        self
    }

    #[must_use]
    pub const fn with_category_policy(mut self, policy: CategoryPolicy) -> Self {
        self.category_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Menu-style player count adjustment, clamped to the supported range.
    pub fn adjust_players(&mut self, delta: i32) {
        self.players = clamp_step(
            i32::from(self.players),
            delta,
            i32::from(MIN_PLAYERS),
            i32::from(MAX_PLAYERS),
        )
        .try_into()
        .unwrap_or(MIN_PLAYERS);
    }

    /// Menu-style board size adjustment, clamped to the supported range.
    pub fn adjust_board_size(&mut self, delta: i32) {
        self.board_size = clamp_step(
            i32::from(self.board_size),
            delta,
            i32::from(MIN_BOARD_SIZE),
            i32::from(MAX_BOARD_SIZE),
        )
        .try_into()
        .unwrap_or(MIN_BOARD_SIZE);
    }

    /// Menu-style answer timer adjustment, clamped to the supported range.
    pub fn adjust_time_limit(&mut self, delta: i32) {
        self.time_limit_secs = clamp_step(
            i32::from(self.time_limit_secs),
            delta,
            i32::from(MIN_TIME_LIMIT_SECS),
            i32::from(MAX_TIME_LIMIT_SECS),
        )
        .try_into()
        .unwrap_or(MIN_TIME_LIMIT_SECS);
    }

    /// Check that every field lies inside its supported range.
    ///
    /// # Errors
    ///
    /// Returns the first out-of-range field as a [`ConfigError`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.players) {
            return Err(ConfigError::PlayerCount(self.players));
        }
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&self.board_size) {
            return Err(ConfigError::BoardSize(self.board_size));
        }
        if !(MIN_TIME_LIMIT_SECS..=MAX_TIME_LIMIT_SECS).contains(&self.time_limit_secs) {
            return Err(ConfigError::TimeLimit(self.time_limit_secs));
        }
        Ok(())
    }
}

fn clamp_step(value: i32, delta: i32, min: i32, max: i32) -> i32 {
    value.saturating_add(delta).clamp(min, max)
}

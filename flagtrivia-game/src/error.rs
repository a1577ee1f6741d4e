//! Error taxonomy for configuration and data-source failures.
//!
//! Gameplay outcomes (wrong answers, blocked targets, holes) are ordinary
//! return values and never show up here.

use std::path::PathBuf;

use thiserror::Error;

use crate::constants::{
    MAX_BOARD_SIZE, MAX_PLAYERS, MAX_TIME_LIMIT_SECS, MIN_BOARD_SIZE, MIN_PLAYERS,
    MIN_TIME_LIMIT_SECS,
};

/// Errors raised when a match cannot be configured or started.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("player count must be between {MIN_PLAYERS} and {MAX_PLAYERS} (got {0})")]
    PlayerCount(u8),
    #[error("board size must be between {MIN_BOARD_SIZE} and {MAX_BOARD_SIZE} (got {0})")]
    BoardSize(u8),
    #[error(
        "answer time limit must be between {MIN_TIME_LIMIT_SECS} and {MAX_TIME_LIMIT_SECS} seconds (got {0})"
    )]
    TimeLimit(u16),
    #[error("question bank unavailable: {reason}")]
    QuestionBankUnavailable { reason: String },
    #[error("question bank contains no questions")]
    QuestionBankEmpty,
}

/// Errors produced while reading question data from a host source.
#[derive(Debug, Error)]
pub enum QuestionSourceError {
    #[error("failed to read question bank {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse question bank: {0}")]
    Json(#[from] serde_json::Error),
}

//! Centralized balance and configuration constants for Flag Trivia.
//!
//! These values are fixed game-balance parameters. Keeping them together
//! means the rules can only be retuned through reviewed code changes.

// Rewards and trivia gating -----------------------------------------------
/// Score awarded for a successful move into an empty cell.
pub const MOVE_REWARD: u32 = 1;
/// Score awarded for a successful capture.
pub const ATTACK_REWARD: u32 = 5;
/// Questions that must be answered correctly to move into an empty cell.
pub const MOVE_CHALLENGES: u8 = 1;
/// Questions that must be answered correctly, in sequence, to capture.
pub const ATTACK_CHALLENGES: u8 = 2;

// Match configuration bounds ----------------------------------------------
pub const MIN_PLAYERS: u8 = 2;
pub const MAX_PLAYERS: u8 = 4;
pub const DEFAULT_PLAYERS: u8 = 2;

pub const MIN_BOARD_SIZE: u8 = 6;
pub const MAX_BOARD_SIZE: u8 = 32;
pub const DEFAULT_BOARD_SIZE: u8 = 8;

pub const DEFAULT_HOLE_COUNT: u16 = 6;

pub const MIN_TIME_LIMIT_SECS: u16 = 5;
pub const MAX_TIME_LIMIT_SECS: u16 = 120;
pub const DEFAULT_TIME_LIMIT_SECS: u16 = 30;
/// Step used by menu-style time limit adjustments.
pub const TIME_LIMIT_STEP_SECS: i32 = 5;

// Board content -----------------------------------------------------------
/// Category labels, in the order used by the checkerboard assignment.
pub const CATEGORIES: [&str; 6] = ["Sport", "History", "Music", "Science", "Art", "Random"];

/// Display colour per seat, in seat order.
pub const PLAYER_COLORS: [(u8, u8, u8); 4] = [
    (220, 20, 60),
    (30, 144, 255),
    (34, 139, 34),
    (255, 215, 0),
];

/// Starting constellation relative to a home corner. Index 0 is the flag.
pub const HOME_OFFSETS: [(u8, u8); 6] = [(0, 0), (1, 0), (0, 1), (1, 1), (2, 0), (0, 2)];

/// Number of fields a question-bank row must carry to be accepted.
pub const QUESTION_ROW_FIELDS: usize = 6;

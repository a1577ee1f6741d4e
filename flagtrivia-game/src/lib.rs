//! Flag Trivia Game Engine
//!
//! Rules engine for a turn-based capture-the-flag board game where every move
//! and attack is gated by multiple-choice trivia questions.
//! This crate carries no rendering, audio or input concerns; presentation
//! layers drive it through [`MatchState`] and consume [`MatchEvent`]s.

pub mod board;
pub mod config;
pub mod constants;
pub mod error;
pub mod invariants;
pub mod questions;
pub mod resolver;
pub mod roster;
pub mod state;
pub mod trivia;
pub mod turn;

use std::convert::Infallible;
use std::path::{Path, PathBuf};

// Re-export commonly used types
pub use board::{Board, Cell, Coord};
pub use config::{CategoryPolicy, MatchConfig};
pub use error::{ConfigError, QuestionSourceError};
pub use invariants::{InvariantViolation, assert_invariants, check_invariants};
pub use questions::{Question, QuestionBank};
pub use resolver::{TargetKind, classify_target, legal_destinations};
pub use roster::{Pawn, PawnId, Player, PlayerId, Rgb, Roster, place_pawns};
pub use state::{ActionResult, ClickOutcome, MatchEvent, MatchPhase, MatchSession, MatchState};
pub use trivia::{Answer, BankGate, Challenge, Responder, ScriptedGate, TriviaGate};
pub use turn::{advance_turn, check_eliminations, next_turn_after};

/// Trait for abstracting where question data comes from.
/// Hosts provide files, embedded assets or generated banks.
pub trait QuestionSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the full question bank.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read or parsed.
    fn load_questions(&self) -> Result<QuestionBank, Self::Error>;
}

/// Question bank stored on disk. `.json` files hold a serialized bank,
/// anything else is read as CSV rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileQuestionSource {
    path: PathBuf,
}

impl FileQuestionSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionSource for FileQuestionSource {
    type Error = QuestionSourceError;

    fn load_questions(&self) -> Result<QuestionBank, Self::Error> {
        let text = std::fs::read_to_string(&self.path).map_err(|source| QuestionSourceError::Io {
            path: self.path.clone(),
            source,
        })?;
        let is_json = self
            .path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Ok(QuestionBank::from_json(&text)?)
        } else {
            Ok(QuestionBank::from_csv(&text))
        }
    }
}

/// In-memory bank, for tests and embedded data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticQuestionSource {
    bank: QuestionBank,
}

impl StaticQuestionSource {
    #[must_use]
    pub const fn new(bank: QuestionBank) -> Self {
        Self { bank }
    }

    #[must_use]
    pub fn from_csv(text: &str) -> Self {
        Self::new(QuestionBank::from_csv(text))
    }
}

impl QuestionSource for StaticQuestionSource {
    type Error = Infallible;

    fn load_questions(&self) -> Result<QuestionBank, Self::Error> {
        Ok(self.bank.clone())
    }
}

/// Main engine entry point: owns the question source and starts matches.
pub struct GameEngine<Q>
where
    Q: QuestionSource,
{
    questions: Q,
}

impl<Q> GameEngine<Q>
where
    Q: QuestionSource,
{
    pub const fn new(questions: Q) -> Self {
        Self { questions }
    }

    #[must_use]
    pub const fn source(&self) -> &Q {
        &self.questions
    }

    /// Load the question bank, reporting a missing or empty source as a
    /// configuration problem.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::QuestionBankUnavailable`] if the source fails
    /// and [`ConfigError::QuestionBankEmpty`] if it holds no questions.
    pub fn load_bank(&self) -> Result<QuestionBank, ConfigError> {
        let bank = self.questions.load_questions().map_err(|err| {
            log::warn!("question bank unavailable: {err}");
            ConfigError::QuestionBankUnavailable {
                reason: err.to_string(),
            }
        })?;
        if bank.is_empty() {
            log::warn!("question bank loaded but contains no questions");
            return Err(ConfigError::QuestionBankEmpty);
        }
        log::debug!(
            "loaded {} questions across {} categories",
            bank.len(),
            bank.categories().count()
        );
        Ok(bank)
    }

    /// Create a bare match with no gate attached.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is out of range.
    pub fn create_match(&self, config: MatchConfig) -> Result<MatchState, ConfigError> {
        MatchState::new_match(config)
    }

    /// Create a match refereed by a [`BankGate`] over this engine's bank.
    ///
    /// The gate's RNG is seeded from `config.seed` and its timer from
    /// `config.time_limit_secs`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is out of range or the
    /// question bank is missing or empty.
    pub fn create_session<R: Responder>(
        &self,
        config: MatchConfig,
        responder: R,
    ) -> Result<MatchSession<BankGate<R>>, ConfigError> {
        let bank = self.load_bank()?;
        let gate = BankGate::new(bank, config.seed, responder).with_time_limit(config.time_limit_secs);
        MatchSession::start(config, gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../data/questions.csv");

    fn always_right(challenge: &Challenge) -> Answer {
        Answer::Choice(challenge.correct_index())
    }

    #[test]
    fn fixture_bank_covers_every_category() {
        let bank = QuestionBank::from_csv(FIXTURE);
        for category in constants::CATEGORIES {
            assert!(!bank.questions_in(category).is_empty(), "{category}");
        }
    }

    #[test]
    fn engine_starts_a_gated_session() {
        let engine = GameEngine::new(StaticQuestionSource::from_csv(FIXTURE));
        let config = MatchConfig::default().with_hole_count(0).with_seed(11);
        let mut session = engine.create_session(config, always_right).unwrap();
        assert!(session.select(2, 0));
        assert_eq!(session.target(3, 0), ActionResult::MoveSuccess);
        assert_eq!(session.gate().asked(), 1);
        assert_eq!(session.state().score(PlayerId(0)), Some(1));
    }

    #[test]
    fn empty_bank_is_a_config_error() {
        let engine = GameEngine::new(StaticQuestionSource::default());
        assert_eq!(engine.load_bank(), Err(ConfigError::QuestionBankEmpty));
        let config = MatchConfig::default();
        assert!(matches!(
            engine.create_session(config, always_right),
            Err(ConfigError::QuestionBankEmpty)
        ));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let engine = GameEngine::new(FileQuestionSource::new("does/not/exist.csv"));
        let err = engine.load_bank().unwrap_err();
        assert!(matches!(err, ConfigError::QuestionBankUnavailable { .. }));
        assert!(err.to_string().contains("exist.csv"));
    }

    #[test]
    fn file_source_reads_csv_fixture() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/data/questions.csv");
        let bank = FileQuestionSource::new(path).load_questions().unwrap();
        assert_eq!(bank, QuestionBank::from_csv(FIXTURE));
    }

    #[test]
    fn create_match_validates_config() {
        let engine = GameEngine::new(StaticQuestionSource::default());
        assert_eq!(
            engine
                .create_match(MatchConfig::default().with_board_size(40))
                .unwrap_err(),
            ConfigError::BoardSize(40)
        );
        assert!(engine.create_match(MatchConfig::default()).is_ok());
    }
}

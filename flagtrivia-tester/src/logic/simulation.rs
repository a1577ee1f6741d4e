use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use flagtrivia_game::{
    ActionResult, BankGate, MatchConfig, MatchEvent, MatchSession, MatchState, PlayerId,
    QuestionBank, check_invariants,
};

use crate::logic::policy::{AnswerPolicy, MovePolicy};

/// Turn cap applied when a plan does not set one.
pub const DEFAULT_MAX_TURNS: u32 = 400;

/// Everything needed to run one simulated match per seed.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub config: MatchConfig,
    pub answers: AnswerPolicy,
    pub moves: MovePolicy,
    pub max_turns: u32,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(config: MatchConfig, answers: AnswerPolicy, moves: MovePolicy) -> Self {
        Self {
            config,
            answers,
            moves,
            max_turns: DEFAULT_MAX_TURNS,
            expectations: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_max_turns(mut self, max_turns: u32) -> Self {
        self.max_turns = max_turns;
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    /// Run the hook against a finished simulation.
    ///
    /// # Errors
    ///
    /// Returns the hook's error when the expectation does not hold.
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// Complete record of a simulated match.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub config: MatchConfig,
    pub answers: AnswerPolicy,
    pub moves: MovePolicy,
    /// Resolved actions that ended a turn.
    pub turns: u32,
    pub deselects: u32,
    pub winner: Option<PlayerId>,
    pub scores: Vec<u32>,
    pub successful_moves: u32,
    pub failed_moves: u32,
    pub captures: u32,
    pub failed_attacks: u32,
    pub eliminations: Vec<PlayerId>,
    pub questions_asked: u32,
    pub invariant_violations: Vec<String>,
    pub events: usize,
    /// Current player had no legal action before the match ended.
    pub stalled: bool,
    pub board_categories: BTreeSet<String>,
    pub final_state: MatchState,
}

impl SimulationSummary {
    #[must_use]
    pub fn total_score(&self) -> u32 {
        self.scores.iter().sum()
    }

    #[must_use]
    pub fn outcome_label(&self) -> String {
        match (self.winner, self.stalled) {
            (Some(winner), _) => format!("{winner} won"),
            (None, true) => "stalled".to_string(),
            (None, false) => "turn cap".to_string(),
        }
    }
}

/// Headless deterministic runner for the rules engine.
#[derive(Clone)]
pub struct MatchRunner {
    verbose: bool,
    bank: Arc<QuestionBank>,
}

impl MatchRunner {
    pub const fn new(bank: Arc<QuestionBank>, verbose: bool) -> Self {
        Self { verbose, bank }
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Play one match under `plan` with the given seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the plan's configuration is rejected by the engine.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let config = plan.config.clone().with_seed(seed);
        let gate = BankGate::new(
            QuestionBank::clone(&self.bank),
            seed,
            plan.answers.responder(seed.rotate_left(17)),
        )
        .with_time_limit(config.time_limit_secs);
        let mut session = MatchSession::start(config.clone(), gate)
            .with_context(|| format!("invalid match configuration {config:?}"))?;
        let mut policy = plan.moves.create_policy(seed);

        let mut summary = SimulationSummary {
            seed,
            config,
            answers: plan.answers,
            moves: plan.moves,
            turns: 0,
            deselects: 0,
            winner: None,
            scores: Vec::new(),
            successful_moves: 0,
            failed_moves: 0,
            captures: 0,
            failed_attacks: 0,
            eliminations: Vec::new(),
            questions_asked: 0,
            invariant_violations: Vec::new(),
            events: 0,
            stalled: false,
            board_categories: BTreeSet::new(),
            final_state: session.state().clone(),
        };

        while summary.turns < plan.max_turns && !session.state().is_over() {
            let Some(action) = policy.pick_action(session.state()) else {
                summary.stalled = true;
                break;
            };
            session.select(i32::from(action.from.row), i32::from(action.from.col));
            let result = session.target(i32::from(action.to.row), i32::from(action.to.col));
            record_result(&mut summary, result);

            for event in session.drain_events() {
                summary.events += 1;
                if let MatchEvent::PlayerEliminated { player, .. } = event {
                    summary.eliminations.push(player);
                }
            }
            summary.invariant_violations.extend(
                check_invariants(session.state())
                    .into_iter()
                    .map(|violation| format!("turn {}: {violation}", summary.turns)),
            );

            if self.verbose && result.ends_turn() {
                println!(
                    "    {} {:?} -> {:?}: {:?}",
                    policy.name().dimmed(),
                    action.from,
                    action.to,
                    result
                );
            }
        }

        let (state, gate) = session.into_parts();
        summary.winner = state.winner();
        summary.scores = state.players().iter().map(|p| p.score).collect();
        summary.questions_asked = gate.asked();
        summary.board_categories = state
            .board()
            .iter()
            .map(|(_, cell)| cell.category.clone())
            .collect();
        summary.final_state = state;
        Ok(summary)
    }
}

fn record_result(summary: &mut SimulationSummary, result: ActionResult) {
    match result {
        ActionResult::MoveSuccess => summary.successful_moves += 1,
        ActionResult::MoveFailure => summary.failed_moves += 1,
        ActionResult::AttackSuccess => summary.captures += 1,
        ActionResult::AttackFailure => summary.failed_attacks += 1,
        ActionResult::Deselected | ActionResult::Invalid => summary.deselects += 1,
    }
    if result.ends_turn() {
        summary.turns += 1;
    }
}

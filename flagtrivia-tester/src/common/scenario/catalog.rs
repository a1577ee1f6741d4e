use anyhow::{Result, ensure};

use crate::common::scenario::TestScenario;
use crate::logic::{AnswerPolicy, MovePolicy, SimulationPlan, SimulationSummary};
use flagtrivia_game::constants::{ATTACK_REWARD, CATEGORIES, MOVE_REWARD};
use flagtrivia_game::{CategoryPolicy, MatchConfig};

const STALL_TURNS: u32 = 60;

pub fn catalog_scenarios() -> Vec<(&'static str, TestScenario)> {
    vec![
        (
            "smoke",
            TestScenario::new(
                "Smoke",
                "Default 2-player match, perfect answers, aggressive play",
                with_core_checks(SimulationPlan::new(
                    MatchConfig::default(),
                    AnswerPolicy::Perfect,
                    MovePolicy::Aggressive,
                )),
            ),
        ),
        (
            "perfect-duel",
            TestScenario::new(
                "Perfect Duel",
                "Hole-free duel where every attack lands; must end with a winner",
                with_core_checks(SimulationPlan::new(
                    MatchConfig::default().with_hole_count(0),
                    AnswerPolicy::Perfect,
                    MovePolicy::Aggressive,
                ))
                .with_expectation(winner_declared),
            ),
        ),
        (
            "four-way-brawl",
            TestScenario::new(
                "Four-Way Brawl",
                "4 players on 12x12 answering 80% correctly",
                with_core_checks(
                    SimulationPlan::new(
                        MatchConfig::default().with_players(4).with_board_size(12),
                        AnswerPolicy::Accuracy(0.8),
                        MovePolicy::Aggressive,
                    )
                    .with_max_turns(1_200),
                ),
            ),
        ),
        (
            "always-wrong-stalls",
            TestScenario::new(
                "Always Wrong Stalls",
                "Every answer is wrong: no pawn moves, no score, turns still rotate",
                with_core_checks(
                    SimulationPlan::new(
                        MatchConfig::default(),
                        AnswerPolicy::AlwaysWrong,
                        MovePolicy::Aggressive,
                    )
                    .with_max_turns(STALL_TURNS),
                )
                .with_expectation(nothing_changes),
            ),
        ),
        (
            "timeouts-forfeit",
            TestScenario::new(
                "Timeouts Forfeit",
                "Every timer runs out; graded exactly like wrong answers",
                with_core_checks(
                    SimulationPlan::new(
                        MatchConfig::default().with_players(3).with_board_size(9),
                        AnswerPolicy::TimesOut,
                        MovePolicy::Random,
                    )
                    .with_max_turns(STALL_TURNS),
                )
                .with_expectation(nothing_changes),
            ),
        ),
        (
            "random-categories",
            TestScenario::new(
                "Random Categories",
                "Uniform-random category layout with random play",
                with_core_checks(
                    SimulationPlan::new(
                        MatchConfig::default()
                            .with_board_size(10)
                            .with_category_policy(CategoryPolicy::UniformRandom),
                        AnswerPolicy::Accuracy(0.6),
                        MovePolicy::Random,
                    )
                    .with_max_turns(600),
                )
                .with_expectation(categories_are_known),
            ),
        ),
        (
            "cautious-standoff",
            TestScenario::new(
                "Cautious Standoff",
                "Cautious movers keep their flags home",
                with_core_checks(SimulationPlan::new(
                    MatchConfig::default().with_players(3),
                    AnswerPolicy::Accuracy(0.7),
                    MovePolicy::Cautious,
                )),
            ),
        ),
        (
            "large-board",
            TestScenario::new(
                "Large Board",
                "4 players on the largest board with 60 holes",
                with_core_checks(
                    SimulationPlan::new(
                        MatchConfig::default()
                            .with_players(4)
                            .with_board_size(32)
                            .with_hole_count(60),
                        AnswerPolicy::Perfect,
                        MovePolicy::Aggressive,
                    )
                    .with_max_turns(3_000),
                ),
            ),
        ),
    ]
}

fn with_core_checks(plan: SimulationPlan) -> SimulationPlan {
    plan.with_expectation(invariants_hold)
        .with_expectation(scores_match_actions)
        .with_expectation(eliminations_are_consistent)
}

fn invariants_hold(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.invariant_violations.is_empty(),
        "invariant violations: {}",
        summary.invariant_violations.join("; ")
    );
    Ok(())
}

fn scores_match_actions(summary: &SimulationSummary) -> Result<()> {
    let expected = summary.successful_moves * MOVE_REWARD + summary.captures * ATTACK_REWARD;
    ensure!(
        summary.total_score() == expected,
        "total score {} does not match {} moves and {} captures",
        summary.total_score(),
        summary.successful_moves,
        summary.captures
    );
    Ok(())
}

fn eliminations_are_consistent(summary: &SimulationSummary) -> Result<()> {
    let players = usize::from(summary.config.players);
    ensure!(
        summary.eliminations.len() < players,
        "{} eliminations in a {players}-player match",
        summary.eliminations.len()
    );
    ensure!(
        summary.eliminations.len() <= summary.captures as usize,
        "more eliminations than captures"
    );
    if let Some(winner) = summary.winner {
        ensure!(
            summary.eliminations.len() == players - 1,
            "{winner} declared winner with {} opponents still active",
            players - 1 - summary.eliminations.len()
        );
        ensure!(!summary.eliminations.contains(&winner), "winner was eliminated");
    }
    Ok(())
}

fn winner_declared(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.winner.is_some(),
        "no winner after {} turns ({})",
        summary.turns,
        summary.outcome_label()
    );
    Ok(())
}

fn nothing_changes(summary: &SimulationSummary) -> Result<()> {
    ensure!(summary.total_score() == 0, "scores changed: {:?}", summary.scores);
    ensure!(
        summary.successful_moves == 0 && summary.captures == 0,
        "a gated action succeeded"
    );
    ensure!(summary.winner.is_none(), "match ended without a correct answer");
    ensure!(
        summary.stalled || summary.turns == STALL_TURNS,
        "only {} of {STALL_TURNS} turns were played",
        summary.turns
    );
    Ok(())
}

fn categories_are_known(summary: &SimulationSummary) -> Result<()> {
    for category in &summary.board_categories {
        ensure!(
            CATEGORIES.contains(&category.as_str()),
            "unknown category {category} on the board"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::MatchRunner;
    use flagtrivia_game::QuestionBank;
    use std::sync::Arc;

    fn runner() -> MatchRunner {
        let bank = QuestionBank::from_csv(include_str!("../../../../flagtrivia-game/data/questions.csv"));
        MatchRunner::new(Arc::new(bank), false)
    }

    fn run(key: &str, seed: u64) -> (TestScenario, SimulationSummary) {
        let (_, scenario) = catalog_scenarios()
            .into_iter()
            .find(|(k, _)| *k == key)
            .unwrap();
        let summary = runner().run_plan(&scenario.plan, seed).unwrap();
        (scenario, summary)
    }

    fn assert_passes(key: &str, seed: u64) {
        let (scenario, summary) = run(key, seed);
        for expectation in &scenario.plan.expectations {
            expectation.evaluate(&summary).unwrap();
        }
    }

    #[test]
    fn keys_are_unique() {
        let mut keys: Vec<_> = catalog_scenarios().into_iter().map(|(k, _)| k).collect();
        let total = keys.len();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn smoke_passes() {
        assert_passes("smoke", 1337);
    }

    #[test]
    fn perfect_duel_passes() {
        assert_passes("perfect-duel", 1337);
        assert_passes("perfect-duel", 7);
    }

    #[test]
    fn always_wrong_passes() {
        assert_passes("always-wrong-stalls", 1);
        assert_passes("timeouts-forfeit", 1);
    }

    #[test]
    fn random_categories_passes() {
        assert_passes("random-categories", 21);
    }

    #[test]
    fn nothing_changes_rejects_a_scoring_run() {
        let (_, summary) = run("perfect-duel", 1337);
        assert!(nothing_changes(&summary).is_err());
    }
}

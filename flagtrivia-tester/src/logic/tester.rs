use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::simulation::{MatchRunner, SimulationPlan, SimulationSummary};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    pub wins: usize,
    pub average_turns: f64,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
    #[serde(with = "duration_vec_serde")]
    pub performance_data: Vec<Duration>,
}

pub struct LogicTester {
    runner: MatchRunner,
}

impl LogicTester {
    pub const fn new(runner: MatchRunner) -> Self {
        Self { runner }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        let mut results = Vec::new();

        for &seed in seeds {
            if self.runner.verbose() {
                println!(
                    "🧪 Testing scenario: {} ({}p {}x{}, answers {}, moves {}, seed {})",
                    scenario.name.bright_white(),
                    scenario.plan.config.players,
                    scenario.plan.config.board_size,
                    scenario.plan.config.board_size,
                    scenario.plan.answers,
                    scenario.plan.moves,
                    seed
                );
            }

            results.push(self.run_single_scenario(scenario, seed, iterations));
        }

        results
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let tally = self.run_simulation_iterations(&scenario.plan, seed, iterations);

        let average_duration = if tally.performance_data.is_empty() {
            Duration::ZERO
        } else {
            tally.performance_data.iter().sum::<Duration>()
                / u32::try_from(tally.performance_data.len()).unwrap_or(1)
        };
        #[allow(clippy::cast_precision_loss)]
        let average_turns = if iterations == 0 {
            0.0
        } else {
            tally.total_turns as f64 / iterations as f64
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            seed,
            passed: tally.failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: tally.successes,
            failures: tally.failures,
            wins: tally.wins,
            average_turns,
            average_duration,
            performance_data: tally.performance_data,
        }
    }

    fn run_simulation_iterations(
        &self,
        plan: &SimulationPlan,
        seed: u64,
        iterations: usize,
    ) -> IterationTally {
        let mut tally = IterationTally::default();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            let summary = match self.runner.run_plan(plan, iteration_seed) {
                Ok(summary) => summary,
                Err(err) => {
                    tally
                        .failures
                        .push(format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1));
                    continue;
                }
            };
            tally.total_turns += u64::from(summary.turns);
            if summary.winner.is_some() {
                tally.wins += 1;
            }

            if let Some(err) = evaluate_expectations(plan, &summary) {
                tally.failures.push(format!(
                    "Iteration {} (seed {}, turns {}, outcome {}, scores {:?}): {} | {}",
                    i + 1,
                    summary.seed,
                    summary.turns,
                    summary.outcome_label(),
                    summary.scores,
                    err,
                    summarize_match(&summary)
                ));

                if self.runner.verbose() {
                    println!("  ❌ Iteration {}/{} failed: {}", i + 1, iterations, err.red());
                }
            } else {
                tally.successes += 1;
                let duration = start_time.elapsed();
                tally.performance_data.push(duration);

                if self.runner.verbose() {
                    println!(
                        "  ✅ Iteration {}/{} passed ({duration:?}) turns:{} outcome:{}",
                        i + 1,
                        iterations,
                        summary.turns,
                        summary.outcome_label()
                    );
                }
            }
        }

        tally
    }
}

#[derive(Debug, Default)]
struct IterationTally {
    successes: usize,
    wins: usize,
    total_turns: u64,
    failures: Vec<String>,
    performance_data: Vec<Duration>,
}

fn evaluate_expectations(plan: &SimulationPlan, summary: &SimulationSummary) -> Option<String> {
    for expectation in &plan.expectations {
        if let Err(err) = expectation.evaluate(summary) {
            return Some(err.to_string());
        }
    }
    None
}

fn summarize_match(summary: &SimulationSummary) -> String {
    format!(
        "moves {}/{} attacks {}/{} eliminated {:?} questions {} violations {}",
        summary.successful_moves,
        summary.successful_moves + summary.failed_moves,
        summary.captures,
        summary.captures + summary.failed_attacks,
        summary.eliminations,
        summary.questions_asked,
        summary.invariant_violations.len()
    )
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}

mod duration_vec_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(durations: &[Duration], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis: Vec<u128> = durations.iter().map(Duration::as_millis).collect();
        millis.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Duration>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis_vec = Vec::<u128>::deserialize(deserializer)?;
        Ok(millis_vec
            .into_iter()
            .map(|m| Duration::from_millis(u64::try_from(m).unwrap_or(0)))
            .collect())
    }
}

mod common;
mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use common::scenario::{all_scenario_keys, get_scenario, list_scenarios};
use common::split_csv;
use flagtrivia_game::{
    FileQuestionSource, GameEngine, MatchConfig, QuestionBank, StaticQuestionSource,
};
use logic::{LogicTester, MatchRunner, ScenarioResult, resolve_seed_inputs};

const BUNDLED_QUESTIONS: &str = include_str!("../../flagtrivia-game/data/questions.csv");

#[derive(Debug, Parser)]
#[command(name = "flagtrivia-tester", version = "0.1.0")]
#[command(about = "Automated match simulation for the Flag Trivia rules engine")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Override the player count of every scenario
    #[arg(long)]
    players: Option<u8>,

    /// Override the board size of every scenario
    #[arg(long)]
    board_size: Option<u8>,

    /// Override the hole count of every scenario
    #[arg(long)]
    holes: Option<u16>,

    /// Question bank file (.json, otherwise CSV); defaults to the bundled bank
    #[arg(long)]
    questions: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let bank = load_question_bank(args.questions.as_ref())?;
    let runner = MatchRunner::new(Arc::new(bank), args.verbose);

    let all_results = run_scenarios(&args, &scenarios, &seeds, runner);

    write_reports(&args, &all_results, start_time)?;

    if all_results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:22} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎮 Flag Trivia Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        scenarios.extend(all_scenario_keys().into_iter().map(str::to_string));
    }
    scenarios
}

fn load_question_bank(path: Option<&PathBuf>) -> Result<QuestionBank> {
    let bank = if let Some(path) = path {
        GameEngine::new(FileQuestionSource::new(path))
            .load_bank()
            .with_context(|| format!("failed to load questions from {}", path.display()))?
    } else {
        GameEngine::new(StaticQuestionSource::from_csv(BUNDLED_QUESTIONS))
            .load_bank()
            .context("bundled question bank is unusable")?
    };
    log::info!("question bank ready with {} questions", bank.len());
    Ok(bank)
}

fn apply_overrides(args: &Args, mut config: MatchConfig) -> MatchConfig {
    if let Some(players) = args.players {
        config = config.with_players(players);
    }
    if let Some(board_size) = args.board_size {
        config = config.with_board_size(board_size);
    }
    if let Some(holes) = args.holes {
        config = config.with_hole_count(holes);
    }
    config
}

fn run_scenarios(
    args: &Args,
    scenarios: &[String],
    seeds: &[u64],
    runner: MatchRunner,
) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Match Simulations".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(runner);
    let mut results = Vec::new();

    for scenario_name in scenarios {
        if let Some(mut scenario) = get_scenario(scenario_name) {
            scenario.plan.config = apply_overrides(args, scenario.plan.config);
            results.extend(tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }

    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Flag Trivia Simulation Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

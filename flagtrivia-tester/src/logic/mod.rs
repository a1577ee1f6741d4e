pub mod policy;
pub mod reports;
pub mod seeds;
pub mod simulation;
pub mod tester;

pub use policy::{AnswerPolicy, MovePolicy, PlannedAction, PlayerPolicy};
pub use seeds::resolve_seed_inputs;
pub use simulation::{MatchRunner, SimulationExpectation, SimulationPlan, SimulationSummary};
pub use tester::*;

pub mod catalog;

use crate::logic::SimulationPlan;
use catalog::catalog_scenarios;

/// A named simulation plan runnable from the CLI.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub description: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            plan,
        }
    }
}

/// Look up a scenario by its CLI key.
#[must_use]
pub fn get_scenario(key: &str) -> Option<TestScenario> {
    catalog_scenarios()
        .into_iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, scenario)| scenario)
}

/// CLI keys and descriptions of every scenario, in catalog order.
#[must_use]
pub fn list_scenarios() -> Vec<(&'static str, String)> {
    catalog_scenarios()
        .into_iter()
        .map(|(key, scenario)| (key, scenario.description))
        .collect()
}

/// Every runnable key, in catalog order; what `all` expands to.
#[must_use]
pub fn all_scenario_keys() -> Vec<&'static str> {
    catalog_scenarios().into_iter().map(|(key, _)| key).collect()
}

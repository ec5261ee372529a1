//! Shared types used across CLI commands and tests.

use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum Method {
    Exact,
    MonteCarlo,
}

#[derive(Serialize)]
pub(crate) struct PopulationSummary {
    pub(crate) size: u64,
    pub(crate) partition: Vec<u64>,
    pub(crate) blank_category: Option<usize>,
    pub(crate) draw: u64,
}

#[derive(Serialize)]
pub(crate) struct TrialSummary {
    pub(crate) requested: u64,
    pub(crate) completed: u64,
    pub(crate) seed: u64,
    pub(crate) truncated: bool,
}

#[derive(Serialize)]
pub(crate) struct OutcomeRow {
    pub(crate) representative: Vec<u64>,
    pub(crate) probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) frequency: Option<u64>,
}

#[derive(Serialize)]
pub(crate) struct SelectionSummary {
    pub(crate) intervals: Vec<String>,
    pub(crate) probability: f64,
}

#[derive(Serialize)]
pub(crate) struct RequirementSummary {
    pub(crate) clauses: Vec<String>,
    pub(crate) probability: f64,
}

#[derive(Serialize)]
pub(crate) struct DistributionReport {
    pub(crate) method: Method,
    pub(crate) population: PopulationSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) trials: Option<TrialSummary>,
    pub(crate) outcome_count: usize,
    pub(crate) total_mass: f64,
    pub(crate) expected_counts: Vec<f64>,
    pub(crate) most_likely: Option<OutcomeRow>,
    pub(crate) outcomes: Vec<OutcomeRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) selection: Option<SelectionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) requirements: Option<RequirementSummary>,
}

#[derive(Serialize)]
pub(crate) struct ComparisonRow {
    pub(crate) representative: Vec<u64>,
    pub(crate) exact: f64,
    pub(crate) estimate: f64,
    pub(crate) delta: f64,
}

#[derive(Serialize)]
pub(crate) struct ComparisonReport {
    pub(crate) population: PopulationSummary,
    pub(crate) trials: TrialSummary,
    pub(crate) total_variation: f64,
    pub(crate) rows: Vec<ComparisonRow>,
}

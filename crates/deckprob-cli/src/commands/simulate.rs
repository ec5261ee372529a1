// Command handler for: Simulate
//
// Runs the Monte Carlo estimator and reports normalized frequencies next to
// the raw counts.

use std::time::Duration;

use miette::IntoDiagnostic;

use deckprob::{MonteCarloConfig, Population};

use super::helpers::{build_report, emit, render_distribution_text};
use crate::cli::QueryArgs;
use crate::types::{Method, OutputFormat};

/// Settings gathered from the `simulate` and `compare` flags.
pub(crate) fn monte_carlo_config(
    trials: u64,
    seed: Option<u64>,
    chunk_size: u64,
    timeout_secs: u64,
) -> MonteCarloConfig {
    let mut config = MonteCarloConfig::new(trials).with_chunk_size(chunk_size);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    if timeout_secs > 0 {
        config = config.with_deadline(Duration::from_secs(timeout_secs));
    }
    config
}

/// Handler for the `simulate` subcommand.
pub(crate) fn run_simulate_command(
    population: &Population,
    draw: u64,
    config: &MonteCarloConfig,
    query: &QueryArgs,
    format: OutputFormat,
) -> miette::Result<()> {
    let estimate = deckprob::simulate(population, draw, config).into_diagnostic()?;
    let dist = estimate.normalized();
    let report = build_report(
        Method::MonteCarlo,
        population,
        draw,
        &dist,
        Some(&estimate),
        query,
    )?;
    emit(format, &report, render_distribution_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_timeout_means_no_deadline() {
        let cfg = monte_carlo_config(100, Some(4), 10, 0);
        assert_eq!(cfg.deadline, None);
        assert_eq!(cfg.seed, Some(4));
        assert_eq!(cfg.chunk_size, 10);
        let cfg = monte_carlo_config(100, None, 10, 3);
        assert_eq!(cfg.deadline, Some(Duration::from_secs(3)));
    }
}

// Command handler for: Exact
//
// Enumerates every representative and prints its exact hypergeometric
// probability, optionally summed over a selection or requirement set.

use miette::IntoDiagnostic;

use deckprob::Population;

use super::helpers::{build_report, emit, render_distribution_text};
use crate::cli::QueryArgs;
use crate::types::{Method, OutputFormat};

/// Handler for the `exact` subcommand.
pub(crate) fn run_exact_command(
    population: &Population,
    draw: u64,
    query: &QueryArgs,
    format: OutputFormat,
) -> miette::Result<()> {
    let dist = deckprob::exact_distribution(population, draw).into_diagnostic()?;
    let report = build_report(Method::Exact, population, draw, &dist, None, query)?;
    emit(format, &report, render_distribution_text)
}

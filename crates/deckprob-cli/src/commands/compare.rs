// Command handler for: Compare
//
// Cross-validates the Monte Carlo estimate against the exact distribution.

use std::fmt::Write as _;

use miette::IntoDiagnostic;

use deckprob::{Distribution, MonteCarloConfig, Population};

use super::helpers::{emit, format_counts, population_summary, render_population_line, trial_summary};
use crate::types::{ComparisonReport, ComparisonRow, OutputFormat};

/// Per-representative differences over the union of both key sets, largest
/// disagreement first.
pub(crate) fn comparison_rows(exact: &Distribution, estimate: &Distribution) -> Vec<ComparisonRow> {
    let mut rows: Vec<ComparisonRow> = exact
        .iter()
        .map(|(rep, p)| (rep, p, estimate.get(rep).unwrap_or(0.0)))
        .chain(
            estimate
                .iter()
                .filter(|(rep, _)| exact.get(rep).is_none())
                .map(|(rep, q)| (rep, 0.0, q)),
        )
        .map(|(rep, p, q)| ComparisonRow {
            representative: rep.counts().to_vec(),
            exact: p,
            estimate: q,
            delta: q - p,
        })
        .collect();
    rows.sort_by(|a, b| b.delta.abs().total_cmp(&a.delta.abs()));
    rows
}

fn render_comparison_text(report: &ComparisonReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Comparison (exact vs monte carlo):");
    let _ = writeln!(out, "  {}", render_population_line(&report.population));
    let _ = writeln!(
        out,
        "  Trials: {} of {} (seed {})",
        report.trials.completed, report.trials.requested, report.trials.seed
    );
    let _ = writeln!(out, "  Total variation distance: {:.6}", report.total_variation);
    let _ = writeln!(
        out,
        "    {:<20} {:>10} {:>10} {:>10}",
        "outcome", "exact", "estimate", "delta"
    );
    for row in &report.rows {
        let _ = writeln!(
            out,
            "    {:<20} {:>10.6} {:>10.6} {:>+10.6}",
            format_counts(&row.representative),
            row.exact,
            row.estimate,
            row.delta
        );
    }
    out
}

/// Handler for the `compare` subcommand.
pub(crate) fn run_compare_command(
    population: &Population,
    draw: u64,
    config: &MonteCarloConfig,
    top: usize,
    format: OutputFormat,
) -> miette::Result<()> {
    let exact = deckprob::exact_distribution(population, draw).into_diagnostic()?;
    let estimate = deckprob::simulate(population, draw, config).into_diagnostic()?;
    let normalized = estimate.normalized();

    let mut rows = comparison_rows(&exact, &normalized);
    if top > 0 {
        rows.truncate(top);
    }
    let report = ComparisonReport {
        population: population_summary(population, draw),
        trials: trial_summary(&estimate),
        total_variation: exact.total_variation_distance(&normalized),
        rows,
    };
    emit(format, &report, render_comparison_text)
}

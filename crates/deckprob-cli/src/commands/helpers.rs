//! Parsing and rendering helpers shared by the command handlers.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use miette::IntoDiagnostic;
use serde::Serialize;

use deckprob::{
    aggregate, Distribution, Interval, IntervalSelector, MonteCarloEstimate, Population,
    Representative, RequirementSet,
};

use crate::cli::QueryArgs;
use crate::types::{
    DistributionReport, Method, OutcomeRow, OutputFormat, PopulationSummary, RequirementSummary,
    SelectionSummary, TrialSummary,
};

pub(crate) fn parse_output_format(raw: &str) -> miette::Result<OutputFormat> {
    match raw.trim().to_lowercase().as_str() {
        "text" => Ok(OutputFormat::Text),
        "json" => Ok(OutputFormat::Json),
        other => miette::bail!("Unknown output format '{other}'. Use 'text' or 'json'."),
    }
}

/// Parse `CAT=MIN..MAX`, `CAT=MIN..`, `CAT=..MAX`, or `CAT=N`.
pub(crate) fn parse_selection(raw: &str) -> Result<(usize, Interval), String> {
    let (category, range) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CAT=MIN..MAX, got '{raw}'"))?;
    let category: usize = category
        .trim()
        .parse()
        .map_err(|_| format!("invalid category index '{}'", category.trim()))?;

    let bound = |s: &str| -> Result<Option<u64>, String> {
        let s = s.trim();
        if s.is_empty() {
            Ok(None)
        } else {
            s.parse()
                .map(Some)
                .map_err(|_| format!("invalid bound '{s}'"))
        }
    };

    let interval = match range.split_once("..") {
        Some((lo, hi)) => Interval {
            min: bound(lo)?,
            max: bound(hi)?,
        },
        None => match bound(range)? {
            Some(n) => Interval::exactly(n),
            None => return Err(format!("missing range for category {category}")),
        },
    };
    Ok((category, interval))
}

/// Build the population from `--population` and `--partition`.
pub(crate) fn build_population(size: Option<u64>, partition: Vec<u64>) -> miette::Result<Population> {
    if partition.is_empty() && size.is_none() {
        miette::bail!("Provide --partition (and optionally --population).");
    }
    let population = match size {
        Some(size) => Population::new(size, partition),
        None => Population::from_counts(partition),
    }
    .into_diagnostic()?;
    tracing::debug!(%population, "population ready");
    Ok(population)
}

/// Full selector: one interval per category, unmentioned ones unconstrained.
pub(crate) fn selector_from_args(categories: usize, selections: &[(usize, Interval)]) -> IntervalSelector {
    let mut selector = IntervalSelector::unconstrained(categories);
    for &(category, interval) in selections {
        selector.insert(category, interval);
    }
    selector
}

pub(crate) fn population_summary(population: &Population, draw: u64) -> PopulationSummary {
    PopulationSummary {
        size: population.size(),
        partition: population.capacities().to_vec(),
        blank_category: population.blank_category(),
        draw,
    }
}

pub(crate) fn trial_summary(estimate: &MonteCarloEstimate) -> TrialSummary {
    TrialSummary {
        requested: estimate.requested_trials(),
        completed: estimate.completed_trials(),
        seed: estimate.seed(),
        truncated: estimate.truncated(),
    }
}

/// Outcomes by descending probability, ties in key order; `top == 0` keeps all.
pub(crate) fn outcome_rows(
    dist: &Distribution,
    frequencies: Option<&BTreeMap<Representative, u64>>,
    top: usize,
) -> Vec<OutcomeRow> {
    let mut rows: Vec<OutcomeRow> = dist
        .iter()
        .map(|(rep, p)| OutcomeRow {
            representative: rep.counts().to_vec(),
            probability: p,
            frequency: frequencies.and_then(|f| f.get(rep).copied()),
        })
        .collect();
    rows.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    if top > 0 {
        rows.truncate(top);
    }
    rows
}

/// Assemble the report for a normalized distribution.
pub(crate) fn build_report(
    method: Method,
    population: &Population,
    draw: u64,
    dist: &Distribution,
    estimate: Option<&MonteCarloEstimate>,
    query: &QueryArgs,
) -> miette::Result<DistributionReport> {
    let selection = if query.selections.is_empty() {
        None
    } else {
        let selector = selector_from_args(population.category_count(), &query.selections);
        let probability = aggregate(dist, &selector).into_diagnostic()?;
        let intervals = (0..population.category_count())
            .map(|i| selector.get(i).copied().unwrap_or_default().to_string())
            .collect();
        Some(SelectionSummary {
            intervals,
            probability,
        })
    };

    let requirements = if query.requirements.is_empty() {
        None
    } else {
        let set = RequirementSet::new(query.requirements.clone());
        let probability = set.probability(dist).into_diagnostic()?;
        Some(RequirementSummary {
            clauses: set.requirements().iter().map(ToString::to_string).collect(),
            probability,
        })
    };

    Ok(DistributionReport {
        method,
        population: population_summary(population, draw),
        trials: estimate.map(trial_summary),
        outcome_count: dist.len(),
        total_mass: dist.total_mass(),
        expected_counts: deckprob::hypergeometric::expected_counts(population, draw),
        most_likely: dist.mode().map(|(rep, p)| OutcomeRow {
            representative: rep.counts().to_vec(),
            probability: p,
            frequency: estimate.and_then(|e| e.frequencies().get(rep).copied()),
        }),
        outcomes: outcome_rows(dist, estimate.map(|e| e.frequencies()), query.top),
        selection,
        requirements,
    })
}

pub(crate) fn format_counts(counts: &[u64]) -> String {
    let parts: Vec<String> = counts.iter().map(u64::to_string).collect();
    format!("({})", parts.join(", "))
}

pub(crate) fn render_population_line(summary: &PopulationSummary) -> String {
    let mut out = format!(
        "Population {} split {} drawing {}",
        summary.size,
        format_counts(&summary.partition),
        summary.draw
    );
    if let Some(blank) = summary.blank_category {
        let _ = write!(out, " (category {blank} is blank)");
    }
    out
}

pub(crate) fn render_distribution_text(report: &DistributionReport) -> String {
    let mut out = String::new();
    let method = match report.method {
        Method::Exact => "exact",
        Method::MonteCarlo => "monte carlo",
    };
    let _ = writeln!(out, "Distribution ({method}):");
    let _ = writeln!(out, "  {}", render_population_line(&report.population));
    if let Some(trials) = &report.trials {
        let _ = writeln!(
            out,
            "  Trials: {} of {} (seed {}){}",
            trials.completed,
            trials.requested,
            trials.seed,
            if trials.truncated { " [truncated]" } else { "" }
        );
    }
    let expected: Vec<String> = report
        .expected_counts
        .iter()
        .map(|e| format!("{e:.3}"))
        .collect();
    let _ = writeln!(out, "  Expected counts: ({})", expected.join(", "));
    if let Some(mode) = &report.most_likely {
        let _ = writeln!(
            out,
            "  Most likely: {} with {:.6}",
            format_counts(&mode.representative),
            mode.probability
        );
    }
    let _ = writeln!(
        out,
        "  Outcomes: {} (total mass {:.6})",
        report.outcome_count, report.total_mass
    );
    for row in &report.outcomes {
        let _ = write!(
            out,
            "    {:<20} {:.6}",
            format_counts(&row.representative),
            row.probability
        );
        if let Some(n) = row.frequency {
            let _ = write!(out, "  ({n})");
        }
        out.push('\n');
    }
    if let Some(sel) = &report.selection {
        let _ = writeln!(
            out,
            "  P[counts in ({})] = {:.6}",
            sel.intervals.join(", "),
            sel.probability
        );
    }
    if let Some(req) = &report.requirements {
        let _ = writeln!(
            out,
            "  P[{}] = {:.6}",
            req.clauses.join(" and "),
            req.probability
        );
    }
    out
}

/// Write `report` to stdout as JSON, or the rendered text.
pub(crate) fn emit<T: Serialize>(
    format: OutputFormat,
    report: &T,
    text: impl FnOnce(&T) -> String,
) -> miette::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report).into_diagnostic()?);
        }
        OutputFormat::Text => print!("{}", text(report)),
    }
    Ok(())
}

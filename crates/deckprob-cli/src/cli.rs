//! CLI argument definitions: top-level `Cli` struct and `Commands` enum.

use clap::{Args, Parser, Subcommand};

use deckprob::{Interval, Requirement};

use crate::commands::helpers::parse_selection;

pub(crate) const CLI_LONG_ABOUT: &str =
    "Distribution of per-category counts when drawing cards without replacement.\n\n\
    Examples:\n  \
    deckprob --population 60 --partition 40,10 --draw 7 exact\n  \
    deckprob --partition 3,2 --draw 2 exact --select 0=1..2\n  \
    deckprob --partition 20,20,10,10 --draw 7 simulate --trials 100000 --require 0>=2\n  \
    deckprob --partition 40,10,10 --draw 7 compare --trials 50000 --seed 7\n\n\
    When --population exceeds the partition sum, the difference becomes a blank\n\
    category appended after the listed ones.";

#[derive(Parser)]
#[command(name = "deckprob")]
#[command(about = "Exact and Monte Carlo category-count distributions for draws without replacement")]
#[command(long_about = CLI_LONG_ABOUT)]
#[command(version)]
pub(crate) struct Cli {
    /// Declared population size (defaults to the partition sum)
    #[arg(long, global = true)]
    pub(crate) population: Option<u64>,

    /// Comma-separated category sizes, e.g. 40,10,10
    #[arg(long, global = true, value_delimiter = ',')]
    pub(crate) partition: Vec<u64>,

    /// Number of cards drawn
    #[arg(long, global = true, default_value_t = 0)]
    pub(crate) draw: u64,

    /// Output format: text | json
    #[arg(long, global = true, default_value = "text")]
    pub(crate) format: String,

    #[command(subcommand)]
    pub(crate) command: Commands,
}

/// Query options shared by `exact` and `simulate`.
#[derive(Args, Clone, Default)]
pub(crate) struct QueryArgs {
    /// Inclusive count range for a category: CAT=MIN..MAX, CAT=MIN.., CAT=..MAX or CAT=N.
    /// Categories not mentioned are unconstrained.
    #[arg(long = "select", value_parser = parse_selection)]
    pub(crate) selections: Vec<(usize, Interval)>,

    /// Success condition on a category: CAT>=N, CAT<=N, CAT=N, CAT>N or CAT<N.
    /// All conditions must hold.
    #[arg(long = "require")]
    pub(crate) requirements: Vec<Requirement>,

    /// Only list the K most likely outcomes (0 lists all)
    #[arg(long, default_value_t = 0)]
    pub(crate) top: usize,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Exact multivariate hypergeometric distribution
    #[command(display_order = 10)]
    Exact {
        #[command(flatten)]
        query: QueryArgs,
    },

    /// Monte Carlo estimate from repeated shuffled draws
    #[command(display_order = 20)]
    Simulate {
        /// Number of trials
        #[arg(long, default_value_t = 10_000)]
        trials: u64,

        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Trials per parallel work unit
        #[arg(long, default_value_t = 4096)]
        chunk_size: u64,

        /// Stop starting new work after this many seconds (0 disables)
        #[arg(long, default_value_t = 0)]
        timeout_secs: u64,

        #[command(flatten)]
        query: QueryArgs,
    },

    /// Cross-check the Monte Carlo estimate against the exact distribution
    #[command(display_order = 30)]
    Compare {
        /// Number of trials
        #[arg(long, default_value_t = 10_000)]
        trials: u64,

        /// RNG seed for a reproducible run
        #[arg(long)]
        seed: Option<u64>,

        /// Only list the K outcomes with the largest disagreement (0 lists all)
        #[arg(long, default_value_t = 0)]
        top: usize,
    },
}

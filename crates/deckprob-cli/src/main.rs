mod cli;
mod commands;
mod types;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::helpers::{build_population, parse_output_format};
use crate::commands::simulate::monte_carlo_config;

fn main() -> miette::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = parse_output_format(&cli.format)?;
    let population = build_population(cli.population, cli.partition)?;
    let draw = cli.draw;

    match cli.command {
        Commands::Exact { query } => {
            commands::exact::run_exact_command(&population, draw, &query, format)?;
        }
        Commands::Simulate {
            trials,
            seed,
            chunk_size,
            timeout_secs,
            query,
        } => {
            let config = monte_carlo_config(trials, seed, chunk_size, timeout_secs);
            commands::simulate::run_simulate_command(&population, draw, &config, &query, format)?;
        }
        Commands::Compare { trials, seed, top } => {
            let chunk_size = deckprob::MonteCarloConfig::default().chunk_size;
            let config = monte_carlo_config(trials, seed, chunk_size, 0);
            commands::compare::run_compare_command(&population, draw, &config, top, format)?;
        }
    }
    Ok(())
}

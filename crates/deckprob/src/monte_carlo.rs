//! Monte Carlo estimation by repeated shuffled draws.
//!
//! Trials are independent, so they run in chunks on the rayon pool. Each
//! chunk owns a ChaCha8 stream derived from the base seed and its chunk
//! index, which keeps a seeded run reproducible however the chunks are
//! scheduled.

use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use thiserror::Error;

use crate::distribution::{Distribution, Representative};
use crate::partition::Population;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonteCarloError {
    #[error("Trial count must be positive")]
    ZeroTrials,
    #[error("Chunk size must be positive")]
    ZeroChunkSize,
    #[error("Sample size {sample} exceeds population size {population}")]
    SampleExceedsPopulation { sample: u64, population: u64 },
    #[error("Population of {population} items is too large to simulate on this machine")]
    PopulationTooLarge { population: u64 },
}

/// Settings for one simulation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonteCarloConfig {
    /// Number of trials to run.
    pub trials: u64,
    /// Base seed; a fresh one is drawn from the thread RNG when absent.
    pub seed: Option<u64>,
    /// Trials per parallel work unit.
    pub chunk_size: u64,
    /// Wall-clock budget measured from the start of the run. Chunks that
    /// have not started when it runs out are skipped.
    pub deadline: Option<Duration>,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            trials: 10_000,
            seed: None,
            chunk_size: 4096,
            deadline: None,
        }
    }
}

impl MonteCarloConfig {
    pub fn new(trials: u64) -> Self {
        Self {
            trials,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Tallied outcome of a simulation run.
#[derive(Debug, Clone, PartialEq)]
pub struct MonteCarloEstimate {
    categories: usize,
    frequencies: BTreeMap<Representative, u64>,
    requested_trials: u64,
    completed_trials: u64,
    seed: u64,
}

impl MonteCarloEstimate {
    /// Occurrence count of each observed representative.
    pub fn frequencies(&self) -> &BTreeMap<Representative, u64> {
        &self.frequencies
    }

    pub fn requested_trials(&self) -> u64 {
        self.requested_trials
    }

    pub fn completed_trials(&self) -> u64 {
        self.completed_trials
    }

    /// Whether a deadline cut the run short.
    pub fn truncated(&self) -> bool {
        self.completed_trials < self.requested_trials
    }

    /// Seed the run used, for replaying it.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Raw frequencies; values sum to the completed trial count.
    pub fn raw(&self) -> Distribution {
        let values = self
            .frequencies
            .iter()
            .map(|(r, &n)| (r.clone(), n as f64))
            .collect();
        Distribution::from_map(self.categories, values)
    }

    /// Frequencies divided by the completed trial count.
    ///
    /// Directly comparable to the exact distribution. Empty when no trial
    /// completed.
    pub fn normalized(&self) -> Distribution {
        if self.completed_trials == 0 {
            return Distribution::from_map(self.categories, BTreeMap::new());
        }
        let total = self.completed_trials as f64;
        let values = self
            .frequencies
            .iter()
            .map(|(r, &n)| (r.clone(), n as f64 / total))
            .collect();
        Distribution::from_map(self.categories, values)
    }
}

/// Estimate the representative distribution by simulation.
///
/// # Parameters
/// - `population`: The partitioned population.
/// - `sample_size`: Cards drawn per trial, without replacement.
/// - `config`: Trial count, seed, chunking and optional deadline.
///
/// # Returns
/// The tallied estimate, or an error for a zero trial count, a zero chunk
/// size, a sample larger than the population, or a population whose deck
/// cannot be allocated.
pub fn simulate(
    population: &Population,
    sample_size: u64,
    config: &MonteCarloConfig,
) -> Result<MonteCarloEstimate, MonteCarloError> {
    if config.trials == 0 {
        return Err(MonteCarloError::ZeroTrials);
    }
    if config.chunk_size == 0 {
        return Err(MonteCarloError::ZeroChunkSize);
    }
    if sample_size > population.size() {
        return Err(MonteCarloError::SampleExceedsPopulation {
            sample: sample_size,
            population: population.size(),
        });
    }

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let categories = population.category_count();
    let too_large = || MonteCarloError::PopulationTooLarge {
        population: population.size(),
    };
    let template = population.deck().ok_or_else(too_large)?;
    // sample_size <= size, which fit in the deck.
    let draw = usize::try_from(sample_size).map_err(|_| too_large())?;
    let chunk_size = config.chunk_size;
    let trials = config.trials;
    let chunks = trials.div_ceil(chunk_size);
    let started = Instant::now();

    let (table, completed) = (0..chunks)
        .into_par_iter()
        .map(|chunk| {
            if let Some(limit) = config.deadline {
                if started.elapsed() >= limit {
                    return (HashMap::new(), 0);
                }
            }
            let count = chunk_size.min(trials - chunk * chunk_size);
            let table = run_chunk(&template, categories, draw, seed, chunk, count);
            (table, count)
        })
        .reduce(|| (HashMap::new(), 0), merge_tables);

    let frequencies: BTreeMap<Representative, u64> = table.into_iter().collect();
    tracing::info!(
        trials,
        completed,
        seed,
        outcomes = frequencies.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "monte carlo run finished"
    );
    if completed < trials {
        tracing::warn!(
            requested = trials,
            completed,
            "deadline reached before all trials ran"
        );
    }

    Ok(MonteCarloEstimate {
        categories,
        frequencies,
        requested_trials: trials,
        completed_trials: completed,
        seed,
    })
}

type Table = HashMap<Representative, u64>;

fn run_chunk(
    template: &[usize],
    categories: usize,
    sample_size: usize,
    seed: u64,
    chunk: u64,
    count: u64,
) -> Table {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(chunk);

    let mut deck = template.to_vec();
    let mut table = Table::new();
    for _ in 0..count {
        // Fresh deck every trial.
        deck.copy_from_slice(template);
        let (drawn, _) = deck.partial_shuffle(&mut rng, sample_size);
        let mut counts = vec![0u64; categories];
        for &card in drawn.iter() {
            counts[card] += 1;
        }
        *table.entry(Representative::new(counts)).or_insert(0) += 1;
    }
    table
}

fn merge_tables((mut a, na): (Table, u64), (b, nb): (Table, u64)) -> (Table, u64) {
    if a.len() < b.len() {
        return merge_tables((b, nb), (a, na));
    }
    for (rep, n) in b {
        *a.entry(rep).or_insert(0) += n;
    }
    (a, na + nb)
}

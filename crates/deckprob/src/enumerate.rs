//! Constrained-composition enumeration.
//!
//! A representative assigns a draw count `x_i <= c_i` to every category so
//! that the counts sum to the sample size. Enumeration is a depth-first walk,
//! one category per level, trying candidates in ascending order.

use crate::distribution::{Representative, RepresentativeSet};

/// Enumerate every representative for `capacities` and `sample_size`.
///
/// # Parameters
/// - `capacities`: Per-category capacities `c_0..c_{n-1}`.
/// - `sample_size`: Number of items drawn.
///
/// # Returns
/// The exhaustive, duplicate-free set in ascending lexicographic order. Empty
/// when `sample_size` exceeds the sum of the capacities.
pub fn representatives(capacities: &[u64], sample_size: u64) -> RepresentativeSet {
    let mut out = Vec::new();
    let total: u128 = capacities.iter().map(|&c| u128::from(c)).sum();
    if u128::from(sample_size) <= total && !capacities.is_empty() {
        let mut prefix = Vec::with_capacity(capacities.len());
        descend(capacities, 0, sample_size, &mut prefix, &mut out);
    }
    tracing::debug!(
        categories = capacities.len(),
        sample_size,
        representatives = out.len(),
        "enumerated representatives"
    );
    RepresentativeSet::new(sample_size, out)
}

fn descend(
    capacities: &[u64],
    index: usize,
    remaining: u64,
    prefix: &mut Vec<u64>,
    out: &mut Vec<Representative>,
) {
    if index == capacities.len() {
        if remaining == 0 {
            out.push(Representative::new(prefix.clone()));
        }
        return;
    }

    // Candidates above `remaining` would overdraw; the loop bound is the cutoff.
    let upper = capacities[index].min(remaining);
    for x in 0..=upper {
        prefix.push(x);
        if x == remaining {
            // Nothing left to allocate: the tail is all zeros.
            let mut counts = prefix.clone();
            counts.resize(capacities.len(), 0);
            out.push(Representative::new(counts));
            prefix.pop();
            return;
        }
        descend(capacities, index + 1, remaining - x, prefix, out);
        prefix.pop();
    }
}

/// Number of representatives, counted without materializing them.
///
/// Dynamic programme over categories: `ways[s]` is the number of prefixes
/// summing to `s`. Zero when `sample_size` exceeds the sum of the
/// capacities, matching [`representatives`].
pub fn count_representatives(capacities: &[u64], sample_size: u64) -> u128 {
    let total: u128 = capacities.iter().map(|&c| u128::from(c)).sum();
    if capacities.is_empty() || u128::from(sample_size) > total {
        return 0;
    }
    let Ok(s) = usize::try_from(sample_size) else {
        return 0;
    };
    let mut ways = vec![0u128; s + 1];
    ways[0] = 1;
    for &c in capacities {
        let mut next = vec![0u128; s + 1];
        for (total, slot) in next.iter_mut().enumerate() {
            let lo = total.saturating_sub(c.min(total as u64) as usize);
            *slot = ways[lo..=total].iter().sum();
        }
        ways = next;
    }
    ways[s]
}

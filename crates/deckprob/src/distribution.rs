//! Value types shared by the exact and Monte Carlo paths.

use std::collections::BTreeMap;

/// Per-category draw counts for one outcome class of a sample.
///
/// Two representatives with equal counts compare and hash equal, so they can
/// key a [`Distribution`] directly.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Representative(Vec<u64>);

impl Representative {
    pub fn new(counts: Vec<u64>) -> Self {
        Self(counts)
    }

    pub fn counts(&self) -> &[u64] {
        &self.0
    }

    /// Count drawn from `category`, or `None` when out of range.
    pub fn get(&self, category: usize) -> Option<u64> {
        self.0.get(category).copied()
    }

    pub fn category_count(&self) -> usize {
        self.0.len()
    }

    /// Total number of items drawn.
    pub fn sample_size(&self) -> u64 {
        self.0.iter().sum()
    }

    /// Whether every count fits inside the matching capacity.
    pub fn fits(&self, capacities: &[u64]) -> bool {
        self.0.len() == capacities.len() && self.0.iter().zip(capacities).all(|(x, c)| x <= c)
    }
}

impl From<Vec<u64>> for Representative {
    fn from(counts: Vec<u64>) -> Self {
        Self(counts)
    }
}

impl<const N: usize> From<[u64; N]> for Representative {
    fn from(counts: [u64; N]) -> Self {
        Self(counts.to_vec())
    }
}

impl std::fmt::Display for Representative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for (i, x) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{x}")?;
        }
        f.write_str(")")
    }
}

/// All representatives for one `(capacities, sample_size)` pair, in
/// ascending lexicographic order without duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepresentativeSet {
    sample_size: u64,
    members: Vec<Representative>,
}

impl RepresentativeSet {
    pub(crate) fn new(sample_size: u64, members: Vec<Representative>) -> Self {
        Self {
            sample_size,
            members,
        }
    }

    pub fn sample_size(&self) -> u64 {
        self.sample_size
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Representative> {
        self.members.iter()
    }

    pub fn contains(&self, rep: &Representative) -> bool {
        self.members.binary_search(rep).is_ok()
    }

    pub fn into_vec(self) -> Vec<Representative> {
        self.members
    }
}

impl<'a> IntoIterator for &'a RepresentativeSet {
    type Item = &'a Representative;
    type IntoIter = std::slice::Iter<'a, Representative>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

/// Mapping from representative to a non-negative value: an exact
/// probability, a raw frequency, or a normalized frequency.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    categories: usize,
    values: BTreeMap<Representative, f64>,
}

impl Distribution {
    /// Build a distribution over `categories` categories.
    ///
    /// Keys must all have `categories` entries; callers in this crate
    /// guarantee it.
    pub(crate) fn from_map(categories: usize, values: BTreeMap<Representative, f64>) -> Self {
        debug_assert!(values.keys().all(|r| r.category_count() == categories));
        Self { categories, values }
    }

    pub fn category_count(&self) -> usize {
        self.categories
    }

    pub fn get(&self, rep: &Representative) -> Option<f64> {
        self.values.get(rep).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Representative, f64)> + '_ {
        self.values.iter().map(|(r, &v)| (r, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Representative> + '_ {
        self.values.keys()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Sum of every value.
    pub fn total_mass(&self) -> f64 {
        self.values.values().fold(0.0, |acc, v| acc + v)
    }

    /// Largest count observed per category across all keys.
    ///
    /// Zero for every category when the distribution is empty.
    pub fn max_counts(&self) -> Vec<u64> {
        let mut maxima = vec![0; self.categories];
        for rep in self.values.keys() {
            for (m, &x) in maxima.iter_mut().zip(rep.counts()) {
                *m = (*m).max(x);
            }
        }
        maxima
    }

    /// Representative carrying the most mass; ties go to the smallest key.
    pub fn mode(&self) -> Option<(&Representative, f64)> {
        let mut best: Option<(&Representative, f64)> = None;
        for (rep, v) in self.iter() {
            match best {
                Some((_, bv)) if bv >= v => {}
                _ => best = Some((rep, v)),
            }
        }
        best
    }

    /// Total variation distance `0.5 * sum |p - q|` over the union of keys.
    pub fn total_variation_distance(&self, other: &Distribution) -> f64 {
        let mut sum = 0.0;
        for (rep, p) in self.iter() {
            sum += (p - other.get(rep).unwrap_or(0.0)).abs();
        }
        for (rep, q) in other.iter() {
            if !self.values.contains_key(rep) {
                sum += q.abs();
            }
        }
        0.5 * sum
    }
}

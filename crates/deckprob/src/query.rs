//! Range queries over a [`Distribution`].
//!
//! A query fixes an inclusive interval per category. Keys are narrowed one
//! category at a time and the surviving values are summed.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::distribution::{Distribution, Representative};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Selector covers {got} categories, distribution has {expected}")]
    CardinalityMismatch { expected: usize, got: usize },
    #[error("Category {category} is out of bounds for {categories} categories")]
    CategoryOutOfBounds { category: usize, categories: usize },
    #[error("Empty interval for category {category}: min {min} exceeds max {max}")]
    EmptyInterval { category: usize, min: u64, max: u64 },
}

/// Inclusive bounds on one category's count. A missing bound is unconstrained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Interval {
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl Interval {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn between(min: u64, max: u64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    pub fn at_least(min: u64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn at_most(max: u64) -> Self {
        Self {
            min: None,
            max: Some(max),
        }
    }

    pub fn exactly(value: u64) -> Self {
        Self::between(value, value)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Bounds with defaults filled in: `0` below, `observed_max` above.
    fn resolve(&self, observed_max: u64) -> (u64, u64) {
        (self.min.unwrap_or(0), self.max.unwrap_or(observed_max))
    }
}

impl std::fmt::Display for Interval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.min, self.max) {
            (Some(a), Some(b)) if a == b => write!(f, "{a}"),
            (Some(a), Some(b)) => write!(f, "{a}..{b}"),
            (Some(a), None) => write!(f, "{a}.."),
            (None, Some(b)) => write!(f, "..{b}"),
            (None, None) => f.write_str(".."),
        }
    }
}

/// One interval per category index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntervalSelector {
    intervals: BTreeMap<usize, Interval>,
}

impl IntervalSelector {
    /// Empty selector; every category must still be [`set`](Self::set)
    /// before querying.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selector with an unbounded interval for each of `categories`.
    pub fn unconstrained(categories: usize) -> Self {
        Self {
            intervals: (0..categories).map(|i| (i, Interval::unbounded())).collect(),
        }
    }

    /// Set (or replace) the interval for `category`.
    pub fn set(mut self, category: usize, interval: Interval) -> Self {
        self.intervals.insert(category, interval);
        self
    }

    pub fn insert(&mut self, category: usize, interval: Interval) -> Option<Interval> {
        self.intervals.insert(category, interval)
    }

    pub fn get(&self, category: usize) -> Option<&Interval> {
        self.intervals.get(&category)
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    fn validate(&self, categories: usize) -> Result<(), QueryError> {
        if let Some((&category, _)) = self.intervals.range(categories..).next() {
            return Err(QueryError::CategoryOutOfBounds {
                category,
                categories,
            });
        }
        if self.intervals.len() != categories {
            return Err(QueryError::CardinalityMismatch {
                expected: categories,
                got: self.intervals.len(),
            });
        }
        for (&category, interval) in &self.intervals {
            if let (Some(min), Some(max)) = (interval.min, interval.max) {
                if min > max {
                    return Err(QueryError::EmptyInterval { category, min, max });
                }
            }
        }
        Ok(())
    }
}

/// Representatives whose counts fall inside every interval of `selector`.
///
/// # Parameters
/// - `dist`: Distribution whose keys are filtered.
/// - `selector`: Exactly one interval per category of `dist`.
///
/// # Returns
/// Surviving keys in ascending order, or a [`QueryError`] when the selector
/// is malformed.
pub fn select<'a>(
    dist: &'a Distribution,
    selector: &IntervalSelector,
) -> Result<Vec<&'a Representative>, QueryError> {
    let categories = dist.category_count();
    selector.validate(categories)?;

    let maxima = dist.max_counts();
    let mut surviving: Vec<&Representative> = dist.keys().collect();
    for (&category, interval) in &selector.intervals {
        if interval.is_unbounded() {
            continue;
        }
        let (lo, hi) = interval.resolve(maxima[category]);
        surviving.retain(|rep| (lo..=hi).contains(&rep.counts()[category]));
    }
    Ok(surviving)
}

/// Total mass of the representatives chosen by [`select`].
///
/// Only an explicit `min > max` is an [`QueryError::EmptyInterval`]. Missing
/// bounds are filled in from the observed range and never count as inverted,
/// so `at_least(5)` over counts that peak at 2 selects nothing and yields
/// `0.0`.
pub fn aggregate(dist: &Distribution, selector: &IntervalSelector) -> Result<f64, QueryError> {
    let surviving = select(dist, selector)?;
    Ok(surviving
        .into_iter()
        .map(|rep| dist.get(rep).unwrap_or(0.0))
        .fold(0.0, |acc, p| acc + p))
}

//! Per-category success predicates such as "at least two of category 0".
//!
//! The comparison is always chosen by the caller.

use std::str::FromStr;

use thiserror::Error;

use crate::distribution::{Distribution, Representative};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequirementError {
    #[error("Requirement on category {category} is out of bounds for {categories} categories")]
    CategoryOutOfBounds { category: usize, categories: usize },
    #[error("Unknown comparison '{0}', expected one of >=, <=, =, >, <")]
    UnknownComparison(String),
    #[error("Malformed requirement '{0}', expected CATEGORY<op>COUNT such as 0>=2")]
    Malformed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    AtLeast,
    AtMost,
    Exactly,
    MoreThan,
    FewerThan,
}

impl Comparison {
    pub fn holds(self, observed: u64, threshold: u64) -> bool {
        match self {
            Comparison::AtLeast => observed >= threshold,
            Comparison::AtMost => observed <= threshold,
            Comparison::Exactly => observed == threshold,
            Comparison::MoreThan => observed > threshold,
            Comparison::FewerThan => observed < threshold,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::AtLeast => ">=",
            Comparison::AtMost => "<=",
            Comparison::Exactly => "=",
            Comparison::MoreThan => ">",
            Comparison::FewerThan => "<",
        }
    }
}

impl FromStr for Comparison {
    type Err = RequirementError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ">=" => Ok(Comparison::AtLeast),
            "<=" => Ok(Comparison::AtMost),
            "=" | "==" => Ok(Comparison::Exactly),
            ">" => Ok(Comparison::MoreThan),
            "<" => Ok(Comparison::FewerThan),
            other => Err(RequirementError::UnknownComparison(other.to_string())),
        }
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `count(category) <comparison> threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Requirement {
    pub category: usize,
    pub comparison: Comparison,
    pub threshold: u64,
}

impl Requirement {
    pub fn new(category: usize, comparison: Comparison, threshold: u64) -> Self {
        Self {
            category,
            comparison,
            threshold,
        }
    }

    /// Whether `rep` passes. A category missing from `rep` counts as zero.
    pub fn is_met(&self, rep: &Representative) -> bool {
        let observed = rep.get(self.category).unwrap_or(0);
        self.comparison.holds(observed, self.threshold)
    }
}

impl FromStr for Requirement {
    type Err = RequirementError;

    /// Parses `CATEGORY<op>COUNT`, e.g. `0>=2` or `1<3`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let op_start = s
            .find(|c: char| matches!(c, '<' | '>' | '='))
            .ok_or_else(|| RequirementError::Malformed(s.to_string()))?;
        let op_len = s[op_start..]
            .chars()
            .take_while(|c| matches!(c, '<' | '>' | '='))
            .count();
        let (category, rest) = s.split_at(op_start);
        let (op, threshold) = rest.split_at(op_len);

        let category = category
            .trim()
            .parse()
            .map_err(|_| RequirementError::Malformed(s.to_string()))?;
        let threshold = threshold
            .trim()
            .parse()
            .map_err(|_| RequirementError::Malformed(s.to_string()))?;
        Ok(Self::new(category, op.parse()?, threshold))
    }
}

impl std::fmt::Display for Requirement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.category, self.comparison, self.threshold)
    }
}

/// Conjunction of requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementSet {
    requirements: Vec<Requirement>,
}

impl RequirementSet {
    pub fn new(requirements: Vec<Requirement>) -> Self {
        Self { requirements }
    }

    pub fn push(&mut self, requirement: Requirement) {
        self.requirements.push(requirement);
    }

    pub fn requirements(&self) -> &[Requirement] {
        &self.requirements
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Fail if any requirement names a category outside `0..categories`.
    pub fn check_categories(&self, categories: usize) -> Result<(), RequirementError> {
        match self.requirements.iter().find(|r| r.category >= categories) {
            Some(r) => Err(RequirementError::CategoryOutOfBounds {
                category: r.category,
                categories,
            }),
            None => Ok(()),
        }
    }

    pub fn is_met(&self, rep: &Representative) -> bool {
        self.requirements.iter().all(|r| r.is_met(rep))
    }

    /// Mass of the representatives in `dist` meeting every requirement.
    pub fn probability(&self, dist: &Distribution) -> Result<f64, RequirementError> {
        self.check_categories(dist.category_count())?;
        Ok(dist
            .iter()
            .filter(|(rep, _)| self.is_met(rep))
            .map(|(_, p)| p)
            .fold(0.0, |acc, p| acc + p))
    }
}

use thiserror::Error;

use crate::distribution::RepresentativeSet;
use crate::enumerate;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PartitionError {
    #[error("Partition exceeds declared population size: categories sum to {sum}, population is {declared}")]
    Overflow { declared: u64, sum: u128 },
    #[error("Population size must be positive")]
    EmptyPopulation,
}

/// Ordered category capacities whose sum is the population size.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Partition {
    capacities: Vec<u64>,
}

impl Partition {
    /// Capacity of each category, in category order.
    pub fn capacities(&self) -> &[u64] {
        &self.capacities
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.capacities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.capacities.is_empty()
    }

    /// Capacity of category `index`, if it exists.
    pub fn capacity(&self, index: usize) -> Option<u64> {
        self.capacities.get(index).copied()
    }

    /// Sum of all capacities.
    pub fn total(&self) -> u64 {
        // Checked at construction time.
        self.capacities.iter().sum()
    }
}

/// A finite population split into ordered categories.
///
/// Built once from validated input and never mutated. When the supplied
/// counts fall short of the declared size, the deficit is kept as an extra
/// blank category appended after the supplied ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Population {
    size: u64,
    partition: Partition,
    blank_category: Option<usize>,
}

impl Population {
    /// Construct a population of `size` items from per-category `counts`.
    ///
    /// # Parameters
    /// - `size`: Declared population size, must be positive.
    /// - `counts`: Capacities of the labeled categories.
    ///
    /// # Returns
    /// The population, or [`PartitionError::Overflow`] when the counts sum to
    /// more than `size`.
    pub fn new(size: u64, counts: Vec<u64>) -> Result<Self, PartitionError> {
        if size == 0 {
            return Err(PartitionError::EmptyPopulation);
        }
        let sum: u128 = counts.iter().map(|&c| u128::from(c)).sum();
        if sum > u128::from(size) {
            return Err(PartitionError::Overflow {
                declared: size,
                sum,
            });
        }

        let mut capacities = counts;
        let mut blank_category = None;
        // sum <= size, so the narrowing is lossless.
        let deficit = size - sum as u64;
        if deficit > 0 {
            tracing::debug!(deficit, "appending blank category");
            blank_category = Some(capacities.len());
            capacities.push(deficit);
        }

        Ok(Self {
            size,
            partition: Partition { capacities },
            blank_category,
        })
    }

    /// Construct a population whose size is exactly the sum of `counts`.
    pub fn from_counts(counts: Vec<u64>) -> Result<Self, PartitionError> {
        let sum: u128 = counts.iter().map(|&c| u128::from(c)).sum();
        let size = u64::try_from(sum).map_err(|_| PartitionError::Overflow {
            declared: u64::MAX,
            sum,
        })?;
        Self::new(size, counts)
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn partition(&self) -> &Partition {
        &self.partition
    }

    pub fn capacities(&self) -> &[u64] {
        self.partition.capacities()
    }

    pub fn category_count(&self) -> usize {
        self.partition.len()
    }

    /// Index of the implicit blank category, if one was appended.
    pub fn blank_category(&self) -> Option<usize> {
        self.blank_category
    }

    /// Every representative for a draw of `sample_size` from this population.
    pub fn representatives(&self, sample_size: u64) -> RepresentativeSet {
        enumerate::representatives(self.capacities(), sample_size)
    }

    /// One card per unit of capacity, labeled with its category index.
    ///
    /// `None` when the population does not fit in memory on this target.
    pub(crate) fn deck(&self) -> Option<Vec<usize>> {
        let size = usize::try_from(self.size).ok()?;
        let mut cards = Vec::new();
        cards.try_reserve_exact(size).ok()?;
        for (category, &count) in self.capacities().iter().enumerate() {
            let count = usize::try_from(count).ok()?;
            cards.extend(std::iter::repeat(category).take(count));
        }
        Some(cards)
    }
}

impl std::fmt::Display for Population {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Population {} [", self.size)?;
        for (i, c) in self.capacities().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            if self.blank_category == Some(i) {
                write!(f, "blank: {c}")?;
            } else {
                write!(f, "{i}: {c}")?;
            }
        }
        f.write_str("]")
    }
}

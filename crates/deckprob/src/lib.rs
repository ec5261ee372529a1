//! Category-count distributions for draws without replacement.
//!
//! A [`Population`] is split into ordered categories. Drawing a sample of
//! fixed size yields a [`Representative`], the tuple of per-category counts.
//! The exact law over representatives is the multivariate hypergeometric
//! distribution ([`exact_distribution`]); [`simulate`] estimates the same law
//! by shuffling. Either result can be sliced with [`aggregate`] or scored
//! against a [`RequirementSet`].

pub mod distribution;
pub mod enumerate;
pub mod hypergeometric;
pub mod monte_carlo;
pub mod partition;
pub mod query;
pub mod requirement;

pub use distribution::{Distribution, Representative, RepresentativeSet};
pub use enumerate::representatives;
pub use hypergeometric::{binomial, exact_distribution, exact_rational, HypergeometricError};
pub use monte_carlo::{simulate, MonteCarloConfig, MonteCarloError, MonteCarloEstimate};
pub use partition::{Partition, PartitionError, Population};
pub use query::{aggregate, select, Interval, IntervalSelector, QueryError};
pub use requirement::{Comparison, Requirement, RequirementError, RequirementSet};

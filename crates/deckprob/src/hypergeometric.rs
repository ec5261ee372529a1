use std::collections::BTreeMap;

use num::bigint::BigInt;
use num::rational::BigRational;
use num::traits::{One, ToPrimitive, Zero};
use thiserror::Error;

use crate::distribution::{Distribution, Representative};
use crate::partition::Population;

#[derive(Debug, Error)]
pub enum HypergeometricError {
    #[error("Sample size {sample} exceeds population size {population}")]
    SampleExceedsPopulation { sample: u64, population: u64 },
    #[error("Representative has {got} categories, population has {expected}")]
    CategoryMismatch { expected: usize, got: usize },
    #[error("Rational too large for f64 conversion ({digits} digits)")]
    PrecisionOverflow { digits: usize },
}

/// Exact binomial coefficient C(n, k) using BigInt.
///
/// # Parameters
/// - `n`: Population count.
/// - `k`: Selection count.
///
/// # Returns
/// Exact integer value of `C(n, k)`, zero when `k > n`.
pub fn binomial(n: u64, k: u64) -> BigInt {
    if k > n {
        return BigInt::zero();
    }
    // Use the smaller of k and n-k for efficiency
    let k = std::cmp::min(k, n - k);
    if k == 0 {
        return BigInt::one();
    }
    let mut result = BigInt::one();
    for i in 0..k {
        result *= BigInt::from(n - i);
        result /= BigInt::from(i + 1);
    }
    result
}

/// C(n, k) over signed arguments: zero when `k < 0`, `n < 0`, or `k > n`.
pub fn binomial_signed(n: i64, k: i64) -> BigInt {
    match (u64::try_from(n), u64::try_from(k)) {
        (Ok(n), Ok(k)) => binomial(n, k),
        _ => BigInt::zero(),
    }
}

/// `C(c, x)` for every `x` in `0..=min(c, sample_size)`, one row per category.
fn binomial_rows(capacities: &[u64], sample_size: u64) -> Vec<Vec<BigInt>> {
    capacities
        .iter()
        .map(|&c| (0..=c.min(sample_size)).map(|x| binomial(c, x)).collect())
        .collect()
}

fn check_sample(population: &Population, sample_size: u64) -> Result<(), HypergeometricError> {
    if sample_size > population.size() {
        return Err(HypergeometricError::SampleExceedsPopulation {
            sample: sample_size,
            population: population.size(),
        });
    }
    Ok(())
}

/// Exact PMF of one representative:
/// `prod C(c_i, x_i) / C(N, S)` where `S = sum x_i`.
///
/// # Parameters
/// - `population`: The partitioned population.
/// - `rep`: Query representative; its counts fix the sample size.
///
/// # Returns
/// Exact probability, zero when some `x_i > c_i`.
pub fn pmf(population: &Population, rep: &Representative) -> Result<BigRational, HypergeometricError> {
    let capacities = population.capacities();
    if rep.category_count() != capacities.len() {
        return Err(HypergeometricError::CategoryMismatch {
            expected: capacities.len(),
            got: rep.category_count(),
        });
    }
    let sample_size = rep.sample_size();
    check_sample(population, sample_size)?;

    let numerator = rep
        .counts()
        .iter()
        .zip(capacities)
        .fold(BigInt::one(), |acc, (&x, &c)| acc * binomial(c, x));
    if numerator.is_zero() {
        return Ok(BigRational::zero());
    }
    Ok(BigRational::new(numerator, binomial(population.size(), sample_size)))
}

/// Exact distribution over every representative of a `sample_size` draw.
///
/// The values sum to exactly one.
pub fn exact_rational(
    population: &Population,
    sample_size: u64,
) -> Result<BTreeMap<Representative, BigRational>, HypergeometricError> {
    check_sample(population, sample_size)?;

    let total = binomial(population.size(), sample_size);
    let rows = binomial_rows(population.capacities(), sample_size);
    let reps = population.representatives(sample_size);

    let mut out = BTreeMap::new();
    for rep in reps.into_vec() {
        let numerator = rep
            .counts()
            .iter()
            .zip(&rows)
            .fold(BigInt::one(), |acc, (&x, row)| acc * &row[x as usize]);
        out.insert(rep, BigRational::new(numerator, total.clone()));
    }
    Ok(out)
}

/// Floating-point view of [`exact_rational`].
///
/// # Returns
/// Distribution summing to one within floating-point tolerance, or
/// [`HypergeometricError::SampleExceedsPopulation`].
pub fn exact_distribution(
    population: &Population,
    sample_size: u64,
) -> Result<Distribution, HypergeometricError> {
    let exact = exact_rational(population, sample_size)?;
    let mut values = BTreeMap::new();
    for (rep, p) in exact {
        values.insert(rep, rational_to_f64(&p)?);
    }
    Ok(Distribution::from_map(population.category_count(), values))
}

/// Expected draw count per category, `S * c_i / N`.
pub fn expected_counts(population: &Population, sample_size: u64) -> Vec<f64> {
    let n = population.size() as f64;
    population
        .capacities()
        .iter()
        .map(|&c| (sample_size as f64) * (c as f64) / n)
        .collect()
}

/// Convert a BigRational to f64, returning an error if it does not fit.
pub(crate) fn rational_to_f64(r: &BigRational) -> Result<f64, HypergeometricError> {
    if r.is_zero() {
        return Ok(0.0);
    }
    match r.to_f64() {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(HypergeometricError::PrecisionOverflow {
            digits: r.numer().to_string().len().max(r.denom().to_string().len()),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_binomial_basic() {
        assert_eq!(binomial(0, 0), BigInt::one());
        assert_eq!(binomial(5, 0), BigInt::one());
        assert_eq!(binomial(5, 5), BigInt::one());
        assert_eq!(binomial(5, 2), BigInt::from(10));
        assert_eq!(binomial(10, 3), BigInt::from(120));
        assert_eq!(binomial(3, 5), BigInt::zero()); // k > n
    }

    #[test]
    fn test_binomial_signed_out_of_range() {
        assert_eq!(binomial_signed(5, -1), BigInt::zero());
        assert_eq!(binomial_signed(-3, 2), BigInt::zero());
        assert_eq!(binomial_signed(5, 6), BigInt::zero());
        assert_eq!(binomial_signed(6, 3), BigInt::from(20));
    }

    #[test]
    fn test_binomial_large() {
        // C(100,50) = 100891344545564193334812497256
        let expected: BigInt = "100891344545564193334812497256".parse().unwrap();
        assert_eq!(binomial(100, 50), expected);
    }

    #[test]
    fn two_category_scenario_exact() {
        let pop = Population::new(5, vec![3, 2]).unwrap();
        let dist = exact_rational(&pop, 2).unwrap();
        assert_eq!(dist.len(), 3);
        assert_eq!(dist[&Representative::from([0, 2])], ratio(1, 10));
        assert_eq!(dist[&Representative::from([1, 1])], ratio(6, 10));
        assert_eq!(dist[&Representative::from([2, 0])], ratio(3, 10));
    }

    #[test]
    fn two_category_scenario_f64() {
        let pop = Population::new(5, vec![3, 2]).unwrap();
        let dist = exact_distribution(&pop, 2).unwrap();
        assert!((dist.get(&Representative::from([0, 2])).unwrap() - 0.1).abs() < 1e-12);
        assert!((dist.get(&Representative::from([1, 1])).unwrap() - 0.6).abs() < 1e-12);
        assert!((dist.get(&Representative::from([2, 0])).unwrap() - 0.3).abs() < 1e-12);
        assert!((dist.total_mass() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_sample_is_certain() {
        let pop = Population::new(60, vec![40, 10]).unwrap();
        let dist = exact_distribution(&pop, 0).unwrap();
        assert_eq!(dist.len(), 1);
        assert_eq!(dist.get(&Representative::from([0, 0, 0])), Some(1.0));
    }

    #[test]
    fn oversized_sample_is_domain_error() {
        let pop = Population::new(5, vec![3, 2]).unwrap();
        match exact_distribution(&pop, 6) {
            Err(HypergeometricError::SampleExceedsPopulation { sample, population }) => {
                assert_eq!((sample, population), (6, 5));
            }
            other => panic!("expected SampleExceedsPopulation, got {other:?}"),
        }
    }

    #[test]
    fn sums_to_one_exactly() {
        let pop = Population::new(60, vec![20, 20, 10]).unwrap();
        let total = exact_rational(&pop, 7)
            .unwrap()
            .into_values()
            .fold(BigRational::zero(), |acc, p| acc + p);
        assert_eq!(total, BigRational::one(), "PMF should sum to 1");
    }

    #[test]
    fn pmf_single_representative() {
        let pop = Population::new(5, vec![3, 2]).unwrap();
        assert_eq!(pmf(&pop, &Representative::from([1, 1])).unwrap(), ratio(3, 5));
        // Overdraws a category: impossible, not an error.
        assert_eq!(pmf(&pop, &Representative::from([0, 3])).unwrap(), BigRational::zero());
        assert!(matches!(
            pmf(&pop, &Representative::from([1, 1, 0])),
            Err(HypergeometricError::CategoryMismatch { expected: 2, got: 3 })
        ));
        assert!(matches!(
            pmf(&pop, &Representative::from([3, 3])),
            Err(HypergeometricError::SampleExceedsPopulation { .. })
        ));
    }

    #[test]
    fn pmf_agrees_with_distribution() {
        let pop = Population::new(30, vec![10, 8, 5]).unwrap();
        let dist = exact_rational(&pop, 5).unwrap();
        for (rep, p) in &dist {
            assert_eq!(&pmf(&pop, rep).unwrap(), p, "rep {rep}");
        }
    }

    #[test]
    fn expected_counts_scale_with_capacity() {
        let pop = Population::new(60, vec![40, 10, 10]).unwrap();
        let ev = expected_counts(&pop, 6);
        assert_eq!(ev, vec![4.0, 1.0, 1.0]);
    }

    #[test]
    fn rational_to_f64_handles_huge_terms() {
        // Both terms exceed f64 range but the ratio does not.
        let big = binomial(10000, 5000);
        let r = BigRational::new(big.clone(), big * BigInt::from(4));
        assert_eq!(rational_to_f64(&r).unwrap(), 0.25);
    }

    #[test]
    fn rational_to_f64_overflow_returns_error() {
        let huge = BigRational::from_integer(binomial(10000, 5000));
        match rational_to_f64(&huge) {
            Err(HypergeometricError::PrecisionOverflow { digits }) => {
                assert!(digits > 300, "expected many digits, got {digits}");
            }
            other => panic!("expected PrecisionOverflow, got {other:?}"),
        }
    }

    // ---------------------------------------------------------------
    // Proptest: property-based / randomized tests
    // ---------------------------------------------------------------

    use proptest::prelude::*;
    use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence, RngAlgorithm};

    fn prob_proptest_config() -> ProptestConfig {
        ProptestConfig {
            cases: 64,
            source_file: Some(file!()),
            failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
                "proptest-regressions",
            ))),
            rng_algorithm: RngAlgorithm::ChaCha,
            ..ProptestConfig::default()
        }
    }

    /// Up to four categories of capacity <= 12 plus a valid sample size.
    fn population_strategy() -> impl Strategy<Value = (Vec<u64>, u64)> {
        prop::collection::vec(0u64..=12, 1..=4)
            .prop_filter("population must be positive", |caps| {
                caps.iter().sum::<u64>() > 0
            })
            .prop_flat_map(|caps| {
                let total: u64 = caps.iter().sum();
                (Just(caps), 0..=total)
            })
    }

    proptest! {
        #![proptest_config(prob_proptest_config())]

        /// Binomial coefficient symmetry: C(n, k) = C(n, n-k).
        #[test]
        fn binomial_symmetry(n in 0u64..200, k in 0u64..200) {
            prop_assume!(k <= n);
            prop_assert_eq!(binomial(n, k), binomial(n, n - k));
        }

        /// Binomial coefficient Pascal's rule: C(n, k) = C(n-1, k-1) + C(n-1, k).
        #[test]
        fn binomial_pascals_rule(n in 1u64..200, k in 1u64..200) {
            prop_assume!(k <= n);
            let lhs = binomial(n, k);
            let rhs = binomial(n - 1, k - 1) + binomial(n - 1, k);
            prop_assert_eq!(lhs, rhs);
        }

        /// C(n, 0) = 1 and C(n, k) = 0 for k > n.
        #[test]
        fn binomial_edges(n in 0u64..500, extra in 1u64..50) {
            prop_assert_eq!(binomial(n, 0), BigInt::one());
            prop_assert_eq!(binomial(n, n + extra), BigInt::zero());
        }

        /// Vandermonde: summing the exact PMF numerators recovers C(N, S).
        #[test]
        fn exact_sums_to_one((caps, s) in population_strategy()) {
            let pop = Population::from_counts(caps.clone()).unwrap();
            let exact = exact_rational(&pop, s).unwrap();
            let total = exact.values().fold(BigRational::zero(), |acc, p| acc + p);
            prop_assert!(
                total == BigRational::one(),
                "PMF should sum to 1 for caps={:?}, S={}, got {}", caps, s, total
            );
        }

        /// The f64 view sums to one within 1e-9.
        #[test]
        fn f64_sums_to_one((caps, s) in population_strategy()) {
            let pop = Population::from_counts(caps).unwrap();
            let dist = exact_distribution(&pop, s).unwrap();
            prop_assert!((dist.total_mass() - 1.0).abs() < 1e-9);
        }

        /// Two categories reduce to the univariate hypergeometric law.
        #[test]
        fn two_categories_match_univariate(k in 0u64..30, rest in 0u64..30, s_frac in 0.0f64..=1.0) {
            prop_assume!(k + rest > 0);
            let n = k + rest;
            let s = (s_frac * n as f64) as u64;
            let pop = Population::new(n, vec![k]).unwrap();
            let exact = exact_rational(&pop, s).unwrap();
            for (rep, p) in &exact {
                let x = rep.counts()[0];
                let expected =
                    BigRational::new(binomial(k, x) * binomial(n - k, s - x), binomial(n, s));
                prop_assert_eq!(p, &expected);
            }
        }
    }
}

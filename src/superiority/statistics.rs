// One-sample t-test with a one-sided alternative
//
// Moments are computed in f64 around the first observation, so a sample of
// identical values has a mean equal to that value bit for bit and a standard
// deviation of exactly zero. The zero-variance case is then resolved without
// dividing by zero.

use crate::distribution::TailProbability;
use serde::Serialize;

/// Direction of the alternative hypothesis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Alternative {
    /// H1: mean < mu0
    Less,
    /// H1: mean > mu0
    Greater,
}

/// Count, mean and sample standard deviation of the finite values of a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleMoments {
    pub n: usize,
    /// NaN when n = 0
    pub mean: f64,
    /// Sample standard deviation (n-1 denominator); NaN when n < 2
    pub sd: f64,
}

impl SampleMoments {
    pub fn from_sample(sample: &[f64]) -> Self {
        let finite: Vec<f64> = sample.iter().copied().filter(|v| v.is_finite()).collect();
        let n = finite.len();
        if n == 0 {
            return Self {
                n,
                mean: f64::NAN,
                sd: f64::NAN,
            };
        }

        let shift = finite[0];
        let shifted_sum: f64 = finite.iter().map(|v| v - shift).sum();
        let mean = shift + shifted_sum / n as f64;

        let sd = if n < 2 {
            f64::NAN
        } else {
            let ss: f64 = finite.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        };

        Self { n, mean, sd }
    }
}

/// Result of a one-sided one-sample t-test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OneSidedTest {
    /// t statistic; NaN when n < 2, ±inf for a zero-variance sample off mu0
    pub t_stat: f64,
    /// Degrees of freedom, n - 1 (0 when n < 2)
    pub df: usize,
    /// One-sided p-value; NaN when n < 2
    pub p_value: f64,
}

impl OneSidedTest {
    fn undefined() -> Self {
        Self {
            t_stat: f64::NAN,
            df: 0,
            p_value: f64::NAN,
        }
    }
}

/// Test H0: mean >= mu0 against H1: mean < mu0 (or the mirror for `Greater`)
///
/// Non-finite sample values are ignored. With fewer than two usable values
/// the statistic and p-value are NaN.
///
/// A zero-variance sample yields t = -inf, +inf or 0 depending on where its
/// mean lies relative to mu0. An infinite t maps to p = 0 when it points
/// toward the alternative and p = 1 when it points away; t = 0 gives p = 1.
///
/// # Example
/// ```
/// use ledgerbench::distribution::NormalApprox;
/// use ledgerbench::superiority::{one_sided_t_test, Alternative};
///
/// let sample = [-0.30, -0.28, -0.32, -0.29, -0.31];
/// let test = one_sided_t_test(&sample, 0.8f64.ln(), Alternative::Less, &NormalApprox);
/// assert_eq!(test.df, 4);
/// assert!(test.p_value < 0.05);
/// ```
pub fn one_sided_t_test(
    sample: &[f64],
    mu0: f64,
    alternative: Alternative,
    tail: &dyn TailProbability,
) -> OneSidedTest {
    let moments = SampleMoments::from_sample(sample);
    let n = moments.n;
    if n < 2 {
        return OneSidedTest::undefined();
    }
    let df = n - 1;

    if moments.sd == 0.0 {
        let t_stat = if moments.mean < mu0 {
            f64::NEG_INFINITY
        } else if moments.mean > mu0 {
            f64::INFINITY
        } else {
            0.0
        };

        let toward_alternative = match alternative {
            Alternative::Less => t_stat < 0.0,
            Alternative::Greater => t_stat > 0.0,
        };
        let p_value = if toward_alternative { 0.0 } else { 1.0 };

        return OneSidedTest {
            t_stat,
            df,
            p_value,
        };
    }

    let se = moments.sd / (n as f64).sqrt();
    let t_stat = (moments.mean - mu0) / se;
    let lower = tail.lower_tail(t_stat, df as f64);
    let p_value = match alternative {
        Alternative::Less => lower,
        Alternative::Greater => 1.0 - lower,
    };

    OneSidedTest {
        t_stat,
        df,
        p_value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::NormalApprox;

    #[test]
    fn test_moments_basic() {
        let m = SampleMoments::from_sample(&[2.0, 4.0, 6.0, 8.0]);
        assert_eq!(m.n, 4);
        assert!((m.mean - 5.0).abs() < 1e-12);
        // sample variance = 20 / 3
        assert!((m.sd - (20.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_moments_ignore_non_finite() {
        let m = SampleMoments::from_sample(&[1.0, f64::NAN, 3.0, f64::INFINITY]);
        assert_eq!(m.n, 2);
        assert!((m.mean - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_moments_identical_values_exact() {
        let x = 0.8f64.ln();
        let m = SampleMoments::from_sample(&[x; 7]);
        assert_eq!(m.mean, x);
        assert_eq!(m.sd, 0.0);
    }

    #[test]
    fn test_moments_single_value() {
        let m = SampleMoments::from_sample(&[-0.5]);
        assert_eq!(m.n, 1);
        assert_eq!(m.mean, -0.5);
        assert!(m.sd.is_nan());
    }

    #[test]
    fn test_insufficient_sample() {
        let test = one_sided_t_test(&[-0.5], 0.0, Alternative::Less, &NormalApprox);
        assert!(test.t_stat.is_nan());
        assert!(test.p_value.is_nan());
        assert_eq!(test.df, 0);
    }

    #[test]
    fn test_zero_variance_below_target() {
        let test = one_sided_t_test(&[-1.0; 4], 0.0, Alternative::Less, &NormalApprox);
        assert_eq!(test.t_stat, f64::NEG_INFINITY);
        assert_eq!(test.p_value, 0.0);
        assert_eq!(test.df, 3);
    }

    #[test]
    fn test_zero_variance_above_target() {
        let test = one_sided_t_test(&[1.0; 4], 0.0, Alternative::Less, &NormalApprox);
        assert_eq!(test.t_stat, f64::INFINITY);
        assert_eq!(test.p_value, 1.0);
    }

    #[test]
    fn test_zero_variance_at_target() {
        let test = one_sided_t_test(&[0.25; 3], 0.25, Alternative::Less, &NormalApprox);
        assert_eq!(test.t_stat, 0.0);
        assert_eq!(test.p_value, 1.0);
    }

    #[test]
    fn test_greater_alternative_mirrors_less() {
        let sample = [0.1, 0.3, 0.2, 0.25];
        let less = one_sided_t_test(&sample, 0.0, Alternative::Less, &NormalApprox);
        let greater = one_sided_t_test(&sample, 0.0, Alternative::Greater, &NormalApprox);
        assert_eq!(less.t_stat, greater.t_stat);
        assert!((less.p_value + greater.p_value - 1.0).abs() < 1e-12);
        assert!(greater.p_value < 0.05);
    }

    #[test]
    fn test_t_statistic_value() {
        // mean = 2, sd = 1, n = 4, mu0 = 1 -> t = 1 / (1/2) = 2
        let sample = [1.0, 2.0, 3.0, 2.0];
        let m = SampleMoments::from_sample(&sample);
        let test = one_sided_t_test(&sample, 1.0, Alternative::Less, &NormalApprox);
        let expected = (m.mean - 1.0) / (m.sd / 2.0);
        assert!((test.t_stat - expected).abs() < 1e-12);
        assert!(test.p_value > 0.5);
    }
}

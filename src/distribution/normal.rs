//! Standard normal CDF (fallback tail probability)

use super::{PValueMethod, TailProbability};

/// Normal approximation to the t distribution
///
/// Treats the t statistic as a z score. Adequate for large samples; for a
/// handful of pairs it produces p-values that are too small.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalApprox;

impl TailProbability for NormalApprox {
    fn method(&self) -> PValueMethod {
        PValueMethod::Normal
    }

    fn lower_tail(&self, t: f64, _df: f64) -> f64 {
        normal_cdf(t)
    }
}

/// Standard normal CDF
///
/// Abramowitz and Stegun 26.2.17 polynomial, absolute error below 7.5e-8.
pub fn normal_cdf(x: f64) -> f64 {
    if x.is_nan() {
        return f64::NAN;
    }
    if x == f64::INFINITY {
        return 1.0;
    }
    if x == f64::NEG_INFINITY {
        return 0.0;
    }

    let t = 1.0 / (1.0 + 0.2316419 * x.abs());
    let d = 0.3989422804014327; // 1/sqrt(2*pi)
    let p = d
        * (-x * x / 2.0).exp()
        * (0.319381530 * t - 0.356563782 * t * t + 1.781477937 * t * t * t
            - 1.821255978 * t * t * t * t
            + 1.330274429 * t * t * t * t * t);
    if x > 0.0 {
        1.0 - p
    } else {
        p
    }
}

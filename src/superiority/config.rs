// Configuration for the one-sided superiority test
//
// delta is the minimum fractional speedup the design under test must show:
// 0.20 means its latency must be at most 80% of the baseline's. On the log
// scale the threshold is ln(1 - delta).

use crate::error::{AnalysisError, AnalysisResult};
use serde::{Deserialize, Serialize};

/// Default minimum speedup (20% faster)
pub const DEFAULT_DELTA: f64 = 0.20;

/// Default significance level
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Parameters of the superiority test
///
/// # Example
/// ```
/// use ledgerbench::superiority::SuperiorityConfig;
///
/// let config = SuperiorityConfig::default();
/// assert_eq!(config.delta, 0.20);
/// assert!((config.threshold_ratio() - 0.8).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuperiorityConfig {
    /// Target minimum speedup fraction, 0 < delta < 1
    pub delta: f64,

    /// Significance level of the one-sided test, 0 < alpha < 1
    pub alpha: f64,
}

impl Default for SuperiorityConfig {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl SuperiorityConfig {
    pub fn new(delta: f64, alpha: f64) -> Self {
        Self { delta, alpha }
    }

    /// Largest acceptable latency ratio A/B, `1 - delta`
    pub fn threshold_ratio(&self) -> f64 {
        1.0 - self.delta
    }

    /// Log-ratio threshold, `ln(1 - delta)`
    pub fn target(&self) -> f64 {
        self.threshold_ratio().ln()
    }

    /// Validate configuration
    pub fn validate(&self) -> AnalysisResult<()> {
        if !(self.delta > 0.0 && self.delta < 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "delta must be in (0, 1), got {}",
                self.delta
            )));
        }

        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(AnalysisError::InvalidConfig(format!(
                "alpha must be in (0, 1), got {}",
                self.alpha
            )));
        }

        Ok(())
    }
}

// Tail probabilities for one-sided tests
//
// The superiority test needs P(T <= t) for a Student-t variable. Two
// implementations sit behind one trait:
// - StudentT: exact CDF via the regularized incomplete beta function
//   (compiled with the `student-t` feature, on by default)
// - NormalApprox: standard normal CDF evaluated at t. Ignores the degrees
//   of freedom, so p-values for small samples come out too small.
//
// The backend is chosen once, when the analysis starts, and the chosen
// method is carried into every report.

mod normal;
#[cfg(feature = "student-t")]
mod student_t;

pub use normal::{normal_cdf, NormalApprox};
#[cfg(feature = "student-t")]
pub use student_t::{regularized_incomplete_beta, student_t_cdf, StudentT};

use crate::error::AnalysisResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How p-values were computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum PValueMethod {
    /// Student-t CDF with n-1 degrees of freedom
    #[value(name = "exact")]
    #[serde(alias = "exact")]
    StudentT,
    /// Standard normal CDF on the t statistic
    #[value(name = "normal")]
    Normal,
}

impl PValueMethod {
    pub fn is_approximate(&self) -> bool {
        matches!(self, PValueMethod::Normal)
    }

    /// Machine-readable name, the same one JSON uses
    pub fn as_str(&self) -> &'static str {
        match self {
            PValueMethod::StudentT => "student_t",
            PValueMethod::Normal => "normal",
        }
    }
}

impl fmt::Display for PValueMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PValueMethod::StudentT => write!(f, "exact Student-t"),
            PValueMethod::Normal => write!(f, "normal approximation"),
        }
    }
}

/// Lower-tail probability of the test statistic's null distribution
pub trait TailProbability: fmt::Debug {
    fn method(&self) -> PValueMethod;

    /// P(T <= t) with `df` degrees of freedom
    ///
    /// Returns 0 for t = -inf, 1 for t = +inf and NaN for NaN input.
    fn lower_tail(&self, t: f64, df: f64) -> f64;
}

/// Whether this build can compute exact Student-t probabilities
pub fn exact_available() -> bool {
    cfg!(feature = "student-t")
}

/// Best backend available in this build
pub fn default_backend() -> Box<dyn TailProbability> {
    #[cfg(feature = "student-t")]
    {
        Box::new(StudentT)
    }

    #[cfg(not(feature = "student-t"))]
    {
        tracing::warn!(
            "Student-t CDF not compiled in; p-values use the normal approximation \
             and understate uncertainty for small samples"
        );
        Box::new(NormalApprox)
    }
}

/// Backend for an explicitly requested method
pub fn backend_for(method: PValueMethod) -> AnalysisResult<Box<dyn TailProbability>> {
    match method {
        PValueMethod::Normal => Ok(Box::new(NormalApprox)),
        PValueMethod::StudentT => {
            #[cfg(feature = "student-t")]
            {
                Ok(Box::new(StudentT))
            }

            #[cfg(not(feature = "student-t"))]
            {
                Err(crate::error::AnalysisError::UnavailableMethod(
                    method.to_string(),
                ))
            }
        }
    }
}

/// Resolve an optional preference into a backend
pub fn resolve_backend(
    preference: Option<PValueMethod>,
) -> AnalysisResult<Box<dyn TailProbability>> {
    match preference {
        Some(method) => backend_for(method),
        None => Ok(default_backend()),
    }
}

//! Descriptive statistics for latency and buffer-counter samples
//!
//! Sums and means go through trueno's SIMD vectors; quantiles use aprender's
//! `DescriptiveStats` (R-7, linear interpolation between closest ranks).
//! Both operate on f32, which is ample for millisecond latencies; results
//! are widened back to f64 for reporting.

use aprender::stats::DescriptiveStats;
use trueno::Vector;

/// z value of a two-sided 95% normal interval
pub const Z_95: f64 = 1.96;

/// Summary of one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Number of finite values
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation; 0 when count < 2
    pub sd: f64,
    pub p50: f64,
    pub p95: f64,
}

impl Summary {
    /// Summarize the finite values of a sample; `None` when there are none
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let data = finite_f32(values);
        if data.is_empty() {
            return None;
        }
        let v = Vector::from_slice(&data);

        Some(Self {
            count: data.len(),
            mean: vector_mean(&v),
            sd: sample_sd_of(&data),
            p50: quantile_of(&v, &data, 0.5),
            p95: quantile_of(&v, &data, 0.95),
        })
    }

    /// Standard error of the mean
    pub fn standard_error(&self) -> f64 {
        self.sd / (self.count.max(1) as f64).sqrt()
    }

    /// Half width of the normal 95% interval, `1.96 * se`
    pub fn ci95(&self) -> f64 {
        Z_95 * self.standard_error()
    }
}

/// Mean of the finite values
pub fn mean(values: &[f64]) -> Option<f64> {
    let data = finite_f32(values);
    if data.is_empty() {
        return None;
    }
    Some(vector_mean(&Vector::from_slice(&data)))
}

/// Sample standard deviation (n - 1) of the finite values; 0 below two values
pub fn sample_sd(values: &[f64]) -> f64 {
    sample_sd_of(&finite_f32(values))
}

/// R-7 quantile of the finite values, `q` in [0, 1]
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let data = finite_f32(values);
    if data.is_empty() {
        return None;
    }
    Some(quantile_of(&Vector::from_slice(&data), &data, q))
}

fn finite_f32(values: &[f64]) -> Vec<f32> {
    values
        .iter()
        .filter(|v| v.is_finite())
        .map(|&v| v as f32)
        .collect()
}

fn vector_mean(v: &Vector<f32>) -> f64 {
    v.mean().map(f64::from).unwrap_or(f64::NAN)
}

fn sample_sd_of(data: &[f32]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let m = vector_mean(&Vector::from_slice(data)) as f32;
    let squares: Vec<f32> = data.iter().map(|x| (x - m) * (x - m)).collect();
    let ss = Vector::from_slice(&squares).sum().map(f64::from).unwrap_or(0.0);
    (ss / (n - 1) as f64).sqrt()
}

fn quantile_of(v: &Vector<f32>, data: &[f32], q: f64) -> f64 {
    match DescriptiveStats::new(v).quantile(q) {
        Ok(value) => f64::from(value),
        Err(e) => {
            tracing::debug!("aprender quantile failed ({}), interpolating directly", e);
            interpolate_sorted(data, q)
        }
    }
}

/// Linear interpolation between closest ranks
fn interpolate_sorted(data: &[f32], q: f64) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if sorted.len() == 1 {
        return f64::from(sorted[0]);
    }

    let index = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = index.floor() as usize;
    let upper = index.ceil() as usize;
    let weight = index - lower as f64;
    f64::from(sorted[lower]) * (1.0 - weight) + f64::from(sorted[upper]) * weight
}

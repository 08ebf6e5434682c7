//! Paired observations: the same `(variant, run_no)` measured under two designs

use crate::measurement::{Measurement, ResultSet};
use serde::Serialize;
use std::collections::BTreeMap;

/// Two measurements of the same scenario run, one per design
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairedObservation {
    pub variant: String,
    pub run_no: i64,
    /// Latency of the design under test (A)
    pub a_ms: f64,
    /// Latency of the baseline design (B)
    pub b_ms: f64,
    /// `ln(a_ms / b_ms)`
    pub log_ratio: f64,
}

/// Natural log of `a / b`, defined only for strictly positive finite latencies
///
/// Computed as a difference of logs so the result stays finite even where
/// the quotient itself would overflow or underflow.
pub fn log_ratio(a_ms: f64, b_ms: f64) -> Option<f64> {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if valid(a_ms) && valid(b_ms) {
        Some(a_ms.ln() - b_ms.ln())
    } else {
        None
    }
}

/// Outcome of joining two label selections
#[derive(Debug, Clone, Default)]
pub struct Pairing {
    /// Valid pairs ordered by `(variant, run_no)`
    pub pairs: Vec<PairedObservation>,
    /// Joined rows discarded because a latency was missing or non-positive
    pub dropped: usize,
}

/// Join design A rows with design B rows on `(variant, run_no)`
///
/// Only keys present in both selections are paired. A pair whose log-ratio
/// is undefined is dropped and counted, never passed downstream.
pub fn pair_measurements<'a, A, B>(a_rows: A, b_rows: B) -> Pairing
where
    A: IntoIterator<Item = &'a Measurement>,
    B: IntoIterator<Item = &'a Measurement>,
{
    let a_index = index_by_run(a_rows, "A");
    let b_index = index_by_run(b_rows, "B");

    let mut pairing = Pairing::default();
    for (key, a) in &a_index {
        let Some(b) = b_index.get(key) else {
            continue;
        };

        let ratio = match (a.execution_ms, b.execution_ms) {
            (Some(a_ms), Some(b_ms)) => log_ratio(a_ms, b_ms).map(|r| (a_ms, b_ms, r)),
            _ => None,
        };

        match ratio {
            Some((a_ms, b_ms, log_ratio)) => pairing.pairs.push(PairedObservation {
                variant: key.0.clone(),
                run_no: key.1,
                a_ms,
                b_ms,
                log_ratio,
            }),
            None => pairing.dropped += 1,
        }
    }

    if pairing.dropped > 0 {
        tracing::debug!(
            "Dropped {} pairs with missing or non-positive latency",
            pairing.dropped
        );
    }

    pairing
}

/// Pair two labels of a result set
pub fn pair_labels(results: &ResultSet, label_a: &str, label_b: &str) -> Pairing {
    pair_measurements(results.select(label_a), results.select(label_b))
}

fn index_by_run<'a, I>(rows: I, side: &str) -> BTreeMap<(String, i64), &'a Measurement>
where
    I: IntoIterator<Item = &'a Measurement>,
{
    let mut index = BTreeMap::new();
    for m in rows {
        if index.insert((m.variant.clone(), m.run_no), m).is_some() {
            tracing::warn!(
                "Duplicate run ({}, {}) in selection {}; keeping the last row",
                m.variant,
                m.run_no,
                side
            );
        }
    }
    index
}

// Superiority test scenarios
//
// Log-ratio fixtures mirror real benchmark shapes: tight clusters well past
// the target, mixed results where A is mostly slower, and degenerate groups.

use super::*;
use crate::distribution::{default_backend, NormalApprox, TailProbability};
use crate::error::AnalysisError;
use crate::measurement::{Measurement, ResultSet};
use crate::pairing::PairedObservation;
use crate::table::Tabular;

fn pairs_from_log_ratios(variant: &str, log_ratios: &[f64]) -> Vec<PairedObservation> {
    log_ratios
        .iter()
        .enumerate()
        .map(|(i, &lr)| PairedObservation {
            variant: variant.to_string(),
            run_no: i as i64 + 1,
            a_ms: lr.exp(),
            b_ms: 1.0,
            log_ratio: lr,
        })
        .collect()
}

fn assess(pairs: &[PairedObservation], config: &SuperiorityConfig) -> SuperiorityTable {
    let backend = default_backend();
    assess_superiority(pairs, "rel_indexed", "jsonb_indexed", config, backend.as_ref()).unwrap()
}

/// Tight cluster around ln-ratio -0.30 (about 26% faster) clears a 20% target
#[test]
fn test_clear_speedup_passes() {
    let pairs = pairs_from_log_ratios("S1_eq", &[-0.30, -0.28, -0.32, -0.29, -0.31]);
    let table = assess(&pairs, &SuperiorityConfig::default());

    let row = table.group("S1_eq").unwrap();
    assert_eq!(row.n_pairs, 5);
    assert!((row.mean_log_ratio - (-0.30)).abs() < 1e-12);
    assert!(row.t_stat < -10.0);
    assert!(row.p_value < 0.05, "p = {}", row.p_value);
    assert!(row.passes);
    assert_eq!(row.df, 4);
}

/// Design A mostly slower: no evidence of a 20% speedup
#[test]
fn test_mostly_slower_fails() {
    let pairs = pairs_from_log_ratios("S2_like", &[0.1, -0.05, 0.2, 0.0, 0.15]);
    let table = assess(&pairs, &SuperiorityConfig::default());

    let row = table.group("S2_like").unwrap();
    assert!(row.t_stat > 0.0);
    assert!(row.p_value > 0.5);
    assert!(!row.passes);
    assert!(row.improvement_pct < 0.0);
}

/// A single pair cannot be tested
#[test]
fn test_single_pair_group() {
    let pairs = pairs_from_log_ratios("S3_trgm", &[-0.5]);
    let table = assess(&pairs, &SuperiorityConfig::default());

    let row = table.group("S3_trgm").unwrap();
    assert_eq!(row.n_pairs, 1);
    assert!(!row.passes);
    assert!(row.p_value.is_nan());
    assert!(row.t_stat.is_nan());
    assert_eq!(row.mean_log_ratio, -0.5);
}

/// Every log-ratio exactly on the target: t = 0, p = 1
#[test]
fn test_all_values_on_target() {
    let config = SuperiorityConfig::new(0.2, 0.05);
    let pairs = pairs_from_log_ratios("S4_ts", &[config.target(); 5]);
    let table = assess(&pairs, &config);

    let row = table.group("S4_ts").unwrap();
    assert_eq!(row.t_stat, 0.0);
    assert_eq!(row.p_value, 1.0);
    assert!(!row.passes);
}

/// Zero variance strictly below the target is a deterministic pass
#[test]
fn test_zero_variance_below_target_passes() {
    let pairs = pairs_from_log_ratios("S5_arr", &[-0.5; 4]);
    let table = assess(&pairs, &SuperiorityConfig::default());

    let row = table.group("S5_arr").unwrap();
    assert_eq!(row.t_stat, f64::NEG_INFINITY);
    assert_eq!(row.p_value, 0.0);
    assert!(row.passes);
}

/// Zero variance above the target is a deterministic fail
#[test]
fn test_zero_variance_above_target_fails() {
    let pairs = pairs_from_log_ratios("S6_arr", &[0.1; 4]);
    let table = assess(&pairs, &SuperiorityConfig::default());

    let row = table.group("S6_arr").unwrap();
    assert_eq!(row.t_stat, f64::INFINITY);
    assert!(!row.passes);
}

/// No pairs at all aborts the report
#[test]
fn test_empty_input_is_no_data() {
    let backend = default_backend();
    let err = assess_superiority(
        &[],
        "N=1000 rel_indexed",
        "N=1000 jsonb_indexed",
        &SuperiorityConfig::default(),
        backend.as_ref(),
    )
    .unwrap_err();

    assert!(matches!(err, AnalysisError::NoData { .. }));
}

/// Labels that match nothing end in NoData as well
#[test]
fn test_unknown_labels_no_data() {
    let set = ResultSet::new(vec![Measurement {
        label: "N=10 rel_indexed".to_string(),
        variant: "S1".to_string(),
        run_no: 1,
        execution_ms: Some(1.0),
        shared_reads: None,
        shared_hits: None,
    }]);
    let backend = default_backend();
    let err = run_superiority(
        &set,
        "N=10 rel_indexed",
        "N=10 jsonb_indexed",
        &SuperiorityConfig::default(),
        backend.as_ref(),
    )
    .unwrap_err();

    assert!(matches!(err, AnalysisError::NoData { .. }));
}

#[test]
fn test_invalid_config_rejected_before_computation() {
    let pairs = pairs_from_log_ratios("S1", &[-0.3, -0.2]);
    let backend = default_backend();
    let err = assess_superiority(
        &pairs,
        "a",
        "b",
        &SuperiorityConfig::new(1.2, 0.05),
        backend.as_ref(),
    )
    .unwrap_err();
    assert!(matches!(err, AnalysisError::InvalidConfig(_)));
}

/// Small groups degrade to FAIL rows without affecting the others
#[test]
fn test_insufficient_group_does_not_abort_others() {
    let mut pairs = pairs_from_log_ratios("S1_eq", &[-0.30, -0.28, -0.32, -0.29, -0.31]);
    pairs.extend(pairs_from_log_ratios("S9_or", &[-0.4]));
    let table = assess(&pairs, &SuperiorityConfig::default());

    assert!(table.group("S1_eq").unwrap().passes);
    assert!(!table.group("S9_or").unwrap().passes);
    assert_eq!(table.overall().unwrap().n_pairs, 6);
}

/// Scenarios come out in S1..S10 order with the pooled row last
#[test]
fn test_row_order() {
    let mut pairs = pairs_from_log_ratios("S10_topn", &[-0.3, -0.31]);
    pairs.extend(pairs_from_log_ratios("S2_like", &[-0.3, -0.31]));
    pairs.extend(pairs_from_log_ratios("S1_eq", &[-0.3, -0.31]));
    let table = assess(&pairs, &SuperiorityConfig::default());

    let groups: Vec<&str> = table.rows.iter().map(|r| r.group.as_str()).collect();
    assert_eq!(groups, vec!["S1_eq", "S2_like", "S10_topn", OVERALL_GROUP]);
    assert_eq!(table.scenarios().count(), 3);
}

/// Derived ratio fields follow the log-scale mean
#[test]
fn test_geomean_and_improvement() {
    let pairs = pairs_from_log_ratios("S7_mk", &[0.5f64.ln(), 0.5f64.ln(), 0.5f64.ln()]);
    let table = assess(&pairs, &SuperiorityConfig::default());

    let row = table.group("S7_mk").unwrap();
    assert!((row.geomean_ratio - 0.5).abs() < 1e-12);
    assert!((row.improvement_pct - 50.0).abs() < 1e-9);
    assert!((row.threshold_ratio - 0.8).abs() < 1e-12);
}

/// Same input, same table, bit for bit
#[test]
fn test_idempotent() {
    let mut pairs = pairs_from_log_ratios("S1_eq", &[-0.30, -0.28, -0.32, -0.29, -0.31]);
    pairs.extend(pairs_from_log_ratios("S2_like", &[0.1, -0.05, 0.2, 0.0, 0.15]));
    let config = SuperiorityConfig::default();

    let first = assess(&pairs, &config);
    let second = assess(&pairs, &config);
    for (a, b) in first.rows.iter().zip(&second.rows) {
        assert_eq!(a.t_stat.to_bits(), b.t_stat.to_bits());
        assert_eq!(a.p_value.to_bits(), b.p_value.to_bits());
        assert_eq!(a.mean_log_ratio.to_bits(), b.mean_log_ratio.to_bits());
        assert_eq!(a.passes, b.passes);
    }
}

/// A stricter speedup target never makes the p-value smaller
#[test]
fn test_p_value_monotone_in_delta() {
    let pairs = pairs_from_log_ratios("S8_mk3", &[-0.25, -0.35, -0.2, -0.3, -0.28, -0.33]);
    let mut previous_p = 0.0;
    let mut previously_failed = false;

    for step in 1..19 {
        let delta = step as f64 * 0.05;
        let table = assess(&pairs, &SuperiorityConfig::new(delta, 0.05));
        let row = table.group("S8_mk3").unwrap();

        assert!(row.p_value >= previous_p, "delta={delta}");
        if previously_failed {
            assert!(!row.passes, "flipped to PASS at delta={delta}");
        }
        previous_p = row.p_value;
        previously_failed = !row.passes;
    }
}

/// The report records which tail probability produced the p-values
#[test]
fn test_method_flagged_in_table() {
    let pairs = pairs_from_log_ratios("S1", &[-0.3, -0.31, -0.29]);
    let table = assess_superiority(
        &pairs,
        "a",
        "b",
        &SuperiorityConfig::default(),
        &NormalApprox,
    )
    .unwrap();

    assert_eq!(table.p_value_method, NormalApprox.method());
    assert!(table.p_value_method.is_approximate());
}

#[cfg(feature = "student-t")]
#[test]
fn test_exact_p_value_larger_than_normal_for_small_samples() {
    use crate::distribution::StudentT;

    let pairs = pairs_from_log_ratios("S1", &[-0.30, -0.24, -0.35, -0.27]);
    let config = SuperiorityConfig::default();
    let exact = assess_superiority(&pairs, "a", "b", &config, &StudentT).unwrap();
    let approx = assess_superiority(&pairs, "a", "b", &config, &NormalApprox).unwrap();

    let p_exact = exact.group("S1").unwrap().p_value;
    let p_approx = approx.group("S1").unwrap().p_value;
    assert!(p_exact > p_approx);
}

#[test]
fn test_dropped_pairs_reported() {
    let mk = |label: &str, run_no: i64, ms: f64| Measurement {
        label: label.to_string(),
        variant: "S1_eq".to_string(),
        run_no,
        execution_ms: Some(ms),
        shared_reads: None,
        shared_hits: None,
    };
    let set = ResultSet::new(vec![
        mk("A", 1, 0.7),
        mk("A", 2, 0.0),
        mk("A", 3, 0.72),
        mk("B", 1, 1.0),
        mk("B", 2, 1.0),
        mk("B", 3, 1.0),
    ]);
    let backend = default_backend();
    let table = run_superiority(
        &set,
        "A",
        "B",
        &SuperiorityConfig::default(),
        backend.as_ref(),
    )
    .unwrap();

    assert_eq!(table.dropped_pairs, 1);
    assert_eq!(table.overall().unwrap().n_pairs, 2);
}

#[test]
fn test_extreme_latencies_counted_in_group() {
    let mk = |label: &str, run_no: i64, ms: f64| Measurement {
        label: label.to_string(),
        variant: "S1_eq".to_string(),
        run_no,
        execution_ms: Some(ms),
        shared_reads: None,
        shared_hits: None,
    };
    let set = ResultSet::new(vec![
        mk("A", 1, 1e-300),
        mk("A", 2, 2e-300),
        mk("A", 3, 3e-300),
        mk("B", 1, 1e300),
        mk("B", 2, 1e300),
        mk("B", 3, 1e300),
    ]);
    let backend = default_backend();
    let table = run_superiority(
        &set,
        "A",
        "B",
        &SuperiorityConfig::default(),
        backend.as_ref(),
    )
    .unwrap();

    let row = table.group("S1_eq").unwrap();
    assert_eq!(row.n_pairs, 3);
    assert!(row.mean_log_ratio.is_finite());
    assert!(row.passes);
}

#[test]
fn test_method_column_on_every_row() {
    let pairs = pairs_from_log_ratios("S1", &[-0.3, -0.31, -0.29]);
    let table = assess_superiority(
        &pairs,
        "a",
        "b",
        &SuperiorityConfig::default(),
        &NormalApprox,
    )
    .unwrap();

    let headers = table.headers();
    assert_eq!(headers.last(), Some(&"p_value_method"));
    for row in table.rows() {
        assert_eq!(row.len(), headers.len());
        assert_eq!(row.last().map(|c| c.raw()), Some("normal".to_string()));
    }
}

// Superiority decision table
//
// Groups paired observations by scenario, runs the one-sided t-test on each
// group's log-ratios, and appends one pooled row for all pairs. A group with
// fewer than two pairs keeps its row with NaN statistics and a FAIL decision;
// an input with no pairs at all is an error.

use crate::distribution::{PValueMethod, TailProbability};
use crate::error::{AnalysisError, AnalysisResult};
use crate::measurement::ResultSet;
use crate::pairing::{pair_labels, PairedObservation};
use crate::scenario::compare_variants;
use crate::superiority::config::SuperiorityConfig;
use crate::superiority::statistics::{one_sided_t_test, Alternative, SampleMoments};
use crate::table::{Cell, Tabular};
use serde::Serialize;
use std::collections::BTreeMap;

/// Group name of the pooled row
pub const OVERALL_GROUP: &str = "__OVERALL__";

/// Test outcome for one scenario, or for all scenarios pooled
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    /// Scenario (`variant`) or [`OVERALL_GROUP`]
    pub group: String,
    pub n_pairs: usize,
    pub mean_log_ratio: f64,
    /// Geometric mean of A/B, `exp(mean_log_ratio)`
    pub geomean_ratio: f64,
    /// `(1 - geomean_ratio) * 100`; positive means A is faster
    pub improvement_pct: f64,
    pub threshold_ratio: f64,
    pub t_stat: f64,
    pub df: usize,
    pub p_value: f64,
    pub passes: bool,
}

impl GroupSummary {
    pub fn is_overall(&self) -> bool {
        self.group == OVERALL_GROUP
    }
}

/// Summarize one group of log-ratios
pub fn summarize_group(
    group: &str,
    log_ratios: &[f64],
    config: &SuperiorityConfig,
    tail: &dyn TailProbability,
) -> GroupSummary {
    let moments = SampleMoments::from_sample(log_ratios);
    let test = one_sided_t_test(log_ratios, config.target(), Alternative::Less, tail);

    let mean = moments.mean;
    let geomean_ratio = if mean.is_finite() {
        mean.exp()
    } else {
        f64::NAN
    };
    let passes = test.p_value.is_finite() && test.p_value < config.alpha;

    GroupSummary {
        group: group.to_string(),
        n_pairs: moments.n,
        mean_log_ratio: mean,
        geomean_ratio,
        improvement_pct: (1.0 - geomean_ratio) * 100.0,
        threshold_ratio: config.threshold_ratio(),
        t_stat: test.t_stat,
        df: test.df,
        p_value: test.p_value,
        passes,
    }
}

/// Full result of a superiority analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuperiorityTable {
    /// Label of the design under test (A)
    pub label_a: String,
    /// Label of the baseline design (B)
    pub label_b: String,
    pub delta: f64,
    pub alpha: f64,
    pub threshold_ratio: f64,
    pub p_value_method: PValueMethod,
    /// Joined rows discarded because a latency was missing or non-positive
    pub dropped_pairs: usize,
    /// Per-scenario rows in natural order, then the pooled row
    pub rows: Vec<GroupSummary>,
}

impl SuperiorityTable {
    /// The pooled row
    pub fn overall(&self) -> Option<&GroupSummary> {
        self.rows.iter().find(|r| r.is_overall())
    }

    /// Per-scenario rows only
    pub fn scenarios(&self) -> impl Iterator<Item = &GroupSummary> {
        self.rows.iter().filter(|r| !r.is_overall())
    }

    /// Row for one scenario
    pub fn group(&self, name: &str) -> Option<&GroupSummary> {
        self.rows.iter().find(|r| r.group == name)
    }

    /// Scenarios whose test passed
    pub fn passing_scenarios(&self) -> Vec<&str> {
        self.scenarios()
            .filter(|r| r.passes)
            .map(|r| r.group.as_str())
            .collect()
    }
}

/// Run the superiority test on already paired observations
///
/// # Example
/// ```
/// use ledgerbench::distribution::default_backend;
/// use ledgerbench::pairing::PairedObservation;
/// use ledgerbench::superiority::{assess_superiority, SuperiorityConfig};
///
/// let pairs: Vec<PairedObservation> = [0.70f64, 0.74, 0.72, 0.73]
///     .iter()
///     .enumerate()
///     .map(|(i, &a)| PairedObservation {
///         variant: "S1_eq".to_string(),
///         run_no: i as i64 + 1,
///         a_ms: a,
///         b_ms: 1.0,
///         log_ratio: a.ln(),
///     })
///     .collect();
///
/// let backend = default_backend();
/// let table = assess_superiority(&pairs, "rel", "jsonb", &SuperiorityConfig::default(), backend.as_ref()).unwrap();
/// assert!(table.overall().unwrap().passes);
/// ```
pub fn assess_superiority(
    pairs: &[PairedObservation],
    label_a: &str,
    label_b: &str,
    config: &SuperiorityConfig,
    tail: &dyn TailProbability,
) -> AnalysisResult<SuperiorityTable> {
    config.validate()?;

    if pairs.is_empty() {
        return Err(AnalysisError::NoData {
            label_a: label_a.to_string(),
            label_b: label_b.to_string(),
        });
    }

    let mut by_variant: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for pair in pairs {
        by_variant
            .entry(pair.variant.as_str())
            .or_default()
            .push(pair.log_ratio);
    }

    let mut variants: Vec<&str> = by_variant.keys().copied().collect();
    variants.sort_by(|a, b| compare_variants(a, b));

    let mut rows = Vec::with_capacity(variants.len() + 1);
    for variant in variants {
        let summary = summarize_group(variant, &by_variant[variant], config, tail);
        tracing::debug!(
            "{}: n={} mean={:.4} t={:.3} p={:.4} passes={}",
            summary.group,
            summary.n_pairs,
            summary.mean_log_ratio,
            summary.t_stat,
            summary.p_value,
            summary.passes
        );
        rows.push(summary);
    }

    let pooled: Vec<f64> = pairs.iter().map(|p| p.log_ratio).collect();
    rows.push(summarize_group(OVERALL_GROUP, &pooled, config, tail));

    Ok(SuperiorityTable {
        label_a: label_a.to_string(),
        label_b: label_b.to_string(),
        delta: config.delta,
        alpha: config.alpha,
        threshold_ratio: config.threshold_ratio(),
        p_value_method: tail.method(),
        dropped_pairs: 0,
        rows,
    })
}

/// Pair two labels of a result set and run the superiority test
pub fn run_superiority(
    results: &ResultSet,
    label_a: &str,
    label_b: &str,
    config: &SuperiorityConfig,
    tail: &dyn TailProbability,
) -> AnalysisResult<SuperiorityTable> {
    let pairing = pair_labels(results, label_a, label_b);
    tracing::info!(
        "Paired {} runs of '{}' with '{}' ({} dropped)",
        pairing.pairs.len(),
        label_a,
        label_b,
        pairing.dropped
    );

    let mut table = assess_superiority(&pairing.pairs, label_a, label_b, config, tail)?;
    table.dropped_pairs = pairing.dropped;
    Ok(table)
}

impl Tabular for SuperiorityTable {
    fn title(&self) -> String {
        format!(
            "{} vs {} superiority test (one-sided)",
            self.label_a, self.label_b
        )
    }

    fn subtitle(&self) -> Vec<String> {
        let mut lines = vec![format!(
            "Target ratio <= {:.2} (>={:.0}% faster), alpha = {}, p-values: {}",
            self.threshold_ratio,
            self.delta * 100.0,
            self.alpha,
            self.p_value_method
        )];
        if self.p_value_method.is_approximate() {
            lines.push(
                "Warning: normal approximation understates p-values for small samples".to_string(),
            );
        }
        if self.dropped_pairs > 0 {
            lines.push(format!(
                "{} pairs dropped (missing or non-positive latency)",
                self.dropped_pairs
            ));
        }
        lines
    }

    fn headers(&self) -> Vec<&'static str> {
        vec![
            "group",
            "n_pairs",
            "mean_log_ratio",
            "geomean_ratio",
            "improvement_pct",
            "threshold_ratio",
            "t_stat",
            "df",
            "p_value",
            "passes",
            "p_value_method",
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::text(&r.group),
                    Cell::Count(r.n_pairs as u64),
                    Cell::number(r.mean_log_ratio, 4),
                    Cell::number(r.geomean_ratio, 4),
                    Cell::Percent(r.improvement_pct),
                    Cell::number(r.threshold_ratio, 2),
                    Cell::number(r.t_stat, 3),
                    Cell::Count(r.df as u64),
                    Cell::PValue(r.p_value),
                    Cell::Decision(r.passes),
                    Cell::text(self.p_value_method.as_str()),
                ]
            })
            .collect()
    }

    fn is_emphasized(&self, row: usize) -> bool {
        self.rows.get(row).is_some_and(|r| r.is_overall())
    }

    fn footnote(&self) -> Option<String> {
        Some(format!(
            "Decision = PASS if one-sided t-test p < alpha for H1: E[log(A/B)] < ln(1 - delta) = {:.4}. \
             improvement_pct = (1 - geomean_ratio) x 100.",
            self.threshold_ratio.ln()
        ))
    }
}

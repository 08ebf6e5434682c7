//! JSONB vs relational p95 comparison across dataset sizes
//!
//! Indexed designs only. For each `(size, scenario)` the p95 latencies of
//! both engines are compared:
//!
//! - `ratio = jsonb_p95 / rel_p95` (NaN when the relational p95 is zero or absent)
//! - `slowdown_pct = (ratio - 1) * 100`, positive when JSONB is slower

use crate::error::{AnalysisError, AnalysisResult};
use crate::measurement::{Engine, Indexing, ResultSet};
use crate::scenario::compare_variants;
use crate::stats;
use crate::table::{Cell, Tabular};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeComparisonRow {
    pub size: u64,
    pub scenario: String,
    pub jsonb_p95_ms: Option<f64>,
    pub rel_p95_ms: Option<f64>,
    pub ratio: f64,
    pub slowdown_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SizeComparison {
    pub rows: Vec<SizeComparisonRow>,
}

#[derive(Default)]
struct EngineSamples {
    jsonb: Vec<f64>,
    rel: Vec<f64>,
}

/// Ratio of JSONB to relational p95, NaN when undefined
pub fn p95_ratio(jsonb_p95: Option<f64>, rel_p95: Option<f64>) -> f64 {
    match (jsonb_p95, rel_p95) {
        (Some(j), Some(r)) if r != 0.0 => j / r,
        _ => f64::NAN,
    }
}

pub fn compare_sizes(results: &ResultSet) -> AnalysisResult<SizeComparison> {
    let mut groups: BTreeMap<(u64, &str), EngineSamples> = BTreeMap::new();

    for m in &results.rows {
        let info = m.label_info();
        let (Some(size), Some(engine), Some(Indexing::Indexed)) =
            (info.size, info.engine, info.indexing)
        else {
            continue;
        };
        let entry = groups.entry((size, m.variant.as_str())).or_default();
        if let Some(ms) = m.execution_ms {
            match engine {
                Engine::Jsonb => entry.jsonb.push(ms),
                Engine::Rel => entry.rel.push(ms),
            }
        }
    }

    if groups.is_empty() {
        return Err(AnalysisError::EmptySelection(
            "no sized jsonb_indexed or rel_indexed rows".to_string(),
        ));
    }

    let mut rows: Vec<SizeComparisonRow> = groups
        .into_iter()
        .map(|((size, scenario), samples)| {
            let jsonb_p95_ms = stats::quantile(&samples.jsonb, 0.95);
            let rel_p95_ms = stats::quantile(&samples.rel, 0.95);
            let ratio = p95_ratio(jsonb_p95_ms, rel_p95_ms);
            SizeComparisonRow {
                size,
                scenario: scenario.to_string(),
                jsonb_p95_ms,
                rel_p95_ms,
                ratio,
                slowdown_pct: (ratio - 1.0) * 100.0,
            }
        })
        .collect();

    rows.sort_by(|a, b| compare_variants(&a.scenario, &b.scenario).then(a.size.cmp(&b.size)));

    let incomplete = rows.iter().filter(|r| r.ratio.is_nan()).count();
    if incomplete > 0 {
        tracing::warn!("{} size/scenario groups lack one of the two engines", incomplete);
    }

    Ok(SizeComparison { rows })
}

impl SizeComparison {
    /// Distinct sizes, ascending
    pub fn sizes(&self) -> Vec<u64> {
        let mut sizes: Vec<u64> = self.rows.iter().map(|r| r.size).collect();
        sizes.sort_unstable();
        sizes.dedup();
        sizes
    }
}

impl Tabular for SizeComparison {
    fn title(&self) -> String {
        "JSONB (indexed) vs relational (indexed) p95 by scenario and size".to_string()
    }

    fn subtitle(&self) -> Vec<String> {
        vec!["ratio = jsonb_p95 / rel_p95; positive slowdown_pct means JSONB is slower".to_string()]
    }

    fn headers(&self) -> Vec<&'static str> {
        vec![
            "n_rows",
            "scenario",
            "jsonb_p95_ms",
            "rel_p95_ms",
            "ratio",
            "slowdown_pct",
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::Count(r.size),
                    Cell::text(&r.scenario),
                    Cell::optional(r.jsonb_p95_ms, 3),
                    Cell::optional(r.rel_p95_ms, 3),
                    Cell::number(r.ratio, 3),
                    Cell::Percent(r.slowdown_pct),
                ]
            })
            .collect()
    }
}

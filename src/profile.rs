//! Latency profile per scenario and storage design
//!
//! For every `(variant, series)` pair: row count, mean/p50/p95 execution
//! time and the mean number of shared buffer hits. Indexed designs only by
//! default, which is the comparison the buffer-hit chart was built for.

use crate::error::{AnalysisError, AnalysisResult};
use crate::measurement::{IndexingFilter, Measurement, ResultSet, Series};
use crate::scenario::compare_variants;
use crate::stats::{self, Summary};
use crate::table::{Cell, Tabular};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileRow {
    pub variant: String,
    pub series: Series,
    /// Rows in the group, including those without a usable latency
    pub n: usize,
    pub mean_ms: f64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub shared_hits_mean: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencyProfile {
    pub indexing: IndexingFilter,
    pub size: Option<u64>,
    pub rows: Vec<ProfileRow>,
}

/// Build the profile over rows matching the indexing filter (and size, if given)
pub fn latency_profile(
    results: &ResultSet,
    indexing: IndexingFilter,
    size: Option<u64>,
) -> AnalysisResult<LatencyProfile> {
    let mut groups: BTreeMap<(&str, Series), Vec<&Measurement>> = BTreeMap::new();

    for m in &results.rows {
        let info = m.label_info();
        let Some(series) = info.series() else {
            continue;
        };
        if !indexing.accepts(series.indexing) {
            continue;
        }
        if size.is_some() && info.size != size {
            continue;
        }
        groups.entry((m.variant.as_str(), series)).or_default().push(m);
    }

    if groups.is_empty() {
        return Err(AnalysisError::EmptySelection(format!(
            "no jsonb/rel rows for indexing = {:?}{}",
            indexing,
            size.map(|n| format!(", N = {}", n)).unwrap_or_default()
        )));
    }

    let mut keys: Vec<(&str, Series)> = groups.keys().copied().collect();
    keys.sort_by(|a, b| compare_variants(a.0, b.0).then(a.1.cmp(&b.1)));

    let rows = keys
        .into_iter()
        .map(|key| {
            let members = &groups[&key];
            let latencies: Vec<f64> = members.iter().filter_map(|m| m.execution_ms).collect();
            let hits: Vec<f64> = members.iter().filter_map(|m| m.shared_hits).collect();
            let summary = Summary::from_values(&latencies);

            ProfileRow {
                variant: key.0.to_string(),
                series: key.1,
                n: members.len(),
                mean_ms: summary.map_or(f64::NAN, |s| s.mean),
                p50_ms: summary.map_or(f64::NAN, |s| s.p50),
                p95_ms: summary.map_or(f64::NAN, |s| s.p95),
                shared_hits_mean: stats::mean(&hits),
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!("Latency profile: {} groups", rows.len());

    Ok(LatencyProfile {
        indexing,
        size,
        rows,
    })
}

impl LatencyProfile {
    pub fn row(&self, variant: &str, series: Series) -> Option<&ProfileRow> {
        self.rows
            .iter()
            .find(|r| r.variant == variant && r.series == series)
    }
}

impl Tabular for LatencyProfile {
    fn title(&self) -> String {
        match self.size {
            Some(n) => format!("Latency profile by scenario (N={})", n),
            None => "Latency profile by scenario".to_string(),
        }
    }

    fn subtitle(&self) -> Vec<String> {
        let series: Vec<String> = self.indexing.series().iter().map(|s| s.to_string()).collect();
        vec![format!("Series: {}", series.join(", "))]
    }

    fn headers(&self) -> Vec<&'static str> {
        vec![
            "variant",
            "series",
            "n",
            "mean_ms",
            "p50_ms",
            "p95_ms",
            "shared_hits_mean",
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::text(&r.variant),
                    Cell::text(r.series.to_string()),
                    Cell::Count(r.n as u64),
                    Cell::number(r.mean_ms, 3),
                    Cell::number(r.p50_ms, 3),
                    Cell::number(r.p95_ms, 3),
                    Cell::optional(r.shared_hits_mean, 0),
                ]
            })
            .collect()
    }
}

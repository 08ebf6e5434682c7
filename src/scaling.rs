//! Cross-size scaling with approximate 95% confidence intervals
//!
//! Groups measurements by `(variant, series, size)` and reports mean ± 1.96·SE
//! of one metric. Rows whose label carries no `N=` size cannot be placed on
//! the size axis and are dropped.

use crate::error::{AnalysisError, AnalysisResult};
use crate::measurement::{IndexingFilter, Metric, ResultSet, Series};
use crate::scenario::{compare_variants, family, family_title};
use crate::stats::{self, Z_95};
use crate::table::{Cell, Tabular};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingRow {
    pub variant: String,
    pub family: String,
    pub series: Series,
    pub size: u64,
    /// Values of the metric present in the group
    pub count: usize,
    pub mean: f64,
    pub sd: f64,
    pub se: f64,
    /// Half width, `1.96 * se`
    pub ci: f64,
}

impl ScalingRow {
    pub fn lower(&self) -> f64 {
        self.mean - self.ci
    }

    pub fn upper(&self) -> f64 {
        self.mean + self.ci
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingTable {
    pub metric: Metric,
    pub indexing: IndexingFilter,
    /// Rows dropped for lack of a dataset size
    pub unsized_rows: usize,
    pub rows: Vec<ScalingRow>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScalingOptions {
    pub metric: Metric,
    pub indexing: IndexingFilter,
    /// Restrict to these variants; empty means all
    pub variants: Vec<String>,
}

impl Default for ScalingOptions {
    fn default() -> Self {
        Self {
            metric: Metric::ExecutionMs,
            indexing: IndexingFilter::Both,
            variants: Vec::new(),
        }
    }
}

pub fn scaling_intervals(
    results: &ResultSet,
    options: &ScalingOptions,
) -> AnalysisResult<ScalingTable> {
    let mut groups: BTreeMap<(&str, Series, u64), Vec<f64>> = BTreeMap::new();
    let mut unsized_rows = 0usize;

    for m in &results.rows {
        let info = m.label_info();
        let Some(size) = info.size else {
            unsized_rows += 1;
            continue;
        };
        let Some(series) = info.series() else {
            continue;
        };
        if !options.indexing.accepts(series.indexing) {
            continue;
        }
        if !options.variants.is_empty() && !options.variants.iter().any(|v| v == &m.variant) {
            continue;
        }

        let values = groups.entry((m.variant.as_str(), series, size)).or_default();
        if let Some(value) = m.metric(options.metric) {
            values.push(value);
        }
    }

    if unsized_rows > 0 {
        tracing::warn!("Some labels lacked N; dropped {} rows", unsized_rows);
    }
    if groups.is_empty() {
        return Err(AnalysisError::EmptySelection(format!(
            "no sized rows for {} with indexing = {:?}",
            options.metric.column(),
            options.indexing
        )));
    }

    let mut rows: Vec<ScalingRow> = groups
        .into_iter()
        .map(|((variant, series, size), values)| interval_row(variant, series, size, &values))
        .collect();
    rows.sort_by(|a, b| {
        compare_variants(&a.variant, &b.variant)
            .then(a.series.cmp(&b.series))
            .then(a.size.cmp(&b.size))
    });

    Ok(ScalingTable {
        metric: options.metric,
        indexing: options.indexing,
        unsized_rows,
        rows,
    })
}

fn interval_row(variant: &str, series: Series, size: u64, values: &[f64]) -> ScalingRow {
    let count = values.iter().filter(|v| v.is_finite()).count();
    let mean = stats::mean(values).unwrap_or(f64::NAN);
    let sd = stats::sample_sd(values);
    let se = sd / (count.max(1) as f64).sqrt();

    ScalingRow {
        variant: variant.to_string(),
        family: family(variant),
        series,
        size,
        count,
        mean,
        sd,
        se,
        ci: Z_95 * se,
    }
}

impl Tabular for ScalingTable {
    fn title(&self) -> String {
        format!(
            "Scaling of {} by dataset size (mean ± 1.96·SE)",
            self.metric.column()
        )
    }

    fn subtitle(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut families: Vec<&str> = self.rows.iter().map(|r| r.family.as_str()).collect();
        families.dedup();
        let titled: Vec<String> = families
            .iter()
            .map(|f| format!("{} {}", f, family_title(f)))
            .collect();
        if !titled.is_empty() {
            lines.push(format!("Families: {}", titled.join("; ")));
        }
        if self.unsized_rows > 0 {
            lines.push(format!(
                "{} rows without N= dropped",
                self.unsized_rows
            ));
        }
        lines
    }

    fn headers(&self) -> Vec<&'static str> {
        vec![
            "variant", "series", "size", "count", "mean", "sd", "se", "ci_low", "ci_high",
        ]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::text(&r.variant),
                    Cell::text(r.series.to_string()),
                    Cell::Count(r.size),
                    Cell::Count(r.count as u64),
                    Cell::number(r.mean, 3),
                    Cell::number(r.sd, 3),
                    Cell::number(r.se, 3),
                    Cell::number(r.lower(), 3),
                    Cell::number(r.upper(), 3),
                ]
            })
            .collect()
    }
}

//! Relative speed notes: "REL faster by X%" per scenario
//!
//! Works on a wide table with one row per variant and the p95 latency of
//! each of the four designs. The wide table is either computed from raw
//! measurements or read from a CSV with the columns
//! `variant, jsonb_ind, jsonb_unind, rel_ind, rel_unind`.

use crate::error::{AnalysisError, AnalysisResult};
use crate::measurement::{ResultSet, Series};
use crate::scenario::compare_variants;
use crate::stats;
use crate::table::{Cell, Tabular};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

/// Shown when a note cannot be computed
pub const MISSING_NOTE: &str = "—";

const WIDE_COLUMNS: [&str; 5] = ["variant", "jsonb_ind", "jsonb_unind", "rel_ind", "rel_unind"];

/// p95 latency of the four designs for one variant
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct WideLatency {
    pub variant: String,
    pub jsonb_ind: Option<f64>,
    pub jsonb_unind: Option<f64>,
    pub rel_ind: Option<f64>,
    pub rel_unind: Option<f64>,
}

impl WideLatency {
    fn slot(&mut self, series: Series) -> &mut Option<f64> {
        match series {
            Series::JSONB_INDEXED => &mut self.jsonb_ind,
            Series::JSONB_UNINDEXED => &mut self.jsonb_unind,
            Series::REL_INDEXED => &mut self.rel_ind,
            _ => &mut self.rel_unind,
        }
    }
}

/// Per-variant p95 of every design, optionally for one dataset size
pub fn wide_from_results(results: &ResultSet, size: Option<u64>) -> Vec<WideLatency> {
    let mut samples: BTreeMap<(&str, Series), Vec<f64>> = BTreeMap::new();
    for m in &results.rows {
        let info = m.label_info();
        let Some(series) = info.series() else {
            continue;
        };
        if size.is_some() && info.size != size {
            continue;
        }
        let entry = samples.entry((m.variant.as_str(), series)).or_default();
        if let Some(ms) = m.execution_ms {
            entry.push(ms);
        }
    }

    let mut wide: BTreeMap<&str, WideLatency> = BTreeMap::new();
    for ((variant, series), values) in &samples {
        let row = wide.entry(*variant).or_insert_with(|| WideLatency {
            variant: variant.to_string(),
            ..Default::default()
        });
        *row.slot(*series) = stats::quantile(values, 0.95);
    }

    wide.into_values().collect()
}

/// Read a wide p95 table from disk
pub fn wide_from_csv_path<P: AsRef<Path>>(path: P) -> AnalysisResult<Vec<WideLatency>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    wide_from_csv_reader(file, &path.display().to_string())
}

/// Read a wide p95 table; extra columns (e.g. `family`) are ignored
pub fn wide_from_csv_reader<R: Read>(
    reader: R,
    source_name: &str,
) -> AnalysisResult<Vec<WideLatency>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let mut idx = [0usize; 5];
    for (slot, name) in idx.iter_mut().zip(WIDE_COLUMNS) {
        *slot = headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| AnalysisError::MissingColumn {
                column: name.to_string(),
                source_name: source_name.to_string(),
            })?;
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let number = |i: usize| {
            record
                .get(idx[i])
                .and_then(|cell| cell.parse::<f64>().ok())
                .filter(|v| !v.is_nan())
        };
        rows.push(WideLatency {
            variant: record.get(idx[0]).unwrap_or("").to_string(),
            jsonb_ind: number(1),
            jsonb_unind: number(2),
            rel_ind: number(3),
            rel_unind: number(4),
        });
    }

    tracing::debug!("Read {} wide rows from {}", rows.len(), source_name);
    Ok(rows)
}

/// REL latency as a percentage of the JSONB baseline (100 = same)
///
/// NaN when the baseline is missing or not positive; 0 when the numerator is.
pub fn rel_pct(num: Option<f64>, den: Option<f64>) -> f64 {
    let Some(den) = den.filter(|d| d.is_finite() && *d > 0.0) else {
        return f64::NAN;
    };
    match num.filter(|n| n.is_finite() && *n > 0.0) {
        Some(num) => 100.0 * num / den,
        None => 0.0,
    }
}

/// Human note for a REL percentage
///
/// # Example
/// ```
/// use ledgerbench::relative::speed_note;
///
/// assert_eq!(speed_note(75.0, 0), "REL faster by 25%");
/// assert_eq!(speed_note(130.0, 0), "JSONB faster by 30%");
/// assert_eq!(speed_note(100.2, 0), "Parity");
/// ```
pub fn speed_note(rel_pct: f64, round: u32) -> String {
    if !rel_pct.is_finite() {
        return MISSING_NOTE.to_string();
    }
    let d = round_to(100.0 - rel_pct, round);
    let decimals = round as usize;
    if d > 0.0 {
        format!("REL faster by {:.*}%", decimals, d)
    } else if d < 0.0 {
        format!("JSONB faster by {:.*}%", decimals, d.abs())
    } else {
        "Parity".to_string()
    }
}

fn round_to(value: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (value * scale).round() / scale
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelativeRow {
    pub variant: String,
    pub rel_indexed_pct: f64,
    pub rel_unindexed_pct: f64,
    pub indexed_note: String,
    pub unindexed_note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelativeTable {
    pub title: Option<String>,
    pub round: u32,
    pub rows: Vec<RelativeRow>,
}

/// Build the notes table, rows in natural scenario order
pub fn relative_table(wide: &[WideLatency], round: u32, title: Option<String>) -> RelativeTable {
    let mut rows: Vec<RelativeRow> = wide
        .iter()
        .map(|w| {
            let rel_indexed_pct = rel_pct(w.rel_ind, w.jsonb_ind);
            let rel_unindexed_pct = rel_pct(w.rel_unind, w.jsonb_unind);
            RelativeRow {
                variant: w.variant.clone(),
                rel_indexed_pct,
                rel_unindexed_pct,
                indexed_note: speed_note(rel_indexed_pct, round),
                unindexed_note: speed_note(rel_unindexed_pct, round),
            }
        })
        .collect();
    rows.sort_by(|a, b| compare_variants(&a.variant, &b.variant));

    RelativeTable { title, round, rows }
}

impl Tabular for RelativeTable {
    fn title(&self) -> String {
        self.title
            .clone()
            .unwrap_or_else(|| "Relative p95 latency, REL vs JSONB".to_string())
    }

    fn headers(&self) -> Vec<&'static str> {
        vec!["Variant", "Indexed", "Unindexed"]
    }

    fn rows(&self) -> Vec<Vec<Cell>> {
        self.rows
            .iter()
            .map(|r| {
                vec![
                    Cell::text(&r.variant),
                    Cell::text(&r.indexed_note),
                    Cell::text(&r.unindexed_note),
                ]
            })
            .collect()
    }
}

//! Benchmark measurements and label parsing
//!
//! A measurement is one row of the exported `bench.results` table: a single
//! query execution for one `(label, variant, run_no)`. Labels encode the
//! dataset size and the storage design, e.g. `N=1000000 rel_indexed`.

use crate::error::{AnalysisError, AnalysisResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::sync::OnceLock;

/// Storage engine under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Jsonb,
    Rel,
}

impl Engine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::Jsonb => "jsonb",
            Engine::Rel => "rel",
        }
    }
}

/// Whether the queried columns carry secondary indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Indexing {
    Indexed,
    Unindexed,
}

impl Indexing {
    pub fn as_str(&self) -> &'static str {
        match self {
            Indexing::Indexed => "indexed",
            Indexing::Unindexed => "unindexed",
        }
    }
}

/// Which indexing modes an analysis includes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum IndexingFilter {
    Both,
    Indexed,
    Unindexed,
}

impl IndexingFilter {
    pub fn accepts(&self, indexing: Indexing) -> bool {
        match self {
            IndexingFilter::Both => true,
            IndexingFilter::Indexed => indexing == Indexing::Indexed,
            IndexingFilter::Unindexed => indexing == Indexing::Unindexed,
        }
    }

    /// Series shown for this filter, jsonb first
    pub fn series(&self) -> Vec<Series> {
        match self {
            IndexingFilter::Indexed => vec![Series::JSONB_INDEXED, Series::REL_INDEXED],
            IndexingFilter::Unindexed => vec![Series::JSONB_UNINDEXED, Series::REL_UNINDEXED],
            IndexingFilter::Both => vec![
                Series::JSONB_INDEXED,
                Series::REL_INDEXED,
                Series::JSONB_UNINDEXED,
                Series::REL_UNINDEXED,
            ],
        }
    }
}

/// Engine × indexing combination, displayed as `jsonb_indexed` etc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Series {
    pub engine: Engine,
    pub indexing: Indexing,
}

impl Series {
    pub const JSONB_INDEXED: Series = Series::new(Engine::Jsonb, Indexing::Indexed);
    pub const JSONB_UNINDEXED: Series = Series::new(Engine::Jsonb, Indexing::Unindexed);
    pub const REL_INDEXED: Series = Series::new(Engine::Rel, Indexing::Indexed);
    pub const REL_UNINDEXED: Series = Series::new(Engine::Rel, Indexing::Unindexed);

    pub const fn new(engine: Engine, indexing: Indexing) -> Self {
        Self { engine, indexing }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.engine.as_str(), self.indexing.as_str())
    }
}

impl Serialize for Series {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Information recovered from a run label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LabelInfo {
    /// Dataset size (`N=...`), if present
    pub size: Option<u64>,
    pub engine: Option<Engine>,
    pub indexing: Option<Indexing>,
}

impl LabelInfo {
    /// Parse a label such as `N=1,000,000 jsonb_unindexed`
    ///
    /// The `<engine>_<indexing>` token is preferred; otherwise loose tokens
    /// (`rel`, `indexed`, ...) are accepted.
    pub fn parse(label: &str) -> Self {
        static SIZE_RE: OnceLock<Regex> = OnceLock::new();
        static SERIES_RE: OnceLock<Regex> = OnceLock::new();
        let size_re =
            SIZE_RE.get_or_init(|| Regex::new(r"\bN\s*=\s*([\d,]+)\b").expect("static regex"));
        let series_re = SERIES_RE.get_or_init(|| {
            Regex::new(r"\b(jsonb|rel)_(unindexed|indexed)\b").expect("static regex")
        });

        let size = size_re
            .captures(label)
            .and_then(|c| c[1].replace(',', "").parse::<u64>().ok());

        let lower = label.trim().to_lowercase();
        if let Some(c) = series_re.captures(&lower) {
            return Self {
                size,
                engine: parse_engine(&c[1]),
                indexing: parse_indexing(&c[2]),
            };
        }

        let tokens: Vec<&str> = lower
            .split(|c: char| c.is_whitespace() || c == '=' || c == ',')
            .filter(|t| !t.is_empty())
            .collect();
        let engine = if tokens.contains(&"jsonb") {
            Some(Engine::Jsonb)
        } else if tokens.contains(&"rel") {
            Some(Engine::Rel)
        } else {
            None
        };
        let indexing = if tokens.contains(&"unindexed") {
            Some(Indexing::Unindexed)
        } else if tokens.contains(&"indexed") {
            Some(Indexing::Indexed)
        } else {
            None
        };

        Self {
            size,
            engine,
            indexing,
        }
    }

    /// Series key, when both engine and indexing are known
    pub fn series(&self) -> Option<Series> {
        Some(Series::new(self.engine?, self.indexing?))
    }
}

fn parse_engine(s: &str) -> Option<Engine> {
    match s {
        "jsonb" => Some(Engine::Jsonb),
        "rel" => Some(Engine::Rel),
        _ => None,
    }
}

fn parse_indexing(s: &str) -> Option<Indexing> {
    match s {
        "indexed" => Some(Indexing::Indexed),
        "unindexed" => Some(Indexing::Unindexed),
        _ => None,
    }
}

/// A single recorded execution
#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub label: String,
    /// Scenario identifier, e.g. `S1_expr_eq_num`
    pub variant: String,
    pub run_no: i64,
    /// Execution time in milliseconds; `None` when the cell was empty or not numeric
    pub execution_ms: Option<f64>,
    pub shared_reads: Option<f64>,
    pub shared_hits: Option<f64>,
}

impl Measurement {
    pub fn label_info(&self) -> LabelInfo {
        LabelInfo::parse(&self.label)
    }

    /// Value of a numeric metric column
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::ExecutionMs => self.execution_ms,
            Metric::SharedReads => self.shared_reads,
            Metric::SharedHits => self.shared_hits,
        }
    }
}

/// Numeric columns that can be aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[value(name = "execution_ms")]
    ExecutionMs,
    #[value(name = "shared_reads")]
    SharedReads,
    #[value(name = "shared_hits")]
    SharedHits,
}

impl Metric {
    pub fn column(&self) -> &'static str {
        match self {
            Metric::ExecutionMs => "execution_ms",
            Metric::SharedReads => "shared_reads",
            Metric::SharedHits => "shared_hits",
        }
    }
}

/// All measurements loaded from one exported results table
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub rows: Vec<Measurement>,
}

impl ResultSet {
    pub fn new(rows: Vec<Measurement>) -> Self {
        Self { rows }
    }

    /// Load a results CSV from disk
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> AnalysisResult<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file, &path.display().to_string())
    }

    /// Load a results CSV from any reader
    ///
    /// Headers are matched case-insensitively. `label`, `variant`, `run_no`
    /// and `execution_ms` are required; the buffer counters are optional.
    /// Numeric cells that fail to parse are kept as missing values.
    pub fn from_csv_reader<R: Read>(reader: R, source_name: &str) -> AnalysisResult<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();
        let required = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| AnalysisError::MissingColumn {
                    column: name.to_string(),
                    source_name: source_name.to_string(),
                })
        };
        let optional = |name: &str| headers.iter().position(|h| h == name);

        let label_idx = required("label")?;
        let variant_idx = required("variant")?;
        let run_idx = required("run_no")?;
        let ms_idx = required("execution_ms")?;
        let reads_idx = optional("shared_reads");
        let hits_idx = optional("shared_hits");

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for record in rdr.records() {
            let record = record?;
            let field = |idx: usize| record.get(idx).unwrap_or("");

            let Some(run_no) = parse_run_no(field(run_idx)) else {
                skipped += 1;
                continue;
            };

            rows.push(Measurement {
                label: field(label_idx).to_string(),
                variant: field(variant_idx).to_string(),
                run_no,
                execution_ms: parse_number(field(ms_idx)),
                shared_reads: reads_idx.and_then(|i| parse_number(field(i))),
                shared_hits: hits_idx.and_then(|i| parse_number(field(i))),
            });
        }

        if skipped > 0 {
            tracing::warn!(
                "Skipped {} rows without a numeric run_no in {}",
                skipped,
                source_name
            );
        }
        tracing::debug!("Loaded {} measurements from {}", rows.len(), source_name);

        Ok(Self { rows })
    }

    /// Rows whose label equals `label` (surrounding whitespace ignored)
    pub fn select<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Measurement> + 'a {
        let wanted = label.trim();
        self.rows.iter().filter(move |m| m.label.trim() == wanted)
    }

    /// Distinct labels in order of first appearance
    pub fn labels(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for m in &self.rows {
            if !seen.contains(&m.label.as_str()) {
                seen.push(&m.label);
            }
        }
        seen
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

fn parse_run_no(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    cell.parse::<i64>().ok().or_else(|| {
        // Spreadsheet exports sometimes write integers as `3.0`
        cell.parse::<f64>()
            .ok()
            .filter(|v| v.fract() == 0.0 && v.is_finite())
            .map(|v| v as i64)
    })
}

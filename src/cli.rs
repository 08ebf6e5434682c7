//! CLI argument parsing for ledgerbench

use crate::config::ConfigLayer;
use crate::distribution::PValueMethod;
use crate::measurement::{IndexingFilter, Metric};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table (default)
    Text,
    /// CSV for spreadsheets and data frames
    Csv,
    /// JSON for machine parsing
    Json,
    /// Self-contained HTML page
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "ledgerbench")]
#[command(version)]
#[command(
    about = "Statistical analysis of JSONB vs relational benchmark results",
    long_about = None
)]
pub struct Cli {
    /// Enable debug tracing output (to stderr)
    #[arg(long = "debug", global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Paired one-sided test: is design A faster than design B by at least delta?
    Superiority(SuperiorityArgs),
    /// Mean/p50/p95 latency and shared buffer hits per scenario and design
    Profile(ProfileArgs),
    /// JSONB/relational p95 ratio per scenario across dataset sizes
    Compare(CompareArgs),
    /// "REL faster by X%" notes per scenario
    Relative(RelativeArgs),
    /// Mean ± 1.96·SE per scenario, design and dataset size
    Scaling(ScalingArgs),
}

/// Where the measurements come from
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// Exported results table (label, variant, run_no, execution_ms, ...)
    #[arg(short = 'r', long = "results", value_name = "CSV")]
    pub results: Option<PathBuf>,

    /// TOML configuration file
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,
}

impl InputArgs {
    /// Command-line configuration layer carrying only the results path
    pub fn config_layer(&self) -> ConfigLayer {
        ConfigLayer {
            results: self.results.clone(),
            ..Default::default()
        }
    }
}

/// Where and how the report is written
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct SuperiorityArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Label of the design under test, e.g. "N=1000000 rel_indexed"
    #[arg(short = 'a', long = "label-a", value_name = "LABEL")]
    pub label_a: Option<String>,

    /// Label of the baseline design, e.g. "N=1000000 jsonb_indexed"
    #[arg(short = 'b', long = "label-b", value_name = "LABEL")]
    pub label_b: Option<String>,

    /// Required speedup as a fraction (0.20 = at least 20% faster)
    #[arg(long = "delta", value_name = "FRACTION")]
    pub delta: Option<f64>,

    /// Significance level
    #[arg(long = "alpha", value_name = "LEVEL")]
    pub alpha: Option<f64>,

    /// Force how p-values are computed
    #[arg(long = "p-value-method", value_enum)]
    pub p_value_method: Option<PValueMethod>,
}

impl SuperiorityArgs {
    /// Command-line configuration layer
    pub fn config_layer(&self) -> ConfigLayer {
        ConfigLayer {
            delta: self.delta,
            alpha: self.alpha,
            label_a: self.label_a.clone(),
            label_b: self.label_b.clone(),
            results: self.input.results.clone(),
            p_value_method: self.p_value_method,
        }
    }
}

#[derive(Args, Debug)]
pub struct ProfileArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Which indexing modes to include
    #[arg(long = "indexing", value_enum, default_value = "indexed")]
    pub indexing: IndexingFilter,

    /// Only rows of this dataset size (N=...)
    #[arg(long = "size", value_name = "ROWS")]
    pub size: Option<u64>,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct RelativeArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Precomputed wide p95 table (variant, jsonb_ind, jsonb_unind, rel_ind, rel_unind)
    #[arg(long = "wide", value_name = "CSV")]
    pub wide: Option<PathBuf>,

    /// Only rows of this dataset size when computing from --results
    #[arg(long = "size", value_name = "ROWS")]
    pub size: Option<u64>,

    /// Decimals kept in the percentage notes
    #[arg(long = "round", default_value_t = 0)]
    pub round: u32,

    /// Table title
    #[arg(long = "title")]
    pub title: Option<String>,
}

#[derive(Args, Debug)]
pub struct ScalingArgs {
    #[command(flatten)]
    pub input: InputArgs,

    #[command(flatten)]
    pub output: OutputArgs,

    /// Metric to aggregate
    #[arg(long = "metric", value_enum, default_value = "execution_ms")]
    pub metric: Metric,

    /// Which indexing modes to include
    #[arg(long = "indexing", value_enum, default_value = "both")]
    pub indexing: IndexingFilter,

    /// Restrict to these variants (e.g. S1_expr_eq_num S4_ts_range)
    #[arg(long = "variants", num_args = 1.., value_name = "VARIANT")]
    pub variants: Vec<String>,
}

//! ledgerbench - statistics for JSONB vs relational storage benchmarks
//!
//! This library loads exported benchmark results (one row per query
//! execution, labelled with dataset size and storage design) and produces
//! the tables used to compare the designs: a paired one-sided superiority
//! test, latency profiles, p95 comparisons across dataset sizes, relative
//! speed notes and scaling confidence intervals.

pub mod cli;
pub mod comparison;
pub mod config;
pub mod csv_output;
pub mod distribution;
pub mod error;
pub mod html_output;
pub mod json_output;
pub mod measurement;
pub mod pairing;
pub mod profile;
pub mod relative;
pub mod report;
pub mod scaling;
pub mod scenario;
pub mod stats;
pub mod superiority;
pub mod table;
pub mod text_output;

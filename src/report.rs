//! Report rendering and delivery
//!
//! Every analysis result implements [`Tabular`] and `Serialize`, so one
//! function renders any of them in any [`OutputFormat`].

use crate::cli::OutputFormat;
use crate::csv_output;
use crate::html_output;
use crate::json_output::JsonOutput;
use crate::table::Tabular;
use crate::text_output;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Render a report; `kind` names the analysis in the JSON envelope
pub fn render<T: Tabular + Serialize>(table: &T, kind: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(text_output::to_text(table)),
        OutputFormat::Csv => csv_output::to_csv(table),
        OutputFormat::Json => JsonOutput::new(kind, table).to_json(),
        OutputFormat::Html => Ok(html_output::to_html(table)),
    }
}

/// Write rendered output to `path`, or to stdout when no path is given
pub fn emit(content: &str, path: Option<&Path>) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!("Wrote report to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("Failed to write report to stdout")?;
            if !content.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
            stdout.flush()?;
        }
    }
    Ok(())
}

//! CSV output format
//!
//! One header row and one record per table row, quoted per RFC 4180.
//! Numbers are written at full precision; NaN becomes an empty field so the
//! file loads cleanly into spreadsheets and data frames.

use crate::table::Tabular;
use anyhow::{Context, Result};

/// Serialize a table as CSV
pub fn to_csv(table: &dyn Tabular) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(table.headers())
        .context("Failed to write CSV header")?;
    for row in table.rows() {
        writer
            .write_record(row.iter().map(|cell| cell.raw()))
            .context("Failed to write CSV record")?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV output: {}", e))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

//! Error types shared by the analysis modules

use thiserror::Error;

/// Errors that abort an analysis
///
/// Per-group problems (too few pairs, zero variance) are not errors: they are
/// encoded in the affected row. Only conditions that make the whole report
/// meaningless end up here.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No paired runs found for '{label_a}' vs '{label_b}'. Check labels and that the results table is populated.")]
    NoData { label_a: String, label_b: String },

    #[error("No rows left after filtering: {0}")]
    EmptySelection(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Missing required column '{column}' in {source_name}")]
    MissingColumn { column: String, source_name: String },

    #[error("p-value method '{0}' is not available in this build")]
    UnavailableMethod(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type AnalysisResult<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_data_message_names_both_labels() {
        let err = AnalysisError::NoData {
            label_a: "N=1000 rel_indexed".to_string(),
            label_b: "N=1000 jsonb_indexed".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("N=1000 rel_indexed"));
        assert!(msg.contains("N=1000 jsonb_indexed"));
    }

    #[test]
    fn test_missing_column_message() {
        let err = AnalysisError::MissingColumn {
            column: "run_no".to_string(),
            source_name: "results.csv".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required column 'run_no' in results.csv"
        );
    }
}

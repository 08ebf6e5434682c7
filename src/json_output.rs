//! JSON output format
//!
//! Wraps any serializable report in a small versioned envelope. serde_json
//! writes non-finite floats (NaN p-values of undersized groups) as `null`.

use serde::Serialize;

/// Envelope written around every report
#[derive(Debug, Serialize)]
pub struct JsonOutput<'a, T: Serialize> {
    /// Crate version that produced the file
    pub version: &'static str,
    pub format: &'static str,
    /// Which analysis produced `data` (e.g. `superiority`)
    pub report: &'a str,
    pub data: &'a T,
}

impl<'a, T: Serialize> JsonOutput<'a, T> {
    pub fn new(report: &'a str, data: &'a T) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            format: "ledgerbench-json-v1",
            report,
            data,
        }
    }

    /// Serialize to a pretty-printed JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Row {
        group: String,
        p_value: f64,
        passes: bool,
    }

    #[test]
    fn test_envelope_fields() {
        let row = Row {
            group: "S1_eq".to_string(),
            p_value: 0.01,
            passes: true,
        };
        let json = JsonOutput::new("superiority", &row).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["format"], "ledgerbench-json-v1");
        assert_eq!(value["report"], "superiority");
        assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));
        assert_eq!(value["data"]["group"], "S1_eq");
        assert_eq!(value["data"]["passes"], true);
    }

    #[test]
    fn test_nan_serialized_as_null() {
        let row = Row {
            group: "S3_trgm".to_string(),
            p_value: f64::NAN,
            passes: false,
        };
        let json = JsonOutput::new("superiority", &row).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["data"]["p_value"].is_null());
    }
}

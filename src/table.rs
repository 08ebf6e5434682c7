//! Tabular view shared by every report
//!
//! Each analysis produces its own strongly typed table; this trait exposes
//! it as headers and cells so the text, CSV and HTML formatters can render
//! any of them.

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Count(u64),
    /// Floating-point value shown with a fixed number of decimals
    Number { value: f64, decimals: usize },
    PValue(f64),
    /// Signed percentage, shown as `+12.3%`
    Percent(f64),
    /// PASS / FAIL decision
    Decision(bool),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    pub fn number(value: f64, decimals: usize) -> Self {
        Cell::Number { value, decimals }
    }

    pub fn optional(value: Option<f64>, decimals: usize) -> Self {
        Cell::number(value.unwrap_or(f64::NAN), decimals)
    }

    /// Human-readable rendering
    pub fn display(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Count(n) => n.to_string(),
            Cell::Number { value, decimals } => format_fixed(*value, *decimals),
            Cell::PValue(p) => format_p_value(*p),
            Cell::Percent(pct) => format_signed_pct(*pct),
            Cell::Decision(true) => "PASS".to_string(),
            Cell::Decision(false) => "FAIL".to_string(),
        }
    }

    /// Machine-readable rendering: full precision, empty for NaN
    pub fn raw(&self) -> String {
        match self {
            Cell::Text(s) => s.clone(),
            Cell::Count(n) => n.to_string(),
            Cell::Number { value, .. } | Cell::PValue(value) | Cell::Percent(value) => {
                format_raw(*value)
            }
            Cell::Decision(b) => b.to_string(),
        }
    }

    /// Whether the cell should be right-aligned
    pub fn is_numeric(&self) -> bool {
        !matches!(self, Cell::Text(_) | Cell::Decision(_))
    }
}

/// Something that can be printed as a table
pub trait Tabular {
    fn title(&self) -> String;

    /// Extra lines printed under the title (thresholds, methods, ...)
    fn subtitle(&self) -> Vec<String> {
        Vec::new()
    }

    fn headers(&self) -> Vec<&'static str>;

    fn rows(&self) -> Vec<Vec<Cell>>;

    /// Rows rendered with emphasis (e.g. pooled totals)
    fn is_emphasized(&self, _row: usize) -> bool {
        false
    }

    /// Footnote printed after the table
    fn footnote(&self) -> Option<String> {
        None
    }
}

pub fn format_fixed(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else {
        format!("{:.*}", decimals, value)
    }
}

/// `1.2e-5` below 1e-4, otherwise four decimals
pub fn format_p_value(p: f64) -> String {
    if !p.is_finite() {
        return "nan".to_string();
    }
    if p < 1e-4 {
        format!("{:.1e}", p)
    } else {
        format!("{:.4}", p)
    }
}

pub fn format_signed_pct(pct: f64) -> String {
    if !pct.is_finite() {
        return "nan".to_string();
    }
    let sign = if pct >= 0.0 { "+" } else { "" };
    format!("{}{:.1}%", sign, pct)
}

/// Shortest round-trip form; scientific notation outside [1e-4, 1e15)
fn format_raw(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else if value.is_infinite() {
        if value > 0.0 { "inf" } else { "-inf" }.to_string()
    } else if value != 0.0 && !(1e-4..1e15).contains(&value.abs()) {
        format!("{:e}", value)
    } else {
        value.to_string()
    }
}

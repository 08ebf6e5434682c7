//! Scenario catalog: families, natural ordering and display titles
//!
//! Benchmark variants are named like `S4_ts_range` or `S10_topn_ts`. The
//! leading `S<k>` is the scenario family; everything after is free text.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// Family used for variants that do not start with `S<k>`
pub const OTHER_FAMILY: &str = "Other";

fn family_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^S(\d+)").expect("static regex"))
}

/// Sort key placing `S1 < S2 < ... < S10` before any non-numbered variant
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum ScenarioKey {
    Numbered(u32),
    Named(String),
}

/// Natural sort key of a variant name
pub fn scenario_key(variant: &str) -> ScenarioKey {
    family_regex()
        .captures(variant)
        .and_then(|c| c[1].parse::<u32>().ok())
        .map(ScenarioKey::Numbered)
        .unwrap_or_else(|| ScenarioKey::Named(variant.to_string()))
}

/// Compare two variants in natural scenario order, falling back to the full name
pub fn compare_variants(a: &str, b: &str) -> Ordering {
    scenario_key(a)
        .cmp(&scenario_key(b))
        .then_with(|| a.cmp(b))
}

/// Scenario family (`S4` for `S4_ts_range`), or [`OTHER_FAMILY`]
pub fn family(variant: &str) -> String {
    family_regex()
        .find(variant)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| OTHER_FAMILY.to_string())
}

/// Human-readable title of a scenario family
pub fn family_title(family: &str) -> &str {
    match family {
        "S1" => "Equality + Numeric Inequality",
        "S2" => "LIKE Prefix Search",
        "S3" => "Substring Contains (trigram)",
        "S4" => "Timestamp Range",
        "S5" => "Array AND (contain both)",
        "S6" => "Array OR (overlap)",
        "S7" => "Multi-key AND (2 keys)",
        "S8" => "Multi-key AND (3 keys)",
        "S9" => "OR across keys",
        "S10" => "Top-N by timestamp",
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_extraction() {
        assert_eq!(family("S4_ts_range"), "S4");
        assert_eq!(family("S10_topn_ts"), "S10");
        assert_eq!(family("warmup"), OTHER_FAMILY);
    }

    #[test]
    fn test_natural_order_numbers_before_names() {
        let mut variants = vec!["S10_topn", "custom", "S2_like", "S1_eq"];
        variants.sort_by(|a, b| compare_variants(a, b));
        assert_eq!(variants, vec!["S1_eq", "S2_like", "S10_topn", "custom"]);
    }

    #[test]
    fn test_same_family_falls_back_to_name() {
        assert_eq!(compare_variants("S1_a", "S1_b"), Ordering::Less);
    }

    #[test]
    fn test_family_title() {
        assert_eq!(family_title("S4"), "Timestamp Range");
        assert_eq!(family_title("S99"), "S99");
    }
}

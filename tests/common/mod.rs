// Shared fixtures for the integration tests
//
// Builds a small but realistic results export: two scenarios, two dataset
// sizes and all four storage designs. In S1 the relational design is about
// 30% faster than JSONB; in S2 it is about 5% slower.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::PathBuf;
use tempfile::TempDir;

pub const REL_1K: &str = "N=1000 rel_indexed";
pub const JSONB_1K: &str = "N=1000 jsonb_indexed";

pub const RUNS: i64 = 8;

/// Results table as CSV text
pub fn results_csv() -> String {
    let mut csv = String::from("label,variant,run_no,execution_ms,shared_reads,shared_hits,ts\n");
    for size in [1000u64, 100000] {
        let scale = if size == 1000 { 1.0 } else { 12.0 };
        for run in 1..=RUNS {
            let jsonb = scale * (10.0 + run as f64 * 0.1);
            let s1_rel = jsonb * 0.70 * (1.0 + 0.01 * (run % 3) as f64);
            let s2_rel = jsonb * 1.05 * (1.0 + 0.01 * (run % 2) as f64);

            let rows = [
                ("jsonb_indexed", "S1_eq", jsonb, 40),
                ("rel_indexed", "S1_eq", s1_rel, 12),
                ("jsonb_indexed", "S2_like", jsonb, 55),
                ("rel_indexed", "S2_like", s2_rel, 60),
                ("jsonb_unindexed", "S1_eq", jsonb * 4.0, 900),
                ("rel_unindexed", "S1_eq", jsonb * 2.0, 400),
            ];
            for (design, variant, ms, hits) in rows {
                writeln!(
                    csv,
                    "N={} {},{},{},{:.4},0,{},2025-01-0{} 10:00:00",
                    size,
                    design,
                    variant,
                    run,
                    ms,
                    hits,
                    run.min(9)
                )
                .unwrap();
            }
        }
    }
    csv
}

/// Temporary directory holding `results.csv`
pub struct Fixture {
    pub dir: TempDir,
    pub results: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_contents(&results_csv())
    }

    pub fn with_contents(contents: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let results = dir.path().join("results.csv");
        std::fs::write(&results, contents).unwrap();
        Self { dir, results }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

// Paired one-sided superiority testing
//
// Decides, per scenario and pooled, whether design A is faster than design B
// by at least a target fraction delta. Each paired run contributes
// ln(A_ms / B_ms); a one-sample t-test checks
//
//     H0: E[log_ratio] >= ln(1 - delta)
//     H1: E[log_ratio] <  ln(1 - delta)
//
// and the decision is PASS when the one-sided p-value is below alpha.
// Working on the log scale makes a 2x speedup and a 2x slowdown symmetric,
// and pairing by (variant, run_no) cancels run-to-run drift.

mod config;
mod statistics;
mod verdict;

pub use config::{SuperiorityConfig, DEFAULT_ALPHA, DEFAULT_DELTA};
pub use statistics::{one_sided_t_test, Alternative, OneSidedTest, SampleMoments};
pub use verdict::{
    assess_superiority, run_superiority, summarize_group, GroupSummary, SuperiorityTable,
    OVERALL_GROUP,
};

#[cfg(test)]
mod tests;

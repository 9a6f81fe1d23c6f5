pub mod json;
pub mod markdown;
pub mod terminal;

pub use json::JsonWriter;
pub use markdown::MarkdownWriter;
pub use terminal::TerminalWriter;

use crate::analysis::{CombinedPair, TestOutcome};

/// Fixed-point for ordinary p-values, scientific notation for tiny ones.
pub fn format_p_value(p: f64) -> String {
    if p != 0.0 && p < 1e-4 {
        format!("{:.3e}", p)
    } else {
        format!("{:.4}", p)
    }
}

pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value)
}

/// One-line description of a test outcome.
pub fn describe_outcome(outcome: &TestOutcome) -> String {
    match outcome {
        TestOutcome::Tested(result) => format!(
            "chi2 = {:.4}, p = {}, dof = {}, significant: {}",
            result.statistic,
            format_p_value(result.p_value),
            result.dof,
            result.significance_label()
        ),
        TestOutcome::Skipped(reason) => format!("skipped: {}", reason.describe()),
    }
}

/// Cells of a combined p-value row: statistic, p-value, significance.
pub fn combined_cells(pair: &CombinedPair) -> [String; 3] {
    match &pair.outcome {
        Ok(combined) => [
            format!("{:.4}", combined.statistic),
            format_p_value(combined.p_value),
            if combined.p_value < crate::analysis::SIGNIFICANCE_LEVEL {
                "Yes".to_string()
            } else {
                "No".to_string()
            },
        ],
        Err(message) => ["-".to_string(), "-".to_string(), message.clone()],
    }
}

//! Utility functions and structures for running the solver.

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::local_search::Operator;
use crate::problem::Problem;
use crate::solution::Solution;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Save a solution as JSON in the persisted shape.
pub fn save_solution<P: AsRef<Path>>(solution: &Solution, problem: &Problem, path: P) -> Result<()> {
    solution.to_record(problem).save(path)
}

/// Attempts and acceptances of one operator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OperatorStats {
    pub accepted: u32,
    pub saved: u64,
}

/// Statistics about the search process.
#[derive(Debug, Clone, Default)]
pub struct SearchStatistics {
    pub iterations: u32,
    pub runtime: Duration,
    pub initial_cost: u64,
    pub best_cost: u64,
    pub antennas: usize,
    pub oracle_checks: u32,
    pub oracle_disagreements: u32,
    pub operators: BTreeMap<Operator, OperatorStats>,
}

impl SearchStatistics {
    /// Record an accepted move.
    pub fn record(&mut self, operator: Operator, previous_cost: u64, cost: u64) {
        let entry = self.operators.entry(operator).or_default();
        entry.accepted += 1;
        entry.saved += previous_cost.saturating_sub(cost);
    }

    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        let mut text = format!(
            "Search Statistics:
- Iterations: {}
- Runtime: {}
- Initial Cost: {}
- Best Cost: {}
- Antennas: {}
- Oracle Checks: {} ({} disagreements)",
            self.iterations,
            format_duration(self.runtime),
            self.initial_cost,
            self.best_cost,
            self.antennas,
            self.oracle_checks,
            self.oracle_disagreements
        );
        for (operator, stats) in &self.operators {
            text.push_str(&format!(
                "\n- {}: {} accepted, {} saved",
                operator, stats.accepted, stats.saved
            ));
        }
        text
    }
}

//! Configuration parameters for construction and local search.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Order in which the constructor packs in-range buildings into a new antenna.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PackingOrder {
    /// Smallest demand first, maximising the number of buildings served
    DemandAscending,
    /// Largest demand first
    DemandDescending,
    /// Closest to the antenna first
    Distance,
}

/// Relative selection weights of the local search operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorWeights {
    pub optimize_type: u32,
    pub merge: u32,
    pub remove: u32,
}

impl Default for OperatorWeights {
    fn default() -> Self {
        OperatorWeights {
            optimize_type: 3,
            merge: 2,
            remove: 1,
        }
    }
}

/// Configuration settings for the antenna placement solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seed of the pseudo-random source threaded through the run
    pub seed: u64,
    /// Edge length of a spatial index cell
    pub cell_size: i64,
    /// Uncovered buildings sampled as candidate positions per greedy round
    pub candidate_sample_size: usize,
    /// Also try the centroid of each candidate's neighbourhood
    pub centroid_candidates: bool,
    /// Packing order used by the constructor
    pub packing_order: PackingOrder,
    /// Exponent applied to the covered count when ranking placements
    pub coverage_exponent: f64,
    /// Operator selection weights
    pub operator_weights: OperatorWeights,
    /// Operator draws per improvement step before giving up
    pub attempts_per_step: usize,
    /// Antennas examined by one OPTIMIZE_TYPE draw
    pub optimize_candidates: usize,
    /// On-building positions tried when re-placing an antenna
    pub relocation_candidates: usize,
    /// Maximum distance between two antennas considered for merging
    pub merge_radius: i64,
    /// Antennas examined by one MERGE draw
    pub merge_candidates: usize,
    /// Antennas examined by one REMOVE draw
    pub remove_candidates: usize,
    /// Re-score every n-th accepted step with the oracle (0 only scores the end of a run)
    pub oracle_interval: u32,
    /// Hard cap on improvement steps
    pub max_iterations: u32,
    /// Stop after this many consecutive steps without improvement
    pub max_iterations_without_improvement: u32,
    /// Optional time limit for the improvement phase
    pub time_limit: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: 42,
            cell_size: 100,
            candidate_sample_size: 20,
            centroid_candidates: true,
            packing_order: PackingOrder::DemandAscending,
            coverage_exponent: 1.0,
            operator_weights: OperatorWeights::default(),
            attempts_per_step: 10,
            optimize_candidates: 16,
            relocation_candidates: 8,
            merge_radius: 200,
            merge_candidates: 10,
            remove_candidates: 10,
            oracle_interval: 1,
            max_iterations: 1000,
            max_iterations_without_improvement: 100,
            time_limit: None,
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Config::default()
    }

    /// Load a configuration from a JSON file; missing fields take defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the spatial index cell size.
    pub fn with_cell_size(mut self, size: i64) -> Self {
        self.cell_size = size;
        self
    }

    /// Set the number of sampled candidate positions per greedy round.
    pub fn with_candidate_sample_size(mut self, size: usize) -> Self {
        self.candidate_sample_size = size;
        self
    }

    /// Enable or disable centroid candidates.
    pub fn with_centroid_candidates(mut self, enabled: bool) -> Self {
        self.centroid_candidates = enabled;
        self
    }

    /// Set the packing order.
    pub fn with_packing_order(mut self, order: PackingOrder) -> Self {
        self.packing_order = order;
        self
    }

    /// Set the coverage exponent of the placement score.
    pub fn with_coverage_exponent(mut self, exponent: f64) -> Self {
        self.coverage_exponent = exponent;
        self
    }

    /// Set the operator weights.
    pub fn with_operator_weights(mut self, weights: OperatorWeights) -> Self {
        self.operator_weights = weights;
        self
    }

    /// Set the operator draws per step.
    pub fn with_attempts_per_step(mut self, attempts: usize) -> Self {
        self.attempts_per_step = attempts;
        self
    }

    /// Set the merge radius.
    pub fn with_merge_radius(mut self, radius: i64) -> Self {
        self.merge_radius = radius;
        self
    }

    /// Set how often the oracle re-scores accepted steps.
    pub fn with_oracle_interval(mut self, interval: u32) -> Self {
        self.oracle_interval = interval;
        self
    }

    /// Set the maximum number of improvement steps.
    pub fn with_max_iterations(mut self, iterations: u32) -> Self {
        self.max_iterations = iterations;
        self
    }

    /// Set the maximum iterations without improvement.
    pub fn with_max_iterations_without_improvement(mut self, iterations: u32) -> Self {
        self.max_iterations_without_improvement = iterations;
        self
    }

    /// Set the time limit.
    pub fn with_time_limit(mut self, duration: Duration) -> Self {
        self.time_limit = Some(duration);
        self
    }
}

//! # Antenna placement
//!
//! A heuristic solver for capacitated antenna placement: every building must
//! be served by exactly one antenna that reaches it and has capacity left for
//! its peak, off-peak and night demand, at minimum installation cost.
//!
//! A greedy set-cover constructor produces a feasible starting point. Local
//! search then repeatedly tries to downgrade, merge or remove antennas, keeping
//! a mutation only when it validates and strictly lowers the cost. An optional
//! external oracle re-scores accepted solutions and wins any disagreement.
//!
//! Runs are reproducible: one seeded [`rand_chacha::ChaCha8Rng`] is threaded
//! through construction and every step.

pub mod antenna;
pub mod config;
pub mod error;
pub mod greedy;
pub mod local_search;
pub mod oracle;
pub mod problem;
pub mod record;
pub mod solution;
pub mod spatial;
pub mod utils;

use crate::config::Config;
use crate::error::{Result, SolverError};
use crate::greedy::GreedyConstructor;
use crate::local_search::{LocalSearch, Operator, StepOutcome};
use crate::oracle::{check_agreement, FeasibilityOracle};
use crate::problem::Problem;
use crate::record::DatasetRecord;
use crate::solution::Solution;
use crate::utils::SearchStatistics;

use log::{error, info};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::{Duration, Instant};

/// Drives construction and improvement steps for one problem instance.
pub struct AntennaSolver {
    pub problem: Problem,
    pub config: Config,
    pub local_search: LocalSearch,
    /// The solution steps start from
    pub current: Option<Solution>,
    /// The last solution the oracle agreed with
    pub confirmed: Option<Solution>,
    pub statistics: SearchStatistics,
    pub iterations_without_improvement: u32,
    pub start_time: Instant,
    /// Accepted moves not yet confirmed: operator, previous cost, new cost
    unconfirmed: Vec<(Operator, u64, u64)>,
    rng: ChaCha8Rng,
    oracle: Option<Box<dyn FeasibilityOracle>>,
    dataset: DatasetRecord,
}

impl AntennaSolver {
    /// Create a solver for the given problem and configuration.
    pub fn new(problem: Problem, config: Config) -> Self {
        let dataset = problem.to_record();
        AntennaSolver {
            local_search: LocalSearch::new(&config),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            problem,
            config,
            current: None,
            confirmed: None,
            statistics: SearchStatistics::default(),
            iterations_without_improvement: 0,
            start_time: Instant::now(),
            unconfirmed: Vec::new(),
            oracle: None,
            dataset,
        }
    }

    /// Attach an external oracle used to confirm accepted solutions.
    pub fn with_oracle(mut self, oracle: Box<dyn FeasibilityOracle>) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Start from an existing solution instead of constructing one.
    ///
    /// The solution is only checked locally here. It becomes the confirmed
    /// solution once the oracle, if any, has scored it on the first step.
    pub fn with_initial_solution(mut self, solution: Solution) -> Result<Self> {
        solution.validate(&self.problem)?;
        let cost = solution.cost();
        self.statistics.initial_cost = cost;
        self.statistics.best_cost = cost;
        self.statistics.antennas = solution.antenna_count();
        self.confirmed = None;
        self.current = Some(solution);
        Ok(self)
    }

    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Build the initial solution and make it the current one.
    pub fn generate_initial(&mut self) -> Result<&Solution> {
        let solution = GreedyConstructor::new(&self.problem, &self.config).build(&mut self.rng);
        solution.validate(&self.problem)?;

        let cost = solution.cost();
        info!(
            "Initial solution: {} antennas, cost {}",
            solution.antenna_count(),
            cost
        );
        self.confirm_initial(&solution)?;

        self.statistics.initial_cost = cost;
        self.statistics.best_cost = cost;
        self.statistics.antennas = solution.antenna_count();
        Ok(&*self.current.insert(solution))
    }

    /// Have the oracle score a starting solution and confirm it.
    fn confirm_initial(&mut self, solution: &Solution) -> Result<()> {
        if let Some(oracle) = &self.oracle {
            let cost = solution.cost();
            let score = oracle.score(&solution.to_record(&self.problem), &self.dataset)?;
            self.statistics.oracle_checks += 1;
            if let Err(err) = check_agreement(cost, &score) {
                self.statistics.oracle_disagreements += 1;
                error!("Initial solution rejected by oracle: {}", err);
                return Err(err);
            }
        }

        self.confirmed = Some(solution.clone());
        self.unconfirmed.clear();
        Ok(())
    }

    /// Make sure there is a confirmed solution to search from.
    fn ensure_started(&mut self) -> Result<()> {
        if self.confirmed.is_some() {
            return Ok(());
        }
        let Some(solution) = self.current.take() else {
            self.generate_initial()?;
            return Ok(());
        };
        let verdict = self.confirm_initial(&solution);
        self.current = Some(solution);
        verdict
    }

    /// Apply one improvement step. Returns whether the cost went down.
    pub fn step(&mut self) -> Result<bool> {
        self.ensure_started()?;
        let current = self
            .current
            .as_ref()
            .ok_or_else(|| SolverError::Structural("no current solution".to_string()))?;

        let outcome = self.local_search.step(current, &self.problem, &mut self.rng);
        self.statistics.iterations += 1;

        match outcome {
            StepOutcome::Improved {
                solution,
                operator,
                previous_cost,
                cost,
            } => {
                info!(
                    "Iteration {}: {} lowered cost {} -> {}",
                    self.statistics.iterations, operator, previous_cost, cost
                );
                self.statistics.best_cost = cost;
                self.statistics.antennas = solution.antenna_count();
                self.current = Some(solution);
                self.unconfirmed.push((operator, previous_cost, cost));

                let interval = self.config.oracle_interval as usize;
                let due = interval > 0 && self.unconfirmed.len() >= interval;
                if !self.has_oracle() || due {
                    self.confirm()?;
                }
                self.iterations_without_improvement = 0;
                Ok(true)
            }
            StepOutcome::Unchanged => {
                self.iterations_without_improvement += 1;
                Ok(false)
            }
        }
    }

    /// Re-score the current solution with the oracle, rolling back to the
    /// last confirmed solution on any disagreement.
    pub fn confirm(&mut self) -> Result<()> {
        let Some(current) = &self.current else {
            return Ok(());
        };

        let Some(oracle) = &self.oracle else {
            self.confirmed = Some(current.clone());
            self.commit_unconfirmed();
            return Ok(());
        };

        let local_cost = current.cost();
        let verdict = oracle
            .score(&current.to_record(&self.problem), &self.dataset)
            .and_then(|score| check_agreement(local_cost, &score));
        self.statistics.oracle_checks += 1;

        match verdict {
            Ok(()) => {
                self.confirmed = Some(current.clone());
                self.commit_unconfirmed();
                Ok(())
            }
            Err(err) => {
                if matches!(err, SolverError::OracleDisagreement { .. }) {
                    self.statistics.oracle_disagreements += 1;
                }
                error!("Rolling back to last confirmed solution: {}", err);
                self.unconfirmed.clear();
                self.current = self.confirmed.clone();
                if let Some(solution) = &self.current {
                    self.statistics.best_cost = solution.cost();
                    self.statistics.antennas = solution.antenna_count();
                }
                Err(err)
            }
        }
    }

    /// Count confirmed moves in the per-operator statistics.
    fn commit_unconfirmed(&mut self) {
        for (operator, previous_cost, cost) in self.unconfirmed.drain(..) {
            self.statistics.record(operator, previous_cost, cost);
        }
    }

    /// Construct, then improve until a termination criterion is met.
    ///
    /// Accepted moves the oracle has not scored yet are confirmed before
    /// returning, whatever the oracle interval.
    pub fn run(&mut self) -> Result<&Solution> {
        self.start_time = Instant::now();
        self.ensure_started()?;

        while !self.should_terminate() {
            self.step()?;
        }

        if !self.unconfirmed.is_empty() {
            self.confirm()?;
        }

        self.statistics.runtime = self.start_time.elapsed();
        info!(
            "Search finished after {} iterations: cost {}",
            self.statistics.iterations, self.statistics.best_cost
        );

        self.current
            .as_ref()
            .ok_or_else(|| SolverError::Structural("no solution produced".to_string()))
    }

    /// The solution the next step will start from.
    pub fn best_solution(&self) -> Option<&Solution> {
        self.current.as_ref()
    }

    /// Time spent since the last call to `run`.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Check if the termination criteria are met.
    fn should_terminate(&self) -> bool {
        if self.statistics.iterations >= self.config.max_iterations {
            return true;
        }

        if self.iterations_without_improvement >= self.config.max_iterations_without_improvement {
            return true;
        }

        if let Some(time_limit) = self.config.time_limit {
            if self.start_time.elapsed() >= time_limit {
                return true;
            }
        }

        false
    }
}

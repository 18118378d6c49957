//! Local search operators for antenna placement.
//!
//! A step draws an operator, lets it propose a move against the current
//! solution, applies the move to a copy, validates the copy and returns it only
//! if it is feasible and strictly cheaper. The input solution is never touched,
//! so a rejected move leaves nothing behind.

pub mod merge;
pub mod optimize_type;
pub mod remove;
pub mod utils;

use log::{debug, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use std::fmt;

use crate::antenna::AntennaType;
use crate::config::Config;
use crate::problem::Problem;
use crate::solution::{Antenna, AntennaId, Solution};

/// The three operator families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operator {
    OptimizeType,
    Merge,
    Remove,
}

impl Operator {
    pub const ALL: [Operator; 3] = [Operator::OptimizeType, Operator::Merge, Operator::Remove];
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::OptimizeType => "OPTIMIZE_TYPE",
            Operator::Merge => "MERGE",
            Operator::Remove => "REMOVE",
        };
        f.write_str(name)
    }
}

/// A proposed mutation, described without touching the solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Move {
    /// Give an antenna a new type and/or position, keeping its buildings
    Reconfigure {
        antenna: AntennaId,
        kind: AntennaType,
        x: i64,
        y: i64,
    },
    /// Replace two antennas with one serving the union of their buildings
    Merge {
        first: AntennaId,
        second: AntennaId,
        kind: AntennaType,
        x: i64,
        y: i64,
    },
    /// Delete an antenna, handing each of its buildings to another antenna
    Remove {
        antenna: AntennaId,
        reassignment: Vec<(usize, AntennaId)>,
    },
}

impl Move {
    pub fn operator(&self) -> Operator {
        match self {
            Move::Reconfigure { .. } => Operator::OptimizeType,
            Move::Merge { .. } => Operator::Merge,
            Move::Remove { .. } => Operator::Remove,
        }
    }
}

/// Result of one improvement step.
#[derive(Debug, Clone)]
pub enum StepOutcome {
    Improved {
        solution: Solution,
        operator: Operator,
        previous_cost: u64,
        cost: u64,
    },
    Unchanged,
}

impl StepOutcome {
    pub fn is_improved(&self) -> bool {
        matches!(self, StepOutcome::Improved { .. })
    }
}

/// Manages the local search phase.
#[derive(Debug, Clone)]
pub struct LocalSearch {
    config: Config,
}

impl LocalSearch {
    /// Create a new local search instance.
    pub fn new(config: &Config) -> Self {
        LocalSearch {
            config: config.clone(),
        }
    }

    /// Try to find one strictly improving, feasible mutation of `solution`.
    pub fn step<R: Rng + ?Sized>(
        &self,
        solution: &Solution,
        problem: &Problem,
        rng: &mut R,
    ) -> StepOutcome {
        if solution.is_empty() {
            return StepOutcome::Unchanged;
        }
        let previous_cost = solution.cost();

        for _ in 0..self.config.attempts_per_step {
            let Some(operator) = self.select_operator(rng) else {
                return StepOutcome::Unchanged;
            };
            let Some(mv) = self.propose(operator, solution, problem, rng) else {
                continue;
            };

            let candidate = self.apply(solution, &mv, problem);
            if let Err(err) = candidate.validate(problem) {
                warn!("Rejected {} move {:?}: {}", operator, mv, err);
                continue;
            }

            let cost = candidate.cost();
            if cost < previous_cost {
                debug!("{} improved cost {} -> {}", operator, previous_cost, cost);
                return StepOutcome::Improved {
                    solution: candidate,
                    operator,
                    previous_cost,
                    cost,
                };
            }
            debug!("{} proposal did not lower the cost ({})", operator, cost);
        }

        StepOutcome::Unchanged
    }

    /// Weighted random choice of the next operator; `None` if all weights are zero.
    pub fn select_operator<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Operator> {
        let weights = self.config.operator_weights;
        let dist = WeightedIndex::new([weights.optimize_type, weights.merge, weights.remove]).ok()?;
        Some(Operator::ALL[dist.sample(rng)])
    }

    /// Ask a single operator for a move.
    pub fn propose<R: Rng + ?Sized>(
        &self,
        operator: Operator,
        solution: &Solution,
        problem: &Problem,
        rng: &mut R,
    ) -> Option<Move> {
        match operator {
            Operator::OptimizeType => self.optimize_type_move(solution, problem, rng),
            Operator::Merge => self.merge_move(solution, problem, rng),
            Operator::Remove => self.remove_move(solution, problem, rng),
        }
    }

    /// Apply a move to a copy of `solution`.
    pub fn apply(&self, solution: &Solution, mv: &Move, problem: &Problem) -> Solution {
        let mut next = solution.clone();

        match mv {
            Move::Reconfigure { antenna, kind, x, y } => {
                next.reconfigure(*antenna, *kind, *x, *y, problem);
            }
            Move::Merge {
                first,
                second,
                kind,
                x,
                y,
            } => {
                let a = next.remove_antenna(*first);
                let b = next.remove_antenna(*second);
                let buildings = a
                    .into_iter()
                    .chain(b)
                    .flat_map(|antenna| antenna.buildings.into_iter());
                next.add_antenna(Antenna::with_buildings(*kind, *x, *y, buildings, problem));
            }
            Move::Remove {
                antenna,
                reassignment,
            } => {
                next.remove_antenna(*antenna);
                for &(building, target) in reassignment {
                    next.assign_building(target, building, problem);
                }
            }
        }

        next
    }
}

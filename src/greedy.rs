//! Greedy set-cover style construction of an initial feasible solution.
//!
//! Each round samples a handful of uncovered buildings as candidate positions,
//! evaluates opening every antenna type there and commits the placement with
//! the best coverage-per-cost ratio. Rounds repeat until every building is
//! served. There is no backtracking.

use itertools::Itertools;
use log::debug;
use rand::Rng;
use std::collections::BTreeSet;

use crate::antenna::{distance_squared, AntennaType, Load};
use crate::config::{Config, PackingOrder};
use crate::problem::Problem;
use crate::solution::{Antenna, Solution};

/// A scored candidate placement.
#[derive(Debug, Clone)]
pub struct Placement {
    pub kind: AntennaType,
    pub x: i64,
    pub y: i64,
    /// Buildings the antenna would serve, in packing order
    pub covered: Vec<usize>,
    pub cost: u64,
    pub score: f64,
}

/// Builds the initial solution.
pub struct GreedyConstructor<'a> {
    problem: &'a Problem,
    config: &'a Config,
}

impl<'a> GreedyConstructor<'a> {
    pub fn new(problem: &'a Problem, config: &'a Config) -> Self {
        GreedyConstructor { problem, config }
    }

    /// Cover every building, returning a feasible solution.
    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Solution {
        let mut solution = Solution::new(self.config.cell_size);
        let mut remaining: BTreeSet<usize> = (0..self.problem.building_count()).collect();

        while !remaining.is_empty() {
            let positions = self.candidate_positions(&remaining, rng);

            let best = positions
                .iter()
                .flat_map(|&(x, y)| AntennaType::ALL.into_iter().map(move |kind| (kind, x, y)))
                .filter_map(|(kind, x, y)| self.evaluate(kind, x, y, &remaining))
                .fold(None::<Placement>, |best, candidate| match best {
                    Some(b) if b.score >= candidate.score => Some(b),
                    _ => Some(candidate),
                });

            let Some(placement) = best else {
                self.cover_individually(&mut solution, &mut remaining);
                break;
            };

            let placement = self.snap_to_building(placement);
            debug!(
                "Placing {} at ({}, {}) covering {} buildings for {}",
                placement.kind,
                placement.x,
                placement.y,
                placement.covered.len(),
                placement.cost
            );

            for b in &placement.covered {
                remaining.remove(b);
            }
            solution.add_antenna(Antenna::with_buildings(
                placement.kind,
                placement.x,
                placement.y,
                placement.covered,
                self.problem,
            ));
        }

        solution
    }

    /// Positions worth trying this round: sampled uncovered buildings plus,
    /// optionally, the centroid of each one's uncovered neighbourhood.
    fn candidate_positions<R: Rng + ?Sized>(
        &self,
        remaining: &BTreeSet<usize>,
        rng: &mut R,
    ) -> Vec<(i64, i64)> {
        let pool: Vec<usize> = remaining.iter().copied().collect();
        let sample_size = self.config.candidate_sample_size.max(1);

        let sampled: Vec<usize> = if pool.len() > sample_size {
            let mut picks = rand::seq::index::sample(rng, pool.len(), sample_size).into_vec();
            picks.sort_unstable();
            picks.into_iter().map(|i| pool[i]).collect()
        } else {
            pool
        };

        let mut positions = Vec::with_capacity(sampled.len() * 2);
        for &b in &sampled {
            let building = &self.problem.buildings[b];
            positions.push((building.x, building.y));

            if self.config.centroid_candidates {
                let neighbourhood: Vec<usize> = self
                    .problem
                    .buildings_within(building.x, building.y, AntennaType::Density.range())
                    .into_iter()
                    .filter(|n| remaining.contains(n))
                    .collect();
                if neighbourhood.len() > 1 {
                    positions.push(self.problem.centroid(&neighbourhood));
                }
            }
        }

        positions.into_iter().unique().collect()
    }

    /// Score opening `kind` at `(x, y)`; `None` if it would serve nobody.
    pub fn evaluate(
        &self,
        kind: AntennaType,
        x: i64,
        y: i64,
        remaining: &BTreeSet<usize>,
    ) -> Option<Placement> {
        let covered = self.pack(kind, x, y, remaining);
        if covered.is_empty() {
            return None;
        }
        let cost = self.problem.placement_cost(kind, x, y);
        let score = (covered.len() as f64).powf(self.config.coverage_exponent) / cost as f64;
        Some(Placement {
            kind,
            x,
            y,
            covered,
            cost,
            score,
        })
    }

    /// Uncovered buildings in range of `(x, y)`, packed until capacity runs out.
    pub fn pack(&self, kind: AntennaType, x: i64, y: i64, remaining: &BTreeSet<usize>) -> Vec<usize> {
        let buildings = &self.problem.buildings;
        let mut in_range: Vec<usize> = self
            .problem
            .buildings_within(x, y, kind.range())
            .into_iter()
            .filter(|b| remaining.contains(b))
            .collect();

        match self.config.packing_order {
            PackingOrder::DemandAscending => {
                in_range.sort_by_key(|&b| (buildings[b].max_demand, b));
            }
            PackingOrder::DemandDescending => {
                in_range.sort_by_key(|&b| (std::cmp::Reverse(buildings[b].max_demand), b));
            }
            PackingOrder::Distance => {
                in_range.sort_by_key(|&b| (buildings[b].distance_squared_to(x, y), b));
            }
        }

        let capacity = kind.capacity();
        let mut load = Load::default();
        let mut covered = Vec::new();
        for b in in_range {
            let next = load.plus(&buildings[b].demand);
            if next.fits(capacity) {
                load = next;
                covered.push(b);
            }
        }
        covered
    }

    /// Move an off-building placement onto one of its covered buildings when
    /// that keeps every covered building in range.
    fn snap_to_building(&self, placement: Placement) -> Placement {
        if self.problem.is_on_building(placement.x, placement.y) {
            return placement;
        }

        let range = placement.kind.range();
        let target = placement
            .covered
            .iter()
            .map(|&b| &self.problem.buildings[b])
            .sorted_by_key(|b| (distance_squared(b.x, b.y, placement.x, placement.y), b.id))
            .find(|b| self.problem.max_distance_squared(b.x, b.y, &placement.covered) <= range * range)
            .map(|b| (b.x, b.y));

        match target {
            Some((x, y)) => Placement {
                x,
                y,
                cost: self.problem.placement_cost(placement.kind, x, y),
                ..placement
            },
            None => placement,
        }
    }

    /// Last resort: one antenna per remaining building at its own coordinates.
    fn cover_individually(&self, solution: &mut Solution, remaining: &mut BTreeSet<usize>) {
        let largest = AntennaType::ALL
            .into_iter()
            .max_by_key(|t| (t.capacity(), t.range()))
            .unwrap_or(AntennaType::MaxRange);

        while let Some(b) = remaining.pop_first() {
            let building = &self.problem.buildings[b];
            let kind = AntennaType::cheapest_for_demand(building.max_demand, true).unwrap_or(largest);
            debug!("Fallback {} antenna for isolated building {}", kind, building.id);
            solution.add_antenna(Antenna::with_buildings(
                kind,
                building.x,
                building.y,
                [b],
                self.problem,
            ));
        }
    }
}

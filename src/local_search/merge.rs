//! MERGE neighborhood: replace two nearby antennas with a single one.

use log::debug;
use rand::Rng;

use super::utils::{cheapest_configuration, on_building_positions, shuffled_antennas};
use super::{LocalSearch, Move};
use crate::antenna::AntennaType;
use crate::problem::Problem;
use crate::solution::Solution;

impl LocalSearch {
    /// Find a pair of antennas within the merge radius whose combined
    /// buildings fit a single antenna costing less than both together.
    pub fn merge_move<R: Rng + ?Sized>(
        &self,
        solution: &Solution,
        problem: &Problem,
        rng: &mut R,
    ) -> Option<Move> {
        if solution.antenna_count() < 2 {
            return None;
        }
        let max_capacity = AntennaType::max_capacity();

        for first_id in shuffled_antennas(solution, self.config.merge_candidates, rng) {
            let first = solution.antenna(first_id)?;

            let neighbours = solution.antennas_near(first.x, first.y, self.config.merge_radius);
            for second_id in neighbours.into_iter().filter(|&id| id != first_id) {
                let Some(second) = solution.antenna(second_id) else {
                    continue;
                };

                let load = first.load.plus(&second.load);
                if load.max() > max_capacity {
                    continue;
                }

                let union: Vec<usize> = first
                    .buildings
                    .iter()
                    .chain(second.buildings.iter())
                    .copied()
                    .collect();

                let (cx, cy) = problem.centroid(&union);
                let mut positions = vec![(cx, cy), (first.x, first.y), (second.x, second.y)];
                positions.extend(on_building_positions(problem, &union, cx, cy, 1));

                let Some(config) = cheapest_configuration(problem, &union, &load, &positions) else {
                    continue;
                };

                let combined = first.cost + second.cost;
                if config.cost < combined {
                    debug!(
                        "Merging antennas {} and {} into {} at ({}, {}): {} -> {}",
                        first_id, second_id, config.kind, config.x, config.y, combined, config.cost
                    );
                    return Some(Move::Merge {
                        first: first_id,
                        second: second_id,
                        kind: config.kind,
                        x: config.x,
                        y: config.y,
                    });
                }
            }
        }

        None
    }
}

//! OPTIMIZE_TYPE neighborhood: downgrade an antenna or move it onto a building.

use log::debug;
use rand::Rng;

use super::utils::{cheapest_configuration, on_building_positions, shuffled_antennas};
use super::{LocalSearch, Move};
use crate::problem::Problem;
use crate::solution::Solution;

impl LocalSearch {
    /// Find an antenna whose buildings can be served by a strictly cheaper
    /// configuration, either a smaller type in place or any type sitting on
    /// one of its own buildings.
    pub fn optimize_type_move<R: Rng + ?Sized>(
        &self,
        solution: &Solution,
        problem: &Problem,
        rng: &mut R,
    ) -> Option<Move> {
        for id in shuffled_antennas(solution, self.config.optimize_candidates, rng) {
            let antenna = solution.antenna(id)?;
            let buildings: Vec<usize> = antenna.buildings.iter().copied().collect();

            let mut positions = vec![(antenna.x, antenna.y)];
            positions.extend(on_building_positions(
                problem,
                &buildings,
                antenna.x,
                antenna.y,
                self.config.relocation_candidates,
            ));

            let Some(config) = cheapest_configuration(problem, &buildings, &antenna.load, &positions)
            else {
                continue;
            };

            if config.cost < antenna.cost {
                debug!(
                    "Antenna {}: {} at ({}, {}) -> {} at ({}, {})",
                    id, antenna.kind, antenna.x, antenna.y, config.kind, config.x, config.y
                );
                return Some(Move::Reconfigure {
                    antenna: id,
                    kind: config.kind,
                    x: config.x,
                    y: config.y,
                });
            }
        }

        None
    }
}

//! REMOVE neighborhood: delete an antenna and redistribute its buildings.

use log::debug;
use rand::Rng;
use std::cmp::Reverse;
use std::collections::HashMap;

use super::utils::shuffled_antennas;
use super::{LocalSearch, Move};
use crate::antenna::{AntennaType, Load};
use crate::problem::Problem;
use crate::solution::{AntennaId, Solution};

impl LocalSearch {
    /// Find an antenna whose every building can be absorbed by neighbouring
    /// antennas that have it in range and enough spare capacity.
    pub fn remove_move<R: Rng + ?Sized>(
        &self,
        solution: &Solution,
        problem: &Problem,
        rng: &mut R,
    ) -> Option<Move> {
        if solution.antenna_count() < 2 {
            return None;
        }

        for id in shuffled_antennas(solution, self.config.remove_candidates, rng) {
            if let Some(reassignment) = self.redistribute(solution, problem, id) {
                debug!(
                    "Removing antenna {} and redistributing {} buildings",
                    id,
                    reassignment.len()
                );
                return Some(Move::Remove {
                    antenna: id,
                    reassignment,
                });
            }
        }

        None
    }

    /// Plan a new home for every building of `removed`, hardest first. Each
    /// building goes to the reachable antenna with the largest margin left.
    fn redistribute(
        &self,
        solution: &Solution,
        problem: &Problem,
        removed: AntennaId,
    ) -> Option<Vec<(usize, AntennaId)>> {
        let antenna = solution.antenna(removed)?;
        let search_radius = AntennaType::max_range();

        let mut order: Vec<usize> = antenna.buildings.iter().copied().collect();
        order.sort_by_key(|&b| (Reverse(problem.buildings[b].max_demand), b));

        // loads including buildings already planned onto a target
        let mut tentative: HashMap<AntennaId, Load> = HashMap::new();
        let mut reassignment = Vec::with_capacity(order.len());

        for b in order {
            let building = &problem.buildings[b];

            let target = solution
                .antennas_near(building.x, building.y, search_radius)
                .into_iter()
                .filter(|&t| t != removed)
                .filter_map(|t| {
                    let candidate = solution.antenna(t)?;
                    if !candidate.can_reach(building) {
                        return None;
                    }
                    let base = tentative.get(&t).copied().unwrap_or(candidate.load);
                    let load = base.plus(&building.demand);
                    let capacity = candidate.capacity();
                    if !load.fits(capacity) {
                        return None;
                    }
                    Some((capacity - load.max(), t, load))
                })
                .max_by_key(|&(margin, t, _)| (margin, Reverse(t)));

            let (_, t, load) = target?;
            tentative.insert(t, load);
            reassignment.push((b, t));
        }

        Some(reassignment)
    }
}

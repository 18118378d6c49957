//! Helpers shared by the local search operators.

use itertools::Itertools;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::antenna::{AntennaType, Load};
use crate::problem::Problem;
use crate::solution::{AntennaId, Solution};

/// A type and position able to serve a given set of buildings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Configuration {
    pub kind: AntennaType,
    pub x: i64,
    pub y: i64,
    pub cost: u64,
}

/// Cheapest type/position pair among `positions` that keeps every building in
/// range and the combined `load` under capacity. Earlier positions win ties.
pub fn cheapest_configuration(
    problem: &Problem,
    buildings: &[usize],
    load: &Load,
    positions: &[(i64, i64)],
) -> Option<Configuration> {
    let mut best: Option<Configuration> = None;

    for &(x, y) in positions {
        if x < 0 || y < 0 {
            continue;
        }
        let on_building = problem.is_on_building(x, y);
        let reach = problem.max_distance_squared(x, y, buildings);

        let fitting = AntennaType::by_cost(on_building)
            .into_iter()
            .find(|kind| load.fits(kind.capacity()) && kind.reaches(reach));

        if let Some(kind) = fitting {
            let cost = kind.cost(on_building);
            if best.map_or(true, |b| cost < b.cost) {
                best = Some(Configuration { kind, x, y, cost });
            }
        }
    }

    best
}

/// Coordinates of up to `limit` of the given buildings, closest to `(x, y)` first.
pub fn on_building_positions(
    problem: &Problem,
    buildings: &[usize],
    x: i64,
    y: i64,
    limit: usize,
) -> Vec<(i64, i64)> {
    buildings
        .iter()
        .map(|&b| &problem.buildings[b])
        .sorted_by_key(|b| (b.distance_squared_to(x, y), b.id))
        .map(|b| (b.x, b.y))
        .unique()
        .take(limit)
        .collect()
}

/// Up to `limit` antenna ids in random order.
pub fn shuffled_antennas<R: Rng + ?Sized>(
    solution: &Solution,
    limit: usize,
    rng: &mut R,
) -> Vec<AntennaId> {
    let mut ids = solution.antenna_ids();
    ids.shuffle(rng);
    ids.truncate(limit);
    ids
}

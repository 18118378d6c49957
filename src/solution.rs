//! Solution representation: an arena of antennas keyed by stable ids.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::antenna::{AntennaType, Load};
use crate::error::{Result, SolverError};
use crate::problem::{Building, Problem};
use crate::record::{AntennaRecord, SolutionRecord};
use crate::spatial::SpatialIndex;

/// Stable identifier of an antenna within one solution.
pub type AntennaId = usize;

/// An installed antenna and the buildings it serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Antenna {
    pub kind: AntennaType,
    pub x: i64,
    pub y: i64,
    /// Dense indices of the served buildings
    pub buildings: BTreeSet<usize>,
    /// Per-period load, kept in sync with `buildings`
    pub load: Load,
    /// Installation cost at the current position
    pub cost: u64,
}

impl Antenna {
    /// Create an antenna serving no building yet.
    pub fn new(kind: AntennaType, x: i64, y: i64, problem: &Problem) -> Self {
        Antenna {
            kind,
            x,
            y,
            buildings: BTreeSet::new(),
            load: Load::default(),
            cost: problem.placement_cost(kind, x, y),
        }
    }

    /// Create an antenna already serving the given buildings.
    pub fn with_buildings<I>(kind: AntennaType, x: i64, y: i64, buildings: I, problem: &Problem) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        let mut antenna = Antenna::new(kind, x, y, problem);
        for b in buildings {
            antenna.assign(b, problem);
        }
        antenna
    }

    /// Attach a building and update the load.
    pub fn assign(&mut self, building: usize, problem: &Problem) {
        if self.buildings.insert(building) {
            self.load.add(&problem.buildings[building].demand);
        }
    }

    /// Detach a building and update the load.
    pub fn unassign(&mut self, building: usize, problem: &Problem) {
        if self.buildings.remove(&building) {
            self.load.sub(&problem.buildings[building].demand);
        }
    }

    pub fn capacity(&self) -> u64 {
        self.kind.capacity()
    }

    /// Remaining headroom under the binding period.
    pub fn spare_capacity(&self) -> u64 {
        self.capacity().saturating_sub(self.load.max())
    }

    pub fn can_reach(&self, building: &Building) -> bool {
        self.kind.reaches(building.distance_squared_to(self.x, self.y))
    }

    /// Whether an extra `demand` would still fit.
    pub fn can_absorb(&self, demand: &Load) -> bool {
        self.load.plus(demand).fits(self.capacity())
    }

    /// Largest squared distance to any served building.
    pub fn max_distance_squared(&self, problem: &Problem) -> i64 {
        self.buildings
            .iter()
            .map(|&b| problem.buildings[b].distance_squared_to(self.x, self.y))
            .max()
            .unwrap_or(0)
    }
}

/// A complete assignment of buildings to antennas.
#[derive(Clone, PartialEq)]
pub struct Solution {
    antennas: BTreeMap<AntennaId, Antenna>,
    index: SpatialIndex<AntennaId>,
    next_id: AntennaId,
}

impl Solution {
    /// Create an empty solution whose antenna index uses `cell_size`.
    pub fn new(cell_size: i64) -> Self {
        Solution {
            antennas: BTreeMap::new(),
            index: SpatialIndex::new(cell_size),
            next_id: 0,
        }
    }

    /// Insert an antenna and return its id.
    pub fn add_antenna(&mut self, antenna: Antenna) -> AntennaId {
        let id = self.next_id;
        self.next_id += 1;
        self.index.insert(id, antenna.x, antenna.y);
        self.antennas.insert(id, antenna);
        id
    }

    /// Remove an antenna, handing back its record.
    pub fn remove_antenna(&mut self, id: AntennaId) -> Option<Antenna> {
        let antenna = self.antennas.remove(&id)?;
        self.index.remove(id);
        Some(antenna)
    }

    /// Change type and position of an antenna, keeping its buildings.
    pub fn reconfigure(
        &mut self,
        id: AntennaId,
        kind: AntennaType,
        x: i64,
        y: i64,
        problem: &Problem,
    ) -> bool {
        let Some(antenna) = self.antennas.get_mut(&id) else {
            return false;
        };
        antenna.kind = kind;
        if (antenna.x, antenna.y) != (x, y) {
            antenna.x = x;
            antenna.y = y;
            self.index.relocate(id, x, y);
        }
        antenna.cost = problem.placement_cost(kind, x, y);
        true
    }

    /// Attach a building to an existing antenna.
    pub fn assign_building(&mut self, id: AntennaId, building: usize, problem: &Problem) -> bool {
        match self.antennas.get_mut(&id) {
            Some(antenna) => {
                antenna.assign(building, problem);
                true
            }
            None => false,
        }
    }

    pub fn antenna(&self, id: AntennaId) -> Option<&Antenna> {
        self.antennas.get(&id)
    }

    /// Antennas in ascending id order.
    pub fn antennas(&self) -> impl Iterator<Item = (AntennaId, &Antenna)> {
        self.antennas.iter().map(|(&id, a)| (id, a))
    }

    pub fn antenna_ids(&self) -> Vec<AntennaId> {
        self.antennas.keys().copied().collect()
    }

    pub fn antenna_count(&self) -> usize {
        self.antennas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.antennas.is_empty()
    }

    /// Total installation cost.
    pub fn cost(&self) -> u64 {
        self.antennas.values().map(|a| a.cost).sum()
    }

    /// Antennas located within `radius` of `(x, y)`, sorted by id.
    pub fn antennas_near(&self, x: i64, y: i64, radius: i64) -> Vec<AntennaId> {
        self.index.query_within(x, y, radius)
    }

    /// Check coverage, range and capacity invariants plus cached bookkeeping.
    pub fn validate(&self, problem: &Problem) -> Result<()> {
        let mut coverage = vec![0usize; problem.building_count()];

        for (&id, antenna) in &self.antennas {
            if antenna.x < 0 || antenna.y < 0 {
                return Err(SolverError::Structural(format!(
                    "antenna {} has negative coordinates ({}, {})",
                    id, antenna.x, antenna.y
                )));
            }
            if self.index.position(id) != Some((antenna.x, antenna.y)) {
                return Err(SolverError::Structural(format!(
                    "antenna {} is out of sync with the spatial index",
                    id
                )));
            }

            let mut load = Load::default();
            for &b in &antenna.buildings {
                let building = problem.buildings.get(b).ok_or_else(|| {
                    SolverError::Structural(format!("antenna {} serves unknown building {}", id, b))
                })?;
                coverage[b] += 1;
                load.add(&building.demand);
                if !antenna.can_reach(building) {
                    return Err(SolverError::Range {
                        antenna: id,
                        building: building.id,
                    });
                }
            }

            if load != antenna.load {
                return Err(SolverError::BookkeepingMismatch {
                    antenna: id,
                    field: "load",
                    cached: antenna.load.max(),
                    expected: load.max(),
                });
            }
            if !load.fits(antenna.capacity()) {
                return Err(SolverError::Capacity {
                    antenna: id,
                    load: load.max(),
                    capacity: antenna.capacity(),
                });
            }
            let expected_cost = problem.placement_cost(antenna.kind, antenna.x, antenna.y);
            if antenna.cost != expected_cost {
                return Err(SolverError::BookkeepingMismatch {
                    antenna: id,
                    field: "cost",
                    cached: antenna.cost,
                    expected: expected_cost,
                });
            }
        }

        if let Some((b, &count)) = coverage.iter().enumerate().find(|&(_, &c)| c != 1) {
            return Err(SolverError::Coverage {
                building: problem.buildings[b].id,
                count,
            });
        }

        Ok(())
    }

    pub fn is_feasible(&self, problem: &Problem) -> bool {
        self.validate(problem).is_ok()
    }

    /// Export in the persisted shape, building ids sorted ascending.
    pub fn to_record(&self, problem: &Problem) -> SolutionRecord {
        let antennas = self
            .antennas
            .values()
            .map(|a| {
                let mut buildings: Vec<u64> =
                    a.buildings.iter().map(|&b| problem.buildings[b].id).collect();
                buildings.sort_unstable();
                AntennaRecord {
                    kind: a.kind,
                    x: a.x,
                    y: a.y,
                    buildings,
                }
            })
            .collect();
        SolutionRecord { antennas }
    }

    /// Rebuild a solution from its persisted shape and validate it.
    pub fn from_record(record: &SolutionRecord, problem: &Problem, cell_size: i64) -> Result<Self> {
        let mut solution = Solution::new(cell_size);
        for entry in &record.antennas {
            let mut antenna = Antenna::new(entry.kind, entry.x, entry.y, problem);
            for &id in &entry.buildings {
                let b = problem.index_of(id).ok_or_else(|| {
                    SolverError::Structural(format!("unknown building id {}", id))
                })?;
                if antenna.buildings.contains(&b) {
                    return Err(SolverError::Coverage {
                        building: id,
                        count: 2,
                    });
                }
                antenna.assign(b, problem);
            }
            solution.add_antenna(antenna);
        }
        solution.validate(problem)?;
        Ok(solution)
    }
}

impl fmt::Debug for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solution:")?;
        writeln!(f, "  Cost: {}", self.cost())?;
        writeln!(f, "  Antennas: {}", self.antennas.len())?;

        for (id, antenna) in &self.antennas {
            writeln!(
                f,
                "  Antenna {}: {} at ({}, {}) serving {:?} (Load: {} / {}, Cost: {})",
                id,
                antenna.kind,
                antenna.x,
                antenna.y,
                antenna.buildings,
                antenna.load.max(),
                antenna.capacity(),
                antenna.cost
            )?;
        }

        Ok(())
    }
}

//! Problem definition: buildings, their demand model and placement costs.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::antenna::{distance_squared, AntennaType, Load};
use crate::error::{Result, SolverError};
use crate::record::{BuildingRecord, DatasetRecord};
use crate::spatial::SpatialIndex;

/// A demand point with three period-specific loads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Building {
    pub id: u64,
    pub x: i64,
    pub y: i64,
    pub demand: Load,
    /// Largest of the three period demands, cached at load time.
    pub max_demand: u64,
}

impl Building {
    /// Create a new building.
    pub fn new(id: u64, x: i64, y: i64, peak: u64, off_peak: u64, night: u64) -> Self {
        let demand = Load::new(peak, off_peak, night);
        Building {
            id,
            x,
            y,
            max_demand: demand.max(),
            demand,
        }
    }

    /// Squared distance from this building to a point.
    pub fn distance_squared_to(&self, x: i64, y: i64) -> i64 {
        distance_squared(self.x, self.y, x, y)
    }
}

impl From<&BuildingRecord> for Building {
    fn from(record: &BuildingRecord) -> Self {
        Building::new(
            record.id,
            record.x,
            record.y,
            record.peak,
            record.off_peak,
            record.night,
        )
    }
}

/// A placement problem instance, read-only for the duration of a run.
#[derive(Debug, Clone)]
pub struct Problem {
    pub name: String,
    /// Buildings indexed by dense position, not by id.
    pub buildings: Vec<Building>,
    id_to_index: HashMap<u64, usize>,
    building_positions: HashSet<(i64, i64)>,
    index: SpatialIndex<usize>,
}

impl Problem {
    /// Create a new problem, rejecting inputs no solution could satisfy.
    pub fn new(name: String, buildings: Vec<Building>, cell_size: i64) -> Result<Self> {
        let mut id_to_index = HashMap::with_capacity(buildings.len());
        let mut building_positions = HashSet::with_capacity(buildings.len());
        let mut index = SpatialIndex::new(cell_size);
        let max_capacity = AntennaType::max_capacity();

        for (i, building) in buildings.iter().enumerate() {
            if building.x < 0 || building.y < 0 {
                return Err(SolverError::Structural(format!(
                    "building {} has negative coordinates ({}, {})",
                    building.id, building.x, building.y
                )));
            }
            if building.max_demand > max_capacity {
                return Err(SolverError::Structural(format!(
                    "building {} demands {} which exceeds every antenna capacity",
                    building.id, building.max_demand
                )));
            }
            if id_to_index.insert(building.id, i).is_some() {
                return Err(SolverError::Structural(format!(
                    "duplicate building id {}",
                    building.id
                )));
            }
            building_positions.insert((building.x, building.y));
            index.insert(i, building.x, building.y);
        }

        Ok(Problem {
            name,
            buildings,
            id_to_index,
            building_positions,
            index,
        })
    }

    /// Build a problem from a deserialized dataset.
    pub fn from_dataset(name: String, dataset: &DatasetRecord, cell_size: i64) -> Result<Self> {
        let buildings = dataset.buildings.iter().map(Building::from).collect();
        Problem::new(name, buildings, cell_size)
    }

    /// Load a problem from a dataset JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P, cell_size: i64) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "dataset".to_string());
        let dataset = DatasetRecord::from_file(path)?;
        Problem::from_dataset(name, &dataset, cell_size)
    }

    /// Serialize the buildings back into the dataset shape.
    pub fn to_record(&self) -> DatasetRecord {
        DatasetRecord {
            buildings: self
                .buildings
                .iter()
                .map(|b| BuildingRecord {
                    id: b.id,
                    x: b.x,
                    y: b.y,
                    peak: b.demand.peak,
                    off_peak: b.demand.off_peak,
                    night: b.demand.night,
                })
                .collect(),
        }
    }

    pub fn building_count(&self) -> usize {
        self.buildings.len()
    }

    /// Resolve an external building id to its dense index.
    pub fn index_of(&self, id: u64) -> Option<usize> {
        self.id_to_index.get(&id).copied()
    }

    /// Whether some building stands exactly at `(x, y)`.
    pub fn is_on_building(&self, x: i64, y: i64) -> bool {
        self.building_positions.contains(&(x, y))
    }

    /// Installation cost of an antenna of `kind` placed at `(x, y)`.
    pub fn placement_cost(&self, kind: AntennaType, x: i64, y: i64) -> u64 {
        kind.cost(self.is_on_building(x, y))
    }

    /// Building indices within `radius` of `(x, y)`, sorted by index.
    pub fn buildings_within(&self, x: i64, y: i64, radius: i64) -> Vec<usize> {
        self.index.query_within(x, y, radius)
    }

    /// Integer centroid of a set of buildings.
    pub fn centroid(&self, indices: &[usize]) -> (i64, i64) {
        if indices.is_empty() {
            return (0, 0);
        }
        let (sum_x, sum_y) = indices.iter().fold((0i64, 0i64), |(sx, sy), &i| {
            (sx + self.buildings[i].x, sy + self.buildings[i].y)
        });
        let n = indices.len() as i64;
        (sum_x / n, sum_y / n)
    }

    /// Largest squared distance from `(x, y)` to any of the given buildings.
    pub fn max_distance_squared(&self, x: i64, y: i64, indices: &[usize]) -> i64 {
        indices
            .iter()
            .map(|&i| self.buildings[i].distance_squared_to(x, y))
            .max()
            .unwrap_or(0)
    }

    /// Summed per-period demand of a set of buildings.
    pub fn total_load(&self, indices: &[usize]) -> Load {
        let mut load = Load::default();
        for &i in indices {
            load.add(&self.buildings[i].demand);
        }
        load
    }
}

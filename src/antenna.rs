//! Antenna types, their fixed specification table and per-period loads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Static characteristics of an antenna type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntennaSpec {
    pub range: i64,
    pub capacity: u64,
    pub cost_on_building: u64,
    pub cost_off_building: u64,
}

/// The four antenna variants that may be installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AntennaType {
    Nano,
    Spot,
    Density,
    MaxRange,
}

impl AntennaType {
    /// All variants, ordered by range.
    pub const ALL: [AntennaType; 4] = [
        AntennaType::Nano,
        AntennaType::Spot,
        AntennaType::Density,
        AntennaType::MaxRange,
    ];

    /// Look up the fixed specification of this type.
    pub const fn spec(self) -> AntennaSpec {
        match self {
            AntennaType::Nano => AntennaSpec {
                range: 50,
                capacity: 200,
                cost_on_building: 5_000,
                cost_off_building: 6_000,
            },
            AntennaType::Spot => AntennaSpec {
                range: 100,
                capacity: 800,
                cost_on_building: 15_000,
                cost_off_building: 20_000,
            },
            AntennaType::Density => AntennaSpec {
                range: 150,
                capacity: 5_000,
                cost_on_building: 30_000,
                cost_off_building: 50_000,
            },
            AntennaType::MaxRange => AntennaSpec {
                range: 400,
                capacity: 3_500,
                cost_on_building: 40_000,
                cost_off_building: 50_000,
            },
        }
    }

    pub fn range(self) -> i64 {
        self.spec().range
    }

    pub fn capacity(self) -> u64 {
        self.spec().capacity
    }

    /// Installation cost depending on whether the antenna sits on a building.
    pub fn cost(self, on_building: bool) -> u64 {
        let spec = self.spec();
        if on_building {
            spec.cost_on_building
        } else {
            spec.cost_off_building
        }
    }

    /// Whether a point at squared distance `dist_sq` is reachable.
    pub fn reaches(self, dist_sq: i64) -> bool {
        let range = self.range();
        dist_sq <= range * range
    }

    /// Types sorted by their installation cost at a given placement.
    pub fn by_cost(on_building: bool) -> [AntennaType; 4] {
        let mut types = Self::ALL;
        types.sort_by_key(|t| (t.cost(on_building), *t));
        types
    }

    /// The largest range of any type.
    pub fn max_range() -> i64 {
        Self::ALL.iter().map(|t| t.range()).max().unwrap_or(0)
    }

    /// The largest capacity of any type.
    pub fn max_capacity() -> u64 {
        Self::ALL.iter().map(|t| t.capacity()).max().unwrap_or(0)
    }

    /// The cheapest type whose capacity holds `demand`, if any.
    pub fn cheapest_for_demand(demand: u64, on_building: bool) -> Option<AntennaType> {
        Self::by_cost(on_building)
            .into_iter()
            .find(|t| t.capacity() >= demand)
    }
}

impl fmt::Display for AntennaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AntennaType::Nano => "Nano",
            AntennaType::Spot => "Spot",
            AntennaType::Density => "Density",
            AntennaType::MaxRange => "MaxRange",
        };
        f.write_str(name)
    }
}

/// Aggregate demand per period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Load {
    pub peak: u64,
    pub off_peak: u64,
    pub night: u64,
}

impl Load {
    pub fn new(peak: u64, off_peak: u64, night: u64) -> Self {
        Load {
            peak,
            off_peak,
            night,
        }
    }

    /// The binding figure for the capacity constraint.
    pub fn max(&self) -> u64 {
        self.peak.max(self.off_peak).max(self.night)
    }

    pub fn add(&mut self, other: &Load) {
        self.peak += other.peak;
        self.off_peak += other.off_peak;
        self.night += other.night;
    }

    pub fn sub(&mut self, other: &Load) {
        self.peak -= other.peak;
        self.off_peak -= other.off_peak;
        self.night -= other.night;
    }

    pub fn plus(&self, other: &Load) -> Load {
        let mut sum = *self;
        sum.add(other);
        sum
    }

    pub fn fits(&self, capacity: u64) -> bool {
        self.max() <= capacity
    }
}

/// Squared Euclidean distance on integer coordinates.
pub fn distance_squared(x1: i64, y1: i64, x2: i64, y2: i64) -> i64 {
    let dx = x1 - x2;
    let dy = y1 - y2;
    dx * dx + dy * dy
}

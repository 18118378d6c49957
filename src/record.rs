//! Serialized dataset and solution shapes exchanged with storage and the oracle.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::antenna::AntennaType;
use crate::error::Result;

/// A building as it appears in a dataset file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingRecord {
    pub id: u64,
    pub x: i64,
    pub y: i64,
    #[serde(rename = "populationPeakHours")]
    pub peak: u64,
    #[serde(rename = "populationOffPeakHours")]
    pub off_peak: u64,
    #[serde(rename = "populationNight")]
    pub night: u64,
}

/// A full dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetRecord {
    pub buildings: Vec<BuildingRecord>,
}

impl DatasetRecord {
    /// Load a dataset from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}

/// One installed antenna in a persisted solution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntennaRecord {
    #[serde(rename = "type")]
    pub kind: AntennaType,
    pub x: i64,
    pub y: i64,
    pub buildings: Vec<u64>,
}

/// A persisted solution.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SolutionRecord {
    pub antennas: Vec<AntennaRecord>,
}

impl SolutionRecord {
    /// Load a solution from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Write the solution as JSON.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        Ok(())
    }
}

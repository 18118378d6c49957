//! Error types shared by the solver.

use std::fmt;

use crate::solution::AntennaId;

/// Everything that can go wrong while loading, validating or scoring a solution.
#[derive(Debug)]
pub enum SolverError {
    /// Malformed dataset or solution shape. Never recovered from.
    Structural(String),
    /// A building is served by zero or more than one antenna.
    Coverage { building: u64, count: usize },
    /// A building lies outside the range of the antenna serving it.
    Range { antenna: AntennaId, building: u64 },
    /// An antenna's peak per-period load exceeds its capacity.
    Capacity {
        antenna: AntennaId,
        load: u64,
        capacity: u64,
    },
    /// The incrementally maintained bookkeeping of an antenna drifted.
    BookkeepingMismatch {
        antenna: AntennaId,
        field: &'static str,
        cached: u64,
        expected: u64,
    },
    /// Local bookkeeping and the external oracle do not agree.
    OracleDisagreement {
        local_cost: u64,
        oracle_cost: u64,
        valid: bool,
        message: String,
    },
    /// The external oracle could not be reached or answered garbage.
    Oracle(String),
    Io(std::io::Error),
    Json(serde_json::Error),
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::Structural(msg) => write!(f, "Malformed input: {}", msg),
            SolverError::Coverage { building, count } => write!(
                f,
                "Building {} is covered {} times (expected exactly once)",
                building, count
            ),
            SolverError::Range { antenna, building } => write!(
                f,
                "Building {} is out of range of antenna {}",
                building, antenna
            ),
            SolverError::Capacity {
                antenna,
                load,
                capacity,
            } => write!(
                f,
                "Antenna {} carries {} but its capacity is {}",
                antenna, load, capacity
            ),
            SolverError::BookkeepingMismatch {
                antenna,
                field,
                cached,
                expected,
            } => write!(
                f,
                "Antenna {} caches {} = {} but recomputing gives {}",
                antenna, field, cached, expected
            ),
            SolverError::OracleDisagreement {
                local_cost,
                oracle_cost,
                valid,
                message,
            } => write!(
                f,
                "Oracle disagrees with local bookkeeping: local cost {}, oracle cost {} (valid: {}): {}",
                local_cost, oracle_cost, valid, message
            ),
            SolverError::Oracle(msg) => write!(f, "Oracle failure: {}", msg),
            SolverError::Io(err) => write!(f, "I/O error: {}", err),
            SolverError::Json(err) => write!(f, "JSON error: {}", err),
        }
    }
}

impl std::error::Error for SolverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolverError::Io(err) => Some(err),
            SolverError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SolverError {
    fn from(err: std::io::Error) -> Self {
        SolverError::Io(err)
    }
}

impl From<serde_json::Error> for SolverError {
    fn from(err: serde_json::Error) -> Self {
        SolverError::Json(err)
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SolverError>;

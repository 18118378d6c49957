//! Adapter to the external, authoritative feasibility and cost function.
//!
//! The scoring rules live outside this crate. Local bookkeeping only exists to
//! avoid calling the oracle for every candidate; whenever the two disagree the
//! oracle wins.

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::{Result, SolverError};
use crate::record::{DatasetRecord, SolutionRecord};

/// Verdict of the oracle. `valid == false` comes with `cost == 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub cost: u64,
    pub valid: bool,
    #[serde(default)]
    pub message: String,
}

/// The authoritative scorer.
pub trait FeasibilityOracle {
    fn score(&self, solution: &SolutionRecord, dataset: &DatasetRecord) -> Result<Score>;
}

#[derive(Serialize)]
struct OracleRequest<'a> {
    solution: &'a SolutionRecord,
    dataset: &'a DatasetRecord,
}

/// Runs an external scorer process per call.
///
/// The child receives `{"solution": ..., "dataset": ...}` on stdin and must
/// print `{"cost": ..., "valid": ..., "message": ...}` on stdout.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandOracle {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        CommandOracle {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append arguments passed to the scorer.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Parse a shell-like command line (whitespace separated) into an oracle.
    pub fn from_command_line(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| SolverError::Oracle("empty oracle command".to_string()))?;
        Ok(CommandOracle::new(program).with_args(parts))
    }
}

impl FeasibilityOracle for CommandOracle {
    fn score(&self, solution: &SolutionRecord, dataset: &DatasetRecord) -> Result<Score> {
        let request = serde_json::to_vec(&OracleRequest { solution, dataset })?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                SolverError::Oracle(format!("cannot start {}: {}", self.program.display(), e))
            })?;

        // a scorer may answer without draining its input
        let sent = match child.stdin.take() {
            Some(mut stdin) => stdin.write_all(&request),
            None => Err(io::Error::new(io::ErrorKind::Other, "stdin unavailable")),
        };

        let output = child.wait_with_output().map_err(|e| {
            SolverError::Oracle(format!("waiting for {}: {}", self.program.display(), e))
        })?;
        if !output.status.success() {
            return Err(SolverError::Oracle(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        if let Err(e) = sent {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(SolverError::Oracle(format!(
                    "cannot send request to {}: {}",
                    self.program.display(),
                    e
                )));
            }
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| SolverError::Oracle(format!("unreadable oracle answer: {}", e)))
    }
}

/// Compare local bookkeeping with an oracle verdict.
pub fn check_agreement(local_cost: u64, score: &Score) -> Result<()> {
    if score.valid && score.cost == local_cost {
        Ok(())
    } else {
        Err(SolverError::OracleDisagreement {
            local_cost,
            oracle_cost: score.cost,
            valid: score.valid,
            message: score.message.clone(),
        })
    }
}

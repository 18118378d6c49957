use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use antenna_placement::config::Config;
use antenna_placement::oracle::CommandOracle;
use antenna_placement::problem::Problem;
use antenna_placement::record::SolutionRecord;
use antenna_placement::solution::Solution;
use antenna_placement::utils::save_solution;
use antenna_placement::AntennaSolver;

/// Place antennas so that every building is served at minimum cost.
#[derive(Parser, Debug)]
#[command(name = "antenna-solver", version, about)]
struct Cli {
    /// Dataset JSON file
    #[arg(short, long)]
    dataset: PathBuf,

    /// Where to write the solution JSON
    #[arg(short, long)]
    output: PathBuf,

    /// Configuration JSON file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Resume from a previously saved solution instead of constructing one
    #[arg(long)]
    resume: Option<PathBuf>,

    /// Random seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum number of improvement steps
    #[arg(short, long)]
    iterations: Option<u32>,

    /// Time limit in seconds
    #[arg(short, long)]
    time_limit: Option<u64>,

    /// External scorer command, e.g. "python3 score.py"
    #[arg(long)]
    oracle: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(seed) = cli.seed {
        config = config.with_seed(seed);
    }
    if let Some(iterations) = cli.iterations {
        config = config.with_max_iterations(iterations);
    }
    if let Some(seconds) = cli.time_limit {
        config = config.with_time_limit(Duration::from_secs(seconds));
    }

    let problem = Problem::from_file(&cli.dataset, config.cell_size)
        .with_context(|| format!("loading dataset {}", cli.dataset.display()))?;
    info!(
        "Loaded {} with {} buildings",
        problem.name,
        problem.building_count()
    );

    let resumed = match &cli.resume {
        Some(path) => {
            let record = SolutionRecord::from_file(path)
                .with_context(|| format!("loading solution {}", path.display()))?;
            Some(Solution::from_record(&record, &problem, config.cell_size)?)
        }
        None => None,
    };

    let mut solver = AntennaSolver::new(problem, config);
    if let Some(line) = &cli.oracle {
        solver = solver.with_oracle(Box::new(CommandOracle::from_command_line(line)?));
    }
    if let Some(solution) = resumed {
        solver = solver.with_initial_solution(solution)?;
    }

    let solution = solver.run()?.clone();
    save_solution(&solution, &solver.problem, &cli.output)
        .with_context(|| format!("writing solution {}", cli.output.display()))?;

    println!("{}", solver.statistics.format());
    Ok(())
}

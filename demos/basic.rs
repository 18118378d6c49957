//! Basic example of using the antenna placement library.

use antenna_placement::config::Config;
use antenna_placement::problem::Problem;
use antenna_placement::utils::{format_duration, save_solution};
use antenna_placement::AntennaSolver;
use std::env;
use std::time::{Duration, Instant};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Get dataset path from command line or use default
    let args: Vec<String> = env::args().collect();
    let dataset_path = if args.len() > 1 {
        &args[1]
    } else {
        "datasets/1_peaceful_village.json"
    };

    // Configure algorithm
    let config = Config::new()
        .with_seed(42)
        .with_candidate_sample_size(20)
        .with_max_iterations(500)
        .with_max_iterations_without_improvement(50)
        .with_time_limit(Duration::from_secs(60));

    // Load problem
    println!("Loading dataset from: {}", dataset_path);
    let problem = Problem::from_file(dataset_path, config.cell_size)?;
    println!(
        "Loaded dataset: {} with {} buildings",
        problem.name,
        problem.building_count()
    );

    // Create and run solver
    let mut solver = AntennaSolver::new(problem.clone(), config);

    println!("Starting search (time limit: 60s)");
    let start_time = Instant::now();
    let solution = solver.run()?.clone();
    let runtime = start_time.elapsed();

    // Print results
    println!("Search completed in {}", format_duration(runtime));
    println!("Best solution cost: {}", solution.cost());
    println!("Number of antennas: {}", solution.antenna_count());
    println!("{}", solver.statistics.format());

    // Save solution
    let output_path = format!("{}.solution.json", problem.name);
    println!("Saving solution to: {}", output_path);
    save_solution(&solution, &problem, &output_path)?;

    Ok(())
}

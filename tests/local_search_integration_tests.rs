//! Integration tests running many improvement steps on random instances.

use antenna_placement::config::{Config, OperatorWeights};
use antenna_placement::greedy::GreedyConstructor;
use antenna_placement::local_search::{LocalSearch, Operator, StepOutcome};
use antenna_placement::problem::{Building, Problem};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Dense random instance where downgrades and merges are plentiful.
fn create_test_problem(size: usize, seed: u64) -> Problem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let buildings = (0..size)
        .map(|i| {
            Building::new(
                i as u64,
                rng.gen_range(0..800),
                rng.gen_range(0..800),
                rng.gen_range(1..120),
                rng.gen_range(1..120),
                rng.gen_range(1..60),
            )
        })
        .collect();
    Problem::new(format!("Dense_{}", seed), buildings, 80).unwrap()
}

#[test]
fn test_cost_never_increases_and_solution_stays_valid() {
    let problem = create_test_problem(200, 17);
    let config = Config::new().with_candidate_sample_size(5);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

    let mut solution = GreedyConstructor::new(&problem, &config).build(&mut rng);
    assert!(solution.validate(&problem).is_ok());
    let initial_cost = solution.cost();

    let local_search = LocalSearch::new(&config);
    for _ in 0..200 {
        let before = solution.cost();
        match local_search.step(&solution, &problem, &mut rng) {
            StepOutcome::Improved {
                solution: next,
                previous_cost,
                cost,
                ..
            } => {
                assert_eq!(previous_cost, before);
                assert!(cost < before);
                assert_eq!(next.cost(), cost);
                assert!(next.validate(&problem).is_ok());
                solution = next;
            }
            StepOutcome::Unchanged => {}
        }
    }

    assert!(solution.cost() <= initial_cost);
}

#[test]
fn test_each_operator_alone_keeps_invariants() {
    let problem = create_test_problem(120, 23);

    for (weights, operator) in [
        ((1, 0, 0), Operator::OptimizeType),
        ((0, 1, 0), Operator::Merge),
        ((0, 0, 1), Operator::Remove),
    ] {
        let config = Config::new()
            .with_candidate_sample_size(3)
            .with_operator_weights(OperatorWeights {
                optimize_type: weights.0,
                merge: weights.1,
                remove: weights.2,
            });
        let mut rng = ChaCha8Rng::seed_from_u64(31);
        let mut solution = GreedyConstructor::new(&problem, &config).build(&mut rng);
        let local_search = LocalSearch::new(&config);

        for _ in 0..100 {
            if let StepOutcome::Improved {
                solution: next,
                operator: used,
                ..
            } = local_search.step(&solution, &problem, &mut rng)
            {
                assert_eq!(used, operator);
                assert!(next.validate(&problem).is_ok(), "{} broke the solution", used);
                solution = next;
            }
        }
    }
}

#[test]
fn test_steps_are_reproducible() {
    let problem = create_test_problem(150, 5);
    let config = Config::new();

    let run = || {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut solution = GreedyConstructor::new(&problem, &config).build(&mut rng);
        let local_search = LocalSearch::new(&config);
        let mut trace = Vec::new();
        for _ in 0..50 {
            if let StepOutcome::Improved {
                solution: next,
                operator,
                cost,
                ..
            } = local_search.step(&solution, &problem, &mut rng)
            {
                trace.push((operator, cost));
                solution = next;
            }
        }
        (solution, trace)
    };

    let (first, first_trace) = run();
    let (second, second_trace) = run();
    assert_eq!(first_trace, second_trace);
    assert_eq!(first, second);
}

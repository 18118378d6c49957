//! Tests for the greedy constructor.

use antenna_placement::antenna::AntennaType;
use antenna_placement::config::{Config, PackingOrder};
use antenna_placement::greedy::GreedyConstructor;
use antenna_placement::problem::{Building, Problem};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeSet;

/// Random buildings on a square map.
fn create_test_problem(size: usize, extent: i64, seed: u64) -> Problem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let buildings = (0..size)
        .map(|i| {
            Building::new(
                i as u64 * 3 + 1,
                rng.gen_range(0..extent),
                rng.gen_range(0..extent),
                rng.gen_range(0..300),
                rng.gen_range(0..300),
                rng.gen_range(0..150),
            )
        })
        .collect();
    Problem::new(format!("Random_{}", seed), buildings, 100).unwrap()
}

fn create_pair_problem() -> Problem {
    let buildings = vec![Building::new(0, 0, 0, 50, 10, 10), Building::new(1, 10, 0, 50, 10, 10)];
    Problem::new("Pair".to_string(), buildings, 100).unwrap()
}

#[test]
fn test_construction_is_feasible() {
    let config = Config::new();

    for seed in 0..5 {
        let problem = create_test_problem(150, 1500, seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let solution = GreedyConstructor::new(&problem, &config).build(&mut rng);

        assert!(
            solution.validate(&problem).is_ok(),
            "seed {} produced {:?}",
            seed,
            solution.validate(&problem)
        );
    }
}

#[test]
fn test_construction_is_deterministic() {
    let problem = create_test_problem(100, 1000, 11);
    let config = Config::new().with_seed(9);

    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let first = GreedyConstructor::new(&problem, &config).build(&mut rng);
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let second = GreedyConstructor::new(&problem, &config).build(&mut rng);

    assert_eq!(first, second);
}

#[test]
fn test_close_pair_shares_one_antenna() {
    let problem = create_pair_problem();
    let config = Config::new();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let solution = GreedyConstructor::new(&problem, &config).build(&mut rng);

    assert_eq!(solution.antenna_count(), 1);
    assert_eq!(solution.cost(), 5_000);
    let (_, antenna) = solution.antennas().next().unwrap();
    assert_eq!(antenna.kind, AntennaType::Nano);
    assert_eq!((antenna.x, antenna.y), (0, 0));
}

#[test]
fn test_isolated_building_gets_own_antenna() {
    let mut buildings: Vec<Building> = (0..10)
        .map(|i| Building::new(i, i as i64 * 20, 0, 30, 30, 30))
        .collect();
    buildings.push(Building::new(100, 5_000, 5_000, 50, 50, 50));
    let problem = Problem::new("Isolated".to_string(), buildings, 100).unwrap();
    let config = Config::new();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let solution = GreedyConstructor::new(&problem, &config).build(&mut rng);
    assert!(solution.validate(&problem).is_ok());

    let isolated = problem.index_of(100).unwrap();
    let (_, antenna) = solution
        .antennas()
        .find(|(_, a)| a.buildings.contains(&isolated))
        .unwrap();
    assert_eq!(antenna.buildings.len(), 1);
    assert_eq!((antenna.x, antenna.y), (5_000, 5_000));
    assert_eq!(antenna.kind, AntennaType::Nano);
}

#[test]
fn test_every_packing_order_is_feasible() {
    let problem = create_test_problem(120, 1200, 21);

    for order in [
        PackingOrder::DemandAscending,
        PackingOrder::DemandDescending,
        PackingOrder::Distance,
    ] {
        let config = Config::new().with_packing_order(order);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let solution = GreedyConstructor::new(&problem, &config).build(&mut rng);
        assert!(solution.validate(&problem).is_ok(), "{:?} failed", order);
    }
}

#[test]
fn test_minimal_sampling_is_feasible() {
    let problem = create_test_problem(80, 800, 4);
    let config = Config::new()
        .with_candidate_sample_size(1)
        .with_centroid_candidates(false);
    let mut rng = ChaCha8Rng::seed_from_u64(4);

    let solution = GreedyConstructor::new(&problem, &config).build(&mut rng);
    assert!(solution.validate(&problem).is_ok());
}

#[test]
fn test_pack_respects_capacity_and_order() {
    let buildings = vec![
        Building::new(0, 0, 0, 150, 0, 0),
        Building::new(1, 10, 0, 40, 0, 0),
        Building::new(2, 20, 0, 60, 0, 0),
        Building::new(3, 500, 0, 1, 0, 0),
    ];
    let problem = Problem::new("Pack".to_string(), buildings, 100).unwrap();
    let remaining: BTreeSet<usize> = (0..4).collect();

    let config = Config::new();
    let packed = GreedyConstructor::new(&problem, &config).pack(AntennaType::Nano, 0, 0, &remaining);
    // ascending: 40 + 60 fit, 150 would exceed 200
    assert_eq!(packed, vec![1, 2]);

    let config = Config::new().with_packing_order(PackingOrder::DemandDescending);
    let packed = GreedyConstructor::new(&problem, &config).pack(AntennaType::Nano, 0, 0, &remaining);
    // descending: 150 + 40 fit, 60 would exceed 200
    assert_eq!(packed, vec![0, 1]);

    let config = Config::new().with_packing_order(PackingOrder::Distance);
    let packed = GreedyConstructor::new(&problem, &config).pack(AntennaType::Nano, 0, 0, &remaining);
    assert_eq!(packed, vec![0, 1]);
}

#[test]
fn test_evaluate_scores_coverage_per_cost() {
    let problem = create_pair_problem();
    let config = Config::new();
    let constructor = GreedyConstructor::new(&problem, &config);
    let remaining: BTreeSet<usize> = (0..2).collect();

    let on = constructor
        .evaluate(AntennaType::Nano, 0, 0, &remaining)
        .unwrap();
    let off = constructor
        .evaluate(AntennaType::Nano, 5, 0, &remaining)
        .unwrap();
    assert_eq!(on.covered.len(), 2);
    assert_eq!(on.cost, 5_000);
    assert_eq!(off.cost, 6_000);
    assert!(on.score > off.score);

    assert!(constructor
        .evaluate(AntennaType::Nano, 1_000, 1_000, &remaining)
        .is_none());
}

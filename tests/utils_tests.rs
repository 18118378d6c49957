//! Tests for utilities, configuration and the antenna type table.

use antenna_placement::antenna::{AntennaType, Load};
use antenna_placement::config::{Config, PackingOrder};
use antenna_placement::local_search::Operator;
use antenna_placement::utils::{format_duration, SearchStatistics};
use std::time::Duration;

#[test]
fn test_format_duration() {
    assert_eq!(format_duration(Duration::from_secs(0)), "0h 00m 00s");
    assert_eq!(format_duration(Duration::from_secs(59)), "0h 00m 59s");
    assert_eq!(format_duration(Duration::from_secs(3_661)), "1h 01m 01s");
}

#[test]
fn test_statistics_record_and_format() {
    let mut stats = SearchStatistics::default();
    stats.record(Operator::Merge, 10_000, 5_000);
    stats.record(Operator::Merge, 5_000, 4_000);
    stats.record(Operator::Remove, 4_000, 3_000);

    let merge = stats.operators[&Operator::Merge];
    assert_eq!(merge.accepted, 2);
    assert_eq!(merge.saved, 6_000);
    assert!(!stats.operators.contains_key(&Operator::OptimizeType));

    let text = stats.format();
    assert!(text.contains("MERGE: 2 accepted, 6000 saved"));
    assert!(text.contains("REMOVE: 1 accepted, 1000 saved"));
}

#[test]
fn test_antenna_table() {
    assert_eq!(AntennaType::Nano.range(), 50);
    assert_eq!(AntennaType::Spot.capacity(), 800);
    assert_eq!(AntennaType::Density.cost(false), 50_000);
    assert_eq!(AntennaType::MaxRange.cost(true), 40_000);
    assert_eq!(AntennaType::max_range(), 400);
    assert_eq!(AntennaType::max_capacity(), 5_000);

    assert!(AntennaType::Nano.reaches(2_500));
    assert!(!AntennaType::Nano.reaches(2_501));
}

#[test]
fn test_types_by_cost() {
    assert_eq!(
        AntennaType::by_cost(true),
        [
            AntennaType::Nano,
            AntennaType::Spot,
            AntennaType::Density,
            AntennaType::MaxRange
        ]
    );
    // Density and MaxRange tie off-building
    assert_eq!(
        AntennaType::by_cost(false),
        [
            AntennaType::Nano,
            AntennaType::Spot,
            AntennaType::Density,
            AntennaType::MaxRange
        ]
    );

    assert_eq!(AntennaType::cheapest_for_demand(150, true), Some(AntennaType::Nano));
    assert_eq!(AntennaType::cheapest_for_demand(900, true), Some(AntennaType::Density));
    assert_eq!(AntennaType::cheapest_for_demand(5_001, true), None);
}

#[test]
fn test_load_uses_binding_period() {
    let mut load = Load::new(10, 30, 20);
    assert_eq!(load.max(), 30);
    assert!(load.fits(30));
    assert!(!load.fits(29));

    load.add(&Load::new(25, 0, 0));
    assert_eq!(load.max(), 35);
    load.sub(&Load::new(25, 0, 0));
    assert_eq!(load, Load::new(10, 30, 20));
}

#[test]
fn test_config_builders_and_partial_json() {
    let config = Config::new()
        .with_seed(5)
        .with_packing_order(PackingOrder::Distance)
        .with_time_limit(Duration::from_secs(3));
    assert_eq!(config.seed, 5);
    assert_eq!(config.packing_order, PackingOrder::Distance);
    assert_eq!(config.time_limit, Some(Duration::from_secs(3)));

    let parsed: Config =
        serde_json::from_str(r#"{"seed": 8, "packing_order": "DemandDescending"}"#).unwrap();
    assert_eq!(parsed.seed, 8);
    assert_eq!(parsed.packing_order, PackingOrder::DemandDescending);
    assert_eq!(parsed.cell_size, Config::default().cell_size);
    assert_eq!(parsed.operator_weights, Config::default().operator_weights);
}

mod common;

use common::*;
use netiso_core::{
    Error, NetworkConfig, SilentFeedback, StrategyConfig,
    algo::{InterpolationConfig, calc_iso_points, interpolate},
    routing::{OdGeometry, od_matrix, shortest_path},
};

/// Distance first, then travel time at 36 km/h (10 m/s)
fn two_criteria() -> NetworkConfig {
    NetworkConfig {
        strategies: vec![
            StrategyConfig::Distance,
            StrategyConfig::Speed {
                field: None,
                default_speed: 36.0,
            },
        ],
        ..NetworkConfig::default()
    }
}

// origin 50 m off the middle of the line, destination on its east end
fn fixture() -> Fixture {
    let pts = points("pts", &[(1, 500., 50.), (2, 1000., 0.)]);
    build(&straight_line(), &[&pts], &two_criteria())
}

#[test]
fn entry_cost_per_criterion() {
    let fixture = fixture();
    let origin = &fixture.layers[0][0];

    assert_close(origin.entry_length, 50.);
    assert_close(origin.entry_cost(0).unwrap(), 50.);
    assert_close(origin.entry_cost(1).unwrap(), 5.);
    assert!(matches!(origin.entry_cost(2), Err(Error::InvalidCriterion(2))));
}

#[test]
fn route_costs_share_the_queried_unit() {
    let fixture = fixture();
    let (start, end) = (&fixture.layers[0][0], &fixture.layers[0][1]);

    let meters = shortest_path(&fixture.network, start, end, 0)
        .unwrap()
        .reached()
        .unwrap();
    assert_close(meters.entry_cost, 50.);
    assert_close(meters.total_cost(), 550.);

    let seconds = shortest_path(&fixture.network, start, end, 1)
        .unwrap()
        .reached()
        .unwrap();
    assert_close(seconds.entry_cost, 5.);
    assert_close(seconds.network_cost, 50.);
    assert_close(seconds.exit_cost, 0.);
    assert_close(seconds.total_cost(), 55.);
}

#[test]
fn od_matrix_on_second_criterion() {
    let fixture = fixture();
    let records = od_matrix(
        &fixture.network,
        &fixture.layers[0][..1],
        &fixture.layers[0][1..],
        1,
        OdGeometry::None,
        &SilentFeedback,
    )
    .unwrap();

    let costs = records[0].costs.expect("line is connected");
    assert_close(costs.entry_cost, 5.);
    assert_close(costs.network_cost, 50.);
    assert_close(costs.total_cost, 55.);
}

#[test]
fn iso_budget_in_seconds() {
    let fixture = fixture();
    let network = &fixture.network;
    let origin = &fixture.layers[0][..1];

    let cloud = calc_iso_points(network, origin, 60., 1, &SilentFeedback).unwrap();
    assert_eq!(cloud.criterion(), 1);
    assert_eq!(cloud.len(), 3);
    assert_eq!(cloud.cost(origin[0].network_vertex_id), Some(5.0));
    for vertex in cloud.vertices() {
        assert!(cloud.cost(vertex).unwrap() <= 60.);
    }

    // the same budget in meters only covers the seed
    let meters = calc_iso_points(network, origin, 60., 0, &SilentFeedback).unwrap();
    assert_eq!(meters.len(), 1);
}

#[test]
fn interpolation_keeps_the_cloud_unit() {
    let fixture = fixture();
    let cloud = calc_iso_points(&fixture.network, &fixture.layers[0][..1], 60., 1, &SilentFeedback)
        .unwrap();
    let raster = interpolate(
        &fixture.network,
        &cloud,
        &InterpolationConfig::new(100.),
        &SilentFeedback,
    )
    .unwrap();

    assert_eq!((raster.rows, raster.cols), (1, 10));
    // centre (50, -50): 5 s entry, 45 s along the line to the foot at (50, 0)
    // and 5 s off the line
    assert_close(raster.cost(0, 0).unwrap(), 55.);
}

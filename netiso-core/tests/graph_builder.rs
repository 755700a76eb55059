mod common;

use common::*;
use geo::{MultiLineString, coord};
use netiso_core::{
    Direction, Error, NetworkConfig, SilentFeedback, build_network, feedback::Feedback,
    loading::DirectionSettings, model::LineFeature,
};

#[test]
fn builds_straight_line() {
    let network = build_network(&straight_line(), &[], &NetworkConfig::default(), &SilentFeedback)
        .unwrap();
    assert_eq!(network.graph().vertex_count(), 2);
    // one segment traversable both ways
    assert_eq!(network.graph().edge_count(), 2);
    assert!(network.tied_points().is_empty());
}

#[test]
fn build_is_deterministic() {
    let config = NetworkConfig::default();
    let query = [coord! {x: 120., y: 35.}, coord! {x: 410., y: -20.}];
    let a = build_network(&grid(6, 100.), &query, &config, &SilentFeedback).unwrap();
    let b = build_network(&grid(6, 100.), &query, &config, &SilentFeedback).unwrap();

    assert_eq!(a.graph().vertex_count(), b.graph().vertex_count());
    assert_eq!(a.graph().edge_count(), b.graph().edge_count());
    assert_eq!(a.tied_points(), b.tied_points());

    let source = a.tied_vertex(0).unwrap();
    let costs_a = a.dijkstra(source, 0).unwrap();
    let costs_b = b.dijkstra(source, 0).unwrap();
    assert_eq!(costs_a.costs(), costs_b.costs());
    assert_eq!(costs_a.tree(), costs_b.tree());
}

#[test]
fn off_network_point_splits_segment() {
    let origin = points("origins", &[(1, 500., 50.)]);
    let fixture = build(&straight_line(), &[&origin], &NetworkConfig::default());

    let graph = fixture.network.graph();
    assert_eq!(graph.vertex_count(), 3);
    assert_eq!(graph.edge_count(), 4);

    let point = &fixture.layers[0][0];
    let vertex = graph.vertex_point(point.network_vertex_id).unwrap();
    assert_close(vertex.x(), 500.);
    assert_close(vertex.y(), 0.);
    assert_close(point.entry_cost(0).unwrap(), 50.);
    assert_close(point.entry_length, 50.);
}

#[test]
fn tying_is_idempotent() {
    let config = NetworkConfig {
        tolerance: 0.5,
        ..NetworkConfig::default()
    };
    // a vertex coordinate, and a query coordinate within tolerance of it
    let query = [
        coord! {x: 1000., y: 0.},
        coord! {x: 1000.2, y: 0.},
        coord! {x: 250., y: 10.},
        coord! {x: 250., y: -10.},
    ];
    let network = build_network(&straight_line(), &query, &config, &SilentFeedback).unwrap();

    let end = network.graph().find_vertex(coord! {x: 1000., y: 0.}, 0.0).unwrap();
    assert_eq!(network.tied_vertex(0), Some(end));
    assert_eq!(network.tied_vertex(1), Some(end));
    assert_eq!(network.tied_vertex(2), network.tied_vertex(3));
    assert_eq!(network.graph().vertex_count(), 3);
}

#[test]
fn merges_endpoints_within_tolerance() {
    let lines = layer(vec![
        (line(&[(0., 0.), (100., 0.)]), "", None),
        (line(&[(100.3, 0.), (200., 0.)]), "", None),
    ]);
    let exact = build_network(&lines, &[], &NetworkConfig::default(), &SilentFeedback).unwrap();
    assert_eq!(exact.graph().vertex_count(), 4);

    let config = NetworkConfig {
        tolerance: 0.5,
        ..NetworkConfig::default()
    };
    let merged = build_network(&lines, &[], &config, &SilentFeedback).unwrap();
    assert_eq!(merged.graph().vertex_count(), 3);
}

#[test]
fn direction_attribute_controls_edges() {
    let lines = layer(vec![
        (line(&[(0., 0.), (100., 0.)]), "yes", None),
        (line(&[(100., 0.), (200., 0.)]), "-1", None),
        (line(&[(200., 0.), (300., 0.)]), "no", None),
        (line(&[(300., 0.), (400., 0.)]), "unknown", None),
    ]);
    let mut config = NetworkConfig::default();
    config.direction = DirectionSettings {
        field: Some("oneway".into()),
        forward_value: "yes".into(),
        backward_value: "-1".into(),
        both_value: "no".into(),
        default: Direction::Forward,
    };

    let network = build_network(&lines, &[], &config, &SilentFeedback).unwrap();
    let graph = network.graph();
    assert_eq!(graph.edge_count(), 1 + 1 + 2 + 1);

    let v = |x: f64| graph.find_vertex(coord! {x: x, y: 0.}, 0.0).unwrap();
    // forward ends at 100 and backward runs 200 -> 100
    assert_eq!(graph.outgoing_edges(v(100.)).count(), 0);
    assert!(
        graph
            .outgoing_edges(v(200.))
            .filter_map(|e| graph.edge_endpoints(e))
            .any(|(_, to)| to == v(100.))
    );
    // unrecognized value falls back to the default (forward)
    assert_eq!(graph.outgoing_edges(v(400.)).count(), 0);
}

#[test]
fn skips_invalid_features() {
    let mut lines = straight_line();
    lines
        .features
        .push(LineFeature::new(MultiLineString::new(vec![]), vec![]));
    lines.features.push(LineFeature::new(
        line(&[(0., 0.), (f64::NAN, 5.)]),
        vec![],
    ));

    let network = build_network(&lines, &[], &NetworkConfig::default(), &SilentFeedback).unwrap();
    assert_eq!(network.graph().edge_count(), 2);
}

#[test]
fn empty_network_is_an_error() {
    let lines = layer(vec![(line(&[(5., 5.), (5., 5.)]), "", None)]);
    let result = build_network(&lines, &[], &NetworkConfig::default(), &SilentFeedback);
    assert!(matches!(result, Err(Error::EmptyNetwork)));
    assert!(result.unwrap_err().is_configuration());
}

#[test]
fn unknown_speed_field_is_rejected() {
    let config = NetworkConfig::speed(Some("maxspeed"), 50.0);
    let result = build_network(&straight_line(), &[], &config, &SilentFeedback);
    assert!(matches!(result, Err(Error::UnknownField(name)) if name == "maxspeed"));
}

#[test]
fn build_can_be_canceled() {
    struct Canceled;
    impl Feedback for Canceled {
        fn is_canceled(&self) -> bool {
            true
        }
    }

    let result = build_network(&grid(40, 10.), &[], &NetworkConfig::default(), &Canceled);
    assert!(matches!(result, Err(Error::Canceled)));
}

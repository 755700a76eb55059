#![allow(dead_code)]

use geo::{Coord, LineString, MultiLineString, Point, coord};
use netiso_core::{
    AnalysisPoint, AttributeValue, Crs, DistanceMethod, LineFeature, LineLayer, Network,
    NetworkConfig, PointFeature, PointLayer, SilentFeedback, build_network,
    model::FieldSchema,
};

pub const EPS: f64 = 1e-9;

pub fn crs() -> Crs {
    Crs::projected("EPSG:32633")
}

pub fn line(coords: &[(f64, f64)]) -> MultiLineString<f64> {
    let line: LineString<f64> = coords.iter().map(|&(x, y)| coord! {x: x, y: y}).collect();
    MultiLineString::new(vec![line])
}

/// Layer with a single `oneway` / `kmh` schema
pub fn layer(features: Vec<(MultiLineString<f64>, &str, Option<f64>)>) -> LineLayer {
    let schema = FieldSchema::new(vec!["oneway".into(), "kmh".into()]);
    let features = features
        .into_iter()
        .map(|(geometry, oneway, kmh)| {
            LineFeature::new(
                geometry,
                vec![
                    AttributeValue::from(oneway),
                    kmh.map_or(AttributeValue::Null, AttributeValue::Float),
                ],
            )
        })
        .collect();
    LineLayer::new(schema, features, crs())
}

/// One bidirectional 1000 m line along the x axis
pub fn straight_line() -> LineLayer {
    layer(vec![(line(&[(0., 0.), (1000., 0.)]), "", None)])
}

/// Hub at the origin with four 300 m spokes
pub fn star() -> LineLayer {
    layer(vec![
        (line(&[(0., 0.), (300., 0.)]), "", None),
        (line(&[(0., 0.), (-300., 0.)]), "", None),
        (line(&[(0., 0.), (0., 300.)]), "", None),
        (line(&[(0., 0.), (0., -300.)]), "", None),
    ])
}

/// Two edges sharing no vertex
pub fn disconnected() -> LineLayer {
    layer(vec![
        (line(&[(0., 0.), (100., 0.)]), "", None),
        (line(&[(0., 500.), (100., 500.)]), "", None),
    ])
}

/// Square grid of `n` x `n` vertices spaced `spacing` apart
pub fn grid(n: usize, spacing: f64) -> LineLayer {
    let mut features = Vec::new();
    for i in 0..n {
        for j in 0..n {
            let (x, y) = (i as f64 * spacing, j as f64 * spacing);
            if i + 1 < n {
                features.push((line(&[(x, y), (x + spacing, y)]), "", None));
            }
            if j + 1 < n {
                features.push((line(&[(x, y), (x, y + spacing)]), "", None));
            }
        }
    }
    layer(features)
}

pub fn points(name: &str, coords: &[(i64, f64, f64)]) -> PointLayer {
    let features = coords
        .iter()
        .map(|&(id, x, y)| PointFeature::new(id, Point::new(x, y)))
        .collect();
    PointLayer::new(name, features, crs())
}

/// Built network together with the tied analysis points of every layer
pub struct Fixture {
    pub network: Network,
    pub layers: Vec<Vec<AnalysisPoint>>,
}

pub fn build(lines: &LineLayer, layers: &[&PointLayer], config: &NetworkConfig) -> Fixture {
    let coords: Vec<Coord<f64>> = layers.iter().flat_map(|layer| layer.coords()).collect();
    let network = build_network(lines, &coords, config, &SilentFeedback).unwrap();

    let mut offset = 0;
    let mut tied = Vec::new();
    for layer in layers {
        tied.push(
            AnalysisPoint::from_features(
                &layer.name,
                &layer.features,
                &network,
                offset,
                DistanceMethod::Planar,
            )
            .unwrap(),
        );
        offset += layer.len();
    }

    Fixture {
        network,
        layers: tied,
    }
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= EPS * expected.abs().max(1.0),
        "expected {expected}, got {actual}"
    );
}

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use geo::{LineString, MultiLineString, coord};
use netiso_core::{
    AnalysisPoint, AttributeValue, Crs, DistanceMethod, LineFeature, LineLayer, Network,
    NetworkConfig, SilentFeedback,
    algo::{InterpolationConfig, calc_iso_points, interpolate},
    build_network,
    model::FieldSchema,
};

const GRID_SIZE: usize = 100;
const SPACING: f64 = 25.0;

fn grid_layer() -> LineLayer {
    let mut features = Vec::new();
    for i in 0..GRID_SIZE {
        for j in 0..GRID_SIZE {
            let (x, y) = (i as f64 * SPACING, j as f64 * SPACING);
            let mut push = |to_x: f64, to_y: f64| {
                let line: LineString<f64> =
                    vec![coord! {x: x, y: y}, coord! {x: to_x, y: to_y}].into();
                features.push(LineFeature::new(MultiLineString::new(vec![line]), vec![]));
            };
            if i + 1 < GRID_SIZE {
                push(x + SPACING, y);
            }
            if j + 1 < GRID_SIZE {
                push(x, y + SPACING);
            }
        }
    }
    LineLayer::new(FieldSchema::default(), features, Crs::default())
}

fn setup() -> (Network, AnalysisPoint) {
    let centre = GRID_SIZE as f64 * SPACING / 2.0;
    let query = coord! {x: centre + 3.0, y: centre + 7.0};
    let network = build_network(&grid_layer(), &[query], &NetworkConfig::default(), &SilentFeedback)
        .expect("grid builds");
    let origin = AnalysisPoint::new(
        "origin",
        AttributeValue::Int(1),
        query.into(),
        &network,
        network.tied_points()[0].snapped,
        DistanceMethod::Planar,
    )
    .expect("origin ties");
    (network, origin)
}

fn benchmark_network(c: &mut Criterion) {
    c.bench_function("build_grid_network", |b| {
        let layer = grid_layer();
        b.iter(|| {
            let network =
                build_network(&layer, &[], &NetworkConfig::default(), &SilentFeedback).unwrap();
            black_box(network.graph().edge_count())
        });
    });

    let (network, origin) = setup();

    c.bench_function("dijkstra_grid", |b| {
        b.iter(|| {
            let result = network.dijkstra(origin.network_vertex_id, 0).unwrap();
            black_box(result.reached().count())
        });
    });

    c.bench_function("iso_points_grid", |b| {
        let origins = [origin.clone()];
        b.iter(|| {
            let cloud = calc_iso_points(&network, &origins, 800.0, 0, &SilentFeedback).unwrap();
            black_box(cloud.len())
        });
    });

    c.bench_function("interpolate_grid", |b| {
        let cloud =
            calc_iso_points(&network, &[origin.clone()], 800.0, 0, &SilentFeedback).unwrap();
        let config = InterpolationConfig::new(10.0);
        b.iter(|| {
            let raster = interpolate(&network, &cloud, &config, &SilentFeedback).unwrap();
            black_box(raster.cells().count())
        });
    });
}

criterion_group!(benches, benchmark_network);
criterion_main!(benches);

#![allow(dead_code)]

use std::path::PathBuf;

use netiso::{Analysis, read_line_layer, read_point_layer};
use netiso_core::{Crs, NetworkConfig, SilentFeedback};

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

pub fn default_crs() -> Crs {
    Crs::projected("EPSG:32633")
}

/// Streets with origins (layer 0) and destinations (layer 1)
pub fn prepare(config: &NetworkConfig) -> Analysis {
    let crs = default_crs();
    let lines = read_line_layer(&fixture_path("streets.geojson"), &crs).expect("streets load");
    let origins = read_point_layer(&fixture_path("origins.geojson"), "origins", Some("code"), &crs)
        .expect("origins load");
    let destinations = read_point_layer(
        &fixture_path("destinations.geojson"),
        "destinations",
        Some("code"),
        &crs,
    )
    .expect("destinations load");

    Analysis::prepare(&lines, &[&origins, &destinations], config, &SilentFeedback)
        .expect("analysis prepares")
}

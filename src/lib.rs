//! Host adapter for the network analysis engine.
//!
//! Reads line and point datasets from GeoJSON, validates and builds the
//! network, ties query points and runs analyses producing GeoJSON, CSV and
//! raster outputs.

pub mod isochrone;
pub mod matrix;
pub mod model;
pub mod routing;

pub use isochrone::{iso_points, iso_polygons, iso_raster};
pub use matrix::{MatrixFormat, od_matrix};
pub use model::{Analysis, read_line_layer, read_point_layer, point_from_wkt};
pub use routing::shortest_path;

pub use netiso_core::{Error, NetworkConfig};

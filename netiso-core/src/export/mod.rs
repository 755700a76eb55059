//! Serialization of analysis results

pub mod csv;
pub mod geojson;
pub mod raster;

pub use self::csv::write_od_csv;
pub use self::geojson::{
    iso_points_to_geojson, iso_polygons_to_geojson, od_matrix_to_geojson, route_to_geojson,
    to_geojson_string,
};
pub use raster::{AsciiGridWriter, RasterWriter};

//! Iso-area computations derived from shortest path trees

pub mod contour;
pub mod interpolation;
pub mod isochrone;

pub use contour::{
    Contourer, HullContourer, ISO_CLOUD_SLACK, IsoPolygon, IsoPolygonConfig, calc_iso_polygons,
    contour_levels,
};
pub use interpolation::{CostRaster, InterpolationConfig, interpolate};
pub use isochrone::{IsoPoint, IsoPointCloud, IsoRecord, calc_iso_points, merge};

use crate::{
    Error,
    model::{Crs, DistanceMethod, GeometryKind, LineLayer, PointLayer},
};

use super::NetworkConfig;

/// Checks that the datasets can be analysed together.
///
/// # Errors
///
/// `GeometryType` when a dataset has the wrong geometry kind, `CrsMismatch`
/// when coordinate systems differ and `GeographicCrs` when planar measurement
/// is requested on angular coordinates.
pub fn validate_inputs(
    lines: &LineLayer,
    points: &[&PointLayer],
    config: &NetworkConfig,
) -> Result<(), Error> {
    if lines.geometry_kind != GeometryKind::Line {
        return Err(Error::GeometryType {
            given: lines.geometry_kind,
            expected: GeometryKind::Line,
        });
    }

    for layer in points {
        if layer.geometry_kind != GeometryKind::Point {
            return Err(Error::GeometryType {
                given: layer.geometry_kind,
                expected: GeometryKind::Point,
            });
        }
        lines.crs.ensure_matches(&layer.crs)?;
    }

    ensure_measurable(&lines.crs, config)
}

/// Planar lengths are meaningless on a geographic CRS.
pub fn ensure_measurable(crs: &Crs, config: &NetworkConfig) -> Result<(), Error> {
    let planar = config.length_method == DistanceMethod::Planar
        || config.entry_cost_method == DistanceMethod::Planar;
    if crs.geographic && planar {
        return Err(Error::GeographicCrs(crs.auth_id.clone()));
    }
    Ok(())
}

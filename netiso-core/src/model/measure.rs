//! Distance measurement between coordinates of the analysis CRS

use std::fmt::Debug;

use geo::{Coord, Distance, Euclidean, Geodesic, LineString, Point};
use serde::{Deserialize, Serialize};

use super::Crs;

/// How lengths are measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMethod {
    /// Euclidean distance in map units, scaled to meters
    #[default]
    Planar,
    /// Geodesic distance on the reference ellipsoid
    Ellipsoidal,
}

/// Ellipsoidal distance oracle
///
/// Receives coordinates of the analysis CRS and returns the geodesic distance
/// in meters. Unprojecting coordinates is the oracle's concern.
pub trait EllipsoidalDistance: Debug + Send + Sync {
    fn distance(&self, a: Coord<f64>, b: Coord<f64>) -> f64;
}

/// Geodesic distance on WGS84 for coordinates given as lon/lat degrees
#[derive(Debug, Default, Clone, Copy)]
pub struct Wgs84Geodesic;

impl EllipsoidalDistance for Wgs84Geodesic {
    fn distance(&self, a: Coord<f64>, b: Coord<f64>) -> f64 {
        Geodesic.distance(Point::from(a), Point::from(b))
    }
}

/// Distance in meters between two coordinates
pub fn measure(
    method: DistanceMethod,
    crs: &Crs,
    ellipsoid: &dyn EllipsoidalDistance,
    a: Coord<f64>,
    b: Coord<f64>,
) -> f64 {
    match method {
        DistanceMethod::Planar => planar_distance(a, b) * crs.meters_per_unit,
        DistanceMethod::Ellipsoidal => ellipsoid.distance(a, b),
    }
}

/// Length in meters of a line string
pub fn measure_line(
    method: DistanceMethod,
    crs: &Crs,
    ellipsoid: &dyn EllipsoidalDistance,
    line: &LineString<f64>,
) -> f64 {
    line.lines()
        .map(|segment| measure(method, crs, ellipsoid, segment.start, segment.end))
        .sum()
}

/// Euclidean distance in map units
pub fn planar_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Euclidean.distance(Point::from(a), Point::from(b))
}

#[cfg(test)]
mod tests {
    use geo::{coord, line_string};

    use super::*;

    #[test]
    fn planar_scales_map_units() {
        let crs = Crs {
            meters_per_unit: 0.3048,
            ..Crs::projected("EPSG:2263")
        };
        let d = measure(
            DistanceMethod::Planar,
            &crs,
            &Wgs84Geodesic,
            coord! {x: 0., y: 0.},
            coord! {x: 3., y: 4.},
        );
        assert!((d - 5.0 * 0.3048).abs() < 1e-12);
    }

    #[test]
    fn line_length_sums_segments() {
        let line = line_string![(x: 0., y: 0.), (x: 3., y: 4.), (x: 3., y: 10.)];
        let d = measure_line(
            DistanceMethod::Planar,
            &Crs::default(),
            &Wgs84Geodesic,
            &line,
        );
        assert!((d - 11.0).abs() < 1e-12);
    }

    #[test]
    fn geodesic_degree_along_equator() {
        let d = Wgs84Geodesic.distance(coord! {x: 0., y: 0.}, coord! {x: 1., y: 0.});
        assert!((d - 111_319.49).abs() < 1.0);
    }
}

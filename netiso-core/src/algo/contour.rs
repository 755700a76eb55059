//! Iso-polygons from an interpolated cost raster

use geo::{ConvexHull, KNearestConcaveHull, MultiPoint, MultiPolygon, Point};
use log::info;
use serde::{Deserialize, Serialize};

use super::{CostRaster, InterpolationConfig, calc_iso_points, interpolate};
use crate::{
    Cost, Error,
    feedback::{Feedback, check_canceled},
    model::{AnalysisPoint, Network},
};

/// Extra budget for the pointcloud behind polygons, as a fraction of the
/// maximum cost, so the outermost level is not clipped by the cloud edge.
pub const ISO_CLOUD_SLACK: f64 = 0.1;

/// Area reachable within `level`
#[derive(Debug, Clone, PartialEq)]
pub struct IsoPolygon {
    pub level: Cost,
    pub geometry: MultiPolygon<f64>,
}

/// Turns a cost grid into one polygon per level
pub trait Contourer {
    fn contour(&self, raster: &CostRaster, levels: &[Cost]) -> Result<Vec<IsoPolygon>, Error>;
}

/// Hull over the centres of cells whose cost stays within the level
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "type")]
pub enum HullContourer {
    Convex,
    /// k-nearest concave hull; larger `k` gives smoother outlines
    Concave { k: u32 },
}

impl Default for HullContourer {
    fn default() -> Self {
        HullContourer::Concave { k: 3 }
    }
}

impl Contourer for HullContourer {
    fn contour(&self, raster: &CostRaster, levels: &[Cost]) -> Result<Vec<IsoPolygon>, Error> {
        Ok(levels
            .iter()
            .map(|&level| {
                let mp: MultiPoint<f64> = raster
                    .cells()
                    .filter(|(_, cost)| *cost <= level)
                    .map(|(center, _)| Point::from(center))
                    .collect();
                let geometry = if mp.0.len() < 3 {
                    MultiPolygon::new(vec![])
                } else {
                    let hull = match self {
                        HullContourer::Convex => mp.convex_hull(),
                        HullContourer::Concave { k } => mp.k_nearest_concave_hull(*k),
                    };
                    MultiPolygon::new(vec![hull])
                };
                IsoPolygon { level, geometry }
            })
            .collect())
    }
}

/// Levels `interval, 2 * interval, ...` up to and including `max_cost`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn contour_levels(max_cost: Cost, interval: Cost) -> Result<Vec<Cost>, Error> {
    if !(interval.is_finite() && interval > 0.0) {
        return Err(Error::InvalidData(format!(
            "Contour interval must be positive, got {interval}"
        )));
    }
    if !(max_cost.is_finite() && max_cost > 0.0) {
        return Err(Error::InvalidData(format!(
            "Maximum cost must be positive, got {max_cost}"
        )));
    }

    let steps = (max_cost / interval + 1e-9).floor() as usize;
    let mut levels: Vec<Cost> = (1..=steps).map(|k| k as f64 * interval).collect();
    if levels
        .last()
        .is_none_or(|last| (max_cost - last).abs() > 1e-9 * max_cost)
    {
        levels.push(max_cost);
    }
    Ok(levels)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsoPolygonConfig {
    pub max_cost: Cost,
    pub interval: Cost,
    pub interpolation: InterpolationConfig,
}

/// Pointcloud, raster and contours in one run.
///
/// The raster is returned along with the polygons so callers can persist it.
pub fn calc_iso_polygons(
    network: &Network,
    origins: &[AnalysisPoint],
    config: &IsoPolygonConfig,
    criterion: usize,
    contourer: &dyn Contourer,
    feedback: &dyn Feedback,
) -> Result<(CostRaster, Vec<IsoPolygon>), Error> {
    let levels = contour_levels(config.max_cost, config.interval)?;
    let budget = config.max_cost * (1.0 + ISO_CLOUD_SLACK);

    let cloud = calc_iso_points(network, origins, budget, criterion, feedback)?;
    let raster = interpolate(network, &cloud, &config.interpolation, feedback)?;
    check_canceled(feedback)?;

    info!("Contouring {} levels", levels.len());
    let polygons = contourer.contour(&raster, &levels)?;
    Ok((raster, polygons))
}

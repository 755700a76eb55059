use std::path::Path;

use geojson::FeatureCollection;
use log::info;
use netiso_core::{
    Cost, Error, Feedback,
    algo::{
        Contourer, CostRaster, InterpolationConfig, IsoPolygonConfig, calc_iso_points,
        calc_iso_polygons, interpolate,
    },
    export::{self, RasterWriter},
};

use crate::Analysis;

/// Reachable vertices within `max_cost` of the origins as point features.
pub fn iso_points(
    analysis: &Analysis,
    origins: usize,
    max_cost: Cost,
    criterion: usize,
    feedback: &dyn Feedback,
) -> Result<FeatureCollection, Error> {
    let cloud = calc_iso_points(
        &analysis.network,
        analysis.points(origins),
        max_cost,
        criterion,
        feedback,
    )?;
    export::iso_points_to_geojson(&cloud.records(&analysis.network)?)
}

/// Interpolated cost raster, persisted through `writer` when a path is given.
pub fn iso_raster(
    analysis: &Analysis,
    origins: usize,
    max_cost: Cost,
    interpolation: &InterpolationConfig,
    criterion: usize,
    output: Option<(&dyn RasterWriter, &Path)>,
    feedback: &dyn Feedback,
) -> Result<CostRaster, Error> {
    let cloud = calc_iso_points(
        &analysis.network,
        analysis.points(origins),
        max_cost,
        criterion,
        feedback,
    )?;
    let raster = interpolate(&analysis.network, &cloud, interpolation, feedback)?;
    info!("Raster of {}x{} cells ready", raster.rows, raster.cols);

    if let Some((writer, path)) = output {
        writer.write_to_path(&raster, path)?;
    }
    Ok(raster)
}

/// Iso-polygons per cost level, optionally persisting the underlying raster.
#[allow(clippy::too_many_arguments)]
pub fn iso_polygons(
    analysis: &Analysis,
    origins: usize,
    config: &IsoPolygonConfig,
    criterion: usize,
    contourer: &dyn Contourer,
    raster_output: Option<(&dyn RasterWriter, &Path)>,
    feedback: &dyn Feedback,
) -> Result<FeatureCollection, Error> {
    let (raster, polygons) = calc_iso_polygons(
        &analysis.network,
        analysis.points(origins),
        config,
        criterion,
        contourer,
        feedback,
    )?;

    if let Some((writer, path)) = raster_output {
        writer.write_to_path(&raster, path)?;
    }
    export::iso_polygons_to_geojson(&polygons)
}

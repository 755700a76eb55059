use geojson::FeatureCollection;
use log::info;
use netiso_core::{AnalysisPoint, Error, Reach, export, routing};

use crate::Analysis;

/// Shortest route between two analysis points as a single line feature.
///
/// # Errors
///
/// Fails on an invalid criterion. An unreachable end point yields
/// `Reach::Unreached` rather than an error.
pub fn shortest_path(
    analysis: &Analysis,
    start: &AnalysisPoint,
    end: &AnalysisPoint,
    criterion: usize,
) -> Result<Reach<FeatureCollection>, Error> {
    match routing::shortest_path(&analysis.network, start, end, criterion)? {
        Reach::Reached(route) => {
            info!(
                "Route from {} to {}: total cost {:.3}",
                route.start.point_id,
                route.end.point_id,
                route.total_cost()
            );
            export::route_to_geojson(&route).map(Reach::Reached)
        }
        Reach::Unreached => {
            info!("No route from {} to {}", start.point_id, end.point_id);
            Ok(Reach::Unreached)
        }
    }
}

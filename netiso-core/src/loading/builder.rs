use std::sync::Arc;

use geo::{ConvexHull, Coord, Intersects, MultiPoint, Point};
use itertools::Itertools;
use log::{info, warn};

use super::{
    NetworkConfig,
    snapping::{collect_segments, split_coords, tie_points},
    validate::ensure_measurable,
};
use crate::{
    Error,
    feedback::{Feedback, ProgressTracker},
    model::{
        EllipsoidalDistance, LineLayer, Network, NetworkEdge, NetworkGraph, Wgs84Geodesic,
        measure, network::TiedPoint,
    },
};

/// Builds a network from line features, tying `query_points` onto it.
///
/// Every query point is projected onto its nearest segment, which is split at
/// the projection. The tied locations are kept on the network in input order.
///
/// # Errors
///
/// Returns a configuration error for invalid settings or unknown fields,
/// `Error::EmptyNetwork` when no usable edge remains and `Error::Canceled` when
/// the feedback requests it.
pub fn build_network(
    layer: &LineLayer,
    query_points: &[Coord<f64>],
    config: &NetworkConfig,
    feedback: &dyn Feedback,
) -> Result<Network, Error> {
    build_network_with_ellipsoid(layer, query_points, config, Arc::new(Wgs84Geodesic), feedback)
}

/// Same as [`build_network`] with a custom ellipsoidal distance oracle.
pub fn build_network_with_ellipsoid(
    layer: &LineLayer,
    query_points: &[Coord<f64>],
    config: &NetworkConfig,
    ellipsoid: Arc<dyn EllipsoidalDistance>,
    feedback: &dyn Feedback,
) -> Result<Network, Error> {
    config.validate()?;
    ensure_measurable(&layer.crs, config)?;
    let strategies = config.resolve_strategies(&layer.schema)?;
    let direction = config.resolve_direction(&layer.schema)?;

    info!(
        "Building network from {} line features and {} query points",
        layer.features.len(),
        query_points.len()
    );
    feedback.push_info("Building network graph");

    let segments = collect_segments(layer);
    if segments.is_empty() {
        return Err(Error::EmptyNetwork);
    }
    let (ties, snapped) = tie_points(&segments, query_points)?;

    let mut graph = NetworkGraph::new(config.tolerance);
    let mut tracker = ProgressTracker::new(feedback, segments.len());
    for (segment, segment_ties) in segments.iter().zip(&ties) {
        tracker.tick()?;

        let feature = &layer.features[segment.feature];
        let travel = direction.direction_of(feature);
        let vertices = split_coords(segment, segment_ties)
            .into_iter()
            .map(|coord| graph.add_vertex(coord))
            .dedup()
            .collect_vec();

        for (&from, &to) in vertices.iter().tuple_windows() {
            let length = measure::measure(
                config.length_method,
                &layer.crs,
                ellipsoid.as_ref(),
                graph.vertex_point(from)?.0,
                graph.vertex_point(to)?.0,
            );
            let costs = strategies
                .iter()
                .map(|strategy| strategy.edge_cost(length, feature))
                .collect_vec();
            let edge = NetworkEdge {
                costs,
                length,
                feature: segment.feature,
                reverse: None,
            };

            let forward = travel
                .allows_forward()
                .then(|| graph.add_edge(from, to, edge.clone()));
            let backward = travel
                .allows_backward()
                .then(|| graph.add_edge(to, from, edge));
            if let (Some(a), Some(b)) = (forward, backward) {
                graph.link_reverse(a, b);
            }
        }
    }
    tracker.finish();

    if graph.edge_count() == 0 {
        return Err(Error::EmptyNetwork);
    }

    let tied_points = snapped
        .into_iter()
        .map(|coord| {
            let vertex = match graph.find_vertex(coord, config.tolerance) {
                Some(vertex) => vertex,
                None => graph.nearest_vertex(coord).ok_or(Error::NoPointsFound)?.0,
            };
            Ok(TiedPoint {
                vertex,
                snapped: coord,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    warn_points_outside(&graph, query_points);
    info!(
        "Network built: {} vertices, {} edges",
        graph.vertex_count(),
        graph.edge_count()
    );

    Ok(Network::new(
        graph,
        strategies,
        direction,
        layer.crs.clone(),
        config.length_method,
        ellipsoid,
        tied_points,
    ))
}

#[allow(clippy::cast_precision_loss)]
fn warn_points_outside(graph: &NetworkGraph, query_points: &[Coord<f64>]) {
    if query_points.is_empty() {
        return;
    }
    let vertices: MultiPoint = graph
        .inner()
        .node_weights()
        .map(|vertex| vertex.geometry)
        .collect();
    let hull = vertices.convex_hull();

    let outside = query_points
        .iter()
        .filter(|coord| !Point::from(**coord).intersects(&hull))
        .count();
    if outside > 0 {
        let total = query_points.len();
        let percentage = (outside as f64 / total as f64) * 100.0;
        warn!(
            "{outside} of {total} query points ({percentage:.1}%) lie outside the network \
        coverage area. Their entry costs may be large."
        );
    }
}

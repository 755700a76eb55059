//! Origin-destination cost matrices between analysis points

use geo::LineString;
use log::info;

use super::DijkstraResult;
use crate::{
    Cost, Error,
    feedback::{Feedback, ProgressTracker},
    model::{AnalysisPoint, AttributeValue, Network},
};

/// Geometry attached to each OD record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OdGeometry {
    #[default]
    None,
    /// Straight line between the two original points
    StraightLine,
    /// Origin point, graph path, destination point
    NetworkPath,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OdCosts {
    pub entry_cost: Cost,
    pub network_cost: Cost,
    pub exit_cost: Cost,
    pub total_cost: Cost,
}

impl OdCosts {
    fn zero() -> Self {
        Self {
            entry_cost: 0.0,
            network_cost: 0.0,
            exit_cost: 0.0,
            total_cost: 0.0,
        }
    }
}

/// One origin-destination pair; `costs` is `None` when unreachable
#[derive(Debug, Clone)]
pub struct OdRecord {
    pub origin_id: AttributeValue,
    pub destination_id: AttributeValue,
    pub costs: Option<OdCosts>,
    pub geometry: Option<LineString<f64>>,
}

/// Costs between every origin and every destination, origin-major.
pub fn od_matrix(
    network: &Network,
    origins: &[AnalysisPoint],
    destinations: &[AnalysisPoint],
    criterion: usize,
    geometry: OdGeometry,
    feedback: &dyn Feedback,
) -> Result<Vec<OdRecord>, Error> {
    info!(
        "Computing OD matrix for {} origins and {} destinations",
        origins.len(),
        destinations.len()
    );
    let total = origins.len() * destinations.len();
    let mut matrix = OdBuilder::new(network, criterion, geometry, feedback, total);
    for origin in origins {
        for destination in destinations {
            matrix.push(origin, destination, false)?;
        }
    }
    Ok(matrix.finish())
}

/// Costs between all pairs of one layer.
///
/// A pair whose points share the same identifier costs 0 in every field.
pub fn od_matrix_within(
    network: &Network,
    points: &[AnalysisPoint],
    criterion: usize,
    geometry: OdGeometry,
    feedback: &dyn Feedback,
) -> Result<Vec<OdRecord>, Error> {
    info!("Computing OD matrix within {} points", points.len());
    let total = points.len() * points.len();
    let mut matrix = OdBuilder::new(network, criterion, geometry, feedback, total);
    for origin in points {
        for destination in points {
            matrix.push(origin, destination, origin.point_id == destination.point_id)?;
        }
    }
    Ok(matrix.finish())
}

/// Accumulates records origin by origin, keeping the search tree of the
/// current origin vertex only
struct OdBuilder<'a> {
    network: &'a Network,
    criterion: usize,
    geometry: OdGeometry,
    tracker: ProgressTracker<'a>,
    tree: Option<DijkstraResult>,
    records: Vec<OdRecord>,
}

impl<'a> OdBuilder<'a> {
    fn new(
        network: &'a Network,
        criterion: usize,
        geometry: OdGeometry,
        feedback: &'a dyn Feedback,
        total: usize,
    ) -> Self {
        Self {
            network,
            criterion,
            geometry,
            tracker: ProgressTracker::new(feedback, total),
            tree: None,
            records: Vec::with_capacity(total),
        }
    }

    fn push(
        &mut self,
        origin: &AnalysisPoint,
        destination: &AnalysisPoint,
        same_point: bool,
    ) -> Result<(), Error> {
        self.tracker.tick()?;

        let source = origin.network_vertex_id;
        let tree = match self.tree.take() {
            Some(tree) if tree.source() == source => tree,
            _ => self.network.dijkstra(source, self.criterion)?,
        };

        let costs = if same_point {
            Some(OdCosts::zero())
        } else {
            let entry_cost = origin.entry_cost(self.criterion)?;
            let exit_cost = destination.entry_cost(self.criterion)?;
            tree.reach(destination.network_vertex_id)
                .map(|network_cost| OdCosts {
                    entry_cost,
                    network_cost,
                    exit_cost,
                    total_cost: entry_cost + network_cost + exit_cost,
                })
                .reached()
        };

        let geometry = match self.geometry {
            OdGeometry::None => None,
            OdGeometry::StraightLine => Some(LineString::from(vec![
                origin.geometry.0,
                destination.geometry.0,
            ])),
            OdGeometry::NetworkPath => {
                network_path(self.network, &tree, origin, destination, costs.is_some())?
            }
        };

        self.records.push(OdRecord {
            origin_id: origin.point_id.clone(),
            destination_id: destination.point_id.clone(),
            costs,
            geometry,
        });
        self.tree = Some(tree);
        Ok(())
    }

    fn finish(self) -> Vec<OdRecord> {
        let reached = self.records.iter().filter(|r| r.costs.is_some()).count();
        info!(
            "OD matrix done: {} of {} pairs reachable",
            reached,
            self.records.len()
        );
        self.tracker.finish();
        self.records
    }
}

fn network_path(
    network: &Network,
    tree: &DijkstraResult,
    origin: &AnalysisPoint,
    destination: &AnalysisPoint,
    reachable: bool,
) -> Result<Option<LineString<f64>>, Error> {
    if !reachable {
        return Ok(None);
    }
    let Some(vertices) = tree.path_vertices(destination.network_vertex_id, network.graph()) else {
        // Same identifier but different vertices: no path to draw
        return Ok(Some(LineString::from(vec![
            origin.geometry.0,
            destination.geometry.0,
        ])));
    };

    let mut coords = Vec::with_capacity(vertices.len() + 2);
    coords.push(origin.geometry.0);
    for vertex in vertices {
        coords.push(network.graph().vertex_point(vertex)?.0);
    }
    coords.push(destination.geometry.0);
    Ok(Some(LineString::from(coords)))
}

#[cfg(test)]
mod tests {
    use geo::{MultiLineString, Point, coord, line_string};

    use super::*;
    use crate::{
        NetworkConfig, SilentFeedback, build_network,
        model::{Crs, DistanceMethod, FieldSchema, LineFeature, LineLayer},
    };

    fn network() -> Network {
        let layer = LineLayer::new(
            FieldSchema::default(),
            vec![LineFeature::new(
                MultiLineString::new(vec![line_string![(x: 0., y: 0.), (x: 100., y: 0.)]]),
                vec![],
            )],
            Crs::default(),
        );
        build_network(&layer, &[], &NetworkConfig::default(), &SilentFeedback).unwrap()
    }

    fn point(network: &Network, id: i64, x: f64) -> AnalysisPoint {
        AnalysisPoint::new(
            "pts",
            AttributeValue::Int(id),
            Point::new(x, 0.),
            network,
            coord! {x: x, y: 0.},
            DistanceMethod::Planar,
        )
        .unwrap()
    }

    #[test]
    fn keeps_only_the_current_origin_tree() {
        let network = network();
        let a = point(&network, 1, 0.);
        let b = point(&network, 2, 100.);

        let mut matrix = OdBuilder::new(&network, 0, OdGeometry::None, &SilentFeedback, 3);
        matrix.push(&a, &b, false).unwrap();
        matrix.push(&a, &a, true).unwrap();
        assert_eq!(
            matrix.tree.as_ref().map(DijkstraResult::source),
            Some(a.network_vertex_id)
        );

        matrix.push(&b, &a, false).unwrap();
        assert_eq!(
            matrix.tree.as_ref().map(DijkstraResult::source),
            Some(b.network_vertex_id)
        );

        let records = matrix.finish();
        assert_eq!(records[0].costs.map(|c| c.total_cost), Some(100.0));
        assert_eq!(records[1].costs, Some(OdCosts::zero()));
        assert_eq!(records[2].costs.map(|c| c.total_cost), Some(100.0));
    }
}

//! Iso-pointclouds: every vertex reachable within a cost budget from one or
//! more origins, with the cheapest cost over all origins.

use geo::{Point, Rect, coord};
use hashbrown::{HashMap, hash_map::Entry};
use log::{debug, info};

use crate::{
    Cost, Error, VertexId,
    feedback::{Feedback, ProgressTracker},
    model::{AnalysisPoint, AttributeValue, Network},
};

/// Cost of a cloud vertex and the origin providing it
#[derive(Debug, Clone, PartialEq)]
pub struct IsoPoint {
    pub cost: Cost,
    pub origin_id: AttributeValue,
}

/// Keeps the cheaper of two candidates; on equal cost the existing one stays.
pub fn merge(existing: IsoPoint, candidate: IsoPoint) -> IsoPoint {
    if candidate.cost < existing.cost {
        candidate
    } else {
        existing
    }
}

/// Output row of a pointcloud
#[derive(Debug, Clone, PartialEq)]
pub struct IsoRecord {
    pub vertex: VertexId,
    pub cost: Cost,
    pub origin_id: AttributeValue,
    pub geometry: Point<f64>,
}

/// Reachable vertices keyed by vertex id
#[derive(Debug, Clone, Default)]
pub struct IsoPointCloud {
    points: HashMap<VertexId, IsoPoint>,
    max_cost: Cost,
    criterion: usize,
}

impl IsoPointCloud {
    /// Empty cloud whose costs are in the unit of `criterion`
    pub fn new(max_cost: Cost, criterion: usize) -> Self {
        Self {
            points: HashMap::new(),
            max_cost,
            criterion,
        }
    }

    pub fn max_cost(&self) -> Cost {
        self.max_cost
    }

    pub fn criterion(&self) -> usize {
        self.criterion
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, vertex: VertexId) -> Option<&IsoPoint> {
        self.points.get(&vertex)
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.points.contains_key(&vertex)
    }

    pub fn cost(&self, vertex: VertexId) -> Option<Cost> {
        self.get(vertex).map(|point| point.cost)
    }

    /// Inserts `candidate` unless the vertex already holds a cheaper cost.
    pub fn upsert(&mut self, vertex: VertexId, candidate: IsoPoint) {
        match self.points.entry(vertex) {
            Entry::Vacant(entry) => {
                entry.insert(candidate);
            }
            Entry::Occupied(mut entry) => {
                let existing = entry.get().clone();
                *entry.get_mut() = merge(existing, candidate);
            }
        }
    }

    /// Vertex ids in ascending order
    pub fn vertices(&self) -> Vec<VertexId> {
        let mut vertices: Vec<_> = self.points.keys().copied().collect();
        vertices.sort_unstable();
        vertices
    }

    /// Rows with vertex geometries, in ascending vertex id
    pub fn records(&self, network: &Network) -> Result<Vec<IsoRecord>, Error> {
        self.vertices()
            .into_iter()
            .filter_map(|vertex| self.points.get(&vertex).map(|point| (vertex, point)))
            .map(|(vertex, point)| {
                Ok(IsoRecord {
                    vertex,
                    cost: point.cost,
                    origin_id: point.origin_id.clone(),
                    geometry: network.graph().vertex_point(vertex)?,
                })
            })
            .collect()
    }

    /// Bounding rectangle of the cloud's vertices
    pub fn extent(&self, network: &Network) -> Option<Rect<f64>> {
        let mut points = self
            .points
            .keys()
            .filter_map(|vertex| network.graph().vertex(*vertex))
            .map(|vertex| vertex.geometry.0);
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), c| {
            (
                coord! {x: min.x.min(c.x), y: min.y.min(c.y)},
                coord! {x: max.x.max(c.x), y: max.y.max(c.y)},
            )
        });
        Some(Rect::new(min, max))
    }
}

/// Collects every vertex whose total cost from any origin stays within
/// `max_cost`.
///
/// Origins are processed one after another. Each origin's own vertex enters
/// at its entry cost; other vertices at network cost plus entry cost, both in
/// the unit of `criterion`. An origin whose entry cost alone exceeds the
/// budget contributes nothing.
///
/// # Errors
///
/// Fails on an invalid criterion or vertex, and with `Error::Canceled` when the
/// feedback requests it during a vertex scan.
pub fn calc_iso_points(
    network: &Network,
    origins: &[AnalysisPoint],
    max_cost: Cost,
    criterion: usize,
    feedback: &dyn Feedback,
) -> Result<IsoPointCloud, Error> {
    info!(
        "Computing iso-pointcloud for {} origins within cost {max_cost}",
        origins.len()
    );
    network.strategy(criterion)?;
    let mut cloud = IsoPointCloud::new(max_cost, criterion);
    let vertex_count = network.graph().vertex_count();
    let mut tracker = ProgressTracker::new(feedback, origins.len() * vertex_count);

    for origin in origins {
        let entry_cost = origin.entry_cost(criterion)?;
        if entry_cost > max_cost {
            debug!(
                "Origin {} lies beyond the budget (entry cost {entry_cost})",
                origin.point_id
            );
            tracker.advance(vertex_count)?;
            continue;
        }

        // on-graph cost may use what the entry leg leaves of the budget
        let result =
            network.dijkstra_within(origin.network_vertex_id, criterion, max_cost - entry_cost)?;
        debug!(
            "Origin {} reached {} vertices",
            origin.point_id,
            result.reached().count()
        );

        for (index, &cost) in result.costs().iter().enumerate() {
            tracker.tick()?;
            if !cost.is_finite() {
                continue;
            }
            let total = cost + entry_cost;
            if total <= max_cost {
                cloud.upsert(
                    VertexId::new(index),
                    IsoPoint {
                        cost: total,
                        origin_id: origin.point_id.clone(),
                    },
                );
            }
        }
    }
    tracker.finish();

    info!("Iso-pointcloud holds {} vertices", cloud.len());
    Ok(cloud)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(cost: f64, origin: &str) -> IsoPoint {
        IsoPoint {
            cost,
            origin_id: origin.into(),
        }
    }

    #[test]
    fn merge_keeps_minimum() {
        assert_eq!(merge(point(5.0, "a"), point(3.0, "b")), point(3.0, "b"));
        assert_eq!(merge(point(3.0, "a"), point(5.0, "b")), point(3.0, "a"));
        assert_eq!(merge(point(3.0, "a"), point(3.0, "b")), point(3.0, "a"));
    }

    #[test]
    fn upsert_never_raises_cost() {
        let mut cloud = IsoPointCloud::new(10.0, 0);
        let v = VertexId::new(4);
        cloud.upsert(v, point(7.0, "a"));
        cloud.upsert(v, point(9.0, "b"));
        assert_eq!(cloud.get(v), Some(&point(7.0, "a")));
        cloud.upsert(v, point(2.0, "c"));
        assert_eq!(cloud.cost(v), Some(2.0));
        assert_eq!(cloud.len(), 1);
    }
}

use geo::{Coord, Point};
use petgraph::{Direction as EdgeDirection, graph::DiGraph, visit::EdgeRef};
use rstar::{PointDistance, RTree, primitives::GeomWithData};

use super::{NetworkEdge, NetworkVertex};
use crate::{EdgeId, Error, VertexId};

/// Vertex coordinate with its id, stored in the spatial index
pub type IndexedPoint = GeomWithData<[f64; 2], VertexId>;

/// Directed network graph with a spatial index over its vertices
///
/// Vertices and edges live in index-stable arrays; ids are dense and 0-based.
/// Once built the graph is only read.
#[derive(Debug, Clone)]
pub struct NetworkGraph {
    pub(crate) graph: DiGraph<NetworkVertex, NetworkEdge>,
    rtree: RTree<IndexedPoint>,
    tolerance: f64,
}

impl NetworkGraph {
    /// Empty graph merging vertices closer than `tolerance` map units
    pub fn new(tolerance: f64) -> Self {
        Self {
            graph: DiGraph::new(),
            rtree: RTree::new(),
            tolerance: tolerance.max(0.0),
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&NetworkVertex> {
        self.graph.node_weight(id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&NetworkEdge> {
        self.graph.edge_weight(id)
    }

    /// `(from, to)` vertices of an edge
    pub fn edge_endpoints(&self, id: EdgeId) -> Option<(VertexId, VertexId)> {
        self.graph.edge_endpoints(id)
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.graph.node_indices()
    }

    pub fn outgoing_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph
            .edges_directed(vertex, EdgeDirection::Outgoing)
            .map(|edge| edge.id())
    }

    pub fn incoming_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.graph
            .edges_directed(vertex, EdgeDirection::Incoming)
            .map(|edge| edge.id())
    }

    /// Incoming followed by outgoing edges of a vertex
    pub fn incident_edges(&self, vertex: VertexId) -> impl Iterator<Item = EdgeId> + '_ {
        self.incoming_edges(vertex)
            .chain(self.outgoing_edges(vertex))
    }

    /// Coordinates of a vertex
    pub fn vertex_point(&self, id: VertexId) -> Result<Point<f64>, Error> {
        self.vertex(id)
            .map(|v| v.geometry)
            .ok_or(Error::InvalidVertex(id.index()))
    }

    pub fn validate_vertex(&self, id: VertexId) -> Result<(), Error> {
        if id.index() < self.vertex_count() {
            Ok(())
        } else {
            Err(Error::InvalidVertex(id.index()))
        }
    }

    /// Vertex lying within `tolerance` of `coord`, if any
    ///
    /// A tolerance of zero only matches identical coordinates.
    pub fn find_vertex(&self, coord: Coord<f64>, tolerance: f64) -> Option<VertexId> {
        let query = [coord.x, coord.y];
        self.rtree
            .nearest_neighbor(&query)
            .filter(|candidate| candidate.distance_2(&query) <= tolerance * tolerance)
            .map(|candidate| candidate.data)
    }

    /// Nearest vertex and its planar distance in map units
    pub fn nearest_vertex(&self, coord: Coord<f64>) -> Option<(VertexId, f64)> {
        let query = [coord.x, coord.y];
        self.rtree
            .nearest_neighbor(&query)
            .map(|candidate| (candidate.data, candidate.distance_2(&query).sqrt()))
    }

    /// Returns the vertex at `coord`, creating one unless an existing vertex
    /// lies within the graph's tolerance.
    pub(crate) fn add_vertex(&mut self, coord: Coord<f64>) -> VertexId {
        if let Some(existing) = self.find_vertex(coord, self.tolerance) {
            return existing;
        }

        let id = self.graph.add_node(NetworkVertex {
            geometry: Point::from(coord),
        });
        self.rtree.insert(IndexedPoint::new([coord.x, coord.y], id));
        id
    }

    pub(crate) fn add_edge(&mut self, from: VertexId, to: VertexId, edge: NetworkEdge) -> EdgeId {
        self.graph.add_edge(from, to, edge)
    }

    /// Marks two edges as the opposite directions of the same segment.
    pub(crate) fn link_reverse(&mut self, a: EdgeId, b: EdgeId) {
        if let Some(edge) = self.graph.edge_weight_mut(a) {
            edge.reverse = Some(b);
        }
        if let Some(edge) = self.graph.edge_weight_mut(b) {
            edge.reverse = Some(a);
        }
    }

    /// Underlying petgraph graph
    pub fn inner(&self) -> &DiGraph<NetworkVertex, NetworkEdge> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use geo::coord;

    use super::*;

    fn edge() -> NetworkEdge {
        NetworkEdge {
            costs: vec![1.0],
            length: 1.0,
            feature: 0,
            reverse: None,
        }
    }

    #[test]
    fn merges_vertices_within_tolerance() {
        let mut graph = NetworkGraph::new(0.5);
        let a = graph.add_vertex(coord! {x: 0., y: 0.});
        let b = graph.add_vertex(coord! {x: 0.3, y: 0.});
        let c = graph.add_vertex(coord! {x: 1., y: 0.});
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(graph.vertex_count(), 2);
    }

    #[test]
    fn zero_tolerance_needs_exact_match() {
        let mut graph = NetworkGraph::new(0.0);
        let a = graph.add_vertex(coord! {x: 2., y: 2.});
        assert_eq!(graph.find_vertex(coord! {x: 2., y: 2.}, 0.0), Some(a));
        assert_eq!(graph.find_vertex(coord! {x: 2., y: 2.000_001}, 0.0), None);
        let (nearest, distance) = graph.nearest_vertex(coord! {x: 2., y: 5.}).unwrap();
        assert_eq!(nearest, a);
        assert!((distance - 3.0).abs() < 1e-12);
    }

    #[test]
    fn exposes_incident_edges() {
        let mut graph = NetworkGraph::new(0.0);
        let a = graph.add_vertex(coord! {x: 0., y: 0.});
        let b = graph.add_vertex(coord! {x: 1., y: 0.});
        let ab = graph.add_edge(a, b, edge());
        let ba = graph.add_edge(b, a, edge());
        graph.link_reverse(ab, ba);

        assert_eq!(graph.outgoing_edges(a).collect::<Vec<_>>(), vec![ab]);
        assert_eq!(graph.incoming_edges(a).collect::<Vec<_>>(), vec![ba]);
        assert_eq!(graph.incident_edges(b).count(), 2);
        assert_eq!(graph.edge(ab).unwrap().reverse, Some(ba));
        assert_eq!(graph.edge_endpoints(ba), Some((b, a)));
    }
}

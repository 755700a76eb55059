//! Network facade: the built graph together with the settings used to build it

use std::sync::Arc;

use geo::Coord;

use super::{
    CostStrategy, Crs, DirectionConfig, DistanceMethod, EllipsoidalDistance, NetworkGraph,
    measure,
};
use crate::{
    Cost, EdgeId, Error, VertexId,
    routing::{DijkstraResult, dijkstra},
};

/// Query coordinate resolved onto the graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiedPoint {
    /// Vertex the coordinate was tied to
    pub vertex: VertexId,
    /// Location of the query coordinate projected onto the network
    pub snapped: Coord<f64>,
}

/// Built network ready for shortest path queries
///
/// Queries never mutate the network, so a single instance can serve any
/// number of independent searches.
#[derive(Debug, Clone)]
pub struct Network {
    graph: NetworkGraph,
    strategies: Vec<CostStrategy>,
    direction: DirectionConfig,
    crs: Crs,
    length_method: DistanceMethod,
    ellipsoid: Arc<dyn EllipsoidalDistance>,
    tied_points: Vec<TiedPoint>,
}

impl Network {
    pub(crate) fn new(
        graph: NetworkGraph,
        strategies: Vec<CostStrategy>,
        direction: DirectionConfig,
        crs: Crs,
        length_method: DistanceMethod,
        ellipsoid: Arc<dyn EllipsoidalDistance>,
        tied_points: Vec<TiedPoint>,
    ) -> Self {
        Self {
            graph,
            strategies,
            direction,
            crs,
            length_method,
            ellipsoid,
            tied_points,
        }
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn crs(&self) -> &Crs {
        &self.crs
    }

    pub fn direction(&self) -> &DirectionConfig {
        &self.direction
    }

    pub fn length_method(&self) -> DistanceMethod {
        self.length_method
    }

    pub fn strategies(&self) -> &[CostStrategy] {
        &self.strategies
    }

    pub fn strategy(&self, criterion: usize) -> Result<&CostStrategy, Error> {
        self.strategies
            .get(criterion)
            .ok_or(Error::InvalidCriterion(criterion))
    }

    /// Tied points, parallel to the query coordinates given at build time
    pub fn tied_points(&self) -> &[TiedPoint] {
        &self.tied_points
    }

    pub fn tied_vertex(&self, index: usize) -> Option<VertexId> {
        self.tied_points.get(index).map(|tied| tied.vertex)
    }

    /// Distance in meters between two coordinates
    pub fn measure(&self, method: DistanceMethod, a: Coord<f64>, b: Coord<f64>) -> f64 {
        measure::measure(method, &self.crs, self.ellipsoid.as_ref(), a, b)
    }

    /// Cost of an off-network leg between two coordinates in the unit of
    /// `criterion`.
    pub fn off_network_cost(
        &self,
        criterion: usize,
        method: DistanceMethod,
        a: Coord<f64>,
        b: Coord<f64>,
    ) -> Result<Cost, Error> {
        Ok(self
            .strategy(criterion)?
            .off_network_cost(self.measure(method, a, b)))
    }

    /// Single source shortest paths over the whole network.
    ///
    /// # Errors
    ///
    /// Fails for an unknown source vertex or criterion. Unreached vertices are
    /// not errors; see [`DijkstraResult::reach`].
    pub fn dijkstra(&self, source: VertexId, criterion: usize) -> Result<DijkstraResult, Error> {
        self.strategy(criterion)?;
        self.graph.validate_vertex(source)?;
        Ok(dijkstra::dijkstra(&self.graph, source, criterion))
    }

    /// Single source search that stops once costs exceed `limit`; vertices
    /// beyond it are unreached.
    pub fn dijkstra_within(
        &self,
        source: VertexId,
        criterion: usize,
        limit: Cost,
    ) -> Result<DijkstraResult, Error> {
        self.strategy(criterion)?;
        self.graph.validate_vertex(source)?;
        Ok(dijkstra::dijkstra_within(
            &self.graph,
            source,
            criterion,
            Some(limit),
        ))
    }

    /// Same traversal as [`dijkstra`](Self::dijkstra), keeping only the
    /// incoming tree edge per vertex.
    pub fn shortest_tree(
        &self,
        source: VertexId,
        criterion: usize,
    ) -> Result<Vec<Option<EdgeId>>, Error> {
        self.dijkstra(source, criterion).map(DijkstraResult::into_tree)
    }
}

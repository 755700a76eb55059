use geo::{Coord, LineString};
use log::debug;

use super::Reach;
use crate::{
    Cost, Error, VertexId,
    model::{AnalysisPoint, Network},
};

/// Shortest route between two analysis points
#[derive(Debug, Clone)]
pub struct Route {
    pub start: AnalysisPoint,
    pub end: AnalysisPoint,
    /// Network vertices from the start vertex to the end vertex
    pub vertices: Vec<VertexId>,
    /// Entry and exit legs in the unit of the queried criterion
    pub entry_cost: Cost,
    pub network_cost: Cost,
    pub exit_cost: Cost,
    /// Start point, the graph path, then the end point
    pub geometry: LineString<f64>,
}

impl Route {
    pub fn total_cost(&self) -> Cost {
        self.entry_cost + self.network_cost + self.exit_cost
    }
}

/// Shortest route from `start` to `end` under a criterion.
///
/// # Errors
///
/// Fails only on invalid vertices or criterion. An end vertex no path leads to
/// yields `Reach::Unreached`.
pub fn shortest_path(
    network: &Network,
    start: &AnalysisPoint,
    end: &AnalysisPoint,
    criterion: usize,
) -> Result<Reach<Route>, Error> {
    let result = network.dijkstra(start.network_vertex_id, criterion)?;
    let entry_cost = start.entry_cost(criterion)?;
    let exit_cost = end.entry_cost(criterion)?;
    let Reach::Reached(network_cost) = result.reach(end.network_vertex_id) else {
        debug!("No path from {} to {}", start.point_id, end.point_id);
        return Ok(Reach::Unreached);
    };

    let vertices = result
        .path_vertices(end.network_vertex_id, network.graph())
        .ok_or(Error::InvalidVertex(end.network_vertex_id.index()))?;

    let mut coords: Vec<Coord<f64>> = Vec::with_capacity(vertices.len() + 2);
    coords.push(start.geometry.0);
    for &vertex in &vertices {
        coords.push(network.graph().vertex_point(vertex)?.0);
    }
    coords.push(end.geometry.0);

    Ok(Reach::Reached(Route {
        start: start.clone(),
        end: end.clone(),
        vertices,
        entry_cost,
        network_cost,
        exit_cost,
        geometry: LineString::from(coords),
    }))
}

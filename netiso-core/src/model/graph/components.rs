//! Network graph components - vertices and edges

use geo::Point;

use crate::{Cost, EdgeId};

/// Network graph vertex
#[derive(Debug, Clone)]
pub struct NetworkVertex {
    /// Vertex coordinates
    pub geometry: Point<f64>,
}

/// Network graph edge (one straight segment, one travel direction)
#[derive(Debug, Clone)]
pub struct NetworkEdge {
    /// One cost per configured strategy
    pub costs: Vec<Cost>,
    /// Segment length in meters
    pub length: f64,
    /// Index of the source feature in the line layer
    pub feature: usize,
    /// Opposite edge when the segment is traversable both ways
    pub reverse: Option<EdgeId>,
}

impl NetworkEdge {
    pub fn cost(&self, criterion: usize) -> Option<Cost> {
        self.costs.get(criterion).copied()
    }
}

//! Weighted network graph

pub mod components;
pub mod network_graph;

pub use components::{NetworkEdge, NetworkVertex};
pub use network_graph::{IndexedPoint, NetworkGraph};

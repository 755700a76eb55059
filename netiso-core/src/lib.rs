//! Network-based spatial analysis over line datasets.
//!
//! A weighted graph is built from line features, off-network query points are
//! tied onto it, and single-source shortest path runs drive routes, OD matrices
//! and iso-areas (pointclouds, interpolated rasters and contour polygons).

pub mod algo;
mod error;
pub mod export;
pub mod feedback;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use error::Error;
pub use feedback::{CancellationToken, Feedback, LogFeedback, SilentFeedback};
pub use loading::{NetworkConfig, StrategyConfig, build_network, validate_inputs};
pub use model::{
    AnalysisPoint, AttributeValue, CostStrategy, Crs, Direction, DistanceMethod, LineFeature,
    LineLayer, Network, NetworkGraph, PointFeature, PointLayer,
};
pub use routing::{DijkstraResult, Reach};

/// Dense vertex id assigned at build time
pub type VertexId = petgraph::graph::NodeIndex;
/// Dense edge id assigned at build time
pub type EdgeId = petgraph::graph::EdgeIndex;
/// Cost in the active unit of a strategy (meters or seconds)
pub type Cost = f64;

/// NoData sentinel written into interpolation rasters
pub const NODATA_VALUE: f64 = -9999.0;

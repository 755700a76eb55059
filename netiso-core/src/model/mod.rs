//! Data model for network analysis
//!
//! Contains input feature types, the network graph and the types derived from it.

pub mod analysis_point;
pub mod crs;
pub mod direction;
pub mod features;
pub mod graph;
pub mod measure;
pub mod network;
pub mod strategy;

pub use analysis_point::AnalysisPoint;
pub use crs::Crs;
pub use direction::{Direction, DirectionConfig};
pub use features::{
    AttributeValue, FieldIndex, FieldSchema, GeometryKind, LineFeature, LineLayer, PointFeature,
    PointLayer,
};
pub use graph::{NetworkEdge, NetworkGraph, NetworkVertex};
pub use measure::{DistanceMethod, EllipsoidalDistance, Wgs84Geodesic};
pub use network::{Network, TiedPoint};
pub use strategy::{CostStrategy, CostUnit};

//! This module is responsible for validating host inputs and building the
//! network graph from line features and query points.

mod builder;
mod config;
mod snapping;
mod validate;

pub use builder::{build_network, build_network_with_ellipsoid};
pub use config::{DirectionSettings, NetworkConfig, StrategyConfig};
pub use validate::{ensure_measurable, validate_inputs};

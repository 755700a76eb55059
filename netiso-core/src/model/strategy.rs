//! Edge cost strategies
//!
//! Lengths are always handed in meters, so the Distance strategy yields meters
//! and the Speed strategy yields seconds.

use super::{FieldIndex, LineFeature};

/// Speeds are configured in km/h; this converts them to m/s.
pub const KMH_TO_MS: f64 = 1000.0 / 3600.0;

/// Unit of the costs produced by a strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CostUnit {
    Meters,
    Seconds,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CostStrategy {
    /// Cost is the edge length
    Distance,
    /// Cost is travel time at the feature's speed
    Speed {
        /// Speed attribute in km/h, resolved against the line schema
        field: Option<FieldIndex>,
        /// Speed in km/h used when the attribute is absent or invalid
        default_speed: f64,
        /// Factor turning a km/h value into m/s
        unit_factor: f64,
    },
}

impl CostStrategy {
    pub fn speed(field: Option<FieldIndex>, default_speed: f64) -> Self {
        CostStrategy::Speed {
            field,
            default_speed,
            unit_factor: KMH_TO_MS,
        }
    }

    pub fn unit(&self) -> CostUnit {
        match self {
            CostStrategy::Distance => CostUnit::Meters,
            CostStrategy::Speed { .. } => CostUnit::Seconds,
        }
    }

    /// Cost of traversing `length_m` meters of `feature`.
    pub fn edge_cost(&self, length_m: f64, feature: &LineFeature) -> f64 {
        match self {
            CostStrategy::Distance => length_m,
            CostStrategy::Speed {
                field,
                default_speed,
                unit_factor,
            } => {
                let speed = field
                    .and_then(|f| feature.attribute(f).as_f64())
                    .filter(|s| s.is_finite() && *s > 0.0)
                    .unwrap_or(*default_speed);
                length_m / (speed * unit_factor)
            }
        }
    }

    /// Cost of an off-network leg of `length_m` meters.
    ///
    /// Off-network legs have no attributes, so the default speed applies.
    pub fn off_network_cost(&self, length_m: f64) -> f64 {
        match self {
            CostStrategy::Distance => length_m,
            CostStrategy::Speed {
                default_speed,
                unit_factor,
                ..
            } => length_m / (default_speed * unit_factor),
        }
    }
}

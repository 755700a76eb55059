use serde::{Deserialize, Serialize};

use crate::{
    Error,
    model::{CostStrategy, Direction, DirectionConfig, DistanceMethod, FieldSchema},
};

/// Settings for building a network, loadable from TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Cost criteria; the first one is the active strategy
    pub strategies: Vec<StrategyConfig>,
    pub direction: DirectionSettings,
    /// Topology tolerance in map units
    pub tolerance: f64,
    /// How edge lengths are measured
    pub length_method: DistanceMethod,
    /// How entry and exit legs are measured
    pub entry_cost_method: DistanceMethod,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            strategies: vec![StrategyConfig::Distance],
            direction: DirectionSettings::default(),
            tolerance: 0.0,
            length_method: DistanceMethod::Planar,
            entry_cost_method: DistanceMethod::Planar,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum StrategyConfig {
    Distance,
    Speed {
        /// Attribute holding the speed in km/h
        #[serde(default)]
        field: Option<String>,
        /// Speed in km/h when the attribute is absent or invalid
        #[serde(default = "default_speed")]
        default_speed: f64,
    },
}

fn default_speed() -> f64 {
    5.0
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionSettings {
    pub field: Option<String>,
    pub forward_value: String,
    pub backward_value: String,
    pub both_value: String,
    pub default: Direction,
}

impl NetworkConfig {
    /// Distance strategy, undirected, exact topology
    pub fn distance() -> Self {
        Self::default()
    }

    /// Speed strategy with a default speed in km/h
    pub fn speed(field: Option<&str>, default_speed: f64) -> Self {
        Self {
            strategies: vec![StrategyConfig::Speed {
                field: field.map(str::to_string),
                default_speed,
            }],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.strategies.is_empty() {
            return Err(Error::InvalidData(
                "At least one cost strategy must be configured".to_string(),
            ));
        }

        for strategy in &self.strategies {
            if let StrategyConfig::Speed { default_speed, .. } = strategy
                && !(default_speed.is_finite() && *default_speed > 0.0)
            {
                return Err(Error::InvalidData(format!(
                    "Default speed must be positive, got {default_speed}"
                )));
            }
        }

        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(Error::InvalidData(format!(
                "Topology tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }

        Ok(())
    }

    /// Resolves strategy field names against the line schema.
    pub fn resolve_strategies(&self, schema: &FieldSchema) -> Result<Vec<CostStrategy>, Error> {
        self.strategies
            .iter()
            .map(|strategy| match strategy {
                StrategyConfig::Distance => Ok(CostStrategy::Distance),
                StrategyConfig::Speed {
                    field,
                    default_speed,
                } => {
                    let field = schema.resolve_optional(field.as_deref())?;
                    Ok(CostStrategy::speed(field, *default_speed))
                }
            })
            .collect()
    }

    /// Resolves the direction field name against the line schema.
    pub fn resolve_direction(&self, schema: &FieldSchema) -> Result<DirectionConfig, Error> {
        let settings = &self.direction;
        Ok(DirectionConfig {
            field: schema.resolve_optional(settings.field.as_deref())?,
            forward_value: settings.forward_value.clone(),
            backward_value: settings.backward_value.clone(),
            both_value: settings.both_value.clone(),
            default: settings.default,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FieldIndex;

    #[test]
    fn defaults_to_undirected_distance() {
        let config = NetworkConfig::default();
        assert_eq!(config.strategies, vec![StrategyConfig::Distance]);
        assert_eq!(config.direction.default, Direction::Both);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_speed() {
        let config = NetworkConfig::speed(None, 0.0);
        assert!(matches!(config.validate(), Err(Error::InvalidData(_))));
    }

    #[test]
    fn resolves_field_names() {
        let schema = FieldSchema::new(vec!["name".into(), "kmh".into(), "oneway".into()]);
        let mut config = NetworkConfig::speed(Some("kmh"), 30.0);
        config.direction.field = Some("oneway".into());

        let strategies = config.resolve_strategies(&schema).unwrap();
        assert_eq!(strategies, vec![CostStrategy::speed(Some(FieldIndex(1)), 30.0)]);
        let direction = config.resolve_direction(&schema).unwrap();
        assert_eq!(direction.field, Some(FieldIndex(2)));

        config.direction.field = Some("missing".into());
        assert!(matches!(
            config.resolve_direction(&schema),
            Err(Error::UnknownField(_))
        ));
    }
}

use std::{fs, path::Path};

use anyhow::{Context, Result};
use netiso_core::{Crs, NetworkConfig, algo::HullContourer};
use serde::Deserialize;

/// Settings file of the command line tool
///
/// ```toml
/// [network]
/// tolerance = 0.5
///
/// [[network.strategies]]
/// type = "speed"
/// field = "maxspeed"
///
/// [crs]
/// auth_id = "EPSG:32633"
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub network: NetworkConfig,
    /// Used for datasets that carry no `crs` member
    pub crs: Crs,
    pub contour: HullContourer,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid settings in {}", path.display()))
    }

    fn parse(text: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        settings.network.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use netiso_core::{StrategyConfig, model::Direction};

    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = Settings::parse("").unwrap();
        assert_eq!(settings.network, NetworkConfig::default());
        assert_eq!(settings.crs, Crs::default());
        assert_eq!(settings.contour, HullContourer::Concave { k: 3 });
    }

    #[test]
    fn reads_strategies_and_direction() {
        let settings = Settings::parse(
            r#"
            [network]
            tolerance = 0.5

            [[network.strategies]]
            type = "speed"
            field = "kmh"

            [[network.strategies]]
            type = "distance"

            [network.direction]
            field = "oneway"
            forward_value = "yes"
            default = "both"

            [crs]
            auth_id = "EPSG:32633"

            [contour]
            type = "convex"
            "#,
        )
        .unwrap();

        assert_eq!(settings.network.tolerance, 0.5);
        assert_eq!(
            settings.network.strategies,
            vec![
                StrategyConfig::Speed {
                    field: Some("kmh".to_string()),
                    default_speed: 5.0
                },
                StrategyConfig::Distance
            ]
        );
        assert_eq!(settings.network.direction.field.as_deref(), Some("oneway"));
        assert_eq!(settings.network.direction.default, Direction::Both);
        assert_eq!(settings.crs, Crs::projected("EPSG:32633"));
        assert_eq!(settings.contour, HullContourer::Convex);
    }

    #[test]
    fn rejects_empty_strategy_list() {
        assert!(Settings::parse("[network]\nstrategies = []\n").is_err());
    }
}

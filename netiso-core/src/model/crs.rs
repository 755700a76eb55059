use serde::{Deserialize, Serialize};

use crate::Error;

/// Coordinate reference metadata of a dataset
///
/// Transformations are not performed here; the metadata only allows inputs to
/// be checked for consistency and planar lengths to be expressed in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Crs {
    /// Authority identifier, e.g. `EPSG:32633`
    pub auth_id: String,
    /// Whether coordinates are angular (lon/lat)
    #[serde(default)]
    pub geographic: bool,
    /// Length of one map unit in meters
    #[serde(default = "default_meters_per_unit")]
    pub meters_per_unit: f64,
}

fn default_meters_per_unit() -> f64 {
    1.0
}

impl Crs {
    pub fn projected(auth_id: impl Into<String>) -> Self {
        Self {
            auth_id: auth_id.into(),
            geographic: false,
            meters_per_unit: 1.0,
        }
    }

    pub fn geographic(auth_id: impl Into<String>) -> Self {
        Self {
            auth_id: auth_id.into(),
            geographic: true,
            meters_per_unit: 1.0,
        }
    }

    /// Fails unless both systems share the same authority identifier.
    pub fn ensure_matches(&self, other: &Crs) -> Result<(), Error> {
        if self.auth_id == other.auth_id {
            Ok(())
        } else {
            Err(Error::CrsMismatch(
                self.auth_id.clone(),
                other.auth_id.clone(),
            ))
        }
    }
}

impl Default for Crs {
    fn default() -> Self {
        Self::projected("EPSG:3857")
    }
}

use serde::{Deserialize, Serialize};

use super::{FieldIndex, LineFeature};

/// Travel direction allowed on a line feature, relative to its digitized order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
    #[default]
    Both,
}

impl Direction {
    pub fn allows_forward(self) -> bool {
        matches!(self, Direction::Forward | Direction::Both)
    }

    pub fn allows_backward(self) -> bool {
        matches!(self, Direction::Backward | Direction::Both)
    }
}

/// Direction attribute resolved against the line layer's schema
#[derive(Debug, Clone, Default)]
pub struct DirectionConfig {
    pub field: Option<FieldIndex>,
    pub forward_value: String,
    pub backward_value: String,
    pub both_value: String,
    pub default: Direction,
}

impl DirectionConfig {
    /// Every feature uses the default direction.
    pub fn undirected(default: Direction) -> Self {
        Self {
            default,
            ..Self::default()
        }
    }

    /// Direction of a feature: the attribute value is compared against the
    /// three sentinels, falling back to the default when the field is not
    /// configured or the value is empty or unrecognized.
    pub fn direction_of(&self, feature: &LineFeature) -> Direction {
        let Some(field) = self.field else {
            return self.default;
        };

        let value = feature.attribute(field).as_text();
        let value = value.trim();
        if value.is_empty() {
            return self.default;
        }

        if value == self.forward_value {
            Direction::Forward
        } else if value == self.backward_value {
            Direction::Backward
        } else if value == self.both_value {
            Direction::Both
        } else {
            self.default
        }
    }
}

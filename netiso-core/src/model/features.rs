//! Input features handed over by the host: line network and query points

use std::fmt;

use geo::{Coord, MultiLineString, Point};
use serde::{Deserialize, Serialize};

use super::Crs;
use crate::Error;

/// Attribute value of a feature
///
/// Point identifiers use this type as well; they are echoed in outputs and
/// never used for computation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }

    /// Numeric interpretation; text is parsed leniently.
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Int(v) => Some(*v as f64),
            AttributeValue::Float(v) => Some(*v),
            AttributeValue::Text(s) => s.trim().parse().ok(),
            AttributeValue::Null | AttributeValue::Bool(_) => None,
        }
    }

    /// Textual interpretation; `Null` is the empty string.
    pub fn as_text(&self) -> String {
        match self {
            AttributeValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Null => write!(f, "NULL"),
            AttributeValue::Bool(v) => write!(f, "{v}"),
            AttributeValue::Int(v) => write!(f, "{v}"),
            AttributeValue::Float(v) => write!(f, "{v}"),
            AttributeValue::Text(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Int(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

/// Offset of an attribute inside a feature's attribute vector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldIndex(pub usize);

/// Ordered attribute names of a layer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSchema {
    names: Vec<String>,
}

impl FieldSchema {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn index_of(&self, name: &str) -> Option<FieldIndex> {
        self.names.iter().position(|n| n == name).map(FieldIndex)
    }

    /// Resolves a field name once, before any feature is read.
    pub fn resolve(&self, name: &str) -> Result<FieldIndex, Error> {
        self.index_of(name)
            .ok_or_else(|| Error::UnknownField(name.to_string()))
    }

    /// Like [`resolve`](Self::resolve) but treats a missing or empty name as
    /// "no field".
    pub fn resolve_optional(&self, name: Option<&str>) -> Result<Option<FieldIndex>, Error> {
        match name {
            None => Ok(None),
            Some(n) if n.is_empty() => Ok(None),
            Some(n) => self.resolve(n).map(Some),
        }
    }
}

/// Geometry kind of a dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Line,
    Polygon,
    Unknown,
}

impl fmt::Display for GeometryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GeometryKind::Point => "Point",
            GeometryKind::Line => "Line",
            GeometryKind::Polygon => "Polygon",
            GeometryKind::Unknown => "UnknownGeometry",
        };
        f.write_str(name)
    }
}

/// Line feature of the network dataset
#[derive(Debug, Clone)]
pub struct LineFeature {
    pub geometry: MultiLineString<f64>,
    pub attributes: Vec<AttributeValue>,
}

impl LineFeature {
    pub fn new(geometry: MultiLineString<f64>, attributes: Vec<AttributeValue>) -> Self {
        Self {
            geometry,
            attributes,
        }
    }

    /// Attribute at a resolved index; out-of-range reads as `Null`.
    pub fn attribute(&self, index: FieldIndex) -> &AttributeValue {
        static NULL: AttributeValue = AttributeValue::Null;
        self.attributes.get(index.0).unwrap_or(&NULL)
    }

    /// A geometry is usable when it has at least one part with two finite
    /// coordinates.
    pub fn has_valid_geometry(&self) -> bool {
        self.geometry.0.iter().any(|line| {
            line.0.len() >= 2 && line.0.iter().all(|c| c.x.is_finite() && c.y.is_finite())
        })
    }
}

/// Line network dataset
#[derive(Debug, Clone)]
pub struct LineLayer {
    pub schema: FieldSchema,
    pub features: Vec<LineFeature>,
    pub crs: Crs,
    pub geometry_kind: GeometryKind,
}

impl LineLayer {
    pub fn new(schema: FieldSchema, features: Vec<LineFeature>, crs: Crs) -> Self {
        Self {
            schema,
            features,
            crs,
            geometry_kind: GeometryKind::Line,
        }
    }
}

/// Query point with its identifier
#[derive(Debug, Clone)]
pub struct PointFeature {
    pub id: AttributeValue,
    pub geometry: Point<f64>,
}

impl PointFeature {
    pub fn new(id: impl Into<AttributeValue>, geometry: Point<f64>) -> Self {
        Self {
            id: id.into(),
            geometry,
        }
    }
}

/// Point dataset, e.g. origins or destinations
#[derive(Debug, Clone)]
pub struct PointLayer {
    pub name: String,
    pub features: Vec<PointFeature>,
    pub crs: Crs,
    pub geometry_kind: GeometryKind,
}

impl PointLayer {
    pub fn new(name: impl Into<String>, features: Vec<PointFeature>, crs: Crs) -> Self {
        Self {
            name: name.into(),
            features,
            crs,
            geometry_kind: GeometryKind::Point,
        }
    }

    pub fn coords(&self) -> Vec<Coord<f64>> {
        self.features.iter().map(|f| f.geometry.0).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

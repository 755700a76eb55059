use std::{fs, path::Path};

use geo::{Coord, Geometry, MultiLineString, Point};
use geojson::{FeatureCollection, GeoJson, JsonObject};
use log::{info, warn};
use netiso_core::{
    AnalysisPoint, Crs, Error, Feedback, Network, NetworkConfig, build_network,
    model::{
        AttributeValue, FieldSchema, GeometryKind, LineFeature, LineLayer, PointFeature,
        PointLayer,
    },
    validate_inputs,
};
use serde_json::Value;
use wkt::TryFromWkt;

/// Built network with the analysis points of every point layer
///
/// Point layers keep the order in which they were passed to
/// [`Analysis::prepare`].
#[derive(Debug)]
pub struct Analysis {
    pub network: Network,
    layers: Vec<Vec<AnalysisPoint>>,
}

impl Analysis {
    /// Validates the datasets, builds the network and ties every point.
    ///
    /// # Errors
    ///
    /// Returns configuration and geometry errors before any work is done,
    /// build errors from the core, and `Error::Canceled` on request.
    pub fn prepare(
        lines: &LineLayer,
        point_layers: &[&PointLayer],
        config: &NetworkConfig,
        feedback: &dyn Feedback,
    ) -> Result<Self, Error> {
        validate_inputs(lines, point_layers, config)?;

        let coords: Vec<Coord<f64>> = point_layers
            .iter()
            .flat_map(|layer| layer.coords())
            .collect();
        let network = build_network(lines, &coords, config, feedback)?;

        let mut offset = 0;
        let mut layers = Vec::with_capacity(point_layers.len());
        for layer in point_layers {
            layers.push(AnalysisPoint::from_features(
                &layer.name,
                &layer.features,
                &network,
                offset,
                config.entry_cost_method,
            )?);
            offset += layer.len();
        }

        info!("Tied {offset} points from {} layers", point_layers.len());
        Ok(Self { network, layers })
    }

    /// Analysis points of the layer at `index`
    pub fn points(&self, index: usize) -> &[AnalysisPoint] {
        self.layers.get(index).map_or(&[], Vec::as_slice)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }
}

/// Reads a line dataset from a GeoJSON file.
pub fn read_line_layer(path: &Path, default_crs: &Crs) -> Result<LineLayer, Error> {
    let text = fs::read_to_string(path)?;
    line_layer_from_str(&text, default_crs)
}

/// Reads a point dataset from a GeoJSON file, taking identifiers from
/// `id_field` or, when absent, from the feature order.
pub fn read_point_layer(
    path: &Path,
    name: &str,
    id_field: Option<&str>,
    default_crs: &Crs,
) -> Result<PointLayer, Error> {
    let text = fs::read_to_string(path)?;
    point_layer_from_str(&text, name, id_field, default_crs)
}

pub fn line_layer_from_str(text: &str, default_crs: &Crs) -> Result<LineLayer, Error> {
    let collection = parse_collection(text)?;
    let crs = collection_crs(&collection).unwrap_or_else(|| default_crs.clone());

    let schema = FieldSchema::new(property_names(&collection));
    let mut kinds = Vec::with_capacity(collection.features.len());
    let mut features = Vec::with_capacity(collection.features.len());

    for (index, feature) in collection.features.iter().enumerate() {
        let geometry = convert_geometry(feature.geometry.as_ref());
        kinds.push(geometry.as_ref().map(geometry_kind));
        let geometry = match geometry {
            Some(Geometry::LineString(line)) => MultiLineString::new(vec![line]),
            Some(Geometry::MultiLineString(lines)) => lines,
            _ => {
                warn!("Line feature {index} has no line geometry");
                MultiLineString::new(vec![])
            }
        };
        let attributes = schema
            .names()
            .iter()
            .map(|name| attribute(feature.properties.as_ref(), name))
            .collect();
        features.push(LineFeature::new(geometry, attributes));
    }

    let mut layer = LineLayer::new(schema, features, crs);
    layer.geometry_kind = layer_kind(&kinds);
    info!("Loaded {} line features", layer.features.len());
    Ok(layer)
}

pub fn point_layer_from_str(
    text: &str,
    name: &str,
    id_field: Option<&str>,
    default_crs: &Crs,
) -> Result<PointLayer, Error> {
    let collection = parse_collection(text)?;
    let crs = collection_crs(&collection).unwrap_or_else(|| default_crs.clone());

    if let Some(field) = id_field
        && !property_names(&collection).iter().any(|n| n == field)
    {
        return Err(Error::UnknownField(field.to_string()));
    }

    let mut kinds = Vec::with_capacity(collection.features.len());
    let mut features = Vec::with_capacity(collection.features.len());
    for (index, feature) in collection.features.iter().enumerate() {
        let geometry = convert_geometry(feature.geometry.as_ref());
        kinds.push(geometry.as_ref().map(geometry_kind));
        let point = match geometry {
            Some(Geometry::Point(point)) => point,
            Some(Geometry::MultiPoint(points)) if !points.0.is_empty() => points.0[0],
            _ => {
                warn!("Skipping point feature {index} of {name}: no point geometry");
                continue;
            }
        };
        let id = match id_field {
            Some(field) => attribute(feature.properties.as_ref(), field),
            None => AttributeValue::Int(i64::try_from(index).unwrap_or(i64::MAX)),
        };
        features.push(PointFeature::new(id, point));
    }

    let mut layer = PointLayer::new(name, features, crs);
    layer.geometry_kind = layer_kind(&kinds);
    info!("Loaded {} points into {name}", layer.len());
    Ok(layer)
}

/// Single point layer from a WKT `POINT`, as used for analyses from one
/// location.
pub fn point_from_wkt(
    name: &str,
    id: AttributeValue,
    wkt: &str,
    crs: &Crs,
) -> Result<PointLayer, Error> {
    let point = Point::try_from_wkt_str(wkt)
        .map_err(|e| Error::InvalidData(format!("Failed to parse point WKT: {e}")))?;
    Ok(PointLayer::new(
        name,
        vec![PointFeature::new(id, point)],
        crs.clone(),
    ))
}

fn parse_collection(text: &str) -> Result<FeatureCollection, Error> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e: geojson::Error| Error::GeoJsonError(e.to_string()))?;
    match geojson {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(feature) => Ok(FeatureCollection {
            features: vec![feature],
            bbox: None,
            foreign_members: None,
        }),
        GeoJson::Geometry(_) => Err(Error::GeoJsonError(
            "Expected a Feature or FeatureCollection".to_string(),
        )),
    }
}

fn convert_geometry(geometry: Option<&geojson::Geometry>) -> Option<Geometry<f64>> {
    let geometry = geometry?;
    Geometry::<f64>::try_from(geometry.clone()).ok()
}

fn geometry_kind(geometry: &Geometry<f64>) -> GeometryKind {
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => GeometryKind::Point,
        Geometry::Line(_) | Geometry::LineString(_) | Geometry::MultiLineString(_) => {
            GeometryKind::Line
        }
        Geometry::Polygon(_)
        | Geometry::MultiPolygon(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_) => GeometryKind::Polygon,
        Geometry::GeometryCollection(_) => GeometryKind::Unknown,
    }
}

/// Kind shared by all geometries; features without geometry are ignored.
fn layer_kind(kinds: &[Option<GeometryKind>]) -> GeometryKind {
    let mut present = kinds.iter().flatten();
    let Some(&first) = present.next() else {
        return GeometryKind::Unknown;
    };
    if present.all(|&kind| kind == first) {
        first
    } else {
        GeometryKind::Unknown
    }
}

/// Property names in order of first appearance across features
fn property_names(collection: &FeatureCollection) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for properties in collection.features.iter().filter_map(|f| f.properties.as_ref()) {
        for key in properties.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }
    names
}

fn attribute(properties: Option<&JsonObject>, name: &str) -> AttributeValue {
    match properties.and_then(|p| p.get(name)) {
        None | Some(Value::Null) => AttributeValue::Null,
        Some(Value::Bool(v)) => AttributeValue::Bool(*v),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(AttributeValue::Int)
            .or_else(|| n.as_f64().map(AttributeValue::Float))
            .unwrap_or_default(),
        Some(Value::String(s)) => AttributeValue::Text(s.clone()),
        Some(other) => AttributeValue::Text(other.to_string()),
    }
}

/// Legacy `crs` member, e.g. `urn:ogc:def:crs:EPSG::32633` becomes `EPSG:32633`
fn collection_crs(collection: &FeatureCollection) -> Option<Crs> {
    let name = collection
        .foreign_members
        .as_ref()?
        .get("crs")?
        .get("properties")?
        .get("name")?
        .as_str()?;

    let auth_id = match name.rsplit_once("EPSG::") {
        Some((_, code)) => format!("EPSG:{code}"),
        None => name.to_string(),
    };
    let geographic = matches!(auth_id.as_str(), "EPSG:4326" | "OGC:1.3:CRS84")
        || name.ends_with("CRS84");
    Some(if geographic {
        Crs::geographic(auth_id)
    } else {
        Crs::projected(auth_id)
    })
}

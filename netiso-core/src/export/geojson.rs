use geo::{LineString, Point};
use geojson::{Feature, FeatureCollection, Geometry, Value as GeoJsonValue};
use serde_json::json;

use crate::{
    Error,
    algo::{IsoPolygon, IsoRecord},
    routing::{OdRecord, Route},
};

fn collection(features: Vec<Feature>) -> FeatureCollection {
    FeatureCollection {
        features,
        bbox: None,
        foreign_members: None,
    }
}

fn line_geometry(line: &LineString<f64>) -> Geometry {
    Geometry::new(GeoJsonValue::from(line))
}

fn point_geometry(point: &Point<f64>) -> Geometry {
    Geometry::new(GeoJsonValue::from(point))
}

/// Route as a single line feature with its endpoints and costs.
pub fn route_to_geojson(route: &Route) -> Result<FeatureCollection, Error> {
    let value = json!({
        "type": "Feature",
        "geometry": line_geometry(&route.geometry),
        "properties": {
            "start_id": route.start.point_id,
            "start_x": route.start.geometry.x(),
            "start_y": route.start.geometry.y(),
            "end_id": route.end.point_id,
            "end_x": route.end.geometry.x(),
            "end_y": route.end.geometry.y(),
            "entry_cost": route.entry_cost,
            "network_cost": route.network_cost,
            "exit_cost": route.exit_cost,
            "total_cost": route.total_cost(),
        }
    });

    let feature =
        Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))?;
    Ok(collection(vec![feature]))
}

/// One feature per OD pair; unreachable pairs carry null costs.
pub fn od_matrix_to_geojson(records: &[OdRecord]) -> Result<FeatureCollection, Error> {
    let features = records
        .iter()
        .map(|record| {
            let geometry = record.geometry.as_ref().map(line_geometry);
            let costs = record.costs;
            let value = json!({
                "type": "Feature",
                "geometry": geometry,
                "properties": {
                    "origin_id": record.origin_id,
                    "destination_id": record.destination_id,
                    "entry_cost": costs.map(|c| c.entry_cost),
                    "network_cost": costs.map(|c| c.network_cost),
                    "exit_cost": costs.map(|c| c.exit_cost),
                    "total_cost": costs.map(|c| c.total_cost),
                }
            });
            Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collection(features))
}

pub fn iso_points_to_geojson(records: &[IsoRecord]) -> Result<FeatureCollection, Error> {
    let features = records
        .iter()
        .map(|record| {
            let value = json!({
                "type": "Feature",
                "geometry": point_geometry(&record.geometry),
                "properties": {
                    "vertex_id": record.vertex.index(),
                    "cost": record.cost,
                    "origin_point_id": record.origin_id,
                }
            });
            Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collection(features))
}

/// Polygons ordered from the largest level down, so smaller areas draw on top.
pub fn iso_polygons_to_geojson(polygons: &[IsoPolygon]) -> Result<FeatureCollection, Error> {
    let features = polygons
        .iter()
        .rev()
        .map(|polygon| {
            let value = json!({
                "type": "Feature",
                "geometry": Geometry::new(GeoJsonValue::from(&polygon.geometry)),
                "properties": {
                    "cost_level": polygon.level,
                }
            });
            Feature::from_json_value(value).map_err(|e| Error::GeoJsonError(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(collection(features))
}

pub fn to_geojson_string(collection: &FeatureCollection) -> Result<String, Error> {
    serde_json::to_string(collection).map_err(|e| Error::GeoJsonError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use geo::line_string;

    use super::*;
    use crate::{model::AttributeValue, routing::OdCosts};

    #[test]
    fn unreachable_pairs_have_null_costs() {
        let records = vec![
            OdRecord {
                origin_id: AttributeValue::Int(1),
                destination_id: AttributeValue::Int(2),
                costs: None,
                geometry: None,
            },
            OdRecord {
                origin_id: AttributeValue::Int(1),
                destination_id: AttributeValue::Int(3),
                costs: Some(OdCosts {
                    entry_cost: 1.0,
                    network_cost: 10.0,
                    exit_cost: 2.0,
                    total_cost: 13.0,
                }),
                geometry: Some(line_string![(x: 0., y: 0.), (x: 1., y: 1.)]),
            },
        ];

        let fc = od_matrix_to_geojson(&records).unwrap();
        assert_eq!(fc.features.len(), 2);

        let unreachable = fc.features[0].properties.as_ref().unwrap();
        assert!(unreachable["total_cost"].is_null());
        assert!(fc.features[0].geometry.is_none());

        let reachable = fc.features[1].properties.as_ref().unwrap();
        assert_eq!(reachable["total_cost"], json!(13.0));
        assert_eq!(reachable["origin_id"], json!(1));
    }
}

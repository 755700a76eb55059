use std::fmt;

use geo::{Coord, LineString, Point};
use log::trace;

use super::{AttributeValue, DistanceMethod, Network, PointFeature};
use crate::{Cost, Error, VertexId};

/// Query point tied to its nearest network vertex
#[derive(Debug, Clone)]
pub struct AnalysisPoint {
    /// Label of the dataset the point comes from
    pub layer_name: String,
    /// Identifier echoed in outputs
    pub point_id: AttributeValue,
    /// Original (possibly off-network) location
    pub geometry: Point<f64>,
    pub network_vertex_id: VertexId,
    /// Length in meters of the leg between `geometry` and the network vertex
    pub entry_length: f64,
    /// Cost of that leg under each criterion of the network
    pub entry_costs: Vec<Cost>,
}

impl AnalysisPoint {
    /// Ties a point to the network vertex nearest to `snapping`, usually the
    /// tied location produced at build time.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoPointsFound` when the network has no vertices.
    pub fn new(
        layer_name: impl Into<String>,
        point_id: AttributeValue,
        geometry: Point<f64>,
        network: &Network,
        snapping: Coord<f64>,
        method: DistanceMethod,
    ) -> Result<Self, Error> {
        let (vertex, _) = network
            .graph()
            .nearest_vertex(snapping)
            .ok_or(Error::NoPointsFound)?;
        let vertex_point = network.graph().vertex_point(vertex)?;
        let entry_length = network.measure(method, geometry.0, vertex_point.0);
        let entry_costs = network
            .strategies()
            .iter()
            .map(|strategy| strategy.off_network_cost(entry_length))
            .collect();

        let point = Self {
            layer_name: layer_name.into(),
            point_id,
            geometry,
            network_vertex_id: vertex,
            entry_length,
            entry_costs,
        };
        trace!("{point}");
        Ok(point)
    }

    /// Ties every feature of a layer, assuming the layer's coordinates were
    /// handed to the builder as one block starting at `tie_offset`.
    pub fn from_features(
        layer_name: &str,
        features: &[PointFeature],
        network: &Network,
        tie_offset: usize,
        method: DistanceMethod,
    ) -> Result<Vec<Self>, Error> {
        features
            .iter()
            .enumerate()
            .map(|(i, feature)| {
                let snapped = network
                    .tied_points()
                    .get(tie_offset + i)
                    .map_or(feature.geometry.0, |tied| tied.snapped);
                Self::new(
                    layer_name,
                    feature.id.clone(),
                    feature.geometry,
                    network,
                    snapped,
                    method,
                )
            })
            .collect()
    }

    /// Entry cost in the unit of `criterion`.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidCriterion` for a criterion the network lacks.
    pub fn entry_cost(&self, criterion: usize) -> Result<Cost, Error> {
        self.entry_costs
            .get(criterion)
            .copied()
            .ok_or(Error::InvalidCriterion(criterion))
    }

    /// Straight leg from the original location to the network vertex
    pub fn entry_linestring(&self, network: &Network) -> Result<LineString<f64>, Error> {
        let vertex = network.graph().vertex_point(self.network_vertex_id)?;
        Ok(LineString::from(vec![self.geometry.0, vertex.0]))
    }
}

impl fmt::Display for AnalysisPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AnalysisPoint {} id {} at ({}, {}) -> vertex {} (entry leg {:.3} m)",
            self.layer_name,
            self.point_id,
            self.geometry.x(),
            self.geometry.y(),
            self.network_vertex_id.index(),
            self.entry_length
        )
    }
}

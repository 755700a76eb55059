//! Interpolation of an iso-pointcloud into a regular cost raster
//!
//! Costs are assumed to grow linearly along edges. A cell is projected onto the
//! edge between its nearest cloud vertex and an adjacent cloud vertex; its cost
//! is the cheaper endpoint cost carried along the edge to the projection, plus
//! the off-network leg to the cell midpoint.

use geo::{Closest, ClosestPoint, Coord, Line, Point, coord};
use log::info;
use rstar::{RTree, primitives::GeomWithData};

use super::IsoPointCloud;
use crate::{
    Cost, Error, NODATA_VALUE, VertexId,
    feedback::{Feedback, ProgressTracker},
    model::{CostStrategy, Crs, Network},
};

type CloudPoint = GeomWithData<[f64; 2], VertexId>;

/// Dense row-major grid of costs, north-up
#[derive(Debug, Clone, PartialEq)]
pub struct CostRaster {
    pub rows: usize,
    pub cols: usize,
    /// Upper-left corner
    pub origin_x: f64,
    pub origin_y: f64,
    pub cell_size: f64,
    pub nodata: f64,
    pub data: Vec<f64>,
    pub crs: Crs,
}

impl CostRaster {
    /// GDAL-style geotransform
    pub fn geotransform(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.cell_size,
            0.0,
            self.origin_y,
            0.0,
            -self.cell_size,
        ]
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn cell_center(&self, row: usize, col: usize) -> Coord<f64> {
        coord! {
            x: self.origin_x + (col as f64 + 0.5) * self.cell_size,
            y: self.origin_y - (row as f64 + 0.5) * self.cell_size,
        }
    }

    /// Raw value including the NoData sentinel
    pub fn value(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.cols + col])
    }

    /// Cost of a cell, `None` for NoData or out of range
    pub fn cost(&self, row: usize, col: usize) -> Option<Cost> {
        self.value(row, col).filter(|v| *v != self.nodata)
    }

    /// Cell centres with their costs, skipping NoData
    pub fn cells(&self) -> impl Iterator<Item = (Coord<f64>, Cost)> + '_ {
        (0..self.rows).flat_map(move |row| {
            (0..self.cols).filter_map(move |col| {
                self.cost(row, col)
                    .map(|cost| (self.cell_center(row, col), cost))
            })
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterpolationConfig {
    /// Cell size in map units
    pub cell_size: f64,
    /// Nearest cloud vertices examined per cell
    pub neighbor_search_limit: usize,
}

impl InterpolationConfig {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            neighbor_search_limit: 16,
        }
    }
}

/// Interpolates `cloud` onto a grid covering its extent.
///
/// # Errors
///
/// `InvalidData` for a non-positive cell size, `NoPointsFound` for an empty
/// cloud and `Canceled` when the feedback requests it.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn interpolate(
    network: &Network,
    cloud: &IsoPointCloud,
    config: &InterpolationConfig,
    feedback: &dyn Feedback,
) -> Result<CostRaster, Error> {
    let cell_size = config.cell_size;
    if !(cell_size.is_finite() && cell_size > 0.0) {
        return Err(Error::InvalidData(format!(
            "Cell size must be positive, got {cell_size}"
        )));
    }
    let extent = cloud.extent(network).ok_or(Error::NoPointsFound)?;

    let cols = ((extent.width() / cell_size).ceil() as usize).max(1);
    let rows = ((extent.height() / cell_size).ceil() as usize).max(1);
    info!(
        "Interpolating {} cloud vertices onto {rows}x{cols} cells",
        cloud.len()
    );
    feedback.push_info("Interpolating cost raster");

    let mut raster = CostRaster {
        rows,
        cols,
        origin_x: extent.min().x,
        origin_y: extent.max().y,
        cell_size,
        nodata: NODATA_VALUE,
        data: vec![NODATA_VALUE; rows * cols],
        crs: network.crs().clone(),
    };

    let mut entries = Vec::with_capacity(cloud.len());
    for vertex in cloud.vertices() {
        let point = network.graph().vertex_point(vertex)?;
        entries.push(CloudPoint::new([point.x(), point.y()], vertex));
    }
    let index = RTree::bulk_load(entries);
    let interpolator = CellInterpolator {
        network,
        strategy: network.strategy(cloud.criterion())?,
        cloud,
        index: &index,
        limit: config.neighbor_search_limit.max(2),
    };

    let mut tracker = ProgressTracker::new(feedback, rows * cols);
    for row in 0..rows {
        for col in 0..cols {
            tracker.tick()?;
            if let Some(cost) = interpolator.cost_at(raster.cell_center(row, col)) {
                raster.data[row * cols + col] = cost;
            }
        }
    }
    tracker.finish();

    Ok(raster)
}

struct CellInterpolator<'a> {
    network: &'a Network,
    /// Strategy the cloud's costs were computed with
    strategy: &'a CostStrategy,
    cloud: &'a IsoPointCloud,
    index: &'a RTree<CloudPoint>,
    limit: usize,
}

impl CellInterpolator<'_> {
    fn cost_at(&self, cell: Coord<f64>) -> Option<Cost> {
        let query = [cell.x, cell.y];
        let mut nearest = self.index.nearest_neighbor_iter(&query).take(self.limit);
        let n = nearest.next()?.data;
        let neighbours = self.adjacent(n);

        let m = nearest.map(|p| p.data).find(|v| neighbours.contains(v))?;
        let m_cost = self.cloud.cost(m)?;
        let n_cost = self.cloud.cost(n)?;

        let n_point = self.network.graph().vertex_point(n).ok()?;
        let m_point = self.network.graph().vertex_point(m).ok()?;
        let cell_point = Point::from(cell);
        let foot = match Line::new(m_point.0, n_point.0).closest_point(&cell_point) {
            Closest::Intersection(p) | Closest::SinglePoint(p) => p,
            Closest::Indeterminate => m_point,
        };

        let along_edge = (m_cost + self.to_cost(m_point.0, foot.0))
            .min(n_cost + self.to_cost(n_point.0, foot.0));
        Some(along_edge + self.to_cost(foot.0, cell))
    }

    /// Vertices joined to `vertex` by an edge in either direction
    fn adjacent(&self, vertex: VertexId) -> Vec<VertexId> {
        let graph = self.network.graph();
        graph
            .incident_edges(vertex)
            .filter_map(|edge| graph.edge_endpoints(edge))
            .map(|(from, to)| if from == vertex { to } else { from })
            .collect()
    }

    fn to_cost(&self, a: Coord<f64>, b: Coord<f64>) -> Cost {
        let length = self.network.measure(self.network.length_method(), a, b);
        self.strategy.off_network_cost(length)
    }
}

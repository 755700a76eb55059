pub use crate::NODATA_VALUE;

// Re-export key components
pub use crate::algo::{
    Contourer, CostRaster, HullContourer, InterpolationConfig, IsoPointCloud, IsoPolygon,
    IsoPolygonConfig, calc_iso_points, calc_iso_polygons, contour_levels, interpolate,
};
pub use crate::export::{AsciiGridWriter, RasterWriter};
pub use crate::feedback::{CancellationToken, Feedback, LogFeedback, SilentFeedback};
pub use crate::loading::{NetworkConfig, StrategyConfig, build_network, validate_inputs};
pub use crate::model::{
    AnalysisPoint, AttributeValue, CostStrategy, Crs, Direction, DistanceMethod, LineLayer,
    Network, PointLayer,
};
pub use crate::routing::{
    OdGeometry, OdRecord, Reach, Route, od_matrix, od_matrix_within, shortest_path,
};

// Core graph types
pub use crate::Cost;
pub use crate::EdgeId;
pub use crate::VertexId;

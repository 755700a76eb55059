use thiserror::Error;

use crate::model::GeometryKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "Coordinate reference systems don't match: {0} != {1}. Reproject all datasets so that their CRSs match"
    )]
    CrsMismatch(String, String),
    #[error(
        "Analysis requires a projected coordinate reference system, got geographic {0}. Use a projected system (eg. UTM zones) or ellipsoidal measurement"
    )]
    GeographicCrs(String),
    #[error("Network has no edges after build")]
    EmptyNetwork,
    #[error("Dataset has wrong geometry type: got {given} dataset but expected {expected} dataset")]
    GeometryType {
        given: GeometryKind,
        expected: GeometryKind,
    },
    #[error("Unknown field: {0}")]
    UnknownField(String),
    #[error("Invalid vertex index {0}")]
    InvalidVertex(usize),
    #[error("Invalid cost criterion {0}")]
    InvalidCriterion(usize),
    #[error("No nearby points found for snapping")]
    NoPointsFound,
    #[error("Invalid data: {0}")]
    InvalidData(String),
    #[error("Operation canceled")]
    Canceled,
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    GeoJsonError(String),
}

impl Error {
    /// Errors caused by inconsistent inputs or settings rather than by data
    /// encountered during computation.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::CrsMismatch(..)
                | Error::GeographicCrs(_)
                | Error::EmptyNetwork
                | Error::UnknownField(_)
                | Error::InvalidCriterion(_)
        )
    }
}

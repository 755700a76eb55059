use std::io::Write;

use log::info;
use netiso_core::{
    Error, Feedback, export,
    routing::{self, OdGeometry, OdRecord},
};

use crate::Analysis;

/// Output encoding of an OD matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatrixFormat {
    #[default]
    GeoJson,
    /// `;`-delimited CSV; geometries are dropped
    Csv,
}

/// Computes an OD matrix and writes it to `out`.
///
/// With `destinations` set to `None` the matrix covers all pairs of the
/// origin layer. Returns the number of records written.
#[allow(clippy::too_many_arguments)]
pub fn od_matrix<W: Write>(
    analysis: &Analysis,
    origins: usize,
    destinations: Option<usize>,
    criterion: usize,
    geometry: OdGeometry,
    format: MatrixFormat,
    out: W,
    feedback: &dyn Feedback,
) -> Result<usize, Error> {
    let records = compute(analysis, origins, destinations, criterion, geometry, feedback)?;
    write_records(&records, format, out)?;
    info!("Wrote {} OD records", records.len());
    Ok(records.len())
}

fn compute(
    analysis: &Analysis,
    origins: usize,
    destinations: Option<usize>,
    criterion: usize,
    geometry: OdGeometry,
    feedback: &dyn Feedback,
) -> Result<Vec<OdRecord>, Error> {
    let network = &analysis.network;
    match destinations {
        Some(destinations) => routing::od_matrix(
            network,
            analysis.points(origins),
            analysis.points(destinations),
            criterion,
            geometry,
            feedback,
        ),
        None => routing::od_matrix_within(
            network,
            analysis.points(origins),
            criterion,
            geometry,
            feedback,
        ),
    }
}

fn write_records<W: Write>(
    records: &[OdRecord],
    format: MatrixFormat,
    mut out: W,
) -> Result<(), Error> {
    match format {
        MatrixFormat::Csv => export::write_od_csv(out, records),
        MatrixFormat::GeoJson => {
            let collection = export::od_matrix_to_geojson(records)?;
            out.write_all(export::to_geojson_string(&collection)?.as_bytes())?;
            out.flush()?;
            Ok(())
        }
    }
}

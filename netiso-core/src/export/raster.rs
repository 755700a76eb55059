use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

use log::info;

use crate::{Error, algo::CostRaster};

/// Persists a cost raster; the format is up to the implementation.
pub trait RasterWriter {
    fn write(&self, raster: &CostRaster, out: &mut dyn Write) -> Result<(), Error>;

    /// Persists the raster's spatial reference next to `path`; formats that
    /// embed it in [`write`](Self::write) keep the default.
    fn write_crs(&self, _raster: &CostRaster, _path: &Path) -> Result<(), Error> {
        Ok(())
    }

    fn write_to_path(&self, raster: &CostRaster, path: &Path) -> Result<(), Error> {
        let mut out = BufWriter::new(File::create(path)?);
        self.write(raster, &mut out)?;
        out.flush()?;
        self.write_crs(raster, path)?;
        info!("Raster written to {}", path.display());
        Ok(())
    }
}

/// ESRI ASCII grid (`.asc`)
///
/// The grid header has no CRS field, so the authority id goes into a `.prj`
/// sidecar with the same stem.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiGridWriter;

impl RasterWriter for AsciiGridWriter {
    fn write_crs(&self, raster: &CostRaster, path: &Path) -> Result<(), Error> {
        fs::write(path.with_extension("prj"), format!("{}\n", raster.crs.auth_id))?;
        Ok(())
    }

    #[allow(clippy::cast_precision_loss)]
    fn write(&self, raster: &CostRaster, out: &mut dyn Write) -> Result<(), Error> {
        let yll = raster.origin_y - raster.rows as f64 * raster.cell_size;
        writeln!(out, "ncols {}", raster.cols)?;
        writeln!(out, "nrows {}", raster.rows)?;
        writeln!(out, "xllcorner {}", raster.origin_x)?;
        writeln!(out, "yllcorner {yll}")?;
        writeln!(out, "cellsize {}", raster.cell_size)?;
        writeln!(out, "NODATA_value {}", raster.nodata)?;

        for row in raster.data.chunks(raster.cols.max(1)) {
            let line = row
                .iter()
                .map(f64::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            writeln!(out, "{line}")?;
        }
        Ok(())
    }
}

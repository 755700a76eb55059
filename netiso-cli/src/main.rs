mod config;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use netiso::{
    Analysis, MatrixFormat, iso_points, iso_polygons, iso_raster, od_matrix, point_from_wkt,
    read_line_layer, read_point_layer, shortest_path,
};
use netiso_core::{
    AttributeValue, LineLayer, LogFeedback, PointLayer, Reach,
    algo::{InterpolationConfig, IsoPolygonConfig},
    export::{AsciiGridWriter, RasterWriter, to_geojson_string},
    routing::OdGeometry,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::Settings;

#[derive(Parser, Debug)]
#[command(author, version, about = "Network analysis over GeoJSON line datasets")]
struct Cli {
    /// Line network as GeoJSON.
    #[arg(long)]
    network: PathBuf,

    /// TOML settings for the network build.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cost criterion to route on.
    #[arg(long, default_value_t = 0)]
    criterion: usize,

    /// Output file; standard output when omitted.
    #[arg(long, short)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct OriginArgs {
    /// Origin points as GeoJSON.
    #[arg(long)]
    origins: PathBuf,

    /// Property holding point identifiers; feature order when omitted.
    #[arg(long)]
    id_field: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Shortest route between two WKT points.
    ShortestPath {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
    },
    /// Costs between every origin and destination.
    OdMatrix {
        #[command(flatten)]
        origins: OriginArgs,
        /// Destination points; all pairs of origins when omitted.
        #[arg(long)]
        destinations: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = GeometryArg::None)]
        geometry: GeometryArg,
        /// Write `;`-delimited CSV instead of GeoJSON.
        #[arg(long)]
        csv: bool,
    },
    /// Vertices reachable within a cost.
    IsoPoints {
        #[command(flatten)]
        origins: OriginArgs,
        #[arg(long)]
        max_cost: f64,
    },
    /// Interpolated cost raster written as ESRI ASCII grid.
    IsoRaster {
        #[command(flatten)]
        origins: OriginArgs,
        #[arg(long)]
        max_cost: f64,
        #[arg(long)]
        cell_size: f64,
    },
    /// Iso-polygons for evenly spaced cost levels.
    IsoPolygons {
        #[command(flatten)]
        origins: OriginArgs,
        #[arg(long)]
        max_cost: f64,
        #[arg(long)]
        interval: f64,
        #[arg(long)]
        cell_size: f64,
        /// Also write the underlying raster.
        #[arg(long)]
        raster: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum GeometryArg {
    None,
    Straight,
    Network,
}

impl From<GeometryArg> for OdGeometry {
    fn from(arg: GeometryArg) -> Self {
        match arg {
            GeometryArg::None => OdGeometry::None,
            GeometryArg::Straight => OdGeometry::StraightLine,
            GeometryArg::Network => OdGeometry::NetworkPath,
        }
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let lines = read_line_layer(&cli.network, &settings.crs)
        .with_context(|| format!("failed to read network from {}", cli.network.display()))?;

    match &cli.command {
        Command::ShortestPath { start, end } => {
            handle_shortest_path(&cli, &settings, &lines, start, end)
        }
        Command::OdMatrix {
            origins,
            destinations,
            geometry,
            csv,
        } => handle_od_matrix(
            &cli,
            &settings,
            &lines,
            origins,
            destinations.as_deref(),
            (*geometry).into(),
            *csv,
        ),
        Command::IsoPoints { origins, max_cost } => {
            let analysis = prepare(&settings, &lines, &[&read_origins(origins, &lines)?])?;
            let collection = iso_points(&analysis, 0, *max_cost, cli.criterion, &LogFeedback::new())?;
            write_text(cli.output.as_deref(), &to_geojson_string(&collection)?)
        }
        Command::IsoRaster {
            origins,
            max_cost,
            cell_size,
        } => {
            let path = cli
                .output
                .as_deref()
                .context("iso-raster needs --output for the grid file")?;
            let analysis = prepare(&settings, &lines, &[&read_origins(origins, &lines)?])?;
            iso_raster(
                &analysis,
                0,
                *max_cost,
                &InterpolationConfig::new(*cell_size),
                cli.criterion,
                Some((&AsciiGridWriter as &dyn RasterWriter, path)),
                &LogFeedback::new(),
            )?;
            Ok(())
        }
        Command::IsoPolygons {
            origins,
            max_cost,
            interval,
            cell_size,
            raster,
        } => {
            let analysis = prepare(&settings, &lines, &[&read_origins(origins, &lines)?])?;
            let config = IsoPolygonConfig {
                max_cost: *max_cost,
                interval: *interval,
                interpolation: InterpolationConfig::new(*cell_size),
            };
            let raster_output = raster
                .as_deref()
                .map(|path| (&AsciiGridWriter as &dyn RasterWriter, path));
            let collection = iso_polygons(
                &analysis,
                0,
                &config,
                cli.criterion,
                &settings.contour,
                raster_output,
                &LogFeedback::new(),
            )?;
            write_text(cli.output.as_deref(), &to_geojson_string(&collection)?)
        }
    }
}

fn handle_shortest_path(
    cli: &Cli,
    settings: &Settings,
    lines: &LineLayer,
    start: &str,
    end: &str,
) -> Result<()> {
    let start_layer = point_from_wkt("start", AttributeValue::from("start"), start, &lines.crs)?;
    let end_layer = point_from_wkt("end", AttributeValue::from("end"), end, &lines.crs)?;
    let analysis = prepare(settings, lines, &[&start_layer, &end_layer])?;

    let start = analysis.points(0).first().context("start point was not tied")?;
    let end = analysis.points(1).first().context("end point was not tied")?;
    match shortest_path(&analysis, start, end, cli.criterion)? {
        Reach::Reached(collection) => {
            write_text(cli.output.as_deref(), &to_geojson_string(&collection)?)
        }
        Reach::Unreached => {
            warn!("End point is not reachable from the start point");
            Ok(())
        }
    }
}

fn handle_od_matrix(
    cli: &Cli,
    settings: &Settings,
    lines: &LineLayer,
    origins: &OriginArgs,
    destinations: Option<&Path>,
    geometry: OdGeometry,
    csv: bool,
) -> Result<()> {
    let origin_layer = read_origins(origins, lines)?;
    let destination_layer = destinations
        .map(|path| read_points(path, "destinations", origins.id_field.as_deref(), lines))
        .transpose()?;

    let mut layers = vec![&origin_layer];
    layers.extend(destination_layer.as_ref());
    let analysis = prepare(settings, lines, &layers)?;

    let format = if csv {
        MatrixFormat::Csv
    } else {
        MatrixFormat::GeoJson
    };
    let out = open_output(cli.output.as_deref())?;
    let written = od_matrix(
        &analysis,
        0,
        destination_layer.as_ref().map(|_| 1),
        cli.criterion,
        geometry,
        format,
        out,
        &LogFeedback::new(),
    )?;
    info!(records = written, "OD matrix done");
    Ok(())
}

fn prepare(settings: &Settings, lines: &LineLayer, layers: &[&PointLayer]) -> Result<Analysis> {
    let analysis = Analysis::prepare(lines, layers, &settings.network, &LogFeedback::new())
        .context("failed to build the network")?;
    info!(
        vertices = analysis.network.graph().vertex_count(),
        edges = analysis.network.graph().edge_count(),
        "Network ready"
    );
    Ok(analysis)
}

fn read_origins(args: &OriginArgs, lines: &LineLayer) -> Result<PointLayer> {
    read_points(&args.origins, "origins", args.id_field.as_deref(), lines)
}

fn read_points(
    path: &Path,
    name: &str,
    id_field: Option<&str>,
    lines: &LineLayer,
) -> Result<PointLayer> {
    read_point_layer(path, name, id_field, &lines.crs)
        .with_context(|| format!("failed to read {name} from {}", path.display()))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    })
}

fn write_text(path: Option<&Path>, text: &str) -> Result<()> {
    let mut out = open_output(path)?;
    out.write_all(text.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // try_init also routes the core's `log` records into tracing
    let _ = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .try_init();
}

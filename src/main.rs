use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use geo_data_master::dem::DEFAULT_FALLBACK;
use geo_data_master::export::{dem_file_name, geojson_file_name, to_geojson_string};
use geo_data_master::{
    generate_with, CenterPoint, CircleFidelity, Config, Dataset, DemClient, Error, Geocoder,
    Result, ShapeKind, ShapeRequest,
};

// Mount Everest
const DEFAULT_LATITUDE: f64 = 27.9881;
const DEFAULT_LONGITUDE: f64 = 86.9250;

const FILE_NAME_HELP: &str = "\
Output files are named {name}_{label}_WGS84.geojson and {name}_{label}_DEM.tif.
The label prints sizes in their shortest form: 10 km x 10 km is 10x10km (not
10.0x10.0km), 2.5 km x 3 km is 2.5x3km and a 5 km radius is R5km.";

#[derive(Parser)]
#[command(
    name = "geo-data-master",
    version,
    about = "Generate AOIs and download elevation data",
    after_help = FILE_NAME_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print an AOI and optionally write it as GeoJSON
    Aoi {
        #[command(flatten)]
        area: AreaArgs,
        /// Outline circles with the planar degree buffer instead of geodesic vertices
        #[arg(long)]
        degree_buffer: bool,
        /// Directory to write the GeoJSON file into
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Look up a place name
    Geocode { query: String },
    /// Download a GeoTIFF DEM for an AOI
    Dem {
        #[command(flatten)]
        area: AreaArgs,
        #[arg(long, default_value_t = Dataset::Cop30)]
        dataset: Dataset,
        /// Try other global datasets when the chosen one has no data
        #[arg(long)]
        fallback: bool,
        #[arg(long, env = "OPENTOPOGRAPHY_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
}

#[derive(Args)]
struct AreaArgs {
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,
    /// Place name resolved through the geocoder instead of --lat/--lon
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    place: Option<String>,
    #[arg(long, default_value_t = ShapeKind::Rectangle)]
    shape: ShapeKind,
    #[arg(long, default_value_t = 10.0)]
    width_km: f64,
    #[arg(long, default_value_t = 10.0)]
    height_km: f64,
    #[arg(long, default_value_t = 5.0)]
    radius_km: f64,
    /// Name used in file names and GeoJSON properties
    #[arg(long)]
    name: Option<String>,
}

impl AreaArgs {
    fn shape(&self) -> Result<ShapeRequest> {
        let shape = match self.shape {
            ShapeKind::Rectangle => ShapeRequest::rectangle(self.width_km, self.height_km),
            ShapeKind::Circle => ShapeRequest::circle(self.radius_km),
        };
        shape.validate()?;
        Ok(shape)
    }

    /// Center and display name, geocoding `--place` when given
    async fn resolve(&self, config: &Config) -> Result<(CenterPoint, String)> {
        if let Some(query) = &self.place {
            let place = Geocoder::new(config)?
                .lookup(query)
                .await?
                .ok_or_else(|| Error::Geocode(format!("no place found for '{}'", query)))?;
            tracing::info!(address = %place.address, "resolved place");
            let name = self.name.clone().unwrap_or_else(|| query.clone());
            return Ok((place.center(), name));
        }

        let center = CenterPoint::validated(
            self.lat.unwrap_or(DEFAULT_LATITUDE),
            self.lon.unwrap_or(DEFAULT_LONGITUDE),
        )?;
        Ok((center, self.name.clone().unwrap_or_else(|| "aoi".to_string())))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if let Some(remedy) = e.remedy() {
                eprintln!("  {}", remedy);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;

    match cli.command {
        Command::Aoi {
            area,
            degree_buffer,
            output,
        } => {
            let shape = area.shape()?;
            let (center, name) = area.resolve(&config).await?;
            let fidelity = if degree_buffer {
                CircleFidelity::DegreeBuffer
            } else {
                CircleFidelity::Geodesic
            };
            let aoi = generate_with(center, &shape, fidelity);

            println!("AOI {} ({})", name, aoi.label);
            println!("  Center:      {:.5}, {:.5}", center.latitude, center.longitude);
            println!("  Vertices:    {}", aoi.vertex_count());
            println!("  BBox:        {}", aoi.bbox);
            println!("  Raster BBox: {}", aoi.raster_bbox());
            println!("  Area:        {:.1} km²", aoi.bbox.area_km2());
            if aoi.bbox.crosses_antimeridian() {
                println!("  Note: the box crosses the antimeridian");
            }

            if let Some(dir) = output {
                let path = dir.join(geojson_file_name(&name, &aoi.label));
                write_file(&path, to_geojson_string(&aoi, &name)?.as_bytes())?;
            }
        }
        Command::Geocode { query } => match Geocoder::new(&config)?.lookup(&query).await? {
            Some(place) => {
                println!("{}", place.address);
                println!("  {:.6}, {:.6}", place.latitude, place.longitude);
            }
            None => return Err(Error::Geocode(format!("no place found for '{}'", query))),
        },
        Command::Dem {
            area,
            dataset,
            fallback,
            api_key,
            output,
        } => {
            let shape = area.shape()?;
            let (center, name) = area.resolve(&config).await?;
            let aoi = generate_with(center, &shape, CircleFidelity::Geodesic);

            let client = DemClient::new(&config.with_api_key(api_key))?;
            let raster = if fallback {
                let mut order = vec![dataset];
                order.extend(DEFAULT_FALLBACK.iter().copied().filter(|d| *d != dataset));
                client.fetch_with_fallback(&aoi.bbox, &order).await?
            } else {
                client.fetch(&aoi.bbox, dataset).await?
            };

            let path = output.join(dem_file_name(&name, &aoi.label));
            write_file(&path, &raster.bytes)?;
            println!("{} from {} ({} bytes)", path.display(), raster.dataset, raster.bytes.len());
        }
    }

    Ok(())
}

fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)?;
    tracing::info!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

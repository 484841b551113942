use anyhow::{anyhow, Error as AnyError};
use clap::{Args, Parser, Subcommand};
use geo::geometry::Coord;
use rfgeo::DEFAULT_ENVELOPE_POINTS;
use std::{path::PathBuf, str::FromStr};
use towers::DEFAULT_FREQUENCY_GHZ;

/// Plan point-to-point radio links and their fresnel zones.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub enum Cli {
    /// Compute the geometry of a single link.
    Link(Link),

    /// Load a JSON plan of towers and links and report on every link.
    Plan(Plan),

    /// Print a ground elevation profile between two points.
    #[cfg(feature = "http")]
    Elevation(Elevation),
}

#[derive(Debug, Clone, Args)]
pub struct Link {
    /// First tower "lat,lon".
    #[arg(long, allow_hyphen_values = true)]
    pub start: LatLon,

    /// Second tower "lat,lon".
    #[arg(long, allow_hyphen_values = true)]
    pub dest: LatLon,

    /// Link frequency in GHz.
    #[arg(short, long, default_value_t = DEFAULT_FREQUENCY_GHZ)]
    pub frequency: f64,

    /// Angular steps around the fresnel envelope.
    #[arg(short, long, default_value_t = DEFAULT_ENVELOPE_POINTS)]
    pub points: usize,

    #[command(subcommand)]
    pub cmd: LinkCommand,
}

#[derive(Debug, Subcommand, Clone, Copy)]
pub enum LinkCommand {
    /// Print envelope points to stdout.
    Csv,

    /// Print envelope points as `[lat, lon]` pairs.
    Json,

    /// Print the envelope as a GeoJSON polygon feature.
    Geojson,

    /// Plot the envelope to terminal.
    Plot,

    /// Print distance, bearing, wavelength, and maximum fresnel radius.
    Info,

    /// Print the first fresnel zone radius along the path.
    Zone,
}

#[derive(Debug, Clone, Args)]
pub struct Plan {
    /// Angular steps around each fresnel envelope.
    #[arg(short, long, default_value_t = DEFAULT_ENVELOPE_POINTS)]
    pub points: usize,

    /// Output towers, links, and envelopes as a GeoJSON feature
    /// collection instead of a link table.
    #[arg(long)]
    pub geojson: bool,

    /// Look up place names for towers without a location.
    #[cfg(feature = "http")]
    #[arg(long)]
    pub geocode: bool,

    /// Plan file.
    pub file: PathBuf,
}

#[cfg(feature = "http")]
#[derive(Debug, Clone, Args)]
pub struct Elevation {
    /// Start "lat,lon".
    #[arg(long, allow_hyphen_values = true)]
    pub start: LatLon,

    /// Destination "lat,lon".
    #[arg(long, allow_hyphen_values = true)]
    pub dest: LatLon,

    /// Number of steps between start and destination.
    #[arg(short, long, default_value_t = 10)]
    pub samples: usize,
}

/// A "lat,lon" pair, stored with `x` as longitude.
#[derive(Clone, Debug, Copy, PartialEq)]
pub struct LatLon(pub Coord<f64>);

impl FromStr for LatLon {
    type Err = AnyError;
    fn from_str(s: &str) -> Result<Self, AnyError> {
        let (lat_str, lon_str) = s
            .split_once(',')
            .ok_or_else(|| anyhow!("not a valid lat,lon"))?;
        let lat = f64::from_str(lat_str.trim())?;
        let lon = f64::from_str(lon_str.trim())?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return Err(anyhow!("{lat},{lon} is out of range"));
        }
        Ok(Self(Coord { y: lat, x: lon }))
    }
}

//! Place name and elevation lookups.
//!
//! Both are remote services the planner can't control, so a failed
//! lookup never escapes this module: the public helpers log the error
//! and hand back an explicit [`Lookup::Fallback`] value instead.

#[cfg(feature = "http")]
mod http;

use crate::error::LookupError;
use log::warn;
use rfgeo::{lerp, GeoPoint};
use serde_json::Value;

#[cfg(feature = "http")]
pub use http::{Nominatim, OpenElevation};

/// Location shown for towers whose place name couldn't be resolved.
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Elevation, in meters, used when a lookup fails.
pub const FALLBACK_ELEVATION_M: f64 = 0.0;

/// Resolves a position to a human readable place name.
pub trait Geocoder {
    fn reverse(&self, position: GeoPoint) -> Result<String, LookupError>;
}

/// Resolves a position to a ground elevation in meters.
pub trait ElevationSource {
    fn elevation(&self, position: GeoPoint) -> Result<f64, LookupError>;
}

/// Outcome of a lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// The service answered.
    Resolved(T),

    /// The service failed and this is the substitute value.
    Fallback(T),
}

impl<T> Lookup<T> {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Resolved(val) | Self::Fallback(val) => val,
        }
    }
}

/// Returns the place name at `position`, or [`UNKNOWN_LOCATION`].
pub fn place_name<G: Geocoder + ?Sized>(geocoder: &G, position: GeoPoint) -> Lookup<String> {
    match geocoder.reverse(position) {
        Ok(name) => Lookup::Resolved(name),
        Err(e) => {
            warn!("reverse geocoding {position:?}: {e}");
            Lookup::Fallback(UNKNOWN_LOCATION.to_string())
        }
    }
}

/// Returns the elevation at `position`, or [`FALLBACK_ELEVATION_M`].
pub fn elevation<E: ElevationSource + ?Sized>(source: &E, position: GeoPoint) -> Lookup<f64> {
    match source.elevation(position) {
        Ok(elev) => Lookup::Resolved(elev),
        Err(e) => {
            warn!("elevation lookup {position:?}: {e}");
            Lookup::Fallback(FALLBACK_ELEVATION_M)
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElevationSample {
    pub position: GeoPoint,
    pub elevation_m: f64,
}

/// Samples the ground elevation at `samples + 1` evenly spaced points
/// from `start` to `end`, inclusive.
///
/// Points are linearly interpolated in latitude/longitude and queried
/// one after the other. Failed samples hold
/// [`FALLBACK_ELEVATION_M`].
pub fn elevation_profile<E: ElevationSource + ?Sized>(
    source: &E,
    start: GeoPoint,
    end: GeoPoint,
    samples: usize,
) -> Vec<ElevationSample> {
    (0..=samples)
        .map(|i| {
            let t = if samples == 0 {
                0.0
            } else {
                i as f64 / samples as f64
            };
            let position = lerp(start, end, t);
            ElevationSample {
                position,
                elevation_m: elevation(source, position).into_inner(),
            }
        })
        .collect()
}

/// Extracts a place name from a Nominatim reverse geocoding response.
///
/// The most specific of city, town, village, or county is joined with
/// the state, or the country when there is no state.
pub fn parse_place_name(body: &Value) -> Option<String> {
    fn field<'a>(address: &'a Value, key: &str) -> Option<&'a str> {
        address
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    let address = body.get("address")?;
    let place = ["city", "town", "village", "county"]
        .into_iter()
        .find_map(|key| field(address, key));
    let region = field(address, "state").or_else(|| field(address, "country"));
    match (place, region) {
        (Some(place), Some(region)) => Some(format!("{place}, {region}")),
        (Some(name), None) | (None, Some(name)) => Some(name.to_string()),
        (None, None) => None,
    }
}

/// Extracts the first elevation from an Open-Elevation lookup
/// response.
pub fn parse_elevation(body: &Value) -> Option<f64> {
    body.get("results")?.get(0)?.get("elevation")?.as_f64()
}

use super::{parse_elevation, parse_place_name, ElevationSource, Geocoder};
use crate::error::LookupError;
use reqwest::blocking::Client;
use rfgeo::GeoPoint;
use serde_json::Value;
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(10);

fn client() -> Result<Client, LookupError> {
    Ok(Client::builder()
        .timeout(TIMEOUT)
        .user_agent(USER_AGENT)
        .build()?)
}

fn get_json(client: &Client, url: &str, query: &[(&str, String)]) -> Result<Value, LookupError> {
    let response = client.get(url).query(query).send()?;
    if !response.status().is_success() {
        return Err(LookupError::Status(response.status().as_u16()));
    }
    let body = response.text()?;
    Ok(serde_json::from_str(&body)?)
}

/// City level reverse geocoding query.
fn reverse_query(position: GeoPoint) -> [(&'static str, String); 5] {
    [
        ("format", "json".to_string()),
        ("lat", position.y().to_string()),
        ("lon", position.x().to_string()),
        ("zoom", "10".to_string()),
        ("addressdetails", "1".to_string()),
    ]
}

fn lookup_query(position: GeoPoint) -> [(&'static str, String); 1] {
    [("locations", format!("{},{}", position.y(), position.x()))]
}

/// Reverse geocoding through an OpenStreetMap Nominatim server.
pub struct Nominatim {
    client: Client,
    base_url: String,
}

impl Nominatim {
    pub const PUBLIC_URL: &'static str = "https://nominatim.openstreetmap.org";

    pub fn new() -> Result<Self, LookupError> {
        Self::with_url(Self::PUBLIC_URL)
    }

    pub fn with_url(base_url: impl Into<String>) -> Result<Self, LookupError> {
        Ok(Self {
            client: client()?,
            base_url: base_url.into(),
        })
    }
}

impl Geocoder for Nominatim {
    fn reverse(&self, position: GeoPoint) -> Result<String, LookupError> {
        let url = format!("{}/reverse", self.base_url);
        let body = get_json(&self.client, &url, &reverse_query(position))?;
        parse_place_name(&body).ok_or(LookupError::Missing("address"))
    }
}

/// Ground elevation through an Open-Elevation server.
pub struct OpenElevation {
    client: Client,
    base_url: String,
}

impl OpenElevation {
    pub const PUBLIC_URL: &'static str = "https://api.open-elevation.com";

    pub fn new() -> Result<Self, LookupError> {
        Self::with_url(Self::PUBLIC_URL)
    }

    pub fn with_url(base_url: impl Into<String>) -> Result<Self, LookupError> {
        Ok(Self {
            client: client()?,
            base_url: base_url.into(),
        })
    }
}

impl ElevationSource for OpenElevation {
    fn elevation(&self, position: GeoPoint) -> Result<f64, LookupError> {
        let url = format!("{}/api/v1/lookup", self.base_url);
        let body = get_json(&self.client, &url, &lookup_query(position))?;
        parse_elevation(&body).ok_or(LookupError::Missing("results"))
    }
}

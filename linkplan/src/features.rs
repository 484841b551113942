//! GeoJSON conversions for towers, links, and fresnel envelopes.
//!
//! GeoJSON positions are `[longitude, latitude]`.

use geojson::{Feature, Geometry, JsonObject, Value as GeometryValue};
use rfgeo::GeoPoint;
use serde_json::json;
use towers::{Link, Tower};

fn position(point: &GeoPoint) -> Vec<f64> {
    vec![point.x(), point.y()]
}

fn feature(geometry: GeometryValue, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(geometry)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Returns `polygon` as a closed GeoJSON polygon feature.
pub fn envelope(polygon: &[GeoPoint], properties: JsonObject) -> Feature {
    let mut ring: Vec<Vec<f64>> = polygon.iter().map(position).collect();
    // GeoJSON requires the ring's last position to repeat the first
    // exactly; the envelope's last point is only equal up to rounding.
    if let (Some(first), Some(last)) = (ring.first().cloned(), ring.last_mut()) {
        *last = first;
    }
    feature(GeometryValue::Polygon(vec![ring]), properties)
}

pub fn tower(tower: &Tower) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), json!(tower.id));
    properties.insert("name".to_string(), json!(tower.name));
    properties.insert("location".to_string(), json!(tower.location));
    properties.insert("frequency_ghz".to_string(), json!(tower.frequency_ghz));
    feature(GeometryValue::Point(position(&tower.position)), properties)
}

pub fn link(link: &Link, a: &Tower, b: &Tower) -> Feature {
    feature(
        GeometryValue::LineString(vec![position(&a.position), position(&b.position)]),
        link_properties(link),
    )
}

pub fn link_properties(link: &Link) -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert("id".to_string(), json!(link.id));
    properties.insert("tower_a".to_string(), json!(link.tower_a));
    properties.insert("tower_b".to_string(), json!(link.tower_b));
    properties.insert("distance_m".to_string(), json!(link.distance_m));
    properties.insert("frequency_ghz".to_string(), json!(link.frequency_ghz));
    properties
}

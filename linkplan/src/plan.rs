use crate::{features, options::Plan};
use anyhow::{anyhow, bail, Context, Result};
use geo::point;
use geojson::{FeatureCollection, GeoJson};
use log::warn;
use rfgeo::{fresnel_radius, ghz_to_wavelen};
use serde::Deserialize;
use std::{collections::HashMap, fs::File, io::BufReader, io::Write};
use towers::{lookup::Geocoder, Network, RetunePolicy, TowerId};

/// On-disk description of a plan.
///
/// ```json
/// {
///   "towers": [
///     {"name": "Gurten", "lat": 46.919, "lng": 7.439, "frequency_ghz": 5.8},
///     {"name": "Bantiger", "lat": 46.977, "lng": 7.528, "frequency_ghz": 5.8}
///   ],
///   "links": [["Gurten", "Bantiger"]]
/// }
/// ```
#[derive(Debug, Deserialize)]
struct PlanFile {
    towers: Vec<PlanTower>,
    #[serde(default)]
    links: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct PlanTower {
    name: String,
    lat: f64,
    lng: f64,
    #[serde(default)]
    frequency_ghz: Option<f64>,
    #[serde(default)]
    location: Option<String>,
}

impl Plan {
    pub fn run(&self) -> Result<()> {
        let file = File::open(&self.file)
            .with_context(|| format!("opening plan {}", self.file.display()))?;
        let plan: PlanFile = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing plan {}", self.file.display()))?;

        #[cfg(feature = "http")]
        let nominatim = if self.geocode {
            Some(towers::lookup::Nominatim::new()?)
        } else {
            None
        };
        #[cfg(feature = "http")]
        let geocoder = nominatim.as_ref().map(|g| g as &dyn Geocoder);
        #[cfg(not(feature = "http"))]
        let geocoder: Option<&dyn Geocoder> = None;

        let network = build_network(plan, geocoder)?;
        if self.geojson {
            print_geojson(&network, self.points)?;
        } else {
            print_table(&network)?;
        }
        Ok(())
    }
}

/// Replays `plan` into a fresh network.
///
/// Links the network refuses (mismatched frequencies, duplicates) are
/// skipped with a warning. Malformed plans, such as links naming
/// missing towers, are errors.
fn build_network(plan: PlanFile, geocoder: Option<&dyn Geocoder>) -> Result<Network> {
    let mut network = Network::new();
    let mut ids: HashMap<String, TowerId> = HashMap::new();

    for tower in plan.towers {
        if ids.contains_key(&tower.name) {
            bail!("duplicate tower name '{}'", tower.name);
        }
        let position = point!(x: tower.lng, y: tower.lat);
        let location = match (tower.location.filter(|l| !l.is_empty()), geocoder) {
            (Some(location), _) => location,
            (None, Some(geocoder)) => towers::lookup::place_name(geocoder, position).into_inner(),
            (None, None) => String::new(),
        };
        let id = network.add_tower(position, location);
        network.rename_tower(id, tower.name.clone())?;
        if let Some(frequency_ghz) = tower.frequency_ghz {
            network
                .set_frequency(id, frequency_ghz, RetunePolicy::Reject)
                .with_context(|| format!("tower '{}'", tower.name))?;
        }
        ids.insert(tower.name, id);
    }

    for (a, b) in &plan.links {
        let lookup = |name: &String| {
            ids.get(name)
                .copied()
                .ok_or_else(|| anyhow!("link {a} <-> {b} names unknown tower '{name}'"))
        };
        if let Err(e) = network.create_link(lookup(a)?, lookup(b)?) {
            warn!("skipping link {a} <-> {b}: {e}");
        }
    }

    Ok(network)
}

fn print_table(network: &Network) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "From,To,Distance km,Frequency GHz,Max Fresnel m")?;
    for link in network.links() {
        let name = |id| network.tower(id).map_or("?", |t| t.name.as_str());
        let half_m = link.distance_m / 2.0;
        let max_radius_m = fresnel_radius(ghz_to_wavelen(link.frequency_ghz), half_m, half_m);
        writeln!(
            stdout,
            "{},{},{:.2},{},{:.2}",
            name(link.tower_a),
            name(link.tower_b),
            link.distance_km(),
            link.frequency_ghz,
            max_radius_m
        )?;
    }
    Ok(())
}

fn print_geojson(network: &Network, points: usize) -> Result<()> {
    let mut collection: Vec<_> = network.towers().iter().map(features::tower).collect();
    for link in network.links() {
        if let (Some(a), Some(b)) = (network.tower(link.tower_a), network.tower(link.tower_b)) {
            collection.push(features::link(link, a, b));
        }
    }
    for (id, polygon) in network.envelopes(points)? {
        if let Some(link) = network.link(id) {
            collection.push(features::envelope(&polygon, features::link_properties(link)));
        }
    }
    let collection = FeatureCollection {
        bbox: None,
        features: collection,
        foreign_members: None,
    };
    println!("{}", GeoJson::from(collection));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{build_network, PlanFile};
    use rfgeo::GeoPoint;
    use towers::{lookup::Geocoder, LookupError};

    fn plan(json: &str) -> PlanFile {
        serde_json::from_str(json).unwrap()
    }

    struct Fixed;

    impl Geocoder for Fixed {
        fn reverse(&self, _position: GeoPoint) -> Result<String, LookupError> {
            Ok("Bern, Bern".to_string())
        }
    }

    #[test]
    fn test_build_network() {
        let network = build_network(
            plan(
                r#"{
                    "towers": [
                        {"name": "Gurten", "lat": 46.919, "lng": 7.439, "frequency_ghz": 5.8},
                        {"name": "Bantiger", "lat": 46.977, "lng": 7.528, "frequency_ghz": 5.8,
                         "location": "Bolligen"},
                        {"name": "Chasseral", "lat": 47.133, "lng": 7.059}
                    ],
                    "links": [["Gurten", "Bantiger"], ["Bantiger", "Gurten"], ["Gurten", "Chasseral"]]
                }"#,
            ),
            Some(&Fixed),
        )
        .unwrap();

        assert_eq!(network.towers().len(), 3);
        assert_eq!(network.towers()[0].name, "Gurten");
        assert_eq!(network.towers()[0].location, "Bern, Bern");
        assert_eq!(network.towers()[1].location, "Bolligen");
        assert_eq!(network.towers()[2].frequency_ghz, 5.0);
        // The reversed duplicate and the 5.8/5.0 GHz link are skipped.
        assert_eq!(network.links().len(), 1);
        assert_eq!(network.links()[0].frequency_ghz, 5.8);
    }

    #[test]
    fn test_empty_location_is_geocoded() {
        let json = r#"{"towers": [
            {"name": "A", "lat": 46.9, "lng": 7.4, "location": ""},
            {"name": "B", "lat": 47.0, "lng": 7.5, "location": ""}
        ]}"#;
        let network = build_network(plan(json), Some(&Fixed)).unwrap();
        assert_eq!(network.towers()[0].location, "Bern, Bern");

        let network = build_network(plan(json), None).unwrap();
        assert_eq!(network.towers()[1].location, "");
    }

    #[test]
    fn test_unknown_tower_in_link() {
        let err = build_network(
            plan(r#"{"towers": [{"name": "A", "lat": 0, "lng": 0}], "links": [["A", "B"]]}"#),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("unknown tower 'B'"));
    }

    #[test]
    fn test_duplicate_tower_name() {
        let result = build_network(
            plan(
                r#"{"towers": [{"name": "A", "lat": 0, "lng": 0}, {"name": "A", "lat": 1, "lng": 1}]}"#,
            ),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_frequency() {
        let result = build_network(
            plan(r#"{"towers": [{"name": "A", "lat": 0, "lng": 0, "frequency_ghz": -1}]}"#),
            None,
        );
        assert!(result.is_err());
    }
}

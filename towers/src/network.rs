use crate::{
    error::NetworkError,
    tower::{Link, LinkId, Tower, TowerId, DEFAULT_FREQUENCY_GHZ},
};
use log::{debug, warn};
use rfgeo::{fresnel_envelope, haversine_distance, GeoPoint};
use serde::{Deserialize, Serialize};

/// What [`Network::set_frequency`] does with links whose other end
/// would no longer share the tower's frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetunePolicy {
    /// Refuse the change and leave the network untouched.
    #[default]
    Reject,

    /// Apply the change and delete the links that no longer match.
    DropLinks,
}

/// The towers and links of a plan.
///
/// Every mutation upholds two invariants:
///
/// 1. both ends of a link, and the link itself, have exactly the same
///    frequency
/// 2. a pair of towers is linked at most once, regardless of direction
///
/// A mutation that would break either returns an error and leaves the
/// network unchanged. Deserializing checks both as well.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "RawNetwork")]
pub struct Network {
    towers: Vec<Tower>,
    links: Vec<Link>,
    next_id: u64,
}

/// Unchecked serialized form of a [`Network`].
#[derive(Deserialize)]
struct RawNetwork {
    towers: Vec<Tower>,
    #[serde(default)]
    links: Vec<Link>,
    #[serde(default)]
    next_id: u64,
}

impl TryFrom<RawNetwork> for Network {
    type Error = NetworkError;

    fn try_from(raw: RawNetwork) -> Result<Self, Self::Error> {
        let mut network = Self::new();
        for tower in raw.towers {
            if !tower.frequency_ghz.is_finite() || tower.frequency_ghz <= 0.0 {
                return Err(NetworkError::InvalidFrequency(tower.frequency_ghz));
            }
            if network.tower(tower.id).is_some() {
                return Err(NetworkError::DuplicateId(tower.id.0));
            }
            network.towers.push(tower);
        }

        for mut link in raw.links {
            let (a, b) = (link.tower_a, link.tower_b);
            if network.link(link.id).is_some() {
                return Err(NetworkError::DuplicateId(link.id.0));
            }
            let tower_a = network.tower(a).ok_or(NetworkError::UnknownTower(a))?;
            let tower_b = network.tower(b).ok_or(NetworkError::UnknownTower(b))?;
            if a == b {
                return Err(NetworkError::SelfLink(a));
            }
            if tower_a.frequency_ghz != tower_b.frequency_ghz {
                return Err(NetworkError::FrequencyMismatch {
                    a,
                    a_ghz: tower_a.frequency_ghz,
                    b,
                    b_ghz: tower_b.frequency_ghz,
                });
            }
            if link.frequency_ghz != tower_a.frequency_ghz {
                return Err(NetworkError::LinkFrequency {
                    link: link.id,
                    link_ghz: link.frequency_ghz,
                    tower_ghz: tower_a.frequency_ghz,
                });
            }
            if network.links.iter().any(|l| l.connects(a, b)) {
                return Err(NetworkError::DuplicateLink(a, b));
            }
            link.distance_m = haversine_distance(tower_a.position, tower_b.position);
            network.links.push(link);
        }

        let max_id = network
            .towers
            .iter()
            .map(|t| t.id.0)
            .chain(network.links.iter().map(|l| l.id.0))
            .max()
            .unwrap_or(0);
        network.next_id = raw.next_id.max(max_id);
        Ok(network)
    }
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn towers(&self) -> &[Tower] {
        &self.towers
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn tower(&self, id: TowerId) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.iter().find(|l| l.id == id)
    }

    /// Returns every link touching `tower`.
    pub fn links_of(&self, tower: TowerId) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(move |l| l.has_tower(tower))
    }

    /// Places a new tower at `position` with the default frequency and
    /// a sequential name.
    pub fn add_tower(&mut self, position: GeoPoint, location: impl Into<String>) -> TowerId {
        let id = TowerId(self.alloc_id());
        let tower = Tower {
            id,
            position,
            frequency_ghz: DEFAULT_FREQUENCY_GHZ,
            name: format!("Tower {}", self.towers.len() + 1),
            location: location.into(),
        };
        debug!("added {} '{}' at {:?}", id, tower.name, position);
        self.towers.push(tower);
        id
    }

    pub fn rename_tower(&mut self, id: TowerId, name: impl Into<String>) -> Result<(), NetworkError> {
        self.tower_mut(id)?.name = name.into();
        Ok(())
    }

    pub fn set_location(
        &mut self,
        id: TowerId,
        location: impl Into<String>,
    ) -> Result<(), NetworkError> {
        self.tower_mut(id)?.location = location.into();
        Ok(())
    }

    /// Changes the frequency of tower `id`.
    ///
    /// Returns the links deleted as a consequence, which is always
    /// empty under [`RetunePolicy::Reject`].
    pub fn set_frequency(
        &mut self,
        id: TowerId,
        frequency_ghz: f64,
        policy: RetunePolicy,
    ) -> Result<Vec<LinkId>, NetworkError> {
        if !frequency_ghz.is_finite() || frequency_ghz <= 0.0 {
            return Err(NetworkError::InvalidFrequency(frequency_ghz));
        }
        self.tower(id).ok_or(NetworkError::UnknownTower(id))?;

        let mut mismatched = Vec::new();
        for link in self.links_of(id) {
            let peer = link.peer(id).and_then(|peer| self.tower(peer));
            if let Some(peer) = peer.filter(|peer| peer.frequency_ghz != frequency_ghz) {
                if policy == RetunePolicy::Reject {
                    return Err(NetworkError::FrequencyMismatch {
                        a: id,
                        a_ghz: frequency_ghz,
                        b: peer.id,
                        b_ghz: peer.frequency_ghz,
                    });
                }
                mismatched.push(link.id);
            }
        }

        self.tower_mut(id)?.frequency_ghz = frequency_ghz;
        self.links.retain(|l| !mismatched.contains(&l.id));
        for link in self.links.iter_mut().filter(|l| l.has_tower(id)) {
            link.frequency_ghz = frequency_ghz;
        }
        for link in &mismatched {
            warn!("dropped link {link}, tower {id} retuned to {frequency_ghz} GHz");
        }
        debug!("tower {id} set to {frequency_ghz} GHz");
        Ok(mismatched)
    }

    /// Links towers `a` and `b`.
    ///
    /// The towers must exist, be distinct, have exactly the same
    /// frequency, and not already be linked.
    pub fn create_link(&mut self, a: TowerId, b: TowerId) -> Result<LinkId, NetworkError> {
        let tower_a = self.tower(a).ok_or(NetworkError::UnknownTower(a))?;
        let tower_b = self.tower(b).ok_or(NetworkError::UnknownTower(b))?;
        if a == b {
            return Err(NetworkError::SelfLink(a));
        }
        if tower_a.frequency_ghz != tower_b.frequency_ghz {
            return Err(NetworkError::FrequencyMismatch {
                a,
                a_ghz: tower_a.frequency_ghz,
                b,
                b_ghz: tower_b.frequency_ghz,
            });
        }
        if self.links.iter().any(|l| l.connects(a, b)) {
            return Err(NetworkError::DuplicateLink(a, b));
        }

        let distance_m = haversine_distance(tower_a.position, tower_b.position);
        let frequency_ghz = tower_b.frequency_ghz;
        let id = LinkId(self.alloc_id());
        debug!("linked {a} <-> {b}, {distance_m:.1} m at {frequency_ghz} GHz");
        self.links.push(Link {
            id,
            tower_a: a,
            tower_b: b,
            distance_m,
            frequency_ghz,
        });
        Ok(id)
    }

    /// Removes tower `id` and every link touching it.
    pub fn delete_tower(&mut self, id: TowerId) -> Result<Tower, NetworkError> {
        let idx = self
            .towers
            .iter()
            .position(|t| t.id == id)
            .ok_or(NetworkError::UnknownTower(id))?;
        let tower = self.towers.remove(idx);
        let before = self.links.len();
        self.links.retain(|l| !l.has_tower(id));
        debug!(
            "deleted tower {id} and {} link(s)",
            before - self.links.len()
        );
        Ok(tower)
    }

    pub fn delete_link(&mut self, id: LinkId) -> Result<Link, NetworkError> {
        let idx = self
            .links
            .iter()
            .position(|l| l.id == id)
            .ok_or(NetworkError::UnknownLink(id))?;
        debug!("deleted link {id}");
        Ok(self.links.remove(idx))
    }

    /// Returns the first fresnel zone outline of link `id`, see
    /// [`rfgeo::fresnel_envelope`].
    pub fn envelope(&self, id: LinkId, num_points: usize) -> Result<Vec<GeoPoint>, NetworkError> {
        let link = self.link(id).ok_or(NetworkError::UnknownLink(id))?;
        self.link_envelope(link, num_points)
    }

    /// Returns the fresnel zone outline of every link, in link order.
    pub fn envelopes(
        &self,
        num_points: usize,
    ) -> Result<Vec<(LinkId, Vec<GeoPoint>)>, NetworkError> {
        self.links
            .iter()
            .map(|link| Ok((link.id, self.link_envelope(link, num_points)?)))
            .collect()
    }

    fn link_envelope(&self, link: &Link, num_points: usize) -> Result<Vec<GeoPoint>, NetworkError> {
        let a = self
            .tower(link.tower_a)
            .ok_or(NetworkError::UnknownTower(link.tower_a))?;
        let b = self
            .tower(link.tower_b)
            .ok_or(NetworkError::UnknownTower(link.tower_b))?;
        Ok(fresnel_envelope(
            a.position,
            b.position,
            link.frequency_ghz,
            num_points,
        ))
    }

    fn tower_mut(&mut self, id: TowerId) -> Result<&mut Tower, NetworkError> {
        self.towers
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or(NetworkError::UnknownTower(id))
    }

    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

use rfgeo::GeoPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Frequency assigned to newly placed towers.
pub const DEFAULT_FREQUENCY_GHZ: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TowerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkId(pub u64);

impl fmt::Display for TowerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A radio tower placed on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tower {
    pub id: TowerId,

    /// Where the tower stands, `x` is longitude and `y` is latitude.
    pub position: GeoPoint,

    /// Operating frequency in GHz, always finite and positive.
    pub frequency_ghz: f64,

    pub name: String,

    /// Human readable place name, e.g. "Bern, Switzerland".
    pub location: String,
}

impl Tower {
    pub fn latitude(&self) -> f64 {
        self.position.y()
    }

    pub fn longitude(&self) -> f64 {
        self.position.x()
    }
}

/// A point to point link between two towers sharing a frequency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub id: LinkId,
    pub tower_a: TowerId,
    pub tower_b: TowerId,

    /// Great circle distance between the towers in meters.
    pub distance_m: f64,

    pub frequency_ghz: f64,
}

impl Link {
    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1000.0
    }

    /// Returns true if this link touches `tower`.
    pub fn has_tower(&self, tower: TowerId) -> bool {
        self.tower_a == tower || self.tower_b == tower
    }

    /// Returns true if this link connects `a` and `b`, in either
    /// direction.
    pub fn connects(&self, a: TowerId, b: TowerId) -> bool {
        (self.tower_a == a && self.tower_b == b) || (self.tower_a == b && self.tower_b == a)
    }

    /// Returns the tower at the other end of the link from `tower`.
    pub fn peer(&self, tower: TowerId) -> Option<TowerId> {
        if self.tower_a == tower {
            Some(self.tower_b)
        } else if self.tower_b == tower {
            Some(self.tower_a)
        } else {
            None
        }
    }
}

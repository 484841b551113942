use crate::tower::{LinkId, TowerId};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("no tower with id {0}")]
    UnknownTower(TowerId),

    #[error("no link with id {0}")]
    UnknownLink(LinkId),

    #[error("tower {0} can not be linked to itself")]
    SelfLink(TowerId),

    #[error("invalid frequency {0} GHz")]
    InvalidFrequency(f64),

    #[error("frequency mismatch, tower {a}: {a_ghz} GHz, tower {b}: {b_ghz} GHz")]
    FrequencyMismatch {
        a: TowerId,
        a_ghz: f64,
        b: TowerId,
        b_ghz: f64,
    },

    #[error("towers {0} and {1} are already linked")]
    DuplicateLink(TowerId, TowerId),

    #[error("link {link} is at {link_ghz} GHz but its towers are at {tower_ghz} GHz")]
    LinkFrequency {
        link: LinkId,
        link_ghz: f64,
        tower_ghz: f64,
    },

    #[error("id {0} is used more than once")]
    DuplicateId(u64),
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("request failed, {0}")]
    Http(String),

    #[error("unexpected HTTP status {0}")]
    Status(u16),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("response is missing '{0}'")]
    Missing(&'static str),
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for LookupError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status(status.as_u16()),
            None => Self::Http(err.to_string()),
        }
    }
}

//! # Towers
//!
//! `towers` owns the towers and links of a radio link plan and keeps
//! them consistent: linked towers always share a frequency and any
//! pair of towers is linked at most once. Geometry is delegated to
//! [`rfgeo`].

mod error;
pub mod lookup;
mod network;
mod tower;

pub use {
    crate::{
        error::{LookupError, NetworkError},
        network::{Network, RetunePolicy},
        tower::{Link, LinkId, Tower, TowerId, DEFAULT_FREQUENCY_GHZ},
    },
    rfgeo,
};

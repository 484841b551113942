//! # RF Link Geometry
//!
//! `rfgeo` provides the geometric and radio primitives used to plan
//! point to point links between towers: great circle distance and
//! bearing, wavelength, fresnel zone radii, and a map-space polygon
//! approximating the first fresnel zone of a link.
//!
//! All coordinates are [`geo::Point`]s where `x` is longitude and `y`
//! is latitude, both in degrees.

pub mod envelope;
mod error;
pub mod fresnel;
pub mod geodesy;

pub use {
    crate::{
        envelope::{fresnel_envelope, EnvelopeIter, FresnelEnvelope, DEFAULT_ENVELOPE_POINTS},
        error::RfError,
        fresnel::{fresnel_radius, ghz_to_wavelen, nth_fresnel_radius, FresnelZone},
        geodesy::{haversine_distance, initial_bearing, lerp},
    },
    geo,
};

/// A geographic position, `x` is longitude and `y` is latitude.
pub type GeoPoint<T = f64> = geo::Point<T>;

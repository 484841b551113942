//! Map-space approximation of a link's first fresnel zone.
//!
//! The fresnel zone is a 3-D ellipsoid around the straight line
//! between two antennas. For display on a map we flatten it into a
//! lens shaped polygon: sweep an angle through one full turn, map the
//! angle to a position along the link with `t = (cos(angle) + 1) / 2`,
//! then push that position sideways by the local fresnel radius scaled
//! by `sin(angle)`. Because `t` traverses the link twice per turn
//! (out along one side, back along the other), a single loop traces
//! the whole closed outline.

use crate::{
    error::RfError,
    fresnel::{fresnel_radius, ghz_to_wavelen},
    geodesy::{haversine_distance, initial_bearing, lerp, METERS_PER_DEGREE},
};
use geo::{Coord, CoordFloat, Point};
use num_traits::{AsPrimitive, FloatConst};
use std::ops::Range;

/// Number of angular steps used when the caller doesn't pick one.
pub const DEFAULT_ENVELOPE_POINTS: usize = 50;

/// Returns `num_points + 1` points outlining the first fresnel zone of
/// the link from `start` to `end` at `f_ghz`.
///
/// The first and last points are both at angle zero (`0` and `2π`) and
/// coincide, closing the polygon. If `start == end` every point is
/// that position.
///
/// Position along the link is a plain linear interpolation of
/// latitude and longitude, so the outline drifts from the true
/// geodesic on long links.
pub fn fresnel_envelope<T>(start: Point<T>, end: Point<T>, f_ghz: T, num_points: usize) -> Vec<Point<T>>
where
    T: CoordFloat + FloatConst + 'static,
    f64: AsPrimitive<T>,
    u8: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
    EnvelopeIter::new(start, end, f_ghz, num_points).collect()
}

/// Lazily yields the points of a fresnel envelope, see
/// [`fresnel_envelope`].
#[derive(Debug, Clone)]
pub struct EnvelopeIter<T: CoordFloat = f64> {
    start: Point<T>,
    end: Point<T>,
    distance_m: T,
    wavelen: T,
    bearing_deg: T,
    /// (sin, cos) of the bearing perpendicular to the link.
    perpendicular: (T, T),
    num_points: usize,
    range: Range<usize>,
}

impl<T> EnvelopeIter<T>
where
    T: CoordFloat + FloatConst + 'static,
    f64: AsPrimitive<T>,
    u8: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
    pub fn new(start: Point<T>, end: Point<T>, f_ghz: T, num_points: usize) -> Self {
        let distance_m = haversine_distance(start, end);
        let wavelen = ghz_to_wavelen(f_ghz);
        let bearing_deg = initial_bearing(start, end);
        let quarter_turn: T = 90.0_f64.as_();
        let perpendicular = (bearing_deg + quarter_turn).to_radians().sin_cos();
        Self {
            start,
            end,
            distance_m,
            wavelen,
            bearing_deg,
            perpendicular,
            num_points,
            range: 0..num_points.saturating_add(1),
        }
    }

    /// Great circle distance between the towers in meters.
    pub fn distance_m(&self) -> T {
        self.distance_m
    }

    pub fn wavelength_m(&self) -> T {
        self.wavelen
    }

    /// Initial bearing from the first tower to the second, see
    /// [`initial_bearing`].
    pub fn bearing_deg(&self) -> T {
        self.bearing_deg
    }

    fn point(&self, i: usize) -> Point<T> {
        let one = T::one();
        let two = one + one;

        // A zero-step envelope degenerates to the single angle-0 point.
        let angle = if self.num_points == 0 {
            T::zero()
        } else {
            let step: T = i.as_();
            let steps: T = self.num_points.as_();
            (step / steps) * two * T::PI()
        };
        let (angle_sin, angle_cos) = angle.sin_cos();

        let t = (angle_cos + one) / two;
        let center = lerp(self.start, self.end, t);

        let d1 = self.distance_m * t;
        let d2 = self.distance_m * (one - t);
        let offset_m = fresnel_radius(self.wavelen, d1, d2) * angle_sin;

        let (perp_sin, perp_cos) = self.perpendicular;
        let m_per_deg: T = METERS_PER_DEGREE.as_();
        let offset_lat = offset_m * perp_cos / m_per_deg;
        let offset_lon = offset_m * perp_sin / (m_per_deg * center.y().to_radians().cos());

        Point::new(center.x() + offset_lon, center.y() + offset_lat)
    }
}

impl<T> Iterator for EnvelopeIter<T>
where
    T: CoordFloat + FloatConst + 'static,
    f64: AsPrimitive<T>,
    u8: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
    type Item = Point<T>;

    #[inline]
    fn next(&mut self) -> Option<Point<T>> {
        self.range.next().map(|i| self.point(i))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<T> ExactSizeIterator for EnvelopeIter<T>
where
    T: CoordFloat + FloatConst + 'static,
    f64: AsPrimitive<T>,
    u8: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
}

/// A link's fresnel envelope along with the link quantities it was
/// derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct FresnelEnvelope<T: CoordFloat = f64> {
    /// Great circle distance between the towers in meters.
    pub distance_m: T,

    /// Signal wavelength in meters.
    pub wavelength_m: T,

    /// Initial bearing from start to end, in `(-180, 180]`.
    pub bearing_deg: T,

    /// First fresnel zone radius at the midpoint of the link, the
    /// widest part of the zone.
    pub max_radius_m: T,

    /// Closed outline of the zone, `points + 1` long.
    pub polygon: Vec<Point<T>>,
}

impl<T> FresnelEnvelope<T>
where
    T: CoordFloat,
{
    pub fn builder() -> FresnelEnvelopeBuilder<T> {
        FresnelEnvelopeBuilder {
            start: None,
            end: None,
            freq_ghz: None,
            points: DEFAULT_ENVELOPE_POINTS,
        }
    }
}

pub struct FresnelEnvelopeBuilder<T: CoordFloat = f64> {
    /// First tower (required).
    start: Option<Coord<T>>,

    /// Second tower (required).
    end: Option<Coord<T>>,

    /// Link frequency in GHz (required).
    freq_ghz: Option<T>,

    /// Angular steps around the outline (defaults to 50).
    points: usize,
}

impl<T> FresnelEnvelopeBuilder<T>
where
    T: CoordFloat + FloatConst + 'static,
    f64: AsPrimitive<T>,
    u8: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
    /// First tower of the link (required).
    #[must_use]
    pub fn start(mut self, coord: Coord<T>) -> Self {
        self.start = Some(coord);
        self
    }

    /// Second tower of the link (required).
    #[must_use]
    pub fn end(mut self, coord: Coord<T>) -> Self {
        self.end = Some(coord);
        self
    }

    /// Frequency of the link (GHz, required).
    #[must_use]
    pub fn freq(mut self, f_ghz: T) -> Self {
        self.freq_ghz = Some(f_ghz);
        self
    }

    /// Angular steps around the outline (defaults to 50).
    #[must_use]
    pub fn points(mut self, points: usize) -> Self {
        self.points = points;
        self
    }

    pub fn build(&self) -> Result<FresnelEnvelope<T>, RfError> {
        let start = self.start.ok_or(RfError::Builder("start"))?;
        let end = self.end.ok_or(RfError::Builder("end"))?;
        let freq_ghz = self.freq_ghz.ok_or(RfError::Builder("freq"))?;
        if self.points == 0 {
            return Err(RfError::Points);
        }

        let iter = EnvelopeIter::new(Point::from(start), Point::from(end), freq_ghz, self.points);
        let distance_m = iter.distance_m();
        let wavelength_m = iter.wavelength_m();
        let bearing_deg = iter.bearing_deg();
        let half_m = distance_m / (T::one() + T::one());
        let max_radius_m = fresnel_radius(wavelength_m, half_m, half_m);

        Ok(FresnelEnvelope {
            distance_m,
            wavelength_m,
            bearing_deg,
            max_radius_m,
            polygon: iter.collect(),
        })
    }
}

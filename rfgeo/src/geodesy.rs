//! Spherical earth geodesy.
//!
//! Everything here treats the earth as a sphere of radius
//! [`MEAN_EARTH_RADIUS`], which is plenty for the distances a point to
//! point radio link spans.

use geo::{CoordFloat, Point};
use num_traits::AsPrimitive;

/// Mean earth radius in meters.
pub const MEAN_EARTH_RADIUS: f64 = 6_371_000.0;

/// Approximate length, in meters, of one degree of latitude.
///
/// One degree of longitude is this value scaled by the cosine of the
/// latitude.
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// Returns the great circle distance, in meters, between `p1` and
/// `p2` using the haversine formula.
///
/// Coordinates outside of the valid latitude/longitude ranges are not
/// rejected; they still produce a number, just not a meaningful one.
pub fn haversine_distance<T>(p1: Point<T>, p2: Point<T>) -> T
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
{
    let two = T::one() + T::one();

    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();
    let d_lat = (p2.y() - p1.y()).to_radians();
    let d_lon = (p2.x() - p1.x()).to_radians();

    let a = (d_lat / two).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / two).sin().powi(2);
    let c = two * a.sqrt().atan2((T::one() - a).sqrt());

    let radius: T = MEAN_EARTH_RADIUS.as_();
    radius * c
}

/// Returns the initial bearing (forward azimuth), in degrees, from
/// `p1` towards `p2`.
///
/// The result is in `(-180, 180]` and is intentionally _not_
/// normalized to `[0, 360)`. Callers offsetting the bearing, e.g. by
/// 90° to get a perpendicular, must be prepared for values outside of
/// that range.
pub fn initial_bearing<T>(p1: Point<T>, p2: Point<T>) -> T
where
    T: CoordFloat + 'static,
    f64: AsPrimitive<T>,
{
    let lat1 = p1.y().to_radians();
    let lat2 = p2.y().to_radians();
    let d_lon = (p2.x() - p1.x()).to_radians();

    let y = d_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

    // atan2 gives -180 for a due south bearing when `y` is -0.
    let bearing = y.atan2(x).to_degrees();
    let half_turn: T = 180.0_f64.as_();
    if bearing <= -half_turn {
        bearing + half_turn + half_turn
    } else {
        bearing
    }
}

/// Linearly interpolates latitude and longitude between `p1` and `p2`.
///
/// This is not a geodesic interpolation. It is only a reasonable
/// approximation for short paths away from the poles and the
/// antimeridian.
pub fn lerp<T>(p1: Point<T>, p2: Point<T>, t: T) -> Point<T>
where
    T: CoordFloat,
{
    Point::new(
        p1.x() + (p2.x() - p1.x()) * t,
        p1.y() + (p2.y() - p1.y()) * t,
    )
}

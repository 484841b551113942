use num_traits::{AsPrimitive, Float};
use std::{iter::Iterator, ops::Range};

/// Speed of light in m/s.
///
/// Deliberately the rounded `3e8` rather than 299 792 458 so radii
/// match the values link planners are used to seeing.
const C: f64 = 3e8;

const HZ_PER_GHZ: f64 = 1e9;

/// Returns the wavelength, in meters, of a signal at `f_ghz`.
///
/// Frequencies `<= 0` produce a degenerate (infinite, NaN, or
/// negative) wavelength. Callers are expected to reject them first.
pub fn ghz_to_wavelen<T>(f_ghz: T) -> T
where
    T: Float + 'static,
    f64: AsPrimitive<T>,
{
    let c: T = C.as_();
    let hz_per_ghz: T = HZ_PER_GHZ.as_();
    c / (f_ghz * hz_per_ghz)
}

/// Returns the radius, in meters, of the first fresnel zone at a point
/// `d1` meters from one end of a path and `d2` meters from the other.
///
/// Returns exactly zero when either distance is `<= 0`, which pinches
/// the zone to a point at the link's endpoints.
pub fn fresnel_radius<T>(wavelen: T, d1: T, d2: T) -> T
where
    T: Float + 'static,
    u8: AsPrimitive<T>,
{
    nth_fresnel_radius(1, wavelen, d1, d2)
}

/// Like [`fresnel_radius`] but for the `zone`th fresnel zone.
pub fn nth_fresnel_radius<T>(zone: u8, wavelen: T, d1: T, d2: T) -> T
where
    T: Float + 'static,
    u8: AsPrimitive<T>,
{
    if d1 <= T::zero() || d2 <= T::zero() {
        return T::zero();
    }
    let zone: T = zone.as_();
    (zone * wavelen * d1 * d2 / (d1 + d2)).sqrt()
}

/// Represents the nth fresnel zone of a radio link.
#[derive(Debug, Clone)]
pub struct FresnelZone<T> {
    /// Which fresnel zone we're interested in.
    zone: u8,
    wavelength: T,
    distance_m: T,
}

impl<T> FresnelZone<T> {
    /// Returns a new FresnelZone object.
    pub fn new(zone: u8, f_ghz: T, distance_m: T) -> Self
    where
        T: Float + 'static,
        f64: AsPrimitive<T>,
    {
        Self {
            zone,
            wavelength: ghz_to_wavelen(f_ghz),
            distance_m,
        }
    }

    pub fn wavelength(&self) -> T
    where
        T: Copy,
    {
        self.wavelength
    }

    /// Returns a new FresnelZoneIter of length `len`, evenly spaced
    /// from the first tower to the second.
    pub fn iter(&self, len: usize) -> FresnelZoneIter<T>
    where
        T: Copy,
    {
        FresnelZoneIter {
            zone: self.zone,
            wavelength: self.wavelength,
            distance_m: self.distance_m,
            range: 0..len,
        }
    }
}

/// An iterator over the radius of a fresnel zone along its path.
#[derive(Debug, Clone)]
pub struct FresnelZoneIter<T> {
    zone: u8,
    wavelength: T,
    range: Range<usize>,
    distance_m: T,
}

impl<T> Iterator for FresnelZoneIter<T>
where
    T: Float + 'static,
    u8: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        self.range.next().map(|n| {
            let d1 = if self.range.end > 1 {
                let n: T = n.as_();
                let last: T = (self.range.end - 1).as_();
                self.distance_m * (n / last)
            } else {
                T::zero()
            };
            let d2 = self.distance_m - d1;
            nth_fresnel_radius(self.zone, self.wavelength, d1, d2)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.range.size_hint()
    }
}

impl<T> ExactSizeIterator for FresnelZoneIter<T>
where
    T: Float + 'static,
    u8: AsPrimitive<T>,
    usize: AsPrimitive<T>,
{
}

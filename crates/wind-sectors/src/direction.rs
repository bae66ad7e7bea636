//! Wind direction and speed from U/V components.

/// Direction the wind blows FROM, in degrees clockwise from north, in `[0, 360)`.
///
/// Computed as `(180 + degrees(atan2(u, v))) mod 360`. The arguments to
/// `atan2` are `(u, v)`, not `(v, u)`; that order is what turns the math
/// angle into the meteorological one, and stored results depend on it.
///
/// Calm wind (`u == v == 0`) comes out as 180. NaN components give NaN,
/// which no sector contains.
#[inline]
pub fn wind_direction(u: f64, v: f64) -> f64 {
    (180.0 + u.atan2(v).to_degrees()).rem_euclid(360.0)
}

/// Wind speed in the units of the components.
#[inline]
pub fn wind_speed(u: f64, v: f64) -> f64 {
    u.hypot(v)
}

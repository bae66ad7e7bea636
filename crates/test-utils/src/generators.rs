//! Test data generators for synthetic WRF-like time series.
//!
//! Flat vectors are laid out `(time, south_north, west_east)`, row-major,
//! the same order as the 3-D arrays they are reshaped into.

use ndarray::{Array2, Array3};
use wind_common::GriddedTimeSeries;

/// U and V components of a wind blowing *from* `direction` degrees.
///
/// # Example
///
/// ```
/// use test_utils::uv_from_direction;
///
/// // Westerly: blows towards the east
/// let (u, v) = uv_from_direction(270.0, 5.0);
/// assert!((u - 5.0).abs() < 1e-5);
/// assert!(v.abs() < 1e-5);
/// ```
pub fn uv_from_direction(direction: f64, speed: f64) -> (f32, f32) {
    let rad = direction.to_radians();
    ((-speed * rad.sin()) as f32, (-speed * rad.cos()) as f32)
}

/// U and V series with the same direction sequence at every cell.
///
/// # Arguments
///
/// * `directions` - One wind direction per time step, degrees
/// * `speed` - Wind speed for every step, m/s
/// * `rows`, `cols` - Grid size
pub fn create_wind_series(
    directions: &[f64],
    speed: f64,
    rows: usize,
    cols: usize,
) -> (Vec<f32>, Vec<f32>) {
    let cells = rows * cols;
    let mut u = Vec::with_capacity(directions.len() * cells);
    let mut v = Vec::with_capacity(directions.len() * cells);
    for &direction in directions {
        let (u_t, v_t) = uv_from_direction(direction, speed);
        u.extend(std::iter::repeat(u_t).take(cells));
        v.extend(std::iter::repeat(v_t).take(cells));
    }
    (u, v)
}

/// Temperature-like values in Kelvin.
///
/// Each value is `280 + (t % 24) + 0.5 * row + 0.25 * col`, so every step
/// and cell is easy to recompute in an assertion.
pub fn create_temperature_series(n_times: usize, rows: usize, cols: usize) -> Vec<f32> {
    let mut data = Vec::with_capacity(n_times * rows * cols);
    for t in 0..n_times {
        for row in 0..rows {
            for col in 0..cols {
                data.push(280.0 + (t % 24) as f32 + 0.5 * row as f32 + 0.25 * col as f32);
            }
        }
    }
    data
}

/// Deterministic pseudo-random directions in [0, 360).
pub fn create_random_directions(n: usize, seed: u32) -> Vec<f64> {
    (0..n)
        .map(|i| (simple_hash(i as u32, 0, seed) % 36_000) as f64 / 100.0)
        .collect()
}

/// XLAT and XLONG grids spanning the given box, row 0 at `lat_min`.
pub fn create_lat_lon_grid(
    rows: usize,
    cols: usize,
    (lon_min, lon_max, lat_min, lat_max): (f64, f64, f64, f64),
) -> (Array2<f32>, Array2<f32>) {
    let step = |min: f64, max: f64, n: usize, i: usize| {
        if n > 1 {
            min + (max - min) * i as f64 / (n - 1) as f64
        } else {
            min
        }
    };
    let lat = Array2::from_shape_fn((rows, cols), |(r, _)| step(lat_min, lat_max, rows, r) as f32);
    let lon = Array2::from_shape_fn((rows, cols), |(_, c)| step(lon_min, lon_max, cols, c) as f32);
    (lat, lon)
}

/// A complete series with pseudo-random winds and a `T2` field.
///
/// Directions and speeds (0-15 m/s) vary per step and cell; `T2` follows
/// [`create_temperature_series`] plus a small seeded perturbation. The
/// grid covers the Pacific Northwest box.
pub fn create_test_series(n_times: usize, rows: usize, cols: usize, seed: u32) -> GriddedTimeSeries {
    let shape = (n_times, rows, cols);
    let mut u = Vec::with_capacity(n_times * rows * cols);
    let mut v = Vec::with_capacity(n_times * rows * cols);
    let mut t2 = create_temperature_series(n_times, rows, cols);

    for (i, t2_i) in t2.iter_mut().enumerate() {
        let h = simple_hash(i as u32, 1, seed);
        let direction = (h % 36_000) as f64 / 100.0;
        let speed = (simple_hash(i as u32, 2, seed) % 1500) as f64 / 100.0;
        let (u_i, v_i) = uv_from_direction(direction, speed);
        u.push(u_i);
        v.push(v_i);
        *t2_i += (h % 100) as f32 / 50.0;
    }

    let (lat, lon) = create_lat_lon_grid(rows, cols, crate::fixtures::bbox::PNW);
    GriddedTimeSeries::new(
        Array3::from_shape_vec(shape, u).expect("U shape"),
        Array3::from_shape_vec(shape, v).expect("V shape"),
        lat,
        lon,
    )
    .and_then(|s| s.with_field("T2", Array3::from_shape_vec(shape, t2).expect("T2 shape")))
    .expect("Failed to build test series")
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Sets NaN at the given `(time, row, col)` positions.
///
/// Out-of-range positions are ignored.
pub fn with_nans(mut data: Array3<f32>, positions: &[(usize, usize, usize)]) -> Array3<f32> {
    for &(t, row, col) in positions {
        if let Some(x) = data.get_mut([t, row, col]) {
            *x = f32::NAN;
        }
    }
    data
}

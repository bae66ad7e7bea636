//! Common test utilities for netcdf-parser tests
//!
//! Writes small synthetic WRF files so the loader can be tested without
//! external data.

use std::path::Path;

/// Layout of a synthetic WRF file.
pub struct WrfFixture {
    pub times: usize,
    pub rows: usize,
    pub cols: usize,
    /// Write XLAT/XLONG with a leading time axis
    pub coords_with_time: bool,
    /// Write T2 (with one fill value at the first point)
    pub with_t2: bool,
}

impl Default for WrfFixture {
    fn default() -> Self {
        Self {
            times: 4,
            rows: 3,
            cols: 5,
            coords_with_time: false,
            with_t2: true,
        }
    }
}

pub const FILL: f32 = -9999.0;

impl WrfFixture {
    /// Latitude of row `r`: 40, 41, 42, ...
    pub fn lat(r: usize) -> f32 {
        40.0 + r as f32
    }

    /// Longitude of column `c`: -125, -124, ...
    pub fn lon(c: usize) -> f32 {
        -125.0 + c as f32
    }

    /// T2 at `(t, r, c)` before packing.
    pub fn t2(t: usize, r: usize, c: usize) -> f32 {
        280.0 + t as f32 + 0.5 * r as f32 + 0.25 * c as f32
    }

    pub fn write(&self, path: &Path) {
        let (nt, nr, nc) = (self.times, self.rows, self.cols);
        let mut file = netcdf::create(path).unwrap();
        file.add_dimension("datetime", nt).unwrap();
        file.add_dimension("south_north", nr).unwrap();
        file.add_dimension("west_east", nc).unwrap();

        let grid_dims: &[&str] = if self.coords_with_time {
            &["datetime", "south_north", "west_east"]
        } else {
            &["south_north", "west_east"]
        };
        let repeat = if self.coords_with_time { nt } else { 1 };

        let lat: Vec<f32> = (0..repeat)
            .flat_map(|_| (0..nr).flat_map(move |r| (0..nc).map(move |_| Self::lat(r))))
            .collect();
        let lon: Vec<f32> = (0..repeat)
            .flat_map(|_| (0..nr).flat_map(move |_| (0..nc).map(Self::lon)))
            .collect();
        let mut var = file.add_variable::<f32>("XLAT", grid_dims).unwrap();
        var.put_values(&lat, ..).unwrap();
        let mut var = file.add_variable::<f32>("XLONG", grid_dims).unwrap();
        var.put_values(&lon, ..).unwrap();

        let dims = ["datetime", "south_north", "west_east"];
        let n = nt * nr * nc;
        // Westerly 3 m/s everywhere
        let mut var = file.add_variable::<f32>("U", &dims).unwrap();
        var.put_values(&vec![3.0f32; n], ..).unwrap();
        let mut var = file.add_variable::<f32>("V", &dims).unwrap();
        var.put_values(&vec![0.0f32; n], ..).unwrap();

        if self.with_t2 {
            // Packed as value = raw * 0.5 + 100
            let mut raw = Vec::with_capacity(n);
            for t in 0..nt {
                for r in 0..nr {
                    for c in 0..nc {
                        raw.push((Self::t2(t, r, c) - 100.0) / 0.5);
                    }
                }
            }
            raw[0] = FILL;
            let mut var = file.add_variable::<f32>("T2", &dims).unwrap();
            var.set_fill_value(FILL).unwrap();
            var.put_attribute("scale_factor", 0.5f32).unwrap();
            var.put_attribute("add_offset", 100.0f32).unwrap();
            var.put_values(&raw, ..).unwrap();
        }

        // A 2-D field the loader must refuse as a time series
        let mut var = file
            .add_variable::<f32>("HGT", &["south_north", "west_east"])
            .unwrap();
        var.put_values(&vec![0.0f32; nr * nc], ..).unwrap();
    }
}

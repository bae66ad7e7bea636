//! Common test fixtures for wind-sector statistics.
//!
//! This module provides pre-defined inputs that mirror the study setup:
//! the Pacific Northwest domain, compass quadrants and the CMIP5 driving
//! models of the regional runs.

/// Common bounding boxes, as `(lon_min, lon_max, lat_min, lat_max)`.
pub mod bbox {
    /// Pacific Northwest study domain
    pub const PNW: (f64, f64, f64, f64) = (-124.8, -116.3, 40.0, 49.5);

    /// The same box in `--mask` syntax
    pub const PNW_MASK: &str = "-124.8,-116.3,40,49.5";

    /// Puget Sound, a small box inside PNW
    pub const PUGET_SOUND: (f64, f64, f64, f64) = (-123.2, -122.0, 47.0, 48.4);

    /// A box no PNW grid cell falls in
    pub const SOUTH_PACIFIC: (f64, f64, f64, f64) = (-150.0, -140.0, -30.0, -20.0);
}

/// Common sector definitions.
pub mod sectors {
    /// Quadrant limits in degrees, NE, SE, SW, NW
    pub const QUADRANT_LIMITS: [[f64; 2]; 4] = [[0.0, 90.0], [90.0, 180.0], [180.0, 270.0], [270.0, 360.0]];

    pub const QUADRANT_LABELS: [&str; 4] = ["NE", "SE", "SW", "NW"];

    /// Northern half, wrapping through 0
    pub const NORTH_WRAP: &str = "N:270:90";

    /// Offshore (easterly) and onshore (westerly) flow on the coast
    pub const OFFSHORE_ONSHORE: &str = "offshore:0:180,onshore:180:360";
}

/// Ensemble members and periods.
pub mod models {
    /// Driving global models of the regional runs
    pub const MODELS: [&str; 5] = ["mri-cgcm3", "access1.0", "access1.3", "canesm2", "miroc5"];

    pub const PERIODS: [&str; 2] = ["hist", "fut"];

    /// Per-model result file name, as written by the batch run
    pub fn result_file_name(field: &str, period: &str, model: &str) -> String {
        format!("{}quad_{}_{}.nc", field, period, model)
    }
}

//! Rectangular latitude/longitude masks.

use serde::{Deserialize, Serialize};

/// A geographic box used to mask a curvilinear model grid.
///
/// Coordinates are in degrees. All bounds are inclusive, so a cell whose
/// latitude equals `lat_min` is inside the box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLonBox {
    pub lon_min: f64,
    pub lon_max: f64,
    pub lat_min: f64,
    pub lat_max: f64,
}

impl LatLonBox {
    /// Create a new box from its longitude and latitude ranges.
    pub fn new(lon_min: f64, lon_max: f64, lat_min: f64, lat_max: f64) -> Self {
        Self {
            lon_min,
            lon_max,
            lat_min,
            lat_max,
        }
    }

    /// Parse a mask string: "lon_min,lon_max,lat_min,lat_max"
    pub fn from_mask_string(s: &str) -> Result<Self, BboxParseError> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(BboxParseError::InvalidFormat(s.to_string()));
        }

        let parse = |p: &str| {
            p.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| BboxParseError::InvalidNumber(p.to_string()))
        };

        let bbox = Self::new(
            parse(parts[0])?,
            parse(parts[1])?,
            parse(parts[2])?,
            parse(parts[3])?,
        );

        if bbox.lon_min > bbox.lon_max || bbox.lat_min > bbox.lat_max {
            return Err(BboxParseError::Inverted(s.to_string()));
        }

        Ok(bbox)
    }

    /// Grow the box by `margin` degrees on every side.
    pub fn expanded(&self, margin: f64) -> Self {
        Self {
            lon_min: self.lon_min - margin,
            lon_max: self.lon_max + margin,
            lat_min: self.lat_min - margin,
            lat_max: self.lat_max + margin,
        }
    }

    /// Check if a grid point is inside the box (inclusive).
    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }

    /// Width of the box in degrees longitude.
    pub fn width(&self) -> f64 {
        self.lon_max - self.lon_min
    }

    /// Height of the box in degrees latitude.
    pub fn height(&self) -> f64 {
        self.lat_max - self.lat_min
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Invalid mask format: {0}. Expected 'lon_min,lon_max,lat_min,lat_max'")]
    InvalidFormat(String),

    #[error("Invalid number in mask: {0}")]
    InvalidNumber(String),

    #[error("Mask has min > max: {0}")]
    Inverted(String),
}

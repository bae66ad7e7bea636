//! Time-indexed model grids.

use std::borrow::Cow;
use std::collections::BTreeMap;

use ndarray::{Array2, Array3, Zip};

use crate::error::{WindStatsError, WindStatsResult};

/// Name of the eastward wind component.
pub const U_FIELD: &str = "U";

/// Name of the northward wind component.
pub const V_FIELD: &str = "V";

/// Derived field name: requesting it computes `hypot(U, V)` on the fly.
pub const WIND_SPEED_FIELD: &str = "wind-speed";

/// Named 3-D fields indexed `(time, row, col)` on a fixed lat/lon grid.
///
/// U and V are always present. Every field shares the same shape, and the
/// latitude/longitude grids match its `(row, col)` part. Once built the
/// series is only read; derived quantities are computed per call and never
/// stored back.
#[derive(Debug, Clone)]
pub struct GriddedTimeSeries {
    u: Array3<f32>,
    v: Array3<f32>,
    fields: BTreeMap<String, Array3<f32>>,
    lat: Array2<f32>,
    lon: Array2<f32>,
}

impl GriddedTimeSeries {
    /// Build a series from wind components and the coordinate grids.
    pub fn new(
        u: Array3<f32>,
        v: Array3<f32>,
        lat: Array2<f32>,
        lon: Array2<f32>,
    ) -> WindStatsResult<Self> {
        if v.shape() != u.shape() {
            return Err(WindStatsError::shape_mismatch(V_FIELD, u.shape(), v.shape()));
        }
        if lat.shape() != &u.shape()[1..] {
            return Err(WindStatsError::shape_mismatch("latitude", &u.shape()[1..], lat.shape()));
        }
        if lon.shape() != lat.shape() {
            return Err(WindStatsError::shape_mismatch("longitude", lat.shape(), lon.shape()));
        }

        Ok(Self {
            u,
            v,
            fields: BTreeMap::new(),
            lat,
            lon,
        })
    }

    /// Builder-style variant of [`insert_field`](Self::insert_field).
    pub fn with_field(mut self, name: impl Into<String>, data: Array3<f32>) -> WindStatsResult<Self> {
        self.insert_field(name, data)?;
        Ok(self)
    }

    /// Add (or replace) a named field. The shape must match U and V.
    pub fn insert_field(&mut self, name: impl Into<String>, data: Array3<f32>) -> WindStatsResult<()> {
        let name = name.into();
        if data.shape() != self.u.shape() {
            return Err(WindStatsError::shape_mismatch(name, self.u.shape(), data.shape()));
        }

        match name.as_str() {
            U_FIELD => self.u = data,
            V_FIELD => self.v = data,
            _ => {
                self.fields.insert(name, data);
            }
        }
        Ok(())
    }

    /// Look up a stored field by name (U and V included).
    pub fn field(&self, name: &str) -> Option<&Array3<f32>> {
        match name {
            U_FIELD => Some(&self.u),
            V_FIELD => Some(&self.v),
            _ => self.fields.get(name),
        }
    }

    /// Whether a field with this name is stored.
    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Names of all stored fields, U and V first.
    pub fn field_names(&self) -> Vec<&str> {
        let mut names = vec![U_FIELD, V_FIELD];
        names.extend(self.fields.keys().map(String::as_str));
        names
    }

    /// Resolve a field for reading.
    ///
    /// Stored fields are borrowed. The [`WIND_SPEED_FIELD`] name, when not
    /// stored, yields an owned `hypot(U, V)` array local to the caller.
    pub fn resolve_field(&self, name: &str) -> WindStatsResult<Cow<'_, Array3<f32>>> {
        if let Some(data) = self.field(name) {
            return Ok(Cow::Borrowed(data));
        }
        if name == WIND_SPEED_FIELD {
            return Ok(Cow::Owned(self.wind_speed()));
        }
        Err(WindStatsError::FieldNotFound(name.to_string()))
    }

    /// Wind speed `hypot(U, V)` at every `(time, row, col)` point.
    pub fn wind_speed(&self) -> Array3<f32> {
        Zip::from(&self.u)
            .and(&self.v)
            .map_collect(|&u, &v| u.hypot(v))
    }

    pub fn u(&self) -> &Array3<f32> {
        &self.u
    }

    pub fn v(&self) -> &Array3<f32> {
        &self.v
    }

    pub fn lat(&self) -> &Array2<f32> {
        &self.lat
    }

    pub fn lon(&self) -> &Array2<f32> {
        &self.lon
    }

    /// Number of time steps.
    pub fn n_times(&self) -> usize {
        self.u.shape()[0]
    }

    /// `(rows, cols)` of the spatial grid.
    pub fn grid_shape(&self) -> (usize, usize) {
        (self.u.shape()[1], self.u.shape()[2])
    }
}

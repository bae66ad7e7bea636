//! Named per-sector output grids.

use ndarray::Array2;
use wind_common::{SectorSpec, WindStatsError, WindStatsResult};

/// One all-direction grid plus one grid per sector, on a lat/lon grid.
///
/// Variables are named `<prefix>_all` and `<prefix>_<label>`, in sector
/// order. Instances are built once and not modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorGrids<T> {
    prefix: String,
    sectors: SectorSpec,
    all: Array2<T>,
    by_sector: Vec<Array2<T>>,
    lat: Array2<f32>,
    lon: Array2<f32>,
}

impl<T> SectorGrids<T> {
    /// Assemble output grids, checking that every grid shares one shape
    /// and that there is one grid per sector.
    pub fn new(
        prefix: impl Into<String>,
        sectors: SectorSpec,
        all: Array2<T>,
        by_sector: Vec<Array2<T>>,
        lat: Array2<f32>,
        lon: Array2<f32>,
    ) -> WindStatsResult<Self> {
        let prefix = prefix.into();

        if by_sector.len() != sectors.len() {
            return Err(WindStatsError::InvalidSector(format!(
                "{} sectors but {} grids",
                sectors.len(),
                by_sector.len()
            )));
        }

        let shape = all.shape();
        for (sector, grid) in sectors.iter().zip(&by_sector) {
            if grid.shape() != shape {
                return Err(WindStatsError::shape_mismatch(
                    format!("{}_{}", prefix, sector.label),
                    shape,
                    grid.shape(),
                ));
            }
        }
        if lat.shape() != shape {
            return Err(WindStatsError::shape_mismatch("latitude", shape, lat.shape()));
        }
        if lon.shape() != shape {
            return Err(WindStatsError::shape_mismatch("longitude", shape, lon.shape()));
        }

        Ok(Self {
            prefix,
            sectors,
            all,
            by_sector,
            lat,
            lon,
        })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn sectors(&self) -> &SectorSpec {
        &self.sectors
    }

    /// The grid over all directions.
    pub fn all(&self) -> &Array2<T> {
        &self.all
    }

    /// The grid for one sector label.
    pub fn sector(&self, label: &str) -> Option<&Array2<T>> {
        self.sectors
            .iter()
            .position(|s| s.label == label)
            .map(|i| &self.by_sector[i])
    }

    pub fn lat(&self) -> &Array2<f32> {
        &self.lat
    }

    pub fn lon(&self) -> &Array2<f32> {
        &self.lon
    }

    pub fn all_name(&self) -> String {
        format!("{}_all", self.prefix)
    }

    pub fn variable_name(&self, label: &str) -> String {
        format!("{}_{}", self.prefix, label)
    }

    /// Look up a grid by its full variable name, e.g. `T2_NE`.
    pub fn get(&self, name: &str) -> Option<&Array2<T>> {
        let suffix = name.strip_prefix(&self.prefix)?.strip_prefix('_')?;
        if suffix == "all" {
            Some(&self.all)
        } else {
            self.sector(suffix)
        }
    }

    /// All variables in output order, the all-direction grid first.
    pub fn variables(&self) -> Vec<(String, &Array2<T>)> {
        let mut vars = Vec::with_capacity(self.by_sector.len() + 1);
        vars.push((self.all_name(), &self.all));
        for (sector, grid) in self.sectors.iter().zip(&self.by_sector) {
            vars.push((self.variable_name(&sector.label), grid));
        }
        vars
    }

    /// `(rows, cols)` of the output grid.
    pub fn grid_shape(&self) -> (usize, usize) {
        self.all.dim()
    }
}

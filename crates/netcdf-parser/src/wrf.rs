//! Loading WRF output into a [`GriddedTimeSeries`].
//!
//! Fields are 3-D `(time, south_north, west_east)` arrays. Coordinates come
//! from `XLAT`/`XLONG`, which WRF writes either as 2-D grids or with a
//! leading time axis; in the latter case the first time slice is used.

use std::ops::Range;
use std::path::Path;

use ndarray::{s, Array2, Array3, ArrayD, Axis, Ix2, Ix3, Zip};
use tracing::{debug, info};
use wind_common::{GriddedTimeSeries, LatLonBox, U_FIELD, V_FIELD, WIND_SPEED_FIELD};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{open, read_f32};

/// Latitude variable name.
pub const LAT_VAR: &str = "XLAT";

/// Longitude variable name.
pub const LON_VAR: &str = "XLONG";

/// Load U, V and the requested fields from a WRF NetCDF file.
///
/// `U` and `V` are always read. Names in `fields` that are `U`, `V` or the
/// derived `wind-speed` are skipped. With a `mask`, the grid is cropped to
/// the smallest row/column window holding every cell inside the box, and
/// cells of that window outside the box are set to NaN in every field.
/// Coordinates are cropped but never masked.
pub fn load_wrf_series(
    path: impl AsRef<Path>,
    fields: &[&str],
    mask: Option<&LatLonBox>,
) -> NetCdfResult<GriddedTimeSeries> {
    let path = path.as_ref();
    let file = open(path)?;

    let lat = read_coordinate(&file, LAT_VAR)?;
    let lon = read_coordinate(&file, LON_VAR)?;
    if lat.shape() != lon.shape() {
        return Err(NetCdfError::InvalidFormat(format!(
            "{} shape {:?} differs from {} shape {:?}",
            LAT_VAR,
            lat.shape(),
            LON_VAR,
            lon.shape()
        )));
    }

    let u = read_field(&file, U_FIELD)?;
    let v = read_field(&file, V_FIELD)?;
    let mut series = GriddedTimeSeries::new(u, v, lat, lon)?;
    for &name in fields {
        if matches!(name, U_FIELD | V_FIELD | WIND_SPEED_FIELD) {
            continue;
        }
        series.insert_field(name, read_field(&file, name)?)?;
    }

    if let Some(bbox) = mask {
        series = apply_mask(&series, bbox)?;
    }

    let (rows, cols) = series.grid_shape();
    info!(
        path = %path.display(),
        times = series.n_times(),
        rows,
        cols,
        fields = ?series.field_names(),
        "Loaded WRF series"
    );
    Ok(series)
}

/// Crop a series to the window of a lat/lon box, masking cells outside it.
fn apply_mask(series: &GriddedTimeSeries, bbox: &LatLonBox) -> NetCdfResult<GriddedTimeSeries> {
    let window = MaskWindow::find(series.lat(), series.lon(), bbox)?;
    debug!(rows = ?window.rows, cols = ?window.cols, "Cropping to mask window");

    let mut cropped = GriddedTimeSeries::new(
        window.crop_field(series.u()),
        window.crop_field(series.v()),
        window.crop_coordinate(series.lat()),
        window.crop_coordinate(series.lon()),
    )?;
    for name in series.field_names() {
        if matches!(name, U_FIELD | V_FIELD) {
            continue;
        }
        if let Some(data) = series.field(name) {
            cropped.insert_field(name, window.crop_field(data))?;
        }
    }
    Ok(cropped)
}

fn read_coordinate(file: &netcdf::File, name: &str) -> NetCdfResult<Array2<f32>> {
    let data = read_f32(file, name)?;
    match data.ndim() {
        2 => into_rank2(data, name),
        3 => {
            if data.shape()[0] == 0 {
                return Err(NetCdfError::InvalidFormat(format!("{} has no time steps", name)));
            }
            into_rank2(data.index_axis(Axis(0), 0).to_owned(), name)
        }
        n => Err(NetCdfError::InvalidFormat(format!(
            "{} has {} dimensions, expected 2 or 3",
            name, n
        ))),
    }
}

fn read_field(file: &netcdf::File, name: &str) -> NetCdfResult<Array3<f32>> {
    let data = read_f32(file, name)?;
    let ndim = data.ndim();
    data.into_dimensionality::<Ix3>().map_err(|_| {
        NetCdfError::InvalidFormat(format!(
            "{} has {} dimensions, expected (time, south_north, west_east)",
            name, ndim
        ))
    })
}

fn into_rank2(data: ArrayD<f32>, name: &str) -> NetCdfResult<Array2<f32>> {
    data.into_dimensionality::<Ix2>()
        .map_err(|e| NetCdfError::InvalidFormat(format!("{}: {}", name, e)))
}

/// Row/column window around the cells inside a lat/lon box.
#[derive(Debug, Clone, PartialEq)]
struct MaskWindow {
    rows: Range<usize>,
    cols: Range<usize>,
    /// In-box flags for the cells of the window
    inside: Array2<bool>,
}

impl MaskWindow {
    fn find(lat: &Array2<f32>, lon: &Array2<f32>, bbox: &LatLonBox) -> NetCdfResult<Self> {
        let inside = Zip::from(lat)
            .and(lon)
            .map_collect(|&la, &lo| bbox.contains(f64::from(la), f64::from(lo)));

        let span = |axis: Axis| {
            let hits: Vec<usize> = inside
                .axis_iter(axis)
                .enumerate()
                .filter(|(_, lane)| lane.iter().any(|&b| b))
                .map(|(i, _)| i)
                .collect();
            match (hits.first(), hits.last()) {
                (Some(&first), Some(&last)) => Some(first..last + 1),
                _ => None,
            }
        };

        let (Some(rows), Some(cols)) = (span(Axis(0)), span(Axis(1))) else {
            return Err(NetCdfError::InvalidFormat(format!(
                "mask {},{},{},{} matches no grid cell",
                bbox.lon_min, bbox.lon_max, bbox.lat_min, bbox.lat_max
            )));
        };

        let inside = inside.slice(s![rows.clone(), cols.clone()]).to_owned();
        Ok(Self { rows, cols, inside })
    }

    fn crop_coordinate(&self, grid: &Array2<f32>) -> Array2<f32> {
        grid.slice(s![self.rows.clone(), self.cols.clone()]).to_owned()
    }

    /// Crop a field on the full grid to the window.
    fn crop_field(&self, data: &Array3<f32>) -> Array3<f32> {
        let mut out = data
            .slice(s![.., self.rows.clone(), self.cols.clone()])
            .to_owned();
        for step in out.outer_iter_mut() {
            Zip::from(step).and(&self.inside).for_each(|x, &keep| {
                if !keep {
                    *x = f32::NAN;
                }
            });
        }
        out
    }
}

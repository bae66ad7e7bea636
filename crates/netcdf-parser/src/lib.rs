//! NetCDF input and output for wind-sector statistics.
//!
//! Reads WRF model output (`U`, `V`, `T2`, ... on a `(time, south_north,
//! west_east)` grid with `XLAT`/`XLONG` coordinates) into a
//! [`GriddedTimeSeries`](wind_common::GriddedTimeSeries), and stores
//! aggregation results, wind-day counts and ensemble anomalies as CF-style
//! NetCDF files.
//!
//! # Implementation Notes
//!
//! Uses the native `netcdf` crate, which needs libnetcdf and libhdf5 on the
//! system. HDF5's own error printing is switched off before any file is
//! touched; see [`silence_hdf5_errors`].

pub mod error;
pub mod native;
pub mod wrf;
pub mod writer;

pub use error::{NetCdfError, NetCdfResult};
pub use native::silence_hdf5_errors;
pub use wrf::{load_wrf_series, LAT_VAR, LON_VAR};
pub use writer::{
    read_aggregation, write_aggregation, write_ensemble, write_wind_day_counts, COL_DIM, ROW_DIM,
};

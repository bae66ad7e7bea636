//! Common types shared by the wind-sector statistics crates.
//!
//! The aggregation code in `wind-sectors`, the NetCDF loader in
//! `netcdf-parser` and the `wind-stats` binary all speak in terms of these
//! types: a time-indexed grid of named fields, a table of wind-direction
//! sectors, the statistic to reduce with, and a lat/lon mask.

pub mod bbox;
pub mod error;
pub mod grid;
pub mod sector;
pub mod statistic;

pub use bbox::{BboxParseError, LatLonBox};
pub use error::{WindStatsError, WindStatsResult};
pub use grid::{GriddedTimeSeries, U_FIELD, V_FIELD, WIND_SPEED_FIELD};
pub use sector::{Sector, SectorSpec};
pub use statistic::Statistic;

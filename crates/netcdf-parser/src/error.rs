//! Error types for NetCDF loading and result storage.

use thiserror::Error;
use wind_common::WindStatsError;

/// Result type for NetCDF parser operations.
pub type NetCdfResult<T> = Result<T, NetCdfError>;

/// Error types for NetCDF reading and writing.
#[derive(Error, Debug)]
pub enum NetCdfError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Missing required variable or attribute
    #[error("Missing required data: {0}")]
    MissingData(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Error reported by libnetcdf
    #[error("NetCDF library error: {0}")]
    Library(#[from] netcdf::Error),

    /// The data read does not form a valid grid
    #[error(transparent)]
    Grid(#[from] WindStatsError),
}

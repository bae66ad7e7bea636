//! Wind-sector statistics driver.
//!
//! Loads WRF output, aggregates a field by wind direction sector, and
//! writes the results as NetCDF. Single files are handled by [`commands`];
//! whole model ensembles described by a YAML run file by [`batch`].

pub mod batch;
pub mod commands;
pub mod config;
pub mod report;

pub use batch::run_batch;
pub use config::{load_run_config, parse_run_config, RunConfig, RunMode};
pub use report::{Failure, OutputReport, Report};

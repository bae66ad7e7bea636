//! Single-file commands: aggregate, count and ensemble.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use netcdf_parser::{
    load_wrf_series, read_aggregation, write_aggregation, write_ensemble, write_wind_day_counts,
};
use tracing::{info, warn};
use wind_common::LatLonBox;
use wind_sectors::{
    aggregate, count_wind_days, AggregateRequest, AggregationResult, CountRequest,
    EnsembleAccumulator, EnsembleAnomalies, WindDayCounts,
};

use crate::report::OutputReport;

/// Load a WRF file and aggregate one field by wind sector.
pub fn aggregate_file(
    input: &Path,
    request: &AggregateRequest,
    mask: Option<&LatLonBox>,
) -> Result<AggregationResult> {
    // Fail on a bad statistic before reading anything
    request.validate()?;

    let series = load_wrf_series(input, &[request.field.as_str()], mask)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    let result = aggregate(&series, request)
        .with_context(|| format!("Failed to aggregate {} from {}", request.field, input.display()))?;

    for (name, grid) in result.variables() {
        if grid.iter().all(|x| x.is_nan()) {
            warn!(variable = %name, "Every cell is missing");
        }
    }
    Ok(result)
}

/// Load a WRF file and count wind days by sector.
pub fn count_file(
    input: &Path,
    request: &CountRequest,
    mask: Option<&LatLonBox>,
) -> Result<WindDayCounts> {
    let fields: Vec<&str> = if request.heatwave_filter {
        vec![request.heatwave_field.as_str()]
    } else {
        Vec::new()
    };

    let series = load_wrf_series(input, &fields, mask)
        .with_context(|| format!("Failed to load {}", input.display()))?;
    count_wind_days(&series, request)
        .with_context(|| format!("Failed to count wind days in {}", input.display()))
}

/// `aggregate` subcommand.
pub fn run_aggregate(
    input: &Path,
    output: &Path,
    request: &AggregateRequest,
    mask: Option<&LatLonBox>,
    summary: bool,
) -> Result<OutputReport> {
    let result = aggregate_file(input, request, mask)?;
    write_aggregation(output, &result)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let report = OutputReport::new(output);
    Ok(if summary {
        report.with_grids(result.grids())
    } else {
        report
    })
}

/// `count` subcommand.
pub fn run_count(
    input: &Path,
    output: &Path,
    request: &CountRequest,
    mask: Option<&LatLonBox>,
    summary: bool,
) -> Result<OutputReport> {
    let counts = count_file(input, request, mask)?;
    write_wind_day_counts(output, &counts)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let report = OutputReport::new(output);
    Ok(if summary {
        report.with_grids(&counts)
    } else {
        report
    })
}

/// Historical and future result files of one ensemble member.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberFiles {
    pub name: String,
    pub historical: PathBuf,
    pub future: PathBuf,
}

impl MemberFiles {
    /// Member name taken from the last `_`-separated part of the historical
    /// file stem, so `T2quad_hist_CCSM.nc` is member `CCSM`.
    pub fn new(historical: impl Into<PathBuf>, future: impl Into<PathBuf>) -> Self {
        let historical = historical.into();
        let name = historical
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|s| s.rsplit('_').next())
            .unwrap_or_default()
            .to_string();
        Self {
            name,
            historical,
            future: future.into(),
        }
    }
}

impl FromStr for MemberFiles {
    type Err = String;

    /// Parse "hist.nc:fut.nc"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((hist, fut)) if !hist.is_empty() && !fut.is_empty() => Ok(Self::new(hist, fut)),
            _ => Err(format!("expected HIST.nc:FUT.nc, got '{}'", s)),
        }
    }
}

/// Mean sector anomalies over members read from existing result files.
pub fn ensemble_from_files(members: &[MemberFiles]) -> Result<EnsembleAnomalies> {
    let first = members.first().context("At least one ensemble member is required")?;
    let first_hist = read_aggregation(&first.historical)
        .with_context(|| format!("Failed to read {}", first.historical.display()))?;

    let mut accumulator = EnsembleAccumulator::new(first_hist.sectors());
    for (i, member) in members.iter().enumerate() {
        let historical = if i == 0 {
            first_hist.clone()
        } else {
            read_aggregation(&member.historical)
                .with_context(|| format!("Failed to read {}", member.historical.display()))?
        };
        let future = read_aggregation(&member.future)
            .with_context(|| format!("Failed to read {}", member.future.display()))?;

        accumulator
            .add_member(member.name.as_str(), &historical, &future)
            .with_context(|| format!("Ensemble member {} is inconsistent", member.name))?;
        info!(member = %member.name, "Read ensemble member");
    }

    Ok(accumulator.finish()?)
}

/// `ensemble` subcommand.
pub fn run_ensemble(members: &[MemberFiles], output: &Path, summary: bool) -> Result<OutputReport> {
    let ensemble = ensemble_from_files(members)?;
    write_ensemble(output, &ensemble)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    let report = OutputReport::new(output);
    Ok(if summary {
        report.with_ensemble(&ensemble)
    } else {
        report
    })
}

//! NetCDF storage of aggregation results, wind-day counts and ensemble
//! anomalies.
//!
//! Every file has dimensions `(south_north, west_east)`, the `XLAT` and
//! `XLONG` coordinate grids, and one 2-D variable per output grid. Global
//! attributes record what was computed so files can be read back without
//! side information.

use std::path::Path;

use ndarray::{Array2, Ix2};
use tracing::{info, warn};
use wind_common::{SectorSpec, Statistic};
use wind_sectors::{AggregationResult, EnsembleAnomalies, SectorGrids, WindDayCounts};

use crate::error::{NetCdfError, NetCdfResult};
use crate::native::{get_global_string, open, read_f32, silence_hdf5_errors};
use crate::wrf::{LAT_VAR, LON_VAR};

/// Row dimension name.
pub const ROW_DIM: &str = "south_north";

/// Column dimension name.
pub const COL_DIM: &str = "west_east";

/// Global attribute names.
pub mod attrs {
    pub const TITLE: &str = "title";
    pub const FIELD: &str = "field";
    pub const STATISTIC: &str = "statistic";
    /// Sector table as `LABEL:START:END,...`
    pub const SECTORS: &str = "sectors";
    pub const MEMBERS: &str = "members";
    /// Sector labels of an ensemble file
    pub const LABELS: &str = "labels";
}

/// Write `<field>_all` and `<field>_<label>` grids of an aggregation.
pub fn write_aggregation(path: impl AsRef<Path>, result: &AggregationResult) -> NetCdfResult<()> {
    let path = path.as_ref();
    let mut file = create_with_coords(path, result.lat(), result.lon())?;

    file.add_attribute(attrs::TITLE, "Wind-sector statistics")?;
    file.add_attribute(attrs::FIELD, result.field())?;
    file.add_attribute(attrs::STATISTIC, result.statistic().to_string().as_str())?;
    file.add_attribute(attrs::SECTORS, sector_table(result.sectors()).as_str())?;

    let variables = result.variables();
    for (name, grid) in &variables {
        put_f32(&mut file, name, grid)?;
    }

    info!(
        path = %path.display(),
        field = result.field(),
        statistic = %result.statistic(),
        variables = variables.len(),
        "Wrote aggregation"
    );
    Ok(())
}

/// Write `wind_days_all` and `wind_days_<label>` counts as 32-bit integers.
pub fn write_wind_day_counts(path: impl AsRef<Path>, counts: &WindDayCounts) -> NetCdfResult<()> {
    let path = path.as_ref();
    let mut file = create_with_coords(path, counts.lat(), counts.lon())?;

    file.add_attribute(attrs::TITLE, "Wind days by sector")?;
    file.add_attribute(attrs::SECTORS, sector_table(counts.sectors()).as_str())?;

    let variables = counts.variables();
    for (name, grid) in &variables {
        put_i32(&mut file, name, grid)?;
    }

    info!(path = %path.display(), variables = variables.len(), "Wrote wind-day counts");
    Ok(())
}

/// Write ensemble-mean anomalies, one `<period>_<label>` variable each.
pub fn write_ensemble(path: impl AsRef<Path>, ensemble: &EnsembleAnomalies) -> NetCdfResult<()> {
    let path = path.as_ref();
    let mut file = create_with_coords(path, ensemble.lat(), ensemble.lon())?;

    file.add_attribute(attrs::TITLE, "Ensemble-mean wind-sector anomalies")?;
    file.add_attribute(attrs::MEMBERS, ensemble.members().join(",").as_str())?;
    file.add_attribute(attrs::LABELS, ensemble.labels().join(",").as_str())?;

    let variables = ensemble.variables();
    for (name, grid) in &variables {
        put_f32(&mut file, name, grid)?;
    }

    info!(
        path = %path.display(),
        members = ensemble.members().len(),
        variables = variables.len(),
        "Wrote ensemble anomalies"
    );
    Ok(())
}

/// Read a file written by [`write_aggregation`].
pub fn read_aggregation(path: impl AsRef<Path>) -> NetCdfResult<AggregationResult> {
    let path = path.as_ref();
    let file = open(path)?;

    let required = |name: &str| {
        get_global_string(&file, name)
            .ok_or_else(|| NetCdfError::MissingData(format!("global attribute '{}'", name)))
    };
    let field = required(attrs::FIELD)?;
    let statistic: Statistic = required(attrs::STATISTIC)?.parse()?;
    let sectors = SectorSpec::parse_list(&required(attrs::SECTORS)?)?;

    let lat = read_grid(&file, LAT_VAR)?;
    let lon = read_grid(&file, LON_VAR)?;
    let all = read_grid(&file, &format!("{}_all", field))?;
    let by_sector = sectors
        .iter()
        .map(|sector| read_grid(&file, &format!("{}_{}", field, sector.label)))
        .collect::<NetCdfResult<Vec<_>>>()?;

    let grids = SectorGrids::new(field, sectors, all, by_sector, lat, lon)?;
    Ok(AggregationResult::new(grids, statistic))
}

fn sector_table(sectors: &SectorSpec) -> String {
    sectors
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn create_with_coords(
    path: &Path,
    lat: &Array2<f32>,
    lon: &Array2<f32>,
) -> NetCdfResult<netcdf::FileMut> {
    silence_hdf5_errors();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let (rows, cols) = lat.dim();
    let mut file = netcdf::create(path)?;
    file.add_dimension(ROW_DIM, rows)?;
    file.add_dimension(COL_DIM, cols)?;

    for (name, grid, units, long_name) in [
        (LAT_VAR, lat, "degree_north", "latitude"),
        (LON_VAR, lon, "degree_east", "longitude"),
    ] {
        let mut var = file.add_variable::<f32>(name, &[ROW_DIM, COL_DIM])?;
        var.put_attribute("units", units)?;
        var.put_attribute("long_name", long_name)?;
        let data: Vec<f32> = grid.iter().copied().collect();
        var.put_values(&data, ..)?;
    }
    Ok(file)
}

fn put_f32(file: &mut netcdf::FileMut, name: &str, grid: &Array2<f32>) -> NetCdfResult<()> {
    let mut var = file.add_variable::<f32>(name, &[ROW_DIM, COL_DIM])?;
    var.set_fill_value(f32::NAN)?;
    var.put_attribute("coordinates", "XLONG XLAT")?;
    let data: Vec<f32> = grid.iter().copied().collect();
    var.put_values(&data, ..)?;
    Ok(())
}

fn put_i32(file: &mut netcdf::FileMut, name: &str, grid: &Array2<u32>) -> NetCdfResult<()> {
    let mut var = file.add_variable::<i32>(name, &[ROW_DIM, COL_DIM])?;
    var.put_attribute("coordinates", "XLONG XLAT")?;
    var.put_attribute("units", "1")?;
    let data = saturating_i32(name, grid);
    var.put_values(&data, ..)?;
    Ok(())
}

/// Counts above `i32::MAX` are stored as `i32::MAX`.
fn saturating_i32(name: &str, grid: &Array2<u32>) -> Vec<i32> {
    let mut clamped = 0usize;
    let data: Vec<i32> = grid
        .iter()
        .map(|&n| {
            i32::try_from(n).unwrap_or_else(|_| {
                clamped += 1;
                i32::MAX
            })
        })
        .collect();
    if clamped > 0 {
        warn!(variable = name, cells = clamped, "Counts exceed i32 range; clamped to i32::MAX");
    }
    data
}

fn read_grid(file: &netcdf::File, name: &str) -> NetCdfResult<Array2<f32>> {
    read_f32(file, name)?
        .into_dimensionality::<Ix2>()
        .map_err(|_| NetCdfError::InvalidFormat(format!("{} is not a 2-D grid", name)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr2;

    #[test]
    fn test_counts_in_range_are_unchanged() {
        let grid = arr2(&[[0u32, 7], [i32::MAX as u32, 1]]);
        assert_eq!(saturating_i32("wind_days_all", &grid), vec![0, 7, i32::MAX, 1]);
    }

    #[test]
    fn test_oversized_counts_saturate() {
        let grid = arr2(&[[u32::MAX, 3]]);
        assert_eq!(saturating_i32("wind_days_NE", &grid), vec![i32::MAX, 3]);
    }
}

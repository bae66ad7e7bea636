//! Common test utilities for wind-stats tests

use std::path::Path;

use wind_common::GriddedTimeSeries;

/// Write a series as a minimal WRF file: U, V, every extra field, XLAT, XLONG.
pub fn write_wrf(path: &Path, series: &GriddedTimeSeries) {
    let (rows, cols) = series.grid_shape();
    let mut file = netcdf::create(path).unwrap();
    file.add_dimension("Time", series.n_times()).unwrap();
    file.add_dimension("south_north", rows).unwrap();
    file.add_dimension("west_east", cols).unwrap();

    for (name, grid) in [("XLAT", series.lat()), ("XLONG", series.lon())] {
        let data: Vec<f32> = grid.iter().copied().collect();
        let mut var = file
            .add_variable::<f32>(name, &["south_north", "west_east"])
            .unwrap();
        var.put_values(&data, ..).unwrap();
    }

    for name in series.field_names() {
        let data: Vec<f32> = series.field(name).unwrap().iter().copied().collect();
        let mut var = file
            .add_variable::<f32>(name, &["Time", "south_north", "west_east"])
            .unwrap();
        var.put_values(&data, ..).unwrap();
    }
}

/// Write `{dir}/wrf_{model}.nc` for each model with a seeded test series.
pub fn write_models(dir: &Path, models: &[&str], seed: u32) {
    for (i, model) in models.iter().enumerate() {
        let series = test_utils::create_test_series(48, 4, 5, seed + i as u32);
        write_wrf(&dir.join(format!("wrf_{}.nc", model)), &series);
    }
}

//! Integration tests for loading WRF files.

mod common;

use common::{WrfFixture, FILL};
use netcdf_parser::{load_wrf_series, NetCdfError};
use test_utils::{
    assert_approx_eq,
    bbox::{PNW_MASK, PUGET_SOUND, SOUTH_PACIFIC},
    require_test_file, temp_nc_path, temp_test_dir,
};
use wind_common::LatLonBox;

// ============================================================================
// Plain loading
// ============================================================================

#[test]
fn test_load_shapes_and_coordinates() {
    let dir = temp_test_dir();
    let path = temp_nc_path(&dir, "wrf850UVT");
    WrfFixture::default().write(&path);

    let series = load_wrf_series(&path, &["T2"], None).unwrap();
    assert_eq!(series.n_times(), 4);
    assert_eq!(series.grid_shape(), (3, 5));
    assert_eq!(series.lat()[[2, 0]], WrfFixture::lat(2));
    assert_eq!(series.lon()[[0, 4]], WrfFixture::lon(4));
    assert_eq!(series.u()[[3, 2, 4]], 3.0);
}

#[test]
fn test_fill_and_packing_resolved() {
    let dir = temp_test_dir();
    let path = temp_nc_path(&dir, "wrf850UVT");
    WrfFixture::default().write(&path);

    let series = load_wrf_series(&path, &["T2"], None).unwrap();
    let t2 = series.field("T2").unwrap();
    assert!(t2[[0, 0, 0]].is_nan());
    assert_approx_eq!(t2[[2, 1, 3]], WrfFixture::t2(2, 1, 3), 1e-4);
    assert!(t2.iter().all(|&x| x != FILL));
}

#[test]
fn test_coordinates_with_time_axis() {
    let dir = temp_test_dir();
    let path = temp_nc_path(&dir, "wrfout");
    WrfFixture {
        coords_with_time: true,
        ..Default::default()
    }
    .write(&path);

    let series = load_wrf_series(&path, &[], None).unwrap();
    assert_eq!(series.lat().dim(), (3, 5));
    assert_eq!(series.lat()[[1, 1]], WrfFixture::lat(1));
}

#[test]
fn test_wind_speed_is_not_read_from_file() {
    let dir = temp_test_dir();
    let path = temp_nc_path(&dir, "wrf850UVT");
    WrfFixture::default().write(&path);

    let series = load_wrf_series(&path, &["U", "wind-speed"], None).unwrap();
    assert_eq!(series.field_names(), vec!["U", "V"]);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_field() {
    let dir = temp_test_dir();
    let path = temp_nc_path(&dir, "wrf850UVT");
    WrfFixture {
        with_t2: false,
        ..Default::default()
    }
    .write(&path);

    let err = load_wrf_series(&path, &["T2"], None).unwrap_err();
    assert!(matches!(err, NetCdfError::MissingData(_)));
}

#[test]
fn test_field_with_wrong_rank() {
    let dir = temp_test_dir();
    let path = temp_nc_path(&dir, "wrf850UVT");
    WrfFixture::default().write(&path);

    let err = load_wrf_series(&path, &["HGT"], None).unwrap_err();
    assert!(matches!(err, NetCdfError::InvalidFormat(_)));
}

#[test]
fn test_missing_file() {
    let err = load_wrf_series("/nonexistent/wrf850UVT.nc", &["T2"], None).unwrap_err();
    assert!(matches!(err, NetCdfError::IoError(_)));
}

// ============================================================================
// Masking
// ============================================================================

#[test]
fn test_mask_crops_grid() {
    let dir = temp_test_dir();
    let path = temp_nc_path(&dir, "wrf850UVT");
    WrfFixture::default().write(&path);

    let mask = LatLonBox::new(-124.0, -122.0, 41.0, 42.0);
    let series = load_wrf_series(&path, &["T2"], Some(&mask)).unwrap();
    assert_eq!(series.grid_shape(), (2, 3));
    assert_eq!(series.lat()[[0, 0]], 41.0);
    assert_eq!(series.lon()[[0, 0]], -124.0);
    assert_approx_eq!(
        series.field("T2").unwrap()[[1, 0, 0]],
        WrfFixture::t2(1, 1, 1),
        1e-4
    );
    assert!(series.u().iter().all(|x| !x.is_nan()));
}

#[test]
fn test_mask_with_margin() {
    let dir = temp_test_dir();
    let path = temp_nc_path(&dir, "wrf850UVT");
    WrfFixture::default().write(&path);

    // The study scripts widen the domain box by one degree before masking
    let mask = LatLonBox::new(-123.5, -122.5, 41.5, 41.5).expanded(1.0);
    let series = load_wrf_series(&path, &[], Some(&mask)).unwrap();
    assert_eq!(series.grid_shape(), (2, 3));
}

#[test]
fn test_mask_outside_grid() {
    let dir = temp_test_dir();
    let path = temp_nc_path(&dir, "wrf850UVT");
    WrfFixture::default().write(&path);

    let (lon_min, lon_max, lat_min, lat_max) = SOUTH_PACIFIC;
    let mask = LatLonBox::new(lon_min, lon_max, lat_min, lat_max);
    let err = load_wrf_series(&path, &[], Some(&mask)).unwrap_err();
    assert!(matches!(err, NetCdfError::InvalidFormat(_)));
}

// ============================================================================
// Real WRF output (skipped unless present)
// ============================================================================

#[test]
fn test_real_wrf_file_with_study_mask() {
    let path = require_test_file!("1970wrf850UVTmiroc5.nc");

    let pnw = LatLonBox::from_mask_string(PNW_MASK).unwrap().expanded(1.0);
    let series = load_wrf_series(&path, &["T2"], Some(&pnw)).unwrap();
    assert!(series.n_times() > 0);

    let t2 = series.field("T2").unwrap();
    let valid: Vec<f32> = t2.iter().copied().filter(|x| !x.is_nan()).collect();
    assert!(!valid.is_empty());
    // 2-m temperature in Kelvin
    assert!(valid.iter().all(|&k| (200.0..330.0).contains(&k)));

    let (lon_min, lon_max, lat_min, lat_max) = PUGET_SOUND;
    let puget = LatLonBox::new(lon_min, lon_max, lat_min, lat_max);
    let small = load_wrf_series(&path, &[], Some(&puget)).unwrap();
    let ((rows, cols), (small_rows, small_cols)) = (series.grid_shape(), small.grid_shape());
    assert!(small_rows <= rows && small_cols <= cols);
}

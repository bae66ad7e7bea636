//! Single-file command tests.

mod common;

use netcdf_parser::{read_aggregation, write_aggregation};
use test_utils::{
    assert_approx_eq, assert_nan_or_approx_eq, create_test_series, require_test_files,
};
use wind_common::{LatLonBox, SectorSpec, Statistic};
use wind_sectors::{
    aggregate, sector_anomaly, AggregateRequest, AggregationResult, CountRequest, Period,
};
use wind_stats::commands::{
    aggregate_file, ensemble_from_files, run_aggregate, run_count, run_ensemble, MemberFiles,
};
use wind_stats::load_run_config;

// ============================================================================
// aggregate
// ============================================================================

#[test]
fn test_run_aggregate_writes_requested_statistic() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wrf.nc");
    let series = create_test_series(24, 3, 4, 5);
    common::write_wrf(&input, &series);

    let request = AggregateRequest::new(SectorSpec::parse_list("N:270:90,S:90:270").unwrap())
        .statistic(Statistic::median());
    let output = dir.path().join("out/median.nc");
    let report = run_aggregate(&input, &output, &request, None, true).unwrap();

    assert_eq!(report.path, output);
    let names: Vec<_> = report.fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["T2_all", "T2_N", "T2_S"]);

    let written = read_aggregation(&output).unwrap();
    assert_eq!(written.statistic(), Statistic::Percentile(50.0));
    let expected = aggregate(&series, &request).unwrap();
    for (a, e) in written.all().iter().zip(expected.all().iter()) {
        assert_approx_eq!(*a, *e, 1e-4);
    }
}

#[test]
fn test_aggregate_wind_speed_field() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wrf.nc");
    common::write_wrf(&input, &create_test_series(24, 2, 2, 9));

    let request = AggregateRequest::default().field("wind-speed").min_speed(3.0);
    let result = aggregate_file(&input, &request, None).unwrap();

    assert_eq!(result.field(), "wind-speed");
    // Only steps faster than 3 m/s reach a sector
    for (label, grid) in result.variables().into_iter().skip(1) {
        for &x in grid.iter() {
            assert!(x.is_nan() || x > 3.0, "{} holds {}", label, x);
        }
    }
}

#[test]
fn test_aggregate_rejects_bad_statistic_before_loading() {
    let request = AggregateRequest::default().statistic(Statistic::Percentile(120.0));
    let err = aggregate_file(std::path::Path::new("/nonexistent/wrf.nc"), &request, None).unwrap_err();
    assert!(format!("{:#}", err).contains("120"));
}

#[test]
fn test_aggregate_missing_field() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wrf.nc");
    common::write_wrf(&input, &create_test_series(4, 2, 2, 1));

    let request = AggregateRequest::default().field("Q2");
    assert!(aggregate_file(&input, &request, None).is_err());
}

#[test]
fn test_aggregate_with_mask() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wrf.nc");
    common::write_wrf(&input, &create_test_series(8, 4, 5, 2));

    // Western three columns of the PNW test grid
    let mask = LatLonBox::new(-125.0, -120.0, 39.0, 50.0);
    let result = aggregate_file(&input, &AggregateRequest::default(), Some(&mask)).unwrap();
    assert_eq!(result.grid_shape(), (4, 3));
}

// ============================================================================
// count
// ============================================================================

#[test]
fn test_run_count_heatwave() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wrf.nc");
    common::write_wrf(&input, &create_test_series(100, 2, 3, 4));

    let request = CountRequest::default().heatwave_filter(true);
    let output = dir.path().join("counts.nc");
    let report = run_count(&input, &output, &request, None, true).unwrap();

    // At most 5 of 100 steps are above the 95th percentile
    let all = &report.fields[0];
    assert_eq!(all.name, "wind_days_all");
    assert!(all.max.unwrap() <= 5.0);

    let file = netcdf::open(&output).unwrap();
    assert!(file.variable("wind_days_NE").is_some());
}

#[test]
fn test_count_missing_heatwave_field() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("wrf.nc");
    common::write_wrf(&input, &create_test_series(10, 2, 2, 4));

    let request = CountRequest::default().heatwave_filter(true).heatwave_field("TSK");
    assert!(run_count(&input, &dir.path().join("c.nc"), &request, None, false).is_err());
}

// ============================================================================
// ensemble
// ============================================================================

#[test]
fn test_ensemble_from_result_files() {
    let dir = tempfile::tempdir().unwrap();
    let request = AggregateRequest::default();

    let mut members = Vec::new();
    let mut results = Vec::new();
    for (i, model) in ["canesm2", "miroc5"].iter().enumerate() {
        let hist = aggregate(&create_test_series(24, 3, 3, i as u32), &request).unwrap();
        let fut = aggregate(&create_test_series(24, 3, 3, 50 + i as u32), &request).unwrap();
        let hist_path = dir.path().join(format!("T2quad_hist_{}.nc", model));
        let fut_path = dir.path().join(format!("T2quad_fut_{}.nc", model));
        write_aggregation(&hist_path, &hist).unwrap();
        write_aggregation(&fut_path, &fut).unwrap();
        members.push(MemberFiles::new(hist_path, fut_path));
        results.push((hist, fut));
    }

    let ensemble = ensemble_from_files(&members).unwrap();
    assert_eq!(ensemble.members(), ["canesm2", "miroc5"]);

    let change = |(hist, fut): &(AggregationResult, AggregationResult)| {
        &sector_anomaly(fut, "NE").unwrap() - &sector_anomaly(hist, "NE").unwrap()
    };
    let expected = (&change(&results[0]) + &change(&results[1])) / 2.0;
    let actual = ensemble.get(Period::Change, "NE").unwrap();
    for (a, e) in actual.iter().zip(expected.iter()) {
        assert_nan_or_approx_eq!(*a, *e, 1e-3);
    }

    let output = dir.path().join("ensemble.nc");
    let report = run_ensemble(&members, &output, true).unwrap();
    assert_eq!(report.fields.len(), 12);
    assert_eq!(report.fields[0].name, "hist_NE");
}

#[test]
fn test_ensemble_from_study_results() {
    let paths = require_test_files!("T2quad_hist_miroc5.nc", "T2quad_fut_miroc5.nc");

    let member = MemberFiles::new(&paths[0], &paths[1]);
    assert_eq!(member.name, "miroc5");
    let ensemble = ensemble_from_files(&[member]).unwrap();
    assert_eq!(ensemble.members(), ["miroc5"]);
    assert!(ensemble.get(Period::Change, "NE").is_some());
}

#[test]
fn test_ensemble_rejects_mismatched_sectors() {
    let dir = tempfile::tempdir().unwrap();
    let series = create_test_series(12, 2, 2, 3);

    let quadrants = aggregate(&series, &AggregateRequest::default()).unwrap();
    let halves = aggregate(
        &series,
        &AggregateRequest::new(SectorSpec::parse_list("E:0:180,W:180:360").unwrap()),
    )
    .unwrap();

    let paths: Vec<_> = ["hist_a", "fut_a", "hist_b", "fut_b"]
        .iter()
        .map(|name| dir.path().join(format!("{}.nc", name)))
        .collect();
    write_aggregation(&paths[0], &quadrants).unwrap();
    write_aggregation(&paths[1], &quadrants).unwrap();
    write_aggregation(&paths[2], &halves).unwrap();
    write_aggregation(&paths[3], &halves).unwrap();

    let members = vec![
        MemberFiles::new(&paths[0], &paths[1]),
        MemberFiles::new(&paths[2], &paths[3]),
    ];
    let err = ensemble_from_files(&members).unwrap_err();
    assert!(format!("{:#}", err).contains("inconsistent"));
}

// ============================================================================
// Run file
// ============================================================================

#[test]
fn test_load_run_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    std::env::set_var("WIND_STATS_TEST_OUT", "/tmp/wind-stats-out");
    std::fs::write(
        &path,
        "models: [miroc5]\ninputs:\n  historical: Data/1970wrf850UVT{model}.nc\noutput:\n  dir: ${WIND_STATS_TEST_OUT}\n",
    )
    .unwrap();

    let config = load_run_config(&path).unwrap();
    assert_eq!(config.output.dir, std::path::PathBuf::from("/tmp/wind-stats-out"));
    assert!(config.ensemble_path().is_none());
}

#[test]
fn test_load_run_config_missing_file() {
    let err = load_run_config("/nonexistent/run.yaml").unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read run config"));
}

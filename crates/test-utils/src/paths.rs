//! Locating optional WRF sample files and scratch NetCDF paths.
//!
//! Real WRF output is large and not checked in. Tests that want it look it
//! up with [`find_test_file`] and skip themselves when it is absent.

use std::path::PathBuf;

/// Workspace root, two levels above this crate's manifest.
pub fn workspace_root() -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Directories searched for sample files, in order.
///
/// 1. `$TEST_DATA_DIR` when set
/// 2. `crates/netcdf-parser/testdata/`
/// 3. `services/wind-stats/testdata/`
/// 4. `testdata/` at the workspace root
pub fn testdata_dirs() -> Vec<PathBuf> {
    let root = workspace_root();
    let mut dirs: Vec<PathBuf> = std::env::var_os("TEST_DATA_DIR")
        .map(PathBuf::from)
        .into_iter()
        .collect();
    dirs.extend([
        root.join("crates").join("netcdf-parser").join("testdata"),
        root.join("services").join("wind-stats").join("testdata"),
        root.join("testdata"),
    ]);
    dirs
}

/// First existing `<dir>/<name>` over [`testdata_dirs`].
pub fn find_test_file(name: &str) -> Option<PathBuf> {
    testdata_dirs()
        .into_iter()
        .map(|dir| dir.join(name))
        .find(|path| path.exists())
}

/// Scratch directory removed when dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix("wind_stats_")
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// `<dir>/<stem>.nc`
pub fn temp_nc_path(dir: &tempfile::TempDir, stem: &str) -> PathBuf {
    dir.path().join(format!("{}.nc", stem))
}

//! Test support for the wind-sector statistics workspace.
//!
//! - [`generators`]: synthetic wind, temperature and coordinate grids
//! - [`fixtures`]: the study domain boxes, sector tables and model names
//! - [`paths`]: optional WRF sample files and scratch NetCDF paths
//!
//! Used as a dev-dependency only:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve a sample file with [`find_test_file`], or end the test early.
///
/// Sample WRF output is not part of the repository; tests that need it
/// print a notice and pass when it cannot be found.
///
/// ```ignore
/// let path = require_test_file!("1970wrf850UVTmiroc5.nc");
/// ```
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!("SKIPPED: '{}' not found (set TEST_DATA_DIR)", $name);
                return;
            }
        }
    }};
}

/// Like [`require_test_file!`] for several files; yields a `Vec<PathBuf>`.
#[macro_export]
macro_rules! require_test_files {
    ($($name:expr),+ $(,)?) => {{
        vec![$($crate::require_test_file!($name)),+]
    }};
}

/// Assert `|left - right| <= epsilon`, comparing as `f64`.
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right, epsilon) = ($left as f64, $right as f64, $epsilon as f64);
        let diff = (left - right).abs();
        if !(diff <= epsilon) {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`\n  diff: `{:?}` > `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// [`assert_approx_eq!`] that also accepts two NaNs.
///
/// Output grids mark cells without samples as NaN, so element-wise checks
/// of whole grids need this.
#[macro_export]
macro_rules! assert_nan_or_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let (left, right) = ($left as f64, $right as f64);
        match (left.is_nan(), right.is_nan()) {
            (true, true) => {}
            (false, false) => $crate::assert_approx_eq!(left, right, $epsilon),
            _ => panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`\n right: `{:?}`",
                left, right
            ),
        }
    }};
}

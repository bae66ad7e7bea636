//! Thin helpers over the native netcdf library.
//!
//! Opening files, reading variables as `f32` with CF packing and missing
//! values resolved, and looking up optional attributes without triggering
//! HDF5 error output.

use std::path::Path;
use std::sync::Once;

use ndarray::{ArrayD, IxDyn};
use netcdf::AttributeValue;

use crate::error::{NetCdfError, NetCdfResult};

/// Turn off the HDF5 library's own error printing.
///
/// Probing for optional attributes such as `scale_factor` fails inside
/// HDF5, which then writes an `HDF5-DIAG` trace to stderr even though the
/// miss is expected. Every reader and writer here calls this first; the
/// binary also calls it at startup. Only the first call does anything.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: a null handler with null client data disables automatic
        // error printing for the default error stack.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Open a NetCDF file for reading.
///
/// A missing file is an `IoError`; a file libnetcdf cannot parse is
/// `InvalidFormat`.
pub(crate) fn open(path: &Path) -> NetCdfResult<netcdf::File> {
    silence_hdf5_errors();

    if !path.exists() {
        return Err(NetCdfError::IoError(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    netcdf::open(path).map_err(|e| {
        NetCdfError::InvalidFormat(format!("Failed to open {}: {}", path.display(), e))
    })
}

/// Read a whole variable as `f32`.
///
/// `_FillValue` and `missing_value` become NaN; `scale_factor` and
/// `add_offset` are applied to the remaining values.
pub(crate) fn read_f32(file: &netcdf::File, name: &str) -> NetCdfResult<ArrayD<f32>> {
    let var = file
        .variable(name)
        .ok_or_else(|| NetCdfError::MissingData(format!("{} variable", name)))?;
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();

    let raw: Vec<f32> = var.get_values(..)?;

    let scale_factor = get_f32_attr(&var, "scale_factor").unwrap_or(1.0);
    let add_offset = get_f32_attr(&var, "add_offset").unwrap_or(0.0);
    let fill_value = get_f32_attr(&var, "_FillValue");
    let missing_value = get_f32_attr(&var, "missing_value");

    let data: Vec<f32> = raw
        .into_iter()
        .map(|val| {
            if val.is_nan() || Some(val) == fill_value || Some(val) == missing_value {
                f32::NAN
            } else {
                val * scale_factor + add_offset
            }
        })
        .collect();

    ArrayD::from_shape_vec(IxDyn(&shape), data)
        .map_err(|e| NetCdfError::InvalidFormat(format!("{}: {}", name, e)))
}

/// Check if a variable has an attribute with the given name.
/// This avoids HDF5 error spam when checking for optional attributes.
fn has_attr(var: &netcdf::Variable, name: &str) -> bool {
    var.attributes().any(|attr| attr.name() == name)
}

/// Helper to get f32 attribute.
pub(crate) fn get_f32_attr(var: &netcdf::Variable, name: &str) -> Option<f32> {
    if !has_attr(var, name) {
        return None;
    }
    let attr_value = var.attribute_value(name)?.ok()?;
    f32::try_from(attr_value).ok()
}

/// Helper to get a string-valued global attribute.
pub(crate) fn get_global_string(file: &netcdf::File, name: &str) -> Option<String> {
    if !file.attributes().any(|attr| attr.name() == name) {
        return None;
    }
    match file.attribute(name)?.value().ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

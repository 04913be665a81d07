//! Low-level NetCDF extraction helpers.

use std::path::Path;

use enso_calendar::YearMonth;
use netcdf::AttributeValue;

use crate::error::IoError;
use crate::time::TimeUnits;

/// Open a NetCDF file at `path`, returning [`IoError::FileNotFound`] if the
/// path does not exist on disk.
pub(crate) fn open_file(path: &Path) -> Result<netcdf::File, IoError> {
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(netcdf::open(path)?)
}

/// Look up a variable, trying each alias in order.
///
/// If none match, returns [`IoError::MissingVariable`] with the first alias
/// as the name.
pub(crate) fn find_variable<'f>(
    file: &'f netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<netcdf::Variable<'f>, IoError> {
    aliases
        .iter()
        .find_map(|&alias| file.variable(alias))
        .ok_or_else(|| IoError::MissingVariable {
            name: aliases.first().copied().unwrap_or("unknown").to_string(),
            path: path.to_path_buf(),
        })
}

/// Read a 1-D `f64` coordinate variable, trying each alias in order.
pub(crate) fn read_1d_f64(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<Vec<f64>, IoError> {
    let var = find_variable(file, aliases, path)?;
    Ok(var.get_values::<f64, _>(..)?)
}

/// Numeric value of a scalar (or first element of a vector) attribute.
fn attr_f64(var: &netcdf::Variable<'_>, name: &str) -> Option<f64> {
    let value = var.attribute_value(name)?.ok()?;
    match value {
        AttributeValue::Double(v) => Some(v),
        AttributeValue::Float(v) => Some(f64::from(v)),
        AttributeValue::Longlong(v) => Some(v as f64),
        AttributeValue::Ulonglong(v) => Some(v as f64),
        AttributeValue::Int(v) => Some(f64::from(v)),
        AttributeValue::Uint(v) => Some(f64::from(v)),
        AttributeValue::Short(v) => Some(f64::from(v)),
        AttributeValue::Ushort(v) => Some(f64::from(v)),
        AttributeValue::Schar(v) => Some(f64::from(v)),
        AttributeValue::Uchar(v) => Some(f64::from(v)),
        AttributeValue::Doubles(v) => v.first().copied(),
        AttributeValue::Floats(v) => v.first().map(|&x| f64::from(x)),
        _ => None,
    }
}

/// String value of an attribute, if present and textual.
pub(crate) fn attr_string(var: &netcdf::Variable<'_>, name: &str) -> Option<String> {
    match var.attribute_value(name)?.ok()? {
        AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Read a data variable as `f64`, masking fill values to NaN.
///
/// Raw values equal to `_FillValue` or `missing_value` become NaN before
/// `scale_factor` and `add_offset` are applied. Values outside `valid_range`
/// (inclusive, in physical units) are masked as well.
pub(crate) fn read_masked(
    var: &netcdf::Variable<'_>,
    valid_range: Option<(f64, f64)>,
) -> Result<Vec<f64>, IoError> {
    let mut data = var.get_values::<f64, _>(..)?;

    let fills: Vec<f64> = ["_FillValue", "missing_value"]
        .iter()
        .filter_map(|name| attr_f64(var, name))
        .filter(|v| !v.is_nan())
        .collect();
    let scale = attr_f64(var, "scale_factor").unwrap_or(1.0);
    let offset = attr_f64(var, "add_offset").unwrap_or(0.0);

    let mut masked = 0usize;
    for v in &mut data {
        if fills.iter().any(|f| *v == *f) {
            *v = f64::NAN;
            masked += 1;
            continue;
        }
        *v = *v * scale + offset;
        if let Some((lo, hi)) = valid_range
            && !v.is_nan()
            && !(lo..=hi).contains(v)
        {
            *v = f64::NAN;
            masked += 1;
        }
    }

    tracing::debug!(
        variable = %var.name(),
        values = data.len(),
        masked,
        scale,
        offset,
        "read masked variable"
    );
    Ok(data)
}

/// Decode the time coordinate of `file` to one month per time step.
pub(crate) fn read_time_months(
    file: &netcdf::File,
    aliases: &[&str],
    path: &Path,
) -> Result<Vec<YearMonth>, IoError> {
    let var = find_variable(file, aliases, path)?;
    let units = attr_string(&var, "units").ok_or_else(|| IoError::InvalidTime {
        reason: format!("time variable '{}' has no 'units' attribute", var.name()),
    })?;
    let calendar = attr_string(&var, "calendar");
    let units = TimeUnits::parse(&units, calendar.as_deref())?;
    let offsets = var.get_values::<f64, _>(..)?;
    units.decode_all(&offsets)
}

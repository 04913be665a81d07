//! NetCDF output of diagnostic results.
//!
//! Results are small (maps, curves, index series), so an [`OutputFile`] is
//! assembled fully in memory, checked for consistency, and written in one go.

use std::collections::HashSet;
use std::path::Path;

use enso_calendar::MonthlyAxis;
use enso_field::Grid;
use tracing::info;

use crate::error::IoError;

/// Attribute payload.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Text attribute.
    Text(String),
    /// Scalar numeric attribute.
    Number(f64),
    /// Numeric vector attribute, e.g. explained variance per mode.
    Numbers(Vec<f64>),
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        AttrValue::Number(v)
    }
}

impl From<Vec<f64>> for AttrValue {
    fn from(v: Vec<f64>) -> Self {
        AttrValue::Numbers(v)
    }
}

/// One `f64` variable with its dimensions and attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputVariable {
    name: String,
    dims: Vec<String>,
    values: Vec<f64>,
    attributes: Vec<(String, AttrValue)>,
}

impl OutputVariable {
    /// A variable over `dims`, values in row-major order.
    pub fn new(name: impl Into<String>, dims: &[&str], values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            dims: dims.iter().map(|d| d.to_string()).collect(),
            values,
            attributes: Vec::new(),
        }
    }

    /// Attach an attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Attach a `units` attribute.
    pub fn with_units(self, units: &str) -> Self {
        self.with_attribute("units", units)
    }

    /// Attach a `long_name` attribute.
    pub fn with_long_name(self, long_name: &str) -> Self {
        self.with_attribute("long_name", long_name)
    }

    /// Variable name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dimension names.
    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    /// Values in row-major order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// An output file under construction.
#[derive(Debug, Clone, Default)]
pub struct OutputFile {
    dimensions: Vec<(String, usize)>,
    variables: Vec<OutputVariable>,
    attributes: Vec<(String, AttrValue)>,
}

impl OutputFile {
    /// An empty file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dimension with a coordinate variable of the same name.
    pub fn with_coordinate(mut self, name: &str, values: Vec<f64>, units: &str) -> Self {
        self.dimensions.push((name.to_string(), values.len()));
        self.variables
            .push(OutputVariable::new(name, &[name], values).with_units(units));
        self
    }

    /// Add `lat` and `lon` coordinates for `grid`.
    pub fn with_grid(self, grid: &Grid) -> Self {
        self.with_coordinate("lat", grid.lats().to_vec(), "degrees_north")
            .with_coordinate("lon", grid.lons().to_vec(), "degrees_east")
    }

    /// Add a CF `time` coordinate for a monthly axis, stamped mid-month in
    /// days since the first month.
    pub fn with_time_axis(mut self, axis: &MonthlyAxis) -> Self {
        let mut offset = 0.0;
        let stamps: Vec<f64> = axis
            .iter()
            .map(|ym| {
                let stamp = offset + 14.0;
                offset += f64::from(ym.days());
                stamp
            })
            .collect();
        let start = axis.start();
        let units = format!("days since {}-{:02}-01", start.year(), start.month());
        self.dimensions.push(("time".to_string(), stamps.len()));
        self.variables.push(
            OutputVariable::new("time", &["time"], stamps)
                .with_units(&units)
                .with_attribute("calendar", "standard"),
        );
        self
    }

    /// Add a yearly `year` coordinate.
    pub fn with_years(self, start_year: i32, end_year: i32) -> Self {
        let years = (start_year..=end_year).map(f64::from).collect();
        self.with_coordinate("year", years, "year")
    }

    /// Add a data variable.
    pub fn with_variable(mut self, variable: OutputVariable) -> Self {
        self.variables.push(variable);
        self
    }

    /// Attach a global attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Variables added so far, coordinates included.
    pub fn variables(&self) -> &[OutputVariable] {
        &self.variables
    }

    /// Check names and sizes before anything touches disk.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] for duplicate names or unknown
    /// dimensions, and [`IoError::DimensionMismatch`] when a variable's
    /// value count does not match its dimensions.
    pub fn validate(&self) -> Result<(), IoError> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();
        for (name, _) in &self.dimensions {
            if !seen.insert(format!("dim:{name}")) {
                problems.push(format!("duplicate dimension '{name}'"));
            }
        }
        for var in &self.variables {
            if !seen.insert(format!("var:{}", var.name)) {
                problems.push(format!("duplicate variable '{}'", var.name));
            }
            for dim in &var.dims {
                if !self.dimensions.iter().any(|(d, _)| d == dim) {
                    problems.push(format!("variable '{}' uses unknown dimension '{dim}'", var.name));
                }
            }
        }
        if !problems.is_empty() {
            return Err(IoError::Validation {
                count: problems.len(),
                details: problems.join("; "),
            });
        }

        for var in &self.variables {
            let expected: usize = var
                .dims
                .iter()
                .filter_map(|dim| self.dimensions.iter().find(|(d, _)| d == dim))
                .map(|(_, len)| *len)
                .product();
            if expected != var.values.len() {
                return Err(IoError::DimensionMismatch {
                    name: var.name.clone(),
                    expected,
                    got: var.values.len(),
                });
            }
        }
        Ok(())
    }

    /// Validate and write to `path`, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`] from [`validate`](Self::validate) or from the
    /// NetCDF library.
    pub fn write(&self, path: &Path) -> Result<(), IoError> {
        self.validate()?;

        let mut file = netcdf::create(path)?;
        for (name, len) in &self.dimensions {
            file.add_dimension(name, *len)?;
        }
        for var in &self.variables {
            let dims: Vec<&str> = var.dims.iter().map(String::as_str).collect();
            let mut nc_var = file.add_variable::<f64>(&var.name, &dims)?;
            for (key, value) in &var.attributes {
                put_variable_attribute(&mut nc_var, key, value)?;
            }
            nc_var.put_values(&var.values, ..)?;
        }
        for (key, value) in &self.attributes {
            match value {
                AttrValue::Text(s) => file.add_attribute(key, s.as_str())?,
                AttrValue::Number(v) => file.add_attribute(key, *v)?,
                AttrValue::Numbers(v) => file.add_attribute(key, v.clone())?,
            };
        }

        info!(
            path = %path.display(),
            variables = self.variables.len(),
            "wrote netcdf output"
        );
        Ok(())
    }
}

fn put_variable_attribute(
    var: &mut netcdf::VariableMut<'_>,
    key: &str,
    value: &AttrValue,
) -> Result<(), IoError> {
    match value {
        AttrValue::Text(s) => var.put_attribute(key, s.as_str())?,
        AttrValue::Number(v) => var.put_attribute(key, *v)?,
        AttrValue::Numbers(v) => var.put_attribute(key, v.clone())?,
    };
    Ok(())
}

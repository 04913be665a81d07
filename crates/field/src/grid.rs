//! Rectilinear latitude/longitude grid.

use crate::error::FieldError;

/// Rectilinear grid of cell-centre coordinates in degrees.
///
/// Points are laid out latitude-major: point `p` sits at latitude index
/// `p / n_lon` and longitude index `p % n_lon`.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    lats: Vec<f64>,
    lons: Vec<f64>,
}

impl Grid {
    /// Creates a grid from latitude and longitude centres.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidGrid`] if either axis is empty, holds a
    /// non-finite value, or a latitude lies outside [-90, 90].
    pub fn new(lats: Vec<f64>, lons: Vec<f64>) -> Result<Self, FieldError> {
        if lats.is_empty() || lons.is_empty() {
            return Err(FieldError::InvalidGrid {
                reason: format!("empty axis ({} lats, {} lons)", lats.len(), lons.len()),
            });
        }
        if let Some(bad) = lats
            .iter()
            .find(|l| !l.is_finite() || !(-90.0..=90.0).contains(*l))
        {
            return Err(FieldError::InvalidGrid {
                reason: format!("latitude {bad} outside [-90, 90]"),
            });
        }
        if let Some(bad) = lons.iter().find(|l| !l.is_finite()) {
            return Err(FieldError::InvalidGrid {
                reason: format!("non-finite longitude {bad}"),
            });
        }
        Ok(Self { lats, lons })
    }

    /// Latitude centres.
    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    /// Longitude centres.
    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    /// Number of latitudes.
    pub fn n_lat(&self) -> usize {
        self.lats.len()
    }

    /// Number of longitudes.
    pub fn n_lon(&self) -> usize {
        self.lons.len()
    }

    /// Total number of cells.
    pub fn n_points(&self) -> usize {
        self.lats.len() * self.lons.len()
    }

    /// `cos(latitude)` per latitude row, clamped at zero for the poles.
    pub fn coslat(&self) -> Vec<f64> {
        self.lats
            .iter()
            .map(|lat| lat.to_radians().cos().max(0.0))
            .collect()
    }

    /// Area weight for every cell, latitude-major.
    pub fn cell_weights(&self) -> Vec<f64> {
        let n_lon = self.n_lon();
        self.coslat()
            .into_iter()
            .flat_map(|w| std::iter::repeat_n(w, n_lon))
            .collect()
    }

    /// Subgrid built from the given row and column indices.
    pub(crate) fn subset(&self, lat_idx: &[usize], lon_idx: &[usize]) -> Self {
        Self {
            lats: lat_idx.iter().map(|&i| self.lats[i]).collect(),
            lons: lon_idx.iter().map(|&j| self.lons[j]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_empty_and_out_of_range() {
        assert!(Grid::new(vec![], vec![0.0]).is_err());
        assert!(Grid::new(vec![91.0], vec![0.0]).is_err());
        assert!(Grid::new(vec![0.0], vec![f64::NAN]).is_err());
    }

    #[test]
    fn coslat_weights() {
        let grid = Grid::new(vec![-60.0, 0.0, 90.0], vec![0.0, 10.0]).unwrap();
        let w = grid.coslat();
        assert_relative_eq!(w[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(w[1], 1.0, epsilon = 1e-12);
        assert!(w[2].abs() < 1e-12);
        assert_eq!(grid.cell_weights().len(), 6);
        assert_relative_eq!(grid.cell_weights()[1], 0.5, epsilon = 1e-12);
    }
}

//! Weighted EOF decomposition through a symmetric eigen-solve.

use enso_field::Field;
use nalgebra::{DMatrix, DVector, SymmetricEigen};
use ndarray::Array2;
use tracing::{info, warn};

use crate::config::EofConfig;
use crate::error::EofError;
use crate::result::{EofMode, EofResult};

/// Eigenvalues below this fraction of the largest are treated as zero.
const RANK_TOLERANCE: f64 = 1e-10;

/// Leading EOFs of a (typically detrended anomaly) field.
///
/// Each cell is centred in time and multiplied by `sqrt(cos(lat))` before the
/// decomposition so that the covariance is area weighted. Cells with any
/// missing time step are left out and appear missing in the patterns. The
/// eigen-solve runs on whichever of the temporal or spatial covariance
/// matrices is smaller. Modes beyond the rank of the data are dropped.
///
/// The sign of each mode is fixed so that its weighted pattern sums to a
/// non-negative value; the sign carries no physical meaning.
///
/// # Errors
///
/// Returns [`EofError::InvalidModeCount`] for `n_modes == 0` and
/// [`EofError::InsufficientData`] with fewer than 2 time steps, no complete
/// cell, or no variance.
pub fn compute_eofs(field: &Field, config: &EofConfig) -> Result<EofResult, EofError> {
    config.validate()?;
    let n_time = field.n_time();
    if n_time < 2 {
        return Err(EofError::InsufficientData {
            reason: format!("{n_time} time step(s)"),
        });
    }

    let grid = field.grid();
    let (n_lat, n_lon) = (grid.n_lat(), grid.n_lon());
    let coslat = grid.coslat();

    // (lat, lon, weight) of every complete cell with non-zero weight.
    let cells: Vec<(usize, usize, f64)> = (0..n_lat)
        .flat_map(|i| (0..n_lon).map(move |j| (i, j)))
        .filter(|&(i, j)| field.point(i, j).iter().all(|v| v.is_finite()))
        .map(|(i, j)| {
            let w = if config.use_coslat() { coslat[i].sqrt() } else { 1.0 };
            (i, j, w)
        })
        .filter(|&(_, _, w)| w > 0.0)
        .collect();
    if cells.is_empty() {
        return Err(EofError::InsufficientData {
            reason: "no cell is complete over the time axis".to_string(),
        });
    }
    let n_space = cells.len();

    let x = DMatrix::from_fn(n_time, n_space, |t, k| {
        let (i, j, w) = cells[k];
        field.point(i, j)[t] * w
    });
    let means = x.row_mean();
    let x = DMatrix::from_fn(n_time, n_space, |t, k| x[(t, k)] - means[k]);

    let total: f64 = x.iter().map(|v| v * v).sum();
    if total <= 0.0 {
        return Err(EofError::InsufficientData {
            reason: "field has no variance".to_string(),
        });
    }

    let temporal = n_time <= n_space;
    let gram = if temporal {
        &x * x.transpose()
    } else {
        x.transpose() * &x
    };
    let eig = SymmetricEigen::new(gram);

    let mut order: Vec<usize> = (0..eig.eigenvalues.len()).collect();
    order.sort_by(|&a, &b| eig.eigenvalues[b].total_cmp(&eig.eigenvalues[a]));
    let largest = eig.eigenvalues[order[0]].max(0.0);
    let rank = order
        .iter()
        .take_while(|&&k| eig.eigenvalues[k] > largest * RANK_TOLERANCE)
        .count();
    let n_modes = config.n_modes().min(rank);
    if n_modes < config.n_modes() {
        warn!(
            requested = config.n_modes(),
            rank, "fewer EOF modes than requested"
        );
    }

    let sqrt_t = (n_time as f64).sqrt();
    let mut modes = Vec::with_capacity(n_modes);
    for (m, &k) in order.iter().take(n_modes).enumerate() {
        let lambda = eig.eigenvalues[k];
        let s = lambda.sqrt();
        let mut v: DVector<f64> = if temporal {
            let u = eig.eigenvectors.column(k);
            (x.transpose() * u) / s
        } else {
            eig.eigenvectors.column(k).into_owned()
        };
        if v.sum() < 0.0 {
            v = -v;
        }
        let pc = &x * &v;

        let mut pattern = Array2::from_elem((n_lat, n_lon), f64::NAN);
        let mut amplitude = Array2::from_elem((n_lat, n_lon), f64::NAN);
        for (idx, &(i, j, w)) in cells.iter().enumerate() {
            pattern[[i, j]] = v[idx];
            amplitude[[i, j]] = s * v[idx] / (w * sqrt_t);
        }

        modes.push(EofMode {
            number: m + 1,
            pattern,
            amplitude_pattern: amplitude,
            pc: pc.iter().copied().collect(),
            explained_variance: lambda / total,
            eigenvalue: lambda,
        });
    }

    info!(
        n_time,
        n_space,
        n_modes,
        leading = modes.first().map(|m| m.explained_variance),
        "computed EOFs"
    );

    Ok(EofResult {
        axis: *field.axis(),
        grid: grid.clone(),
        n_valid_points: n_space,
        modes,
    })
}

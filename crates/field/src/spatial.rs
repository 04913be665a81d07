//! Region selection, area-weighted means and spatial masking.

use ndarray::{Array3, Axis, Zip};
use tracing::debug;

use crate::error::FieldError;
use crate::field::{Field, TimeSeries};
use crate::region::Region;

/// Row and column indices of the cells inside `region`.
fn region_indices(field: &Field, region: &Region) -> (Vec<usize>, Vec<usize>) {
    let grid = field.grid();
    let lat_idx: Vec<usize> = grid
        .lats()
        .iter()
        .enumerate()
        .filter(|(_, lat)| region.contains_lat(**lat))
        .map(|(i, _)| i)
        .collect();

    let mut lon_idx: Vec<usize> = grid
        .lons()
        .iter()
        .enumerate()
        .filter(|(_, lon)| region.contains_lon(**lon))
        .map(|(j, _)| j)
        .collect();

    // Order longitudes eastward from the western edge so wrapped boxes stay
    // contiguous; full-circle boxes keep the grid's own order.
    if !region.is_full_circle() {
        let lons = grid.lons();
        lon_idx.sort_by(|&a, &b| {
            region
                .eastward_offset(lons[a])
                .total_cmp(&region.eastward_offset(lons[b]))
        });
    }
    (lat_idx, lon_idx)
}

/// Spatial subset of `field` covering the cells whose centre lies in `region`.
///
/// # Errors
///
/// Returns [`FieldError::EmptySelection`] if no cell centre is inside.
pub fn select_region(field: &Field, region: &Region) -> Result<Field, FieldError> {
    let (lat_idx, lon_idx) = region_indices(field, region);
    if lat_idx.is_empty() || lon_idx.is_empty() {
        return Err(FieldError::EmptySelection {
            region: region.name().to_string(),
        });
    }
    debug!(
        region = region.name(),
        n_lat = lat_idx.len(),
        n_lon = lon_idx.len(),
        "selected region"
    );

    let data = field
        .data()
        .select(Axis(1), &lat_idx)
        .select(Axis(2), &lon_idx);
    Field::new(*field.axis(), field.grid().subset(&lat_idx, &lon_idx), data)
}

/// Cos-latitude weighted mean over all cells at each time step.
///
/// Missing cells are skipped and the weights renormalised over the cells
/// present; a time step with no valid cell is missing.
///
/// # Errors
///
/// Propagates [`FieldError`] if the means cannot be placed on the field's
/// time axis.
pub fn area_mean(field: &Field) -> Result<TimeSeries, FieldError> {
    let weights = field.grid().cell_weights();
    let values: Vec<f64> = field
        .data()
        .axis_iter(Axis(0))
        .map(|slab| {
            let cells: Vec<f64> = slab.iter().copied().collect();
            enso_stats::weighted_mean(&cells, &weights)
        })
        .collect();
    TimeSeries::new(*field.axis(), values)
}

/// Area-weighted mean over `region`.
///
/// # Errors
///
/// Returns [`FieldError::EmptySelection`] if the region holds no cells.
pub fn region_mean(field: &Field, region: &Region) -> Result<TimeSeries, FieldError> {
    area_mean(&select_region(field, region)?)
}

/// Removes the `reference` region mean from every cell at each time step.
///
/// With the tropical band as reference this yields the "relative" field
/// (e.g. relative SST) in which the tropical-mean warming is removed.
///
/// # Errors
///
/// Returns [`FieldError::EmptySelection`] if the reference region holds no
/// cells.
pub fn compute_relative(field: &Field, reference: &Region) -> Result<Field, FieldError> {
    let reference_mean = region_mean(field, reference)?;
    let mut data = field.data().clone();
    for (mut slab, &m) in data
        .axis_iter_mut(Axis(0))
        .zip(reference_mean.values())
    {
        slab.mapv_inplace(|v| v - m);
    }
    field.with_data(data)
}

/// Masks every cell that is missing at any time step.
///
/// Returns the masked field and the number of cells newly masked.
///
/// # Errors
///
/// Propagates [`FieldError`] if the masked data cannot be rewrapped.
pub fn constant_mask(field: &Field) -> Result<(Field, usize), FieldError> {
    let (_, n_lat, n_lon) = field.data().dim();
    let mut keep = ndarray::Array2::from_elem((n_lat, n_lon), true);
    for slab in field.data().axis_iter(Axis(0)) {
        Zip::from(&mut keep)
            .and(&slab)
            .for_each(|k, v| *k &= v.is_finite());
    }

    let mut data: Array3<f64> = field.data().clone();
    let mut masked = 0;
    for ((ilat, ilon), &k) in keep.indexed_iter() {
        if k {
            continue;
        }
        let mut lane = data.slice_mut(ndarray::s![.., ilat, ilon]);
        if lane.iter().any(|v| v.is_finite()) {
            masked += 1;
        }
        lane.fill(f64::NAN);
    }
    debug!(masked, "applied constant mask");
    Ok((field.with_data(data)?, masked))
}

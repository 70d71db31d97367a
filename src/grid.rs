//! Dense `(step, lat, lon)` array type for gridded time series.
//!
//! [`GridField`] stores a 3-D field in a flat `Vec<f64>` laid out so that the
//! series of every grid cell along the step axis is one contiguous slice.
//! The step axis is either time (raw series, anomalies) or hour-of-year
//! (climatologies).

use crate::error::{AnomalyError, Result};
use nalgebra::DMatrix;

/// Dense 3-D field indexed by `(step, lat, lon)`.
///
/// Layout is column-major over `(step, cell)` with `cell = i * nlon + j`:
/// element `(t, i, j)` is at index `t + (i * nlon + j) * nsteps`.
///
/// # Examples
///
/// ```
/// use climanom_core::grid::GridField;
///
/// // 3 steps on a 1 x 2 grid, given in (step, lat, lon) C order
/// let data = vec![
///     1.0, 10.0, // step 0
///     2.0, 20.0, // step 1
///     3.0, 30.0, // step 2
/// ];
/// let field = GridField::from_step_major(&data, 3, 1, 2).unwrap();
///
/// assert_eq!(field.shape(), (3, 1, 2));
/// assert_eq!(field[(1, 0, 1)], 20.0);
/// assert_eq!(field.series(1), &[10.0, 20.0, 30.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GridField {
    data: Vec<f64>,
    nsteps: usize,
    nlat: usize,
    nlon: usize,
}

/// Total element count, or an error if the dimensions overflow `usize`.
fn checked_len(nsteps: usize, nlat: usize, nlon: usize) -> Result<usize> {
    nlat.checked_mul(nlon)
        .and_then(|cells| cells.checked_mul(nsteps))
        .ok_or_else(|| {
            AnomalyError::invalid_argument(format!(
                "field dimensions {}x{}x{} overflow",
                nsteps, nlat, nlon
            ))
        })
}

impl GridField {
    /// Create from flat cell-contiguous data with dimension validation.
    pub fn from_column_major(
        data: Vec<f64>,
        nsteps: usize,
        nlat: usize,
        nlon: usize,
    ) -> Result<Self> {
        let expected = checked_len(nsteps, nlat, nlon)?;
        if data.len() != expected {
            return Err(AnomalyError::shape_mismatch("field data", expected, data.len()));
        }
        Ok(Self {
            data,
            nsteps,
            nlat,
            nlon,
        })
    }

    /// Create from C-order `(step, lat, lon)` data (copies and transposes).
    pub fn from_step_major(data: &[f64], nsteps: usize, nlat: usize, nlon: usize) -> Result<Self> {
        let expected = checked_len(nsteps, nlat, nlon)?;
        let ncells = nlat * nlon;
        if data.len() != expected {
            return Err(AnomalyError::shape_mismatch("field data", expected, data.len()));
        }
        let mut out = vec![0.0; expected];
        for t in 0..nsteps {
            for cell in 0..ncells {
                out[t + cell * nsteps] = data[t * ncells + cell];
            }
        }
        Ok(Self {
            data: out,
            nsteps,
            nlat,
            nlon,
        })
    }

    /// Create a zero-filled field.
    pub fn zeros(nsteps: usize, nlat: usize, nlon: usize) -> Result<Self> {
        Ok(Self {
            data: vec![0.0; checked_len(nsteps, nlat, nlon)?],
            nsteps,
            nlat,
            nlon,
        })
    }

    /// Length of the step axis.
    #[inline]
    pub fn nsteps(&self) -> usize {
        self.nsteps
    }

    /// Number of latitudes.
    #[inline]
    pub fn nlat(&self) -> usize {
        self.nlat
    }

    /// Number of longitudes.
    #[inline]
    pub fn nlon(&self) -> usize {
        self.nlon
    }

    /// Number of grid cells (`nlat * nlon`).
    #[inline]
    pub fn ncells(&self) -> usize {
        self.nlat * self.nlon
    }

    /// Dimensions as `(nsteps, nlat, nlon)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nsteps, self.nlat, self.nlon)
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the field is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Flat cell index for `(lat, lon)`.
    #[inline]
    pub fn cell_index(&self, lat: usize, lon: usize) -> usize {
        lat * self.nlon + lon
    }

    /// Series of one cell along the step axis (zero-copy).
    ///
    /// # Panics
    /// Panics if `cell >= ncells`.
    #[inline]
    pub fn series(&self, cell: usize) -> &[f64] {
        let start = cell * self.nsteps;
        &self.data[start..start + self.nsteps]
    }

    /// Mutable series of one cell along the step axis.
    ///
    /// # Panics
    /// Panics if `cell >= ncells`.
    #[inline]
    pub fn series_mut(&mut self, cell: usize) -> &mut [f64] {
        let start = cell * self.nsteps;
        &mut self.data[start..start + self.nsteps]
    }

    /// Extract the lat x lon slab at one step, row-major over `(lat, lon)`.
    ///
    /// This is O(ncells) with a stride of `nsteps`.
    pub fn step_slice(&self, step: usize) -> Vec<f64> {
        (0..self.ncells())
            .map(|cell| self.data[step + cell * self.nsteps])
            .collect()
    }

    /// Copy out in C-order `(step, lat, lon)`.
    pub fn to_step_major(&self) -> Vec<f64> {
        let ncells = self.ncells();
        let mut out = vec![0.0; self.data.len()];
        for cell in 0..ncells {
            for t in 0..self.nsteps {
                out[t * ncells + cell] = self.data[t + cell * self.nsteps];
            }
        }
        out
    }

    /// Flat slice of the underlying cell-contiguous data.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Mutable flat slice of the underlying cell-contiguous data.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Consume and return the underlying `Vec<f64>`.
    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    /// Convert to a nalgebra `DMatrix<f64>` of shape `(nsteps, ncells)`.
    ///
    /// Both are column-major, so each matrix column is one cell's series.
    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_column_slice(self.nsteps, self.ncells(), &self.data)
    }

    /// Create from a nalgebra `DMatrix<f64>` whose columns are cells.
    pub fn from_dmatrix(mat: &DMatrix<f64>, nlat: usize, nlon: usize) -> Result<Self> {
        let (nsteps, ncols) = mat.shape();
        checked_len(nsteps, nlat, nlon)?;
        if ncols != nlat * nlon {
            return Err(AnomalyError::shape_mismatch("matrix columns", nlat * nlon, ncols));
        }
        Ok(Self {
            data: mat.as_slice().to_vec(),
            nsteps,
            nlat,
            nlon,
        })
    }

    /// Get element at `(step, lat, lon)` with bounds checking.
    #[inline]
    pub fn get(&self, step: usize, lat: usize, lon: usize) -> Option<f64> {
        if step < self.nsteps && lat < self.nlat && lon < self.nlon {
            Some(self.data[step + self.cell_index(lat, lon) * self.nsteps])
        } else {
            None
        }
    }

    /// Set element at `(step, lat, lon)` with bounds checking.
    #[inline]
    pub fn set(&mut self, step: usize, lat: usize, lon: usize, value: f64) -> bool {
        if step < self.nsteps && lat < self.nlat && lon < self.nlon {
            let idx = step + self.cell_index(lat, lon) * self.nsteps;
            self.data[idx] = value;
            true
        } else {
            false
        }
    }
}

impl std::ops::Index<(usize, usize, usize)> for GridField {
    type Output = f64;

    #[inline]
    fn index(&self, (step, lat, lon): (usize, usize, usize)) -> &f64 {
        debug_assert!(
            step < self.nsteps && lat < self.nlat && lon < self.nlon,
            "GridField index ({}, {}, {}) out of bounds for {}x{}x{} field",
            step,
            lat,
            lon,
            self.nsteps,
            self.nlat,
            self.nlon
        );
        &self.data[step + (lat * self.nlon + lon) * self.nsteps]
    }
}

impl std::ops::IndexMut<(usize, usize, usize)> for GridField {
    #[inline]
    fn index_mut(&mut self, (step, lat, lon): (usize, usize, usize)) -> &mut f64 {
        debug_assert!(
            step < self.nsteps && lat < self.nlat && lon < self.nlon,
            "GridField index ({}, {}, {}) out of bounds for {}x{}x{} field",
            step,
            lat,
            lon,
            self.nsteps,
            self.nlat,
            self.nlon
        );
        &mut self.data[step + (lat * self.nlon + lon) * self.nsteps]
    }
}

impl std::fmt::Display for GridField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GridField({}x{}x{})", self.nsteps, self.nlat, self.nlon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_3x2x2() -> GridField {
        // C order (step, lat, lon): value = 100*t + 10*i + j
        let mut data = Vec::new();
        for t in 0..3 {
            for i in 0..2 {
                for j in 0..2 {
                    data.push((100 * t + 10 * i + j) as f64);
                }
            }
        }
        GridField::from_step_major(&data, 3, 2, 2).unwrap()
    }

    #[test]
    fn test_from_step_major_layout() {
        let field = sample_3x2x2();
        assert_eq!(field.shape(), (3, 2, 2));
        assert_eq!(field.ncells(), 4);
        assert_eq!(field.len(), 12);
        for t in 0..3 {
            for i in 0..2 {
                for j in 0..2 {
                    assert_eq!(field[(t, i, j)], (100 * t + 10 * i + j) as f64);
                }
            }
        }
    }

    #[test]
    fn test_series_is_contiguous() {
        let field = sample_3x2x2();
        let cell = field.cell_index(1, 0);
        assert_eq!(cell, 2);
        assert_eq!(field.series(cell), &[10.0, 110.0, 210.0]);
    }

    #[test]
    fn test_series_mut() {
        let mut field = sample_3x2x2();
        field.series_mut(3)[2] = -1.0;
        assert_eq!(field[(2, 1, 1)], -1.0);
    }

    #[test]
    fn test_from_column_major_invalid() {
        let err = GridField::from_column_major(vec![1.0, 2.0], 2, 2, 2).unwrap_err();
        assert_eq!(err, AnomalyError::shape_mismatch("field data", 8, 2));
    }

    #[test]
    fn test_from_step_major_invalid() {
        assert!(GridField::from_step_major(&[1.0; 5], 2, 1, 2).is_err());
    }

    #[test]
    fn test_step_major_roundtrip() {
        let field = sample_3x2x2();
        let flat = field.to_step_major();
        assert_eq!(&flat[0..4], &[0.0, 1.0, 10.0, 11.0]);
        let back = GridField::from_step_major(&flat, 3, 2, 2).unwrap();
        assert_eq!(field, back);
    }

    #[test]
    fn test_step_slice() {
        let field = sample_3x2x2();
        assert_eq!(field.step_slice(2), vec![200.0, 201.0, 210.0, 211.0]);
    }

    #[test]
    fn test_get_set_bounds_check() {
        let mut field = sample_3x2x2();
        assert_eq!(field.get(2, 1, 1), Some(211.0));
        assert_eq!(field.get(3, 0, 0), None);
        assert_eq!(field.get(0, 2, 0), None);
        assert_eq!(field.get(0, 0, 2), None);
        assert!(field.set(0, 1, 1, 5.0));
        assert_eq!(field[(0, 1, 1)], 5.0);
        assert!(!field.set(0, 0, 9, 5.0));
    }

    #[test]
    fn test_nalgebra_roundtrip() {
        let field = sample_3x2x2();
        let mat = field.to_dmatrix();
        assert_eq!(mat.shape(), (3, 4));
        assert_eq!(mat[(1, 2)], 110.0);
        let back = GridField::from_dmatrix(&mat, 2, 2).unwrap();
        assert_eq!(field, back);
        assert!(GridField::from_dmatrix(&mat, 3, 2).is_err());
    }

    #[test]
    fn test_zeros_and_empty() {
        let field = GridField::zeros(2, 3, 4).unwrap();
        assert!(field.as_slice().iter().all(|&v| v == 0.0));
        assert!(!field.is_empty());
        assert!(GridField::zeros(0, 3, 4).unwrap().is_empty());
    }

    #[test]
    fn test_overflowing_dimensions_rejected() {
        let huge = usize::MAX / 2 + 1;
        // 2 * huge wraps to 0 and would match an empty buffer
        let err = GridField::from_column_major(Vec::new(), 2, huge, 1).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(GridField::from_step_major(&[], huge, 2, 1).is_err());
        assert!(GridField::zeros(huge, 1, 2).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", sample_3x2x2()), "GridField(3x2x2)");
    }

    #[test]
    fn test_into_vec() {
        let field = GridField::from_column_major(vec![1.0, 2.0], 2, 1, 1).unwrap();
        assert_eq!(field.into_vec(), vec![1.0, 2.0]);
    }
}

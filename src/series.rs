//! Labeled gridded arrays: raw time series and hour-of-year climatologies.

use crate::coords::{GridCoords, HourOfYear};
use crate::error::{AnomalyError, Result};
use crate::grid::GridField;
use chrono::NaiveDateTime;

/// Gridded time series `(time, lat, lon)` with its timestamps and coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct GriddedSeries {
    values: GridField,
    time: Vec<NaiveDateTime>,
    coords: GridCoords,
}

impl GriddedSeries {
    /// Pair values with timestamps and coordinates.
    ///
    /// Fails if the timestamp or coordinate lengths disagree with the field
    /// shape, or if timestamps are not strictly increasing.
    pub fn new(values: GridField, time: Vec<NaiveDateTime>, coords: GridCoords) -> Result<Self> {
        if time.len() != values.nsteps() {
            return Err(AnomalyError::shape_mismatch("time", values.nsteps(), time.len()));
        }
        coords.check_shape(values.nlat(), values.nlon())?;
        if let Some(w) = time.windows(2).find(|w| w[1] <= w[0]) {
            return Err(AnomalyError::invalid_argument(format!(
                "timestamps must be strictly increasing, found {} after {}",
                w[1], w[0]
            )));
        }
        Ok(Self {
            values,
            time,
            coords,
        })
    }

    pub fn values(&self) -> &GridField {
        &self.values
    }

    pub fn time(&self) -> &[NaiveDateTime] {
        &self.time
    }

    pub fn coords(&self) -> &GridCoords {
        &self.coords
    }

    /// Shape as `(ntime, nlat, nlon)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.values.shape()
    }

    /// Same timestamps and coordinates with new values of identical shape.
    pub(crate) fn with_values(&self, values: GridField) -> Result<Self> {
        if values.shape() != self.values.shape() {
            return Err(AnomalyError::shape_mismatch(
                "time",
                self.values.nsteps(),
                values.nsteps(),
            ));
        }
        Ok(Self {
            values,
            time: self.time.clone(),
            coords: self.coords.clone(),
        })
    }

    /// Split into values, timestamps and coordinates.
    pub fn into_parts(self) -> (GridField, Vec<NaiveDateTime>, GridCoords) {
        (self.values, self.time, self.coords)
    }
}

/// Hour-of-year climatology `(hour-of-year, lat, lon)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Climatology {
    values: GridField,
    hours: Vec<HourOfYear>,
    coords: GridCoords,
}

impl Climatology {
    /// Pair values with bucket labels and coordinates.
    ///
    /// Labels must be strictly increasing (calendar order, no duplicates).
    pub fn new(values: GridField, hours: Vec<HourOfYear>, coords: GridCoords) -> Result<Self> {
        if hours.len() != values.nsteps() {
            return Err(AnomalyError::shape_mismatch(
                "hour-of-year",
                values.nsteps(),
                hours.len(),
            ));
        }
        coords.check_shape(values.nlat(), values.nlon())?;
        if let Some(w) = hours.windows(2).find(|w| w[1] <= w[0]) {
            return Err(AnomalyError::invalid_argument(format!(
                "hour-of-year labels must be strictly increasing, found {} after {}",
                w[1], w[0]
            )));
        }
        Ok(Self {
            values,
            hours,
            coords,
        })
    }

    pub fn values(&self) -> &GridField {
        &self.values
    }

    pub fn hours(&self) -> &[HourOfYear] {
        &self.hours
    }

    pub fn coords(&self) -> &GridCoords {
        &self.coords
    }

    /// Number of hour-of-year buckets.
    pub fn n_hours(&self) -> usize {
        self.hours.len()
    }

    /// Shape as `(nhours, nlat, nlon)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        self.values.shape()
    }

    /// Row index of a label, if present.
    pub fn position(&self, label: &HourOfYear) -> Option<usize> {
        self.hours.binary_search(label).ok()
    }

    /// Same labels and coordinates with new values of identical shape.
    pub(crate) fn with_values(&self, values: GridField) -> Result<Self> {
        if values.shape() != self.values.shape() {
            let (h, _, _) = self.values.shape();
            return Err(AnomalyError::shape_mismatch("hour-of-year", h, values.nsteps()));
        }
        Ok(Self {
            values,
            hours: self.hours.clone(),
            coords: self.coords.clone(),
        })
    }

    pub fn into_parts(self) -> (GridField, Vec<HourOfYear>, GridCoords) {
        (self.values, self.hours, self.coords)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn hourly(n: usize) -> Vec<NaiveDateTime> {
        let start = NaiveDate::from_ymd_opt(2001, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|k| start + chrono::Duration::hours(k as i64))
            .collect()
    }

    #[test]
    fn test_series_new_valid() {
        let values = GridField::zeros(4, 2, 3).unwrap();
        let series = GriddedSeries::new(values, hourly(4), GridCoords::indices(2, 3)).unwrap();
        assert_eq!(series.shape(), (4, 2, 3));
        assert_eq!(series.time().len(), 4);
    }

    #[test]
    fn test_series_time_length_mismatch() {
        let values = GridField::zeros(4, 1, 1).unwrap();
        let err = GriddedSeries::new(values, hourly(3), GridCoords::indices(1, 1)).unwrap_err();
        assert_eq!(err, AnomalyError::shape_mismatch("time", 4, 3));
    }

    #[test]
    fn test_series_coords_mismatch() {
        let values = GridField::zeros(2, 2, 2).unwrap();
        let err = GriddedSeries::new(values, hourly(2), GridCoords::indices(2, 3)).unwrap_err();
        assert_eq!(err, AnomalyError::shape_mismatch("lon", 2, 3));
    }

    #[test]
    fn test_series_rejects_unordered_time() {
        let mut time = hourly(3);
        time.swap(1, 2);
        let values = GridField::zeros(3, 1, 1).unwrap();
        let err = GriddedSeries::new(values, time, GridCoords::indices(1, 1)).unwrap_err();
        assert!(matches!(err, AnomalyError::InvalidArgument { .. }));
    }

    #[test]
    fn test_climatology_rejects_duplicate_labels() {
        let hours = vec![
            HourOfYear::new(1, 1, 0).unwrap(),
            HourOfYear::new(1, 1, 0).unwrap(),
        ];
        let field = GridField::zeros(2, 1, 1).unwrap();
        let err = Climatology::new(field, hours, GridCoords::indices(1, 1)).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_climatology_position() {
        let hours = vec![
            HourOfYear::new(1, 1, 0).unwrap(),
            HourOfYear::new(1, 1, 12).unwrap(),
            HourOfYear::new(7, 4, 0).unwrap(),
        ];
        let clim =
            Climatology::new(GridField::zeros(3, 1, 1).unwrap(), hours, GridCoords::indices(1, 1)).unwrap();
        assert_eq!(clim.position(&HourOfYear::new(7, 4, 0).unwrap()), Some(2));
        assert_eq!(clim.position(&HourOfYear::new(7, 4, 1).unwrap()), None);
        assert_eq!(clim.n_hours(), 3);
    }

    #[test]
    fn test_with_values_checks_shape() {
        let hours = vec![
            HourOfYear::new(1, 1, 0).unwrap(),
            HourOfYear::new(1, 1, 1).unwrap(),
        ];
        let clim =
            Climatology::new(GridField::zeros(2, 1, 1).unwrap(), hours, GridCoords::indices(1, 1)).unwrap();
        assert!(clim.with_values(GridField::zeros(2, 1, 1).unwrap()).is_ok());
        assert!(clim.with_values(GridField::zeros(3, 1, 1).unwrap()).is_err());
    }
}

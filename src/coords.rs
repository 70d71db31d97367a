//! Coordinate labels and hour-of-year buckets.

use crate::error::{AnomalyError, Result};
use chrono::{Datelike, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Latitude and longitude labels of a grid.
///
/// These are carried through every operation unchanged so downstream
/// consumers can georeference the output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridCoords {
    /// Latitude labels, one per grid row
    pub lat: Vec<f64>,
    /// Longitude labels, one per grid column
    pub lon: Vec<f64>,
}

impl GridCoords {
    pub fn new(lat: Vec<f64>, lon: Vec<f64>) -> Self {
        Self { lat, lon }
    }

    /// Index coordinates `0, 1, ...` for a grid without physical labels.
    pub fn indices(nlat: usize, nlon: usize) -> Self {
        Self {
            lat: (0..nlat).map(|i| i as f64).collect(),
            lon: (0..nlon).map(|j| j as f64).collect(),
        }
    }

    /// Check the coordinate lengths against a grid shape.
    pub fn check_shape(&self, nlat: usize, nlon: usize) -> Result<()> {
        if self.lat.len() != nlat {
            return Err(AnomalyError::shape_mismatch("lat", nlat, self.lat.len()));
        }
        if self.lon.len() != nlon {
            return Err(AnomalyError::shape_mismatch("lon", nlon, self.lon.len()));
        }
        Ok(())
    }
}

/// Calendar label of a sample with the year dropped.
///
/// Samples from different years that share month, day and hour fall into the
/// same bucket. Ordering is calendar order, which matches the lexical order of
/// the `MM-DD HH` rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HourOfYear {
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl HourOfYear {
    /// Create a label, validating field ranges.
    pub fn new(month: u32, day: u32, hour: u32) -> Result<Self> {
        if !(1..=12).contains(&month) || !(1..=31).contains(&day) || hour > 23 {
            return Err(AnomalyError::invalid_argument(format!(
                "invalid hour-of-year label month={} day={} hour={}",
                month, day, hour
            )));
        }
        Ok(Self { month, day, hour })
    }

    /// Derive the label from any chrono date-time by truncating to hour.
    pub fn from_datetime<T: Datelike + Timelike>(t: &T) -> Self {
        Self {
            month: t.month(),
            day: t.day(),
            hour: t.hour(),
        }
    }
}

impl fmt::Display for HourOfYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}-{:02} {:02}", self.month, self.day, self.hour)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_label_drops_year_and_minutes() {
        let a = HourOfYear::from_datetime(&at(1999, 3, 7, 18, 0));
        let b = HourOfYear::from_datetime(&at(2021, 3, 7, 18, 45));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "03-07 18");
    }

    #[test]
    fn test_calendar_ordering_matches_lexical() {
        let mut labels = vec![
            HourOfYear::new(12, 31, 23).unwrap(),
            HourOfYear::new(1, 1, 6).unwrap(),
            HourOfYear::new(2, 29, 0).unwrap(),
            HourOfYear::new(1, 1, 0).unwrap(),
            HourOfYear::new(1, 10, 0).unwrap(),
        ];
        labels.sort();
        let rendered: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
        let mut lexical = rendered.clone();
        lexical.sort();
        assert_eq!(rendered, lexical);
        assert_eq!(rendered[0], "01-01 00");
        assert_eq!(rendered[4], "12-31 23");
    }

    #[test]
    fn test_new_rejects_out_of_range() {
        assert!(HourOfYear::new(0, 1, 0).is_err());
        assert!(HourOfYear::new(13, 1, 0).is_err());
        assert!(HourOfYear::new(1, 0, 0).is_err());
        assert!(HourOfYear::new(1, 32, 0).is_err());
        assert!(HourOfYear::new(1, 1, 24).is_err());
        assert!(HourOfYear::new(2, 29, 23).is_ok());
    }

    #[test]
    fn test_coords_check_shape() {
        let coords = GridCoords::new(vec![-10.0, 0.0, 10.0], vec![100.0, 120.0]);
        assert!(coords.check_shape(3, 2).is_ok());
        assert_eq!(
            coords.check_shape(2, 2).unwrap_err(),
            AnomalyError::shape_mismatch("lat", 2, 3)
        );
        assert_eq!(
            coords.check_shape(3, 1).unwrap_err(),
            AnomalyError::shape_mismatch("lon", 1, 2)
        );
    }

    #[test]
    fn test_indices() {
        let coords = GridCoords::indices(2, 3);
        assert_eq!(coords.lat, vec![0.0, 1.0]);
        assert_eq!(coords.lon, vec![0.0, 1.0, 2.0]);
    }
}

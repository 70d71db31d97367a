//! # climanom-core
//!
//! Climatological anomalies for gridded sub-daily time series.
//!
//! Raw observations indexed by `(time, lat, lon)` are grouped into
//! hour-of-year buckets (month, day and hour, year dropped), averaged into a
//! climatology, smoothed by keeping only the leading Fourier harmonics of the
//! annual cycle, and subtracted from the raw samples:
//!
//! ```
//! use chrono::NaiveDate;
//! use climanom_core::{compute_anomaly, GridCoords, GridField, GriddedSeries};
//!
//! let start = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let time: Vec<_> = (0..8).map(|k| start + chrono::Duration::hours(6 * k)).collect();
//! let data = vec![1.0, 3.0, 2.0, 0.0, 1.5, 2.5, 2.0, 0.5];
//! let values = GridField::from_column_major(data, 8, 1, 1)?;
//! let series = GriddedSeries::new(values, time, GridCoords::indices(1, 1))?;
//!
//! let anomaly = compute_anomaly(&series, 1)?;
//! assert_eq!(anomaly.shape(), (8, 1, 1));
//! # Ok::<(), climanom_core::AnomalyError>(())
//! ```
//!
//! ## Data Layout
//!
//! Fields are stored in flat vectors with each grid cell's series contiguous:
//! for `T` steps, element `(t, i, j)` is at `data[t + (i * nlon + j) * T]`.
//! See [`grid::GridField`].

#![allow(clippy::needless_range_loop)]

pub mod parallel;

pub mod anomaly;
pub mod climatology;
pub mod coords;
pub mod error;
pub mod grid;
pub mod harmonic;
pub mod params;
pub mod series;
pub mod simulation;

pub use anomaly::{
    compute_anomaly, compute_anomaly_with, decompose_anomaly, subtract_climatology,
    AnomalyDecomposition,
};
pub use climatology::{bucket_index, hour_of_year_climatology, BucketIndex};
pub use coords::{GridCoords, HourOfYear};
pub use error::{AnomalyError, Result};
pub use grid::GridField;
pub use harmonic::{harmonic_amplitudes, max_harmonic, smooth_climatology, HarmonicSmoother};
pub use params::AnomalyParams;
pub use series::{Climatology, GriddedSeries};
pub use simulation::{simulate_hourly_grid, SimulationSpec};

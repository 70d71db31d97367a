//! Anomalies relative to a smoothed hour-of-year climatology.
//!
//! ```text
//! anomaly(t, lat, lon) = x(t, lat, lon) - smooth(clim)(bucket(t), lat, lon)
//! ```
//!
//! where `clim` is the per-bucket mean of the raw series and `smooth` keeps
//! harmonics `0..=nHarm` (see [`crate::harmonic`]).

use crate::climatology::{bucket_index, climatology_from_index};
use crate::coords::HourOfYear;
use crate::error::{AnomalyError, Result};
use crate::grid::GridField;
use crate::harmonic::smooth_climatology;
use crate::maybe_par_chunks_mut_enumerate;
use crate::params::AnomalyParams;
use crate::series::{Climatology, GriddedSeries};
use tracing::{debug, instrument};

/// Anomaly together with the climatologies it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyDecomposition {
    /// Raw series minus smoothed climatology, `(time, lat, lon)`
    pub anomaly: GriddedSeries,
    /// Per-bucket mean of the raw series, `(hour-of-year, lat, lon)`
    pub climatology: Climatology,
    /// Harmonically smoothed climatology, same shape as `climatology`
    pub smoothed: Climatology,
    /// Highest retained harmonic
    pub harmonics: usize,
}

/// Compute anomalies of `series` against its own smoothed climatology.
///
/// Output has the shape, timestamps and coordinates of the input.
///
/// # Errors
/// Invalid-argument errors if the time axis is empty, if fewer than two
/// distinct hour-of-year buckets exist, or if `harmonics` is out of range for
/// the bucket count.
pub fn compute_anomaly(series: &GriddedSeries, harmonics: usize) -> Result<GriddedSeries> {
    decompose_anomaly(series, harmonics).map(|d| d.anomaly)
}

/// [`compute_anomaly`] with the cutoff taken from `params`.
pub fn compute_anomaly_with(
    series: &GriddedSeries,
    params: &AnomalyParams,
) -> Result<GriddedSeries> {
    compute_anomaly(series, params.harmonics)
}

/// Compute anomalies and return the intermediate climatologies as well.
#[instrument(skip(series), fields(shape = ?series.shape()))]
pub fn decompose_anomaly(series: &GriddedSeries, harmonics: usize) -> Result<AnomalyDecomposition> {
    if series.time().is_empty() {
        return Err(AnomalyError::EmptyInput { what: "time" });
    }

    // single bucket or cutoff above H/2
    let index = bucket_index(series.time());
    AnomalyParams::new(harmonics).validate(index.n_buckets())?;

    let climatology = climatology_from_index(series, &index)?;
    let smoothed = smooth_climatology(&climatology, harmonics)?;
    let anomaly = subtract_rows(series, smoothed.values(), &index.sample_bucket)?;
    debug!(buckets = index.n_buckets(), "anomaly computed");

    Ok(AnomalyDecomposition {
        anomaly,
        climatology,
        smoothed,
        harmonics,
    })
}

/// Subtract a given climatology from every sample at its hour-of-year bucket.
///
/// The climatology may come from a different period than `series` (for
/// instance a fixed reference period), as long as it covers every bucket the
/// series touches.
///
/// # Errors
/// - [`AnomalyError::ShapeMismatch`] if the lat/lon shapes differ
/// - [`AnomalyError::MissingBucket`] if a sample's label is not in `climatology`
pub fn subtract_climatology(
    series: &GriddedSeries,
    climatology: &Climatology,
) -> Result<GriddedSeries> {
    let (_, nlat, nlon) = series.shape();
    let (_, clat, clon) = climatology.shape();
    if clat != nlat {
        return Err(AnomalyError::shape_mismatch("lat", nlat, clat));
    }
    if clon != nlon {
        return Err(AnomalyError::shape_mismatch("lon", nlon, clon));
    }

    let rows = series
        .time()
        .iter()
        .map(|t| {
            let label = HourOfYear::from_datetime(t);
            climatology
                .position(&label)
                .ok_or_else(|| AnomalyError::MissingBucket {
                    label: label.to_string(),
                })
        })
        .collect::<Result<Vec<usize>>>()?;

    subtract_rows(series, climatology.values(), &rows)
}

fn subtract_rows(
    series: &GriddedSeries,
    clim: &GridField,
    rows: &[usize],
) -> Result<GriddedSeries> {
    let values = series.values();
    let (ntime, nlat, nlon) = values.shape();
    let (_, clat, clon) = clim.shape();
    if (clat, clon) != (nlat, nlon) {
        return Err(AnomalyError::shape_mismatch("grid cells", values.ncells(), clim.ncells()));
    }
    if ntime == 0 {
        return series.with_values(GridField::zeros(0, nlat, nlon)?);
    }

    let mut out = GridField::zeros(ntime, nlat, nlon)?;
    maybe_par_chunks_mut_enumerate!(out.as_mut_slice(), ntime, |(cell, chunk)| {
        let raw = values.series(cell);
        let reference = clim.series(cell);
        for ((o, &x), &row) in chunk.iter_mut().zip(raw).zip(rows) {
            *o = x - reference[row];
        }
    });
    series.with_values(out)
}

//! Hour-of-year grouping and climatological means.

use crate::coords::HourOfYear;
use crate::error::{AnomalyError, Result};
use crate::grid::GridField;
use crate::maybe_par_chunks_mut_enumerate;
use crate::series::{Climatology, GriddedSeries};
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// Mapping from sample index to hour-of-year bucket.
///
/// Derived from the timestamps alone; the caller's series is never touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketIndex {
    /// Distinct labels in calendar order
    pub hours: Vec<HourOfYear>,
    /// `sample_bucket[t]` is the row in `hours` for sample `t`
    pub sample_bucket: Vec<usize>,
}

impl BucketIndex {
    /// Number of distinct buckets.
    pub fn n_buckets(&self) -> usize {
        self.hours.len()
    }

    /// Number of samples in each bucket.
    pub fn counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.hours.len()];
        for &b in &self.sample_bucket {
            counts[b] += 1;
        }
        counts
    }
}

/// Label every timestamp with its hour-of-year bucket.
pub fn bucket_index(time: &[NaiveDateTime]) -> BucketIndex {
    let labels: Vec<HourOfYear> = time.iter().map(HourOfYear::from_datetime).collect();

    let mut rows: BTreeMap<HourOfYear, usize> = labels.iter().map(|&l| (l, 0)).collect();
    for (row, slot) in rows.values_mut().enumerate() {
        *slot = row;
    }

    let sample_bucket = labels.iter().map(|l| rows[l]).collect();
    BucketIndex {
        hours: rows.into_keys().collect(),
        sample_bucket,
    }
}

/// Mean over time of every hour-of-year bucket, per grid cell.
///
/// NaN samples are skipped; a bucket whose samples are all NaN for a cell
/// yields NaN there.
///
/// # Errors
/// [`AnomalyError::EmptyInput`] if the series has no time steps.
#[instrument(skip(series), fields(shape = ?series.shape()))]
pub fn hour_of_year_climatology(series: &GriddedSeries) -> Result<Climatology> {
    if series.time().is_empty() {
        return Err(AnomalyError::EmptyInput { what: "time" });
    }
    let index = bucket_index(series.time());
    climatology_from_index(series, &index)
}

pub(crate) fn climatology_from_index(
    series: &GriddedSeries,
    index: &BucketIndex,
) -> Result<Climatology> {
    let values = series.values();
    let (_, nlat, nlon) = values.shape();
    let nb = index.n_buckets();
    debug!(buckets = nb, "grouping samples by hour of year");

    let mut out = GridField::zeros(nb, nlat, nlon)?;
    maybe_par_chunks_mut_enumerate!(out.as_mut_slice(), nb, |(cell, chunk)| {
        bucket_means(values.series(cell), &index.sample_bucket, chunk);
    });

    Climatology::new(out, index.hours.clone(), series.coords().clone())
}

fn bucket_means(samples: &[f64], sample_bucket: &[usize], out: &mut [f64]) {
    let mut counts = vec![0usize; out.len()];
    out.iter_mut().for_each(|v| *v = 0.0);
    for (&x, &b) in samples.iter().zip(sample_bucket) {
        if !x.is_nan() {
            out[b] += x;
            counts[b] += 1;
        }
    }
    for (v, &c) in out.iter_mut().zip(&counts) {
        *v = if c > 0 { *v / c as f64 } else { f64::NAN };
    }
}

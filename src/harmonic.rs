//! Harmonic smoothing of hour-of-year climatologies.
//!
//! Each grid cell's climatology is transformed with a real-input DFT along the
//! hour-of-year axis, truncated above the cutoff harmonic, tapered at the
//! cutoff and transformed back:
//!
//! ```text
//! c_k = Σ_t x_t exp(-2πi k t / H)                 k = 0..=H/2
//! c_k ← 0          for k > nHarm
//! c_nHarm ← c_nHarm / 2                           (mini-taper)
//! y_t = (1/n) Σ_k ĉ_k exp(2πi k t / n)            n = 2 * (H/2)
//! ```
//!
//! where `ĉ` is the Hermitian extension of the retained half spectrum. For odd
//! `H` the half-spectrum inverse yields `H - 1` samples and a zero slice is
//! appended to restore the length. That final slice is shape padding only, not
//! a reconstructed value.

use crate::error::{AnomalyError, Result};
use crate::grid::GridField;
use crate::maybe_par_chunks_mut_enumerate;
use crate::series::Climatology;
use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Largest valid harmonic cutoff for an hour-of-year axis of length `n_hours`.
#[inline]
pub fn max_harmonic(n_hours: usize) -> usize {
    n_hours / 2
}

/// Reusable harmonic smoother for a fixed hour-of-year length and cutoff.
///
/// The forward and inverse transform plans are built once here and shared by
/// every grid cell (and across threads with the `parallel` feature).
#[derive(Clone)]
pub struct HarmonicSmoother {
    n_hours: usize,
    harmonics: usize,
    n_out: usize,
    forward: Arc<dyn Fft<f64>>,
    inverse: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for HarmonicSmoother {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HarmonicSmoother")
            .field("n_hours", &self.n_hours)
            .field("harmonics", &self.harmonics)
            .field("n_out", &self.n_out)
            .finish()
    }
}

impl HarmonicSmoother {
    /// Plan a smoother for `n_hours` buckets keeping harmonics `0..=harmonics`.
    ///
    /// # Errors
    /// - [`AnomalyError::InsufficientBuckets`] if `n_hours < 2`
    /// - [`AnomalyError::HarmonicOutOfRange`] if `harmonics > n_hours / 2`
    pub fn new(n_hours: usize, harmonics: usize) -> Result<Self> {
        if n_hours < 2 {
            return Err(AnomalyError::InsufficientBuckets {
                required: 2,
                actual: n_hours,
            });
        }
        let max = max_harmonic(n_hours);
        if harmonics > max {
            return Err(AnomalyError::HarmonicOutOfRange { harmonics, max });
        }

        let n_out = 2 * max;
        let mut planner = FftPlanner::<f64>::new();
        let forward = planner.plan_fft_forward(n_hours);
        let inverse = planner.plan_fft_inverse(n_out);

        Ok(Self {
            n_hours,
            harmonics,
            n_out,
            forward,
            inverse,
        })
    }

    /// Hour-of-year length this smoother was planned for.
    pub fn n_hours(&self) -> usize {
        self.n_hours
    }

    /// Highest retained harmonic.
    pub fn harmonics(&self) -> usize {
        self.harmonics
    }

    /// Whether outputs end with a zero-padded slice (odd `n_hours`).
    pub fn pads_output(&self) -> bool {
        self.n_out < self.n_hours
    }

    /// Smooth a single cell's climatology.
    pub fn smooth_series(&self, values: &[f64]) -> Result<Vec<f64>> {
        if values.len() != self.n_hours {
            return Err(AnomalyError::shape_mismatch(
                "hour-of-year",
                self.n_hours,
                values.len(),
            ));
        }
        let mut out = vec![0.0; self.n_hours];
        self.smooth_into(values, &mut out);
        Ok(out)
    }

    /// Smooth every cell of an unlabeled `(hour-of-year, lat, lon)` field.
    pub fn smooth_field(&self, field: &GridField) -> Result<GridField> {
        let (nsteps, nlat, nlon) = field.shape();
        if nsteps != self.n_hours {
            return Err(AnomalyError::shape_mismatch("hour-of-year", self.n_hours, nsteps));
        }
        if self.pads_output() {
            warn!(
                n_hours = self.n_hours,
                "odd hour-of-year length: final slice of smoothed climatology is zero-padded"
            );
        }

        let mut out = GridField::zeros(nsteps, nlat, nlon)?;
        maybe_par_chunks_mut_enumerate!(out.as_mut_slice(), nsteps, |(cell, chunk)| {
            self.smooth_into(field.series(cell), chunk);
        });
        Ok(out)
    }

    /// Smooth a labeled climatology; labels and coordinates are carried over.
    pub fn smooth(&self, climatology: &Climatology) -> Result<Climatology> {
        let smoothed = self.smooth_field(climatology.values())?;
        climatology.with_values(smoothed)
    }

    fn smooth_into(&self, values: &[f64], out: &mut [f64]) {
        let mut spectrum: Vec<Complex<f64>> =
            values.iter().map(|&x| Complex::new(x, 0.0)).collect();
        self.forward.process(&mut spectrum);

        let n_coef = max_harmonic(self.n_hours) + 1;
        spectrum.truncate(n_coef);
        spectrum[self.harmonics] *= 0.5;
        for c in spectrum[self.harmonics + 1..].iter_mut() {
            *c = Complex::new(0.0, 0.0);
        }

        // Hermitian extension; DC and the last bin are taken as purely real.
        let n = self.n_out;
        let nyquist = n / 2;
        let mut buffer = vec![Complex::new(0.0, 0.0); n];
        buffer[0] = Complex::new(spectrum[0].re, 0.0);
        for k in 1..nyquist {
            buffer[k] = spectrum[k];
            buffer[n - k] = spectrum[k].conj();
        }
        buffer[nyquist] = Complex::new(spectrum[nyquist].re, 0.0);

        self.inverse.process(&mut buffer);

        let scale = 1.0 / n as f64;
        for (o, c) in out.iter_mut().zip(buffer.iter()) {
            *o = c.re * scale;
        }
        for o in out[n..].iter_mut() {
            *o = 0.0;
        }
    }
}

/// Smooth an hour-of-year climatology keeping harmonics `0..=harmonics`.
///
/// Output has the same shape, hour-of-year labels and coordinates as the
/// input.
///
/// # Errors
/// Fails with an invalid-argument error if the climatology has fewer than two
/// buckets or if `harmonics > n_hours / 2`.
#[instrument(skip(climatology), fields(shape = ?climatology.shape()))]
pub fn smooth_climatology(climatology: &Climatology, harmonics: usize) -> Result<Climatology> {
    let smoother = HarmonicSmoother::new(climatology.n_hours(), harmonics)?;
    debug!(pads = smoother.pads_output(), "planned harmonic smoother");
    smoother.smooth(climatology)
}

/// One-sided amplitude spectrum of a single cell's climatology.
///
/// Entry `k` is the amplitude of harmonic `k`: the mean for `k = 0`, and the
/// peak amplitude of the `k`-cycle sinusoid otherwise.
pub fn harmonic_amplitudes(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(n);
    let mut buffer: Vec<Complex<f64>> = values.iter().map(|&x| Complex::new(x, 0.0)).collect();
    fft.process(&mut buffer);

    (0..=n / 2)
        .map(|k| {
            let a = buffer[k].norm() / n as f64;
            let has_pair = k > 0 && !(n % 2 == 0 && k == n / 2);
            if has_pair {
                2.0 * a
            } else {
                a
            }
        })
        .collect()
}

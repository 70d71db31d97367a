//! Optional data parallelism over grid cells.
//!
//! Every per-cell kernel in this crate writes into one contiguous chunk of a
//! [`GridField`](crate::grid::GridField) buffer (one chunk per cell along the
//! step axis). With the `parallel` feature the chunks are processed on the
//! rayon thread pool; without it the same closure runs sequentially.

/// Enumerated parallel/sequential iteration over mutable chunks.
///
/// # Example
/// ```ignore
/// use crate::maybe_par_chunks_mut_enumerate;
///
/// maybe_par_chunks_mut_enumerate!(out.as_mut_slice(), nsteps, |(cell, chunk)| {
///     // fill chunk with the result for grid cell `cell`
/// });
/// ```
#[macro_export]
macro_rules! maybe_par_chunks_mut_enumerate {
    ($slice:expr, $chunk_size:expr, $closure:expr) => {{
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            $slice
                .par_chunks_mut($chunk_size)
                .enumerate()
                .for_each($closure);
        }
        #[cfg(not(feature = "parallel"))]
        {
            $slice
                .chunks_mut($chunk_size)
                .enumerate()
                .for_each($closure);
        }
    }};
}

pub use maybe_par_chunks_mut_enumerate;

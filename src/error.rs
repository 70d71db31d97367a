//! Error types for climatology and anomaly operations.

use thiserror::Error;

/// Errors raised by smoothing and anomaly operations.
///
/// Every variant except [`AnomalyError::Config`] is a caller input error of
/// the invalid-argument kind: computation is deterministic, so nothing is
/// retried and no partial result is produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnomalyError {
    /// Generic invalid argument.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of what's wrong with the argument
        message: String,
    },

    /// An array or coordinate length does not match the expected one.
    #[error("Shape mismatch for {what}: expected {expected}, actual {actual}")]
    ShapeMismatch {
        /// Which dimension or coordinate was checked
        what: &'static str,
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Harmonic cutoff outside `0..=max`.
    #[error("Harmonic cutoff {harmonics} out of range: must be at most {max}")]
    HarmonicOutOfRange {
        /// Requested cutoff
        harmonics: usize,
        /// Largest valid cutoff for the hour-of-year axis
        max: usize,
    },

    /// Too few distinct hour-of-year buckets to smooth along.
    #[error("Insufficient hour-of-year buckets: required {required}, actual {actual}")]
    InsufficientBuckets {
        /// Minimum number of buckets
        required: usize,
        /// Number of buckets found
        actual: usize,
    },

    /// An axis that must be non-empty is empty.
    #[error("Empty input: {what}")]
    EmptyInput {
        /// Which axis was empty
        what: &'static str,
    },

    /// A sample's hour-of-year label has no row in the climatology.
    #[error("Hour-of-year bucket {label} not present in climatology")]
    MissingBucket {
        /// Rendered `MM-DD HH` label
        label: String,
    },

    /// Parameter parsing failed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AnomalyError {
    /// Create an InvalidArgument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a ShapeMismatch error.
    pub fn shape_mismatch(what: &'static str, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what,
            expected,
            actual,
        }
    }

    /// Whether this error is a caller input error.
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, Self::Config(_))
    }
}

impl From<toml::de::Error> for AnomalyError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, AnomalyError>;

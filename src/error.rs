//! Error type used by the crate.

use thiserror::Error;

/// Errors reported before a reduction run starts.
///
/// Every variant describes invalid input. Nothing is computed and no partial
/// result is produced when one of them is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReduceError {
    /// The track has fewer than two points.
    #[error("invalid input: track has {count} point(s), at least 2 are required")]
    TooFewPoints { count: usize },

    /// The requested number of points is below two.
    #[error("invalid input: target of {target} point(s) is below the minimum of 2")]
    TargetTooSmall { target: usize },

    /// A point has a non-finite or out-of-range coordinate.
    #[error("invalid input: point {index} has an invalid coordinate")]
    InvalidCoordinate { index: usize },

    /// The space-time projection needs a timestamp on every point.
    #[error("invalid input: point {index} has no timestamp")]
    MissingTimestamp { index: usize },

    /// The average speed used to scale time is not usable.
    #[error("invalid input: average speed {speed} m/s must be finite and non-negative")]
    InvalidAverageSpeed { speed: f64 },
}

impl ReduceError {
    /// All current variants are input validation failures.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            ReduceError::TooFewPoints { .. }
                | ReduceError::TargetTooSmall { .. }
                | ReduceError::InvalidCoordinate { .. }
                | ReduceError::MissingTimestamp { .. }
                | ReduceError::InvalidAverageSpeed { .. }
        )
    }
}

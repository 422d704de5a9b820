//! # Track Reducer
//!
//! Shrinks GPS tracks to a fixed number of points while keeping their shape.
//!
//! This library provides:
//! - Douglas-Peucker N: Douglas-Peucker stopped at a point budget, driven by a
//!   pairing-heap priority queue
//! - Planar (Mercator), space-time and ellipsoidal (ECEF) projections
//! - Keep/discard flags aligned with the input, so callers can filter their own
//!   point records
//!
//! ## Features
//!
//! - **`parallel`** - Project tracks and reduce batches of segments with rayon
//! - **`serde`** - Serialize/deserialize points and configuration
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use track_reducer::{reduce, ReduceConfig, TrackPoint};
//!
//! let track = vec![
//!     TrackPoint::new(51.5074, -0.1278),
//!     TrackPoint::new(51.5080, -0.1290),
//!     TrackPoint::new(51.5090, -0.1300),
//!     TrackPoint::new(51.5100, -0.1310),
//!     TrackPoint::new(51.5110, -0.1320),
//! ];
//!
//! let config = ReduceConfig { target_points: 3, ..ReduceConfig::default() };
//! let reduction = reduce(&track, &config).unwrap();
//!
//! assert_eq!(reduction.kept_count(), 3);
//! assert!(!reduction.flags()[0] && !reduction.flags()[4]);
//! let reduced = reduction.apply(&track);
//! assert_eq!(reduced.len(), 3);
//! ```

use std::time::Instant;

use chrono::{DateTime, Utc};
use log::{debug, info};

pub mod engine;
pub mod error;
pub mod geo_utils;
pub mod heap;
pub mod projection;
pub mod segment;

pub use engine::{Interval, ReductionEngine};
pub use error::ReduceError;
pub use heap::PairingHeap;
pub use projection::{Cartesian, Ellipsoidal, Planar, Projector, SpaceTime};
pub use segment::{segment_distance, Metric};

// ============================================================================
// Core Types
// ============================================================================

/// A recorded track sample.
///
/// # Example
/// ```
/// use track_reducer::TrackPoint;
/// let point = TrackPoint::new(51.5074, -0.1278).with_elevation(11.0);
/// assert!(point.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Meters above the ellipsoid
    #[cfg_attr(feature = "serde", serde(default))]
    pub elevation: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub time: Option<DateTime<Utc>>,
}

impl TrackPoint {
    /// Create a point without elevation or time.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            elevation: None,
            time: None,
        }
    }

    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = Some(elevation);
        self
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    /// Check if the point has valid geographic coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Which projection a reduction runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProjectionMode {
    /// Pick from the attributes the points carry (see [`ProjectionMode::resolve`]).
    #[default]
    Auto,
    /// Latitude/longitude read as plain planar `y`/`x`.
    Cartesian,
    /// Mercator projection of latitude/longitude.
    Planar,
    /// Mercator plus elapsed time scaled by the average speed.
    SpaceTime,
    /// ECEF coordinates including elevation.
    Ellipsoidal,
}

impl ProjectionMode {
    /// Resolve `Auto` against a track; other modes are returned unchanged.
    ///
    /// - every point timed and the track lasts more than zero seconds: `SpaceTime`
    /// - every point has an elevation: `Ellipsoidal`
    /// - otherwise: `Planar`
    pub fn resolve(self, points: &[TrackPoint]) -> ProjectionMode {
        if self != ProjectionMode::Auto {
            return self;
        }

        let all_timed = !points.is_empty() && points.iter().all(|p| p.time.is_some());
        if all_timed && geo_utils::track_duration(points).is_some_and(|d| d > 0.0) {
            return ProjectionMode::SpaceTime;
        }

        let all_elevated = !points.is_empty() && points.iter().all(|p| p.elevation.is_some());
        if all_elevated {
            return ProjectionMode::Ellipsoidal;
        }

        ProjectionMode::Planar
    }
}

/// Configuration for track reduction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReduceConfig {
    /// Number of points to keep, endpoints included. Must be at least 2.
    /// Default: 2000
    pub target_points: usize,

    /// Projection to measure deviation in.
    /// Default: Auto
    pub mode: ProjectionMode,

    /// Average speed (m/s) used to scale time in the space-time projection.
    /// Default: None (derived from the track, or 5.556 m/s if it can't be)
    pub average_speed: Option<f64>,
}

impl Default for ReduceConfig {
    fn default() -> Self {
        Self {
            target_points: 2000,
            mode: ProjectionMode::Auto,
            average_speed: None,
        }
    }
}

/// Outcome of a reduction run.
///
/// `flags()[i]` is `true` when point `i` is discarded. The first and last
/// points are always kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reduction {
    flags: Vec<bool>,
    kept: usize,
    degenerate: bool,
}

impl Reduction {
    pub(crate) fn new(flags: Vec<bool>, kept: usize, degenerate: bool) -> Self {
        Self {
            flags,
            kept,
            degenerate,
        }
    }

    /// Nothing projected, so degeneracy is not evaluated.
    pub(crate) fn keep_all(len: usize) -> Self {
        Self::new(vec![false; len], len, false)
    }

    /// Discard flags, one per input point.
    pub fn flags(&self) -> &[bool] {
        &self.flags
    }

    pub fn into_flags(self) -> Vec<bool> {
        self.flags
    }

    /// Number of input points.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Number of points kept.
    pub fn kept_count(&self) -> usize {
        self.kept
    }

    /// Indices of the kept points, ascending.
    pub fn kept_indices(&self) -> Vec<usize> {
        self.flags
            .iter()
            .enumerate()
            .filter(|(_, &discard)| !discard)
            .map(|(i, _)| i)
            .collect()
    }

    /// True when no interior point deviated from the track's chord.
    ///
    /// The result is still valid; the interior picks are simply the leftmost
    /// candidates. Only evaluated when points were actually dropped: a target
    /// at or above the track length keeps everything without projecting and
    /// always reports `false`.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    /// Keep the items whose flag is `false`.
    ///
    /// `items` is usually the caller's own record type, aligned with the
    /// points that were reduced.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .zip(&self.flags)
            .filter(|(_, &discard)| !discard)
            .map(|(item, _)| item.clone())
            .collect()
    }
}

// ============================================================================
// Core Functions
// ============================================================================

/// Reduce a track according to `config`.
///
/// Returns an error for fewer than 2 points, a target below 2, a point that
/// the chosen projection can't handle, or an unusable average speed.
///
/// # Example
/// ```
/// use track_reducer::{reduce, ProjectionMode, ReduceConfig, TrackPoint};
///
/// let track: Vec<TrackPoint> = (0..10)
///     .map(|i| TrackPoint::new(45.0 + (i as f64 * 0.9).sin() * 0.001, 7.0 + i as f64 * 0.001))
///     .collect();
///
/// let config = ReduceConfig {
///     target_points: 4,
///     mode: ProjectionMode::Planar,
///     ..ReduceConfig::default()
/// };
/// let reduction = reduce(&track, &config).unwrap();
/// assert_eq!(reduction.kept_count(), 4);
/// ```
pub fn reduce(points: &[TrackPoint], config: &ReduceConfig) -> Result<Reduction, ReduceError> {
    validate_request(points, config.target_points)?;
    if let Some(speed) = config.average_speed {
        if !speed.is_finite() || speed < 0.0 {
            return Err(ReduceError::InvalidAverageSpeed { speed });
        }
    }

    if config.target_points >= points.len() {
        return Ok(Reduction::keep_all(points.len()));
    }

    let mode = config.mode.resolve(points);
    debug!(
        "[TrackReducer] reducing {} points to {} in {:?} mode",
        points.len(),
        config.target_points,
        mode
    );

    match mode {
        ProjectionMode::Cartesian => reduce_cartesian(points, config.target_points),
        ProjectionMode::Auto | ProjectionMode::Planar => reduce_planar(points, config.target_points),
        ProjectionMode::SpaceTime => {
            let speed = config
                .average_speed
                .or_else(|| geo_utils::average_speed(points))
                .unwrap_or(geo_utils::DEFAULT_AVERAGE_SPEED);
            reduce_space_time(points, config.target_points, speed)
        }
        ProjectionMode::Ellipsoidal => reduce_ellipsoidal(points, config.target_points),
    }
}

/// Reduce a track and return the kept points.
pub fn reduce_points(points: &[TrackPoint], config: &ReduceConfig) -> Result<Vec<TrackPoint>, ReduceError> {
    Ok(reduce(points, config)?.apply(points))
}

/// Reduce with latitude/longitude taken as plain planar coordinates.
pub fn reduce_cartesian(points: &[TrackPoint], target: usize) -> Result<Reduction, ReduceError> {
    ReductionEngine::new(Cartesian).run(points, target)
}

/// Reduce in the Mercator plane.
pub fn reduce_planar(points: &[TrackPoint], target: usize) -> Result<Reduction, ReduceError> {
    ReductionEngine::new(Planar).run(points, target)
}

/// Reduce in space-time, with time scaled by `average_speed` (m/s).
///
/// Every point needs a timestamp.
pub fn reduce_space_time(
    points: &[TrackPoint],
    target: usize,
    average_speed: f64,
) -> Result<Reduction, ReduceError> {
    validate_request(points, target)?;
    if target >= points.len() {
        return Ok(Reduction::keep_all(points.len()));
    }
    let projector = SpaceTime::for_track(points, average_speed)?;
    ReductionEngine::new(projector).run(points, target)
}

/// Reduce in ECEF coordinates; missing elevations count as 0 m.
pub fn reduce_ellipsoidal(points: &[TrackPoint], target: usize) -> Result<Reduction, ReduceError> {
    ReductionEngine::new(Ellipsoidal).run(points, target)
}

/// Reduce every segment of a multi-segment track independently.
///
/// Results are in segment order; a failing segment doesn't stop the others.
pub fn reduce_segments<S>(segments: &[S], config: &ReduceConfig) -> Vec<Result<Reduction, ReduceError>>
where
    S: AsRef<[TrackPoint]>,
{
    let start = Instant::now();
    let results: Vec<_> = segments
        .iter()
        .map(|segment| reduce(segment.as_ref(), config))
        .collect();
    log_batch(segments, &results, start);
    results
}

/// Parallel version of [`reduce_segments`]. Output is identical.
#[cfg(feature = "parallel")]
pub fn reduce_segments_parallel<S>(
    segments: &[S],
    config: &ReduceConfig,
) -> Vec<Result<Reduction, ReduceError>>
where
    S: AsRef<[TrackPoint]> + Sync,
{
    use rayon::prelude::*;

    let start = Instant::now();
    let results: Vec<_> = segments
        .par_iter()
        .map(|segment| reduce(segment.as_ref(), config))
        .collect();
    log_batch(segments, &results, start);
    results
}

fn validate_request(points: &[TrackPoint], target: usize) -> Result<(), ReduceError> {
    if points.len() < 2 {
        return Err(ReduceError::TooFewPoints { count: points.len() });
    }
    if target < 2 {
        return Err(ReduceError::TargetTooSmall { target });
    }
    Ok(())
}

fn log_batch<S: AsRef<[TrackPoint]>>(
    segments: &[S],
    results: &[Result<Reduction, ReduceError>],
    start: Instant,
) {
    let total_in: usize = segments.iter().map(|s| s.as_ref().len()).sum();
    let total_out: usize = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .map(Reduction::kept_count)
        .sum();
    let failed = results.iter().filter(|r| r.is_err()).count();
    info!(
        "[TrackReducer] reduced {} segments from {} to {} points ({} failed) in {:?}",
        segments.len(),
        total_in,
        total_out,
        failed,
        start.elapsed()
    );
}

// ============================================================================
// Tests
// ============================================================================

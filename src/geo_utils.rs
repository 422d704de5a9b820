//! # Geographic Utilities
//!
//! Track measurements used to parameterize the space-time projection.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two track points |
//! | [`polyline_length`] | Total length of a track in meters |
//! | [`track_duration`] | Seconds between the first and last timestamps |
//! | [`average_speed`] | Mean ground speed of a track in m/s |
//!
//! ## Example
//!
//! ```rust
//! use chrono::{Duration, TimeZone, Utc};
//! use track_reducer::{TrackPoint, geo_utils};
//!
//! let start = Utc.with_ymd_and_hms(2023, 5, 1, 8, 0, 0).unwrap();
//! let track = vec![
//!     TrackPoint::new(51.5074, -0.1278).with_time(start),
//!     TrackPoint::new(51.5080, -0.1290).with_time(start + Duration::seconds(30)),
//!     TrackPoint::new(51.5090, -0.1300).with_time(start + Duration::seconds(60)),
//! ];
//!
//! let length = geo_utils::polyline_length(&track);
//! let speed = geo_utils::average_speed(&track).unwrap();
//! assert!((speed - length / 60.0).abs() < 1e-9);
//! ```
//!
//! ## Algorithm Notes
//!
//! Distances use the haversine formula on a spherical Earth (6,371 km), which
//! is accurate to within 0.3% and more than enough to scale time against
//! distance.

use chrono::{DateTime, Utc};
use geo::{Distance, Haversine, Point};

use crate::TrackPoint;

/// Fallback average speed (m/s), roughly 20 km/h.
pub const DEFAULT_AVERAGE_SPEED: f64 = 5.556;

// =============================================================================
// Distance Functions
// =============================================================================

/// Great-circle distance between two track points in meters.
///
/// # Example
///
/// ```rust
/// use track_reducer::{TrackPoint, geo_utils};
///
/// let london = TrackPoint::new(51.5074, -0.1278);
/// let paris = TrackPoint::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0);
/// ```
#[inline]
pub fn haversine_distance(p1: &TrackPoint, p2: &TrackPoint) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Total length of a track in meters. Empty or single-point tracks return 0.0.
pub fn polyline_length(points: &[TrackPoint]) -> f64 {
    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

// =============================================================================
// Time Functions
// =============================================================================

/// Seconds between the first and last point.
///
/// `None` if either end has no timestamp.
pub fn track_duration(points: &[TrackPoint]) -> Option<f64> {
    let start = points.first()?.time?;
    let end = points.last()?.time?;
    Some(elapsed_seconds(start, end))
}

/// Seconds from `start` to `end` at microsecond resolution, negative when
/// `end` is earlier.
///
/// Spans too long for microseconds (over ~292,000 years) fall back to
/// milliseconds.
pub fn elapsed_seconds(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    let elapsed = end.signed_duration_since(start);
    match elapsed.num_microseconds() {
        Some(us) => us as f64 / 1_000_000.0,
        None => elapsed.num_milliseconds() as f64 / 1000.0,
    }
}

/// Average ground speed in m/s: track length over elapsed time.
///
/// `None` when the duration is unknown or not positive.
pub fn average_speed(points: &[TrackPoint]) -> Option<f64> {
    let duration = track_duration(points)?;
    if duration <= 0.0 {
        return None;
    }
    Some(polyline_length(points) / duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Duration, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 5, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = TrackPoint::new(51.5074, -0.1278);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_distance_known_value() {
        // London to Paris is approximately 344 km
        let london = TrackPoint::new(51.5074, -0.1278);
        let paris = TrackPoint::new(48.8566, 2.3522);
        assert_abs_diff_eq!(haversine_distance(&london, &paris), 343_560.0, epsilon = 5000.0);
    }

    #[test]
    fn test_polyline_length_short_tracks() {
        assert_eq!(polyline_length(&[]), 0.0);
        assert_eq!(polyline_length(&[TrackPoint::new(51.5074, -0.1278)]), 0.0);
    }

    #[test]
    fn test_polyline_length_two_points() {
        let track = vec![
            TrackPoint::new(51.5074, -0.1278),
            TrackPoint::new(51.5080, -0.1280),
        ];
        let length = polyline_length(&track);
        assert!(length > 0.0);
        assert!(length < 100.0); // Should be about 68m
    }

    #[test]
    fn test_track_duration() {
        let track = vec![
            TrackPoint::new(0.0, 0.0).with_time(start()),
            TrackPoint::new(0.0, 0.001),
            TrackPoint::new(0.0, 0.002).with_time(start() + Duration::milliseconds(90_500)),
        ];
        assert_eq!(track_duration(&track), Some(90.5));

        let untimed = vec![TrackPoint::new(0.0, 0.0), TrackPoint::new(0.0, 0.001)];
        assert_eq!(track_duration(&untimed), None);
        assert_eq!(track_duration(&[]), None);
    }

    #[test]
    fn test_track_duration_keeps_sub_millisecond_time() {
        let track = vec![
            TrackPoint::new(0.0, 0.0).with_time(start()),
            TrackPoint::new(0.0, 0.001).with_time(start() + Duration::microseconds(2_000_250)),
        ];
        assert_eq!(track_duration(&track), Some(2.00025));
    }

    #[test]
    fn test_elapsed_seconds() {
        let later = start() + Duration::microseconds(900);
        assert_eq!(elapsed_seconds(start(), later), 0.0009);
        assert_eq!(elapsed_seconds(later, start()), -0.0009);
        assert_eq!(elapsed_seconds(start(), start()), 0.0);
    }

    #[test]
    fn test_average_speed() {
        // 0.001° of latitude is about 111 m
        let track = vec![
            TrackPoint::new(45.000, 7.0).with_time(start()),
            TrackPoint::new(45.001, 7.0).with_time(start() + Duration::seconds(100)),
        ];
        let speed = average_speed(&track).unwrap();
        assert_abs_diff_eq!(speed, 1.112, epsilon = 0.01);
    }

    #[test]
    fn test_average_speed_needs_positive_duration() {
        let track = vec![
            TrackPoint::new(45.000, 7.0).with_time(start()),
            TrackPoint::new(45.001, 7.0).with_time(start()),
        ];
        assert_eq!(average_speed(&track), None);
        assert_eq!(average_speed(&[TrackPoint::new(45.0, 7.0)]), None);
    }
}

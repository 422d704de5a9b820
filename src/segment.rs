//! # Segment Distance
//!
//! Deviation of a point from a line segment, in any fixed number of
//! dimensions.
//!
//! The reduction only ever *compares* deviations, so the squared distance is
//! an equally valid (and cheaper) measure. Each projector picks one
//! [`Metric`] and every comparison made for that projector uses it.

/// How a deviation is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// True Euclidean distance.
    Euclidean,
    /// Squared Euclidean distance.
    Squared,
}

impl Metric {
    /// Turn a squared length into a value of this metric.
    #[inline]
    pub fn from_squared(self, squared: f64) -> f64 {
        match self {
            Metric::Euclidean => squared.sqrt(),
            Metric::Squared => squared,
        }
    }
}

/// A point in a projected metric space.
pub trait Coordinate: Copy + Send + Sync {
    /// Squared distance from `p` to the segment `[a, b]`.
    fn squared_segment_distance(a: &Self, b: &Self, p: &Self) -> f64;
}

impl<const D: usize> Coordinate for [f64; D] {
    fn squared_segment_distance(a: &Self, b: &Self, p: &Self) -> f64 {
        let mut ab_ap = 0.0;
        let mut ab_ab = 0.0;
        for k in 0..D {
            let ab = a[k] - b[k];
            ab_ap += ab * (a[k] - p[k]);
            ab_ab += ab * ab;
        }

        // NaN (a == b) lands in the last branch
        let t = ab_ap / ab_ab;
        let t = if t > 1.0 {
            1.0
        } else if t > 0.0 {
            t
        } else {
            0.0
        };

        let mut squared = 0.0;
        for k in 0..D {
            let foot = a[k] - t * (a[k] - b[k]);
            let d = foot - p[k];
            squared += d * d;
        }
        squared
    }
}

/// Deviation of `p` from the segment `[a, b]` under `metric`.
///
/// The closest point of the segment is used, so points beyond either end
/// measure against that endpoint. A zero-length segment measures against `a`.
#[inline]
pub fn segment_distance<C: Coordinate>(a: &C, b: &C, p: &C, metric: Metric) -> f64 {
    metric.from_squared(C::squared_segment_distance(a, b, p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_perpendicular_foot_inside_segment() {
        let d = segment_distance(&[0.0, 0.0], &[4.0, 0.0], &[1.0, 1.0], Metric::Euclidean);
        assert_abs_diff_eq!(d, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_point_beyond_end_measures_to_endpoint() {
        let a = [0.0, 0.0];
        let b = [4.0, 0.0];

        // Past b: distance to b
        let d = segment_distance(&a, &b, &[7.0, 4.0], Metric::Euclidean);
        assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);

        // Before a: distance to a
        let d = segment_distance(&a, &b, &[-3.0, -4.0], Metric::Euclidean);
        assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_segment_uses_first_endpoint() {
        let a = [2.0, 2.0];
        let d = segment_distance(&a, &a, &[5.0, 6.0], Metric::Euclidean);
        assert_abs_diff_eq!(d, 5.0, epsilon = 1e-12);

        let d = segment_distance(&a, &a, &a, Metric::Squared);
        assert_eq!(d, 0.0);
    }

    #[test]
    fn test_squared_metric() {
        let d = segment_distance(&[0.0, 0.0], &[4.0, 0.0], &[2.0, 3.0], Metric::Squared);
        assert_abs_diff_eq!(d, 9.0, epsilon = 1e-12);
    }

    #[test]
    fn test_three_dimensions() {
        let a = [0.0, 0.0, 0.0];
        let b = [0.0, 0.0, 10.0];
        let p = [3.0, 4.0, 5.0];
        assert_abs_diff_eq!(segment_distance(&a, &b, &p, Metric::Euclidean), 5.0, epsilon = 1e-12);
        assert_abs_diff_eq!(segment_distance(&a, &b, &p, Metric::Squared), 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_metrics_order_the_same_way() {
        let a = [0.0, 0.0];
        let b = [10.0, 0.0];
        let near = [3.0, 0.5];
        let far = [6.0, 2.0];
        for metric in [Metric::Euclidean, Metric::Squared] {
            assert!(segment_distance(&a, &b, &far, metric) > segment_distance(&a, &b, &near, metric));
        }
    }

    #[test]
    fn test_point_on_segment_is_zero() {
        let d = segment_distance(&[0.0, 0.0], &[2.0, 2.0], &[1.0, 1.0], Metric::Euclidean);
        assert_abs_diff_eq!(d, 0.0, epsilon = 1e-12);
    }
}

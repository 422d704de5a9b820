//! # Reduction Engine
//!
//! Douglas-Peucker N: Douglas-Peucker driven by a global priority queue and
//! stopped at a point budget instead of a tolerance.
//!
//! ## Algorithm
//! 1. Project every point once
//! 2. Seed the queue with the farthest interior point of the whole track
//! 3. Pop the globally farthest candidate, keep it, and queue the farthest
//!    point of each of the two sub-intervals it splits off
//! 4. Stop when the budget is reached or no candidate is left
//!
//! Sub-intervals are only scanned when their parent is popped, so the queue
//! never holds more than one candidate per kept point plus one.

use log::debug;

use crate::heap::PairingHeap;
use crate::projection::Projector;
use crate::segment::segment_distance;
use crate::{ReduceError, Reduction, TrackPoint};

/// An undecided sub-range and its farthest interior point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub start: usize,
    pub end: usize,
    /// Index of the farthest interior point
    pub pos: usize,
    /// Deviation of `pos` from the chord `start`-`end`
    pub dist: f64,
}

/// Farthest interior point of `[start, end]`, or `None` when there is no
/// interior point.
///
/// Ties go to the lowest index: a candidate only replaces the current best
/// when strictly farther. A NaN deviation (from overflowing coordinates)
/// never beats a real one.
pub fn find_farthest<P: Projector>(coords: &[P::Coord], start: usize, end: usize) -> Option<Interval> {
    if end < start + 2 {
        return None;
    }

    let a = &coords[start];
    let b = &coords[end];

    let mut best: Option<(usize, f64)> = None;
    for (pos, p) in coords.iter().enumerate().take(end).skip(start + 1) {
        let dist = segment_distance(a, b, p, P::METRIC);
        if best.map_or(true, |(_, max)| dist > max || (max.is_nan() && !dist.is_nan())) {
            best = Some((pos, dist));
        }
    }

    best.map(|(pos, dist)| Interval { start, end, pos, dist })
}

/// Runs Douglas-Peucker N over tracks with a given projection.
#[derive(Debug, Clone)]
pub struct ReductionEngine<P> {
    projector: P,
}

impl<P: Projector> ReductionEngine<P> {
    pub fn new(projector: P) -> Self {
        Self { projector }
    }

    pub fn projector(&self) -> &P {
        &self.projector
    }

    /// Reduce `points` to at most `target` points.
    ///
    /// Fails before doing any work when the track has fewer than two points,
    /// the target is below two, or a point cannot be projected.
    pub fn run(&self, points: &[TrackPoint], target: usize) -> Result<Reduction, ReduceError> {
        let n = points.len();
        if n < 2 {
            return Err(ReduceError::TooFewPoints { count: n });
        }
        if target < 2 {
            return Err(ReduceError::TargetTooSmall { target });
        }

        if target >= n {
            return Ok(Reduction::keep_all(n));
        }

        let coords = self.projector.project_track(points)?;
        Ok(self.reduce_coords(&coords, target))
    }

    /// Core loop over already projected coordinates. `coords.len() > target >= 2`.
    fn reduce_coords(&self, coords: &[P::Coord], target: usize) -> Reduction {
        let n = coords.len();
        let mut flags = vec![true; n];
        flags[0] = false;
        flags[n - 1] = false;
        let mut kept = 2;

        let mut queue = PairingHeap::with_capacity(target);
        let seed = find_farthest::<P>(coords, 0, n - 1);
        let degenerate = seed.map_or(true, |s| s.dist == 0.0);
        if degenerate {
            debug!("[TrackReducer] degenerate track: {} points with no deviation from the chord", n);
        }
        if let Some(seed) = seed {
            queue.enqueue(seed.dist, seed);
        }

        while kept < target {
            let Some(v) = queue.dequeue() else {
                break;
            };
            flags[v.pos] = false;
            kept += 1;

            if let Some(left) = find_farthest::<P>(coords, v.start, v.pos) {
                queue.enqueue(left.dist, left);
            }
            if let Some(right) = find_farthest::<P>(coords, v.pos, v.end) {
                queue.enqueue(right.dist, right);
            }
        }

        debug!(
            "[TrackReducer] kept {} of {} points ({} candidates left)",
            kept,
            n,
            queue.len()
        );

        Reduction::new(flags, kept, degenerate)
    }
}

//! Lazy chart series
//!
//! A series is described by its parameters and sampled on demand at integer
//! periods `0..=last_period`. Nothing is stored: iterating twice re-runs the
//! closed-form function, so a series is cheap to rebuild whenever inputs change.

use std::iter::FusedIterator;

/// A finite series whose points are computed from a closed-form function
pub trait Sampled {
    type Point;

    /// Last period included in the series (inclusive)
    fn last_period(&self) -> u32;

    /// Point at `period`; callers stay within `first_period()..=last_period()`
    fn sample(&self, period: u32) -> Self::Point;

    /// First period included in the series
    fn first_period(&self) -> u32 {
        0
    }

    /// Number of points
    fn len(&self) -> usize {
        let first = self.first_period();
        let last = self.last_period();
        if last < first {
            0
        } else {
            (last - first) as usize + 1
        }
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Point at `period`, or None outside the series
    fn get(&self, period: u32) -> Option<Self::Point> {
        if period < self.first_period() || period > self.last_period() {
            None
        } else {
            Some(self.sample(period))
        }
    }

    /// Iterate every point in period order
    fn points(&self) -> Points<'_, Self>
    where
        Self: Sized,
    {
        Points {
            source: self,
            front: self.first_period(),
            remaining: self.len(),
        }
    }
}

/// Iterator over the points of a [`Sampled`] series
#[derive(Debug)]
pub struct Points<'a, S> {
    source: &'a S,
    front: u32,
    remaining: usize,
}

impl<S> Clone for Points<'_, S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            front: self.front,
            remaining: self.remaining,
        }
    }
}

impl<S: Sampled> Iterator for Points<'_, S> {
    type Item = S::Point;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let point = self.source.sample(self.front);
        self.front += 1;
        self.remaining -= 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<S: Sampled> DoubleEndedIterator for Points<'_, S> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.source.sample(self.front + self.remaining as u32))
    }
}

impl<S: Sampled> ExactSizeIterator for Points<'_, S> {}

impl<S: Sampled> FusedIterator for Points<'_, S> {}

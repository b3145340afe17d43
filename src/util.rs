//! Miscellaneous utility structs and functions.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// An interval on the number line.
#[derive(Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval<T> {
    pub min: T,
    pub max: T,
}

impl<T> Interval<T> {
    /// Creates a new interval.
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }
}

impl Interval<usize> {
    /// Iterates over the half-open range `min..max`.
    pub fn iter(&self) -> std::ops::Range<usize> {
        self.min..self.max
    }
}

impl Interval<f64> {
    /// Returns the centre/mid-point of the interval.
    pub fn midpoint(&self) -> f64 {
        0.5 * (self.min + self.max)
    }

    pub fn lerp(&self, t: f64) -> f64 {
        self.min + t * (self.max - self.min)
    }

    pub fn inv_lerp(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }
}

impl<T: Debug> Debug for Interval<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interval({:?}, {:?})", &self.min, &self.max)
    }
}

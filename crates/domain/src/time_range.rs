// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Half-open time intervals and overlap arithmetic.
//!
//! All scheduling comparisons in the engine use half-open intervals
//! `[start, end)`: two back-to-back sessions do not overlap by themselves.
//! Buffer (setup/cleanup) minutes are what keep adjacent sessions apart,
//! applied by widening an interval before the overlap test.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A half-open time interval `[start, end)` with `end > start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeRange {
    /// Creates a new `TimeRange`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimeRange` if `end` is not strictly
    /// after `start`.
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, DomainError> {
        if end <= start {
            return Err(DomainError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the start timestamp.
    #[must_use]
    pub const fn start(&self) -> NaiveDateTime {
        self.start
    }

    /// Returns the end timestamp.
    #[must_use]
    pub const fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Returns the duration of the interval.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Half-open overlap test: `[a1, a2)` overlaps `[b1, b2)` iff
    /// `a1 < b2 && a2 > b1`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && self.end > other.start
    }

    /// Returns this interval widened by `minutes` on both sides.
    ///
    /// Used to apply facility buffer time before an overlap test.
    #[must_use]
    pub fn widened_by_minutes(&self, minutes: i64) -> Self {
        Self {
            start: self.start - Duration::minutes(minutes),
            end: self.end + Duration::minutes(minutes),
        }
    }

    /// Returns this interval shifted by the given delta.
    #[must_use]
    pub fn shifted_by(&self, delta: Duration) -> Self {
        Self {
            start: self.start + delta,
            end: self.end + delta,
        }
    }

    /// Returns whether this interval lies entirely within `outer`.
    #[must_use]
    pub fn within(&self, outer: &Self) -> bool {
        self.start >= outer.start && self.end <= outer.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} .. {})", self.start, self.end)
    }
}

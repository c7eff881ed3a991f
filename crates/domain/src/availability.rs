// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Declared instructor availability windows.
//!
//! Availability is advisory: assignment against a window that does not
//! cover a session is a warning-level condition the caller may override,
//! unlike a hard instructor time overlap. Exceptions to a recurring rule
//! are modelled as additional rows with `is_active = false` that suppress
//! the rule for one date.

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::time_range::TimeRange;

/// The shape of an availability window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityShape {
    /// Repeats every week on one weekday.
    Recurring {
        /// The weekday the window applies to.
        weekday: chrono::Weekday,
        /// Window start time.
        start_time: NaiveTime,
        /// Window end time.
        end_time: NaiveTime,
    },
    /// Applies to a single calendar date.
    OneTime {
        /// The specific date.
        date: NaiveDate,
        /// Window start time.
        start_time: NaiveTime,
        /// Window end time.
        end_time: NaiveTime,
    },
}

impl AvailabilityShape {
    /// Validates that the window's end time is after its start time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAvailabilityWindow` otherwise.
    pub fn validate(&self) -> Result<(), DomainError> {
        let (start, end) = match self {
            Self::Recurring {
                start_time,
                end_time,
                ..
            }
            | Self::OneTime {
                start_time,
                end_time,
                ..
            } => (*start_time, *end_time),
        };
        if end <= start {
            return Err(DomainError::InvalidAvailabilityWindow {
                reason: format!("end time {end} must be after start time {start}"),
            });
        }
        Ok(())
    }

    /// Returns the concrete window this shape produces on `date`, if any.
    #[must_use]
    pub fn window_on(&self, date: NaiveDate) -> Option<TimeRange> {
        match self {
            Self::Recurring {
                weekday,
                start_time,
                end_time,
            } => {
                if date.weekday() == *weekday {
                    TimeRange::new(date.and_time(*start_time), date.and_time(*end_time)).ok()
                } else {
                    None
                }
            }
            Self::OneTime {
                date: rule_date,
                start_time,
                end_time,
            } => {
                if date == *rule_date {
                    TimeRange::new(date.and_time(*start_time), date.and_time(*end_time)).ok()
                } else {
                    None
                }
            }
        }
    }
}

/// A declared window in which an instructor can be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorAvailability {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the row has not been persisted yet.
    pub availability_id: Option<i64>,
    /// The instructor this availability belongs to.
    pub instructor_id: i64,
    /// The program scope.
    pub program_id: i64,
    /// Optional facility scoping. `None` means any facility.
    pub facility_id: Option<i64>,
    /// The window shape (recurring weekday or one-time date).
    pub shape: AvailabilityShape,
    /// Whether the row is active. Inactive rows with a one-time shape
    /// act as exceptions that suppress recurring rules for that date.
    pub is_active: bool,
    /// Start of the validity window, if bounded.
    pub valid_from: Option<NaiveDate>,
    /// End of the validity window, if bounded.
    pub valid_until: Option<NaiveDate>,
    /// Whether this row is an exception to a recurring rule.
    pub is_exception: bool,
    /// Reason recorded for an exception row.
    pub exception_reason: Option<String>,
    /// Maximum concurrent sessions the instructor accepts, if limited.
    pub max_concurrent_sessions: Option<u32>,
}

impl InstructorAvailability {
    /// Returns whether the row's validity window contains `date`.
    #[must_use]
    pub fn valid_on(&self, date: NaiveDate) -> bool {
        if let Some(from) = self.valid_from
            && date < from
        {
            return false;
        }
        if let Some(until) = self.valid_until
            && date > until
        {
            return false;
        }
        true
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurrence specifications for repeating sessions.
//!
//! A recurring series is modelled as an explicit [`RecurrenceGroup`]
//! aggregate with a stable group identifier; member sessions reference the
//! group rather than each other. Group-wide operations (time shift, bulk
//! cancellation) enumerate members of a group.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::DomainError;

/// Upper bound on the number of instances a single expansion may produce.
///
/// Patterns that would generate more are rejected outright to bound
/// resource usage.
pub const MAX_OCCURRENCES: usize = 500;

/// How often a session template repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum RecurrencePattern {
    /// A single, non-repeating session.
    #[default]
    None,
    /// Repeats every `interval` days.
    Daily,
    /// Repeats on selected weekdays of every `interval`-th week.
    Weekly,
    /// Repeats on the same day-of-month every `interval` months.
    Monthly,
}

impl FromStr for RecurrencePattern {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Self::None),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(DomainError::InvalidRecurrencePattern(s.to_string())),
        }
    }
}

impl std::fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl RecurrencePattern {
    /// Converts this pattern to its storage string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Returns whether this pattern produces more than one occurrence.
    #[must_use]
    pub const fn is_repeating(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// The condition that stops a recurrence expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecurrenceEnd {
    /// Expand up to and including this date.
    OnDate(NaiveDate),
    /// Expand until this many occurrences have been produced.
    AfterOccurrences(u32),
}

/// A complete recurrence specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceSpec {
    /// The repetition pattern.
    pub pattern: RecurrencePattern,
    /// The step between occurrences (days for daily, weeks for weekly,
    /// months for monthly). Must be >= 1 for repeating patterns.
    pub interval: u32,
    /// For weekly patterns, the weekdays on which sessions occur.
    pub weekdays: Vec<Weekday>,
    /// The end condition. Required for any repeating pattern.
    pub end: Option<RecurrenceEnd>,
    /// Dates to skip during expansion.
    pub exception_dates: BTreeSet<NaiveDate>,
}

impl RecurrenceSpec {
    /// Creates the specification for a single, non-repeating session.
    #[must_use]
    pub const fn single() -> Self {
        Self {
            pattern: RecurrencePattern::None,
            interval: 1,
            weekdays: Vec::new(),
            end: None,
            exception_dates: BTreeSet::new(),
        }
    }

    /// Validates internal consistency of the specification.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRecurrence` if:
    /// - a repeating pattern has no end condition
    /// - a weekly pattern has an empty weekday set
    /// - the interval is zero for a repeating pattern
    /// - an occurrence-count end condition is zero or exceeds the cap
    pub fn validate(&self) -> Result<(), DomainError> {
        if !self.pattern.is_repeating() {
            return Ok(());
        }

        if self.interval == 0 {
            return Err(DomainError::InvalidRecurrence {
                reason: String::from("interval must be at least 1"),
            });
        }

        if self.pattern == RecurrencePattern::Weekly && self.weekdays.is_empty() {
            return Err(DomainError::InvalidRecurrence {
                reason: String::from("weekly recurrence requires at least one weekday"),
            });
        }

        match self.end {
            None => Err(DomainError::InvalidRecurrence {
                reason: format!(
                    "pattern '{}' requires an end date or occurrence count",
                    self.pattern
                ),
            }),
            Some(RecurrenceEnd::AfterOccurrences(0)) => Err(DomainError::InvalidRecurrence {
                reason: String::from("occurrence count must be at least 1"),
            }),
            Some(RecurrenceEnd::AfterOccurrences(n)) if n as usize > MAX_OCCURRENCES => {
                Err(DomainError::RecurrenceLimitExceeded {
                    max: MAX_OCCURRENCES,
                })
            }
            Some(_) => Ok(()),
        }
    }
}

/// The persisted aggregate for one recurring series.
///
/// Holds the specification the series was expanded from; member sessions
/// carry this group's identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceGroup {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the group has not been persisted yet.
    pub group_id: Option<i64>,
    /// The program this group belongs to.
    pub program_id: i64,
    /// The specification the series was expanded from.
    pub spec: RecurrenceSpec,
}

impl RecurrenceGroup {
    /// Creates a new `RecurrenceGroup` without a persisted ID.
    #[must_use]
    pub const fn new(program_id: i64, spec: RecurrenceSpec) -> Self {
        Self {
            group_id: None,
            program_id,
            spec,
        }
    }

    /// Creates a `RecurrenceGroup` with an existing persisted ID.
    #[must_use]
    pub const fn with_id(group_id: i64, program_id: i64, spec: RecurrenceSpec) -> Self {
        Self {
            group_id: Some(group_id),
            program_id,
            spec,
        }
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Per-facility operating policy.
//!
//! One [`FacilityScheduleSettings`] row exists per facility. It is pure
//! configuration: weekly operating hours, booking and cancellation
//! cutoffs, buffer minutes between sessions, participant-limit defaults,
//! and a closure calendar. Other components consult it; it has no
//! behavior of its own beyond lookups.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::DomainError;
use crate::time_range::TimeRange;
use crate::types::SessionKind;

/// An open/close pair for one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    /// Opening time.
    pub open: NaiveTime,
    /// Closing time. Must be after `open`.
    pub close: NaiveTime,
}

impl DayHours {
    /// Creates a new `DayHours`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidOperatingHours` if `close` is not
    /// strictly after `open`.
    pub fn new(open: NaiveTime, close: NaiveTime) -> Result<Self, DomainError> {
        if close <= open {
            return Err(DomainError::InvalidOperatingHours {
                reason: format!("close time {close} must be after open time {open}"),
            });
        }
        Ok(Self { open, close })
    }
}

/// Scheduling policy for one facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacilityScheduleSettings {
    /// The facility this policy belongs to.
    pub facility_id: i64,
    /// The program the facility belongs to.
    pub program_id: i64,
    /// Operating hours Monday through Sunday. `None` means closed that day.
    pub weekly_hours: [Option<DayHours>; 7],
    /// How far ahead bookings may be made, in days.
    pub booking_advance_days: u32,
    /// Minimum lead time for a booking, in hours.
    pub booking_cutoff_hours: u32,
    /// Minimum lead time for a cancellation, in hours.
    pub cancellation_cutoff_hours: u32,
    /// Maximum number of concurrent sessions at the facility.
    pub max_concurrent_sessions: u32,
    /// Setup buffer required before each session, in minutes.
    pub setup_buffer_minutes: u32,
    /// Cleanup buffer required after each session, in minutes.
    pub cleanup_buffer_minutes: u32,
    /// Default participant limit when a session sets none.
    pub default_max_participants: Option<u32>,
    /// Per-kind override of the default participant limit.
    pub kind_max_participants: Vec<(SessionKind, u32)>,
    /// Whether sessions here need equipment setup time.
    pub requires_equipment_setup: bool,
    /// Extra equipment setup minutes, applied when required.
    pub equipment_setup_minutes: u32,
    /// Dates on which the facility is closed regardless of weekday hours.
    pub closure_dates: BTreeSet<NaiveDate>,
}

impl FacilityScheduleSettings {
    /// Returns the operating hours for a weekday, if open.
    #[must_use]
    pub const fn hours_for(&self, weekday: Weekday) -> Option<DayHours> {
        self.weekly_hours[weekday.num_days_from_monday() as usize]
    }

    /// Returns the operating window for a specific date, if open.
    ///
    /// Closure-calendar dates are closed regardless of weekday hours.
    #[must_use]
    pub fn operating_window(&self, date: NaiveDate) -> Option<TimeRange> {
        if self.closure_dates.contains(&date) {
            return None;
        }
        let hours = self.hours_for(date.weekday())?;
        // DayHours validated open < close, so this range is well-formed.
        TimeRange::new(date.and_time(hours.open), date.and_time(hours.close)).ok()
    }

    /// Total buffer minutes applied on each side of a session.
    ///
    /// Setup + cleanup, plus equipment setup time when the facility
    /// requires it.
    #[must_use]
    pub const fn total_buffer_minutes(&self) -> u32 {
        let base = self.setup_buffer_minutes + self.cleanup_buffer_minutes;
        if self.requires_equipment_setup {
            base + self.equipment_setup_minutes
        } else {
            base
        }
    }

    /// Returns the default participant limit for a session kind.
    ///
    /// A per-kind override wins over the facility-wide default.
    #[must_use]
    pub fn default_capacity_for(&self, kind: SessionKind) -> Option<u32> {
        self.kind_max_participants
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, limit)| *limit)
            .or(self.default_max_participants)
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conflict detection for candidate time slots.
//!
//! Checks run in severity order: operating hours, then instructor
//! overlap, then facility overlap, then buffer spacing. The first
//! failure wins, so a raw facility overlap reports `facility_overlap`
//! and a clash that only appears once buffers are applied reports
//! `insufficient_buffer`.

use campus_sched_domain::{FacilityScheduleSettings, ScheduledSession, TimeRange};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Why a candidate slot is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictReason {
    /// The slot overlaps another session at the facility beyond its
    /// concurrency limit.
    FacilityOverlap,
    /// The instructor is already booked during the slot, at any facility.
    InstructorOverlap,
    /// The facility is closed for part or all of the slot.
    OutsideOperatingHours,
    /// The slot fits only without the facility's setup/cleanup buffer.
    InsufficientBuffer,
}

impl ConflictReason {
    /// The machine-readable reason code used in API responses.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FacilityOverlap => "facility_overlap",
            Self::InstructorOverlap => "instructor_overlap",
            Self::OutsideOperatingHours => "outside_operating_hours",
            Self::InsufficientBuffer => "insufficient_buffer",
        }
    }
}

impl std::fmt::Display for ConflictReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The outcome of a conflict check for one candidate slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictCheck {
    /// Whether the slot is available.
    pub available: bool,
    /// Why not, when unavailable.
    pub reason: Option<ConflictReason>,
    /// The session the candidate clashed with, when one exists.
    pub conflicting_session_id: Option<i64>,
}

impl ConflictCheck {
    /// An available slot.
    #[must_use]
    pub const fn clear() -> Self {
        Self {
            available: true,
            reason: None,
            conflicting_session_id: None,
        }
    }

    /// An unavailable slot.
    #[must_use]
    pub const fn blocked(reason: ConflictReason, conflicting_session_id: Option<i64>) -> Self {
        Self {
            available: false,
            reason: Some(reason),
            conflicting_session_id,
        }
    }
}

/// Checks whether a candidate slot can be booked at a facility.
///
/// `facility_sessions` must be the slot-occupying sessions at the
/// candidate's facility (cancelled sessions excluded), and
/// `instructor_busy` the combined busy windows of every instructor the
/// candidate would involve, across all facilities. When re-checking an
/// existing session (a time change), the caller excludes that session
/// from both collections.
///
/// Operating hours are evaluated against the facility's window for the
/// candidate's start date; closed weekdays and closure-calendar dates
/// have no window and report `outside_operating_hours`.
#[must_use]
pub fn check_availability(
    candidate: &TimeRange,
    settings: &FacilityScheduleSettings,
    facility_sessions: &[ScheduledSession],
    instructor_busy: &[TimeRange],
) -> ConflictCheck {
    let date = candidate.start().date();
    let open = settings.operating_window(date);
    if !open.is_some_and(|window| candidate.within(&window)) {
        return ConflictCheck::blocked(ConflictReason::OutsideOperatingHours, None);
    }

    if instructor_busy.iter().any(|busy| candidate.overlaps(busy)) {
        return ConflictCheck::blocked(ConflictReason::InstructorOverlap, None);
    }

    let occupying: Vec<&ScheduledSession> = facility_sessions
        .iter()
        .filter(|s| s.status.occupies_slot())
        .collect();

    let raw_overlaps: Vec<&&ScheduledSession> = occupying
        .iter()
        .filter(|s| candidate.overlaps(&s.time))
        .collect();
    if raw_overlaps.len() >= settings.max_concurrent_sessions as usize {
        return ConflictCheck::blocked(
            ConflictReason::FacilityOverlap,
            raw_overlaps.first().and_then(|s| s.session_id),
        );
    }

    let buffer = i64::from(settings.total_buffer_minutes());
    if buffer > 0 {
        let widened = candidate.widened_by_minutes(buffer);
        let buffered_overlaps: Vec<&&ScheduledSession> = occupying
            .iter()
            .filter(|s| widened.overlaps(&s.time))
            .collect();
        if buffered_overlaps.len() >= settings.max_concurrent_sessions as usize {
            return ConflictCheck::blocked(
                ConflictReason::InsufficientBuffer,
                buffered_overlaps.first().and_then(|s| s.session_id),
            );
        }
    }

    ConflictCheck::clear()
}

/// Checks a candidate slot against the facility's booking window policy.
///
/// Returns a human-readable violation when the slot starts too soon
/// (inside the booking cutoff) or too far ahead (beyond the advance
/// window). `None` means the booking window permits the slot. Distinct
/// from conflict detection: a violation here is a validation failure,
/// not a schedule conflict.
#[must_use]
pub fn booking_window_violation(
    candidate: &TimeRange,
    settings: &FacilityScheduleSettings,
    now: NaiveDateTime,
) -> Option<String> {
    let cutoff = now + Duration::hours(i64::from(settings.booking_cutoff_hours));
    if candidate.start() < cutoff {
        return Some(format!(
            "session must be booked at least {} hours in advance",
            settings.booking_cutoff_hours
        ));
    }
    let horizon = now + Duration::days(i64::from(settings.booking_advance_days));
    if candidate.start() > horizon {
        return Some(format!(
            "session cannot be booked more than {} days in advance",
            settings.booking_advance_days
        ));
    }
    None
}

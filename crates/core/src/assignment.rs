// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Instructor assignment checks.
//!
//! Availability coverage is advisory and can be overridden by the
//! caller; a hard instructor time overlap is detected by the conflict
//! module and cannot.

use campus_sched_domain::{
    AvailabilityShape, InstructorAvailability, SessionInstructor, TimeRange,
};

/// Whether an instructor's declared availability covers a session slot.
///
/// Coverage requires at least one active row, valid on the session's
/// date, scoped to the session's facility (or unscoped), whose window
/// contains the whole slot. An inactive one-time row for the date acts
/// as an exception and suppresses recurring rows, but not active
/// one-time rows for the same date.
#[must_use]
pub fn instructor_covers(
    availability: &[InstructorAvailability],
    slot: &TimeRange,
    facility_id: i64,
) -> bool {
    let date = slot.start().date();

    let in_scope = |row: &&InstructorAvailability| {
        row.facility_id.is_none_or(|f| f == facility_id) && row.valid_on(date)
    };

    let exception_for_date = availability
        .iter()
        .filter(in_scope)
        .any(|row| {
            !row.is_active
                && matches!(row.shape, AvailabilityShape::OneTime { date: d, .. } if d == date)
        });

    availability
        .iter()
        .filter(in_scope)
        .filter(|row| row.is_active)
        .filter(|row| {
            !(exception_for_date && matches!(row.shape, AvailabilityShape::Recurring { .. }))
        })
        .filter_map(|row| row.shape.window_on(date))
        .any(|window| slot.within(&window))
}

/// The currently active primary assignment on a session, if any.
///
/// Assigning a new primary demotes this one; at most one active primary
/// exists per session.
#[must_use]
pub fn active_primary(assignments: &[SessionInstructor]) -> Option<&SessionInstructor> {
    assignments
        .iter()
        .find(|a| a.state.is_active() && a.is_primary)
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session lifecycle transitions and group time shifts.

use campus_sched_domain::{
    DomainError, ParticipantStatus, ScheduledSession, SessionStatus, TimeRange,
};
use chrono::Duration;

/// Validates a session status transition against the transition table.
///
/// # Errors
///
/// Returns `DomainError::InvalidSessionTransition` if the table does not
/// permit `from -> to`. Terminal states (`completed`, `cancelled`) have
/// no outgoing transitions.
pub fn ensure_session_transition(
    from: SessionStatus,
    to: SessionStatus,
) -> Result<(), DomainError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(DomainError::InvalidSessionTransition { from, to })
    }
}

/// Validates a participant status transition against the transition table.
///
/// # Errors
///
/// Returns `DomainError::InvalidParticipantTransition` if the table does
/// not permit `from -> to`.
pub fn ensure_participant_transition(
    from: ParticipantStatus,
    to: ParticipantStatus,
) -> Result<(), DomainError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(DomainError::InvalidParticipantTransition { from, to })
    }
}

/// Validates that a session may still be cancelled.
///
/// # Errors
///
/// Returns `DomainError::InvalidSessionTransition` for sessions already
/// completed or cancelled.
pub fn ensure_cancellable(status: SessionStatus) -> Result<(), DomainError> {
    ensure_session_transition(status, SessionStatus::Cancelled)
}

/// The start delta between an old and a new time window.
#[must_use]
pub fn shift_delta(old: &TimeRange, new: &TimeRange) -> Duration {
    new.start() - old.start()
}

/// One planned move inside a group time shift.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftTarget {
    /// The session to move.
    pub session_id: i64,
    /// Its new time window.
    pub new_time: TimeRange,
}

/// Plans a uniform time shift across the members of a recurrence group.
///
/// Only still-`scheduled`, non-cancelled members move; completed,
/// in-progress, and cancelled members are left untouched. Each target
/// still needs its own conflict check by the caller, which skips and
/// reports conflicting members rather than failing the whole shift.
#[must_use]
pub fn plan_group_shift(members: &[ScheduledSession], delta: Duration) -> Vec<ShiftTarget> {
    members
        .iter()
        .filter(|s| s.status == SessionStatus::Scheduled && s.cancel_state.is_active())
        .filter_map(|s| {
            s.session_id.map(|session_id| ShiftTarget {
                session_id,
                new_time: s.time.shifted_by(delta),
            })
        })
        .collect()
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capacity and waitlist decisions.
//!
//! Capacity shortfall is never an error here: a full session redirects
//! enrollment to the waitlist. Waitlist positions are dense `1..N` per
//! session, promotion takes the minimum position, and the remaining
//! positions are re-compacted in the same plan.

use campus_sched_domain::{
    DomainError, ParticipantStatus, ScheduledSession, SessionParticipant, SessionStatus,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// How many waitlisted participants a freed seat promotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PromotionPolicy {
    /// Promote exactly one participant per freed seat.
    #[default]
    SingleSeat,
    /// Promote waitlisted participants until the session is full again.
    FillOpenSeats,
}

/// The outcome of an enrollment request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "decision")]
pub enum EnrollmentDecision {
    /// The student takes a seat immediately.
    Enroll,
    /// The session cannot seat the student now; join the waitlist.
    Waitlist {
        /// The dense position assigned, `max existing + 1`.
        position: u32,
    },
}

/// Counts participants holding a seat: active rows in `enrolled` or
/// `confirmed` status.
#[must_use]
pub fn enrolled_count(participants: &[SessionParticipant]) -> u32 {
    let count = participants
        .iter()
        .filter(|p| p.cancel_state.is_active() && p.status.counts_toward_capacity())
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// The next dense waitlist position for a session: `max existing + 1`.
#[must_use]
pub fn next_waitlist_position(participants: &[SessionParticipant]) -> u32 {
    participants
        .iter()
        .filter(|p| p.cancel_state.is_active() && p.status == ParticipantStatus::Waitlisted)
        .filter_map(|p| p.waitlist_position)
        .max()
        .unwrap_or(0)
        + 1
}

/// Rejects a second active row for the same (session, student) pair.
///
/// # Errors
///
/// Returns `DomainError::DuplicateEnrollment` if the student already has
/// an active participant row on the session.
pub fn ensure_not_enrolled(
    participants: &[SessionParticipant],
    session_id: i64,
    student_id: i64,
) -> Result<(), DomainError> {
    let duplicate = participants
        .iter()
        .any(|p| p.student_id == student_id && p.cancel_state.is_active() && p.status.is_active());
    if duplicate {
        return Err(DomainError::DuplicateEnrollment {
            session_id,
            student_id,
        });
    }
    Ok(())
}

/// Decides whether a new participant enrolls or joins the waitlist.
///
/// Enrollment requires the session to be scheduled, below its limit, and
/// starting in the future; otherwise the student is waitlisted at the
/// next dense position. The caller has already run
/// [`ensure_not_enrolled`].
#[must_use]
pub fn decide_enrollment(
    session: &ScheduledSession,
    participants: &[SessionParticipant],
    now: NaiveDateTime,
) -> EnrollmentDecision {
    if session.can_enroll_participant(enrolled_count(participants), now) {
        EnrollmentDecision::Enroll
    } else {
        EnrollmentDecision::Waitlist {
            position: next_waitlist_position(participants),
        }
    }
}

/// A waitlist promotion plan computed inside a cancellation or removal.
///
/// `promote` lists participant IDs that move `waitlisted -> enrolled`
/// with their position cleared; `reposition` lists the remaining
/// waitlisted participant IDs with their re-compacted dense positions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PromotionPlan {
    /// Participant IDs to promote to `enrolled`.
    pub promote: Vec<i64>,
    /// Remaining waitlisted participant IDs with new positions `1..N`.
    pub reposition: Vec<(i64, u32)>,
}

impl PromotionPlan {
    /// Whether the plan changes anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.promote.is_empty() && self.reposition.is_empty()
    }
}

/// Plans waitlist promotion after seats have been freed.
///
/// `participants` must reflect the state after the triggering
/// cancellation has been applied. Promotion order is ascending waitlist
/// position. `SingleSeat` promotes at most one participant;
/// `FillOpenSeats` promotes until the session is full (or the waitlist
/// is empty). A session past its start, no longer scheduled, or with no
/// open seat promotes nobody, but re-compaction still runs so positions
/// stay dense.
#[must_use]
pub fn plan_promotion(
    session: &ScheduledSession,
    participants: &[SessionParticipant],
    policy: PromotionPolicy,
    now: NaiveDateTime,
) -> PromotionPlan {
    let mut waitlisted: Vec<&SessionParticipant> = participants
        .iter()
        .filter(|p| p.cancel_state.is_active() && p.status == ParticipantStatus::Waitlisted)
        .collect();
    waitlisted.sort_by_key(|p| p.waitlist_position.unwrap_or(u32::MAX));

    let seated = enrolled_count(participants);
    let open_seats = if session.status == SessionStatus::Scheduled && session.time.start() > now {
        session
            .max_participants
            .map_or(u32::MAX, |limit| limit.saturating_sub(seated))
    } else {
        0
    };

    let promote_count = match policy {
        PromotionPolicy::SingleSeat => open_seats.min(1),
        PromotionPolicy::FillOpenSeats => open_seats,
    };
    let promote_count = usize::try_from(promote_count).unwrap_or(usize::MAX);

    let mut plan = PromotionPlan::default();
    for (index, participant) in waitlisted.iter().enumerate() {
        let Some(id) = participant.participant_id else {
            continue;
        };
        if index < promote_count {
            plan.promote.push(id);
        } else {
            let new_position = u32::try_from(index - promote_count + 1).unwrap_or(u32::MAX);
            if participant.waitlist_position != Some(new_position) {
                plan.reposition.push((id, new_position));
            }
        }
    }
    plan
}

/// Attendance may only be marked while a session is in progress or after
/// it completed.
///
/// # Errors
///
/// Returns `DomainError::AttendanceNotOpen` otherwise.
pub fn ensure_attendance_open(status: SessionStatus) -> Result<(), DomainError> {
    if matches!(
        status,
        SessionStatus::InProgress | SessionStatus::Completed
    ) {
        Ok(())
    } else {
        Err(DomainError::AttendanceNotOpen { status })
    }
}

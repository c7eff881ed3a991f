// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Participant writes: enrollment, cancellation with waitlist
//! promotion, and attendance.

use campus_sched::{
    decide_enrollment, ensure_attendance_open, ensure_not_enrolled, ensure_participant_transition,
    plan_promotion, EnrollmentDecision, PromotionPolicy,
};
use campus_sched_domain::{
    AttendanceStatus, CancelState, DomainError, ParticipantStatus, SessionParticipant,
    SessionStatus,
};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::backend::get_last_insert_rowid;
use crate::data_models::{fmt_datetime, to_i32, NewParticipantRow};
use crate::diesel_schema::session_participants;
use crate::error::PersistenceError;
use crate::queries::participants::{find_active_participant, list_participants};
use crate::queries::sessions::get_session;

/// The result of cancelling a participant: the cancelled row plus any
/// waitlisted participants promoted into the freed seat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelParticipantOutcome {
    /// The cancelled participant row.
    pub participant_id: i64,
    /// Participant IDs promoted `waitlisted -> enrolled` in the same
    /// transaction.
    pub promoted: Vec<i64>,
}

/// Enrolls a student in a session, or waitlists them when the session
/// cannot seat them now.
///
/// The capacity check, the duplicate check, and the insert run in one
/// transaction, so two concurrent requests for the last seat cannot
/// both take it.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist in the program, and
/// a domain error for duplicate enrollments or sessions no longer
/// scheduled.
pub fn enroll_participant(
    conn: &mut SqliteConnection,
    program_id: i64,
    session_id: i64,
    student_id: i64,
    now: NaiveDateTime,
) -> Result<SessionParticipant, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let session = get_session(conn, program_id, session_id)?;
        if session.status != SessionStatus::Scheduled {
            return Err(DomainError::SessionNotOpenForEnrollment {
                status: session.status,
            }
            .into());
        }
        let participants = list_participants(conn, session_id)?;
        ensure_not_enrolled(&participants, session_id, student_id)?;

        let (status, position) = match decide_enrollment(&session, &participants, now) {
            EnrollmentDecision::Enroll => (ParticipantStatus::Enrolled, None),
            EnrollmentDecision::Waitlist { position } => {
                (ParticipantStatus::Waitlisted, Some(position))
            }
        };

        let mut participant = SessionParticipant {
            participant_id: None,
            session_id,
            student_id,
            status,
            waitlist_position: position,
            attendance: None,
            checked_in_at: None,
            checked_out_at: None,
            cancel_state: CancelState::Active,
        };
        let row = NewParticipantRow::from_domain(&participant)?;
        diesel::insert_into(session_participants::table)
            .values(row)
            .execute(conn)?;
        participant.participant_id = Some(get_last_insert_rowid(conn)?);
        info!("Student {student_id} {status} on session {session_id}");
        Ok(participant)
    })
}

/// Cancels a student's enrollment, then promotes and re-compacts the
/// waitlist inside the same transaction.
///
/// # Errors
///
/// Returns `NotFound` if the session or an active participant row does
/// not exist, and a domain error for rows that cannot be cancelled.
#[allow(clippy::too_many_arguments)]
pub fn cancel_participant(
    conn: &mut SqliteConnection,
    program_id: i64,
    session_id: i64,
    student_id: i64,
    reason: &str,
    cancelled_by: &str,
    now: NaiveDateTime,
    policy: PromotionPolicy,
) -> Result<CancelParticipantOutcome, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let session = get_session(conn, program_id, session_id)?;
        let participant =
            find_active_participant(conn, session_id, student_id)?.ok_or_else(|| {
                PersistenceError::NotFound(format!(
                    "active enrollment for student {student_id} on session {session_id}"
                ))
            })?;
        ensure_participant_transition(participant.status, ParticipantStatus::Cancelled)?;
        let participant_id = participant.participant_id.ok_or_else(|| {
            PersistenceError::DatabaseError("participant row without an ID".to_string())
        })?;

        diesel::update(
            session_participants::table
                .filter(session_participants::participant_id.eq(participant_id)),
        )
        .set((
            session_participants::status.eq(ParticipantStatus::Cancelled.as_str()),
            session_participants::waitlist_position.eq(None::<i32>),
            session_participants::cancelled_reason.eq(Some(reason)),
            session_participants::cancelled_by.eq(Some(cancelled_by)),
            session_participants::cancelled_at.eq(Some(fmt_datetime(now))),
        ))
        .execute(conn)?;

        let after = list_participants(conn, session_id)?;
        let plan = plan_promotion(&session, &after, policy, now);
        for promoted_id in &plan.promote {
            diesel::update(
                session_participants::table
                    .filter(session_participants::participant_id.eq(promoted_id)),
            )
            .set((
                session_participants::status.eq(ParticipantStatus::Enrolled.as_str()),
                session_participants::waitlist_position.eq(None::<i32>),
            ))
            .execute(conn)?;
        }
        for (reposition_id, new_position) in &plan.reposition {
            diesel::update(
                session_participants::table
                    .filter(session_participants::participant_id.eq(reposition_id)),
            )
            .set(session_participants::waitlist_position.eq(Some(to_i32(*new_position)?)))
            .execute(conn)?;
        }

        info!(
            "Cancelled enrollment {participant_id} on session {session_id}, promoted {} from waitlist",
            plan.promote.len()
        );
        Ok(CancelParticipantOutcome {
            participant_id,
            promoted: plan.promote,
        })
    })
}

/// Records attendance for a student. `Present` checks an enrolled
/// student in (moving them to `confirmed`); `Absent` on a completed
/// session marks an enrolled student a no-show.
///
/// # Errors
///
/// Returns `NotFound` if the session or an active participant row does
/// not exist, and a domain error when the session has not run yet.
pub fn mark_attendance(
    conn: &mut SqliteConnection,
    program_id: i64,
    session_id: i64,
    student_id: i64,
    attendance: AttendanceStatus,
    now: NaiveDateTime,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let session = get_session(conn, program_id, session_id)?;
        ensure_attendance_open(session.status)?;
        let participant =
            find_active_participant(conn, session_id, student_id)?.ok_or_else(|| {
                PersistenceError::NotFound(format!(
                    "active enrollment for student {student_id} on session {session_id}"
                ))
            })?;
        let participant_id = participant.participant_id.ok_or_else(|| {
            PersistenceError::DatabaseError("participant row without an ID".to_string())
        })?;

        diesel::update(
            session_participants::table
                .filter(session_participants::participant_id.eq(participant_id)),
        )
        .set(session_participants::attendance.eq(Some(attendance.as_str())))
        .execute(conn)?;

        match attendance {
            AttendanceStatus::Present => {
                if participant.status == ParticipantStatus::Enrolled {
                    ensure_participant_transition(
                        participant.status,
                        ParticipantStatus::Confirmed,
                    )?;
                    diesel::update(
                        session_participants::table
                            .filter(session_participants::participant_id.eq(participant_id)),
                    )
                    .set((
                        session_participants::status.eq(ParticipantStatus::Confirmed.as_str()),
                        session_participants::checked_in_at.eq(Some(fmt_datetime(now))),
                    ))
                    .execute(conn)?;
                }
            }
            AttendanceStatus::Absent => {
                if participant.status == ParticipantStatus::Enrolled
                    && session.status == SessionStatus::Completed
                {
                    ensure_participant_transition(participant.status, ParticipantStatus::NoShow)?;
                    diesel::update(
                        session_participants::table
                            .filter(session_participants::participant_id.eq(participant_id)),
                    )
                    .set(session_participants::status.eq(ParticipantStatus::NoShow.as_str()))
                    .execute(conn)?;
                }
            }
        }
        info!("Marked student {student_id} {attendance} on session {session_id}");
        Ok(())
    })
}

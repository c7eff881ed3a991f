// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session writes: creation, reschedules, lifecycle transitions, and
//! bulk cancellations.

use campus_sched_domain::{
    CancelState, DomainError, RecurrenceGroup, ScheduledSession, SessionStatus, TimeRange,
};
use campus_sched::{ensure_cancellable, ensure_session_transition};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::backend::get_last_insert_rowid;
use crate::data_models::{fmt_datetime, NewRecurrenceGroupRow, NewSessionRow, SessionRow};
use crate::diesel_schema::sessions;
use crate::error::PersistenceError;
use crate::queries::sessions::get_session;

/// Inserts a recurrence group and returns its ID.
///
/// # Errors
///
/// Returns an error if the specification cannot be encoded or the
/// insert fails.
pub fn insert_recurrence_group(
    conn: &mut SqliteConnection,
    group: &RecurrenceGroup,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let row = NewRecurrenceGroupRow::from_domain(group)?;
        diesel::insert_into(crate::diesel_schema::recurrence_groups::table)
            .values(row)
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Inserts one session draft and returns its ID.
///
/// The caller has already run conflict checks for the slot.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_session(
    conn: &mut SqliteConnection,
    session: &ScheduledSession,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| insert_session_in_tx(conn, session))
}

/// Inserts a batch of session drafts in one transaction; either every
/// draft lands or none does. Used for all-or-nothing recurring creates.
///
/// # Errors
///
/// Returns an error (and rolls back the batch) if any insert fails.
pub fn insert_sessions(
    conn: &mut SqliteConnection,
    drafts: &[ScheduledSession],
) -> Result<Vec<i64>, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let mut ids = Vec::with_capacity(drafts.len());
        for draft in drafts {
            ids.push(insert_session_in_tx(conn, draft)?);
        }
        Ok(ids)
    })
}

fn insert_session_in_tx(
    conn: &mut SqliteConnection,
    session: &ScheduledSession,
) -> Result<i64, PersistenceError> {
    let row = NewSessionRow::from_domain(session)?;
    diesel::insert_into(sessions::table)
        .values(row)
        .execute(conn)?;
    get_last_insert_rowid(conn)
}

/// Moves a session to a new time window.
///
/// Only still-scheduled sessions can move; the caller has already run
/// conflict checks against the new slot.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist in the program, or
/// a domain error if the session is no longer scheduled.
pub fn update_session_time(
    conn: &mut SqliteConnection,
    program_id: i64,
    session_id: i64,
    new_time: &TimeRange,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let session = get_session(conn, program_id, session_id)?;
        if session.status != SessionStatus::Scheduled {
            return Err(DomainError::SessionNotReschedulable {
                status: session.status,
            }
            .into());
        }
        diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
            .set((
                sessions::start_at.eq(fmt_datetime(new_time.start())),
                sessions::end_at.eq(fmt_datetime(new_time.end())),
            ))
            .execute(conn)?;
        info!("Rescheduled session {session_id} to {new_time}");
        Ok(())
    })
}

/// Applies a lifecycle transition (start, complete) to a session.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist in the program, or
/// a domain error if the transition table forbids the move.
pub fn set_session_status(
    conn: &mut SqliteConnection,
    program_id: i64,
    session_id: i64,
    to: SessionStatus,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let session = get_session(conn, program_id, session_id)?;
        ensure_session_transition(session.status, to)?;
        diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
            .set(sessions::status.eq(to.as_str()))
            .execute(conn)?;
        info!("Session {session_id} moved to '{to}'");
        Ok(())
    })
}

/// Cancels one session, recording the reason, actor, and timestamp.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist in the program, or
/// a domain error if the session is already terminal.
pub fn cancel_session(
    conn: &mut SqliteConnection,
    program_id: i64,
    session_id: i64,
    reason: &str,
    cancelled_by: &str,
    now: NaiveDateTime,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        let session = get_session(conn, program_id, session_id)?;
        ensure_cancellable(session.status)?;
        cancel_session_in_tx(conn, session_id, reason, cancelled_by, now)?;
        info!("Cancelled session {session_id}: {reason}");
        Ok(())
    })
}

/// Cancels every still-cancellable member of a recurrence group in one
/// transaction, skipping members already terminal. Returns the IDs of
/// the sessions actually cancelled.
///
/// # Errors
///
/// Returns an error if the database cannot be updated.
pub fn cancel_group_sessions(
    conn: &mut SqliteConnection,
    program_id: i64,
    group_id: i64,
    reason: &str,
    cancelled_by: &str,
    now: NaiveDateTime,
) -> Result<Vec<i64>, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let members = crate::queries::sessions::group_members(conn, program_id, group_id)?;
        let mut cancelled = Vec::new();
        for member in members {
            if ensure_cancellable(member.status).is_err() {
                continue;
            }
            let Some(session_id) = member.session_id else {
                continue;
            };
            cancel_session_in_tx(conn, session_id, reason, cancelled_by, now)?;
            cancelled.push(session_id);
        }
        info!(
            "Cancelled {} session(s) in recurrence group {group_id}",
            cancelled.len()
        );
        Ok(cancelled)
    })
}

/// Cancels every still-cancellable session starting on a given date at a
/// facility, in one transaction. Used for closure days. Returns the IDs
/// of the sessions actually cancelled.
///
/// # Errors
///
/// Returns an error if the database cannot be queried or updated.
pub fn cancel_facility_day(
    conn: &mut SqliteConnection,
    program_id: i64,
    facility_id: i64,
    date: NaiveDate,
    reason: &str,
    cancelled_by: &str,
    now: NaiveDateTime,
) -> Result<Vec<i64>, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let day_start = fmt_datetime(date.and_time(NaiveTime::MIN));
        let day_end = fmt_datetime(date.succ_opt().unwrap_or(date).and_time(NaiveTime::MIN));
        let rows: Vec<SessionRow> = sessions::table
            .filter(sessions::program_id.eq(program_id))
            .filter(sessions::facility_id.eq(facility_id))
            .filter(sessions::start_at.ge(day_start))
            .filter(sessions::start_at.lt(day_end))
            .order(sessions::start_at.asc())
            .load(conn)?;

        let mut cancelled = Vec::new();
        for row in rows {
            let session = row.into_domain()?;
            if ensure_cancellable(session.status).is_err()
                || !matches!(session.cancel_state, CancelState::Active)
            {
                continue;
            }
            let Some(session_id) = session.session_id else {
                continue;
            };
            cancel_session_in_tx(conn, session_id, reason, cancelled_by, now)?;
            cancelled.push(session_id);
        }
        info!(
            "Closure on {date}: cancelled {} session(s) at facility {facility_id}",
            cancelled.len()
        );
        Ok(cancelled)
    })
}

fn cancel_session_in_tx(
    conn: &mut SqliteConnection,
    session_id: i64,
    reason: &str,
    cancelled_by: &str,
    now: NaiveDateTime,
) -> Result<(), PersistenceError> {
    diesel::update(sessions::table.filter(sessions::session_id.eq(session_id)))
        .set((
            sessions::status.eq(SessionStatus::Cancelled.as_str()),
            sessions::cancelled_reason.eq(Some(reason)),
            sessions::cancelled_by.eq(Some(cancelled_by)),
            sessions::cancelled_at.eq(Some(fmt_datetime(now))),
        ))
        .execute(conn)?;
    Ok(())
}

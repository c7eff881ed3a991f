// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session read queries: lookups, facility listings, overlap windows,
//! and recurrence-group membership.

use campus_sched_domain::{RecurrenceGroup, ScheduledSession, SessionStatus, TimeRange};
use chrono::{NaiveDate, NaiveTime};
use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::{RecurrenceGroupRow, SessionRow, fmt_datetime};
use crate::diesel_schema::{recurrence_groups, session_instructors, sessions};
use crate::error::PersistenceError;

/// Retrieves a session scoped by program.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist in the program.
pub fn get_session(
    conn: &mut SqliteConnection,
    program_id: i64,
    session_id: i64,
) -> Result<ScheduledSession, PersistenceError> {
    let row: SessionRow = sessions::table
        .filter(sessions::session_id.eq(session_id))
        .filter(sessions::program_id.eq(program_id))
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            PersistenceError::NotFound(format!("session {session_id} in program {program_id}"))
        })?;
    row.into_domain()
}

/// Lists sessions at a facility, optionally filtered by date range and
/// status, paginated and ordered by start time.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
#[allow(clippy::too_many_arguments)]
pub fn list_facility_sessions(
    conn: &mut SqliteConnection,
    program_id: i64,
    facility_id: i64,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    status: Option<SessionStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<ScheduledSession>, PersistenceError> {
    let mut query = sessions::table
        .filter(sessions::program_id.eq(program_id))
        .filter(sessions::facility_id.eq(facility_id))
        .into_boxed();

    if let Some(from) = from {
        query = query.filter(sessions::start_at.ge(fmt_datetime(from.and_time(NaiveTime::MIN))));
    }
    if let Some(to) = to {
        // Exclusive upper bound at midnight after the last day.
        let bound = to.succ_opt().unwrap_or(to);
        query = query.filter(sessions::start_at.lt(fmt_datetime(bound.and_time(NaiveTime::MIN))));
    }
    if let Some(status) = status {
        query = query.filter(sessions::status.eq(status.as_str().to_string()));
    }

    let rows: Vec<SessionRow> = query
        .order(sessions::start_at.asc())
        .then_order_by(sessions::session_id.asc())
        .limit(limit)
        .offset(offset)
        .load(conn)?;
    rows.into_iter().map(SessionRow::into_domain).collect()
}

/// Loads the slot-occupying sessions at a facility that overlap a
/// window. The window should already be widened by the facility's
/// buffer when checking spacing. `exclude` drops one session from the
/// result, used when re-checking a time change against itself.
///
/// Cancelled sessions never occupy a slot and are filtered here; the
/// stored ISO text ordering matches chronological ordering, so the
/// half-open overlap test runs directly on the columns.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn sessions_overlapping(
    conn: &mut SqliteConnection,
    program_id: i64,
    facility_id: i64,
    window: &TimeRange,
    exclude: Option<i64>,
) -> Result<Vec<ScheduledSession>, PersistenceError> {
    let mut query = sessions::table
        .filter(sessions::program_id.eq(program_id))
        .filter(sessions::facility_id.eq(facility_id))
        .filter(sessions::status.ne(SessionStatus::Cancelled.as_str()))
        .filter(sessions::start_at.lt(fmt_datetime(window.end())))
        .filter(sessions::end_at.gt(fmt_datetime(window.start())))
        .into_boxed();
    if let Some(exclude) = exclude {
        query = query.filter(sessions::session_id.ne(exclude));
    }
    let rows: Vec<SessionRow> = query.order(sessions::start_at.asc()).load(conn)?;
    rows.into_iter().map(SessionRow::into_domain).collect()
}

/// Loads the busy windows of an instructor overlapping a candidate
/// slot, across all facilities in the program.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn instructor_busy_windows(
    conn: &mut SqliteConnection,
    program_id: i64,
    instructor_id: i64,
    window: &TimeRange,
    exclude_session: Option<i64>,
) -> Result<Vec<TimeRange>, PersistenceError> {
    let session_ids: Vec<i64> = session_instructors::table
        .filter(session_instructors::instructor_id.eq(instructor_id))
        .filter(session_instructors::removed_at.is_null())
        .select(session_instructors::session_id)
        .load(conn)?;
    if session_ids.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = sessions::table
        .filter(sessions::session_id.eq_any(session_ids))
        .filter(sessions::program_id.eq(program_id))
        .filter(sessions::status.ne(SessionStatus::Cancelled.as_str()))
        .filter(sessions::start_at.lt(fmt_datetime(window.end())))
        .filter(sessions::end_at.gt(fmt_datetime(window.start())))
        .into_boxed();
    if let Some(exclude) = exclude_session {
        query = query.filter(sessions::session_id.ne(exclude));
    }

    let rows: Vec<SessionRow> = query.load(conn)?;
    rows.into_iter()
        .map(|row| row.into_domain().map(|s| s.time))
        .collect()
}

/// Lists every session belonging to a recurrence group.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn group_members(
    conn: &mut SqliteConnection,
    program_id: i64,
    group_id: i64,
) -> Result<Vec<ScheduledSession>, PersistenceError> {
    let rows: Vec<SessionRow> = sessions::table
        .filter(sessions::program_id.eq(program_id))
        .filter(sessions::recurrence_group_id.eq(group_id))
        .order(sessions::start_at.asc())
        .load(conn)?;
    rows.into_iter().map(SessionRow::into_domain).collect()
}

/// Retrieves a recurrence group scoped by program.
///
/// # Errors
///
/// Returns `NotFound` if the group does not exist in the program.
pub fn get_recurrence_group(
    conn: &mut SqliteConnection,
    program_id: i64,
    group_id: i64,
) -> Result<RecurrenceGroup, PersistenceError> {
    let row: RecurrenceGroupRow = recurrence_groups::table
        .filter(recurrence_groups::group_id.eq(group_id))
        .filter(recurrence_groups::program_id.eq(program_id))
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            PersistenceError::NotFound(format!(
                "recurrence group {group_id} in program {program_id}"
            ))
        })?;
    row.into_domain()
}

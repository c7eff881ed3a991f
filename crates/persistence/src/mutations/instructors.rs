// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Instructor writes: assignments, removals, confirmations, and
//! availability windows.

use campus_sched::active_primary;
use campus_sched_domain::{
    AssignmentState, DomainError, InstructorAvailability, SessionInstructor,
};
use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::backend::get_last_insert_rowid;
use crate::data_models::{fmt_datetime, NewAssignmentRow, NewAvailabilityRow};
use crate::diesel_schema::{instructor_availability, session_instructors};
use crate::error::PersistenceError;
use crate::queries::instructors::{find_active_assignment, list_assignments};
use crate::queries::sessions::get_session;

/// The result of assigning an instructor: the new assignment row plus
/// the previous primary assignment demoted to make room, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignOutcome {
    /// The new assignment row.
    pub assignment_id: i64,
    /// The assignment that lost its primary flag, if the new one took it.
    pub demoted_assignment_id: Option<i64>,
}

/// Assigns an instructor to a session. Taking the primary flag demotes
/// the current primary in the same transaction, keeping at most one
/// active primary per session.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist in the program, and
/// a domain error if the instructor already has an active assignment.
#[allow(clippy::too_many_arguments)]
pub fn assign_instructor(
    conn: &mut SqliteConnection,
    program_id: i64,
    session_id: i64,
    instructor_id: i64,
    assigned_by: &str,
    is_primary: bool,
    notes: Option<String>,
    now: NaiveDateTime,
) -> Result<AssignOutcome, PersistenceError> {
    conn.immediate_transaction(|conn| {
        get_session(conn, program_id, session_id)?;
        if find_active_assignment(conn, session_id, instructor_id)?.is_some() {
            return Err(DomainError::DuplicateAssignment {
                session_id,
                instructor_id,
            }
            .into());
        }

        let mut demoted_assignment_id = None;
        if is_primary {
            let assignments = list_assignments(conn, session_id)?;
            if let Some(current) = active_primary(&assignments) {
                demoted_assignment_id = current.assignment_id;
                if let Some(current_id) = current.assignment_id {
                    diesel::update(
                        session_instructors::table
                            .filter(session_instructors::assignment_id.eq(current_id)),
                    )
                    .set(session_instructors::is_primary.eq(0))
                    .execute(conn)?;
                }
            }
        }

        let assignment = SessionInstructor {
            assignment_id: None,
            session_id,
            instructor_id,
            assigned_at: now,
            assigned_by: assigned_by.to_string(),
            is_primary,
            is_confirmed: false,
            confirmed_at: None,
            notes,
            state: AssignmentState::Active,
        };
        diesel::insert_into(session_instructors::table)
            .values(NewAssignmentRow::from_domain(&assignment))
            .execute(conn)?;
        let assignment_id = get_last_insert_rowid(conn)?;
        info!(
            "Assigned instructor {instructor_id} to session {session_id} (primary: {is_primary})"
        );
        Ok(AssignOutcome {
            assignment_id,
            demoted_assignment_id,
        })
    })
}

/// Removes an instructor's active assignment, keeping the row for
/// audit.
///
/// # Errors
///
/// Returns `NotFound` if the session or an active assignment does not
/// exist.
pub fn remove_instructor(
    conn: &mut SqliteConnection,
    program_id: i64,
    session_id: i64,
    instructor_id: i64,
    reason: &str,
    removed_by: &str,
    now: NaiveDateTime,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        get_session(conn, program_id, session_id)?;
        let assignment = require_active_assignment(conn, session_id, instructor_id)?;
        let assignment_id = assignment.assignment_id.ok_or_else(|| {
            PersistenceError::DatabaseError("assignment row without an ID".to_string())
        })?;
        diesel::update(
            session_instructors::table
                .filter(session_instructors::assignment_id.eq(assignment_id)),
        )
        .set((
            session_instructors::is_primary.eq(0),
            session_instructors::removed_reason.eq(Some(reason)),
            session_instructors::removed_by.eq(Some(removed_by)),
            session_instructors::removed_at.eq(Some(fmt_datetime(now))),
        ))
        .execute(conn)?;
        info!("Removed instructor {instructor_id} from session {session_id}: {reason}");
        Ok(())
    })
}

/// Marks an instructor's assignment as confirmed. Advisory only.
///
/// # Errors
///
/// Returns `NotFound` if the session or an active assignment does not
/// exist.
pub fn confirm_instructor(
    conn: &mut SqliteConnection,
    program_id: i64,
    session_id: i64,
    instructor_id: i64,
    now: NaiveDateTime,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        get_session(conn, program_id, session_id)?;
        let assignment = require_active_assignment(conn, session_id, instructor_id)?;
        let assignment_id = assignment.assignment_id.ok_or_else(|| {
            PersistenceError::DatabaseError("assignment row without an ID".to_string())
        })?;
        diesel::update(
            session_instructors::table
                .filter(session_instructors::assignment_id.eq(assignment_id)),
        )
        .set((
            session_instructors::is_confirmed.eq(1),
            session_instructors::confirmed_at.eq(Some(fmt_datetime(now))),
        ))
        .execute(conn)?;
        info!("Instructor {instructor_id} confirmed session {session_id}");
        Ok(())
    })
}

/// Inserts an availability window for an instructor and returns its ID.
///
/// # Errors
///
/// Returns a domain error if the shape is malformed, or a database
/// error if the insert fails.
pub fn insert_availability(
    conn: &mut SqliteConnection,
    availability: &InstructorAvailability,
) -> Result<i64, PersistenceError> {
    availability.shape.validate().map_err(PersistenceError::from)?;
    conn.immediate_transaction(|conn| {
        let row = NewAvailabilityRow::from_domain(availability)?;
        diesel::insert_into(instructor_availability::table)
            .values(row)
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

fn require_active_assignment(
    conn: &mut SqliteConnection,
    session_id: i64,
    instructor_id: i64,
) -> Result<SessionInstructor, PersistenceError> {
    find_active_assignment(conn, session_id, instructor_id)?.ok_or_else(|| {
        PersistenceError::NotFound(format!(
            "active assignment for instructor {instructor_id} on session {session_id}"
        ))
    })
}

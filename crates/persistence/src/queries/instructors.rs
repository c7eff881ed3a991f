// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Instructor assignment and availability read queries.

use campus_sched_domain::{InstructorAvailability, SessionInstructor};
use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::{AssignmentRow, AvailabilityRow};
use crate::diesel_schema::{instructor_availability, session_instructors};
use crate::error::PersistenceError;

/// Lists every assignment row for a session, including removed ones,
/// ordered by row ID.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_assignments(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<Vec<SessionInstructor>, PersistenceError> {
    let rows: Vec<AssignmentRow> = session_instructors::table
        .filter(session_instructors::session_id.eq(session_id))
        .order(session_instructors::assignment_id.asc())
        .load(conn)?;
    rows.into_iter().map(AssignmentRow::into_domain).collect()
}

/// Finds the active assignment row for an instructor on a session.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn find_active_assignment(
    conn: &mut SqliteConnection,
    session_id: i64,
    instructor_id: i64,
) -> Result<Option<SessionInstructor>, PersistenceError> {
    let row: Option<AssignmentRow> = session_instructors::table
        .filter(session_instructors::session_id.eq(session_id))
        .filter(session_instructors::instructor_id.eq(instructor_id))
        .filter(session_instructors::removed_at.is_null())
        .first(conn)
        .optional()?;
    row.map(AssignmentRow::into_domain).transpose()
}

/// Lists all availability rows for an instructor in a program,
/// including inactive exception rows.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn instructor_availability(
    conn: &mut SqliteConnection,
    program_id: i64,
    instructor_id: i64,
) -> Result<Vec<InstructorAvailability>, PersistenceError> {
    let rows: Vec<AvailabilityRow> = instructor_availability::table
        .filter(instructor_availability::program_id.eq(program_id))
        .filter(instructor_availability::instructor_id.eq(instructor_id))
        .order(instructor_availability::availability_id.asc())
        .load(conn)?;
    rows.into_iter().map(AvailabilityRow::into_domain).collect()
}

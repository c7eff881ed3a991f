// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Participant read queries.

use campus_sched_domain::SessionParticipant;
use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::ParticipantRow;
use crate::diesel_schema::session_participants;
use crate::error::PersistenceError;

/// Lists every participant row for a session, including cancelled ones,
/// ordered by row ID.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn list_participants(
    conn: &mut SqliteConnection,
    session_id: i64,
) -> Result<Vec<SessionParticipant>, PersistenceError> {
    let rows: Vec<ParticipantRow> = session_participants::table
        .filter(session_participants::session_id.eq(session_id))
        .order(session_participants::participant_id.asc())
        .load(conn)?;
    rows.into_iter().map(ParticipantRow::into_domain).collect()
}

/// Finds the active (non-cancelled) participant row for a student on a
/// session, if one exists.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn find_active_participant(
    conn: &mut SqliteConnection,
    session_id: i64,
    student_id: i64,
) -> Result<Option<SessionParticipant>, PersistenceError> {
    let row: Option<ParticipantRow> = session_participants::table
        .filter(session_participants::session_id.eq(session_id))
        .filter(session_participants::student_id.eq(student_id))
        .filter(session_participants::cancelled_at.is_null())
        .filter(session_participants::status.ne("cancelled"))
        .first(conn)
        .optional()?;
    row.map(ParticipantRow::into_domain).transpose()
}

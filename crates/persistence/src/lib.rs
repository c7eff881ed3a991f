// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

//! SQLite persistence for the scheduling engine.
//!
//! [`Persistence`] owns a single `SQLite` connection and exposes one
//! method per read query and mutating operation. Every mutation runs
//! inside an `immediate_transaction`, so check-then-act sequences
//! (capacity checks, waitlist promotion, primary demotion) are atomic
//! against the single writer.

use campus_sched::PromotionPolicy;
use campus_sched_domain::{
    AttendanceStatus, FacilityScheduleSettings, InstructorAvailability, RecurrenceGroup,
    ScheduledSession, SessionInstructor, SessionParticipant, SessionStatus, TimeRange,
};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::SqliteConnection;
use std::sync::atomic::{AtomicU64, Ordering};

pub mod backend;
pub mod data_models;
pub mod diesel_schema;
pub mod error;
pub mod mutations;
pub mod queries;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::{AssignOutcome, CancelParticipantOutcome};

/// Counter for unique in-memory database names, so concurrent tests do
/// not share state through SQLite's shared cache.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The persistence layer: one connection, one method per operation.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a uniquely named shared in-memory database and runs
    /// migrations. Intended for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or migrations fail.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let url = format!("file:memdb_sched_{db_id}?mode=memory&cache=shared");
        let mut conn = backend::initialize_database(&url)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;
        Ok(Self { conn })
    }

    /// Opens (creating if needed) a file-backed database, runs
    /// migrations, and enables WAL mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection, migrations, or PRAGMA
    /// configuration fail.
    pub fn new_with_file(path: &str) -> Result<Self, PersistenceError> {
        let mut conn = backend::initialize_database(path)?;
        backend::enable_wal_mode(&mut conn)?;
        backend::verify_foreign_key_enforcement(&mut conn)?;
        Ok(Self { conn })
    }

    // ========================================================================
    // Reference entities
    // ========================================================================

    /// Creates a program.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_program(&mut self, name: &str) -> Result<i64, PersistenceError> {
        mutations::refs::create_program(&mut self.conn, name)
    }

    /// Creates a facility.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_facility(
        &mut self,
        program_id: i64,
        name: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::refs::create_facility(&mut self.conn, program_id, name)
    }

    /// Creates a student.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_student(
        &mut self,
        program_id: i64,
        name: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::refs::create_student(&mut self.conn, program_id, name)
    }

    /// Creates an instructor.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_instructor(
        &mut self,
        program_id: i64,
        name: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::refs::create_instructor(&mut self.conn, program_id, name)
    }

    /// Creates a course.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_course(&mut self, program_id: i64, name: &str) -> Result<i64, PersistenceError> {
        mutations::refs::create_course(&mut self.conn, program_id, name)
    }

    /// Upserts a student's course membership.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_course_enrollment(
        &mut self,
        course_id: i64,
        student_id: i64,
        is_active: bool,
    ) -> Result<(), PersistenceError> {
        mutations::refs::set_course_enrollment(&mut self.conn, course_id, student_id, is_active)
    }

    /// Validates that a program exists.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not.
    pub fn require_program(&mut self, program_id: i64) -> Result<(), PersistenceError> {
        queries::refs::require_program(&mut self.conn, program_id)
    }

    /// Validates that a facility exists in the program.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not.
    pub fn require_facility(
        &mut self,
        program_id: i64,
        facility_id: i64,
    ) -> Result<(), PersistenceError> {
        queries::refs::require_facility(&mut self.conn, program_id, facility_id)
    }

    /// Validates that a student exists in the program.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if they do not.
    pub fn require_student(
        &mut self,
        program_id: i64,
        student_id: i64,
    ) -> Result<(), PersistenceError> {
        queries::refs::require_student(&mut self.conn, program_id, student_id)
    }

    /// Validates that an instructor exists in the program.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if they do not.
    pub fn require_instructor(
        &mut self,
        program_id: i64,
        instructor_id: i64,
    ) -> Result<(), PersistenceError> {
        queries::refs::require_instructor(&mut self.conn, program_id, instructor_id)
    }

    /// Validates that a course exists in the program.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if it does not.
    pub fn require_course(
        &mut self,
        program_id: i64,
        course_id: i64,
    ) -> Result<(), PersistenceError> {
        queries::refs::require_course(&mut self.conn, program_id, course_id)
    }

    /// Lists the student IDs actively enrolled in a course.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn active_course_students(
        &mut self,
        course_id: i64,
    ) -> Result<Vec<i64>, PersistenceError> {
        queries::refs::active_course_students(&mut self.conn, course_id)
    }

    // ========================================================================
    // Facility schedule settings
    // ========================================================================

    /// Retrieves a facility's schedule settings.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the facility has no settings row.
    pub fn facility_settings(
        &mut self,
        program_id: i64,
        facility_id: i64,
    ) -> Result<FacilityScheduleSettings, PersistenceError> {
        queries::settings::facility_settings(&mut self.conn, program_id, facility_id)
    }

    /// Replaces a facility's schedule settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings cannot be encoded or written.
    pub fn upsert_facility_settings(
        &mut self,
        settings: &FacilityScheduleSettings,
    ) -> Result<(), PersistenceError> {
        mutations::settings::upsert_facility_settings(&mut self.conn, settings)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Retrieves a session scoped by program.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the session does not exist in the program.
    pub fn get_session(
        &mut self,
        program_id: i64,
        session_id: i64,
    ) -> Result<ScheduledSession, PersistenceError> {
        queries::sessions::get_session(&mut self.conn, program_id, session_id)
    }

    /// Lists sessions at a facility with optional date and status
    /// filters, paginated.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    #[allow(clippy::too_many_arguments)]
    pub fn list_facility_sessions(
        &mut self,
        program_id: i64,
        facility_id: i64,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        status: Option<SessionStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ScheduledSession>, PersistenceError> {
        queries::sessions::list_facility_sessions(
            &mut self.conn,
            program_id,
            facility_id,
            from,
            to,
            status,
            limit,
            offset,
        )
    }

    /// Loads the slot-occupying sessions overlapping a window at a
    /// facility.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn sessions_overlapping(
        &mut self,
        program_id: i64,
        facility_id: i64,
        window: &TimeRange,
        exclude: Option<i64>,
    ) -> Result<Vec<ScheduledSession>, PersistenceError> {
        queries::sessions::sessions_overlapping(
            &mut self.conn,
            program_id,
            facility_id,
            window,
            exclude,
        )
    }

    /// Loads an instructor's busy windows overlapping a candidate slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn instructor_busy_windows(
        &mut self,
        program_id: i64,
        instructor_id: i64,
        window: &TimeRange,
        exclude_session: Option<i64>,
    ) -> Result<Vec<TimeRange>, PersistenceError> {
        queries::sessions::instructor_busy_windows(
            &mut self.conn,
            program_id,
            instructor_id,
            window,
            exclude_session,
        )
    }

    /// Lists the members of a recurrence group, ordered by start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn group_members(
        &mut self,
        program_id: i64,
        group_id: i64,
    ) -> Result<Vec<ScheduledSession>, PersistenceError> {
        queries::sessions::group_members(&mut self.conn, program_id, group_id)
    }

    /// Retrieves a recurrence group scoped by program.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the group does not exist in the program.
    pub fn get_recurrence_group(
        &mut self,
        program_id: i64,
        group_id: i64,
    ) -> Result<RecurrenceGroup, PersistenceError> {
        queries::sessions::get_recurrence_group(&mut self.conn, program_id, group_id)
    }

    /// Inserts a recurrence group and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_recurrence_group(
        &mut self,
        group: &RecurrenceGroup,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::insert_recurrence_group(&mut self.conn, group)
    }

    /// Inserts one session draft and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_session(
        &mut self,
        session: &ScheduledSession,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::insert_session(&mut self.conn, session)
    }

    /// Inserts a batch of session drafts all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns an error (rolling back the batch) if any insert fails.
    pub fn insert_sessions(
        &mut self,
        drafts: &[ScheduledSession],
    ) -> Result<Vec<i64>, PersistenceError> {
        mutations::sessions::insert_sessions(&mut self.conn, drafts)
    }

    /// Moves a still-scheduled session to a new time window.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing session and a domain error for
    /// one no longer scheduled.
    pub fn update_session_time(
        &mut self,
        program_id: i64,
        session_id: i64,
        new_time: &TimeRange,
    ) -> Result<(), PersistenceError> {
        mutations::sessions::update_session_time(&mut self.conn, program_id, session_id, new_time)
    }

    /// Applies a lifecycle transition (start, complete) to a session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing session and a domain error for
    /// a forbidden transition.
    pub fn set_session_status(
        &mut self,
        program_id: i64,
        session_id: i64,
        to: SessionStatus,
    ) -> Result<(), PersistenceError> {
        mutations::sessions::set_session_status(&mut self.conn, program_id, session_id, to)
    }

    /// Cancels one session with audit metadata.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing session and a domain error for
    /// one already terminal.
    pub fn cancel_session(
        &mut self,
        program_id: i64,
        session_id: i64,
        reason: &str,
        cancelled_by: &str,
        now: NaiveDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::sessions::cancel_session(
            &mut self.conn,
            program_id,
            session_id,
            reason,
            cancelled_by,
            now,
        )
    }

    /// Cancels every still-cancellable member of a recurrence group and
    /// returns their IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be updated.
    pub fn cancel_group_sessions(
        &mut self,
        program_id: i64,
        group_id: i64,
        reason: &str,
        cancelled_by: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<i64>, PersistenceError> {
        mutations::sessions::cancel_group_sessions(
            &mut self.conn,
            program_id,
            group_id,
            reason,
            cancelled_by,
            now,
        )
    }

    /// Cancels every still-cancellable session starting on a date at a
    /// facility and returns their IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried or updated.
    #[allow(clippy::too_many_arguments)]
    pub fn cancel_facility_day(
        &mut self,
        program_id: i64,
        facility_id: i64,
        date: NaiveDate,
        reason: &str,
        cancelled_by: &str,
        now: NaiveDateTime,
    ) -> Result<Vec<i64>, PersistenceError> {
        mutations::sessions::cancel_facility_day(
            &mut self.conn,
            program_id,
            facility_id,
            date,
            reason,
            cancelled_by,
            now,
        )
    }

    // ========================================================================
    // Participants
    // ========================================================================

    /// Lists every participant row for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_participants(
        &mut self,
        session_id: i64,
    ) -> Result<Vec<SessionParticipant>, PersistenceError> {
        queries::participants::list_participants(&mut self.conn, session_id)
    }

    /// Finds the active participant row for a student on a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn find_active_participant(
        &mut self,
        session_id: i64,
        student_id: i64,
    ) -> Result<Option<SessionParticipant>, PersistenceError> {
        queries::participants::find_active_participant(&mut self.conn, session_id, student_id)
    }

    /// Enrolls or waitlists a student atomically.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing session and a domain error for
    /// duplicates or sessions no longer scheduled.
    pub fn enroll_participant(
        &mut self,
        program_id: i64,
        session_id: i64,
        student_id: i64,
        now: NaiveDateTime,
    ) -> Result<SessionParticipant, PersistenceError> {
        mutations::participants::enroll_participant(
            &mut self.conn,
            program_id,
            session_id,
            student_id,
            now,
        )
    }

    /// Cancels an enrollment and promotes from the waitlist in the same
    /// transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing session or enrollment and a
    /// domain error for rows that cannot be cancelled.
    #[allow(clippy::too_many_arguments)]
    pub fn cancel_participant(
        &mut self,
        program_id: i64,
        session_id: i64,
        student_id: i64,
        reason: &str,
        cancelled_by: &str,
        now: NaiveDateTime,
        policy: PromotionPolicy,
    ) -> Result<CancelParticipantOutcome, PersistenceError> {
        mutations::participants::cancel_participant(
            &mut self.conn,
            program_id,
            session_id,
            student_id,
            reason,
            cancelled_by,
            now,
            policy,
        )
    }

    /// Records attendance for a student on a running or completed
    /// session.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing session or enrollment and a
    /// domain error when the session has not run yet.
    pub fn mark_attendance(
        &mut self,
        program_id: i64,
        session_id: i64,
        student_id: i64,
        attendance: AttendanceStatus,
        now: NaiveDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::participants::mark_attendance(
            &mut self.conn,
            program_id,
            session_id,
            student_id,
            attendance,
            now,
        )
    }

    // ========================================================================
    // Instructors
    // ========================================================================

    /// Lists every assignment row for a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_assignments(
        &mut self,
        session_id: i64,
    ) -> Result<Vec<SessionInstructor>, PersistenceError> {
        queries::instructors::list_assignments(&mut self.conn, session_id)
    }

    /// Finds the active assignment row for an instructor on a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn find_active_assignment(
        &mut self,
        session_id: i64,
        instructor_id: i64,
    ) -> Result<Option<SessionInstructor>, PersistenceError> {
        queries::instructors::find_active_assignment(&mut self.conn, session_id, instructor_id)
    }

    /// Lists an instructor's availability rows, including inactive
    /// exception rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn instructor_availability(
        &mut self,
        program_id: i64,
        instructor_id: i64,
    ) -> Result<Vec<InstructorAvailability>, PersistenceError> {
        queries::instructors::instructor_availability(&mut self.conn, program_id, instructor_id)
    }

    /// Assigns an instructor, demoting the current primary if the new
    /// assignment takes the flag.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing session and a domain error for
    /// duplicate assignments.
    #[allow(clippy::too_many_arguments)]
    pub fn assign_instructor(
        &mut self,
        program_id: i64,
        session_id: i64,
        instructor_id: i64,
        assigned_by: &str,
        is_primary: bool,
        notes: Option<String>,
        now: NaiveDateTime,
    ) -> Result<AssignOutcome, PersistenceError> {
        mutations::instructors::assign_instructor(
            &mut self.conn,
            program_id,
            session_id,
            instructor_id,
            assigned_by,
            is_primary,
            notes,
            now,
        )
    }

    /// Removes an instructor's active assignment, keeping the row for
    /// audit.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing session or assignment.
    #[allow(clippy::too_many_arguments)]
    pub fn remove_instructor(
        &mut self,
        program_id: i64,
        session_id: i64,
        instructor_id: i64,
        reason: &str,
        removed_by: &str,
        now: NaiveDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::instructors::remove_instructor(
            &mut self.conn,
            program_id,
            session_id,
            instructor_id,
            reason,
            removed_by,
            now,
        )
    }

    /// Marks an instructor's assignment as confirmed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a missing session or assignment.
    pub fn confirm_instructor(
        &mut self,
        program_id: i64,
        session_id: i64,
        instructor_id: i64,
        now: NaiveDateTime,
    ) -> Result<(), PersistenceError> {
        mutations::instructors::confirm_instructor(
            &mut self.conn,
            program_id,
            session_id,
            instructor_id,
            now,
        )
    }

    /// Inserts an availability window for an instructor.
    ///
    /// # Errors
    ///
    /// Returns a domain error for malformed windows and a database
    /// error if the insert fails.
    pub fn insert_availability(
        &mut self,
        availability: &InstructorAvailability,
    ) -> Result<i64, PersistenceError> {
        mutations::instructors::insert_availability(&mut self.conn, availability)
    }
}

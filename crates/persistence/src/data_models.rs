// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row structs mapping database tables to domain entities.
//!
//! Timestamps and dates are stored as ISO 8601 text. Structured blobs
//! (weekly hours, recurrence specifications, availability shapes,
//! closure calendars) are stored as JSON text columns.

use campus_sched_domain::{
    AssignmentState, AvailabilityShape, CancelState, FacilityScheduleSettings,
    InstructorAvailability, RecurrenceGroup, RecurrenceSpec, ScheduledSession, SessionInstructor,
    SessionParticipant, TimeRange,
};
use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;

use crate::diesel_schema::{
    facility_schedule_settings, instructor_availability, recurrence_groups, session_instructors,
    session_participants, sessions,
};
use crate::error::PersistenceError;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Formats a timestamp for storage. The fixed-width ISO format keeps
/// lexicographic and chronological ordering identical, which the
/// overlap queries rely on.
#[must_use]
pub fn fmt_datetime(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns a serialization error for malformed values.
pub fn parse_datetime(value: &str) -> Result<NaiveDateTime, PersistenceError> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(format!("bad timestamp '{value}': {e}")))
}

/// Formats a date for storage.
#[must_use]
pub fn fmt_date(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

/// Parses a stored date.
///
/// # Errors
///
/// Returns a serialization error for malformed values.
pub fn parse_date(value: &str) -> Result<NaiveDate, PersistenceError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|e| PersistenceError::SerializationError(format!("bad date '{value}': {e}")))
}

fn parse_opt_datetime(value: Option<&str>) -> Result<Option<NaiveDateTime>, PersistenceError> {
    value.map(parse_datetime).transpose()
}

fn parse_opt_date(value: Option<&str>) -> Result<Option<NaiveDate>, PersistenceError> {
    value.map(parse_date).transpose()
}

fn to_u32(value: i32) -> Result<u32, PersistenceError> {
    u32::try_from(value)
        .map_err(|_| PersistenceError::SerializationError(format!("negative count {value}")))
}

pub(crate) fn to_i32(value: u32) -> Result<i32, PersistenceError> {
    i32::try_from(value)
        .map_err(|_| PersistenceError::SerializationError(format!("count {value} out of range")))
}

fn cancel_state_from_columns(
    reason: Option<String>,
    by: Option<String>,
    at: Option<String>,
) -> Result<CancelState, PersistenceError> {
    match at {
        None => Ok(CancelState::Active),
        Some(at) => Ok(CancelState::Cancelled {
            reason: reason.unwrap_or_default(),
            cancelled_by: by.unwrap_or_default(),
            cancelled_at: parse_datetime(&at)?,
        }),
    }
}

fn cancel_state_to_columns(
    state: &CancelState,
) -> (Option<String>, Option<String>, Option<String>) {
    match state {
        CancelState::Active => (None, None, None),
        CancelState::Cancelled {
            reason,
            cancelled_by,
            cancelled_at,
        } => (
            Some(reason.clone()),
            Some(cancelled_by.clone()),
            Some(fmt_datetime(*cancelled_at)),
        ),
    }
}

// ============================================================================
// Sessions
// ============================================================================

#[derive(Debug, Queryable)]
pub struct SessionRow {
    pub session_id: i64,
    pub program_id: i64,
    pub facility_id: i64,
    pub course_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub start_at: String,
    pub end_at: String,
    pub recurrence_group_id: Option<i64>,
    pub status: String,
    pub max_participants: Option<i32>,
    pub skill_level: Option<String>,
    pub cancelled_reason: Option<String>,
    pub cancelled_by: Option<String>,
    pub cancelled_at: Option<String>,
}

impl SessionRow {
    /// Converts a stored row back into the domain entity.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if stored enums or timestamps are
    /// malformed.
    pub fn into_domain(self) -> Result<ScheduledSession, PersistenceError> {
        let time = TimeRange::new(parse_datetime(&self.start_at)?, parse_datetime(&self.end_at)?)
            .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
        Ok(ScheduledSession {
            session_id: Some(self.session_id),
            program_id: self.program_id,
            facility_id: self.facility_id,
            course_id: self.course_id,
            title: self.title,
            description: self.description,
            kind: self
                .kind
                .parse()
                .map_err(|e: campus_sched_domain::DomainError| {
                    PersistenceError::SerializationError(e.to_string())
                })?,
            time,
            recurrence_group_id: self.recurrence_group_id,
            status: self
                .status
                .parse()
                .map_err(|e: campus_sched_domain::DomainError| {
                    PersistenceError::SerializationError(e.to_string())
                })?,
            max_participants: self.max_participants.map(to_u32).transpose()?,
            skill_level: self.skill_level,
            cancel_state: cancel_state_from_columns(
                self.cancelled_reason,
                self.cancelled_by,
                self.cancelled_at,
            )?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSessionRow {
    pub program_id: i64,
    pub facility_id: i64,
    pub course_id: Option<i64>,
    pub title: String,
    pub description: Option<String>,
    pub kind: String,
    pub start_at: String,
    pub end_at: String,
    pub recurrence_group_id: Option<i64>,
    pub status: String,
    pub max_participants: Option<i32>,
    pub skill_level: Option<String>,
    pub cancelled_reason: Option<String>,
    pub cancelled_by: Option<String>,
    pub cancelled_at: Option<String>,
}

impl NewSessionRow {
    /// Builds an insertable row from a domain draft.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if counts are out of column range.
    pub fn from_domain(session: &ScheduledSession) -> Result<Self, PersistenceError> {
        let (cancelled_reason, cancelled_by, cancelled_at) =
            cancel_state_to_columns(&session.cancel_state);
        Ok(Self {
            program_id: session.program_id,
            facility_id: session.facility_id,
            course_id: session.course_id,
            title: session.title.clone(),
            description: session.description.clone(),
            kind: session.kind.as_str().to_string(),
            start_at: fmt_datetime(session.time.start()),
            end_at: fmt_datetime(session.time.end()),
            recurrence_group_id: session.recurrence_group_id,
            status: session.status.as_str().to_string(),
            max_participants: session.max_participants.map(to_i32).transpose()?,
            skill_level: session.skill_level.clone(),
            cancelled_reason,
            cancelled_by,
            cancelled_at,
        })
    }
}

// ============================================================================
// Participants
// ============================================================================

#[derive(Debug, Queryable)]
pub struct ParticipantRow {
    pub participant_id: i64,
    pub session_id: i64,
    pub student_id: i64,
    pub status: String,
    pub waitlist_position: Option<i32>,
    pub attendance: Option<String>,
    pub checked_in_at: Option<String>,
    pub checked_out_at: Option<String>,
    pub cancelled_reason: Option<String>,
    pub cancelled_by: Option<String>,
    pub cancelled_at: Option<String>,
}

impl ParticipantRow {
    /// Converts a stored row back into the domain entity.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if stored enums or timestamps are
    /// malformed.
    pub fn into_domain(self) -> Result<SessionParticipant, PersistenceError> {
        Ok(SessionParticipant {
            participant_id: Some(self.participant_id),
            session_id: self.session_id,
            student_id: self.student_id,
            status: self
                .status
                .parse()
                .map_err(|e: campus_sched_domain::DomainError| {
                    PersistenceError::SerializationError(e.to_string())
                })?,
            waitlist_position: self.waitlist_position.map(to_u32).transpose()?,
            attendance: self
                .attendance
                .as_deref()
                .map(str::parse)
                .transpose()
                .map_err(|e: campus_sched_domain::DomainError| {
                    PersistenceError::SerializationError(e.to_string())
                })?,
            checked_in_at: parse_opt_datetime(self.checked_in_at.as_deref())?,
            checked_out_at: parse_opt_datetime(self.checked_out_at.as_deref())?,
            cancel_state: cancel_state_from_columns(
                self.cancelled_reason,
                self.cancelled_by,
                self.cancelled_at,
            )?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = session_participants)]
pub struct NewParticipantRow {
    pub session_id: i64,
    pub student_id: i64,
    pub status: String,
    pub waitlist_position: Option<i32>,
    pub attendance: Option<String>,
    pub checked_in_at: Option<String>,
    pub checked_out_at: Option<String>,
    pub cancelled_reason: Option<String>,
    pub cancelled_by: Option<String>,
    pub cancelled_at: Option<String>,
}

impl NewParticipantRow {
    /// Builds an insertable row from a domain entity.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if counts are out of column range.
    pub fn from_domain(participant: &SessionParticipant) -> Result<Self, PersistenceError> {
        let (cancelled_reason, cancelled_by, cancelled_at) =
            cancel_state_to_columns(&participant.cancel_state);
        Ok(Self {
            session_id: participant.session_id,
            student_id: participant.student_id,
            status: participant.status.as_str().to_string(),
            waitlist_position: participant.waitlist_position.map(to_i32).transpose()?,
            attendance: participant.attendance.map(|a| a.as_str().to_string()),
            checked_in_at: participant.checked_in_at.map(fmt_datetime),
            checked_out_at: participant.checked_out_at.map(fmt_datetime),
            cancelled_reason,
            cancelled_by,
            cancelled_at,
        })
    }
}

// ============================================================================
// Instructor assignments
// ============================================================================

#[derive(Debug, Queryable)]
pub struct AssignmentRow {
    pub assignment_id: i64,
    pub session_id: i64,
    pub instructor_id: i64,
    pub assigned_at: String,
    pub assigned_by: String,
    pub is_primary: i32,
    pub is_confirmed: i32,
    pub confirmed_at: Option<String>,
    pub notes: Option<String>,
    pub removed_reason: Option<String>,
    pub removed_by: Option<String>,
    pub removed_at: Option<String>,
}

impl AssignmentRow {
    /// Converts a stored row back into the domain entity.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if stored timestamps are malformed.
    pub fn into_domain(self) -> Result<SessionInstructor, PersistenceError> {
        let state = match self.removed_at {
            None => AssignmentState::Active,
            Some(at) => AssignmentState::Removed {
                reason: self.removed_reason.unwrap_or_default(),
                removed_by: self.removed_by.unwrap_or_default(),
                removed_at: parse_datetime(&at)?,
            },
        };
        Ok(SessionInstructor {
            assignment_id: Some(self.assignment_id),
            session_id: self.session_id,
            instructor_id: self.instructor_id,
            assigned_at: parse_datetime(&self.assigned_at)?,
            assigned_by: self.assigned_by,
            is_primary: self.is_primary != 0,
            is_confirmed: self.is_confirmed != 0,
            confirmed_at: parse_opt_datetime(self.confirmed_at.as_deref())?,
            notes: self.notes,
            state,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = session_instructors)]
pub struct NewAssignmentRow {
    pub session_id: i64,
    pub instructor_id: i64,
    pub assigned_at: String,
    pub assigned_by: String,
    pub is_primary: i32,
    pub is_confirmed: i32,
    pub confirmed_at: Option<String>,
    pub notes: Option<String>,
}

impl NewAssignmentRow {
    #[must_use]
    pub fn from_domain(assignment: &SessionInstructor) -> Self {
        Self {
            session_id: assignment.session_id,
            instructor_id: assignment.instructor_id,
            assigned_at: fmt_datetime(assignment.assigned_at),
            assigned_by: assignment.assigned_by.clone(),
            is_primary: i32::from(assignment.is_primary),
            is_confirmed: i32::from(assignment.is_confirmed),
            confirmed_at: assignment.confirmed_at.map(fmt_datetime),
            notes: assignment.notes.clone(),
        }
    }
}

// ============================================================================
// Instructor availability
// ============================================================================

#[derive(Debug, Queryable)]
pub struct AvailabilityRow {
    pub availability_id: i64,
    pub instructor_id: i64,
    pub program_id: i64,
    pub facility_id: Option<i64>,
    pub shape_json: String,
    pub is_active: i32,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    pub is_exception: i32,
    pub exception_reason: Option<String>,
    pub max_concurrent_sessions: Option<i32>,
}

impl AvailabilityRow {
    /// Converts a stored row back into the domain entity.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the shape JSON or dates are
    /// malformed.
    pub fn into_domain(self) -> Result<InstructorAvailability, PersistenceError> {
        let shape: AvailabilityShape = serde_json::from_str(&self.shape_json)?;
        Ok(InstructorAvailability {
            availability_id: Some(self.availability_id),
            instructor_id: self.instructor_id,
            program_id: self.program_id,
            facility_id: self.facility_id,
            shape,
            is_active: self.is_active != 0,
            valid_from: parse_opt_date(self.valid_from.as_deref())?,
            valid_until: parse_opt_date(self.valid_until.as_deref())?,
            is_exception: self.is_exception != 0,
            exception_reason: self.exception_reason,
            max_concurrent_sessions: self.max_concurrent_sessions.map(to_u32).transpose()?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = instructor_availability)]
pub struct NewAvailabilityRow {
    pub instructor_id: i64,
    pub program_id: i64,
    pub facility_id: Option<i64>,
    pub shape_json: String,
    pub is_active: i32,
    pub valid_from: Option<String>,
    pub valid_until: Option<String>,
    pub is_exception: i32,
    pub exception_reason: Option<String>,
    pub max_concurrent_sessions: Option<i32>,
}

impl NewAvailabilityRow {
    /// Builds an insertable row from a domain entity.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the shape cannot be encoded.
    pub fn from_domain(row: &InstructorAvailability) -> Result<Self, PersistenceError> {
        Ok(Self {
            instructor_id: row.instructor_id,
            program_id: row.program_id,
            facility_id: row.facility_id,
            shape_json: serde_json::to_string(&row.shape)?,
            is_active: i32::from(row.is_active),
            valid_from: row.valid_from.map(fmt_date),
            valid_until: row.valid_until.map(fmt_date),
            is_exception: i32::from(row.is_exception),
            exception_reason: row.exception_reason.clone(),
            max_concurrent_sessions: row.max_concurrent_sessions.map(to_i32).transpose()?,
        })
    }
}

// ============================================================================
// Facility schedule settings
// ============================================================================

#[derive(Debug, Queryable)]
pub struct SettingsRow {
    pub settings_id: i64,
    pub facility_id: i64,
    pub program_id: i64,
    pub weekly_hours_json: String,
    pub booking_advance_days: i32,
    pub booking_cutoff_hours: i32,
    pub cancellation_cutoff_hours: i32,
    pub max_concurrent_sessions: i32,
    pub setup_buffer_minutes: i32,
    pub cleanup_buffer_minutes: i32,
    pub default_max_participants: Option<i32>,
    pub kind_max_participants_json: String,
    pub requires_equipment_setup: i32,
    pub equipment_setup_minutes: i32,
    pub closure_dates_json: String,
}

impl SettingsRow {
    /// Converts a stored row back into the domain entity.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if JSON blobs or counts are
    /// malformed.
    pub fn into_domain(self) -> Result<FacilityScheduleSettings, PersistenceError> {
        Ok(FacilityScheduleSettings {
            facility_id: self.facility_id,
            program_id: self.program_id,
            weekly_hours: serde_json::from_str(&self.weekly_hours_json)?,
            booking_advance_days: to_u32(self.booking_advance_days)?,
            booking_cutoff_hours: to_u32(self.booking_cutoff_hours)?,
            cancellation_cutoff_hours: to_u32(self.cancellation_cutoff_hours)?,
            max_concurrent_sessions: to_u32(self.max_concurrent_sessions)?,
            setup_buffer_minutes: to_u32(self.setup_buffer_minutes)?,
            cleanup_buffer_minutes: to_u32(self.cleanup_buffer_minutes)?,
            default_max_participants: self.default_max_participants.map(to_u32).transpose()?,
            kind_max_participants: serde_json::from_str(&self.kind_max_participants_json)?,
            requires_equipment_setup: self.requires_equipment_setup != 0,
            equipment_setup_minutes: to_u32(self.equipment_setup_minutes)?,
            closure_dates: serde_json::from_str(&self.closure_dates_json)?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = facility_schedule_settings)]
pub struct NewSettingsRow {
    pub facility_id: i64,
    pub program_id: i64,
    pub weekly_hours_json: String,
    pub booking_advance_days: i32,
    pub booking_cutoff_hours: i32,
    pub cancellation_cutoff_hours: i32,
    pub max_concurrent_sessions: i32,
    pub setup_buffer_minutes: i32,
    pub cleanup_buffer_minutes: i32,
    pub default_max_participants: Option<i32>,
    pub kind_max_participants_json: String,
    pub requires_equipment_setup: i32,
    pub equipment_setup_minutes: i32,
    pub closure_dates_json: String,
}

impl NewSettingsRow {
    /// Builds an insertable row from a domain entity.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if JSON encoding fails or counts
    /// are out of column range.
    pub fn from_domain(settings: &FacilityScheduleSettings) -> Result<Self, PersistenceError> {
        Ok(Self {
            facility_id: settings.facility_id,
            program_id: settings.program_id,
            weekly_hours_json: serde_json::to_string(&settings.weekly_hours)?,
            booking_advance_days: to_i32(settings.booking_advance_days)?,
            booking_cutoff_hours: to_i32(settings.booking_cutoff_hours)?,
            cancellation_cutoff_hours: to_i32(settings.cancellation_cutoff_hours)?,
            max_concurrent_sessions: to_i32(settings.max_concurrent_sessions)?,
            setup_buffer_minutes: to_i32(settings.setup_buffer_minutes)?,
            cleanup_buffer_minutes: to_i32(settings.cleanup_buffer_minutes)?,
            default_max_participants: settings.default_max_participants.map(to_i32).transpose()?,
            kind_max_participants_json: serde_json::to_string(&settings.kind_max_participants)?,
            requires_equipment_setup: i32::from(settings.requires_equipment_setup),
            equipment_setup_minutes: to_i32(settings.equipment_setup_minutes)?,
            closure_dates_json: serde_json::to_string(&settings.closure_dates)?,
        })
    }
}

// ============================================================================
// Recurrence groups
// ============================================================================

#[derive(Debug, Queryable)]
pub struct RecurrenceGroupRow {
    pub group_id: i64,
    pub program_id: i64,
    pub spec_json: String,
}

impl RecurrenceGroupRow {
    /// Converts a stored row back into the domain aggregate.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the specification JSON is
    /// malformed.
    pub fn into_domain(self) -> Result<RecurrenceGroup, PersistenceError> {
        let spec: RecurrenceSpec = serde_json::from_str(&self.spec_json)?;
        Ok(RecurrenceGroup::with_id(
            self.group_id,
            self.program_id,
            spec,
        ))
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = recurrence_groups)]
pub struct NewRecurrenceGroupRow {
    pub program_id: i64,
    pub spec_json: String,
}

impl NewRecurrenceGroupRow {
    /// Builds an insertable row from a domain aggregate.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the specification cannot be
    /// encoded.
    pub fn from_domain(group: &RecurrenceGroup) -> Result<Self, PersistenceError> {
        Ok(Self {
            program_id: group.program_id,
            spec_json: serde_json::to_string(&group.spec)?,
        })
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response DTOs for the API layer.
//!
//! Timestamps are ISO 8601 (`2026-06-01T10:00:00`), dates `2026-06-01`.
//! Bulk responses always enumerate failed sub-items with a machine
//! reason code plus a human message.

use campus_sched::PromotionPolicy;
use campus_sched_domain::{
    AttendanceStatus, ParticipantStatus, RecurrenceSpec, ScheduledSession, SessionInstructor,
    SessionKind, SessionParticipant, SessionStatus,
};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ============================================================================
// Session creation
// ============================================================================

/// Request to create a single or recurring session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionRequest {
    /// The program scope.
    pub program_id: i64,
    /// The facility to book.
    pub facility_id: i64,
    /// Optional course reference, for tagging only.
    #[serde(default)]
    pub course_id: Option<i64>,
    /// Session title.
    pub title: String,
    /// Optional longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// The session kind.
    pub kind: SessionKind,
    /// Start of the first occurrence.
    pub start_at: NaiveDateTime,
    /// End of the first occurrence.
    pub end_at: NaiveDateTime,
    /// Optional participant limit. Falls back to the facility's default
    /// for the kind when unset.
    #[serde(default)]
    pub max_participants: Option<u32>,
    /// Free-form skill level tag.
    #[serde(default)]
    pub skill_level: Option<String>,
    /// Recurrence specification. Absent means a single session.
    #[serde(default)]
    pub recurrence: Option<RecurrenceSpec>,
    /// All-or-nothing mode for recurring creation: any conflicting draft
    /// fails the whole request instead of being skipped.
    #[serde(default)]
    pub atomic: bool,
}

/// One draft the creation flow declined, with its reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RejectedDraft {
    /// The draft's intended start.
    pub start_at: NaiveDateTime,
    /// The draft's intended end.
    pub end_at: NaiveDateTime,
    /// Machine-readable reason code.
    pub reason: String,
    /// Human-readable explanation.
    pub message: String,
    /// The session the draft clashed with, when one exists.
    pub conflicting_session_id: Option<i64>,
}

/// Response to session creation: what landed and what was declined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    /// The sessions actually created.
    pub created: Vec<SessionSummary>,
    /// Drafts declined with reasons.
    pub rejected: Vec<RejectedDraft>,
    /// The recurrence group the created sessions belong to, if recurring.
    pub recurrence_group_id: Option<i64>,
}

// ============================================================================
// Session reads
// ============================================================================

/// A session in listing responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    /// The session identifier.
    pub session_id: i64,
    /// The facility the session occupies.
    pub facility_id: i64,
    /// Session title.
    pub title: String,
    /// The session kind.
    pub kind: SessionKind,
    /// Start timestamp.
    pub start_at: NaiveDateTime,
    /// End timestamp.
    pub end_at: NaiveDateTime,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// The recurrence group, if any.
    pub recurrence_group_id: Option<i64>,
    /// Participant limit, if any.
    pub max_participants: Option<u32>,
}

impl SessionSummary {
    /// Builds a summary from a persisted session.
    ///
    /// Sessions loaded from storage always carry an ID; an unpersisted
    /// draft summarizes with ID 0, which no caller should ever see.
    #[must_use]
    pub fn from_session(session: &ScheduledSession) -> Self {
        Self {
            session_id: session.session_id.unwrap_or_default(),
            facility_id: session.facility_id,
            title: session.title.clone(),
            kind: session.kind,
            start_at: session.time.start(),
            end_at: session.time.end(),
            status: session.status,
            recurrence_group_id: session.recurrence_group_id,
            max_participants: session.max_participants,
        }
    }
}

/// One participant row in a session detail response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantView {
    /// The participant row identifier.
    pub participant_id: i64,
    /// The student.
    pub student_id: i64,
    /// Enrollment status.
    pub status: ParticipantStatus,
    /// Waitlist position, when waitlisted.
    pub waitlist_position: Option<u32>,
    /// Recorded attendance, if any.
    pub attendance: Option<AttendanceStatus>,
}

impl ParticipantView {
    /// Builds a view from a persisted participant row.
    #[must_use]
    pub fn from_participant(participant: &SessionParticipant) -> Self {
        Self {
            participant_id: participant.participant_id.unwrap_or_default(),
            student_id: participant.student_id,
            status: participant.status,
            waitlist_position: participant.waitlist_position,
            attendance: participant.attendance,
        }
    }
}

/// One instructor assignment in a session detail response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstructorView {
    /// The assignment row identifier.
    pub assignment_id: i64,
    /// The instructor.
    pub instructor_id: i64,
    /// Whether this is the primary instructor.
    pub is_primary: bool,
    /// Whether the instructor confirmed the assignment.
    pub is_confirmed: bool,
    /// Whether the assignment is still active.
    pub is_active: bool,
}

impl InstructorView {
    /// Builds a view from a persisted assignment row.
    #[must_use]
    pub fn from_assignment(assignment: &SessionInstructor) -> Self {
        Self {
            assignment_id: assignment.assignment_id.unwrap_or_default(),
            instructor_id: assignment.instructor_id,
            is_primary: assignment.is_primary,
            is_confirmed: assignment.is_confirmed,
            is_active: assignment.state.is_active(),
        }
    }
}

/// Full session detail: the session plus its roster and staff.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDetailResponse {
    /// The session.
    pub session: SessionSummary,
    /// Optional course reference.
    pub course_id: Option<i64>,
    /// Optional longer description.
    pub description: Option<String>,
    /// Free-form skill level tag.
    pub skill_level: Option<String>,
    /// Every participant row, including cancelled ones.
    pub participants: Vec<ParticipantView>,
    /// Every assignment row, including removed ones.
    pub instructors: Vec<InstructorView>,
}

/// Filters for the facility session listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListSessionsQuery {
    /// The program scope.
    pub program_id: i64,
    /// Earliest session date to include.
    #[serde(default)]
    pub from: Option<NaiveDate>,
    /// Latest session date to include.
    #[serde(default)]
    pub to: Option<NaiveDate>,
    /// Only sessions in this status.
    #[serde(default)]
    pub status: Option<SessionStatus>,
    /// Page size. Defaults to 50.
    #[serde(default)]
    pub limit: Option<i64>,
    /// Page offset. Defaults to 0.
    #[serde(default)]
    pub offset: Option<i64>,
}

// ============================================================================
// Time changes and lifecycle
// ============================================================================

/// Request to move a session to a new time window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTimeRequest {
    /// The program scope.
    pub program_id: i64,
    /// New start timestamp.
    pub start_at: NaiveDateTime,
    /// New end timestamp.
    pub end_at: NaiveDateTime,
    /// Apply the same start delta to every still-scheduled member of the
    /// session's recurrence group.
    #[serde(default)]
    pub apply_to_all_recurring: bool,
}

/// One group member the shift skipped, with its reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkippedMember {
    /// The skipped session.
    pub session_id: i64,
    /// Machine-readable reason code.
    pub reason: String,
    /// Human-readable explanation.
    pub message: String,
}

/// Response to a time change: who moved, who was skipped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTimeResponse {
    /// Session IDs that moved.
    pub updated: Vec<i64>,
    /// Group members skipped with reasons.
    pub skipped: Vec<SkippedMember>,
}

/// Request to cancel a session (or its whole recurrence group).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelSessionRequest {
    /// The program scope.
    pub program_id: i64,
    /// The stated reason.
    pub reason: String,
    /// The actor cancelling.
    pub cancelled_by: String,
    /// Cancel every non-terminal member of the session's group.
    #[serde(default)]
    pub cancel_all_recurring: bool,
}

/// Response naming the sessions that were cancelled.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelSessionResponse {
    /// The cancelled session IDs.
    pub cancelled: Vec<i64>,
}

/// Request carrying only a program scope, for bare transitions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgramScoped {
    /// The program scope.
    pub program_id: i64,
}

/// Request to cancel every session on one date at a facility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelDayRequest {
    /// The program scope.
    pub program_id: i64,
    /// The date to clear.
    pub date: NaiveDate,
    /// The stated reason.
    pub reason: String,
    /// The actor cancelling.
    pub cancelled_by: String,
}

// ============================================================================
// Participants
// ============================================================================

/// Request to enroll a list of students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddParticipantsRequest {
    /// The program scope.
    pub program_id: i64,
    /// The students to enroll.
    pub student_ids: Vec<i64>,
}

/// One successfully processed student in a bulk participant response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantOutcome {
    /// The student.
    pub student_id: i64,
    /// The status the student landed in.
    pub status: ParticipantStatus,
    /// Waitlist position, when waitlisted.
    pub waitlist_position: Option<u32>,
}

/// One failed sub-item in a bulk response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailedItem {
    /// The student the failure applies to.
    pub student_id: i64,
    /// Machine-readable reason code.
    pub reason: String,
    /// Human-readable explanation.
    pub message: String,
}

/// Response to a bulk participant operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkParticipantResponse {
    /// Students processed successfully.
    pub succeeded: Vec<ParticipantOutcome>,
    /// Students that failed, with reasons.
    pub failed: Vec<FailedItem>,
    /// Participant IDs promoted from the waitlist as a side effect.
    pub promoted: Vec<i64>,
}

/// Request to remove (cancel) a list of enrollments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveParticipantsRequest {
    /// The program scope.
    pub program_id: i64,
    /// The students to remove.
    pub student_ids: Vec<i64>,
    /// The stated reason.
    pub reason: String,
    /// The actor removing.
    pub cancelled_by: String,
    /// How many waitlisted participants each freed seat promotes.
    #[serde(default)]
    pub promotion_policy: PromotionPolicy,
}

/// One attendance entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceEntry {
    /// The student.
    pub student_id: i64,
    /// The attendance to record.
    pub attendance: AttendanceStatus,
}

/// Request to mark attendance for a list of students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceRequest {
    /// The program scope.
    pub program_id: i64,
    /// The entries to record.
    pub entries: Vec<AttendanceEntry>,
}

// ============================================================================
// Instructors
// ============================================================================

/// Request to assign an instructor to a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignInstructorRequest {
    /// The program scope.
    pub program_id: i64,
    /// The instructor to assign.
    pub instructor_id: i64,
    /// The actor assigning.
    pub assigned_by: String,
    /// Whether this assignment takes the primary flag.
    #[serde(default)]
    pub is_primary: bool,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
    /// Override an advisory availability-coverage failure. Hard
    /// instructor time overlaps cannot be forced.
    #[serde(default)]
    pub force: bool,
}

/// Response to an instructor assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignInstructorResponse {
    /// The new assignment row.
    pub assignment_id: i64,
    /// The assignment demoted from primary, if any.
    pub demoted_assignment_id: Option<i64>,
    /// Advisory warning when the assignment was forced past an
    /// availability-coverage failure.
    pub warning: Option<String>,
}

/// Request to remove an instructor from a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveInstructorRequest {
    /// The program scope.
    pub program_id: i64,
    /// The instructor to remove.
    pub instructor_id: i64,
    /// The stated reason.
    pub reason: String,
    /// The actor removing.
    pub removed_by: String,
}

/// Request to confirm an instructor's assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmInstructorRequest {
    /// The program scope.
    pub program_id: i64,
    /// The instructor confirming.
    pub instructor_id: i64,
}

// ============================================================================
// Conflict dry run
// ============================================================================

/// Request to dry-run the conflict detector for a candidate slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConflictsRequest {
    /// The program scope.
    pub program_id: i64,
    /// The facility to check.
    pub facility_id: i64,
    /// Candidate start.
    pub start_at: NaiveDateTime,
    /// Candidate end.
    pub end_at: NaiveDateTime,
    /// Instructors the candidate would involve.
    #[serde(default)]
    pub instructor_ids: Vec<i64>,
    /// Session to exclude from the check (re-checking a time change).
    #[serde(default)]
    pub exclude_session_id: Option<i64>,
}

/// Response from the conflict dry run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConflictsResponse {
    /// Whether the slot is available.
    pub available: bool,
    /// The conflict reason code, when unavailable.
    pub reason: Option<String>,
    /// The session the candidate clashed with, when one exists.
    pub conflicting_session_id: Option<i64>,
    /// Booking-window policy violation, advisory alongside the conflict
    /// result.
    pub booking_window_violation: Option<String>,
}

// ============================================================================
// Course integration
// ============================================================================

/// Request to create sessions for a course and auto-enroll its active
/// students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FromCourseRequest {
    /// The course whose roster is enrolled.
    pub course_id: i64,
    /// The session creation request. Its `course_id` is overridden with
    /// the one above.
    pub session: CreateSessionRequest,
}

/// Per-session enrollment report in a from-course response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEnrollmentReport {
    /// The created session.
    pub session_id: i64,
    /// Students enrolled or waitlisted.
    pub succeeded: Vec<ParticipantOutcome>,
    /// Students that could not be enrolled.
    pub failed: Vec<FailedItem>,
}

/// Response to a from-course creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FromCourseResponse {
    /// The creation result.
    pub creation: CreateSessionResponse,
    /// Enrollment per created session.
    pub enrollment: Vec<SessionEnrollmentReport>,
}

/// Request to sync a session's roster with its course enrollment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncCourseRequest {
    /// The program scope.
    pub program_id: i64,
    /// The actor recorded on cancellations.
    pub synced_by: String,
}

/// Response to a course sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncCourseResponse {
    /// Students newly enrolled or waitlisted.
    pub enrolled: Vec<ParticipantOutcome>,
    /// Students whose rows were cancelled.
    pub cancelled: Vec<i64>,
    /// Students that failed to sync, with reasons.
    pub failed: Vec<FailedItem>,
}

// ============================================================================
// Utilization
// ============================================================================

/// Query for the facility utilization report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilizationQuery {
    /// The program scope.
    pub program_id: i64,
    /// First day of the report range.
    pub from: NaiveDate,
    /// Last day of the report range, inclusive.
    pub to: NaiveDate,
}

/// Session counts by lifecycle status.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct StatusCounts {
    /// Still-scheduled sessions.
    pub scheduled: u32,
    /// Sessions currently running.
    pub in_progress: u32,
    /// Completed sessions.
    pub completed: u32,
    /// Cancelled sessions.
    pub cancelled: u32,
}

/// Facility utilization report over a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UtilizationResponse {
    /// The facility reported on.
    pub facility_id: i64,
    /// First day of the range.
    pub from: NaiveDate,
    /// Last day of the range, inclusive.
    pub to: NaiveDate,
    /// Total sessions in the range, any status.
    pub total_sessions: u32,
    /// Session counts by status.
    pub by_status: StatusCounts,
    /// Hours booked by slot-occupying sessions.
    pub booked_hours: f64,
    /// Hours the facility was open over the range.
    pub open_hours: f64,
    /// `booked_hours / open_hours`, 0 when never open.
    pub utilization: f64,
    /// Capacity-holding participants across sessions in the range.
    pub total_participants: u32,
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDateTime;

use crate::types::{ParticipantStatus, SessionStatus};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A session's end timestamp is not strictly after its start.
    InvalidTimeRange {
        /// The offending start timestamp.
        start: NaiveDateTime,
        /// The offending end timestamp.
        end: NaiveDateTime,
    },
    /// A recurrence specification is malformed or contradictory.
    InvalidRecurrence {
        /// Description of the problem.
        reason: String,
    },
    /// A recurrence expansion would exceed the occurrence cap.
    RecurrenceLimitExceeded {
        /// The configured maximum number of occurrences.
        max: usize,
    },
    /// A session status transition is not permitted.
    InvalidSessionTransition {
        /// The current status.
        from: SessionStatus,
        /// The requested status.
        to: SessionStatus,
    },
    /// A participant status transition is not permitted.
    InvalidParticipantTransition {
        /// The current status.
        from: ParticipantStatus,
        /// The requested status.
        to: ParticipantStatus,
    },
    /// A student already has an active enrollment in the session.
    DuplicateEnrollment {
        /// The session identifier.
        session_id: i64,
        /// The student identifier.
        student_id: i64,
    },
    /// Enrollment is only possible while a session is still scheduled.
    SessionNotOpenForEnrollment {
        /// The session's current status.
        status: SessionStatus,
    },
    /// Only a scheduled session's time window may change.
    SessionNotReschedulable {
        /// The session's current status.
        status: SessionStatus,
    },
    /// An instructor already has an active assignment on the session.
    DuplicateAssignment {
        /// The session identifier.
        session_id: i64,
        /// The instructor identifier.
        instructor_id: i64,
    },
    /// Attendance may only be marked once a session is in progress or completed.
    AttendanceNotOpen {
        /// The session's current status.
        status: SessionStatus,
    },
    /// A session status string from storage could not be parsed.
    InvalidSessionStatus(String),
    /// A participant status string from storage could not be parsed.
    InvalidParticipantStatus(String),
    /// A session kind string could not be parsed.
    InvalidSessionKind(String),
    /// A recurrence pattern string could not be parsed.
    InvalidRecurrencePattern(String),
    /// A weekday string could not be parsed.
    InvalidWeekday(String),
    /// An attendance status string could not be parsed.
    InvalidAttendanceStatus(String),
    /// A facility's daily operating window is malformed.
    InvalidOperatingHours {
        /// Description of the problem.
        reason: String,
    },
    /// An instructor availability window is malformed.
    InvalidAvailabilityWindow {
        /// Description of the problem.
        reason: String,
    },
    /// Failed to parse a date or datetime from its stored string form.
    DateParseError {
        /// The invalid input string.
        value: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTimeRange { start, end } => {
                write!(f, "Session end ({end}) must be after start ({start})")
            }
            Self::InvalidRecurrence { reason } => {
                write!(f, "Invalid recurrence specification: {reason}")
            }
            Self::RecurrenceLimitExceeded { max } => {
                write!(
                    f,
                    "Recurrence expansion would exceed the maximum of {max} occurrences"
                )
            }
            Self::InvalidSessionTransition { from, to } => {
                write!(f, "Cannot transition session from '{from}' to '{to}'")
            }
            Self::InvalidParticipantTransition { from, to } => {
                write!(f, "Cannot transition participant from '{from}' to '{to}'")
            }
            Self::DuplicateEnrollment {
                session_id,
                student_id,
            } => {
                write!(
                    f,
                    "Student {student_id} already has an active enrollment in session {session_id}"
                )
            }
            Self::SessionNotOpenForEnrollment { status } => {
                write!(
                    f,
                    "Participants can only be added to a scheduled session, not '{status}'"
                )
            }
            Self::SessionNotReschedulable { status } => {
                write!(
                    f,
                    "Only scheduled sessions can be rescheduled, not '{status}'"
                )
            }
            Self::DuplicateAssignment {
                session_id,
                instructor_id,
            } => {
                write!(
                    f,
                    "Instructor {instructor_id} already has an active assignment on session {session_id}"
                )
            }
            Self::AttendanceNotOpen { status } => {
                write!(
                    f,
                    "Attendance can only be marked for a session in progress or completed, not '{status}'"
                )
            }
            Self::InvalidSessionStatus(s) => write!(f, "Unknown session status: {s}"),
            Self::InvalidParticipantStatus(s) => write!(f, "Unknown participant status: {s}"),
            Self::InvalidSessionKind(s) => write!(f, "Unknown session kind: {s}"),
            Self::InvalidRecurrencePattern(s) => write!(f, "Unknown recurrence pattern: {s}"),
            Self::InvalidWeekday(s) => write!(f, "Unknown weekday: {s}"),
            Self::InvalidAttendanceStatus(s) => write!(f, "Unknown attendance status: {s}"),
            Self::InvalidOperatingHours { reason } => {
                write!(f, "Invalid operating hours: {reason}")
            }
            Self::InvalidAvailabilityWindow { reason } => {
                write!(f, "Invalid availability window: {reason}")
            }
            Self::DateParseError { value, error } => {
                write!(f, "Failed to parse date '{value}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use campus_sched::{ConflictReason, CoreError};
use campus_sched_domain::DomainError;
use campus_sched_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract: validation failures, missing resources, lifecycle state
/// violations, and schedule conflicts each map to their own HTTP
/// status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    Validation {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found (or belongs to another program).
    NotFound {
        /// The type of resource that was not found.
        resource: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The operation is not valid in the entity's current lifecycle state.
    StateError {
        /// The machine-readable rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The requested slot or assignment conflicts with the schedule.
    Conflict {
        /// The machine-readable conflict reason code.
        reason: String,
        /// A human-readable description of the conflict.
        message: String,
        /// The session the request clashed with, when one exists.
        conflicting_session_id: Option<i64>,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    /// Builds a conflict error from a detector reason code.
    #[must_use]
    pub fn from_conflict(reason: ConflictReason, conflicting_session_id: Option<i64>) -> Self {
        Self::Conflict {
            reason: reason.as_str().to_string(),
            message: match reason {
                ConflictReason::FacilityOverlap => {
                    String::from("The facility already has a session in this time slot")
                }
                ConflictReason::InstructorOverlap => {
                    String::from("The instructor is already booked during this time slot")
                }
                ConflictReason::OutsideOperatingHours => {
                    String::from("The facility is closed for part or all of this time slot")
                }
                ConflictReason::InsufficientBuffer => String::from(
                    "The slot does not leave the facility's required buffer around adjacent sessions",
                ),
            },
            conflicting_session_id,
        }
    }

    /// The machine-readable code used for failed sub-items in bulk
    /// responses.
    #[must_use]
    pub fn reason_code(&self) -> String {
        match self {
            Self::Validation { field, .. } => format!("invalid_{field}"),
            Self::NotFound { .. } => String::from("not_found"),
            Self::StateError { rule, .. } => rule.clone(),
            Self::Conflict { reason, .. } => reason.clone(),
            Self::Internal { .. } => String::from("internal"),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::NotFound { resource, message } => {
                write!(f, "{resource} not found: {message}")
            }
            Self::StateError { rule, message } => {
                write!(f, "State error ({rule}): {message}")
            }
            Self::Conflict {
                reason, message, ..
            } => {
                write!(f, "Schedule conflict ({reason}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidTimeRange { start, end } => ApiError::Validation {
            field: String::from("end_at"),
            message: format!("Session end ({end}) must be after start ({start})"),
        },
        DomainError::InvalidRecurrence { reason } => ApiError::Validation {
            field: String::from("recurrence"),
            message: reason,
        },
        DomainError::RecurrenceLimitExceeded { max } => ApiError::Validation {
            field: String::from("recurrence"),
            message: format!("Expansion would exceed the maximum of {max} occurrences"),
        },
        DomainError::InvalidSessionTransition { from, to } => ApiError::StateError {
            rule: String::from("session_transition"),
            message: format!("Cannot transition session from '{from}' to '{to}'"),
        },
        DomainError::InvalidParticipantTransition { from, to } => ApiError::StateError {
            rule: String::from("participant_transition"),
            message: format!("Cannot transition participant from '{from}' to '{to}'"),
        },
        DomainError::DuplicateEnrollment {
            session_id,
            student_id,
        } => ApiError::StateError {
            rule: String::from("duplicate_enrollment"),
            message: format!(
                "Student {student_id} already has an active enrollment in session {session_id}"
            ),
        },
        DomainError::SessionNotOpenForEnrollment { status } => ApiError::StateError {
            rule: String::from("session_not_open"),
            message: format!("Participants can only be added to a scheduled session, not '{status}'"),
        },
        DomainError::SessionNotReschedulable { status } => ApiError::StateError {
            rule: String::from("session_not_reschedulable"),
            message: format!("Only scheduled sessions can be rescheduled, not '{status}'"),
        },
        DomainError::DuplicateAssignment {
            session_id,
            instructor_id,
        } => ApiError::StateError {
            rule: String::from("duplicate_assignment"),
            message: format!(
                "Instructor {instructor_id} already has an active assignment on session {session_id}"
            ),
        },
        DomainError::AttendanceNotOpen { status } => ApiError::StateError {
            rule: String::from("attendance_not_open"),
            message: format!(
                "Attendance can only be marked for a session in progress or completed, not '{status}'"
            ),
        },
        DomainError::InvalidSessionStatus(s) => ApiError::Validation {
            field: String::from("status"),
            message: format!("Unknown session status: {s}"),
        },
        DomainError::InvalidParticipantStatus(s) => ApiError::Validation {
            field: String::from("status"),
            message: format!("Unknown participant status: {s}"),
        },
        DomainError::InvalidSessionKind(s) => ApiError::Validation {
            field: String::from("kind"),
            message: format!("Unknown session kind: {s}"),
        },
        DomainError::InvalidRecurrencePattern(s) => ApiError::Validation {
            field: String::from("pattern"),
            message: format!("Unknown recurrence pattern: {s}"),
        },
        DomainError::InvalidWeekday(s) => ApiError::Validation {
            field: String::from("weekdays"),
            message: format!("Unknown weekday: {s}"),
        },
        DomainError::InvalidAttendanceStatus(s) => ApiError::Validation {
            field: String::from("attendance"),
            message: format!("Unknown attendance status: {s}"),
        },
        DomainError::InvalidOperatingHours { reason } => ApiError::Validation {
            field: String::from("weekly_hours"),
            message: reason,
        },
        DomainError::InvalidAvailabilityWindow { reason } => ApiError::Validation {
            field: String::from("availability"),
            message: reason,
        },
        DomainError::DateParseError { value, error } => ApiError::Validation {
            field: String::from("date"),
            message: format!("Failed to parse date '{value}': {error}"),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal { message: msg },
    }
}

/// Translates a persistence error into an API error.
///
/// `NotFound` keeps its resource description; embedded domain errors
/// translate like direct ones; everything else is internal.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::NotFound {
            resource: String::from("Resource"),
            message,
        },
        PersistenceError::Domain(domain_err) => translate_domain_error(domain_err),
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::DomainError;

/// Represents the lifecycle state of a scheduled session.
///
/// Transitions are monotonic: a session moves forward only, and a
/// cancelled or completed session is never resurrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum SessionStatus {
    /// Initial state after creation. The session is bookable.
    #[default]
    Scheduled,
    /// The session is currently running.
    InProgress,
    /// The session finished normally. Terminal.
    Completed,
    /// The session was cancelled before completion. Terminal.
    Cancelled,
}

impl FromStr for SessionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidSessionStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SessionStatus {
    /// Converts this status to its storage string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Scheduled → `InProgress`
    /// - `InProgress` → Completed
    /// - Scheduled → Cancelled
    /// - `InProgress` → Cancelled
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Scheduled, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::Scheduled | Self::InProgress, Self::Cancelled)
        )
    }

    /// Returns whether this status is terminal.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns whether the session still occupies its facility time slot.
    ///
    /// Cancelled sessions release their slot; all other statuses hold it.
    #[must_use]
    pub const fn occupies_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

/// Represents one student's enrollment state within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantStatus {
    /// Holds a seat in the session.
    Enrolled,
    /// Checked in; still counts against capacity.
    Confirmed,
    /// Waiting for a seat; holds a dense waitlist position.
    Waitlisted,
    /// Enrollment cancelled. Terminal.
    Cancelled,
    /// Session completed without the student checking in. Terminal.
    NoShow,
}

impl FromStr for ParticipantStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enrolled" => Ok(Self::Enrolled),
            "confirmed" => Ok(Self::Confirmed),
            "waitlisted" => Ok(Self::Waitlisted),
            "cancelled" => Ok(Self::Cancelled),
            "no_show" => Ok(Self::NoShow),
            _ => Err(DomainError::InvalidParticipantStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ParticipantStatus {
    /// Converts this status to its storage string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Enrolled => "enrolled",
            Self::Confirmed => "confirmed",
            Self::Waitlisted => "waitlisted",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - Enrolled → Confirmed (check-in)
    /// - Waitlisted → Enrolled (promotion)
    /// - Enrolled | Confirmed | Waitlisted → Cancelled
    /// - Enrolled → `NoShow` (session completed without check-in)
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Enrolled, Self::Confirmed)
                | (Self::Waitlisted, Self::Enrolled)
                | (
                    Self::Enrolled | Self::Confirmed | Self::Waitlisted,
                    Self::Cancelled
                )
                | (Self::Enrolled, Self::NoShow)
        )
    }

    /// Returns whether this row is still active (not cancelled).
    ///
    /// Active rows block re-enrollment of the same (session, student) pair.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Returns whether this row counts against session capacity.
    #[must_use]
    pub const fn counts_toward_capacity(&self) -> bool {
        matches!(self, Self::Enrolled | Self::Confirmed)
    }
}

/// Attendance recorded for a participant once the session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// The student attended.
    Present,
    /// The student was absent.
    Absent,
}

impl FromStr for AttendanceStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            _ => Err(DomainError::InvalidAttendanceStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl AttendanceStatus {
    /// Converts this status to its storage string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }
}

/// The kind of session being scheduled.
///
/// Each kind implies a typical capacity range; the facility's schedule
/// settings may carry a per-kind default participant limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionKind {
    /// One-on-one instruction.
    Private,
    /// A standard group class.
    Group,
    /// A visiting school group booking.
    SchoolGroup,
}

impl FromStr for SessionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "private" => Ok(Self::Private),
            "group" => Ok(Self::Group),
            "school_group" => Ok(Self::SchoolGroup),
            _ => Err(DomainError::InvalidSessionKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for SessionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl SessionKind {
    /// Converts this kind to its storage string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Private => "private",
            Self::Group => "group",
            Self::SchoolGroup => "school_group",
        }
    }
}

/// Cancellation state for soft-deleted records.
///
/// Sessions and participants are never physically deleted; cancellation
/// is recorded as a tagged state carrying its audit metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CancelState {
    /// The record is live.
    Active,
    /// The record was cancelled.
    Cancelled {
        /// The stated reason for cancellation.
        reason: String,
        /// The actor who cancelled.
        cancelled_by: String,
        /// When the cancellation happened.
        cancelled_at: NaiveDateTime,
    },
}

impl CancelState {
    /// Returns whether the record is still active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Removal state for instructor assignments.
///
/// Removed assignments are retained for audit, never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssignmentState {
    /// The assignment is live.
    Active,
    /// The assignment was removed.
    Removed {
        /// The stated reason for removal.
        reason: String,
        /// The actor who removed the assignment.
        removed_by: String,
        /// When the removal happened.
        removed_at: NaiveDateTime,
    },
}

impl AssignmentState {
    /// Returns whether the assignment is still active.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_status_forward_transitions() {
        assert!(SessionStatus::Scheduled.can_transition_to(SessionStatus::InProgress));
        assert!(SessionStatus::InProgress.can_transition_to(SessionStatus::Completed));
        assert!(SessionStatus::Scheduled.can_transition_to(SessionStatus::Cancelled));
        assert!(SessionStatus::InProgress.can_transition_to(SessionStatus::Cancelled));
    }

    #[test]
    fn test_session_status_terminal_states_are_sticky() {
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::Cancelled));
        assert!(!SessionStatus::Cancelled.can_transition_to(SessionStatus::Scheduled));
        assert!(!SessionStatus::Completed.can_transition_to(SessionStatus::Scheduled));
        assert!(!SessionStatus::Cancelled.can_transition_to(SessionStatus::InProgress));
    }

    #[test]
    fn test_session_status_no_backward_transitions() {
        assert!(!SessionStatus::InProgress.can_transition_to(SessionStatus::Scheduled));
        assert!(!SessionStatus::Scheduled.can_transition_to(SessionStatus::Completed));
    }

    #[test]
    fn test_session_status_round_trip() {
        for status in [
            SessionStatus::Scheduled,
            SessionStatus::InProgress,
            SessionStatus::Completed,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<SessionStatus>(), Ok(status));
        }
        assert!("bogus".parse::<SessionStatus>().is_err());
    }

    #[test]
    fn test_participant_status_transitions() {
        assert!(ParticipantStatus::Enrolled.can_transition_to(ParticipantStatus::Confirmed));
        assert!(ParticipantStatus::Waitlisted.can_transition_to(ParticipantStatus::Enrolled));
        assert!(ParticipantStatus::Enrolled.can_transition_to(ParticipantStatus::Cancelled));
        assert!(ParticipantStatus::Confirmed.can_transition_to(ParticipantStatus::Cancelled));
        assert!(ParticipantStatus::Waitlisted.can_transition_to(ParticipantStatus::Cancelled));
        assert!(ParticipantStatus::Enrolled.can_transition_to(ParticipantStatus::NoShow));
    }

    #[test]
    fn test_participant_status_illegal_transitions() {
        assert!(!ParticipantStatus::Cancelled.can_transition_to(ParticipantStatus::Enrolled));
        assert!(!ParticipantStatus::NoShow.can_transition_to(ParticipantStatus::Enrolled));
        assert!(!ParticipantStatus::Confirmed.can_transition_to(ParticipantStatus::Waitlisted));
        assert!(!ParticipantStatus::Waitlisted.can_transition_to(ParticipantStatus::Confirmed));
    }

    #[test]
    fn test_capacity_counting() {
        assert!(ParticipantStatus::Enrolled.counts_toward_capacity());
        assert!(ParticipantStatus::Confirmed.counts_toward_capacity());
        assert!(!ParticipantStatus::Waitlisted.counts_toward_capacity());
        assert!(!ParticipantStatus::Cancelled.counts_toward_capacity());
        assert!(!ParticipantStatus::NoShow.counts_toward_capacity());
    }

    #[test]
    fn test_session_kind_round_trip() {
        for kind in [
            SessionKind::Private,
            SessionKind::Group,
            SessionKind::SchoolGroup,
        ] {
            assert_eq!(kind.as_str().parse::<SessionKind>(), Ok(kind));
        }
    }
}

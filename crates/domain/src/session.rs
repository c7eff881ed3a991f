// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The scheduling entities: sessions, participants, and instructor
//! assignments.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::time_range::TimeRange;
use crate::types::{
    AssignmentState, AttendanceStatus, CancelState, ParticipantStatus, SessionKind, SessionStatus,
};

/// The bookable fields of a session, before identity and status exist.
///
/// The Recurrence Expander consumes a template and produces concrete
/// drafts; every non-temporal field is inherited by each draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTemplate {
    /// The program scope.
    pub program_id: i64,
    /// The facility the session occupies.
    pub facility_id: i64,
    /// Optional course reference, for tagging only.
    pub course_id: Option<i64>,
    /// Session title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// The session kind.
    pub kind: SessionKind,
    /// The first occurrence's time window.
    pub time: TimeRange,
    /// Optional participant limit. Unset means unlimited.
    pub max_participants: Option<u32>,
    /// Free-form skill level tag.
    pub skill_level: Option<String>,
}

/// One concrete, bookable time block at a facility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledSession {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the session has not been persisted yet.
    pub session_id: Option<i64>,
    /// The program scope.
    pub program_id: i64,
    /// The facility the session occupies.
    pub facility_id: i64,
    /// Optional course reference.
    pub course_id: Option<i64>,
    /// Session title.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// The session kind.
    pub kind: SessionKind,
    /// The session's time window.
    pub time: TimeRange,
    /// The recurrence group this session belongs to, if any.
    pub recurrence_group_id: Option<i64>,
    /// Lifecycle status.
    pub status: SessionStatus,
    /// Optional participant limit.
    pub max_participants: Option<u32>,
    /// Free-form skill level tag.
    pub skill_level: Option<String>,
    /// Cancellation state with audit metadata.
    pub cancel_state: CancelState,
}

impl ScheduledSession {
    /// Builds a session from a template, a concrete time window, and an
    /// optional recurrence group.
    #[must_use]
    pub fn from_template(
        template: &SessionTemplate,
        time: TimeRange,
        recurrence_group_id: Option<i64>,
    ) -> Self {
        Self {
            session_id: None,
            program_id: template.program_id,
            facility_id: template.facility_id,
            course_id: template.course_id,
            title: template.title.clone(),
            description: template.description.clone(),
            kind: template.kind,
            time,
            recurrence_group_id,
            status: SessionStatus::Scheduled,
            max_participants: template.max_participants,
            skill_level: template.skill_level.clone(),
            cancel_state: CancelState::Active,
        }
    }

    /// Returns whether the session is full given the current count of
    /// capacity-holding participants.
    ///
    /// A session with no limit is never full.
    #[must_use]
    pub fn is_full(&self, enrolled_count: u32) -> bool {
        self.max_participants
            .is_some_and(|limit| enrolled_count >= limit)
    }

    /// Returns whether a new participant can take a seat right now.
    ///
    /// Requires the session to be scheduled, not full, and starting in
    /// the future. Failing this check routes the request to the waitlist
    /// rather than rejecting it.
    #[must_use]
    pub fn can_enroll_participant(&self, enrolled_count: u32, now: NaiveDateTime) -> bool {
        self.status == SessionStatus::Scheduled
            && !self.is_full(enrolled_count)
            && self.time.start() > now
    }
}

/// One student's relationship to one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionParticipant {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the row has not been persisted yet.
    pub participant_id: Option<i64>,
    /// The session.
    pub session_id: i64,
    /// The student.
    pub student_id: i64,
    /// Enrollment status.
    pub status: ParticipantStatus,
    /// Waitlist position. Set iff status is `Waitlisted`; positions form
    /// a dense `1..N` ordering within a session.
    pub waitlist_position: Option<u32>,
    /// Recorded attendance, once the session runs.
    pub attendance: Option<AttendanceStatus>,
    /// Check-in timestamp.
    pub checked_in_at: Option<NaiveDateTime>,
    /// Check-out timestamp.
    pub checked_out_at: Option<NaiveDateTime>,
    /// Cancellation state with audit metadata.
    pub cancel_state: CancelState,
}

/// One instructor's assignment to one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionInstructor {
    /// The canonical numeric identifier assigned by the database.
    /// `None` indicates the row has not been persisted yet.
    pub assignment_id: Option<i64>,
    /// The session.
    pub session_id: i64,
    /// The instructor.
    pub instructor_id: i64,
    /// When the assignment was made.
    pub assigned_at: NaiveDateTime,
    /// The actor who made the assignment.
    pub assigned_by: String,
    /// Whether this is the session's primary instructor. At most one
    /// active assignment per session may be primary.
    pub is_primary: bool,
    /// Whether the instructor confirmed the assignment. Advisory.
    pub is_confirmed: bool,
    /// Confirmation timestamp.
    pub confirmed_at: Option<NaiveDateTime>,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Removal state with audit metadata.
    pub state: AssignmentState,
}

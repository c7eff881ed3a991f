// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_sched_domain::{DomainError, ParticipantStatus, SessionStatus};
use chrono::Duration;

use crate::lifecycle::{
    ensure_cancellable, ensure_participant_transition, ensure_session_transition,
    plan_group_shift, shift_delta,
};
use crate::tests::helpers::{monday, session, slot};

#[test]
fn test_forward_transitions_allowed() {
    assert!(ensure_session_transition(SessionStatus::Scheduled, SessionStatus::InProgress).is_ok());
    assert!(ensure_session_transition(SessionStatus::InProgress, SessionStatus::Completed).is_ok());
}

#[test]
fn test_terminal_states_have_no_exits() {
    assert_eq!(
        ensure_session_transition(SessionStatus::Completed, SessionStatus::Cancelled),
        Err(DomainError::InvalidSessionTransition {
            from: SessionStatus::Completed,
            to: SessionStatus::Cancelled,
        })
    );
    assert!(ensure_session_transition(SessionStatus::Cancelled, SessionStatus::Scheduled).is_err());
}

#[test]
fn test_cancelling_completed_session_is_a_state_error() {
    assert!(ensure_cancellable(SessionStatus::Scheduled).is_ok());
    assert!(ensure_cancellable(SessionStatus::InProgress).is_ok());
    assert!(ensure_cancellable(SessionStatus::Completed).is_err());
    assert!(ensure_cancellable(SessionStatus::Cancelled).is_err());
}

#[test]
fn test_participant_transitions() {
    assert!(
        ensure_participant_transition(ParticipantStatus::Enrolled, ParticipantStatus::Confirmed)
            .is_ok()
    );
    assert!(
        ensure_participant_transition(ParticipantStatus::Waitlisted, ParticipantStatus::Enrolled)
            .is_ok()
    );
    assert!(
        ensure_participant_transition(ParticipantStatus::Cancelled, ParticipantStatus::Enrolled)
            .is_err()
    );
}

#[test]
fn test_shift_delta_from_time_change() {
    let old = slot(monday(), (10, 0), (11, 0));
    let new = slot(monday(), (14, 30), (15, 30));
    assert_eq!(shift_delta(&old, &new), Duration::minutes(270));
}

#[test]
fn test_group_shift_moves_only_scheduled_members() {
    let scheduled = session(1, slot(monday(), (10, 0), (11, 0)));
    let mut completed = session(2, slot(monday(), (12, 0), (13, 0)));
    completed.status = SessionStatus::Completed;
    let mut cancelled = session(3, slot(monday(), (14, 0), (15, 0)));
    cancelled.status = SessionStatus::Cancelled;

    let targets = plan_group_shift(&[scheduled, completed, cancelled], Duration::hours(1));
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].session_id, 1);
    assert_eq!(
        targets[0].new_time,
        slot(monday(), (11, 0), (12, 0))
    );
}

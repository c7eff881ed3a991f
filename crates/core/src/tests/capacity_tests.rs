// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_sched_domain::{CancelState, DomainError, ParticipantStatus, SessionStatus};

use crate::capacity::{
    EnrollmentDecision, PromotionPolicy, decide_enrollment, enrolled_count, ensure_attendance_open,
    ensure_not_enrolled, next_waitlist_position, plan_promotion,
};
use crate::tests::helpers::{at, date, monday, participant, session, slot};

#[test]
fn test_enrolled_count_covers_enrolled_and_confirmed() {
    let participants = vec![
        participant(1, 100, ParticipantStatus::Enrolled, None),
        participant(2, 101, ParticipantStatus::Confirmed, None),
        participant(3, 102, ParticipantStatus::Waitlisted, Some(1)),
        participant(4, 103, ParticipantStatus::Cancelled, None),
    ];
    assert_eq!(enrolled_count(&participants), 2);
}

#[test]
fn test_enroll_when_seats_open() {
    let session = session(1, slot(monday(), (10, 0), (11, 0)));
    let now = at(date(2026, 3, 1), 9, 0);
    let decision = decide_enrollment(&session, &[], now);
    assert_eq!(decision, EnrollmentDecision::Enroll);
}

#[test]
fn test_full_session_waitlists_at_next_position() {
    // max_participants is 2 in the fixture.
    let session = session(1, slot(monday(), (10, 0), (11, 0)));
    let now = at(date(2026, 3, 1), 9, 0);
    let participants = vec![
        participant(1, 100, ParticipantStatus::Enrolled, None),
        participant(2, 101, ParticipantStatus::Enrolled, None),
    ];
    assert_eq!(
        decide_enrollment(&session, &participants, now),
        EnrollmentDecision::Waitlist { position: 1 }
    );

    let mut participants = participants;
    participants.push(participant(3, 102, ParticipantStatus::Waitlisted, Some(1)));
    assert_eq!(
        decide_enrollment(&session, &participants, now),
        EnrollmentDecision::Waitlist { position: 2 }
    );
}

#[test]
fn test_started_session_waitlists() {
    let session = session(1, slot(monday(), (10, 0), (11, 0)));
    let now = at(monday(), 10, 30);
    assert!(matches!(
        decide_enrollment(&session, &[], now),
        EnrollmentDecision::Waitlist { .. }
    ));
}

#[test]
fn test_duplicate_active_enrollment_rejected() {
    let participants = vec![participant(1, 100, ParticipantStatus::Enrolled, None)];
    assert_eq!(
        ensure_not_enrolled(&participants, 1, 100),
        Err(DomainError::DuplicateEnrollment {
            session_id: 1,
            student_id: 100,
        })
    );
    // A cancelled prior row does not block re-enrollment.
    let participants = vec![participant(1, 100, ParticipantStatus::Cancelled, None)];
    assert!(ensure_not_enrolled(&participants, 1, 100).is_ok());
}

#[test]
fn test_promotion_takes_minimum_position_and_recompacts() {
    // One seat just freed: 1 enrolled remains of max 2, two waitlisted.
    let session = session(1, slot(monday(), (10, 0), (11, 0)));
    let now = at(date(2026, 3, 1), 9, 0);
    let participants = vec![
        participant(1, 100, ParticipantStatus::Enrolled, None),
        participant(3, 102, ParticipantStatus::Waitlisted, Some(1)),
        participant(4, 103, ParticipantStatus::Waitlisted, Some(2)),
    ];

    let plan = plan_promotion(&session, &participants, PromotionPolicy::SingleSeat, now);
    assert_eq!(plan.promote, vec![3]);
    assert_eq!(plan.reposition, vec![(4, 1)]);
}

#[test]
fn test_fill_open_seats_promotes_multiple() {
    let mut session = session(1, slot(monday(), (10, 0), (11, 0)));
    session.max_participants = Some(3);
    let now = at(date(2026, 3, 1), 9, 0);
    let participants = vec![
        participant(3, 102, ParticipantStatus::Waitlisted, Some(1)),
        participant(4, 103, ParticipantStatus::Waitlisted, Some(2)),
        participant(5, 104, ParticipantStatus::Waitlisted, Some(3)),
    ];

    let plan = plan_promotion(&session, &participants, PromotionPolicy::FillOpenSeats, now);
    assert_eq!(plan.promote, vec![3, 4, 5]);
    assert!(plan.reposition.is_empty());

    let plan = plan_promotion(&session, &participants, PromotionPolicy::SingleSeat, now);
    assert_eq!(plan.promote, vec![3]);
    assert_eq!(plan.reposition, vec![(4, 1), (5, 2)]);
}

#[test]
fn test_no_promotion_after_start_but_positions_stay_dense() {
    let session = session(1, slot(monday(), (10, 0), (11, 0)));
    let now = at(monday(), 12, 0);
    // Position 1 was cancelled; 2 and 3 remain.
    let participants = vec![
        participant(3, 102, ParticipantStatus::Waitlisted, Some(2)),
        participant(4, 103, ParticipantStatus::Waitlisted, Some(3)),
    ];

    let plan = plan_promotion(&session, &participants, PromotionPolicy::SingleSeat, now);
    assert!(plan.promote.is_empty());
    assert_eq!(plan.reposition, vec![(3, 1), (4, 2)]);
}

#[test]
fn test_next_position_ignores_cancelled_rows() {
    let mut cancelled = participant(3, 102, ParticipantStatus::Waitlisted, Some(5));
    cancelled.cancel_state = CancelState::Cancelled {
        reason: String::from("no longer needed"),
        cancelled_by: String::from("admin"),
        cancelled_at: at(monday(), 8, 0),
    };
    assert_eq!(next_waitlist_position(&[cancelled]), 1);
}

#[test]
fn test_attendance_gate() {
    assert!(ensure_attendance_open(SessionStatus::InProgress).is_ok());
    assert!(ensure_attendance_open(SessionStatus::Completed).is_ok());
    assert_eq!(
        ensure_attendance_open(SessionStatus::Scheduled),
        Err(DomainError::AttendanceNotOpen {
            status: SessionStatus::Scheduled,
        })
    );
}

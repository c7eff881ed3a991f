// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_sched_domain::{AttendanceStatus, ParticipantStatus};

use super::{at, clock, create_req, fixture, Fixture};
use crate::handlers;
use crate::request_response::{
    AddParticipantsRequest, AttendanceEntry, AttendanceRequest, RemoveParticipantsRequest,
};

/// A two-seat session plus three students.
fn seeded() -> (Fixture, i64, Vec<i64>) {
    let mut f = fixture();
    let req = create_req(&f, at(2026, 6, 1, 10, 0), at(2026, 6, 1, 11, 0));
    let session_id = handlers::create_session(&mut f.db, &req, clock())
        .unwrap()
        .created[0]
        .session_id;
    let students = vec![
        f.db.create_student(f.program_id, "Ada Marsh").unwrap(),
        f.db.create_student(f.program_id, "Ben Okafor").unwrap(),
        f.db.create_student(f.program_id, "Cleo Tran").unwrap(),
    ];
    (f, session_id, students)
}

fn add_req(program_id: i64, student_ids: Vec<i64>) -> AddParticipantsRequest {
    AddParticipantsRequest {
        program_id,
        student_ids,
    }
}

fn remove_req(program_id: i64, student_ids: Vec<i64>) -> RemoveParticipantsRequest {
    RemoveParticipantsRequest {
        program_id,
        student_ids,
        reason: String::from("family request"),
        cancelled_by: String::from("front desk"),
        promotion_policy: campus_sched::PromotionPolicy::default(),
    }
}

#[test]
fn test_overflow_enrollment_lands_on_the_waitlist() {
    let (mut f, session_id, students) = seeded();
    let resp = handlers::add_participants(
        &mut f.db,
        session_id,
        &add_req(f.program_id, students),
        clock(),
    )
    .unwrap();

    assert!(resp.failed.is_empty());
    assert_eq!(resp.succeeded.len(), 3);
    assert_eq!(resp.succeeded[0].status, ParticipantStatus::Enrolled);
    assert_eq!(resp.succeeded[1].status, ParticipantStatus::Enrolled);
    assert_eq!(resp.succeeded[2].status, ParticipantStatus::Waitlisted);
    assert_eq!(resp.succeeded[2].waitlist_position, Some(1));
}

#[test]
fn test_unknown_students_fail_without_aborting_the_batch() {
    let (mut f, session_id, students) = seeded();
    let ids = vec![students[0], 9999];
    let resp =
        handlers::add_participants(&mut f.db, session_id, &add_req(f.program_id, ids), clock())
            .unwrap();

    assert_eq!(resp.succeeded.len(), 1);
    assert_eq!(resp.failed.len(), 1);
    assert_eq!(resp.failed[0].student_id, 9999);
    assert_eq!(resp.failed[0].reason, "not_found");
}

#[test]
fn test_duplicate_enrollment_is_reported_per_item() {
    let (mut f, session_id, students) = seeded();
    let req = add_req(f.program_id, vec![students[0]]);
    handlers::add_participants(&mut f.db, session_id, &req, clock()).unwrap();

    let resp = handlers::add_participants(&mut f.db, session_id, &req, clock()).unwrap();
    assert!(resp.succeeded.is_empty());
    assert_eq!(resp.failed[0].reason, "duplicate_enrollment");
}

#[test]
fn test_removing_an_enrolled_student_promotes_the_waitlist() {
    let (mut f, session_id, students) = seeded();
    handlers::add_participants(
        &mut f.db,
        session_id,
        &add_req(f.program_id, students.clone()),
        clock(),
    )
    .unwrap();

    let resp = handlers::remove_participants(
        &mut f.db,
        session_id,
        &remove_req(f.program_id, vec![students[0]]),
        clock(),
    )
    .unwrap();
    assert_eq!(resp.succeeded.len(), 1);
    assert_eq!(resp.promoted.len(), 1);

    let detail = handlers::get_session_detail(&mut f.db, f.program_id, session_id).unwrap();
    let promoted = detail
        .participants
        .iter()
        .find(|p| p.student_id == students[2])
        .unwrap();
    assert_eq!(promoted.status, ParticipantStatus::Enrolled);
    assert_eq!(promoted.waitlist_position, None);
}

#[test]
fn test_attendance_requires_a_running_session() {
    let (mut f, session_id, students) = seeded();
    handlers::add_participants(
        &mut f.db,
        session_id,
        &add_req(f.program_id, vec![students[0]]),
        clock(),
    )
    .unwrap();

    let req = AttendanceRequest {
        program_id: f.program_id,
        entries: vec![AttendanceEntry {
            student_id: students[0],
            attendance: AttendanceStatus::Present,
        }],
    };
    let resp = handlers::mark_attendance(&mut f.db, session_id, &req, clock()).unwrap();
    assert_eq!(resp.failed.len(), 1);
    assert_eq!(resp.failed[0].reason, "attendance_not_open");

    handlers::start_session(&mut f.db, f.program_id, session_id).unwrap();
    let resp = handlers::mark_attendance(&mut f.db, session_id, &req, clock()).unwrap();
    assert_eq!(resp.succeeded.len(), 1);
    assert_eq!(resp.succeeded[0].status, ParticipantStatus::Confirmed);
}

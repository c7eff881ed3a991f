// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_sched_domain::ParticipantStatus;

use super::{at, clock, create_req, fixture, Fixture};
use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{FromCourseRequest, SyncCourseRequest};

/// A course with two active students and one who left.
fn seeded() -> (Fixture, i64, Vec<i64>) {
    let mut f = fixture();
    let course_id = f.db.create_course(f.program_id, "Level 3 Stroke Clinic").unwrap();
    let students = vec![
        f.db.create_student(f.program_id, "Ada Marsh").unwrap(),
        f.db.create_student(f.program_id, "Ben Okafor").unwrap(),
        f.db.create_student(f.program_id, "Cleo Tran").unwrap(),
    ];
    f.db.set_course_enrollment(course_id, students[0], true).unwrap();
    f.db.set_course_enrollment(course_id, students[1], true).unwrap();
    f.db.set_course_enrollment(course_id, students[2], false).unwrap();
    (f, course_id, students)
}

#[test]
fn test_from_course_enrolls_the_active_roster() {
    let (mut f, course_id, students) = seeded();
    let req = FromCourseRequest {
        course_id,
        session: create_req(&f, at(2026, 6, 1, 10, 0), at(2026, 6, 1, 11, 0)),
    };
    let resp = handlers::create_from_course(&mut f.db, &req, clock()).unwrap();

    assert_eq!(resp.creation.created.len(), 1);
    assert_eq!(resp.enrollment.len(), 1);
    let report = &resp.enrollment[0];
    assert_eq!(report.succeeded.len(), 2);
    assert!(report.failed.is_empty());

    let detail = handlers::get_session_detail(
        &mut f.db,
        f.program_id,
        resp.creation.created[0].session_id,
    )
    .unwrap();
    assert_eq!(detail.course_id, Some(course_id));
    assert!(detail.participants.iter().all(|p| p.student_id != students[2]));
}

#[test]
fn test_from_course_waitlists_past_capacity() {
    let (mut f, course_id, _students) = seeded();
    let mut session = create_req(&f, at(2026, 6, 1, 10, 0), at(2026, 6, 1, 11, 0));
    session.max_participants = Some(1);
    let req = FromCourseRequest { course_id, session };
    let resp = handlers::create_from_course(&mut f.db, &req, clock()).unwrap();

    let report = &resp.enrollment[0];
    assert_eq!(report.succeeded[0].status, ParticipantStatus::Enrolled);
    assert_eq!(report.succeeded[1].status, ParticipantStatus::Waitlisted);
}

#[test]
fn test_sync_follows_roster_changes() {
    let (mut f, course_id, students) = seeded();
    let req = FromCourseRequest {
        course_id,
        session: create_req(&f, at(2026, 6, 1, 10, 0), at(2026, 6, 1, 11, 0)),
    };
    let session_id = handlers::create_from_course(&mut f.db, &req, clock())
        .unwrap()
        .creation
        .created[0]
        .session_id;

    // One student leaves the course, the lapsed one returns.
    f.db.set_course_enrollment(course_id, students[0], false).unwrap();
    f.db.set_course_enrollment(course_id, students[2], true).unwrap();

    let resp = handlers::sync_course(
        &mut f.db,
        session_id,
        &SyncCourseRequest {
            program_id: f.program_id,
            synced_by: String::from("registrar"),
        },
        clock(),
    )
    .unwrap();

    assert_eq!(resp.enrolled.len(), 1);
    assert_eq!(resp.enrolled[0].student_id, students[2]);
    assert_eq!(resp.cancelled, vec![students[0]]);
    assert!(resp.failed.is_empty());
}

#[test]
fn test_sync_requires_a_course_link() {
    let mut f = fixture();
    let req = create_req(&f, at(2026, 6, 1, 10, 0), at(2026, 6, 1, 11, 0));
    let session_id = handlers::create_session(&mut f.db, &req, clock())
        .unwrap()
        .created[0]
        .session_id;

    let err = handlers::sync_course(
        &mut f.db,
        session_id,
        &SyncCourseRequest {
            program_id: f.program_id,
            synced_by: String::from("registrar"),
        },
        clock(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "course_id"));
}

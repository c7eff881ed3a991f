// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{at, clock, create_req, day, fixture};
use crate::error::ApiError;
use crate::handlers;
use crate::request_response::{
    AddParticipantsRequest, CancelSessionRequest, CheckConflictsRequest, UtilizationQuery,
};

#[test]
fn test_check_conflicts_reports_a_free_slot() {
    let mut f = fixture();
    let req = CheckConflictsRequest {
        program_id: f.program_id,
        facility_id: f.facility_id,
        start_at: at(2026, 6, 1, 10, 0),
        end_at: at(2026, 6, 1, 11, 0),
        instructor_ids: Vec::new(),
        exclude_session_id: None,
    };
    let resp = handlers::check_conflicts(&mut f.db, &req, clock()).unwrap();
    assert!(resp.available);
    assert_eq!(resp.reason, None);
    assert_eq!(resp.booking_window_violation, None);
}

#[test]
fn test_check_conflicts_names_the_clashing_session() {
    let mut f = fixture();
    let create = create_req(&f, at(2026, 6, 1, 10, 0), at(2026, 6, 1, 11, 0));
    let session_id = handlers::create_session(&mut f.db, &create, clock())
        .unwrap()
        .created[0]
        .session_id;

    let req = CheckConflictsRequest {
        program_id: f.program_id,
        facility_id: f.facility_id,
        start_at: at(2026, 6, 1, 10, 30),
        end_at: at(2026, 6, 1, 11, 30),
        instructor_ids: Vec::new(),
        exclude_session_id: None,
    };
    let resp = handlers::check_conflicts(&mut f.db, &req, clock()).unwrap();
    assert!(!resp.available);
    assert_eq!(resp.reason.as_deref(), Some("facility_overlap"));
    assert_eq!(resp.conflicting_session_id, Some(session_id));

    // Excluding the clashing session clears the check.
    let req = CheckConflictsRequest {
        exclude_session_id: Some(session_id),
        ..req
    };
    let resp = handlers::check_conflicts(&mut f.db, &req, clock()).unwrap();
    assert!(resp.available);
}

#[test]
fn test_check_conflicts_flags_the_booking_window_separately() {
    let mut f = fixture();
    let req = CheckConflictsRequest {
        program_id: f.program_id,
        facility_id: f.facility_id,
        start_at: at(2026, 5, 30, 10, 0),
        end_at: at(2026, 5, 30, 11, 0),
        instructor_ids: Vec::new(),
        exclude_session_id: None,
    };
    let resp = handlers::check_conflicts(&mut f.db, &req, clock()).unwrap();
    // The slot itself is free; only the booking window objects.
    assert!(resp.available);
    assert!(resp.booking_window_violation.is_some());
}

#[test]
fn test_utilization_reports_hours_and_counts() {
    let mut f = fixture();
    for hour in [10, 12, 14] {
        let req = create_req(&f, at(2026, 6, 1, hour, 0), at(2026, 6, 1, hour + 1, 0));
        handlers::create_session(&mut f.db, &req, clock()).unwrap();
    }
    let sessions = handlers::list_sessions(
        &mut f.db,
        f.facility_id,
        &crate::request_response::ListSessionsQuery {
            program_id: f.program_id,
            from: None,
            to: None,
            status: None,
            limit: None,
            offset: None,
        },
    )
    .unwrap();
    handlers::cancel_session(
        &mut f.db,
        sessions[2].session_id,
        &CancelSessionRequest {
            program_id: f.program_id,
            reason: String::from("low demand"),
            cancelled_by: String::from("ops"),
            cancel_all_recurring: false,
        },
        clock(),
    )
    .unwrap();
    let student = f.db.create_student(f.program_id, "Ada Marsh").unwrap();
    handlers::add_participants(
        &mut f.db,
        sessions[0].session_id,
        &AddParticipantsRequest {
            program_id: f.program_id,
            student_ids: vec![student],
        },
        clock(),
    )
    .unwrap();

    let resp = handlers::facility_utilization(
        &mut f.db,
        f.facility_id,
        &UtilizationQuery {
            program_id: f.program_id,
            from: day(2026, 6, 1),
            to: day(2026, 6, 1),
        },
    )
    .unwrap();

    assert_eq!(resp.total_sessions, 3);
    assert_eq!(resp.by_status.scheduled, 2);
    assert_eq!(resp.by_status.cancelled, 1);
    assert!((resp.booked_hours - 2.0).abs() < f64::EPSILON);
    assert!((resp.open_hours - 12.0).abs() < f64::EPSILON);
    assert!((resp.utilization - 2.0 / 12.0).abs() < 1e-9);
    assert_eq!(resp.total_participants, 1);
}

#[test]
fn test_utilization_rejects_an_inverted_range() {
    let mut f = fixture();
    let err = handlers::facility_utilization(
        &mut f.db,
        f.facility_id,
        &UtilizationQuery {
            program_id: f.program_id,
            from: day(2026, 6, 2),
            to: day(2026, 6, 1),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "to"));
}

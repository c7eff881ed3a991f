// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_sched_domain::{
    AssignmentState, AvailabilityShape, InstructorAvailability, SessionInstructor,
};
use chrono::{NaiveTime, Weekday};

use crate::assignment::{active_primary, instructor_covers};
use crate::tests::helpers::{at, date, monday, slot};

fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn availability(shape: AvailabilityShape) -> InstructorAvailability {
    InstructorAvailability {
        availability_id: Some(1),
        instructor_id: 7,
        program_id: 1,
        facility_id: None,
        shape,
        is_active: true,
        valid_from: None,
        valid_until: None,
        is_exception: false,
        exception_reason: None,
        max_concurrent_sessions: None,
    }
}

fn monday_mornings() -> InstructorAvailability {
    availability(AvailabilityShape::Recurring {
        weekday: Weekday::Mon,
        start_time: time(9, 0),
        end_time: time(12, 0),
    })
}

#[test]
fn test_recurring_window_covers_contained_slot() {
    let rows = vec![monday_mornings()];
    assert!(instructor_covers(&rows, &slot(monday(), (10, 0), (11, 0)), 1));
    // Slot running past the window is not covered.
    assert!(!instructor_covers(
        &rows,
        &slot(monday(), (11, 0), (13, 0)),
        1
    ));
    // Tuesday is not covered at all.
    assert!(!instructor_covers(
        &rows,
        &slot(date(2026, 3, 3), (10, 0), (11, 0)),
        1
    ));
}

#[test]
fn test_facility_scoped_row_only_covers_that_facility() {
    let mut row = monday_mornings();
    row.facility_id = Some(2);
    let rows = vec![row];
    assert!(instructor_covers(&rows, &slot(monday(), (10, 0), (11, 0)), 2));
    assert!(!instructor_covers(
        &rows,
        &slot(monday(), (10, 0), (11, 0)),
        1
    ));
}

#[test]
fn test_validity_window_bounds_coverage() {
    let mut row = monday_mornings();
    row.valid_until = Some(date(2026, 2, 28));
    assert!(!instructor_covers(
        &[row],
        &slot(monday(), (10, 0), (11, 0)),
        1
    ));
}

#[test]
fn test_exception_row_suppresses_recurring_rule() {
    let mut exception = availability(AvailabilityShape::OneTime {
        date: monday(),
        start_time: time(9, 0),
        end_time: time(12, 0),
    });
    exception.is_active = false;
    exception.is_exception = true;
    exception.exception_reason = Some(String::from("jury duty"));

    let rows = vec![monday_mornings(), exception];
    assert!(!instructor_covers(&rows, &slot(monday(), (10, 0), (11, 0)), 1));
    // The following Monday is unaffected.
    assert!(instructor_covers(
        &rows,
        &slot(date(2026, 3, 9), (10, 0), (11, 0)),
        1
    ));
}

#[test]
fn test_active_one_time_row_survives_exception() {
    let mut exception = availability(AvailabilityShape::OneTime {
        date: monday(),
        start_time: time(9, 0),
        end_time: time(12, 0),
    });
    exception.is_active = false;
    exception.is_exception = true;

    let one_time = availability(AvailabilityShape::OneTime {
        date: monday(),
        start_time: time(14, 0),
        end_time: time(16, 0),
    });

    let rows = vec![monday_mornings(), exception, one_time];
    // The recurring morning is suppressed but the afternoon grant stands.
    assert!(!instructor_covers(&rows, &slot(monday(), (10, 0), (11, 0)), 1));
    assert!(instructor_covers(&rows, &slot(monday(), (14, 0), (15, 0)), 1));
}

#[test]
fn test_active_primary_skips_removed_assignments() {
    let primary = SessionInstructor {
        assignment_id: Some(1),
        session_id: 1,
        instructor_id: 7,
        assigned_at: at(monday(), 8, 0),
        assigned_by: String::from("admin"),
        is_primary: true,
        is_confirmed: false,
        confirmed_at: None,
        notes: None,
        state: AssignmentState::Active,
    };
    let mut removed = primary.clone();
    removed.assignment_id = Some(2);
    removed.instructor_id = 8;
    removed.state = AssignmentState::Removed {
        reason: String::from("schedule change"),
        removed_by: String::from("admin"),
        removed_at: at(monday(), 9, 0),
    };

    let assignments = vec![removed, primary];
    let found = active_primary(&assignments).unwrap();
    assert_eq!(found.instructor_id, 7);

    let none: Vec<SessionInstructor> = Vec::new();
    assert!(active_primary(&none).is_none());
}

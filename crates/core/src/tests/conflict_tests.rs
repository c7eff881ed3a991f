// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use campus_sched_domain::SessionStatus;

use crate::conflict::{ConflictReason, booking_window_violation, check_availability};
use crate::tests::helpers::{at, date, monday, session, settings, slot};

#[test]
fn test_clear_slot_is_available() {
    let check = check_availability(&slot(monday(), (10, 0), (11, 0)), &settings(), &[], &[]);
    assert!(check.available);
    assert_eq!(check.reason, None);
}

#[test]
fn test_raw_overlap_reports_facility_overlap() {
    let existing = session(7, slot(monday(), (10, 0), (11, 0)));
    let check = check_availability(
        &slot(monday(), (10, 30), (11, 30)),
        &settings(),
        &[existing],
        &[],
    );
    assert!(!check.available);
    assert_eq!(check.reason, Some(ConflictReason::FacilityOverlap));
    assert_eq!(check.conflicting_session_id, Some(7));
}

#[test]
fn test_buffer_only_clash_reports_insufficient_buffer() {
    // 15 minutes of combined buffer: a session ending 11:00 blocks starts
    // before 11:15.
    let existing = session(7, slot(monday(), (10, 0), (11, 0)));
    let check = check_availability(
        &slot(monday(), (11, 10), (12, 0)),
        &settings(),
        &[existing.clone()],
        &[],
    );
    assert!(!check.available);
    assert_eq!(check.reason, Some(ConflictReason::InsufficientBuffer));

    let check = check_availability(
        &slot(monday(), (11, 15), (12, 0)),
        &settings(),
        &[existing],
        &[],
    );
    assert!(check.available);
}

#[test]
fn test_cancelled_sessions_do_not_occupy_slots() {
    let mut existing = session(7, slot(monday(), (10, 0), (11, 0)));
    existing.status = SessionStatus::Cancelled;
    let check = check_availability(
        &slot(monday(), (10, 0), (11, 0)),
        &settings(),
        &[existing],
        &[],
    );
    assert!(check.available);
}

#[test]
fn test_concurrency_limit_allows_parallel_sessions() {
    let mut settings = settings();
    settings.max_concurrent_sessions = 2;
    let existing = session(7, slot(monday(), (10, 0), (11, 0)));

    let check = check_availability(
        &slot(monday(), (10, 0), (11, 0)),
        &settings,
        std::slice::from_ref(&existing),
        &[],
    );
    assert!(check.available);

    let second = session(8, slot(monday(), (10, 0), (11, 0)));
    let check = check_availability(
        &slot(monday(), (10, 0), (11, 0)),
        &settings,
        &[existing, second],
        &[],
    );
    assert!(!check.available);
    assert_eq!(check.reason, Some(ConflictReason::FacilityOverlap));
}

#[test]
fn test_slot_outside_hours_rejected() {
    let check = check_availability(&slot(monday(), (8, 0), (9, 30)), &settings(), &[], &[]);
    assert!(!check.available);
    assert_eq!(check.reason, Some(ConflictReason::OutsideOperatingHours));

    // Running past close is also outside hours.
    let check = check_availability(&slot(monday(), (16, 30), (17, 30)), &settings(), &[], &[]);
    assert_eq!(check.reason, Some(ConflictReason::OutsideOperatingHours));
}

#[test]
fn test_closure_date_rejected_as_outside_hours() {
    let mut settings = settings();
    settings.closure_dates.insert(monday());
    let check = check_availability(&slot(monday(), (10, 0), (11, 0)), &settings, &[], &[]);
    assert!(!check.available);
    assert_eq!(check.reason, Some(ConflictReason::OutsideOperatingHours));
}

#[test]
fn test_closed_weekday_rejected_as_outside_hours() {
    let mut settings = settings();
    settings.weekly_hours[5] = None;
    // 2026-03-07 is a Saturday.
    let saturday = date(2026, 3, 7);
    let check = check_availability(&slot(saturday, (10, 0), (11, 0)), &settings, &[], &[]);
    assert_eq!(check.reason, Some(ConflictReason::OutsideOperatingHours));
}

#[test]
fn test_instructor_busy_window_rejected() {
    let busy = slot(monday(), (10, 30), (11, 30));
    let check = check_availability(
        &slot(monday(), (10, 0), (11, 0)),
        &settings(),
        &[],
        &[busy],
    );
    assert!(!check.available);
    assert_eq!(check.reason, Some(ConflictReason::InstructorOverlap));
}

#[test]
fn test_booking_window_cutoff_and_horizon() {
    let settings = settings();
    let now = at(monday(), 8, 0);

    // Starts within the 2-hour cutoff.
    assert!(booking_window_violation(&slot(monday(), (9, 30), (10, 30)), &settings, now).is_some());
    // Comfortably inside the window.
    assert!(booking_window_violation(&slot(monday(), (14, 0), (15, 0)), &settings, now).is_none());
    // Past the 90-day horizon.
    let far = slot(date(2026, 7, 1), (10, 0), (11, 0));
    assert!(booking_window_violation(&far, &settings, now).is_some());
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Handler tests against real in-memory databases.

mod course_tests;
mod participant_flow_tests;
mod report_tests;

use campus_sched_domain::{DayHours, FacilityScheduleSettings, SessionKind};
use campus_sched_persistence::Persistence;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;

use crate::request_response::CreateSessionRequest;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

/// Early morning of the first test day; every booked slot starts later.
pub fn clock() -> NaiveDateTime {
    at(2026, 6, 1, 6, 0)
}

pub struct Fixture {
    pub db: Persistence,
    pub program_id: i64,
    pub facility_id: i64,
}

/// One program with one configured facility: open every day
/// 08:00-20:00, no buffers, one concurrent session, private sessions
/// capped at one participant.
pub fn fixture() -> Fixture {
    let mut db = Persistence::new_in_memory().expect("in-memory database");
    let program_id = db.create_program("Harborview Aquatics").expect("program");
    let facility_id = db.create_facility(program_id, "Main Pool").expect("facility");
    let hours = DayHours::new(
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
    )
    .unwrap();
    db.upsert_facility_settings(&FacilityScheduleSettings {
        facility_id,
        program_id,
        weekly_hours: [Some(hours); 7],
        booking_advance_days: 90,
        booking_cutoff_hours: 0,
        cancellation_cutoff_hours: 0,
        max_concurrent_sessions: 1,
        setup_buffer_minutes: 0,
        cleanup_buffer_minutes: 0,
        default_max_participants: None,
        kind_max_participants: vec![(SessionKind::Private, 1)],
        requires_equipment_setup: false,
        equipment_setup_minutes: 0,
        closure_dates: BTreeSet::new(),
    })
    .expect("settings");
    Fixture {
        db,
        program_id,
        facility_id,
    }
}

/// A plain two-seat group session request for the fixture facility.
pub fn create_req(f: &Fixture, start: NaiveDateTime, end: NaiveDateTime) -> CreateSessionRequest {
    CreateSessionRequest {
        program_id: f.program_id,
        facility_id: f.facility_id,
        course_id: None,
        title: String::from("Evening lap swim"),
        description: None,
        kind: SessionKind::Group,
        start_at: start,
        end_at: end,
        max_participants: Some(2),
        skill_level: None,
        recurrence: None,
        atomic: false,
    }
}

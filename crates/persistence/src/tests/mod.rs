// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

//! Persistence tests against uniquely named in-memory databases.


use campus_sched_domain::{
    CancelState, DayHours, FacilityScheduleSettings, ScheduledSession, SessionKind, SessionStatus,
    TimeRange,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;

use crate::Persistence;

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    day(y, m, d).and_hms_opt(h, min, 0).unwrap()
}

/// Settings open every day 08:00-20:00, no buffers, one slot at a time.
pub fn open_settings(program_id: i64, facility_id: i64) -> FacilityScheduleSettings {
    let hours = DayHours::new(
        NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
    )
    .unwrap();
    FacilityScheduleSettings {
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
    }
}

pub struct Fixture {
    pub db: Persistence,
    pub program_id: i64,
    pub facility_id: i64,
}

/// One program with one configured facility in a fresh database.
pub fn fixture() -> Fixture {
    let mut db = Persistence::new_in_memory().expect("in-memory database");
    let program_id = db.create_program("Lakeside Academy").expect("program");
    let facility_id = db.create_facility(program_id, "Main Pool").expect("facility");
    db.upsert_facility_settings(&open_settings(program_id, facility_id))
        .expect("settings");
    Fixture {
        db,
        program_id,
        facility_id,
    }
}

/// A scheduled group session draft in June 2026.
pub fn draft(
    program_id: i64,
    facility_id: i64,
    start: NaiveDateTime,
    end: NaiveDateTime,
    max_participants: Option<u32>,
) -> ScheduledSession {
    ScheduledSession {
        session_id: None,
        program_id,
        facility_id,
        course_id: None,
        title: String::from("Intermediate swim"),
        description: None,
        kind: SessionKind::Group,
        time: TimeRange::new(start, end).unwrap(),
        recurrence_group_id: None,
        status: SessionStatus::Scheduled,
        max_participants,
        skill_level: None,
        cancel_state: CancelState::Active,
    }
}

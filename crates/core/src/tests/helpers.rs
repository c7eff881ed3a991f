// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shared fixtures for engine tests.

use campus_sched_domain::{
    CancelState, DayHours, FacilityScheduleSettings, ParticipantStatus, ScheduledSession,
    SessionKind, SessionParticipant, SessionStatus, SessionTemplate, TimeRange,
};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::BTreeSet;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(d: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    d.and_hms_opt(hour, minute, 0).unwrap()
}

pub fn slot(d: NaiveDate, start: (u32, u32), end: (u32, u32)) -> TimeRange {
    TimeRange::new(at(d, start.0, start.1), at(d, end.0, end.1)).unwrap()
}

/// 2026-03-02, a Monday.
pub fn monday() -> NaiveDate {
    date(2026, 3, 2)
}

pub fn template(time: TimeRange) -> SessionTemplate {
    SessionTemplate {
        program_id: 1,
        facility_id: 1,
        course_id: None,
        title: String::from("Lap swim"),
        description: None,
        kind: SessionKind::Group,
        time,
        max_participants: Some(10),
        skill_level: None,
    }
}

/// Open 09:00-17:00 every day, 10+5 minute buffers, one session at a time.
pub fn settings() -> FacilityScheduleSettings {
    let hours = DayHours::new(
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
    )
    .unwrap();
    FacilityScheduleSettings {
        facility_id: 1,
        program_id: 1,
        weekly_hours: [Some(hours); 7],
        booking_advance_days: 90,
        booking_cutoff_hours: 2,
        cancellation_cutoff_hours: 24,
        max_concurrent_sessions: 1,
        setup_buffer_minutes: 10,
        cleanup_buffer_minutes: 5,
        default_max_participants: None,
        kind_max_participants: Vec::new(),
        requires_equipment_setup: false,
        equipment_setup_minutes: 0,
        closure_dates: BTreeSet::new(),
    }
}

pub fn session(session_id: i64, time: TimeRange) -> ScheduledSession {
    ScheduledSession {
        session_id: Some(session_id),
        program_id: 1,
        facility_id: 1,
        course_id: None,
        title: String::from("Existing"),
        description: None,
        kind: SessionKind::Group,
        time,
        recurrence_group_id: None,
        status: SessionStatus::Scheduled,
        max_participants: Some(2),
        skill_level: None,
        cancel_state: CancelState::Active,
    }
}

pub fn participant(
    participant_id: i64,
    student_id: i64,
    status: ParticipantStatus,
    waitlist_position: Option<u32>,
) -> SessionParticipant {
    SessionParticipant {
        participant_id: Some(participant_id),
        session_id: 1,
        student_id,
        status,
        waitlist_position,
        attendance: None,
        checked_in_at: None,
        checked_out_at: None,
        cancel_state: CancelState::Active,
    }
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod availability;
mod error;
mod facility;
mod recurrence;
mod session;
mod time_range;
mod types;

pub use availability::{AvailabilityShape, InstructorAvailability};
pub use error::DomainError;
pub use facility::{DayHours, FacilityScheduleSettings};
pub use recurrence::{
    MAX_OCCURRENCES, RecurrenceEnd, RecurrenceGroup, RecurrencePattern, RecurrenceSpec,
};
pub use session::{
    ScheduledSession, SessionInstructor, SessionParticipant, SessionTemplate,
};
pub use types::{
    AssignmentState, AttendanceStatus, CancelState, ParticipantStatus, SessionKind, SessionStatus,
};
pub use time_range::TimeRange;

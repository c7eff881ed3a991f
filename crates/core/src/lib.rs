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

//! The scheduling engine proper.
//!
//! Pure decision logic over already-loaded data: recurrence expansion,
//! conflict detection, capacity and waitlist decisions, instructor
//! assignment coverage, and lifecycle transition checks. Nothing in this
//! crate touches a database; callers load state, ask for a decision, and
//! persist the outcome inside their own transaction.

mod assignment;
mod capacity;
mod conflict;
mod error;
mod expand;
mod lifecycle;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use assignment::{active_primary, instructor_covers};
pub use capacity::{
    EnrollmentDecision, PromotionPlan, PromotionPolicy, decide_enrollment, enrolled_count,
    ensure_attendance_open, ensure_not_enrolled, next_waitlist_position, plan_promotion,
};
pub use conflict::{ConflictCheck, ConflictReason, booking_window_violation, check_availability};
pub use error::CoreError;
pub use expand::expand_sessions;
pub use lifecycle::{
    ShiftTarget, ensure_cancellable, ensure_participant_transition, ensure_session_transition,
    plan_group_shift, shift_delta,
};

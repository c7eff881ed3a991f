// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Handler functions, one per logical operation.
//!
//! Each handler validates references, loads what the engine needs,
//! delegates decisions to the core crate, and applies the outcome
//! through the persistence layer. Bulk operations process sub-items
//! independently and report per-item failures instead of aborting.
//!
//! Handlers take `now` explicitly so time-dependent decisions (booking
//! windows, enrollment on started sessions, promotion eligibility) are
//! deterministic under test.

use campus_sched::{
    ConflictCheck, ConflictReason, booking_window_violation, check_availability, enrolled_count,
    instructor_covers, plan_group_shift, shift_delta,
};
use campus_sched_domain::{
    FacilityScheduleSettings, RecurrenceGroup, RecurrenceSpec, ScheduledSession, SessionStatus,
    SessionTemplate, TimeRange,
};
use campus_sched_persistence::Persistence;
use chrono::NaiveDateTime;
use tracing::info;

use crate::error::{ApiError, translate_core_error, translate_domain_error};
use crate::request_response::{
    AddParticipantsRequest, AssignInstructorRequest, AssignInstructorResponse, AttendanceRequest,
    BulkParticipantResponse, CancelDayRequest, CancelSessionRequest, CancelSessionResponse,
    CheckConflictsRequest, CheckConflictsResponse, ConfirmInstructorRequest, CreateSessionRequest,
    CreateSessionResponse, FailedItem, FromCourseRequest, FromCourseResponse, InstructorView,
    ListSessionsQuery,
    ParticipantOutcome, ParticipantView, RejectedDraft, RemoveInstructorRequest,
    RemoveParticipantsRequest, SessionDetailResponse, SessionEnrollmentReport, SessionSummary,
    SkippedMember, StatusCounts, SyncCourseRequest, SyncCourseResponse, UpdateTimeRequest,
    UpdateTimeResponse, UtilizationQuery, UtilizationResponse,
};

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 500;

/// Reason code for drafts declined by the booking-window policy rather
/// than the conflict detector.
const OUTSIDE_BOOKING_WINDOW: &str = "outside_booking_window";

// ============================================================================
// Shared checks
// ============================================================================

/// Runs the conflict detector for a candidate slot against current
/// database state: buffered facility overlaps plus the combined busy
/// windows of the named instructors.
fn run_conflict_check(
    db: &mut Persistence,
    settings: &FacilityScheduleSettings,
    program_id: i64,
    facility_id: i64,
    candidate: &TimeRange,
    instructor_ids: &[i64],
    exclude_session: Option<i64>,
) -> Result<ConflictCheck, ApiError> {
    let widened = candidate.widened_by_minutes(i64::from(settings.total_buffer_minutes()));
    let facility_sessions =
        db.sessions_overlapping(program_id, facility_id, &widened, exclude_session)?;
    let mut instructor_busy = Vec::new();
    for instructor_id in instructor_ids {
        instructor_busy.extend(db.instructor_busy_windows(
            program_id,
            *instructor_id,
            candidate,
            exclude_session,
        )?);
    }
    Ok(check_availability(
        candidate,
        settings,
        &facility_sessions,
        &instructor_busy,
    ))
}

/// The instructors currently actively assigned to a session.
fn active_instructor_ids(
    db: &mut Persistence,
    session_id: i64,
) -> Result<Vec<i64>, ApiError> {
    Ok(db
        .list_assignments(session_id)?
        .iter()
        .filter(|a| a.state.is_active())
        .map(|a| a.instructor_id)
        .collect())
}

fn blocked_to_error(check: &ConflictCheck) -> ApiError {
    check.reason.map_or_else(
        || ApiError::Internal {
            message: String::from("conflict check blocked without a reason"),
        },
        |reason| ApiError::from_conflict(reason, check.conflicting_session_id),
    )
}

fn reason_of(check: &ConflictCheck) -> String {
    check
        .reason
        .map_or_else(|| String::from("conflict"), |r| r.as_str().to_string())
}

// ============================================================================
// Session creation
// ============================================================================

/// Creates a single or recurring session.
///
/// Recurring drafts are checked one by one; conflicting drafts are
/// reported and skipped unless `atomic` is set, in which case any
/// conflict fails the whole request. A single (non-recurring) request
/// with a conflicting slot fails outright.
///
/// # Errors
///
/// Returns validation errors for malformed input, `NotFound` for
/// missing references, and conflict errors per the above.
#[allow(clippy::too_many_lines)]
pub fn create_session(
    db: &mut Persistence,
    req: &CreateSessionRequest,
    now: NaiveDateTime,
) -> Result<CreateSessionResponse, ApiError> {
    db.require_program(req.program_id)?;
    db.require_facility(req.program_id, req.facility_id)?;
    if let Some(course_id) = req.course_id {
        db.require_course(req.program_id, course_id)?;
    }
    let settings = db.facility_settings(req.program_id, req.facility_id)?;

    let time = TimeRange::new(req.start_at, req.end_at).map_err(translate_domain_error)?;
    let template = SessionTemplate {
        program_id: req.program_id,
        facility_id: req.facility_id,
        course_id: req.course_id,
        title: req.title.clone(),
        description: req.description.clone(),
        kind: req.kind,
        time,
        max_participants: req
            .max_participants
            .or_else(|| settings.default_capacity_for(req.kind)),
        skill_level: req.skill_level.clone(),
    };
    let spec = req
        .recurrence
        .clone()
        .unwrap_or_else(RecurrenceSpec::single);
    let drafts = campus_sched::expand_sessions(&template, &spec).map_err(translate_core_error)?;

    // Evaluate drafts in order. Accepted drafts are persisted as we go,
    // so later drafts in the same series see earlier ones.
    let mut created = Vec::new();
    let mut rejected = Vec::new();
    let mut group_id = None;

    if req.atomic {
        // Check everything first; nothing persists unless all pass.
        for draft in &drafts {
            if let Some(rejection) = evaluate_draft(db, &settings, draft, now)? {
                rejected.push(rejection);
            }
        }
        if let Some(first) = rejected.first() {
            return Err(ApiError::Conflict {
                reason: first.reason.clone(),
                message: format!(
                    "{} of {} occurrences conflict; nothing was created (atomic)",
                    rejected.len(),
                    drafts.len()
                ),
                conflicting_session_id: first.conflicting_session_id,
            });
        }
        if spec.pattern.is_repeating() {
            group_id =
                Some(db.insert_recurrence_group(&RecurrenceGroup::new(req.program_id, spec))?);
        }
        let mut to_insert = drafts;
        for draft in &mut to_insert {
            draft.recurrence_group_id = group_id;
        }
        let ids = db.insert_sessions(&to_insert)?;
        for (id, draft) in ids.iter().zip(&to_insert) {
            let mut summary = SessionSummary::from_session(draft);
            summary.session_id = *id;
            created.push(summary);
        }
    } else {
        for mut draft in drafts {
            if let Some(rejection) = evaluate_draft(db, &settings, &draft, now)? {
                rejected.push(rejection);
                continue;
            }
            if spec.pattern.is_repeating() && group_id.is_none() {
                group_id = Some(
                    db.insert_recurrence_group(&RecurrenceGroup::new(
                        req.program_id,
                        spec.clone(),
                    ))?,
                );
            }
            draft.recurrence_group_id = group_id;
            let id = db.insert_session(&draft)?;
            let mut summary = SessionSummary::from_session(&draft);
            summary.session_id = id;
            created.push(summary);
        }

        // A plain single-session request does not get partial-success
        // treatment: its one conflict is the request's failure.
        if !spec.pattern.is_repeating()
            && created.is_empty()
            && let Some(rejection) = rejected.first()
        {
            if rejection.reason == OUTSIDE_BOOKING_WINDOW {
                return Err(ApiError::Validation {
                    field: String::from("start_at"),
                    message: rejection.message.clone(),
                });
            }
            return Err(ApiError::Conflict {
                reason: rejection.reason.clone(),
                message: rejection.message.clone(),
                conflicting_session_id: rejection.conflicting_session_id,
            });
        }
    }

    info!(
        "Created {} session(s) at facility {} ({} rejected)",
        created.len(),
        req.facility_id,
        rejected.len()
    );
    Ok(CreateSessionResponse {
        created,
        rejected,
        recurrence_group_id: group_id,
    })
}

/// Checks one draft against the booking window and the conflict
/// detector. `None` means the draft is acceptable.
fn evaluate_draft(
    db: &mut Persistence,
    settings: &FacilityScheduleSettings,
    draft: &ScheduledSession,
    now: NaiveDateTime,
) -> Result<Option<RejectedDraft>, ApiError> {
    if let Some(violation) = booking_window_violation(&draft.time, settings, now) {
        return Ok(Some(RejectedDraft {
            start_at: draft.time.start(),
            end_at: draft.time.end(),
            reason: OUTSIDE_BOOKING_WINDOW.to_string(),
            message: violation,
            conflicting_session_id: None,
        }));
    }
    let check = run_conflict_check(
        db,
        settings,
        draft.program_id,
        draft.facility_id,
        &draft.time,
        &[],
        None,
    )?;
    if check.available {
        return Ok(None);
    }
    let error = blocked_to_error(&check);
    Ok(Some(RejectedDraft {
        start_at: draft.time.start(),
        end_at: draft.time.end(),
        reason: reason_of(&check),
        message: error.to_string(),
        conflicting_session_id: check.conflicting_session_id,
    }))
}

// ============================================================================
// Session reads
// ============================================================================

/// Retrieves a session with its full roster and staff.
///
/// # Errors
///
/// Returns `NotFound` if the session does not exist in the program.
pub fn get_session_detail(
    db: &mut Persistence,
    program_id: i64,
    session_id: i64,
) -> Result<SessionDetailResponse, ApiError> {
    let session = db.get_session(program_id, session_id)?;
    let participants = db.list_participants(session_id)?;
    let instructors = db.list_assignments(session_id)?;
    Ok(SessionDetailResponse {
        session: SessionSummary::from_session(&session),
        course_id: session.course_id,
        description: session.description.clone(),
        skill_level: session.skill_level.clone(),
        participants: participants.iter().map(ParticipantView::from_participant).collect(),
        instructors: instructors.iter().map(InstructorView::from_assignment).collect(),
    })
}

/// Lists sessions at a facility with optional filters, paginated.
///
/// # Errors
///
/// Returns `NotFound` for a facility outside the program.
pub fn list_sessions(
    db: &mut Persistence,
    facility_id: i64,
    query: &ListSessionsQuery,
) -> Result<Vec<SessionSummary>, ApiError> {
    db.require_facility(query.program_id, facility_id)?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);
    let sessions = db.list_facility_sessions(
        query.program_id,
        facility_id,
        query.from,
        query.to,
        query.status,
        limit,
        offset,
    )?;
    Ok(sessions.iter().map(SessionSummary::from_session).collect())
}

// ============================================================================
// Time changes
// ============================================================================

/// Moves a session, or its whole recurrence group by the same delta.
///
/// A single move that conflicts fails; a group shift checks each member
/// independently, skipping and reporting conflicting members while
/// moving the rest.
///
/// # Errors
///
/// Returns `NotFound` for missing sessions, state errors for
/// non-scheduled ones, and conflict errors for single moves.
pub fn update_session_time(
    db: &mut Persistence,
    session_id: i64,
    req: &UpdateTimeRequest,
) -> Result<UpdateTimeResponse, ApiError> {
    let session = db.get_session(req.program_id, session_id)?;
    let new_time = TimeRange::new(req.start_at, req.end_at).map_err(translate_domain_error)?;
    let settings = db.facility_settings(req.program_id, session.facility_id)?;

    if req.apply_to_all_recurring
        && let Some(group_id) = session.recurrence_group_id
    {
        let delta = shift_delta(&session.time, &new_time);
        let members = db.group_members(req.program_id, group_id)?;
        let targets = plan_group_shift(&members, delta);

        let mut updated = Vec::new();
        let mut skipped = Vec::new();
        for target in targets {
            let instructors = active_instructor_ids(db, target.session_id)?;
            let check = run_conflict_check(
                db,
                &settings,
                req.program_id,
                session.facility_id,
                &target.new_time,
                &instructors,
                Some(target.session_id),
            )?;
            if check.available {
                db.update_session_time(req.program_id, target.session_id, &target.new_time)?;
                updated.push(target.session_id);
            } else {
                skipped.push(SkippedMember {
                    session_id: target.session_id,
                    reason: reason_of(&check),
                    message: blocked_to_error(&check).to_string(),
                });
            }
        }
        info!(
            "Shifted recurrence group {group_id}: {} moved, {} skipped",
            updated.len(),
            skipped.len()
        );
        return Ok(UpdateTimeResponse { updated, skipped });
    }

    let instructors = active_instructor_ids(db, session_id)?;
    let check = run_conflict_check(
        db,
        &settings,
        req.program_id,
        session.facility_id,
        &new_time,
        &instructors,
        Some(session_id),
    )?;
    if !check.available {
        return Err(blocked_to_error(&check));
    }
    db.update_session_time(req.program_id, session_id, &new_time)?;
    Ok(UpdateTimeResponse {
        updated: vec![session_id],
        skipped: Vec::new(),
    })
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Cancels a session, or every non-terminal member of its group.
///
/// # Errors
///
/// Returns `NotFound` for missing sessions and a state error when the
/// target session is already terminal.
pub fn cancel_session(
    db: &mut Persistence,
    session_id: i64,
    req: &CancelSessionRequest,
    now: NaiveDateTime,
) -> Result<CancelSessionResponse, ApiError> {
    let session = db.get_session(req.program_id, session_id)?;
    if req.cancel_all_recurring
        && let Some(group_id) = session.recurrence_group_id
    {
        let cancelled = db.cancel_group_sessions(
            req.program_id,
            group_id,
            &req.reason,
            &req.cancelled_by,
            now,
        )?;
        return Ok(CancelSessionResponse { cancelled });
    }
    db.cancel_session(req.program_id, session_id, &req.reason, &req.cancelled_by, now)?;
    Ok(CancelSessionResponse {
        cancelled: vec![session_id],
    })
}

/// Marks a session as running.
///
/// # Errors
///
/// Returns `NotFound` for missing sessions and a state error when the
/// transition table forbids the move.
pub fn start_session(
    db: &mut Persistence,
    program_id: i64,
    session_id: i64,
) -> Result<(), ApiError> {
    db.set_session_status(program_id, session_id, SessionStatus::InProgress)?;
    Ok(())
}

/// Marks a session as completed.
///
/// # Errors
///
/// Returns `NotFound` for missing sessions and a state error when the
/// transition table forbids the move.
pub fn complete_session(
    db: &mut Persistence,
    program_id: i64,
    session_id: i64,
) -> Result<(), ApiError> {
    db.set_session_status(program_id, session_id, SessionStatus::Completed)?;
    Ok(())
}

/// Cancels every still-cancellable session on a date at a facility.
///
/// # Errors
///
/// Returns `NotFound` for a facility outside the program.
pub fn cancel_facility_day(
    db: &mut Persistence,
    facility_id: i64,
    req: &CancelDayRequest,
    now: NaiveDateTime,
) -> Result<CancelSessionResponse, ApiError> {
    db.require_facility(req.program_id, facility_id)?;
    let cancelled = db.cancel_facility_day(
        req.program_id,
        facility_id,
        req.date,
        &req.reason,
        &req.cancelled_by,
        now,
    )?;
    Ok(CancelSessionResponse { cancelled })
}

// ============================================================================
// Participants
// ============================================================================

fn failed_item(student_id: i64, err: &ApiError) -> FailedItem {
    FailedItem {
        student_id,
        reason: err.reason_code(),
        message: err.to_string(),
    }
}

/// Enrolls a list of students, waitlisting those the session cannot
/// seat. Each student is processed independently.
///
/// # Errors
///
/// Returns `NotFound` when the session itself is missing; per-student
/// failures are reported in the response instead.
pub fn add_participants(
    db: &mut Persistence,
    session_id: i64,
    req: &AddParticipantsRequest,
    now: NaiveDateTime,
) -> Result<BulkParticipantResponse, ApiError> {
    db.get_session(req.program_id, session_id)?;
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    for student_id in &req.student_ids {
        let result = db
            .require_student(req.program_id, *student_id)
            .and_then(|()| db.enroll_participant(req.program_id, session_id, *student_id, now));
        match result {
            Ok(participant) => succeeded.push(ParticipantOutcome {
                student_id: *student_id,
                status: participant.status,
                waitlist_position: participant.waitlist_position,
            }),
            Err(err) => failed.push(failed_item(*student_id, &ApiError::from(err))),
        }
    }
    Ok(BulkParticipantResponse {
        succeeded,
        failed,
        promoted: Vec::new(),
    })
}

/// Cancels a list of enrollments, promoting from the waitlist after
/// each freed seat. Each student is processed independently.
///
/// # Errors
///
/// Returns `NotFound` when the session itself is missing; per-student
/// failures are reported in the response instead.
pub fn remove_participants(
    db: &mut Persistence,
    session_id: i64,
    req: &RemoveParticipantsRequest,
    now: NaiveDateTime,
) -> Result<BulkParticipantResponse, ApiError> {
    db.get_session(req.program_id, session_id)?;
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    let mut promoted = Vec::new();
    for student_id in &req.student_ids {
        match db.cancel_participant(
            req.program_id,
            session_id,
            *student_id,
            &req.reason,
            &req.cancelled_by,
            now,
            req.promotion_policy,
        ) {
            Ok(outcome) => {
                succeeded.push(ParticipantOutcome {
                    student_id: *student_id,
                    status: campus_sched_domain::ParticipantStatus::Cancelled,
                    waitlist_position: None,
                });
                promoted.extend(outcome.promoted);
            }
            Err(err) => failed.push(failed_item(*student_id, &ApiError::from(err))),
        }
    }
    Ok(BulkParticipantResponse {
        succeeded,
        failed,
        promoted,
    })
}

/// Records attendance for a list of students on a running or completed
/// session.
///
/// # Errors
///
/// Returns `NotFound` when the session itself is missing; per-student
/// failures are reported in the response instead.
pub fn mark_attendance(
    db: &mut Persistence,
    session_id: i64,
    req: &AttendanceRequest,
    now: NaiveDateTime,
) -> Result<BulkParticipantResponse, ApiError> {
    db.get_session(req.program_id, session_id)?;
    let mut succeeded = Vec::new();
    let mut failed = Vec::new();
    for entry in &req.entries {
        let result = db
            .mark_attendance(req.program_id, session_id, entry.student_id, entry.attendance, now)
            .and_then(|()| db.find_active_participant(session_id, entry.student_id));
        match result {
            Ok(Some(participant)) => succeeded.push(ParticipantOutcome {
                student_id: entry.student_id,
                status: participant.status,
                waitlist_position: participant.waitlist_position,
            }),
            Ok(None) => failed.push(FailedItem {
                student_id: entry.student_id,
                reason: String::from("not_found"),
                message: format!(
                    "active enrollment for student {} on session {session_id} not found",
                    entry.student_id
                ),
            }),
            Err(err) => failed.push(failed_item(entry.student_id, &ApiError::from(err))),
        }
    }
    Ok(BulkParticipantResponse {
        succeeded,
        failed,
        promoted: Vec::new(),
    })
}

// ============================================================================
// Instructors
// ============================================================================

/// Assigns an instructor to a session.
///
/// A hard time overlap with the instructor's other sessions always
/// fails. Availability coverage is advisory: a miss fails unless
/// `force` is set, in which case the response carries a warning.
///
/// # Errors
///
/// Returns `NotFound` for missing references, a state error for a
/// duplicate assignment, and a conflict error for overlaps or
/// unforced coverage misses.
pub fn assign_instructor(
    db: &mut Persistence,
    session_id: i64,
    req: &AssignInstructorRequest,
    now: NaiveDateTime,
) -> Result<AssignInstructorResponse, ApiError> {
    let session = db.get_session(req.program_id, session_id)?;
    db.require_instructor(req.program_id, req.instructor_id)?;

    let busy =
        db.instructor_busy_windows(req.program_id, req.instructor_id, &session.time, Some(session_id))?;
    if !busy.is_empty() {
        return Err(ApiError::from_conflict(ConflictReason::InstructorOverlap, None));
    }

    let availability = db.instructor_availability(req.program_id, req.instructor_id)?;
    let covered = instructor_covers(&availability, &session.time, session.facility_id);
    if !covered && !req.force {
        return Err(ApiError::Conflict {
            reason: String::from("instructor_unavailable"),
            message: format!(
                "Instructor {} has no availability covering this slot; set force to assign anyway",
                req.instructor_id
            ),
            conflicting_session_id: None,
        });
    }

    let outcome = db.assign_instructor(
        req.program_id,
        session_id,
        req.instructor_id,
        &req.assigned_by,
        req.is_primary,
        req.notes.clone(),
        now,
    )?;
    Ok(AssignInstructorResponse {
        assignment_id: outcome.assignment_id,
        demoted_assignment_id: outcome.demoted_assignment_id,
        warning: (!covered).then(|| {
            format!(
                "Instructor {} assigned outside declared availability",
                req.instructor_id
            )
        }),
    })
}

/// Removes an instructor's active assignment.
///
/// # Errors
///
/// Returns `NotFound` for a missing session or assignment.
pub fn remove_instructor(
    db: &mut Persistence,
    session_id: i64,
    req: &RemoveInstructorRequest,
    now: NaiveDateTime,
) -> Result<(), ApiError> {
    db.remove_instructor(
        req.program_id,
        session_id,
        req.instructor_id,
        &req.reason,
        &req.removed_by,
        now,
    )?;
    Ok(())
}

/// Marks an instructor's assignment as confirmed.
///
/// # Errors
///
/// Returns `NotFound` for a missing session or assignment.
pub fn confirm_instructor(
    db: &mut Persistence,
    session_id: i64,
    req: &ConfirmInstructorRequest,
    now: NaiveDateTime,
) -> Result<(), ApiError> {
    db.confirm_instructor(req.program_id, session_id, req.instructor_id, now)?;
    Ok(())
}

// ============================================================================
// Conflict dry run
// ============================================================================

/// Dry-runs the conflict detector for a candidate slot without writing
/// anything.
///
/// # Errors
///
/// Returns validation errors for malformed input and `NotFound` for
/// missing references.
pub fn check_conflicts(
    db: &mut Persistence,
    req: &CheckConflictsRequest,
    now: NaiveDateTime,
) -> Result<CheckConflictsResponse, ApiError> {
    db.require_facility(req.program_id, req.facility_id)?;
    for instructor_id in &req.instructor_ids {
        db.require_instructor(req.program_id, *instructor_id)?;
    }
    let candidate = TimeRange::new(req.start_at, req.end_at).map_err(translate_domain_error)?;
    let settings = db.facility_settings(req.program_id, req.facility_id)?;
    let check = run_conflict_check(
        db,
        &settings,
        req.program_id,
        req.facility_id,
        &candidate,
        &req.instructor_ids,
        req.exclude_session_id,
    )?;
    Ok(CheckConflictsResponse {
        available: check.available,
        reason: check.reason.map(|r| r.as_str().to_string()),
        conflicting_session_id: check.conflicting_session_id,
        booking_window_violation: booking_window_violation(&candidate, &settings, now),
    })
}

// ============================================================================
// Course integration
// ============================================================================

/// Creates sessions for a course and auto-enrolls its active students
/// into every created session.
///
/// # Errors
///
/// Fails like [`create_session`]; per-student enrollment failures are
/// reported in the response instead.
pub fn create_from_course(
    db: &mut Persistence,
    req: &FromCourseRequest,
    now: NaiveDateTime,
) -> Result<FromCourseResponse, ApiError> {
    let mut session_req = req.session.clone();
    session_req.course_id = Some(req.course_id);
    db.require_course(session_req.program_id, req.course_id)?;

    let creation = create_session(db, &session_req, now)?;
    let roster = db.active_course_students(req.course_id)?;

    let mut enrollment = Vec::new();
    for summary in &creation.created {
        let mut succeeded = Vec::new();
        let mut failed = Vec::new();
        for student_id in &roster {
            match db.enroll_participant(session_req.program_id, summary.session_id, *student_id, now)
            {
                Ok(participant) => succeeded.push(ParticipantOutcome {
                    student_id: *student_id,
                    status: participant.status,
                    waitlist_position: participant.waitlist_position,
                }),
                Err(err) => failed.push(failed_item(*student_id, &ApiError::from(err))),
            }
        }
        enrollment.push(SessionEnrollmentReport {
            session_id: summary.session_id,
            succeeded,
            failed,
        });
    }
    Ok(FromCourseResponse {
        creation,
        enrollment,
    })
}

/// Syncs a session's roster with its course enrollment: enrolls active
/// course students who are missing, cancels participants no longer in
/// the course.
///
/// # Errors
///
/// Returns `NotFound` for a missing session and a validation error for
/// a session with no course reference.
pub fn sync_course(
    db: &mut Persistence,
    session_id: i64,
    req: &SyncCourseRequest,
    now: NaiveDateTime,
) -> Result<SyncCourseResponse, ApiError> {
    let session = db.get_session(req.program_id, session_id)?;
    let Some(course_id) = session.course_id else {
        return Err(ApiError::Validation {
            field: String::from("course_id"),
            message: format!("session {session_id} is not linked to a course"),
        });
    };
    let roster = db.active_course_students(course_id)?;
    let participants = db.list_participants(session_id)?;
    let active_students: Vec<i64> = participants
        .iter()
        .filter(|p| p.cancel_state.is_active() && p.status.is_active())
        .map(|p| p.student_id)
        .collect();

    let mut enrolled = Vec::new();
    let mut cancelled = Vec::new();
    let mut failed = Vec::new();

    for student_id in &roster {
        if active_students.contains(student_id) {
            continue;
        }
        match db.enroll_participant(req.program_id, session_id, *student_id, now) {
            Ok(participant) => enrolled.push(ParticipantOutcome {
                student_id: *student_id,
                status: participant.status,
                waitlist_position: participant.waitlist_position,
            }),
            Err(err) => failed.push(failed_item(*student_id, &ApiError::from(err))),
        }
    }

    for student_id in &active_students {
        if roster.contains(student_id) {
            continue;
        }
        match db.cancel_participant(
            req.program_id,
            session_id,
            *student_id,
            "no longer enrolled in course",
            &req.synced_by,
            now,
            campus_sched::PromotionPolicy::SingleSeat,
        ) {
            Ok(_) => cancelled.push(*student_id),
            Err(err) => failed.push(failed_item(*student_id, &ApiError::from(err))),
        }
    }

    info!(
        "Synced session {session_id} with course {course_id}: {} enrolled, {} cancelled",
        enrolled.len(),
        cancelled.len()
    );
    Ok(SyncCourseResponse {
        enrolled,
        cancelled,
        failed,
    })
}

// ============================================================================
// Utilization
// ============================================================================

/// Reports facility utilization over an inclusive date range: session
/// counts by status, booked hours against open hours, and participant
/// totals.
///
/// # Errors
///
/// Returns `NotFound` for missing references and a validation error
/// for an inverted range.
#[allow(clippy::cast_precision_loss)]
pub fn facility_utilization(
    db: &mut Persistence,
    facility_id: i64,
    query: &UtilizationQuery,
) -> Result<UtilizationResponse, ApiError> {
    if query.to < query.from {
        return Err(ApiError::Validation {
            field: String::from("to"),
            message: format!("range end {} precedes start {}", query.to, query.from),
        });
    }
    db.require_facility(query.program_id, facility_id)?;
    let settings = db.facility_settings(query.program_id, facility_id)?;
    let sessions = db.list_facility_sessions(
        query.program_id,
        facility_id,
        Some(query.from),
        Some(query.to),
        None,
        i64::from(i32::MAX),
        0,
    )?;

    let mut by_status = StatusCounts::default();
    let mut booked_minutes: i64 = 0;
    let mut total_participants: u32 = 0;
    for session in &sessions {
        match session.status {
            SessionStatus::Scheduled => by_status.scheduled += 1,
            SessionStatus::InProgress => by_status.in_progress += 1,
            SessionStatus::Completed => by_status.completed += 1,
            SessionStatus::Cancelled => by_status.cancelled += 1,
        }
        if session.status.occupies_slot() {
            booked_minutes += session.time.duration().num_minutes();
        }
        if let Some(session_id) = session.session_id {
            let participants = db.list_participants(session_id)?;
            total_participants += enrolled_count(&participants);
        }
    }

    let mut open_minutes: i64 = 0;
    let mut date = query.from;
    while date <= query.to {
        if let Some(window) = settings.operating_window(date) {
            open_minutes += window.duration().num_minutes();
        }
        let Some(next) = date.succ_opt() else { break };
        date = next;
    }

    let booked_hours = booked_minutes as f64 / 60.0;
    let open_hours = open_minutes as f64 / 60.0;
    let utilization = if open_minutes > 0 {
        booked_minutes as f64 / open_minutes as f64
    } else {
        0.0
    };

    Ok(UtilizationResponse {
        facility_id,
        from: query.from,
        to: query.to,
        total_sessions: u32::try_from(sessions.len()).unwrap_or(u32::MAX),
        by_status,
        booked_hours,
        open_hours,
        utilization,
        total_participants,
    })
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurrence expansion: template + specification -> concrete drafts.

use campus_sched_domain::{
    DomainError, MAX_OCCURRENCES, RecurrenceEnd, RecurrencePattern, RecurrenceSpec,
    ScheduledSession, SessionTemplate, TimeRange,
};
use chrono::{Datelike, Days, Months, NaiveDate};

use crate::error::CoreError;

/// Guard on the date walk itself, independent of how many occurrences are
/// produced. Covers 500 occurrences at any practical interval.
const WALK_LIMIT: usize = MAX_OCCURRENCES * 366;

/// Expands a session template into concrete, unpersisted session drafts.
///
/// A non-repeating specification produces exactly one draft. Repeating
/// specifications walk forward from the template's start date, applying
/// the interval (and the weekday filter for weekly patterns), skipping
/// exception dates, until the end condition is met. Exception dates do
/// not count toward an occurrence-count end condition. Every draft
/// inherits the template's non-temporal fields and carries no recurrence
/// group yet; the caller attaches the group after persisting it.
///
/// Monthly expansion anchors on the template's day-of-month and clamps
/// to the last day of shorter months (Jan 31 -> Feb 28 -> Mar 31).
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` if:
/// - the specification fails [`RecurrenceSpec::validate`]
/// - a repeating template does not start and end on the same day
/// - the expansion would produce more than [`MAX_OCCURRENCES`] sessions
pub fn expand_sessions(
    template: &SessionTemplate,
    spec: &RecurrenceSpec,
) -> Result<Vec<ScheduledSession>, CoreError> {
    spec.validate()?;

    if !spec.pattern.is_repeating() {
        return Ok(vec![ScheduledSession::from_template(
            template,
            template.time,
            None,
        )]);
    }

    let first_date = template.time.start().date();
    if template.time.end().date() != first_date {
        return Err(DomainError::InvalidRecurrence {
            reason: String::from("recurring sessions must start and end on the same day"),
        }
        .into());
    }
    let start_time = template.time.start().time();
    let end_time = template.time.end().time();

    let mut drafts = Vec::new();
    let mut step = 0usize;
    let mut walked = 0usize;

    loop {
        let Some(date) = candidate_date(spec.pattern, first_date, spec.interval, step) else {
            // Ran off the calendar; nothing further can match.
            break;
        };
        step += 1;
        walked += 1;
        if walked > WALK_LIMIT {
            return Err(DomainError::RecurrenceLimitExceeded {
                max: MAX_OCCURRENCES,
            }
            .into());
        }

        match spec.end {
            Some(RecurrenceEnd::OnDate(end)) if date > end => break,
            Some(RecurrenceEnd::AfterOccurrences(n)) if drafts.len() >= n as usize => break,
            // validate() guarantees an end condition for repeating patterns.
            None => break,
            Some(_) => {}
        }

        if spec.pattern == RecurrencePattern::Weekly
            && !weekly_match(spec, first_date, date, spec.interval)
        {
            continue;
        }
        if spec.exception_dates.contains(&date) {
            continue;
        }

        let time = TimeRange::new(date.and_time(start_time), date.and_time(end_time))
            .map_err(CoreError::from)?;
        drafts.push(ScheduledSession::from_template(template, time, None));
        if drafts.len() > MAX_OCCURRENCES {
            return Err(DomainError::RecurrenceLimitExceeded {
                max: MAX_OCCURRENCES,
            }
            .into());
        }
    }

    Ok(drafts)
}

/// The `step`-th candidate date for a pattern. Weekly patterns walk day
/// by day and rely on [`weekly_match`] to filter.
fn candidate_date(
    pattern: RecurrencePattern,
    first: NaiveDate,
    interval: u32,
    step: usize,
) -> Option<NaiveDate> {
    let step = u64::try_from(step).ok()?;
    match pattern {
        RecurrencePattern::None => (step == 0).then_some(first),
        RecurrencePattern::Daily => first.checked_add_days(Days::new(step * u64::from(interval))),
        RecurrencePattern::Weekly => first.checked_add_days(Days::new(step)),
        RecurrencePattern::Monthly => {
            let months = u32::try_from(step).ok()?.checked_mul(interval)?;
            first.checked_add_months(Months::new(months))
        }
    }
}

/// Whether `date` falls on a selected weekday in an on-interval week.
/// Weeks are Monday-based and counted from the week of the first date.
fn weekly_match(spec: &RecurrenceSpec, first: NaiveDate, date: NaiveDate, interval: u32) -> bool {
    if !spec.weekdays.contains(&date.weekday()) {
        return false;
    }
    let first_week = first - Days::new(u64::from(first.weekday().num_days_from_monday()));
    let date_week = date - Days::new(u64::from(date.weekday().num_days_from_monday()));
    let weeks = (date_week - first_week).num_days() / 7;
    weeks % i64::from(interval) == 0
}

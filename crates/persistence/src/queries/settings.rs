// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Facility schedule settings lookup.

use campus_sched_domain::FacilityScheduleSettings;
use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::data_models::SettingsRow;
use crate::diesel_schema::facility_schedule_settings;
use crate::error::PersistenceError;

/// Retrieves the schedule settings row for a facility.
///
/// Exactly one row exists per configured facility; a facility without
/// one cannot be scheduled against.
///
/// # Errors
///
/// Returns `NotFound` if no settings row exists for the facility in
/// the program.
pub fn facility_settings(
    conn: &mut SqliteConnection,
    program_id: i64,
    facility_id: i64,
) -> Result<FacilityScheduleSettings, PersistenceError> {
    let row: SettingsRow = facility_schedule_settings::table
        .filter(facility_schedule_settings::facility_id.eq(facility_id))
        .filter(facility_schedule_settings::program_id.eq(program_id))
        .first(conn)
        .optional()?
        .ok_or_else(|| {
            PersistenceError::NotFound(format!(
                "schedule settings for facility {facility_id} in program {program_id}"
            ))
        })?;
    row.into_domain()
}

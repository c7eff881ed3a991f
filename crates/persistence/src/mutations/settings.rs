// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Facility schedule settings writes.

use campus_sched_domain::FacilityScheduleSettings;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::data_models::NewSettingsRow;
use crate::diesel_schema::facility_schedule_settings;
use crate::error::PersistenceError;

/// Replaces the schedule settings for a facility.
///
/// One settings row exists per facility; the replace happens as a
/// delete-then-insert in a single transaction.
///
/// # Errors
///
/// Returns an error if the settings cannot be encoded or the write
/// fails.
pub fn upsert_facility_settings(
    conn: &mut SqliteConnection,
    settings: &FacilityScheduleSettings,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::delete(
            facility_schedule_settings::table
                .filter(facility_schedule_settings::facility_id.eq(settings.facility_id))
                .filter(facility_schedule_settings::program_id.eq(settings.program_id)),
        )
        .execute(conn)?;
        let row = NewSettingsRow::from_domain(settings)?;
        diesel::insert_into(facility_schedule_settings::table)
            .values(row)
            .execute(conn)?;
        info!(
            "Updated schedule settings for facility {} in program {}",
            settings.facility_id, settings.program_id
        );
        Ok(())
    })
}

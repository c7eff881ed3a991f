// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference-entity writes: programs, facilities, students,
//! instructors, courses, and course membership.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::backend::get_last_insert_rowid;
use crate::diesel_schema::{course_enrollments, courses, facilities, instructors, programs, students};
use crate::error::PersistenceError;

/// Creates a program and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_program(conn: &mut SqliteConnection, name: &str) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(programs::table)
            .values(programs::name.eq(name))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Creates a facility in a program and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_facility(
    conn: &mut SqliteConnection,
    program_id: i64,
    name: &str,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(facilities::table)
            .values((
                facilities::program_id.eq(program_id),
                facilities::name.eq(name),
            ))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Creates a student in a program and returns their ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_student(
    conn: &mut SqliteConnection,
    program_id: i64,
    name: &str,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(students::table)
            .values((students::program_id.eq(program_id), students::name.eq(name)))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Creates an instructor in a program and returns their ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_instructor(
    conn: &mut SqliteConnection,
    program_id: i64,
    name: &str,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(instructors::table)
            .values((
                instructors::program_id.eq(program_id),
                instructors::name.eq(name),
            ))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Creates a course in a program and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_course(
    conn: &mut SqliteConnection,
    program_id: i64,
    name: &str,
) -> Result<i64, PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(courses::table)
            .values((courses::program_id.eq(program_id), courses::name.eq(name)))
            .execute(conn)?;
        get_last_insert_rowid(conn)
    })
}

/// Upserts a course enrollment row.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn set_course_enrollment(
    conn: &mut SqliteConnection,
    course_id: i64,
    student_id: i64,
    is_active: bool,
) -> Result<(), PersistenceError> {
    conn.immediate_transaction(|conn| {
        diesel::insert_into(course_enrollments::table)
            .values((
                course_enrollments::course_id.eq(course_id),
                course_enrollments::student_id.eq(student_id),
                course_enrollments::is_active.eq(i32::from(is_active)),
            ))
            .on_conflict((course_enrollments::course_id, course_enrollments::student_id))
            .do_update()
            .set(course_enrollments::is_active.eq(i32::from(is_active)))
            .execute(conn)?;
        Ok(())
    })
}

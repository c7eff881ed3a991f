// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference-entity lookups.
//!
//! The engine does not own programs, facilities, students, instructors,
//! or courses; it only validates that a referenced entity exists and
//! belongs to the requesting program. A cross-program reference fails
//! exactly like a missing one.

use diesel::prelude::*;
use diesel::SqliteConnection;

use crate::diesel_schema::{course_enrollments, courses, facilities, instructors, programs, students};
use crate::error::PersistenceError;

/// Validates that a program exists.
///
/// # Errors
///
/// Returns `NotFound` if the program does not exist.
pub fn require_program(conn: &mut SqliteConnection, program_id: i64) -> Result<(), PersistenceError> {
    let found: i64 = programs::table
        .filter(programs::program_id.eq(program_id))
        .count()
        .get_result(conn)?;
    if found == 0 {
        return Err(PersistenceError::NotFound(format!("program {program_id}")));
    }
    Ok(())
}

/// Validates that a facility exists in the program.
///
/// # Errors
///
/// Returns `NotFound` if the facility is missing or owned by another
/// program.
pub fn require_facility(
    conn: &mut SqliteConnection,
    program_id: i64,
    facility_id: i64,
) -> Result<(), PersistenceError> {
    let found: i64 = facilities::table
        .filter(facilities::facility_id.eq(facility_id))
        .filter(facilities::program_id.eq(program_id))
        .count()
        .get_result(conn)?;
    if found == 0 {
        return Err(PersistenceError::NotFound(format!(
            "facility {facility_id} in program {program_id}"
        )));
    }
    Ok(())
}

/// Validates that a student exists in the program.
///
/// # Errors
///
/// Returns `NotFound` if the student is missing or owned by another
/// program.
pub fn require_student(
    conn: &mut SqliteConnection,
    program_id: i64,
    student_id: i64,
) -> Result<(), PersistenceError> {
    let found: i64 = students::table
        .filter(students::student_id.eq(student_id))
        .filter(students::program_id.eq(program_id))
        .count()
        .get_result(conn)?;
    if found == 0 {
        return Err(PersistenceError::NotFound(format!(
            "student {student_id} in program {program_id}"
        )));
    }
    Ok(())
}

/// Validates that an instructor exists in the program.
///
/// # Errors
///
/// Returns `NotFound` if the instructor is missing or owned by another
/// program.
pub fn require_instructor(
    conn: &mut SqliteConnection,
    program_id: i64,
    instructor_id: i64,
) -> Result<(), PersistenceError> {
    let found: i64 = instructors::table
        .filter(instructors::instructor_id.eq(instructor_id))
        .filter(instructors::program_id.eq(program_id))
        .count()
        .get_result(conn)?;
    if found == 0 {
        return Err(PersistenceError::NotFound(format!(
            "instructor {instructor_id} in program {program_id}"
        )));
    }
    Ok(())
}

/// Validates that a course exists in the program.
///
/// # Errors
///
/// Returns `NotFound` if the course is missing or owned by another
/// program.
pub fn require_course(
    conn: &mut SqliteConnection,
    program_id: i64,
    course_id: i64,
) -> Result<(), PersistenceError> {
    let found: i64 = courses::table
        .filter(courses::course_id.eq(course_id))
        .filter(courses::program_id.eq(program_id))
        .count()
        .get_result(conn)?;
    if found == 0 {
        return Err(PersistenceError::NotFound(format!(
            "course {course_id} in program {program_id}"
        )));
    }
    Ok(())
}

/// Lists the student IDs actively enrolled in a course.
///
/// # Errors
///
/// Returns an error if the database cannot be queried.
pub fn active_course_students(
    conn: &mut SqliteConnection,
    course_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(course_enrollments::table
        .filter(course_enrollments::course_id.eq(course_id))
        .filter(course_enrollments::is_active.eq(1))
        .select(course_enrollments::student_id)
        .order(course_enrollments::student_id.asc())
        .load(conn)?)
}

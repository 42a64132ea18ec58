//! Reference data store: grades, majors, students, absences and runtime
//! teacher authorizations.
//!
//! Every operation that combines an existence/duplicate check with a write
//! runs inside a single transaction. Domain outcomes (conflict, not-found,
//! blocked by dependents) are returned as enum variants; `Err` is reserved
//! for SQLite infrastructure failures.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: String,
    pub full_name: String,
    pub grade: String,
    pub major: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed,
    NotFound,
    NameTaken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
    HasDependents,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateStudentOutcome {
    Updated,
    NotFound,
    GradeMissing,
    MajorMissing,
    Duplicate,
}

/// Result of a bulk student insert or an absence confirmation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub added: usize,
    pub skipped: usize,
}

pub fn list_grades(conn: &Connection) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM grades ORDER BY name ASC")?;
    let rows = stmt.query_map([], |r| r.get(0))?;
    rows.collect()
}

pub fn grade_exists(conn: &Connection, name: &str) -> rusqlite::Result<bool> {
    conn.query_row("SELECT 1 FROM grades WHERE name = ?", [name], |r| {
        r.get::<_, i64>(0)
    })
    .optional()
    .map(|v| v.is_some())
}

pub fn add_grade(conn: &Connection, name: &str) -> rusqlite::Result<AddOutcome> {
    let tx = conn.unchecked_transaction()?;
    if grade_exists(&tx, name)? {
        return Ok(AddOutcome::AlreadyExists);
    }
    tx.execute("INSERT INTO grades(name) VALUES(?)", [name])?;
    tx.commit()?;
    Ok(AddOutcome::Added)
}

/// Rename a grade and propagate the new name to every major and student that
/// references it, all in one transaction.
pub fn rename_grade(conn: &Connection, old: &str, new: &str) -> rusqlite::Result<RenameOutcome> {
    let tx = conn.unchecked_transaction()?;
    if !grade_exists(&tx, old)? {
        return Ok(RenameOutcome::NotFound);
    }
    if grade_exists(&tx, new)? {
        return Ok(RenameOutcome::NameTaken);
    }
    tx.execute("UPDATE grades SET name = ? WHERE name = ?", (new, old))?;
    tx.execute("UPDATE majors SET grade = ? WHERE grade = ?", (new, old))?;
    tx.execute("UPDATE students SET grade = ? WHERE grade = ?", (new, old))?;
    tx.commit()?;
    Ok(RenameOutcome::Renamed)
}

pub fn delete_grade(conn: &Connection, name: &str) -> rusqlite::Result<DeleteOutcome> {
    let tx = conn.unchecked_transaction()?;
    if !grade_exists(&tx, name)? {
        return Ok(DeleteOutcome::NotFound);
    }
    let has_students: Option<i64> = tx
        .query_row("SELECT 1 FROM students WHERE grade = ? LIMIT 1", [name], |r| {
            r.get(0)
        })
        .optional()?;
    let has_majors: Option<i64> = tx
        .query_row("SELECT 1 FROM majors WHERE grade = ? LIMIT 1", [name], |r| {
            r.get(0)
        })
        .optional()?;
    if has_students.is_some() || has_majors.is_some() {
        return Ok(DeleteOutcome::HasDependents);
    }
    tx.execute("DELETE FROM grades WHERE name = ?", [name])?;
    tx.commit()?;
    Ok(DeleteOutcome::Deleted)
}

pub fn list_majors(conn: &Connection, grade: &str) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM majors WHERE grade = ? ORDER BY name ASC")?;
    let rows = stmt.query_map([grade], |r| r.get(0))?;
    rows.collect()
}

pub fn major_exists(conn: &Connection, grade: &str, name: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM majors WHERE grade = ? AND name = ?",
        (grade, name),
        |r| r.get::<_, i64>(0),
    )
    .optional()
    .map(|v| v.is_some())
}

pub fn add_major(conn: &Connection, grade: &str, name: &str) -> rusqlite::Result<AddOutcome> {
    let tx = conn.unchecked_transaction()?;
    if major_exists(&tx, grade, name)? {
        return Ok(AddOutcome::AlreadyExists);
    }
    tx.execute(
        "INSERT INTO majors(grade, name) VALUES(?, ?)",
        (grade, name),
    )?;
    tx.commit()?;
    Ok(AddOutcome::Added)
}

/// Rename a major within a grade and propagate to students of that grade.
pub fn rename_major(
    conn: &Connection,
    grade: &str,
    old: &str,
    new: &str,
) -> rusqlite::Result<RenameOutcome> {
    let tx = conn.unchecked_transaction()?;
    if !major_exists(&tx, grade, old)? {
        return Ok(RenameOutcome::NotFound);
    }
    if major_exists(&tx, grade, new)? {
        return Ok(RenameOutcome::NameTaken);
    }
    tx.execute(
        "UPDATE majors SET name = ? WHERE grade = ? AND name = ?",
        (new, grade, old),
    )?;
    tx.execute(
        "UPDATE students SET major = ? WHERE grade = ? AND major = ?",
        (new, grade, old),
    )?;
    tx.commit()?;
    Ok(RenameOutcome::Renamed)
}

pub fn delete_major(conn: &Connection, grade: &str, name: &str) -> rusqlite::Result<DeleteOutcome> {
    let tx = conn.unchecked_transaction()?;
    if !major_exists(&tx, grade, name)? {
        return Ok(DeleteOutcome::NotFound);
    }
    let has_students: Option<i64> = tx
        .query_row(
            "SELECT 1 FROM students WHERE grade = ? AND major = ? LIMIT 1",
            (grade, name),
            |r| r.get(0),
        )
        .optional()?;
    if has_students.is_some() {
        return Ok(DeleteOutcome::HasDependents);
    }
    tx.execute(
        "DELETE FROM majors WHERE grade = ? AND name = ?",
        (grade, name),
    )?;
    tx.commit()?;
    Ok(DeleteOutcome::Deleted)
}

pub fn list_students(conn: &Connection, grade: &str, major: &str) -> rusqlite::Result<Vec<Student>> {
    let mut stmt = conn.prepare(
        "SELECT id, full_name, grade, major
         FROM students
         WHERE grade = ? AND major = ?
         ORDER BY full_name ASC",
    )?;
    let rows = stmt.query_map((grade, major), |r| {
        Ok(Student {
            id: r.get(0)?,
            full_name: r.get(1)?,
            grade: r.get(2)?,
            major: r.get(3)?,
        })
    })?;
    rows.collect()
}

pub fn get_student(conn: &Connection, id: &str) -> rusqlite::Result<Option<Student>> {
    conn.query_row(
        "SELECT id, full_name, grade, major FROM students WHERE id = ?",
        [id],
        |r| {
            Ok(Student {
                id: r.get(0)?,
                full_name: r.get(1)?,
                grade: r.get(2)?,
                major: r.get(3)?,
            })
        },
    )
    .optional()
}

/// Insert a pre-parsed batch of students for one grade/major. Candidates are
/// first deduplicated in-memory by id and by the (name, grade, major) triple
/// so a same-batch collision cannot roll back the whole transaction; the
/// survivors are then checked against the store row by row.
pub fn add_students(
    conn: &Connection,
    grade: &str,
    major: &str,
    entries: &[(String, String)],
) -> rusqlite::Result<BatchOutcome> {
    let mut out = BatchOutcome::default();

    let mut seen_ids: HashSet<&str> = HashSet::new();
    let mut seen_names: HashSet<&str> = HashSet::new();
    let mut unique: Vec<(&str, &str)> = Vec::new();
    for (id, full_name) in entries {
        if seen_ids.contains(id.as_str()) || seen_names.contains(full_name.as_str()) {
            out.skipped += 1;
            continue;
        }
        seen_ids.insert(id);
        seen_names.insert(full_name);
        unique.push((id, full_name));
    }

    let tx = conn.unchecked_transaction()?;
    for (id, full_name) in unique {
        let id_taken: Option<i64> = tx
            .query_row("SELECT 1 FROM students WHERE id = ?", [id], |r| r.get(0))
            .optional()?;
        if id_taken.is_some() {
            out.skipped += 1;
            continue;
        }
        let name_taken: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM students WHERE full_name = ? AND grade = ? AND major = ?",
                (full_name, grade, major),
                |r| r.get(0),
            )
            .optional()?;
        if name_taken.is_some() {
            out.skipped += 1;
            continue;
        }
        tx.execute(
            "INSERT INTO students(id, full_name, grade, major) VALUES(?, ?, ?, ?)",
            (id, full_name, grade, major),
        )?;
        out.added += 1;
    }
    tx.commit()?;
    Ok(out)
}

pub fn update_student(
    conn: &Connection,
    id: &str,
    full_name: &str,
    grade: &str,
    major: &str,
) -> rusqlite::Result<UpdateStudentOutcome> {
    let tx = conn.unchecked_transaction()?;
    let exists: Option<i64> = tx
        .query_row("SELECT 1 FROM students WHERE id = ?", [id], |r| r.get(0))
        .optional()?;
    if exists.is_none() {
        return Ok(UpdateStudentOutcome::NotFound);
    }
    if !grade_exists(&tx, grade)? {
        return Ok(UpdateStudentOutcome::GradeMissing);
    }
    if !major_exists(&tx, grade, major)? {
        return Ok(UpdateStudentOutcome::MajorMissing);
    }
    let duplicate: Option<i64> = tx
        .query_row(
            "SELECT 1 FROM students
             WHERE id != ? AND full_name = ? AND grade = ? AND major = ?",
            (id, full_name, grade, major),
            |r| r.get(0),
        )
        .optional()?;
    if duplicate.is_some() {
        return Ok(UpdateStudentOutcome::Duplicate);
    }
    tx.execute(
        "UPDATE students SET full_name = ?, grade = ?, major = ? WHERE id = ?",
        (full_name, grade, major, id),
    )?;
    tx.commit()?;
    Ok(UpdateStudentOutcome::Updated)
}

/// Delete a student and all of its absence rows in one transaction, so no
/// orphaned absence ever references a missing student.
pub fn delete_student(conn: &Connection, id: &str) -> rusqlite::Result<DeleteOutcome> {
    let tx = conn.unchecked_transaction()?;
    let exists: Option<i64> = tx
        .query_row("SELECT 1 FROM students WHERE id = ?", [id], |r| r.get(0))
        .optional()?;
    if exists.is_none() {
        return Ok(DeleteOutcome::NotFound);
    }
    tx.execute("DELETE FROM absences WHERE student_id = ?", [id])?;
    tx.execute("DELETE FROM students WHERE id = ?", [id])?;
    tx.commit()?;
    Ok(DeleteOutcome::Deleted)
}

/// Record absences for a set of students on one calendar date. A student
/// already marked absent on that date is counted as skipped, never updated.
pub fn record_absences<'a, I>(
    conn: &Connection,
    student_ids: I,
    teacher_id: i64,
    absence_date: NaiveDate,
    created_at: DateTime<Tz>,
) -> rusqlite::Result<BatchOutcome>
where
    I: IntoIterator<Item = &'a String>,
{
    let date = absence_date.format("%Y-%m-%d").to_string();
    let created = created_at.to_rfc3339();

    let mut out = BatchOutcome::default();
    let tx = conn.unchecked_transaction()?;
    for student_id in student_ids {
        let exists: Option<i64> = tx
            .query_row(
                "SELECT 1 FROM absences WHERE student_id = ? AND absence_date = ?",
                (student_id, &date),
                |r| r.get(0),
            )
            .optional()?;
        if exists.is_some() {
            out.skipped += 1;
            continue;
        }
        tx.execute(
            "INSERT INTO absences(student_id, teacher_id, absence_date, created_at)
             VALUES(?, ?, ?, ?)",
            (student_id, teacher_id, &date, &created),
        )?;
        out.added += 1;
    }
    tx.commit()?;
    Ok(out)
}

pub fn is_authorized_teacher(conn: &Connection, telegram_id: i64) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT 1 FROM authorized_teachers WHERE telegram_id = ?",
        [telegram_id],
        |r| r.get::<_, i64>(0),
    )
    .optional()
    .map(|v| v.is_some())
}

pub fn add_authorized_teacher(conn: &Connection, telegram_id: i64) -> rusqlite::Result<AddOutcome> {
    let tx = conn.unchecked_transaction()?;
    if is_authorized_teacher(&tx, telegram_id)? {
        return Ok(AddOutcome::AlreadyExists);
    }
    tx.execute(
        "INSERT INTO authorized_teachers(telegram_id) VALUES(?)",
        [telegram_id],
    )?;
    tx.commit()?;
    Ok(AddOutcome::Added)
}

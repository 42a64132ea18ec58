use rusqlite::Connection;
use std::path::Path;

use crate::config::GradeSeed;

pub fn open_db(sqlite_path: &Path) -> anyhow::Result<Connection> {
    if let Some(parent) = sqlite_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let conn = Connection::open(sqlite_path)?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS grades(
            name TEXT PRIMARY KEY
        )",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS majors(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            grade TEXT NOT NULL,
            name TEXT NOT NULL,
            UNIQUE(grade, name)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_majors_grade ON majors(grade)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS students(
            id TEXT PRIMARY KEY,
            full_name TEXT NOT NULL,
            grade TEXT NOT NULL,
            major TEXT NOT NULL,
            UNIQUE(full_name, grade, major)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_students_grade_major ON students(grade, major)",
        [],
    )?;

    // Referential integrity between grades, majors and students is enforced
    // at the application layer inside each transaction.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS absences(
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            student_id TEXT NOT NULL,
            teacher_id INTEGER NOT NULL,
            absence_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            UNIQUE(student_id, absence_date)
        )",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_absences_student ON absences(student_id)",
        [],
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS authorized_teachers(
            telegram_id INTEGER PRIMARY KEY
        )",
        [],
    )?;

    Ok(conn)
}

/// Seed configured grades and their majors. Existing rows are left alone, so
/// renames done through the bot survive restarts.
pub fn seed_grades(conn: &Connection, seeds: &[GradeSeed]) -> anyhow::Result<()> {
    let tx = conn.unchecked_transaction()?;
    for seed in seeds {
        tx.execute(
            "INSERT OR IGNORE INTO grades(name) VALUES(?)",
            [&seed.name],
        )?;
        for major in &seed.majors {
            tx.execute(
                "INSERT OR IGNORE INTO majors(grade, name) VALUES(?, ?)",
                (&seed.name, major),
            )?;
        }
    }
    tx.commit()?;
    Ok(())
}

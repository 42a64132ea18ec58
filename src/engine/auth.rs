//! Two-tier authorization: teachers (static lists plus the runtime table)
//! and management (static list only).

use rusqlite::Connection;

use crate::config::Config;
use crate::store;

/// True for statically configured teachers and managers, and for ids granted
/// at runtime through the authorized_teachers table.
pub fn is_authorized(conn: &Connection, config: &Config, user_id: i64) -> rusqlite::Result<bool> {
    if config.authorized_teacher_ids.contains(&user_id)
        || config.management_user_ids.contains(&user_id)
    {
        return Ok(true);
    }
    store::is_authorized_teacher(conn, user_id)
}

/// Management is never derived from the runtime table: teacher authorization
/// is extensible at runtime, management authorization is not.
pub fn is_management(config: &Config, user_id: i64) -> bool {
    config.management_user_ids.contains(&user_id)
}

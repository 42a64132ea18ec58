pub mod absence;
pub mod grades;
pub mod majors;
pub mod management;
pub mod menus;
pub mod students;

use rusqlite::Connection;

use crate::config::Config;
use crate::engine::auth;
use crate::engine::session::Session;

/// Everything a handler needs for one event: the shared store connection and
/// config, plus the acting user's own session.
pub struct Ctx<'a> {
    pub conn: &'a Connection,
    pub config: &'a Config,
    pub session: &'a mut Session,
    pub user_id: i64,
}

impl Ctx<'_> {
    pub fn is_management(&self) -> bool {
        auth::is_management(self.config, self.user_id)
    }
}

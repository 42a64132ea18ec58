//! Event dispatch: authorization gate, action decoding, per-flow text
//! routing, and the top-level error boundary.

use rusqlite::Connection;

use crate::config::Config;
use crate::engine::action::Action;
use crate::engine::auth;
use crate::engine::handlers::{
    absence, grades, majors, management, menus, students, Ctx,
};
use crate::engine::session::{Flow, MajorsOrigin, SessionStore};
use crate::engine::types::{Effect, Event, EventKind, Keyboard};

const UNAUTHORIZED: &str = "🚫 You are not authorized to use this bot.";
const UNEXPECTED: &str = "An unexpected error occurred. Please try again later.";

pub struct Engine {
    conn: Connection,
    config: Config,
    sessions: SessionStore,
}

impl Engine {
    pub fn new(conn: Connection, config: Config) -> Self {
        Engine {
            conn,
            config,
            sessions: SessionStore::default(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Single entry point per inbound event. Infrastructure errors are
    /// logged here and surfaced as the generic failure message; the session
    /// is left as-is so the user may retry the same input.
    pub fn handle_event(&mut self, event: Event) -> Vec<Effect> {
        let user_id = event.user_id;
        let result = match event.kind {
            EventKind::Button { data } => self.handle_button(user_id, &data),
            EventKind::Text { data } => self.handle_text(user_id, &data),
        };
        match result {
            Ok(effects) => effects,
            Err(error) => {
                tracing::error!(user_id, %error, "error handling event");
                vec![Effect::message(UNEXPECTED)]
            }
        }
    }

    /// Effects for one scheduled export run: a bundle (or the missing-file
    /// notice) addressed to every management user.
    pub fn scheduled_export_effects(&mut self) -> anyhow::Result<Vec<(i64, Effect)>> {
        let recipients = self.config.management_user_ids.clone();
        let mut out = Vec::with_capacity(recipients.len());
        for user_id in recipients {
            let session = self.sessions.get_mut(user_id);
            let ctx = Ctx {
                conn: &self.conn,
                config: &self.config,
                session,
                user_id,
            };
            out.push((user_id, management::scheduled_export(&ctx)?));
        }
        Ok(out)
    }

    fn handle_button(&mut self, user_id: i64, data: &str) -> anyhow::Result<Vec<Effect>> {
        if !auth::is_authorized(&self.conn, &self.config, user_id)? {
            return Ok(vec![Effect::message(UNAUTHORIZED)]);
        }

        let Some(action) = Action::parse(data) else {
            return Ok(vec![Effect::screen(
                "Invalid action. Please use the menu.",
                Keyboard::default(),
            )]);
        };

        let is_management = auth::is_management(&self.config, user_id);
        let session = self.sessions.get_mut(user_id);
        let mut ctx = Ctx {
            conn: &self.conn,
            config: &self.config,
            session,
            user_id,
        };

        // Management-gated actions reply with their flow-specific forbidden
        // message and leave the flow uninitialized.
        macro_rules! forbid {
            ($msg:expr) => {
                if !is_management {
                    return Ok(vec![Effect::screen($msg, Keyboard::default())]);
                }
            };
        }

        match action {
            Action::Noop => Ok(Vec::new()),
            Action::MainMenu => {
                ctx.session.reset();
                Ok(vec![menus::main_menu(&ctx)])
            }
            Action::DataMenu => {
                forbid!("🚫 You are not authorized to access data tools.");
                ctx.session.reset();
                Ok(vec![menus::data_menu()])
            }
            Action::StudentMenu => {
                ctx.session.reset();
                Ok(vec![menus::student_menu()])
            }
            Action::ManageMajors => {
                ctx.session.reset();
                ctx.session.flow = Flow::ManagingMajors;
                ctx.session.majors_origin = Some(MajorsOrigin::StudentMenu);
                Ok(vec![menus::prompt_grade(
                    &ctx,
                    "Select grade to manage majors",
                    Action::StudentMenu,
                )?])
            }
            Action::DataStudents => {
                forbid!("🚫 You are not authorized to manage student data.");
                ctx.session.reset();
                Ok(vec![menus::data_students_menu()])
            }
            Action::DataStudentsManage => {
                forbid!("🚫 You are not authorized to manage student data.");
                ctx.session.reset();
                ctx.session.flow = Flow::ManagingStudents;
                Ok(vec![menus::prompt_grade(
                    &ctx,
                    "Select grade to manage students",
                    Action::DataStudents,
                )?])
            }
            Action::DataMajors => {
                forbid!("🚫 You are not authorized to manage majors.");
                ctx.session.reset();
                ctx.session.flow = Flow::ManagingMajors;
                ctx.session.majors_origin = Some(MajorsOrigin::DataMenu);
                Ok(vec![menus::prompt_grade(
                    &ctx,
                    "Select grade to manage majors",
                    Action::DataMenu,
                )?])
            }
            Action::DataGrades => {
                forbid!("🚫 You are not authorized to manage grades.");
                grades::enter_grade_management(&mut ctx)
            }
            Action::ManagementMenu => {
                forbid!("🚫 You are not authorized to access management tools.");
                ctx.session.reset();
                Ok(vec![menus::management_menu()])
            }
            Action::AbsenceMenu => absence::start_absence_flow(&mut ctx),
            Action::StudentsAdd => {
                ctx.session.reset();
                ctx.session.flow = Flow::AddingStudents;
                Ok(vec![menus::prompt_grade(
                    &ctx,
                    "Select grade to add students",
                    Action::MainMenu,
                )?])
            }
            Action::StudentsView => {
                ctx.session.reset();
                Ok(vec![menus::prompt_grade(
                    &ctx,
                    "Select grade to view students",
                    Action::MainMenu,
                )?])
            }
            Action::StudentsManage => {
                forbid!("🚫 You are not authorized to manage students.");
                Ok(vec![students::show_management_list(&mut ctx)?])
            }
            Action::SelectGrade(grade) => majors::handle_grade_selection(&mut ctx, grade),
            Action::GradeAdd => {
                forbid!("🚫 You are not authorized to manage grades.");
                Ok(vec![grades::start_add_grade(&mut ctx)])
            }
            Action::GradeEdit(grade) => {
                forbid!("🚫 You are not authorized to manage grades.");
                Ok(vec![grades::start_edit_grade(&mut ctx, grade)])
            }
            Action::GradeDelete(grade) => {
                forbid!("🚫 You are not authorized to manage grades.");
                grades::delete_grade(&ctx, &grade)
            }
            Action::MajorAdd => Ok(vec![majors::start_add_major(&mut ctx)]),
            Action::MajorEdit(major) => {
                forbid!("🚫 You are not authorized to edit majors.");
                Ok(vec![majors::start_edit_major(&mut ctx, major)])
            }
            Action::MajorDelete(major) => majors::delete_major(&ctx, &major),
            Action::SelectMajor(major) => majors::handle_major_selection(&mut ctx, major),
            Action::Page(page) => {
                ctx.session.page = page;
                match ctx.session.flow {
                    Flow::AbsenceSelection => Ok(vec![absence::show_absence_list(&mut ctx)?]),
                    Flow::ManagingStudents => Ok(vec![students::show_management_list(&mut ctx)?]),
                    _ => Ok(vec![students::show_student_list(&mut ctx)?]),
                }
            }
            Action::AbsenceToggle(student_id) => absence::toggle_student(&mut ctx, student_id),
            Action::AbsenceConfirm => absence::confirm_absences(&mut ctx),
            Action::AbsenceCancel => absence::start_absence_flow(&mut ctx),
            Action::Export => {
                forbid!("🚫 You are not authorized to export the database.");
                management::export_database(&ctx)
            }
            Action::AddTeacher => {
                forbid!("🚫 You are not authorized to manage teachers.");
                Ok(vec![management::start_add_teacher(&mut ctx)])
            }
            Action::StudentManage(id) => {
                forbid!("🚫 You are not authorized to manage students.");
                students::show_management_actions(&ctx, &id)
            }
            Action::StudentEdit(id) => {
                forbid!("🚫 You are not authorized to manage students.");
                Ok(vec![students::start_edit_student(&mut ctx, id)])
            }
            Action::StudentDelete(id) => {
                forbid!("🚫 You are not authorized to manage students.");
                students::delete_student(&mut ctx, &id)
            }
        }
    }

    fn handle_text(&mut self, user_id: i64, text: &str) -> anyhow::Result<Vec<Effect>> {
        if !auth::is_authorized(&self.conn, &self.config, user_id)? {
            return Ok(vec![Effect::message(UNAUTHORIZED)]);
        }

        let is_management = auth::is_management(&self.config, user_id);
        let session = self.sessions.get_mut(user_id);
        let mut ctx = Ctx {
            conn: &self.conn,
            config: &self.config,
            session,
            user_id,
        };

        // A forbidden management text flow is cleared, not resumed: the user
        // must restart it explicitly.
        macro_rules! forbid_flow {
            ($msg:expr) => {
                if !is_management {
                    ctx.session.flow = Flow::Idle;
                    return Ok(vec![Effect::message($msg)]);
                }
            };
        }

        match ctx.session.flow.clone() {
            Flow::AddingStudents => students::handle_student_input(&mut ctx, text),
            Flow::AddingGrade => {
                forbid_flow!("🚫 You are not authorized to manage grades.");
                grades::handle_grade_input(&mut ctx, text)
            }
            Flow::EditingGrade(old) => {
                forbid_flow!("🚫 You are not authorized to manage grades.");
                grades::handle_grade_edit(&mut ctx, &old, text)
            }
            Flow::AddingMajor => majors::handle_major_input(&mut ctx, text),
            Flow::EditingMajor(old) => {
                forbid_flow!("🚫 You are not authorized to manage majors.");
                majors::handle_major_edit(&mut ctx, &old, text)
            }
            Flow::EditingStudent(id) => {
                forbid_flow!("🚫 You are not authorized to manage students.");
                students::handle_student_edit(&mut ctx, &id, text)
            }
            Flow::AddingTeacher => {
                forbid_flow!("🚫 You are not authorized to manage teachers.");
                management::handle_teacher_input(&mut ctx, text)
            }
            Flow::Idle
            | Flow::AbsenceSelection
            | Flow::ManagingGrades
            | Flow::ManagingMajors
            | Flow::ManagingStudents => {
                Ok(vec![Effect::message("Please use the inline menu below.")])
            }
        }
    }
}

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono_tz::Tz;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found at {0}; copy config.example.toml to config.toml")]
    Missing(PathBuf),
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("bot token missing in config")]
    MissingToken,
    #[error("invalid timezone: {0}")]
    InvalidTimezone(String),
    #[error("grades must list at least one grade")]
    NoGrades,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeSeed {
    pub name: String,
    #[serde(default)]
    pub majors: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BotSection {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub authorized_teacher_ids: Vec<i64>,
    #[serde(default)]
    pub management_user_ids: Vec<i64>,
    #[serde(default)]
    pub grades: Vec<GradeSeed>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_export_interval_hours")]
    pub export_interval_hours: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSection {
    #[serde(default = "default_sqlite_path")]
    pub sqlite_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    bot: BotSection,
    #[serde(default = "default_database_section")]
    database: DatabaseSection,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub token: String,
    pub timezone: Tz,
    pub authorized_teacher_ids: Vec<i64>,
    pub management_user_ids: Vec<i64>,
    /// Seed grades in the order they appear in the config file.
    pub grades: Vec<GradeSeed>,
    pub page_size: usize,
    pub export_interval_hours: u64,
    pub sqlite_path: PathBuf,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_page_size() -> usize {
    10
}

fn default_export_interval_hours() -> u64 {
    12
}

fn default_sqlite_path() -> PathBuf {
    PathBuf::from("absenced.sqlite3")
}

fn default_database_section() -> DatabaseSection {
    DatabaseSection {
        sqlite_path: default_sqlite_path(),
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path)?;
    parse_config(&text)
}

fn parse_config(text: &str) -> Result<Config, ConfigError> {
    let file: ConfigFile = toml::from_str(text)?;

    let token = file.bot.token.trim().to_string();
    if token.is_empty() {
        return Err(ConfigError::MissingToken);
    }
    let timezone = Tz::from_str(&file.bot.timezone)
        .map_err(|_| ConfigError::InvalidTimezone(file.bot.timezone.clone()))?;
    if file.bot.grades.is_empty() {
        return Err(ConfigError::NoGrades);
    }

    Ok(Config {
        token,
        timezone,
        authorized_teacher_ids: file.bot.authorized_teacher_ids,
        management_user_ids: file.bot.management_user_ids,
        grades: file.bot.grades,
        page_size: file.bot.page_size.max(1),
        export_interval_hours: file.bot.export_interval_hours,
        sqlite_path: file.database.sqlite_path,
    })
}

impl Config {
    /// Ordered grade names from the seed list, used as a fallback when the
    /// grades table is empty.
    pub fn grade_names(&self) -> Vec<String> {
        self.grades.iter().map(|g| g.name.clone()).collect()
    }
}

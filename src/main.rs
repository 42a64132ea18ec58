use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use absenced::config::{self, Config};
use absenced::db;
use absenced::engine::{Effect, EffectLine, Engine, Event};

const ENV_CONFIG_PATH: &str = "ABSENCED_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(error) = run() {
        tracing::error!(%error, "startup failed");
        std::process::exit(1);
    }
}

fn config_path() -> PathBuf {
    std::env::args()
        .nth(1)
        .or_else(|| std::env::var(ENV_CONFIG_PATH).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
        .into()
}

fn run() -> anyhow::Result<()> {
    let path = config_path();
    tracing::info!(path = %path.display(), "loading configuration");
    let config = config::load_config(&path)?;

    let conn = db::open_db(&config.sqlite_path)?;
    db::seed_grades(&conn, &config.grades)?;
    tracing::info!(db = %config.sqlite_path.display(), "database ready");

    let engine = Arc::new(Mutex::new(Engine::new(conn, config.clone())));
    spawn_export_scheduler(&config, Arc::clone(&engine));

    tracing::info!("absenced engine started");
    serve(engine)
}

/// Read inbound events as JSON lines on stdin and emit effect lines on
/// stdout until the transport closes the pipe.
fn serve(engine: Arc<Mutex<Engine>>) -> anyhow::Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let event: Event = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let line = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() },
                });
                emit_raw(&line.to_string());
                continue;
            }
        };

        let user_id = event.user_id;
        let effects = lock_engine(&engine).handle_event(event);
        for effect in &effects {
            emit_effect(user_id, effect);
        }
    }
    Ok(())
}

fn spawn_export_scheduler(config: &Config, engine: Arc<Mutex<Engine>>) {
    if config.export_interval_hours == 0 {
        tracing::info!("scheduled database exports disabled");
        return;
    }
    let interval = Duration::from_secs(config.export_interval_hours * 3600);
    std::thread::spawn(move || loop {
        // First run is delayed by one full interval.
        std::thread::sleep(interval);
        run_scheduled_export(&engine);
    });
}

fn run_scheduled_export(engine: &Arc<Mutex<Engine>>) {
    let mut guard = lock_engine(engine);
    if guard.config().management_user_ids.is_empty() {
        tracing::info!("no management users configured for automatic exports");
        return;
    }
    match guard.scheduled_export_effects() {
        Ok(deliveries) => {
            drop(guard);
            for (user_id, effect) in &deliveries {
                emit_effect(*user_id, effect);
            }
            tracing::info!(recipients = deliveries.len(), "scheduled export delivered");
        }
        Err(error) => {
            tracing::error!(%error, "scheduled export failed");
        }
    }
}

fn lock_engine(engine: &Arc<Mutex<Engine>>) -> std::sync::MutexGuard<'_, Engine> {
    match engine.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

fn emit_effect(user_id: i64, effect: &Effect) {
    let line = EffectLine::from_effect(user_id, effect);
    match serde_json::to_string(&line) {
        Ok(text) => emit_raw(&text),
        Err(_) => emit_raw("{\"ok\":false}"),
    }
    // The bundle path was handed to the transport; it owns the delivery, we
    // own the cleanup once the line is out.
    if let Effect::SendFile { path, .. } = effect {
        remove_delivered_file(path);
    }
}

fn remove_delivered_file(path: &Path) {
    if let Err(error) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), %error, "failed to remove delivered export");
    }
}

fn emit_raw(text: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    let _ = writeln!(handle, "{}", text);
    let _ = handle.flush();
}

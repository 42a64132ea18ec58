//! Database export: a consistent point-in-time snapshot of the live database,
//! wrapped in a zip bundle with a manifest.

use anyhow::{anyhow, Context};
use rusqlite::backup::Backup;
use rusqlite::Connection;
use serde_json::json;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const MANIFEST_ENTRY: &str = "manifest.json";
const DB_ENTRY: &str = "db/absenced.sqlite3";
pub const BUNDLE_FORMAT_V1: &str = "absenced-export-v1";

#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub bundle_format: String,
    pub bundle_path: PathBuf,
}

/// Copy the open database into `dest` using the SQLite online backup API, so
/// the copy is consistent even while the source connection is in use.
pub fn snapshot_database(conn: &Connection, dest: &Path) -> anyhow::Result<()> {
    let mut dst = Connection::open(dest)
        .with_context(|| format!("failed to create snapshot at {}", dest.to_string_lossy()))?;
    let backup = Backup::new(conn, &mut dst).context("failed to start database backup")?;
    backup
        .run_to_completion(64, std::time::Duration::from_millis(10), None)
        .context("database backup did not complete")?;
    Ok(())
}

/// Produce an export bundle at a fresh temp path. The caller owns the file
/// and removes it after delivery.
pub fn export_bundle(conn: &Connection, sqlite_path: &Path) -> anyhow::Result<ExportSummary> {
    if !sqlite_path.is_file() {
        return Err(anyhow!(
            "database file not found: {}",
            sqlite_path.to_string_lossy()
        ));
    }

    let dir = tempfile::Builder::new()
        .prefix("absenced-export-")
        .tempdir()
        .context("failed to create export temp dir")?;
    let snapshot_path = dir.path().join("absenced.sqlite3");
    snapshot_database(conn, &snapshot_path)?;

    let out_path = std::env::temp_dir().join(format!(
        "absenced-export-{}.zip",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos()
    ));
    write_bundle(&snapshot_path, &out_path)?;

    Ok(ExportSummary {
        bundle_format: BUNDLE_FORMAT_V1.to_string(),
        bundle_path: out_path,
    })
}

fn write_bundle(snapshot_path: &Path, out_path: &Path) -> anyhow::Result<()> {
    let out_file = File::create(out_path).with_context(|| {
        format!(
            "failed to create output file {}",
            out_path.to_string_lossy()
        )
    })?;
    let mut zip = ZipWriter::new(out_file);
    let opts = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let exported_at = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();
    let manifest = json!({
        "format": BUNDLE_FORMAT_V1,
        "version": 1,
        "appVersion": env!("CARGO_PKG_VERSION"),
        "exportedAt": exported_at,
    });
    zip.start_file(MANIFEST_ENTRY, opts)
        .context("failed to start manifest entry")?;
    zip.write_all(
        serde_json::to_string_pretty(&manifest)
            .context("failed to serialize manifest")?
            .as_bytes(),
    )
    .context("failed to write manifest entry")?;

    zip.start_file(DB_ENTRY, opts)
        .context("failed to start database entry")?;
    let mut snapshot = File::open(snapshot_path).with_context(|| {
        format!(
            "failed to open snapshot {}",
            snapshot_path.to_string_lossy()
        )
    })?;
    std::io::copy(&mut snapshot, &mut zip).context("failed to write database entry")?;

    zip.finish().context("failed to finalize zip bundle")?;
    Ok(())
}

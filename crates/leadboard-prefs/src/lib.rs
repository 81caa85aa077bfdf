// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use leadboard_app::PreferenceStore;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "leadboard";

const PREFERENCE_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

/// SQLite-backed key/value preferences.
pub struct PrefStore {
    conn: Connection,
}

impl PrefStore {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_prefs_path(&printable)?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create preferences directory {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("open preferences database at {}", path.display()))?;
        wait_for_writers(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory preferences database")?;
        wait_for_writers(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    /// Creates the `preferences` table in an empty file, or checks that an
    /// existing one can hold saved filters. Files that belong to something
    /// else are refused rather than written into.
    pub fn bootstrap(&self) -> Result<()> {
        let columns = preference_columns(&self.conn)?;
        if columns.is_empty() {
            let tables = foreign_tables(&self.conn)?;
            if !tables.is_empty() {
                bail!(
                    "preferences file has no `preferences` table but holds {}; point [storage].prefs_path at a leadboard preferences file",
                    tables.join(", ")
                );
            }
            self.conn
                .execute_batch(include_str!("sql/schema.sql"))
                .context("create preferences table")?;
            tracing::debug!("preferences table created");
            return Ok(());
        }

        let missing: Vec<&str> = PREFERENCE_COLUMNS
            .into_iter()
            .filter(|column| !columns.contains(*column))
            .collect();
        if !missing.is_empty() {
            bail!(
                "saved preferences lack columns {}; delete the preferences file to reset saved filters",
                missing.join(", ")
            );
        }
        Ok(())
    }

    pub fn get_raw(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("read preference {key}"))
    }

    pub fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO preferences (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, now],
            )
            .with_context(|| format!("upsert preference {key}"))?;
        tracing::debug!(key, "preference saved");
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM preferences WHERE key = ?", params![key])
            .with_context(|| format!("delete preference {key}"))?;
        Ok(removed > 0)
    }
}

impl PreferenceStore for PrefStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.get_raw(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.put_raw(key, value)
    }
}

pub fn default_prefs_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("LEADBOARD_PREFS_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set LEADBOARD_PREFS_PATH to a writable database path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("prefs.db"))
}

/// Rejects URI forms and query strings, which SQLite would interpret instead
/// of treating the value as a file name.
pub fn validate_prefs_path(path: &str) -> Result<()> {
    if path == ":memory:" {
        return Ok(());
    }
    if path.is_empty() {
        bail!("preferences path must not be empty");
    }
    if let Some(scheme) = uri_scheme(path) {
        bail!(
            "preferences path {path:?} looks like a URI ({scheme}:); saved filters need a plain file path"
        );
    }
    if path.contains('?') {
        bail!("preferences path {path:?} contains '?'; drop the query string");
    }
    Ok(())
}

fn uri_scheme(path: &str) -> Option<&str> {
    if path.starts_with("file:") {
        return Some("file");
    }
    let (scheme, _) = path.split_once("://")?;
    let alphabetic = !scheme.is_empty() && scheme.chars().all(|ch| ch.is_ascii_alphabetic());
    alphabetic.then_some(scheme)
}

fn preference_columns(conn: &Connection) -> Result<BTreeSet<String>> {
    let mut stmt = conn
        .prepare("PRAGMA table_info(preferences)")
        .context("inspect preferences table")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(1))
        .context("query preferences columns")?;
    rows.collect::<rusqlite::Result<BTreeSet<_>>>()
        .context("collect preferences columns")
}

fn foreign_tables(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn
        .prepare(
            "
            SELECT name
            FROM sqlite_master
            WHERE type = 'table'
              AND name NOT LIKE 'sqlite_%'
            ORDER BY name
            ",
        )
        .context("list tables in preferences file")?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query tables in preferences file")?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("collect tables in preferences file")
}

// a second leadboard process may be saving filters at the same time
fn wait_for_writers(conn: &Connection) -> Result<()> {
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .context("set preferences busy timeout")
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

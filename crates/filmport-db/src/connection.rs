//! Content store location and opening.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rusqlite::Connection;

use super::migrations::run_migrations;

/// Application directory under the XDG data directory.
const APP_DIR: &str = "filmport";

/// Database file name.
const DB_FILE_NAME: &str = "filmport.db";

/// Opens (or creates) the content store and brings its schema up to date.
///
/// The file is `{dir}/filmport.db` when `dir` is given, otherwise it lives
/// under an absolute `XDG_DATA_HOME` or `~/.local/share`. Foreign key
/// enforcement is enabled on the returned connection.
///
/// # Errors
///
/// Returns an error if no location can be resolved, the directory cannot be
/// created, the database cannot be opened, or migrations fail.
pub fn open_db(dir: Option<&PathBuf>) -> Result<Connection> {
    let db_path = match dir {
        Some(dir) => dir.join(DB_FILE_NAME),
        None => default_db_path(
            std::env::var_os("XDG_DATA_HOME"),
            std::env::var_os("HOME"),
        )?,
    };

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory {}", parent.display()))?;
    }

    let conn = Connection::open(&db_path)
        .with_context(|| format!("failed to open database {}", db_path.display()))?;
    conn.pragma_update(None, "foreign_keys", true)
        .context("failed to enable foreign keys")?;

    run_migrations(&conn).context("database migration failed")?;
    tracing::debug!(path = %db_path.display(), "Database opened");

    Ok(conn)
}

/// Builds the default database path from the given environment values.
fn default_db_path(xdg_data_home: Option<OsString>, home: Option<OsString>) -> Result<PathBuf> {
    let base = match (xdg_data_home.map(PathBuf::from), home) {
        (Some(xdg), _) if xdg.is_absolute() => xdg,
        (_, Some(home)) if !home.is_empty() => Path::new(&home).join(".local").join("share"),
        _ => bail!("cannot locate the data directory; set HOME or pass --dir"),
    };
    Ok(base.join(APP_DIR).join(DB_FILE_NAME))
}

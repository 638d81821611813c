//! Config file location.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

/// Application directory under the XDG base directory.
const APP_DIR: &str = "filmport";

/// Config file name inside the config directory.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Returns where `config.toml` lives.
///
/// `--dir` wins. Otherwise an absolute `XDG_CONFIG_HOME` is used, then
/// `~/.config`.
///
/// # Errors
///
/// Returns an error if neither `XDG_CONFIG_HOME` nor `HOME` is usable
/// (only when `dir` is `None`).
pub fn resolve_config_path(dir: Option<&PathBuf>) -> Result<PathBuf> {
    match dir {
        Some(dir) => Ok(dir.join(CONFIG_FILE_NAME)),
        None => default_config_path(
            std::env::var_os("XDG_CONFIG_HOME"),
            std::env::var_os("HOME"),
        ),
    }
}

/// Builds the default config path from the given environment values.
fn default_config_path(
    xdg_config_home: Option<OsString>,
    home: Option<OsString>,
) -> Result<PathBuf> {
    let base = match (xdg_config_home.map(PathBuf::from), home) {
        (Some(xdg), _) if xdg.is_absolute() => xdg,
        (_, Some(home)) if !home.is_empty() => Path::new(&home).join(".config"),
        _ => bail!("cannot locate the config directory; set HOME or pass --dir"),
    };
    Ok(base.join(APP_DIR).join(CONFIG_FILE_NAME))
}

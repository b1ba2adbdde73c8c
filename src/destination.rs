//! Destination path rules.
//!
//! An environment is always created in a fresh directory: the path itself
//! must not exist, and its parent must be an existing directory.

use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Make `path` absolute against the current directory and check the
/// destination rules.
///
/// Nothing is created. The returned path is what the activation script and
/// stub links will embed.
pub fn validate(path: &Path) -> Result<PathBuf> {
    let path = absolute(path)?;

    let Some(parent) = path.parent() else {
        bail!("{} has no parent directory.", path.display());
    };

    if path.file_name().is_none() {
        bail!("{} does not name a directory.", path.display());
    }

    // The activation script embeds the path as text
    if path.to_str().is_none() {
        bail!("{} is not valid UTF-8.", path.display());
    }

    if !parent.is_dir() {
        bail!("Parent directory of {} does not exist.", path.display());
    }

    // symlink_metadata so a dangling symlink also counts as existing
    if path.symlink_metadata().is_ok() {
        bail!("Directory {} already exists.", path.display());
    }

    Ok(path)
}

/// `clap` value parser for the destination argument.
pub fn parse_destination(raw: &str) -> Result<PathBuf, String> {
    validate(Path::new(raw)).map_err(|e| e.to_string())
}

/// Lexically absolute path: joined to the current directory, with `.` and
/// `..` components folded.
fn absolute(path: &Path) -> Result<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .context("Failed to read current directory")?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            std::path::Component::CurDir => {}
            std::path::Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

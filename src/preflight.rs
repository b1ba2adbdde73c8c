//! Preflight checks run before anything is written to disk.
//!
//! Installation shells out to `curl` and the configured shell, and the stub
//! proxy uses `readlink` at run time. Each is looked up on PATH; a missing
//! required tool stops `rustenv` before the destination is created.

use anyhow::{bail, Result};
use std::path::PathBuf;

use crate::config::Config;

/// Outcome of looking up one host tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// Resolved to this executable.
    Found(PathBuf),
    /// Not on PATH, and installation cannot proceed without it.
    Missing,
    /// Not on PATH, but only some generated-script behavior depends on it.
    MissingOptional,
}

/// A host tool rustenv depends on, and whether it was found.
#[derive(Debug, Clone)]
pub struct ToolCheck {
    /// Program name as looked up on PATH.
    pub tool: String,
    /// What rustenv needs it for.
    pub purpose: &'static str,
    pub status: ToolStatus,
}

impl ToolCheck {
    /// Look `tool` up on PATH (or as given, if it is a path).
    pub fn locate(tool: &str, purpose: &'static str, required: bool) -> Self {
        let status = match which::which(tool) {
            Ok(path) => ToolStatus::Found(path),
            Err(_) if required => ToolStatus::Missing,
            Err(_) => ToolStatus::MissingOptional,
        };
        Self {
            tool: tool.to_string(),
            purpose,
            status,
        }
    }

    /// One report line, e.g. `✓ curl: /usr/bin/curl`.
    pub fn line(&self) -> String {
        match &self.status {
            ToolStatus::Found(path) => format!("✓ {}: {}", self.tool, path.display()),
            ToolStatus::Missing => format!("✗ {}: not found. {}", self.tool, self.purpose),
            ToolStatus::MissingOptional => {
                format!("⚠ {}: not found. {}", self.tool, self.purpose)
            }
        }
    }
}

/// Look up every host tool installation and the generated scripts use.
pub fn check_host_tools(config: &Config) -> Vec<ToolCheck> {
    vec![
        ToolCheck::locate(
            "curl",
            "Required to download the rustup bootstrap script",
            true,
        ),
        ToolCheck::locate(
            &config.shell,
            "Required to run the rustup bootstrap script",
            true,
        ),
        ToolCheck::locate(
            "readlink",
            "Used by the stub proxy to resolve symlinked toolchain binaries",
            false,
        ),
    ]
}

/// Check host tools, print one line per tool, and bail if a required tool
/// is missing.
pub fn run_preflight_or_fail(config: &Config) -> Result<()> {
    println!("Checking host tools...");
    let checks = check_host_tools(config);
    for check in &checks {
        println!("  {}", check.line());
    }

    let missing: Vec<&str> = checks
        .iter()
        .filter(|c| c.status == ToolStatus::Missing)
        .map(|c| c.tool.as_str())
        .collect();
    if !missing.is_empty() {
        bail!(
            "Preflight failed: missing required tool(s): {}. Install them and retry.",
            missing.join(", ")
        );
    }
    Ok(())
}

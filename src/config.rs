//! Configuration management for rustenv.
//!
//! Values come from environment variables. `main` loads a `.env` file into
//! the process environment first, so real environment variables take
//! precedence over `.env` entries.

use std::env;

/// Default location of the rustup bootstrap script.
pub const DEFAULT_BOOTSTRAP_URL: &str = "https://sh.rustup.rs";

/// Default interpreter for the bootstrap script.
pub const DEFAULT_SHELL: &str = "sh";

/// Rustenv configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// URL the bootstrap script is fetched from (default: https://sh.rustup.rs)
    pub bootstrap_url: String,
    /// Expected SHA256 of the bootstrap script, if pinned
    pub bootstrap_sha256: Option<String>,
    /// Shell used to execute the bootstrap script (default: sh)
    pub shell: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bootstrap_url: DEFAULT_BOOTSTRAP_URL.to_string(),
            bootstrap_sha256: None,
            shell: DEFAULT_SHELL.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let defaults = Self::default();

        Self {
            bootstrap_url: get("RUSTENV_BOOTSTRAP_URL").unwrap_or(defaults.bootstrap_url),
            bootstrap_sha256: get("RUSTENV_BOOTSTRAP_SHA256").map(|s| s.to_lowercase()),
            shell: get("RUSTENV_SHELL").unwrap_or(defaults.shell),
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!("  RUSTENV_BOOTSTRAP_URL: {}", self.bootstrap_url);
        match &self.bootstrap_sha256 {
            Some(hash) => println!("  RUSTENV_BOOTSTRAP_SHA256: {}", hash),
            None => println!("  RUSTENV_BOOTSTRAP_SHA256: (not pinned)"),
        }
        println!("  RUSTENV_SHELL: {}", self.shell);
    }
}

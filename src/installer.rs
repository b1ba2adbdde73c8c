//! Toolchain installation via the rustup bootstrap script.
//!
//! The bootstrap script is fetched with `curl` into a temporary file, hashed,
//! and executed with `RUSTUP_HOME`/`CARGO_HOME` pointed into the
//! environment. The temporary file is removed when it goes out of scope,
//! whether or not the install succeeded.

use anyhow::{bail, Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tempfile::NamedTempFile;

use crate::config::Config;
use crate::process::Cmd;

/// Something that can materialize a toolchain into a pair of home
/// directories.
pub trait Installer {
    /// Install a toolchain so that `<cargo_home>/bin` holds its binaries.
    fn install(&self, rustup_home: &Path, cargo_home: &Path) -> Result<()>;
}

/// Installs the default toolchain with the upstream rustup bootstrap script.
#[derive(Debug, Clone)]
pub struct Rustup {
    url: String,
    expected_sha256: Option<String>,
    shell: String,
}

impl Rustup {
    /// Installer fetching the bootstrap script from `url`, unpinned, run with `sh`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            expected_sha256: None,
            shell: crate::config::DEFAULT_SHELL.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            url: config.bootstrap_url.clone(),
            expected_sha256: config.bootstrap_sha256.clone(),
            shell: config.shell.clone(),
        }
    }

    /// Require the downloaded script to hash to `sha256`.
    pub fn expect_sha256(mut self, sha256: impl Into<String>) -> Self {
        self.expected_sha256 = Some(sha256.into());
        self
    }

    /// Interpreter for the bootstrap script.
    pub fn shell(mut self, shell: impl Into<String>) -> Self {
        self.shell = shell.into();
        self
    }

    /// Download the bootstrap script into a fresh temporary file.
    ///
    /// curl has exited (and the file is complete) by the time this returns.
    fn fetch(&self) -> Result<NamedTempFile> {
        let script = tempfile::Builder::new()
            .prefix("rustup-init-")
            .suffix(".sh")
            .tempfile()
            .context("Failed to create temporary file for bootstrap script")?;

        println!("  Fetching {}", self.url);
        Cmd::new("curl")
            .args(["--fail", "--silent", "--show-error", "--location", "-o"])
            .arg_path(script.path())
            .arg(&self.url)
            .error_msg(format!("Failed to download bootstrap script from {}", self.url))
            .run()?;

        Ok(script)
    }
}

impl Installer for Rustup {
    fn install(&self, rustup_home: &Path, cargo_home: &Path) -> Result<()> {
        let script = self.fetch()?;

        let actual = sha256_file(script.path())?;
        println!("  Bootstrap script sha256: {}", actual);
        if let Some(expected) = &self.expected_sha256 {
            if actual != expected.to_lowercase() {
                bail!(
                    "Checksum mismatch for bootstrap script from {}\n  Expected: {}\n  Actual:   {}",
                    self.url,
                    expected,
                    actual
                );
            }
        }

        Cmd::new(&self.shell)
            .arg_path(script.path())
            .args(["-y", "--no-modify-path"])
            .env("RUSTUP_HOME", rustup_home)
            .env("CARGO_HOME", cargo_home)
            .error_msg("Bootstrap script failed")
            .run_interactive()?;

        Ok(())
    }
}

/// Lowercase hex SHA256 of a file's contents.
pub fn sha256_file(path: &Path) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("Failed to open {} for checksum", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        let read = reader
            .read(&mut buffer)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

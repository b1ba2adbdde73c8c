//! Shared test utilities for rustenv tests.
#![allow(dead_code)]

use anyhow::{bail, Result};
use std::cell::Cell;
use std::collections::BTreeSet;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

use rustenv::Installer;

/// Scratch directory that environments are created inside.
pub struct TestEnv {
    /// Kept alive for the lifetime of the TestEnv
    pub _temp_dir: TempDir,
    /// Canonical path of the scratch directory
    pub base: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = temp_dir
            .path()
            .canonicalize()
            .expect("Failed to canonicalize temp dir");
        Self {
            _temp_dir: temp_dir,
            base,
        }
    }

    /// Path for an environment that does not exist yet.
    pub fn destination(&self, name: &str) -> PathBuf {
        self.base.join(name)
    }
}

/// Resolve `tool` on PATH, failing the test if it is missing.
pub fn require_tool(tool: &str) -> PathBuf {
    which::which(tool).unwrap_or_else(|_| {
        panic!(
            "'{}' is required for this test but was not found on PATH",
            tool
        )
    })
}

/// Fake `rustc`: reports its version, the two homes, and its arguments.
pub const FAKE_RUSTC: &str = r#"#!/bin/sh
echo "rustc 1.0.0-fake (0000000 2018-05-24)"
echo "RUSTUP_HOME=${RUSTUP_HOME-unset}"
echo "CARGO_HOME=${CARGO_HOME-unset}"
echo "ARGS=$*"
echo "rustc diagnostics" >&2
"#;

/// Fake `cargo`: like rustc, but exits with status 3.
pub const FAKE_CARGO: &str = r#"#!/bin/sh
echo "cargo 1.0.0-fake"
echo "CARGO_HOME=${CARGO_HOME-unset}"
echo "ARGS=$*"
echo "cargo failed on purpose" >&2
exit 3
"#;

/// Installer that writes shell-script binaries instead of running rustup.
pub struct FakeInstaller {
    binaries: Vec<(String, String)>,
    calls: Cell<usize>,
}

impl FakeInstaller {
    /// Installs fake `cargo` and `rustc`.
    pub fn new() -> Self {
        Self::with_binaries(&[("cargo", FAKE_CARGO), ("rustc", FAKE_RUSTC)])
    }

    pub fn with_binaries(binaries: &[(&str, &str)]) -> Self {
        Self {
            binaries: binaries
                .iter()
                .map(|(n, c)| (n.to_string(), c.to_string()))
                .collect(),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Installer for FakeInstaller {
    fn install(&self, rustup_home: &Path, cargo_home: &Path) -> Result<()> {
        self.calls.set(self.calls.get() + 1);
        assert_eq!(rustup_home, cargo_home, "homes should be the same directory");

        let bin = cargo_home.join("bin");
        fs::create_dir_all(&bin)?;
        for (name, content) in &self.binaries {
            create_mock_binary(&bin.join(name), content);
        }
        Ok(())
    }
}

/// Installer that fails without installing anything.
pub struct FailingInstaller;

impl Installer for FailingInstaller {
    fn install(&self, _rustup_home: &Path, _cargo_home: &Path) -> Result<()> {
        bail!("bootstrap script exited with status 1")
    }
}

/// Write an executable script.
pub fn create_mock_binary(path: &Path, content: &str) {
    fs::write(path, content).expect("Failed to create mock binary");
    let mut perms = fs::metadata(path)
        .expect("Failed to get metadata")
        .permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to set permissions");
}

/// Every path under `root`, relative to it. Symlinks are not followed.
pub fn snapshot(root: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .map(|e| e.expect("Failed to walk directory"))
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .expect("walked outside root")
                .to_path_buf()
        })
        .collect()
}

/// Names of the entries directly inside `dir`.
pub fn entry_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|e| {
            e.expect("Failed to read entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

/// Assert that a symlink exists and points to the expected target.
pub fn assert_symlink(path: &Path, expected_target: &Path) {
    assert!(
        path.is_symlink(),
        "Expected symlink at {}, but it's not a symlink",
        path.display()
    );

    let target = fs::read_link(path).expect("Failed to read symlink");
    assert_eq!(
        target,
        expected_target,
        "Symlink {} points to {}, expected {}",
        path.display(),
        target.display(),
        expected_target.display()
    );
}

/// Assert that a file contains expected content.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
    assert!(
        content.contains(expected),
        "File {} does not contain expected content.\nExpected to find: {}\nActual content: {}",
        path.display(),
        expected,
        content
    );
}

/// Assert that a regular (non-symlink) file exists.
pub fn assert_regular_file(path: &Path) {
    let meta = fs::symlink_metadata(path)
        .unwrap_or_else(|e| panic!("Expected file to exist: {}: {}", path.display(), e));
    assert!(
        meta.file_type().is_file(),
        "Expected regular file: {}",
        path.display()
    );
}

/// Assert that a directory exists.
pub fn assert_dir_exists(path: &Path) {
    assert!(
        path.is_dir(),
        "Expected directory to exist: {}",
        path.display()
    );
}

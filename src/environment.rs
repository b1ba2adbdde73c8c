//! Environment construction.
//!
//! Layout of a finished environment:
//!
//! ```text
//! <root>/
//!   rust/                 RUSTUP_HOME and CARGO_HOME, owned by the installer
//!   bin/
//!     rustenv-proxy       sets both variables, execs rust/bin/<name>
//!     activate            sourced to put bin/ and rust/bin/ on PATH
//!     <name>              symlink -> rustenv-proxy, one per rust/bin entry
//!   .gitignore
//! ```
//!
//! Construction is not atomic. A failure part way through leaves whatever
//! was already created in place.

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::fs;
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::{Path, PathBuf};

use crate::installer::Installer;
use crate::scripts::{self, ACTIVATE_NAME, GITIGNORE, PROXY, PROXY_NAME, RESERVED_NAMES};
use crate::timing::Timer;

/// Paths that make up an environment rooted at a given directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvLayout {
    root: PathBuf,
}

impl EnvLayout {
    /// Layout for an environment rooted at `root`. Nothing is checked.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Environment root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Installation root, used as both `RUSTUP_HOME` and `CARGO_HOME`.
    pub fn rust_dir(&self) -> PathBuf {
        self.root.join("rust")
    }

    /// Where the installer leaves the real binaries.
    pub fn rust_bin_dir(&self) -> PathBuf {
        self.rust_dir().join("bin")
    }

    /// User-facing entry points.
    pub fn bin_dir(&self) -> PathBuf {
        self.root.join("bin")
    }

    /// The single dispatcher script all stubs link to.
    pub fn proxy_path(&self) -> PathBuf {
        self.bin_dir().join(PROXY_NAME)
    }

    /// Sourceable activation script.
    pub fn activate_path(&self) -> PathBuf {
        self.bin_dir().join(ACTIVATE_NAME)
    }

    /// Catch-all ignore file at the root.
    pub fn gitignore_path(&self) -> PathBuf {
        self.root.join(".gitignore")
    }

    /// Prompt label: the last component of the root.
    pub fn name(&self) -> Result<&str> {
        self.root
            .file_name()
            .and_then(|n| n.to_str())
            .with_context(|| format!("{} has no UTF-8 final component", self.root.display()))
    }

    /// `PATH` prefix installed by activation.
    pub fn path_prefix(&self) -> Result<String> {
        let root = self
            .root
            .to_str()
            .with_context(|| format!("{} is not valid UTF-8", self.root.display()))?;
        Ok(format!("{root}/bin:{root}/rust/bin"))
    }
}

/// Summary of a freshly created environment.
#[derive(Debug, Clone)]
pub struct Environment {
    pub layout: EnvLayout,
    /// Stub names, sorted.
    pub stubs: Vec<String>,
}

/// Create a new environment at `destination`.
///
/// `destination` must not exist and its parent must. Both are checked before
/// anything is written; all other failures abort immediately without
/// cleanup.
pub fn create_environment(destination: &Path, installer: &dyn Installer) -> Result<Environment> {
    let root = crate::destination::validate(destination)?;
    let layout = EnvLayout::new(root);

    println!("Creating environment at {}...", layout.root().display());
    for dir in [layout.root().to_path_buf(), layout.rust_dir(), layout.bin_dir()] {
        fs::create_dir(&dir)
            .with_context(|| format!("Failed to create directory {}", dir.display()))?;
    }

    println!("Installing toolchain into {}...", layout.rust_dir().display());
    let timer = Timer::start("Toolchain install");
    installer.install(&layout.rust_dir(), &layout.rust_dir())?;
    timer.finish();

    let stubs = materialize(&layout)?;

    println!("Environment ready: {}", layout.root().display());
    println!("  Activate with: . {}", layout.activate_path().display());
    Ok(Environment { layout, stubs })
}

/// Write the proxy, stubs, activation script and `.gitignore` for an
/// installation that already exists under `layout.rust_dir()`.
pub fn materialize(layout: &EnvLayout) -> Result<Vec<String>> {
    // Fail before writing anything the script could not name losslessly
    let path_prefix = layout.path_prefix()?;
    let name = layout.name()?;

    let names = toolchain_binaries(&layout.rust_bin_dir())?;

    if let Some(clash) = names
        .iter()
        .find(|n| RESERVED_NAMES.iter().any(|r| n.as_os_str() == *r))
    {
        bail!(
            "Toolchain binary {:?} in {} collides with a name rustenv reserves in {}",
            clash,
            layout.rust_bin_dir().display(),
            layout.bin_dir().display()
        );
    }

    if names.is_empty() {
        eprintln!(
            "  [WARN] No binaries found in {}; the environment has no tools",
            layout.rust_bin_dir().display()
        );
    }

    write_executable(&layout.proxy_path(), PROXY)?;

    let proxy = layout.proxy_path();
    for name in &names {
        let link = layout.bin_dir().join(name);
        symlink(&proxy, &link).with_context(|| {
            format!(
                "Failed to link {} -> {}",
                link.display(),
                proxy.display()
            )
        })?;
    }
    println!("  Linked {} binaries to {}", names.len(), PROXY_NAME);

    let activate = scripts::render_activate(&path_prefix, name);
    fs::write(layout.activate_path(), activate).with_context(|| {
        format!("Failed to write {}", layout.activate_path().display())
    })?;

    fs::write(layout.gitignore_path(), GITIGNORE).with_context(|| {
        format!("Failed to write {}", layout.gitignore_path().display())
    })?;

    Ok(names
        .into_iter()
        .map(|n| n.to_string_lossy().into_owned())
        .collect())
}

/// Entry names in the installation's `bin/`, sorted.
fn toolchain_binaries(rust_bin: &Path) -> Result<Vec<OsString>> {
    if !rust_bin.is_dir() {
        bail!(
            "Installer finished but {} does not exist",
            rust_bin.display()
        );
    }

    let mut names = fs::read_dir(rust_bin)
        .with_context(|| format!("Failed to list {}", rust_bin.display()))?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<std::io::Result<Vec<_>>>()
        .with_context(|| format!("Failed to list {}", rust_bin.display()))?;
    names.sort();
    Ok(names)
}

/// Write `content` to `path` and add execute bits wherever read bits are
/// already set.
fn write_executable(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;

    let mut perms = fs::metadata(path)
        .with_context(|| format!("Failed to stat {}", path.display()))?
        .permissions();
    let mode = perms.mode();
    perms.set_mode(mode | ((mode & 0o444) >> 2));
    fs::set_permissions(path, perms)
        .with_context(|| format!("Failed to make {} executable", path.display()))?;
    Ok(())
}

//! Rustenv - virtual, activate-able environments for Rust.
//!
//! An environment is a self-contained rustup installation plus a `bin/`
//! directory of stubs that run it without touching the user's shell
//! configuration:
//!
//! ```text
//! $ rustenv renv
//! $ renv/bin/rustc --version
//! $ . renv/bin/activate
//! (renv) $ cargo build
//! (renv) $ deactivate_rustenv
//! ```
//!
//! Pinning a specific toolchain version is not supported; the installer
//! always installs rustup's default.

pub mod config;
pub mod destination;
pub mod environment;
pub mod installer;
pub mod preflight;
pub mod process;
pub mod scripts;
pub mod timing;

pub use environment::{create_environment, EnvLayout, Environment};
pub use installer::{Installer, Rustup};

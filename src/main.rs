//! Rustenv - create Rust virtual environments.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use rustenv::config::Config;
use rustenv::destination::parse_destination;
use rustenv::{create_environment, preflight, Rustup};

#[derive(Parser)]
#[command(name = "rustenv")]
#[command(version, about = "Create Rust virtual environments")]
#[command(
    long_about = "Create Rust virtual environments.\n\n\
A virtual environment is a self-contained Rust installation, holding all the\n\
binaries and other dependencies necessary to build Rust projects (rustc,\n\
cargo, etc.)."
)]
#[command(
    after_help = "EXAMPLE:\n  rustenv renv\n  renv/bin/rustc --version\n  . renv/bin/activate\n  deactivate_rustenv"
)]
struct Cli {
    /// Directory in which to create the environment (must not exist)
    #[arg(value_parser = parse_destination)]
    destination: PathBuf,

    /// Print the effective configuration before building
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load .env if present
    dotenvy::dotenv().ok();
    let config = Config::load();
    if cli.verbose {
        config.print();
    }

    preflight::run_preflight_or_fail(&config)?;

    let installer = Rustup::from_config(&config);
    let env = create_environment(&cli.destination, &installer)?;
    if cli.verbose {
        println!("  Stubs: {}", env.stubs.join(", "));
    }

    Ok(())
}

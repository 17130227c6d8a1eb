// CLASSIFICATION: COMMUNITY
// Filename: main.rs v0.3
// Date Modified: 2026-08-12
// Author: Lukas Bower

//! Entry point for the installer binary.

use clap::Parser;
use log::LevelFilter;
use update365::layout::Layout;
use update365::orchestrator::{Installer, Outcome};
use update365::platform::vita::VitaPlatform;

#[derive(Parser)]
#[command(name = "update365", version, about = "Staged firmware installer")]
struct Args {
    /// Log progress diagnostics to the debug console.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    env_logger::Builder::from_default_env()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .init();

    let mut platform = VitaPlatform::new();
    let mut installer = Installer::new(&mut platform, Layout::default());
    match installer.run() {
        // A handoff that returned control and any failure both end the
        // process; the user-facing message was already shown and held.
        Outcome::HandedOff | Outcome::Failed { .. } => std::process::exit(1),
        Outcome::Cancelled => std::process::exit(0),
    }
}

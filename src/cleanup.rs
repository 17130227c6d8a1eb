// CLASSIFICATION: COMMUNITY
// Filename: cleanup.rs v0.2
// Author: Lukas Bower
// Date Modified: 2026-07-28

//! Removal of residue from prior or competing installer runs.

use log::{debug, warn};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("residue still present: {0}")]
    StillPresent(PathBuf),
}

/// Remove every path in the set. A missing path counts as removed; other
/// failures are logged and left for [`verify_all_absent`] to catch.
pub fn clean_all(paths: &[PathBuf]) {
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => debug!("removed {}", path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!("could not remove {}: {err}", path.display()),
        }
    }
}

/// Probe every path in the set and fail fast on the first one still
/// present. A survivor after [`clean_all`] means a stuck mount, a
/// permissions problem or concurrent interference, and the run must stop.
pub fn verify_all_absent(paths: &[PathBuf]) -> Result<(), CleanupError> {
    for path in paths {
        if path.symlink_metadata().is_ok() {
            return Err(CleanupError::StillPresent(path.clone()));
        }
    }
    Ok(())
}

//! Diagnostics file persistence

use super::probe::StartupSnapshot;
use crate::utils::error::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const DIAGNOSTICS_DIR: &str = ".platform-health";
const DIAGNOSTICS_FILE: &str = "startup-diagnostics.json";

/// Per-user diagnostics path (`~/.platform-health/startup-diagnostics.json`),
/// under the temp dir when there's no home directory
pub fn default_diagnostics_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(DIAGNOSTICS_DIR)
        .join(DIAGNOSTICS_FILE)
}

/// Overwrite the diagnostics file with a snapshot
pub fn write_snapshot(path: &Path, snapshot: &StartupSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_vec_pretty(snapshot)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Parse a diagnostics file written by [`write_snapshot`]
pub fn read_snapshot(path: &Path) -> Result<StartupSnapshot> {
    let content = std::fs::read(path)?;
    Ok(serde_json::from_slice(&content)?)
}

/// Diagnostics must never take the host down: failures are logged and dropped
pub(super) fn persist_best_effort(path: &Path, snapshot: &StartupSnapshot) {
    match write_snapshot(path, snapshot) {
        Ok(()) => debug!(path = %path.display(), phase = %snapshot.phase, "Persisted startup diagnostics"),
        Err(e) => warn!(path = %path.display(), "Failed to persist startup diagnostics: {}", e),
    }
}

pub(super) fn remove_best_effort(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), "Failed to remove startup diagnostics: {}", e),
    }
}

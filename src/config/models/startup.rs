//! Startup probe configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupConfig {
    /// Diagnostics file; the per-user default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostics_path: Option<PathBuf>,
    /// Write the diagnostics file at all
    #[serde(default = "default_true")]
    pub persist: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            diagnostics_path: None,
            persist: true,
        }
    }
}

impl StartupConfig {
    /// Path the probe should persist to, `None` when persistence is off
    pub fn resolved_path(&self) -> Option<PathBuf> {
        if !self.persist {
            return None;
        }
        Some(
            self.diagnostics_path
                .clone()
                .unwrap_or_else(crate::monitoring::startup::default_diagnostics_path),
        )
    }
}

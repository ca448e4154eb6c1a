//! Startup probe
//!
//! Tracks the boot phases of the host process and persists every change to a
//! diagnostics file so orchestrators and CLIs can poll readiness from outside.

mod fixes;
mod persistence;
mod phase;
mod probe;


pub use fixes::{FIX_RULES, FixRule, suggest_fix};
pub use persistence::{default_diagnostics_path, read_snapshot, write_snapshot};
pub use phase::{PHASE_PROGRESS, StartupPhase};
pub use probe::{StartupErrorDetails, StartupEvent, StartupProbe, StartupSnapshot};

//! Startup phases

use serde::{Deserialize, Serialize};

/// A named step in process startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StartupPhase {
    Initializing,
    ConfiguringServices,
    BuildingApp,
    RunningMigrations,
    RegisteringEndpoints,
    StartingServices,
    WarmingUp,
    Ready,
    Failed,
}

/// Percentage reported for each phase. Cosmetic only.
pub const PHASE_PROGRESS: &[(StartupPhase, u8)] = &[
    (StartupPhase::Initializing, 5),
    (StartupPhase::ConfiguringServices, 15),
    (StartupPhase::BuildingApp, 30),
    (StartupPhase::RunningMigrations, 45),
    (StartupPhase::RegisteringEndpoints, 60),
    (StartupPhase::StartingServices, 75),
    (StartupPhase::WarmingUp, 90),
    (StartupPhase::Ready, 100),
    (StartupPhase::Failed, 0),
];

impl StartupPhase {
    /// Progress percentage from [`PHASE_PROGRESS`]
    pub fn progress(self) -> u8 {
        PHASE_PROGRESS
            .iter()
            .find(|(phase, _)| *phase == self)
            .map(|(_, progress)| *progress)
            .unwrap_or(0)
    }

    /// Ready or Failed
    pub fn is_terminal(self) -> bool {
        matches!(self, StartupPhase::Ready | StartupPhase::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StartupPhase::Initializing => "Initializing",
            StartupPhase::ConfiguringServices => "ConfiguringServices",
            StartupPhase::BuildingApp => "BuildingApp",
            StartupPhase::RunningMigrations => "RunningMigrations",
            StartupPhase::RegisteringEndpoints => "RegisteringEndpoints",
            StartupPhase::StartingServices => "StartingServices",
            StartupPhase::WarmingUp => "WarmingUp",
            StartupPhase::Ready => "Ready",
            StartupPhase::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for StartupPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

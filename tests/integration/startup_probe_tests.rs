//! Startup probe integration tests
//!
//! Exercise the diagnostics file the way an out-of-process poller sees it.

#[cfg(test)]
mod tests {
    use platform_health::monitoring::startup::read_snapshot;
    use platform_health::{StartupPhase, StartupProbe};
    use std::io;
    use std::sync::Arc;
    use tempfile::TempDir;

    // ==================== Lifecycle ====================

    #[test]
    fn test_full_boot_sequence_is_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("startup-diagnostics.json");
        let probe = StartupProbe::new(Some(path.clone()));

        for phase in [
            StartupPhase::ConfiguringServices,
            StartupPhase::BuildingApp,
            StartupPhase::RunningMigrations,
            StartupPhase::RegisteringEndpoints,
            StartupPhase::StartingServices,
            StartupPhase::WarmingUp,
        ] {
            probe.set_phase(phase, None);
            let seen = StartupProbe::read_diagnostics(&path).unwrap();
            assert_eq!(seen.phase, phase);
            assert_eq!(seen.progress, phase.progress());
        }
        probe.mark_ready();

        let snapshot = read_snapshot(&path).unwrap();
        assert!(snapshot.is_ready);
        assert!(snapshot.is_alive);
        assert_eq!(snapshot.progress, 100);
        assert_eq!(snapshot.events.len(), 8);
        assert!(snapshot.events.last().unwrap().message.starts_with("Application ready in"));
        assert_eq!(snapshot, probe.snapshot());
    }

    #[test]
    fn test_failure_is_visible_to_poller() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("startup-diagnostics.json");
        let probe = StartupProbe::new(Some(path.clone()));

        probe.set_phase(StartupPhase::RunningMigrations, None);
        let err = io::Error::new(io::ErrorKind::InvalidInput, "bad database connection");
        probe.report_failure(&err, "Startup");

        let snapshot = StartupProbe::read_diagnostics(&path).unwrap();
        assert_eq!(snapshot.phase, StartupPhase::Failed);
        assert!(!snapshot.is_alive);
        assert_eq!(snapshot.progress, 0);

        let details = snapshot.error_details.unwrap();
        assert_eq!(details.message, "bad database connection");
        assert!(details.suggested_fix.unwrap().contains("database"));

        let last = snapshot.events.last().unwrap();
        assert!(last.is_error);
        assert_eq!(last.message, "Startup: bad database connection");
    }

    #[test]
    fn test_raw_file_uses_camel_case() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("diag.json");
        let probe = StartupProbe::new(Some(path.clone()));
        probe.report_warning("slow disk", Some("Move data to local SSD"));

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        for key in ["phase", "isReady", "isAlive", "progress", "elapsedMs", "events"] {
            assert!(raw.get(key).is_some(), "missing {}", key);
        }
        let warning = &raw["events"][1];
        assert_eq!(warning["isWarning"], true);
        assert_eq!(warning["suggestedFix"], "Move data to local SSD");
    }

    // ==================== Concurrency ====================

    #[test]
    fn test_concurrent_warnings_are_all_recorded() {
        let dir = TempDir::new().unwrap();
        let probe = Arc::new(StartupProbe::new(Some(dir.path().join("diag.json"))));

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let probe = Arc::clone(&probe);
                std::thread::spawn(move || {
                    for i in 0..10 {
                        probe.report_warning(&format!("worker {} warning {}", worker, i), None);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(probe.events().len(), 81);
        let persisted = StartupProbe::read_diagnostics(probe.diagnostics_path().unwrap()).unwrap();
        assert_eq!(persisted.events.len(), 81);
    }

    // ==================== Clear ====================

    #[test]
    fn test_clear_starts_over() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("diag.json");
        let probe = StartupProbe::new(Some(path.clone()));
        probe.mark_ready();

        probe.clear();
        assert!(StartupProbe::read_diagnostics(&path).is_err());
        assert_eq!(probe.phase(), StartupPhase::Initializing);

        probe.set_phase(StartupPhase::BuildingApp, None);
        let snapshot = StartupProbe::read_diagnostics(&path).unwrap();
        assert_eq!(snapshot.phase, StartupPhase::BuildingApp);
        assert_eq!(snapshot.events.len(), 1);
    }
}

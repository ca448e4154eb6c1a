//! Suggested fixes for startup failures
//!
//! Best-effort remediation hints keyed on the error message and type name.
//! Rules are evaluated top to bottom and the first match wins; no match
//! means no suggestion.

/// A rule matches when every group has at least one needle in the text
#[derive(Debug, Clone, Copy)]
pub struct FixRule {
    pub name: &'static str,
    pub all_of: &'static [&'static [&'static str]],
    pub fix: &'static str,
}

impl FixRule {
    fn matches(&self, lowercase: &str) -> bool {
        self.all_of
            .iter()
            .all(|group| group.iter().any(|needle| lowercase.contains(needle)))
    }
}

pub const FIX_RULES: &[FixRule] = &[
    FixRule {
        name: "database-connection",
        all_of: &[&["connection", "connect"], &["database", "postgres", "sql"]],
        fix: "Check database connectivity: make sure the database server is running and the connection string is correct, then apply pending migrations",
    },
    FixRule {
        name: "migration",
        all_of: &[&["migration"]],
        fix: "A database migration failed. Review the migration history and apply pending migrations before restarting",
    },
    FixRule {
        name: "redis",
        all_of: &[&["redis"]],
        fix: "Check Redis connectivity and that the configured Redis URL is reachable from this host",
    },
    FixRule {
        name: "port-in-use",
        all_of: &[&["address already in use", "address in use", "port is already allocated"]],
        fix: "The listening port is taken by another process. Stop that process or configure a different port",
    },
    FixRule {
        name: "permission",
        all_of: &[&["permission denied", "access denied", "access is denied"]],
        fix: "The process lacks the permissions it needs. Check ownership of data directories and the user the service runs as",
    },
    FixRule {
        name: "tls",
        all_of: &[&["certificate", "ssl", "tls"]],
        fix: "TLS setup failed. Verify the certificate path and password, and that the certificate hasn't expired",
    },
    FixRule {
        name: "missing-file",
        all_of: &[&["not found", "no such file", "cannot find"], &["file", "path", "directory"]],
        fix: "A required file is missing. Check the paths in the configuration against the deployed artifact",
    },
    FixRule {
        name: "configuration",
        all_of: &[&["configuration", "config", "environment variable"]],
        fix: "Configuration is missing or invalid. Check the config file and any environment overrides",
    },
    FixRule {
        name: "timeout",
        all_of: &[&["timeout", "timed out"]],
        fix: "A dependency didn't respond in time. Check that dependent services are up and reachable",
    },
];

/// Look up a remediation hint for an error message and type name
pub fn suggest_fix(message: &str, error_type: &str) -> Option<&'static str> {
    let text = format!("{} {}", message, error_type).to_lowercase();
    FIX_RULES
        .iter()
        .find(|rule| rule.matches(&text))
        .map(|rule| rule.fix)
}

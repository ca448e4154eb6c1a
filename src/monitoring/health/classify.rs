//! Transport error simplification
//!
//! Raw client errors are long and nested. They're reduced to a short message
//! using an ordered rule table: the first rule with a matching needle wins.

/// Message used when an attempt exceeds its timeout
pub const TIMEOUT_MESSAGE: &str = "Request timed out";

/// One classification rule: any needle (lowercase) matching selects `message`
#[derive(Debug, Clone, Copy)]
pub struct TransportErrorRule {
    pub needles: &'static [&'static str],
    pub message: &'static str,
}

/// Evaluated top to bottom
pub const TRANSPORT_ERROR_RULES: &[TransportErrorRule] = &[
    TransportErrorRule {
        needles: &["connection refused", "actively refused"],
        message: "Connection refused - service not running",
    },
    TransportErrorRule {
        needles: &[
            "dns error",
            "failed to lookup address",
            "name or service not known",
            "no such host",
            "nodename nor servname",
            "name resolution",
        ],
        message: "DNS resolution failed - host not found",
    },
    TransportErrorRule {
        needles: &["certificate", "tls", "ssl", "handshake"],
        message: "SSL/TLS error - certificate validation failed",
    },
    TransportErrorRule {
        needles: &[
            "network is unreachable",
            "no route to host",
            "host is unreachable",
            "network unreachable",
        ],
        message: "Network unreachable",
    },
];

impl TransportErrorRule {
    fn matches(&self, lowercase: &str) -> bool {
        self.needles.iter().any(|needle| lowercase.contains(needle))
    }
}

/// Reduce a transport error description to a short human-readable message.
///
/// Unmatched errors fall back to the first line of the raw text.
pub fn simplify_transport_error(raw: &str) -> String {
    let lowercase = raw.to_lowercase();

    TRANSPORT_ERROR_RULES
        .iter()
        .find(|rule| rule.matches(&lowercase))
        .map(|rule| rule.message.to_string())
        .unwrap_or_else(|| first_line(raw))
}

/// Flatten an error and all of its sources into one string
///
/// A source whose text already appears earlier in the chain is skipped.
pub fn error_chain_text(error: &(dyn std::error::Error + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !cause_text.is_empty() && !text.contains(&cause_text) {
            text.push_str(": ");
            text.push_str(&cause_text);
        }
        source = cause.source();
    }
    text
}

fn first_line(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("Unknown transport error")
        .to_string()
}

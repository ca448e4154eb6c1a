//! Startup probe state machine

use super::fixes::suggest_fix;
use super::persistence::{persist_best_effort, read_snapshot, remove_best_effort};
use super::phase::StartupPhase;
use crate::utils::error::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Structured description of the failure that moved the probe to `Failed`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupErrorDetails {
    pub context: String,
    pub message: String,
    pub error_type: String,
    pub stack_trace: Option<String>,
    pub inner_error: Option<String>,
    pub suggested_fix: Option<String>,
}

/// One entry in the append-only startup history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupEvent {
    pub phase: StartupPhase,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub is_error: bool,
    pub is_warning: bool,
    pub suggested_fix: Option<String>,
}

/// Point-in-time view of the probe; also the diagnostics file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupSnapshot {
    pub phase: StartupPhase,
    pub is_ready: bool,
    pub is_alive: bool,
    pub progress: u8,
    pub elapsed_ms: u64,
    pub started_at: DateTime<Utc>,
    pub error: Option<String>,
    pub error_details: Option<StartupErrorDetails>,
    pub events: Vec<StartupEvent>,
}

#[derive(Debug)]
struct ProbeState {
    phase: StartupPhase,
    started: Instant,
    started_at: DateTime<Utc>,
    completed_in: Option<Duration>,
    error: Option<String>,
    error_details: Option<StartupErrorDetails>,
    events: Vec<StartupEvent>,
}

impl ProbeState {
    fn fresh() -> Self {
        Self {
            phase: StartupPhase::Initializing,
            started: Instant::now(),
            started_at: Utc::now(),
            completed_in: None,
            error: None,
            error_details: None,
            events: Vec::new(),
        }
    }

    fn elapsed(&self) -> Duration {
        self.completed_in.unwrap_or_else(|| self.started.elapsed())
    }

    fn push_event(
        &mut self,
        message: String,
        is_error: bool,
        is_warning: bool,
        suggested_fix: Option<String>,
    ) {
        let elapsed_ms = self.elapsed().as_millis() as u64;
        self.events.push(StartupEvent {
            phase: self.phase,
            message,
            timestamp: Utc::now(),
            elapsed_ms,
            is_error,
            is_warning,
            suggested_fix,
        });
    }

    fn snapshot(&self) -> StartupSnapshot {
        StartupSnapshot {
            phase: self.phase,
            is_ready: self.phase == StartupPhase::Ready,
            is_alive: self.phase != StartupPhase::Failed,
            progress: self.phase.progress(),
            elapsed_ms: self.elapsed().as_millis() as u64,
            started_at: self.started_at,
            error: self.error.clone(),
            error_details: self.error_details.clone(),
            events: self.events.clone(),
        }
    }
}

/// Process-wide startup tracker
///
/// Shared by reference (`Arc<StartupProbe>`) between the boot sequence, the
/// probe endpoints and any background workers. Every mutation is applied and
/// persisted under one lock so the diagnostics file reflects changes in order.
#[derive(Debug)]
pub struct StartupProbe {
    state: Mutex<ProbeState>,
    diagnostics_path: Option<PathBuf>,
}

impl Default for StartupProbe {
    fn default() -> Self {
        Self::new(None)
    }
}

impl StartupProbe {
    /// Create a probe in `Initializing`; `None` keeps diagnostics in memory only
    pub fn new(diagnostics_path: Option<PathBuf>) -> Self {
        let probe = Self {
            state: Mutex::new(ProbeState::fresh()),
            diagnostics_path,
        };
        {
            let mut state = probe.state.lock();
            state.push_event("Startup probe initialized".to_string(), false, false, None);
            probe.persist(&state);
        }
        probe
    }

    /// Probe persisting to [`super::default_diagnostics_path`]
    pub fn with_default_path() -> Self {
        Self::new(Some(super::default_diagnostics_path()))
    }

    pub fn diagnostics_path(&self) -> Option<&Path> {
        self.diagnostics_path.as_deref()
    }

    /// Move to `phase` and record an event.
    ///
    /// Ordering isn't validated; callers advance monotonically. Entering
    /// `Ready` freezes the elapsed timer.
    pub fn set_phase(&self, phase: StartupPhase, message: Option<&str>) {
        let mut state = self.state.lock();
        state.phase = phase;
        if phase == StartupPhase::Ready && state.completed_in.is_none() {
            state.completed_in = Some(state.started.elapsed());
        }

        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| format!("Entered phase {}", phase));
        info!(
            phase = %phase,
            progress = phase.progress(),
            elapsed_ms = state.elapsed().as_millis() as u64,
            "{}",
            message
        );
        state.push_event(message, false, false, None);
        self.persist(&state);
    }

    /// Stop the timer and move to `Ready`
    pub fn mark_ready(&self) {
        let mut state = self.state.lock();
        if state.completed_in.is_none() {
            state.completed_in = Some(state.started.elapsed());
        }
        state.phase = StartupPhase::Ready;
        let elapsed_ms = state.elapsed().as_millis() as u64;
        info!(elapsed_ms = elapsed_ms, "Application ready");
        state.push_event(
            format!("Application ready in {}ms", elapsed_ms),
            false,
            false,
            None,
        );
        self.persist(&state);
    }

    /// Record a fatal startup error and move to `Failed`
    ///
    /// `errorType` is the static type of `err`. For trait objects such as
    /// `&dyn Error` that name carries no information, so the leading token of
    /// the `Debug` output (usually the concrete type or variant) is used.
    pub fn report_failure<E>(&self, err: &E, context: &str)
    where
        E: std::error::Error + ?Sized,
    {
        let message = err.to_string();
        let error_type = error_type_name(err);
        let inner_error = err.source().map(|source| source.to_string());
        self.fail(context, message, error_type, inner_error);
    }

    /// Like [`Self::report_failure`] for failures that aren't `Error` values
    pub fn report_failure_message(&self, message: &str, context: &str) {
        self.fail(context, message.to_string(), "message".to_string(), None);
    }

    fn fail(&self, context: &str, message: String, error_type: String, inner_error: Option<String>) {
        let backtrace = Backtrace::capture();
        let stack_trace = match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        };
        let suggested_fix = suggest_fix(&message, &error_type).map(str::to_string);

        let mut state = self.state.lock();
        let failed_in = state.phase;
        state.phase = StartupPhase::Failed;
        state.error = Some(message.clone());
        state.error_details = Some(StartupErrorDetails {
            context: context.to_string(),
            message: message.clone(),
            error_type: error_type.clone(),
            stack_trace,
            inner_error,
            suggested_fix: suggested_fix.clone(),
        });

        error!(
            failed_in = %failed_in,
            context = context,
            error_type = %error_type,
            suggested_fix = suggested_fix.as_deref().unwrap_or(""),
            "Startup failed: {}",
            message
        );
        state.push_event(format!("{}: {}", context, message), true, false, suggested_fix);
        self.persist(&state);
    }

    /// Record a non-fatal problem; the phase is unchanged
    pub fn report_warning(&self, message: &str, suggested_fix: Option<&str>) {
        let mut state = self.state.lock();
        warn!(phase = %state.phase, "Startup warning: {}", message);
        state.push_event(
            message.to_string(),
            false,
            true,
            suggested_fix.map(str::to_string),
        );
        self.persist(&state);
    }

    /// True only in `Ready`
    pub fn is_ready(&self) -> bool {
        self.state.lock().phase == StartupPhase::Ready
    }

    /// True in every phase except `Failed`
    pub fn is_alive(&self) -> bool {
        self.state.lock().phase != StartupPhase::Failed
    }

    pub fn phase(&self) -> StartupPhase {
        self.state.lock().phase
    }

    pub fn progress(&self) -> u8 {
        self.state.lock().phase.progress()
    }

    /// Time since creation, frozen once `Ready` is reached
    pub fn elapsed(&self) -> Duration {
        self.state.lock().elapsed()
    }

    pub fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    pub fn error_details(&self) -> Option<StartupErrorDetails> {
        self.state.lock().error_details.clone()
    }

    pub fn events(&self) -> Vec<StartupEvent> {
        self.state.lock().events.clone()
    }

    pub fn snapshot(&self) -> StartupSnapshot {
        self.state.lock().snapshot()
    }

    /// Reset to a fresh `Initializing` state and remove the diagnostics file
    pub fn clear(&self) {
        let mut state = self.state.lock();
        *state = ProbeState::fresh();
        if let Some(path) = &self.diagnostics_path {
            remove_best_effort(path);
        }
        info!("Startup probe cleared");
    }

    /// Read diagnostics written by a (possibly different) process
    pub fn read_diagnostics(path: &Path) -> Result<StartupSnapshot> {
        read_snapshot(path)
    }

    fn persist(&self, state: &ProbeState) {
        if let Some(path) = &self.diagnostics_path {
            persist_best_effort(path, &state.snapshot());
        }
    }
}

fn error_type_name<E>(err: &E) -> String
where
    E: std::error::Error + ?Sized,
{
    let type_name = std::any::type_name::<E>();
    if !type_name.starts_with("dyn ") {
        return type_name.to_string();
    }

    let debug = format!("{:?}", err);
    let head = debug
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == ':'))
        .next()
        .unwrap_or_default();
    if head.is_empty() {
        type_name.to_string()
    } else {
        head.to_string()
    }
}

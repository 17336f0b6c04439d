//! Operation logging collaborator
//!
//! The orchestrator reports every generation attempt through a
//! [`LoggingSink`]. Sinks are fire-and-forget: they return nothing and must
//! not panic, so a broken sink can never affect a generation outcome.

use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

/// Receiver of orchestrator events
pub trait LoggingSink: Send + Sync {
    /// A generation operation started
    fn log_operation_start(&self, id: &str, kind: &str);

    /// A generation operation finished
    fn log_operation_end(&self, id: &str, success: bool, detail: &str);

    /// A component reported an error
    fn log_error(&self, component: &str, message: &str);

    /// A component reported a non-fatal problem
    fn log_warning(&self, component: &str, message: &str);
}

impl<T: LoggingSink + ?Sized> LoggingSink for Arc<T> {
    fn log_operation_start(&self, id: &str, kind: &str) {
        (**self).log_operation_start(id, kind);
    }

    fn log_operation_end(&self, id: &str, success: bool, detail: &str) {
        (**self).log_operation_end(id, success, detail);
    }

    fn log_error(&self, component: &str, message: &str) {
        (**self).log_error(component, message);
    }

    fn log_warning(&self, component: &str, message: &str) {
        (**self).log_warning(component, message);
    }
}

/// Forwards events to the `tracing` subscriber
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl LoggingSink for TracingSink {
    fn log_operation_start(&self, id: &str, kind: &str) {
        info!(operation = id, kind, "generation started");
    }

    fn log_operation_end(&self, id: &str, success: bool, detail: &str) {
        if success {
            info!(operation = id, detail, "generation accepted");
        } else {
            warn!(operation = id, detail, "generation rejected");
        }
    }

    fn log_error(&self, component: &str, message: &str) {
        error!(component, "{message}");
    }

    fn log_warning(&self, component: &str, message: &str) {
        warn!(component, "{message}");
    }
}

/// One recorded sink event
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    /// Operation start
    Start {
        /// Operation id
        id: String,
        /// Operation kind
        kind: String,
    },
    /// Operation end
    End {
        /// Operation id
        id: String,
        /// Whether the operation was accepted
        success: bool,
        /// Outcome detail
        detail: String,
    },
    /// Error report
    Error {
        /// Reporting component
        component: String,
        /// Message text
        message: String,
    },
    /// Warning report
    Warning {
        /// Reporting component
        component: String,
        /// Message text
        message: String,
    },
}

/// Sink that keeps events in memory for inspection
///
/// Events are dropped silently if the lock was poisoned.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<LogEvent>>,
}

impl MemorySink {
    /// Empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every event recorded so far
    pub fn events(&self) -> Vec<LogEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Recorded warnings as `(component, message)` pairs
    pub fn warnings(&self) -> Vec<(String, String)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                LogEvent::Warning { component, message } => Some((component, message)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, event: LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl LoggingSink for MemorySink {
    fn log_operation_start(&self, id: &str, kind: &str) {
        self.record(LogEvent::Start {
            id: id.to_string(),
            kind: kind.to_string(),
        });
    }

    fn log_operation_end(&self, id: &str, success: bool, detail: &str) {
        self.record(LogEvent::End {
            id: id.to_string(),
            success,
            detail: detail.to_string(),
        });
    }

    fn log_error(&self, component: &str, message: &str) {
        self.record(LogEvent::Error {
            component: component.to_string(),
            message: message.to_string(),
        });
    }

    fn log_warning(&self, component: &str, message: &str) {
        self.record(LogEvent::Warning {
            component: component.to_string(),
            message: message.to_string(),
        });
    }
}

use std::fmt;
use std::sync::Mutex;

/// Severity of a diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        };
        f.write_str(label)
    }
}

/// Destination for non-fatal anomaly reports raised while scoring.
///
/// The aggregator only ever writes to a sink; what a sink does with the
/// message must never influence a computed score.
pub trait DiagnosticSink: Send + Sync {
    fn log(&self, severity: Severity, message: &str);

    fn debug(&self, message: &str) {
        self.log(Severity::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.log(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.log(Severity::Error, message);
    }

    fn critical(&self, message: &str) {
        self.log(Severity::Critical, message);
    }
}

/// Discards every message.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn log(&self, _severity: Severity, _message: &str) {}
}

/// Forwards messages to the `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!(target: "skill_score", "{}", message),
            Severity::Info => tracing::info!(target: "skill_score", "{}", message),
            Severity::Warning => tracing::warn!(target: "skill_score", "{}", message),
            Severity::Error => tracing::error!(target: "skill_score", "{}", message),
            Severity::Critical => {
                tracing::error!(target: "skill_score", critical = true, "{}", message)
            }
        }
    }
}

/// Collects messages in memory so they can be inspected or reported later.
///
/// When `forward` is set, each message is also passed on to `TracingSink`.
#[derive(Debug, Default)]
pub struct BufferedSink {
    entries: Mutex<Vec<(Severity, String)>>,
    forward: bool,
}

impl BufferedSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer messages and also emit them through `tracing`.
    pub fn forwarding() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            forward: true,
        }
    }

    /// Take all collected messages, leaving the buffer empty.
    pub fn drain(&self) -> Vec<(Severity, String)> {
        match self.entries.lock() {
            Ok(mut guard) => std::mem::take(&mut *guard),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(guard) => guard.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for BufferedSink {
    fn log(&self, severity: Severity, message: &str) {
        if self.forward {
            TracingSink.log(severity, message);
        }
        let mut guard = match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push((severity, message.to_string()));
    }
}

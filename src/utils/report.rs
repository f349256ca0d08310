//! Warning reporting decoupled from the process-wide logging setup.
//!
//! The allocator never touches the global logger. Callers decide where
//! warnings go: the CLI bridges them into `tracing`, tests collect them
//! in memory.

use std::sync::Mutex;

/// Sink for non-fatal warnings emitted during layout computation.
pub trait Reporter {
    fn warn(&self, message: &str);
}

/// Forwards warnings to the active `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Collects warnings in memory for later inspection.
#[derive(Debug, Default)]
#[allow(dead_code)]
pub struct BufferReporter {
    messages: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl BufferReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Reporter for BufferReporter {
    fn warn(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_reporter_collects_messages() {
        let reporter = BufferReporter::new();
        reporter.warn("first");
        reporter.warn("second");
        assert_eq!(reporter.messages(), vec!["first", "second"]);
    }
}

//! Thread-safe diagnostic accumulator.

use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

/// A thread-safe accumulator for diagnostics emitted while resolving a bus.
///
/// Independent resolutions may share one sink. The error count is tracked
/// atomically for fast `has_errors` checks without locking the diagnostic
/// vector.
pub struct DiagnosticSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
    error_count: AtomicUsize,
}

impl DiagnosticSink {
    /// Creates a new empty diagnostic sink.
    pub fn new() -> Self {
        Self {
            diagnostics: Mutex::new(Vec::new()),
            error_count: AtomicUsize::new(0),
        }
    }

    // A panic while holding the lock cannot leave the Vec half-pushed.
    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.diagnostics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Emits a diagnostic into the sink.
    ///
    /// If the diagnostic has [`Severity::Error`], the error count is incremented atomically.
    pub fn emit(&self, diag: Diagnostic) {
        if diag.severity.is_error() {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        self.lock().push(diag);
    }

    /// Returns `true` if any error-severity diagnostic has been emitted.
    ///
    /// The count survives [`take_all`](Self::take_all), so a caller can report
    /// and still decide the exit status afterwards.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Returns the number of warning-severity diagnostics currently held.
    pub fn warning_count(&self) -> usize {
        self.lock()
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .count()
    }

    /// Takes all accumulated diagnostics, leaving the sink empty.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::{Category, DiagnosticCode};

    fn unknown_type(slave: &str) -> Diagnostic {
        Diagnostic::error(
            DiagnosticCode::new(Category::Error, 100),
            format!("slave `{slave}`: type not found"),
        )
    }

    fn unsupported_bus(slave: &str) -> Diagnostic {
        Diagnostic::warning(
            DiagnosticCode::new(Category::Warning, 100),
            "IP does not support the WB bus",
        )
        .with_subject(format!("slave `{slave}`"))
    }

    #[test]
    fn fresh_sink_is_clean() {
        let sink = DiagnosticSink::default();
        assert!(!sink.has_errors());
        assert_eq!(sink.warning_count(), 0);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn counts_by_severity() {
        let sink = DiagnosticSink::new();
        sink.emit(unsupported_bus("dma0"));
        sink.emit(unsupported_bus("dma1"));
        assert!(!sink.has_errors());
        assert_eq!(sink.warning_count(), 2);

        sink.emit(unknown_type("eth0"));
        assert!(sink.has_errors());
        assert_eq!(sink.warning_count(), 2);
    }

    #[test]
    fn drain_keeps_emission_order() {
        let sink = DiagnosticSink::new();
        sink.emit(unsupported_bus("dma0"));
        sink.emit(unknown_type("eth0"));

        let drained = sink.take_all();
        assert_eq!(drained[0].severity, Severity::Warning);
        assert_eq!(drained[1].severity, Severity::Error);
        assert_eq!(sink.warning_count(), 0);
        // error count is cumulative
        assert!(sink.has_errors());
    }

    #[test]
    fn shared_between_threads() {
        use std::sync::Arc;
        use std::thread;

        let sink = Arc::new(DiagnosticSink::new());
        let handles: Vec<_> = (0..4)
            .map(|run| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..25 {
                        sink.emit(unsupported_bus(&format!("run{run}_dma{i}")));
                    }
                    sink.emit(unknown_type(&format!("run{run}")));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(sink.warning_count(), 100);
        assert!(sink.has_errors());
        let errors = sink
            .take_all()
            .into_iter()
            .filter(|d| d.severity.is_error())
            .count();
        assert_eq!(errors, 4);
    }
}

//! Collection point for the diagnostics of one generation run.

use crate::code::DiagnosticCode;
use crate::diagnostic::Diagnostic;
use crate::severity::Severity;
use std::cell::RefCell;
use tracing::{info, warn};

/// Collects diagnostics emitted by the loader and the composer.
///
/// Stages share the sink by reference; it is not `Sync`. Every emitted
/// diagnostic is also logged as a `tracing` event at the matching level.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    diagnostics: RefCell<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic.
    pub fn emit(&self, diag: Diagnostic) {
        let subject = diag.subject.as_deref().unwrap_or("-");
        match diag.severity {
            Severity::Warning => warn!(code = %diag.code, subject, "{}", diag.message),
            Severity::Note => info!(code = %diag.code, subject, "{}", diag.message),
        }
        self.diagnostics.borrow_mut().push(diag);
    }

    /// Number of diagnostics recorded so far.
    pub fn len(&self) -> usize {
        self.diagnostics.borrow().len()
    }

    /// Returns `true` if nothing was recorded.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.borrow().is_empty()
    }

    /// The highest severity recorded, if any.
    pub fn worst(&self) -> Option<Severity> {
        self.diagnostics.borrow().iter().map(|d| d.severity).max()
    }

    /// Returns `true` if a diagnostic with `code` was recorded.
    pub fn contains(&self, code: DiagnosticCode) -> bool {
        self.diagnostics.borrow().iter().any(|d| d.code == code)
    }

    /// Copies out the diagnostics carrying `code`, in emission order.
    pub fn with_code(&self, code: DiagnosticCode) -> Vec<Diagnostic> {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.code == code)
            .cloned()
            .collect()
    }

    /// Drains the sink.
    pub fn take_all(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.borrow_mut())
    }

    /// Copies out everything recorded so far.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forwarded(key: &str) -> Diagnostic {
        Diagnostic::note(DiagnosticCode::FORWARDED_KEY, format!("`{key}` forwarded")).with_subject(key)
    }

    #[test]
    fn starts_empty() {
        let sink = DiagnosticSink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.worst(), None);
        assert!(sink.take_all().is_empty());
    }

    #[test]
    fn worst_tracks_highest_severity() {
        let sink = DiagnosticSink::new();
        sink.emit(forwarded("ident"));
        assert_eq!(sink.worst(), Some(Severity::Note));
        sink.emit(Diagnostic::warning(DiagnosticCode::UNUSED_PHY_DELAY, "ignored"));
        assert_eq!(sink.worst(), Some(Severity::Warning));
    }

    #[test]
    fn filter_by_code() {
        let sink = DiagnosticSink::new();
        sink.emit(forwarded("ident"));
        sink.emit(Diagnostic::warning(DiagnosticCode::SHADOWED_KEY, "shadowed"));
        sink.emit(forwarded("cpu_type"));
        let subjects: Vec<_> = sink
            .with_code(DiagnosticCode::FORWARDED_KEY)
            .into_iter()
            .filter_map(|d| d.subject)
            .collect();
        assert_eq!(subjects, ["ident", "cpu_type"]);
        assert!(sink.contains(DiagnosticCode::SHADOWED_KEY));
        assert!(!sink.contains(DiagnosticCode::CONSTRAINTS_SKIPPED));
    }

    #[test]
    fn take_all_drains() {
        let sink = DiagnosticSink::new();
        sink.emit(forwarded("ident"));
        assert_eq!(sink.len(), 1);
        assert_eq!(sink.take_all().len(), 1);
        assert!(sink.is_empty());
    }
}

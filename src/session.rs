// src/session.rs

use crate::normalize::InvoiceData;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where one upload session currently is. Exactly one phase at a time;
/// `Validating` and `Uploading` are the in-flight phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Validating,
    Uploading,
    Success,
    Failed,
}

/// Upload-session state: one in-flight indicator, the last successful
/// record, and the current error, kept consistent by a single set of
/// transitions instead of independent flags.
///
/// A generation counter closes the last-started vs last-completed race:
/// `begin` supersedes any in-flight request, and completions carrying a
/// stale generation are dropped, so the displayed result always belongs
/// to the most recently started request that actually finished.
#[derive(Debug, Default)]
pub struct UploadSession {
    phase: Phase,
    generation: u64,
    result: Option<InvoiceData>,
    error: Option<String>,
    file: Option<PathBuf>,
}

impl UploadSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The last successfully extracted record. Survives later failures.
    pub fn result(&self) -> Option<&InvoiceData> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// The file behind the last successful extraction, kept for
    /// redisplay.
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn in_flight(&self) -> bool {
        matches!(self.phase, Phase::Validating | Phase::Uploading)
    }

    /// Start a new upload: clears the previous error, supersedes any
    /// in-flight request, and returns the generation token the caller
    /// must hand back on completion.
    pub fn begin(&mut self) -> u64 {
        self.error = None;
        self.generation += 1;
        self.phase = Phase::Validating;
        self.generation
    }

    /// Validation passed; the request is on the wire.
    pub fn uploading(&mut self, generation: u64) {
        if generation != self.generation {
            return;
        }
        self.phase = Phase::Uploading;
    }

    /// The request finished with a normalized record. Stale generations
    /// are dropped.
    pub fn complete(&mut self, generation: u64, data: InvoiceData, file: PathBuf) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Dropping stale completion");
            return;
        }
        self.result = Some(data);
        self.file = Some(file);
        self.error = None;
        self.phase = Phase::Success;
    }

    /// The request failed at any stage. The previous successful result
    /// stays untouched; only the error is populated. Stale generations
    /// are dropped.
    pub fn fail(&mut self, generation: u64, message: impl Into<String>) {
        if generation != self.generation {
            debug!(generation, current = self.generation, "Dropping stale failure");
            return;
        }
        self.error = Some(message.into());
        self.phase = Phase::Failed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn record(invoice_no: &str) -> InvoiceData {
        normalize(&json!({ "invoice_details": { "invoice_no": invoice_no } }))
    }

    #[test]
    fn test_success_transition() {
        let mut session = UploadSession::new();
        assert_eq!(session.phase(), Phase::Idle);

        let generation = session.begin();
        assert_eq!(session.phase(), Phase::Validating);
        assert!(session.in_flight());

        session.uploading(generation);
        assert_eq!(session.phase(), Phase::Uploading);

        session.complete(generation, record("A1"), PathBuf::from("a.pdf"));
        assert_eq!(session.phase(), Phase::Success);
        assert!(!session.in_flight());
        assert_eq!(
            session.result().unwrap().invoice_details.invoice_no,
            "A1"
        );
        assert_eq!(session.file(), Some(Path::new("a.pdf")));
    }

    #[test]
    fn test_begin_clears_previous_error() {
        let mut session = UploadSession::new();
        let generation = session.begin();
        session.fail(generation, "Server error: 500");
        assert_eq!(session.error(), Some("Server error: 500"));

        session.begin();
        assert_eq!(session.error(), None);
        assert!(session.in_flight());
    }

    #[test]
    fn test_failure_preserves_previous_result() {
        let mut session = UploadSession::new();
        let first = session.begin();
        session.complete(first, record("A1"), PathBuf::from("a.pdf"));

        let second = session.begin();
        session.fail(second, "Failed to parse server response");

        assert_eq!(session.phase(), Phase::Failed);
        assert!(!session.in_flight());
        assert_eq!(
            session.result().unwrap().invoice_details.invoice_no,
            "A1"
        );
        assert_eq!(session.error(), Some("Failed to parse server response"));
    }

    #[test]
    fn test_stale_completion_is_dropped() {
        let mut session = UploadSession::new();
        let first = session.begin();
        let second = session.begin();

        // The superseded request finishes late.
        session.complete(first, record("OLD"), PathBuf::from("old.pdf"));
        assert!(session.result().is_none());
        assert!(session.in_flight());

        session.complete(second, record("NEW"), PathBuf::from("new.pdf"));
        assert_eq!(
            session.result().unwrap().invoice_details.invoice_no,
            "NEW"
        );
    }

    #[test]
    fn test_stale_failure_does_not_clobber_current_request() {
        let mut session = UploadSession::new();
        let first = session.begin();
        let second = session.begin();

        session.fail(first, "Network error: timed out");
        assert_eq!(session.error(), None);

        session.complete(second, record("A2"), PathBuf::from("b.pdf"));
        assert_eq!(session.phase(), Phase::Success);
    }
}

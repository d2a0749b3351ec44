//! Document workflows: the AI doc check and upload type detection

use super::{StepOutcome, Workflow, WorkflowError, WorkflowKind};
use crate::models::client::Client;
use crate::models::document::{DocumentKind, DocumentLedger, UploadedDocument};

/// Validation time of the doc check (ms)
pub const DOC_CHECK_DELAY_MS: u64 = 700;

/// Delay before an upload's type is announced (ms)
pub const DETECTION_DELAY_MS: u64 = 450;

pub const NO_DOCS_TO_ANALYZE: &str = "No docs to analyze";

/// Validate the uploaded documents
///
/// Fails fast on an empty ledger; otherwise always passes after the
/// validation delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocCheck {
    document_count: usize,
    started: bool,
    finished: bool,
}

impl DocCheck {
    pub fn new(ledger: &DocumentLedger) -> Self {
        Self {
            document_count: ledger.documents().len(),
            started: false,
            finished: false,
        }
    }
}

impl Workflow for DocCheck {
    fn kind(&self) -> WorkflowKind {
        WorkflowKind::DocCheck
    }

    /// # Errors
    /// `Blocked("No docs to analyze")` when nothing was uploaded
    fn check(&self, _client: &Client) -> Result<(), WorkflowError> {
        if self.document_count == 0 {
            return Err(WorkflowError::Blocked(NO_DOCS_TO_ANALYZE.to_string()));
        }
        Ok(())
    }

    fn start(&mut self, client: &Client) -> Result<StepOutcome, WorkflowError> {
        if self.started {
            return Err(WorkflowError::AlreadyStarted(self.kind()));
        }
        self.check(client)?;

        self.started = true;
        Ok(StepOutcome::log(format!(
            "TaxAgent validating {} document(s)…",
            self.document_count
        ))
        .then_after(DOC_CHECK_DELAY_MS))
    }

    fn advance(&mut self, _client: &Client) -> Result<StepOutcome, WorkflowError> {
        if !self.started {
            return Err(WorkflowError::NotStarted(self.kind()));
        }
        if self.finished {
            return Err(WorkflowError::AlreadyFinished(self.kind()));
        }

        self.finished = true;
        Ok(StepOutcome::log("Validation complete - no anomalies"))
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

/// Announce the detected type of a fresh upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadDetection {
    kind: DocumentKind,
    finished: bool,
}

impl UploadDetection {
    pub fn new(document: &UploadedDocument) -> Self {
        Self {
            kind: document.kind,
            finished: false,
        }
    }
}

impl Workflow for UploadDetection {
    fn kind(&self) -> WorkflowKind {
        WorkflowKind::UploadDetection
    }

    fn initial_delay_ms(&self) -> u64 {
        DETECTION_DELAY_MS
    }

    fn start(&mut self, _client: &Client) -> Result<StepOutcome, WorkflowError> {
        if self.finished {
            return Err(WorkflowError::AlreadyFinished(WorkflowKind::UploadDetection));
        }

        self.finished = true;
        Ok(StepOutcome::log(format!("Detected: {}", self.kind.label())))
    }

    fn advance(&mut self, _client: &Client) -> Result<StepOutcome, WorkflowError> {
        Err(WorkflowError::AlreadyFinished(WorkflowKind::UploadDetection))
    }

    fn is_finished(&self) -> bool {
        self.finished
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::generate;
    use crate::models::document::DocumentSource;

    #[test]
    fn test_empty_ledger_fails_fast() {
        let client = &generate(1, 2025)[0];
        let mut check = DocCheck::new(&DocumentLedger::new());

        assert_eq!(
            check.start(client),
            Err(WorkflowError::Blocked("No docs to analyze".to_string()))
        );
        assert!(!check.is_finished());
    }

    #[test]
    fn test_check_passes() {
        let client = &generate(1, 2025)[0];
        let mut ledger = DocumentLedger::new();
        ledger.simulate_client_upload(client, 0);

        let mut check = DocCheck::new(&ledger);
        assert_eq!(check.start(client).unwrap().next_after_ms, Some(700));
        assert_eq!(
            check.advance(client).unwrap().log,
            vec!["Validation complete - no anomalies"]
        );
        assert!(check.is_finished());
    }

    #[test]
    fn test_upload_detection() {
        let client = &generate(1, 2025)[0];
        let mut ledger = DocumentLedger::new();
        let doc = ledger.upload("K1_partnership.pdf", DocumentSource::Advisor, 0);

        let mut detect = UploadDetection::new(doc);
        assert_eq!(detect.initial_delay_ms(), 450);
        assert_eq!(
            detect.start(client).unwrap().log,
            vec!["Detected: K-1 (Schedule K-1)"]
        );
    }
}

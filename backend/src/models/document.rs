//! Uploaded documents and the per-client activity timeline
//!
//! Documents are metadata only: nothing is stored but the file name, who
//! uploaded it and the kind inferred from the name.

use crate::models::client::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Maximum number of timeline entries kept per client
pub const TIMELINE_CAPACITY: usize = 50;

/// Tax year used for simulated client uploads
pub const SIMULATED_UPLOAD_YEAR: u16 = 2024;

/// Who uploaded a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentSource {
    Client,
    Advisor,
}

impl fmt::Display for DocumentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentSource::Client => f.write_str("Client"),
            DocumentSource::Advisor => f.write_str("Advisor"),
        }
    }
}

/// Document kind inferred from a file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    W2,
    Form1099,
    K1,
    Pdf,
    Image,
    Other,
}

impl DocumentKind {
    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::W2 => "W-2 (Wage & Tax Statement)",
            DocumentKind::Form1099 => "1099 (Income Statement)",
            DocumentKind::K1 => "K-1 (Schedule K-1)",
            DocumentKind::Pdf => "PDF document",
            DocumentKind::Image => "Image document",
            DocumentKind::Other => "Document",
        }
    }

    /// Whether this kind evidences income (W-2, 1099 or K-1)
    pub fn is_income_document(self) -> bool {
        matches!(
            self,
            DocumentKind::W2 | DocumentKind::Form1099 | DocumentKind::K1
        )
    }
}

/// Infer a document kind from its file name
///
/// Form markers win over extensions: `w2_scan.png` is a W-2.
pub fn infer_document_kind(filename: &str) -> DocumentKind {
    let f = filename.to_lowercase();

    if f.contains("w2") {
        DocumentKind::W2
    } else if f.contains("1099") {
        DocumentKind::Form1099
    } else if f.contains("k1") {
        DocumentKind::K1
    } else if f.ends_with(".pdf") {
        DocumentKind::Pdf
    } else if f.ends_with(".jpg") || f.ends_with(".png") {
        DocumentKind::Image
    } else {
        DocumentKind::Other
    }
}

/// A recorded upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedDocument {
    pub name: String,
    pub source: DocumentSource,
    pub kind: DocumentKind,
    /// Virtual time of the upload (ms)
    pub uploaded_at_ms: u64,
}

/// One line of the activity timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub at_ms: u64,
    pub text: String,
}

/// Documents and recent activity for one client
#[derive(Debug, Clone, Default)]
pub struct DocumentLedger {
    documents: Vec<UploadedDocument>,
    timeline: VecDeque<TimelineEntry>,
}

impl DocumentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an upload and add it to the timeline
    pub fn upload(
        &mut self,
        name: impl Into<String>,
        source: DocumentSource,
        at_ms: u64,
    ) -> &UploadedDocument {
        let name = name.into();
        let kind = infer_document_kind(&name);
        self.record(format!("{} uploaded {}", source, name), at_ms);

        self.documents.push(UploadedDocument {
            name,
            source,
            kind,
            uploaded_at_ms: at_ms,
        });
        &self.documents[self.documents.len() - 1]
    }

    /// Simulate the client sending their W-2 through the portal
    pub fn simulate_client_upload(&mut self, client: &Client, at_ms: u64) -> &UploadedDocument {
        let compact: String = client.name().split_whitespace().collect();
        let name = format!("W2_{}_{}.pdf", compact, SIMULATED_UPLOAD_YEAR);
        self.upload(name, DocumentSource::Client, at_ms)
    }

    /// Push a timeline entry, dropping the oldest past capacity
    pub fn record(&mut self, text: impl Into<String>, at_ms: u64) {
        self.timeline.push_front(TimelineEntry {
            at_ms,
            text: text.into(),
        });
        self.timeline.truncate(TIMELINE_CAPACITY);
    }

    /// Uploaded documents, oldest first
    pub fn documents(&self) -> &[UploadedDocument] {
        &self.documents
    }

    /// Timeline entries, newest first
    pub fn timeline(&self) -> impl Iterator<Item = &TimelineEntry> {
        self.timeline.iter()
    }

    pub fn timeline_len(&self) -> usize {
        self.timeline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Whether any upload evidences income
    pub fn has_income_document(&self) -> bool {
        self.documents.iter().any(|d| d.kind.is_income_document())
    }
}

//! Output types: per-document results and batch reports.
//!
//! A batch run never throws away partial success. Every document gets a
//! [`DocumentResult`] — normalized output or a [`DocumentError`] — and the
//! whole run is summarised in a [`BatchReport`]. Callers that want
//! fail-on-any-error semantics opt in via [`BatchReport::into_result`].

use crate::error::{DocumentError, Elements2MdError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The normalized Markdown produced from one document's element sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedDocument {
    /// The final text: cleaned, deduplicated, fused lines joined with
    /// blank-line separators.
    pub markdown: String,

    /// Per-stage counters for this document.
    pub stats: NormalizeStats,
}

/// Counters describing what each pipeline stage did to one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeStats {
    /// Elements presented by the extraction collaborator.
    pub elements_total: usize,
    /// Elements that survived the empty-text skip and were rendered.
    pub elements_rendered: usize,
    /// Lines remaining after the clean pass (trim, blank and page-number drop).
    pub lines_cleaned: usize,
    /// Lines dropped by consecutive-duplicate elimination.
    pub duplicates_dropped: usize,
    /// Label/value pairs fused by the merge pass.
    pub labels_merged: usize,
    /// Byte length of the final Markdown.
    pub output_bytes: usize,
}

/// Outcome of one document inside a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentResult {
    /// The input element file.
    pub input: PathBuf,

    /// Where the normalized Markdown was written, when the document
    /// succeeded.
    pub output: Option<PathBuf>,

    /// Stage counters. Zeroed when the document failed before rendering.
    pub stats: NormalizeStats,

    /// The per-document failure, if any. `None` means success.
    pub error: Option<DocumentError>,

    /// Wall-clock time spent on this document.
    pub duration_ms: u64,
}

impl DocumentResult {
    /// True when the document was normalized and written successfully.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Summary of a whole batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    /// One entry per discovered document, in processing (filename) order.
    pub documents: Vec<DocumentResult>,

    /// Aggregated counters.
    pub stats: BatchStats,
}

/// Aggregated counters for a batch run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct BatchStats {
    /// Documents discovered by the directory scan.
    pub total_documents: usize,
    /// Documents normalized and written successfully.
    pub processed_documents: usize,
    /// Documents that failed (extraction, parse, or write).
    pub failed_documents: usize,
    /// Wall-clock time for the whole batch.
    pub total_duration_ms: u64,
}

impl BatchReport {
    /// Treat any document failure as an error.
    ///
    /// Returns `Err(Elements2MdError::PartialFailure)` when at least one
    /// document failed; otherwise hands the report back unchanged.
    pub fn into_result(self) -> Result<BatchReport, Elements2MdError> {
        if self.stats.failed_documents > 0 {
            return Err(Elements2MdError::PartialFailure {
                success: self.stats.processed_documents,
                failed: self.stats.failed_documents,
                total: self.stats.total_documents,
            });
        }
        Ok(self)
    }
}

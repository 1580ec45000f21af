//! Progress-callback trait for per-document batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::NormalizeConfigBuilder::progress_callback`] to receive
//! events as the driver works through a batch.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers
//! can forward events to a channel, a database record, or a terminal
//! progress bar without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync`, and event payloads
//! are owned `String`s so implementations can move them into spawned tasks
//! without lifetime gymnastics.

use std::sync::Arc;

/// Called by the batch driver as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. The reference driver is sequential, but
/// implementations should still not assume call ordering beyond
/// start-before-complete per document.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once after the directory scan, before any document is processed.
    ///
    /// # Arguments
    /// * `total_documents` — number of documents that will be processed
    fn on_batch_start(&self, total_documents: usize) {
        let _ = total_documents;
    }

    /// Called just before a document's elements are partitioned.
    ///
    /// # Arguments
    /// * `doc_index` — 1-indexed position in the batch
    /// * `total`     — total documents in the batch
    /// * `name`      — the document's file name
    fn on_document_start(&self, doc_index: usize, total: usize, name: String) {
        let _ = (doc_index, total, name);
    }

    /// Called when a document is normalized and written successfully.
    ///
    /// # Arguments
    /// * `markdown_len` — byte length of the normalized Markdown
    fn on_document_complete(&self, doc_index: usize, total: usize, name: String, markdown_len: usize) {
        let _ = (doc_index, total, name, markdown_len);
    }

    /// Called when a document fails; the batch continues afterwards.
    ///
    /// # Arguments
    /// * `error` — human-readable failure description
    fn on_document_error(&self, doc_index: usize, total: usize, name: String, error: String) {
        let _ = (doc_index, total, name, error);
    }

    /// Called once after every document has been attempted.
    ///
    /// # Arguments
    /// * `success_count` — documents that normalized without error
    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let _ = (total_documents, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::NormalizeConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

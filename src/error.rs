//! Error types for the elements2md library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`Elements2MdError`] — **Fatal**: the run cannot proceed at all (input
//!   missing, output directory not creatable, invalid configuration).
//!   Returned as `Err(Elements2MdError)` from the top-level `normalize*`
//!   functions.
//!
//! * [`DocumentError`] — **Non-fatal**: a single document failed (corrupt
//!   element file, unwritable output) but the rest of the batch is fine.
//!   Stored inside [`crate::output::DocumentResult`] so callers can inspect
//!   partial success rather than losing the whole batch to one bad input.
//!
//! The separation lets callers decide their own tolerance: abort on the
//! first document failure via [`crate::output::BatchReport::into_result`],
//! or log and continue (the default batch behaviour).

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the elements2md library.
///
/// Document-level failures use [`DocumentError`] and are stored in
/// [`crate::output::DocumentResult`] rather than propagated here.
#[derive(Debug, Error)]
pub enum Elements2MdError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Element file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// Batch input path is not a directory.
    #[error("Input directory not found: '{dir}'\nBatch mode expects a directory of element files.")]
    NotADirectory { dir: PathBuf },

    /// Listing the batch input directory failed.
    #[error("Failed to scan input directory '{dir}': {source}")]
    ScanFailed {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file (or output directory).
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Document errors (single-document API) ────────────────────────────
    /// The extraction collaborator failed for the one document being
    /// processed. In batch mode the same failure is recorded per document
    /// instead of being returned here.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Some documents succeeded but at least one failed.
    ///
    /// Returned by [`crate::output::BatchReport::into_result`] when the
    /// caller wants to treat any document failure as an error.
    #[error("{failed}/{total} documents failed during normalization")]
    PartialFailure {
        success: usize,
        failed: usize,
        total: usize,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single document.
///
/// Stored in [`crate::output::DocumentResult`] when a document fails.
/// A batch run continues past these.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum DocumentError {
    /// The extraction collaborator could not read the document.
    #[error("'{doc}': element extraction failed: {detail}")]
    ExtractionFailed { doc: PathBuf, detail: String },

    /// The document was read but does not contain valid element data.
    #[error("'{doc}': not a valid element file: {detail}")]
    InvalidElements { doc: PathBuf, detail: String },

    /// The normalized output for this document could not be written.
    #[error("'{doc}': failed to write normalized output: {detail}")]
    WriteFailed { doc: PathBuf, detail: String },
}

//! Pipeline driver: single-document and batch entry points.
//!
//! ## Failure isolation
//!
//! The driver is the only component aware of a batch. The renderer and the
//! normalizer are single-document, stateless, and reusable on their own via
//! [`normalize_elements`]. In batch mode every document gets its own
//! outcome: extraction, parse, and write failures are recorded per document
//! and logged with the document's identifier — one bad input never aborts
//! the run. Only the directory scan itself (or creating the output
//! directory) is fatal.

use crate::config::NormalizeConfig;
use crate::element::{ElementSource, JsonElementSource, LayoutElement};
use crate::error::{DocumentError, Elements2MdError};
use crate::output::{BatchReport, BatchStats, DocumentResult, NormalizeStats, NormalizedDocument};
use crate::pipeline::{normalize, render};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Normalize an in-memory element sequence.
///
/// This is the pure core of the crate: render each element, join the
/// fragments, run the three cleanup passes, and count what every stage did.
/// No I/O, no errors — an empty element sequence yields an empty document.
pub fn normalize_elements(
    elements: &[LayoutElement],
    config: &NormalizeConfig,
) -> NormalizedDocument {
    let fragments = render::render_elements(elements);
    let joined = render::join_fragments(&fragments);

    let cleaned = normalize::clean_lines(&joined);
    let lines_cleaned = cleaned.len();

    let deduped = normalize::dedupe_consecutive(cleaned);
    let duplicates_dropped = lines_cleaned - deduped.len();

    let merged = normalize::merge_label_value(&deduped, config.label_max_len);
    let labels_merged = deduped.len() - merged.len();

    let markdown = merged.join("\n\n").trim().to_string();

    let stats = NormalizeStats {
        elements_total: elements.len(),
        elements_rendered: fragments.len(),
        lines_cleaned,
        duplicates_dropped,
        labels_merged,
        output_bytes: markdown.len(),
    };

    NormalizedDocument { markdown, stats }
}

/// Normalize a single element file.
///
/// This is the primary single-document entry point.
///
/// # Errors
/// Returns `Err(Elements2MdError)` when the file is missing or unreadable,
/// or when the extraction collaborator rejects it.
pub async fn normalize_file(
    input: impl AsRef<Path>,
    config: &NormalizeConfig,
) -> Result<NormalizedDocument, Elements2MdError> {
    let path = resolve_input(input.as_ref())?;
    let source = resolve_source(config);

    let elements = source.partition(&path)?;
    let doc = normalize_elements(&elements, config);
    debug!(
        "Normalized {}: {} elements → {} bytes",
        path.display(),
        doc.stats.elements_total,
        doc.stats.output_bytes
    );
    Ok(doc)
}

/// Normalize a single element file and write the result.
///
/// Uses atomic write (temp file + rename) to prevent partial files; parent
/// directories of `output_path` are created as needed.
pub async fn normalize_to_file(
    input: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
    config: &NormalizeConfig,
) -> Result<NormalizeStats, Elements2MdError> {
    let doc = normalize_file(input, config).await?;
    write_atomic(output_path.as_ref(), &doc.markdown).await?;
    Ok(doc.stats)
}

/// Synchronous wrapper around [`normalize_file`].
///
/// Creates a temporary tokio runtime internally.
pub fn normalize_file_sync(
    input: impl AsRef<Path>,
    config: &NormalizeConfig,
) -> Result<NormalizedDocument, Elements2MdError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Elements2MdError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(normalize_file(input, config))
}

/// Normalize every element file in a directory.
///
/// Scans `input_dir` for files with the source's input extension (sorted by
/// filename for deterministic runs), creates `output_dir` if absent, and
/// writes each document's normalized Markdown to
/// `<output_dir>/<stem>.<output_extension>`. Documents are processed
/// independently and sequentially; per-document failures are recorded in
/// the report and logged, never propagated.
///
/// # Errors
/// Fatal only when `input_dir` is not a directory, the scan fails, or
/// `output_dir` cannot be created.
pub async fn normalize_dir(
    input_dir: impl AsRef<Path>,
    output_dir: impl AsRef<Path>,
    config: &NormalizeConfig,
) -> Result<BatchReport, Elements2MdError> {
    let batch_start = Instant::now();
    let input_dir = input_dir.as_ref();
    let output_dir = output_dir.as_ref();

    // ── Step 1: Discover inputs ──────────────────────────────────────────
    let source = resolve_source(config);
    let inputs = scan_inputs(input_dir, source.input_extension())?;
    let total = inputs.len();
    info!(
        "Found {} .{} files in {}",
        total,
        source.input_extension(),
        input_dir.display()
    );

    // ── Step 2: Prepare output directory ─────────────────────────────────
    tokio::fs::create_dir_all(output_dir)
        .await
        .map_err(|e| Elements2MdError::OutputWriteFailed {
            path: output_dir.to_path_buf(),
            source: e,
        })?;

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    // ── Step 3: Process each document independently ──────────────────────
    let mut documents = Vec::with_capacity(total);
    for (idx, input) in inputs.iter().enumerate() {
        let doc_index = idx + 1;
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some(ref cb) = config.progress_callback {
            cb.on_document_start(doc_index, total, name.clone());
        }

        let doc_start = Instant::now();
        let outcome = process_one(input, output_dir, source.as_ref(), config).await;
        let duration_ms = doc_start.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok((output, stats)) => {
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_complete(doc_index, total, name, stats.output_bytes);
                }
                DocumentResult {
                    input: input.clone(),
                    output: Some(output),
                    stats,
                    error: None,
                    duration_ms,
                }
            }
            Err(e) => {
                warn!("Skipping {}: {}", input.display(), e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_document_error(doc_index, total, name, e.to_string());
                }
                DocumentResult {
                    input: input.clone(),
                    output: None,
                    stats: NormalizeStats::default(),
                    error: Some(e),
                    duration_ms,
                }
            }
        };
        documents.push(result);
    }

    // ── Step 4: Assemble the report ──────────────────────────────────────
    let processed = documents.iter().filter(|d| d.is_ok()).count();
    let failed = total - processed;

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(total, processed);
    }

    let stats = BatchStats {
        total_documents: total,
        processed_documents: processed,
        failed_documents: failed,
        total_duration_ms: batch_start.elapsed().as_millis() as u64,
    };
    info!(
        "Batch complete: {}/{} documents, {}ms total",
        processed, total, stats.total_duration_ms
    );

    Ok(BatchReport { documents, stats })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Resolve the extraction collaborator, defaulting to element JSON files.
fn resolve_source(config: &NormalizeConfig) -> Arc<dyn ElementSource> {
    match config.source {
        Some(ref source) => Arc::clone(source),
        None => Arc::new(JsonElementSource),
    }
}

/// Validate a single-document input path, distinguishing missing from
/// unreadable.
fn resolve_input(path: &Path) -> Result<PathBuf, Elements2MdError> {
    if !path.exists() {
        return Err(Elements2MdError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    match std::fs::File::open(path) {
        Ok(_) => Ok(path.to_path_buf()),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(Elements2MdError::PermissionDenied {
                path: path.to_path_buf(),
            })
        }
        Err(_) => Err(Elements2MdError::FileNotFound {
            path: path.to_path_buf(),
        }),
    }
}

/// List input files with the expected extension, sorted by filename.
fn scan_inputs(input_dir: &Path, extension: &str) -> Result<Vec<PathBuf>, Elements2MdError> {
    if !input_dir.is_dir() {
        return Err(Elements2MdError::NotADirectory {
            dir: input_dir.to_path_buf(),
        });
    }

    let entries = std::fs::read_dir(input_dir).map_err(|e| Elements2MdError::ScanFailed {
        dir: input_dir.to_path_buf(),
        source: e,
    })?;

    let mut inputs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        })
        .collect();
    inputs.sort();
    Ok(inputs)
}

/// Run one document through partition → normalize → write.
///
/// Every failure comes back as a [`DocumentError`] so the batch loop can
/// record it and continue.
async fn process_one(
    input: &Path,
    output_dir: &Path,
    source: &dyn ElementSource,
    config: &NormalizeConfig,
) -> Result<(PathBuf, NormalizeStats), DocumentError> {
    let elements = source.partition(input)?;
    let doc = normalize_elements(&elements, config);

    let stem = input.file_stem().unwrap_or_default();
    let output = output_dir
        .join(stem)
        .with_extension(&config.output_extension);

    write_atomic(&output, &doc.markdown)
        .await
        .map_err(|e| DocumentError::WriteFailed {
            doc: input.to_path_buf(),
            detail: e.to_string(),
        })?;

    Ok((output, doc.stats))
}

/// Atomic write: write to a sibling temp file, then rename over the target.
///
/// Parent directories are created as needed. The rename guarantees readers
/// never observe a half-written output, and the temp file does not survive
/// the error path of the rename.
async fn write_atomic(path: &Path, contents: &str) -> Result<(), Elements2MdError> {
    let io_err = |e: std::io::Error| Elements2MdError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
        }
    }

    let mut tmp_name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, contents).await.map_err(io_err)?;

    if let Err(e) = tokio::fs::rename(&tmp_path, path).await {
        tokio::fs::remove_file(&tmp_path).await.ok();
        return Err(io_err(e));
    }
    Ok(())
}

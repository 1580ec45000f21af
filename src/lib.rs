//! # elements2md
//!
//! Normalize classified document-layout elements into clean Markdown for
//! retrieval pipelines.
//!
//! ## Why this crate?
//!
//! Layout-extraction tools (unstructured-style partitioners and friends) are
//! good at classifying a document into typed blocks — titles, paragraphs,
//! list items, tables — but their raw output embeds badly: page footers
//! survive as free-standing lines, running headers repeat on every page, and
//! "Label: Value" pairs get split across blocks. This crate turns an ordered
//! element sequence into a clean, deduplicated, structurally marked Markdown
//! stream that chunks and embeds well.
//!
//! ## Pipeline Overview
//!
//! ```text
//! element file (.json)
//!  │
//!  ├─ 1. Partition  read the element sequence (ElementSource)
//!  ├─ 2. Render     category → markdown fragment (#, ```text fence, -, verbatim)
//!  ├─ 3. Clean      trim lines, drop blanks and "Page N" footers
//!  ├─ 4. Dedupe     drop consecutive duplicate lines
//!  ├─ 5. Merge      fuse short labels with their ": value" lines
//!  └─ 6. Output     normalized Markdown + per-stage stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use elements2md::{normalize_file, NormalizeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NormalizeConfig::default();
//!     let doc = normalize_file("resume.json", &config).await?;
//!     println!("{}", doc.markdown);
//!     eprintln!("{} elements → {} bytes",
//!         doc.stats.elements_total,
//!         doc.stats.output_bytes);
//!     Ok(())
//! }
//! ```
//!
//! Batch mode mirrors the single-document API: [`normalize_dir`] processes
//! every element file in a directory, isolates per-document failures in a
//! [`BatchReport`], and never lets one corrupt input abort the run.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `elements2md` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! elements2md = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod element;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{NormalizeConfig, NormalizeConfigBuilder};
pub use element::{ElementCategory, ElementSource, JsonElementSource, LayoutElement};
pub use error::{DocumentError, Elements2MdError};
pub use output::{BatchReport, BatchStats, DocumentResult, NormalizeStats, NormalizedDocument};
pub use process::{
    normalize_dir, normalize_elements, normalize_file, normalize_file_sync, normalize_to_file,
};
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};

//! CLI binary for elements2md.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `NormalizeConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use elements2md::{
    normalize_dir, normalize_file, normalize_to_file, BatchProgressCallback, NormalizeConfig,
    ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and a per-document
/// log line using [indicatif].
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Per-document wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
    /// Count of documents that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set by
    /// `on_batch_start` (called after the directory scan).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_batch_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Listing element files…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Normalizing");
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_documents: usize) {
        self.activate_bar(total_documents);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Normalizing {total_documents} element files…"))
        ));
    }

    fn on_document_start(&self, doc_index: usize, _total: usize, name: String) {
        self.start_times
            .lock()
            .unwrap()
            .insert(doc_index, Instant::now());
        self.bar.set_message(name);
    }

    fn on_document_complete(&self, doc_index: usize, total: usize, name: String, markdown_len: usize) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&doc_index)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<32}  {}  {}",
            green("✓"),
            doc_index,
            total,
            name,
            dim(&format!("{markdown_len:>6} bytes")),
            dim(&format!("{}ms", elapsed_ms)),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, doc_index: usize, total: usize, name: String, error: String) {
        self.start_times.lock().unwrap().remove(&doc_index);
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {:<32}  {}",
            red("✗"),
            doc_index,
            total,
            name,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, total_documents: usize, success_count: usize) {
        let failed = total_documents.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} documents normalized successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} documents normalized  ({} failed)",
                if failed == total_documents {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_documents,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Normalize one element file (stdout)
  elements2md resume.json

  # Normalize to a file
  elements2md resume.json -o resume.md

  # Batch: every .json under raw/, outputs land in a sibling preprocessed/
  elements2md knowledge-base/raw

  # Batch with an explicit output directory
  elements2md knowledge-base/raw -o knowledge-base/clean

  # More conservative label fusion
  elements2md --label-max-len 25 resume.json

  # Machine-readable batch report
  elements2md --json knowledge-base/raw > report.json

ELEMENT FILES:
  Inputs are the JSON element files layout-extraction tools emit: a
  top-level array of objects with a "type" tag and a "text" field, e.g.

    [
      {"type": "Title",    "text": "Experience"},
      {"type": "ListItem", "text": "Engineer"},
      {"type": "Table",    "text": "A | B\n1 | 2"}
    ]

  Unknown tags render as plain paragraphs; extra fields are ignored.

ENVIRONMENT VARIABLES:
  ELEMENTS2MD_OUTPUT         Default for --output
  ELEMENTS2MD_LABEL_MAX_LEN  Default for --label-max-len
  ELEMENTS2MD_EXTENSION      Default for --extension
"#;

/// Normalize classified layout elements into clean Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "elements2md",
    version,
    about = "Normalize classified document-layout elements into clean Markdown",
    long_about = "Convert the element JSON emitted by document-layout extraction tools into \
clean, deduplicated, structurally marked Markdown suitable for chunking and embedding. \
Accepts a single element file or a directory of them.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Element JSON file, or a directory of element files (batch mode).
    input: PathBuf,

    /// Output file (single mode) or directory (batch mode).
    /// Batch default: a sibling `preprocessed/` directory of the input.
    #[arg(short, long, env = "ELEMENTS2MD_OUTPUT")]
    output: Option<PathBuf>,

    /// Label-candidate cutoff for label/value fusion, in characters.
    #[arg(long, env = "ELEMENTS2MD_LABEL_MAX_LEN", default_value_t = 40)]
    label_max_len: usize,

    /// Extension (without dot) for written output files.
    #[arg(long, env = "ELEMENTS2MD_EXTENSION", default_value = "md")]
    extension: String,

    /// Output a structured JSON report (batch) or document (single) instead
    /// of Markdown.
    #[arg(long, env = "ELEMENTS2MD_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "ELEMENTS2MD_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "ELEMENTS2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "ELEMENTS2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let batch_mode = cli.input.is_dir();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = batch_mode && !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn BatchProgressCallback>)
    } else {
        None
    };

    let mut builder = NormalizeConfig::builder()
        .label_max_len(cli.label_max_len)
        .output_extension(cli.extension.clone());
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }
    let config = builder.build().context("Invalid configuration")?;

    if batch_mode {
        run_batch(&cli, &config).await
    } else {
        run_single(&cli, &config).await
    }
}

/// Batch mode: normalize every element file in a directory.
async fn run_batch(cli: &Cli, config: &NormalizeConfig) -> Result<()> {
    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_file_name("preprocessed"));

    let report = normalize_dir(&cli.input, &output_dir, config)
        .await
        .context("Batch normalization failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
        return Ok(());
    }

    // Summary line (the callback already printed the per-document log).
    if !cli.quiet {
        eprintln!(
            "{}  {}/{} documents  {}ms  →  {}",
            if report.stats.failed_documents == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            report.stats.processed_documents,
            report.stats.total_documents,
            report.stats.total_duration_ms,
            bold(&output_dir.display().to_string()),
        );
        for doc in report.documents.iter().filter(|d| !d.is_ok()) {
            if let Some(ref e) = doc.error {
                eprintln!("   {} {}", red("✗"), e);
            }
        }
    }

    // Per-document failures are not fatal; exit 0 as long as the scan ran.
    Ok(())
}

/// Single mode: normalize one element file to stdout or a file.
async fn run_single(cli: &Cli, config: &NormalizeConfig) -> Result<()> {
    if let Some(ref output_path) = cli.output {
        let stats = normalize_to_file(&cli.input, output_path, config)
            .await
            .context("Normalization failed")?;

        if !cli.quiet {
            eprintln!(
                "{}  {} elements → {} bytes  →  {}",
                green("✔"),
                stats.elements_total,
                stats.output_bytes,
                bold(&output_path.display().to_string()),
            );
        }
        return Ok(());
    }

    let doc = normalize_file(&cli.input, config)
        .await
        .context("Normalization failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&doc).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(doc.markdown.as_bytes())
            .context("Failed to write to stdout")?;
        // Ensure a trailing newline on stdout.
        if !doc.markdown.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "   {} elements  {} lines kept  {} duplicates dropped  {} labels merged",
            dim(&doc.stats.elements_total.to_string()),
            dim(&doc.stats.lines_cleaned.to_string()),
            dim(&doc.stats.duplicates_dropped.to_string()),
            dim(&doc.stats.labels_merged.to_string()),
        );
    }

    Ok(())
}

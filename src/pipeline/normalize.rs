//! Line normalization: deterministic cleanup of rendered Markdown.
//!
//! ## Why is normalization necessary?
//!
//! Layout extraction is lossy in predictable ways. Three artefacts dominate:
//!
//! - Page footers ("Page 3", "page 12 of 40") survive extraction as
//!   free-standing paragraph elements and are pure noise for embedding.
//! - Running headers repeat the same line on every page; after extraction
//!   the repeats land adjacent to each other.
//! - A "Label: Value" pair gets split across two elements when the label and
//!   the colon land in separate layout blocks, leaving a dangling `: value`
//!   line that embeds poorly.
//!
//! This module applies three cheap, deterministic passes that fix those
//! artefacts without touching content. Each pass is a pure function over an
//! ordered line sequence and is independently testable.
//!
//! ## Pass order
//!
//! Passes must run in this specific order: [`clean_lines`] first so the
//! later passes only ever see trimmed, non-empty lines; [`dedupe_consecutive`]
//! before [`merge_label_value`] so a duplicated label cannot swallow two
//! value lines.
//!
//! Normalization never reorders lines — it only drops or merges adjacent
//! ones, so the element order chosen by the extraction tool is preserved.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default maximum label length for [`merge_label_value`].
///
/// A line shorter than this is considered a label candidate when the next
/// line starts with a colon marker. 40 characters covers realistic field
/// labels ("Email", "Date of Birth", …) while keeping full sentences out.
/// The cutoff is a heuristic, not a rule — tune it per corpus via
/// [`crate::config::NormalizeConfigBuilder::label_max_len`].
pub const DEFAULT_LABEL_MAX_LEN: usize = 40;

// ── Pass 1: boilerplate/whitespace strip ─────────────────────────────────────

/// Matches page-footer artefacts: the word "page" followed by whitespace and
/// digits, optionally followed by more text ("Page 3", "page 12 of 40").
static RE_PAGE_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^page\s+\d+").unwrap());

/// Split a Markdown blob into trimmed, non-empty lines, dropping
/// page-number boilerplate.
pub fn clean_lines(md: &str) -> Vec<String> {
    md.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !RE_PAGE_NUMBER.is_match(line))
        .map(str::to_string)
        .collect()
}

// ── Pass 2: consecutive-duplicate elimination ────────────────────────────────

/// Drop every line that is exactly identical to the immediately preceding
/// kept line.
///
/// Non-adjacent duplicates are preserved: a section heading repeated far
/// apart in the document is meaningful, an exact adjacent repeat is an
/// extraction artefact. Comparison is exact string equality; case and
/// punctuation are never normalized.
pub fn dedupe_consecutive(lines: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(lines.len());
    for line in lines {
        if kept.last() != Some(&line) {
            kept.push(line);
        }
    }
    kept
}

// ── Pass 3: label/value fusion ───────────────────────────────────────────────

/// Reattach a value line to its preceding short label line.
///
/// Walking the sequence with a two-line lookahead: when the current line has
/// strictly fewer than `label_max_len` characters and the next line — after
/// stripping leading whitespace — starts with `":"` or the `"- :"` marker,
/// the next line is normalized (a leading `"- :"` becomes `":"`), trimmed,
/// and concatenated directly onto the current line with no separator. The
/// cursor then advances past both lines.
///
/// The pass is greedy, single-pass, and non-backtracking: a label followed
/// by a short non-colon line is left unmerged, and a short narrative line
/// coincidentally followed by a colon line will be fused — a known
/// false-positive mode that general table reconstruction is out of scope to
/// fix.
pub fn merge_label_value(lines: &[String], label_max_len: usize) -> Vec<String> {
    let mut merged = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i].trim();

        let value = lines.get(i + 1).map(|l| l.trim_start()).filter(|next| {
            line.chars().count() < label_max_len
                && (next.starts_with(':') || next.starts_with("- :"))
        });

        match value {
            Some(raw) => {
                let value = match raw.strip_prefix("- :") {
                    Some(tail) => format!(":{tail}"),
                    None => raw.to_string(),
                };
                merged.push(format!("{line}{}", value.trim()));
                i += 2;
            }
            None => {
                merged.push(line.to_string());
                i += 1;
            }
        }
    }

    merged
}

// ── Composition ──────────────────────────────────────────────────────────────

/// Run all three passes over a rendered Markdown blob and re-join the
/// surviving lines with blank-line separators.
///
/// An empty input (or one that cleans down to nothing) yields an empty
/// string — never an error.
pub fn normalize_markdown(md: &str, label_max_len: usize) -> String {
    let lines = clean_lines(md);
    let lines = dedupe_consecutive(lines);
    let lines = merge_label_value(&lines, label_max_len);
    lines.join("\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(lines: &[&str]) -> Vec<String> {
        lines.iter().map(|s| s.to_string()).collect()
    }

    // ── clean ────────────────────────────────────────────────────────────

    #[test]
    fn clean_trims_and_drops_blank_lines() {
        let got = clean_lines("  a  \n\n\t\nb\n   ");
        assert_eq!(got, owned(&["a", "b"]));
    }

    #[test]
    fn clean_drops_page_number_lines_case_insensitively() {
        let got = clean_lines("intro\nPage 3\npage 12 of 40\nPAGE  7\noutro");
        assert_eq!(got, owned(&["intro", "outro"]));
    }

    #[test]
    fn clean_keeps_lines_that_merely_mention_pages() {
        let got = clean_lines("see page 3 for details\nPages\npage: 4\nPage3");
        assert_eq!(
            got,
            owned(&["see page 3 for details", "Pages", "page: 4", "Page3"])
        );
    }

    #[test]
    fn clean_of_empty_input_is_empty() {
        assert!(clean_lines("").is_empty());
        assert!(clean_lines("\n  \n\t\n").is_empty());
    }

    // ── dedupe ───────────────────────────────────────────────────────────

    #[test]
    fn dedupe_drops_adjacent_repeats_only() {
        let got = dedupe_consecutive(owned(&["a", "a", "b", "a"]));
        assert_eq!(got, owned(&["a", "b", "a"]));
    }

    #[test]
    fn dedupe_collapses_runs_to_one() {
        let got = dedupe_consecutive(owned(&["x", "x", "x", "x"]));
        assert_eq!(got, owned(&["x"]));
    }

    #[test]
    fn dedupe_is_exact_match_no_case_folding() {
        let got = dedupe_consecutive(owned(&["Title", "title"]));
        assert_eq!(got, owned(&["Title", "title"]));
    }

    // ── merge ────────────────────────────────────────────────────────────

    #[test]
    fn merge_fuses_label_with_colon_value() {
        let got = merge_label_value(&owned(&["Email", ": a@b.com"]), DEFAULT_LABEL_MAX_LEN);
        assert_eq!(got, owned(&["Email: a@b.com"]));
    }

    #[test]
    fn merge_normalizes_leading_bullet_colon_marker() {
        let got = merge_label_value(&owned(&["Phone", "- : 555-0100"]), DEFAULT_LABEL_MAX_LEN);
        assert_eq!(got, owned(&["Phone: 555-0100"]));
    }

    #[test]
    fn merge_only_rewrites_the_leading_marker() {
        // A second "- :" later in the value line is data.
        let got = merge_label_value(&owned(&["Note", "- : a - : b"]), DEFAULT_LABEL_MAX_LEN);
        assert_eq!(got, owned(&["Note: a - : b"]));
    }

    #[test]
    fn merge_skips_long_labels() {
        let label = "x".repeat(40); // exactly at the cutoff: not short
        let lines = vec![label, ": value".to_string()];
        let got = merge_label_value(&lines, DEFAULT_LABEL_MAX_LEN);
        assert_eq!(got, lines);
    }

    #[test]
    fn merge_accepts_labels_one_under_the_cutoff() {
        let label = "x".repeat(39);
        let lines = vec![label.clone(), ":v".to_string()];
        let got = merge_label_value(&lines, DEFAULT_LABEL_MAX_LEN);
        assert_eq!(got, vec![format!("{label}:v")]);
    }

    #[test]
    fn merge_counts_characters_not_bytes() {
        // 39 two-byte characters: short by character count.
        let lines = vec!["é".repeat(39), ":v".to_string()];
        let got = merge_label_value(&lines, DEFAULT_LABEL_MAX_LEN);
        assert_eq!(got.len(), 1);
    }

    #[test]
    fn merge_leaves_non_colon_pairs_alone() {
        let lines = owned(&["Email", "a@b.com"]);
        let got = merge_label_value(&lines, DEFAULT_LABEL_MAX_LEN);
        assert_eq!(got, lines);
    }

    #[test]
    fn merge_is_greedy_and_advances_past_the_pair() {
        // After fusing (1,2), line 3 starts a fresh window.
        let got = merge_label_value(
            &owned(&["Email", ": a@b.com", "Phone", ": 555"]),
            DEFAULT_LABEL_MAX_LEN,
        );
        assert_eq!(got, owned(&["Email: a@b.com", "Phone: 555"]));
    }

    #[test]
    fn merge_last_line_has_no_lookahead() {
        let got = merge_label_value(&owned(&["Email"]), DEFAULT_LABEL_MAX_LEN);
        assert_eq!(got, owned(&["Email"]));
    }

    // ── composition ──────────────────────────────────────────────────────

    #[test]
    fn normalize_runs_all_three_passes_in_order() {
        let md = "# Experience\n\n- Engineer\n\n- Engineer\n\nPage 2";
        let got = normalize_markdown(md, DEFAULT_LABEL_MAX_LEN);
        assert_eq!(got, "# Experience\n\n- Engineer");
    }

    #[test]
    fn normalize_of_empty_input_is_empty() {
        assert_eq!(normalize_markdown("", DEFAULT_LABEL_MAX_LEN), "");
        assert_eq!(normalize_markdown("\n\n  \n", DEFAULT_LABEL_MAX_LEN), "");
    }

    #[test]
    fn normalize_output_lines_are_never_blank_or_padded() {
        let md = "  a  \n\n\n  b\t\n\nPage 9\n\nc";
        let got = normalize_markdown(md, DEFAULT_LABEL_MAX_LEN);
        for line in got.split("\n\n") {
            assert!(!line.trim().is_empty());
            assert_eq!(line, line.trim());
        }
    }

    #[test]
    fn normalize_is_a_fixed_point_once_artifacts_are_removed() {
        // No short-label/colon pairs remain in this output, so a second
        // full pass must be a no-op.
        let md = "# Experience\n\n- Engineer\n\n- Engineer\n\nPage 2\n\nEmail\n\n: a@b.com";
        let once = normalize_markdown(md, DEFAULT_LABEL_MAX_LEN);
        let twice = normalize_markdown(&once, DEFAULT_LABEL_MAX_LEN);
        assert_eq!(once, twice);
    }

    #[test]
    fn fenced_table_content_is_not_merged_across_boundaries() {
        // Fence markers are short lines, but the lines that follow them do
        // not start with a colon, so the fence survives intact.
        let md = "intro\n\n\n```text\nA | B\n1 | 2\n```\n\n\noutro";
        let got = normalize_markdown(md, DEFAULT_LABEL_MAX_LEN);
        assert_eq!(
            got,
            "intro\n\n```text\n\nA | B\n\n1 | 2\n\n```\n\noutro"
        );
    }
}

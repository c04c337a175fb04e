//! Preview post-processing.
//!
//! The process endpoint prefixes its preview with a fixed three-line summary
//! block that duplicates the summary line. The block format is a contract
//! with the server; if it changes, bump the pattern rather than loosening it.

use once_cell::sync::Lazy;
use regex::Regex;

/// Shown when the server sends no preview at all.
pub const NO_PREVIEW: &str = "No preview available.";

/// Version 1 of the preview header: three counted lines, each anchored at a
/// line start, followed by any trailing blank lines.
static PREVIEW_HEADER_V1: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^Total references processed: \d+\s*\nSuccessfully processed: \d+\s*\nErrors encountered: \d+\s*\n*",
    )
    .expect("preview header pattern is valid")
});

/// Strip the first occurrence of the summary header from `preview`.
///
/// Text without a matching header is returned unchanged.
pub fn strip_header(preview: &str) -> String {
    PREVIEW_HEADER_V1.replacen(preview, 1, "").into_owned()
}

/// Preview to display for an optional server preview.
pub fn render_preview(preview: Option<&str>) -> String {
    match preview {
        Some(p) if !p.is_empty() => strip_header(p),
        _ => strip_header(NO_PREVIEW),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_leading_header() {
        let preview = "Total references processed: 5\nSuccessfully processed: 5\nErrors encountered: 0\nBODY";
        assert_eq!(strip_header(preview), "BODY");
    }

    #[test]
    fn strips_header_after_title_block() {
        let preview = "Reference Processing Report\n====\n\nTotal references processed: 2\nSuccessfully processed: 1\nErrors encountered: 1\n\nReference 1:\nOriginal: X";
        assert_eq!(
            strip_header(preview),
            "Reference Processing Report\n====\n\nReference 1:\nOriginal: X"
        );
    }

    #[test]
    fn leaves_reordered_header_untouched() {
        let preview = "Successfully processed: 5\nTotal references processed: 5\nErrors encountered: 0\nBODY";
        assert_eq!(strip_header(preview), preview);
    }

    #[test]
    fn header_must_start_a_line() {
        let preview = "x Total references processed: 5\nSuccessfully processed: 5\nErrors encountered: 0\nBODY";
        assert_eq!(strip_header(preview), preview);
    }

    #[test]
    fn missing_preview_uses_fallback() {
        assert_eq!(render_preview(None), NO_PREVIEW);
        assert_eq!(render_preview(Some("")), NO_PREVIEW);
    }
}

//! File-name acceptance rules for uploads.
//!
//! The collaborator can extract text from a fixed set of document formats.
//! Anything else (including legacy `.doc`, which the server rejects) is
//! filtered out on the client before it ever reaches the registry.

/// Extensions the extraction endpoint accepts, in display order.
pub const ALLOWED_EXTENSIONS: &[&str] = &[".docx", ".pdf", ".tex", ".bbl", ".txt"];

/// Lower-cased final suffix of `file_name`, including the leading dot.
///
/// Returns `None` when the name has no dot or ends with one.
pub fn extension_of(file_name: &str) -> Option<String> {
    let (_, ext) = file_name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

/// Whether a candidate file should be accepted into the registry.
pub fn is_acceptable(file_name: &str) -> bool {
    extension_of(file_name).is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
}

/// The allow-list joined for user-facing messages: `.docx, .pdf, ...`.
pub fn allowed_extensions_display() -> String {
    ALLOWED_EXTENSIONS.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_allowed_extension() {
        for name in ["a.docx", "a.pdf", "a.tex", "a.bbl", "a.txt"] {
            assert!(is_acceptable(name), "{name} should be accepted");
        }
    }

    #[test]
    fn suffix_match_is_case_insensitive() {
        assert!(is_acceptable("Paper.PDF"));
        assert!(is_acceptable("refs.BbL"));
    }

    #[test]
    fn only_last_segment_counts() {
        assert!(is_acceptable("draft.v2.docx"));
        assert!(!is_acceptable("draft.docx.zip"));
        assert!(!is_acceptable("notes.txt.bak"));
    }

    #[test]
    fn rejects_names_without_suffix() {
        assert!(!is_acceptable("README"));
        assert!(!is_acceptable("pdf"));
        assert!(!is_acceptable("trailing."));
        assert!(!is_acceptable(""));
    }

    #[test]
    fn rejects_legacy_and_unknown_formats() {
        assert!(!is_acceptable("old.doc"));
        assert!(!is_acceptable("refs.bib"));
        assert!(!is_acceptable("scan.png"));
    }

    #[test]
    fn extension_of_lowercases() {
        assert_eq!(extension_of("X.TeX").as_deref(), Some(".tex"));
        assert_eq!(extension_of("noext"), None);
    }

    #[test]
    fn display_lists_extensions_in_order() {
        assert_eq!(allowed_extensions_display(), ".docx, .pdf, .tex, .bbl, .txt");
    }
}

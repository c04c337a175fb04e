use std::io::Write;

use owo_colors::OwoColorize;
use refassist_core::{FileRegistry, FileStatus, NoticeKind, SessionState, Tone, format_file_size};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the intake result: every registered file with its size and status.
pub fn print_files(w: &mut dyn Write, registry: &FileRegistry, color: ColorMode) -> std::io::Result<()> {
    let count = registry.count();
    writeln!(
        w,
        "{} file{} queued",
        count,
        if count == 1 { "" } else { "s" }
    )?;
    for entry in registry.list() {
        let status = entry.status.label();
        let size = format_file_size(entry.file.size());
        if color.enabled() {
            let status = match entry.status {
                FileStatus::Ready => status.dimmed().to_string(),
                FileStatus::Processing => status.cyan().to_string(),
                FileStatus::Processed => status.green().to_string(),
                FileStatus::Error => status.red().to_string(),
            };
            writeln!(w, "  {} ({}) {}", entry.file.name.bold(), size.dimmed(), status)?;
        } else {
            writeln!(w, "  {} ({}) {}", entry.file.name, size, status)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Print warnings and errors raised during the run.
pub fn print_notices(w: &mut dyn Write, session: &SessionState, color: ColorMode) -> std::io::Result<()> {
    for notice in session.notices() {
        let label = match notice.kind {
            NoticeKind::Warning => "WARNING:",
            NoticeKind::Error => "ERROR:",
        };
        if color.enabled() {
            match notice.kind {
                NoticeKind::Warning => writeln!(w, "{} {}", label.yellow(), notice.message)?,
                NoticeKind::Error => writeln!(w, "{} {}", label.red(), notice.message)?,
            }
        } else {
            writeln!(w, "{} {}", label, notice.message)?;
        }
    }
    Ok(())
}

/// Print the formatted report followed by the preview.
pub fn print_report(w: &mut dyn Write, session: &SessionState, color: ColorMode) -> std::io::Result<()> {
    let report = session.report_text();
    if !report.is_empty() {
        section(w, "REPORT", color)?;
        writeln!(w, "{}", report)?;
        writeln!(w)?;
    }

    let preview = session.preview_text();
    if !preview.trim().is_empty() {
        section(w, "PREVIEW", color)?;
        if color.enabled() {
            writeln!(w, "{}", preview.dimmed())?;
        } else {
            writeln!(w, "{}", preview)?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Print the one-line summary in its tone color.
pub fn print_summary(w: &mut dyn Write, session: &SessionState, color: ColorMode) -> std::io::Result<()> {
    let summary = session.summary_text();
    if summary.is_empty() {
        return Ok(());
    }
    let count = session.reference_count();
    let refs = format!("({} ref{})", count, if count == 1 { "" } else { "s" });
    if color.enabled() {
        let summary = match session.summary_tone() {
            Tone::Good => summary.green().bold().to_string(),
            Tone::Bad => summary.red().bold().to_string(),
            Tone::Neutral => summary.bold().to_string(),
        };
        writeln!(w, "{} {}", summary, refs.dimmed())?;
    } else {
        writeln!(w, "{} {}", summary, refs)?;
    }
    Ok(())
}

fn section(w: &mut dyn Write, title: &str, color: ColorMode) -> std::io::Result<()> {
    let sep = "=".repeat(60);
    if color.enabled() {
        writeln!(w, "{}", sep.bold())?;
        writeln!(w, "{}", title.bold())?;
        writeln!(w, "{}", sep.bold())?;
    } else {
        writeln!(w, "{}", sep)?;
        writeln!(w, "{}", title)?;
        writeln!(w, "{}", sep)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use refassist_core::UploadFile;

    fn render(f: impl Fn(&mut dyn Write) -> std::io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn files_are_listed_with_size_and_status() {
        let mut registry = FileRegistry::new();
        registry.add(UploadFile::new("paper.pdf", vec![0; 1536]));
        let out = render(|w| print_files(w, &registry, ColorMode(false)));
        assert!(out.starts_with("1 file queued\n"));
        assert!(out.contains("paper.pdf (1.5 KB) Ready"));
    }

    #[test]
    fn summary_includes_reference_count() {
        let mut session = SessionState::new();
        session.set_reference_text("A\n\nB");
        session.set_summary("Analysis complete", Tone::Good);
        let out = render(|w| print_summary(w, &session, ColorMode(false)));
        assert_eq!(out, "Analysis complete (2 refs)\n");
    }

    #[test]
    fn empty_report_prints_only_preview() {
        let mut session = SessionState::new();
        session.set_preview_text("BODY");
        let out = render(|w| print_report(w, &session, ColorMode(false)));
        assert!(!out.contains("REPORT"));
        assert!(out.contains("PREVIEW\n"));
        assert!(out.contains("BODY"));
    }

    #[test]
    fn notices_are_labelled_by_kind() {
        let mut session = SessionState::new();
        let now = std::time::Instant::now();
        session.push_notice(NoticeKind::Warning, "careful", None, now);
        session.push_notice(NoticeKind::Error, "broken", None, now);
        let out = render(|w| print_notices(w, &session, ColorMode(false)));
        assert_eq!(out, "WARNING: careful\nERROR: broken\n");
    }
}

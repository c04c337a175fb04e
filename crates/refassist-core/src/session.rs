//! The shared, single-owner session surface both orchestrators write to.

use std::time::{Duration, Instant};

/// How long a rejected-upload warning stays visible.
pub const WARNING_TTL: Duration = Duration::from_secs(5);
/// How long a transient summary acknowledgment shows before reverting.
pub const SUMMARY_FLASH: Duration = Duration::from_secs(2);

pub const PREVIEW_PLACEHOLDER: &str = "No report generated. Enter references and click \"Check\".";
pub const SUMMARY_COMPLETE: &str = "Analysis complete";

/// Colouring of the summary line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tone {
    #[default]
    Neutral,
    Good,
    Bad,
}

/// Which input surface is in front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Paste,
    Upload,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            Self::Paste => "Paste",
            Self::Upload => "Upload",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Paste => Self::Upload,
            Self::Upload => Self::Paste,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Upload-surface warning (rejected files).
    Warning,
    /// Failure the user should read but need not acknowledge.
    Error,
}

/// A non-blocking message shown next to the controls.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    expires_at: Option<Instant>,
}

#[derive(Debug, Clone)]
struct SummaryRevert {
    at: Instant,
    shown: String,
    revert_to: String,
}

/// Text buffer, report, summary and the few display affordances derived
/// from the last completed round-trip. Every setter overwrites wholesale.
#[derive(Debug, Clone)]
pub struct SessionState {
    reference_text: String,
    report_text: String,
    summary_text: String,
    summary_tone: Tone,
    preview_text: String,
    download_enabled: bool,
    active_view: View,
    notices: Vec<Notice>,
    summary_revert: Option<SummaryRevert>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            reference_text: String::new(),
            report_text: String::new(),
            summary_text: "Ready".to_string(),
            summary_tone: Tone::Neutral,
            preview_text: PREVIEW_PLACEHOLDER.to_string(),
            download_enabled: false,
            active_view: View::Paste,
            notices: Vec::new(),
            summary_revert: None,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reference_text(&self) -> &str {
        &self.reference_text
    }

    pub fn set_reference_text(&mut self, text: impl Into<String>) {
        self.reference_text = text.into();
    }

    /// Mutable access for in-place editing by a text input widget.
    pub fn reference_text_mut(&mut self) -> &mut String {
        &mut self.reference_text
    }

    /// Number of non-blank lines in the text buffer.
    pub fn reference_count(&self) -> usize {
        count_references(&self.reference_text)
    }

    pub fn report_text(&self) -> &str {
        &self.report_text
    }

    pub fn set_report_text(&mut self, text: impl Into<String>) {
        self.report_text = text.into();
    }

    pub fn summary_text(&self) -> &str {
        &self.summary_text
    }

    pub fn summary_tone(&self) -> Tone {
        self.summary_tone
    }

    /// Replace the summary line. Cancels any pending transient revert.
    pub fn set_summary(&mut self, text: impl Into<String>, tone: Tone) {
        self.summary_text = text.into();
        self.summary_tone = tone;
        self.summary_revert = None;
    }

    /// Show `text` briefly, then fall back to `revert_to` if nothing else
    /// replaced the summary in the meantime.
    pub fn flash_summary(&mut self, text: &str, tone: Tone, revert_to: &str, now: Instant) {
        self.set_summary(text, tone);
        self.summary_revert = Some(SummaryRevert {
            at: now + SUMMARY_FLASH,
            shown: text.to_string(),
            revert_to: revert_to.to_string(),
        });
    }

    pub fn preview_text(&self) -> &str {
        &self.preview_text
    }

    pub fn set_preview_text(&mut self, text: impl Into<String>) {
        self.preview_text = text.into();
    }

    pub fn download_enabled(&self) -> bool {
        self.download_enabled
    }

    pub fn set_download_enabled(&mut self, enabled: bool) {
        self.download_enabled = enabled;
    }

    pub fn active_view(&self) -> View {
        self.active_view
    }

    pub fn set_active_view(&mut self, view: View) {
        self.active_view = view;
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Raise a notice; `ttl` of `None` keeps it until dismissed.
    pub fn push_notice(
        &mut self,
        kind: NoticeKind,
        message: impl Into<String>,
        ttl: Option<Duration>,
        now: Instant,
    ) {
        let message = message.into();
        tracing::debug!(?kind, %message, "notice raised");
        // One warning slot on the upload surface: a new one replaces the old
        if kind == NoticeKind::Warning {
            self.notices.retain(|n| n.kind != NoticeKind::Warning);
        }
        self.notices.push(Notice {
            kind,
            message,
            expires_at: ttl.map(|t| now + t),
        });
    }

    pub fn dismiss_notices(&mut self, kind: NoticeKind) {
        self.notices.retain(|n| n.kind != kind);
    }

    /// Expire timed notices and apply due summary reverts.
    pub fn tick(&mut self, now: Instant) {
        self.notices
            .retain(|n| n.expires_at.is_none_or(|deadline| now < deadline));

        if let Some(revert) = &self.summary_revert
            && now >= revert.at
        {
            if self.summary_text == revert.shown {
                self.summary_text = revert.revert_to.clone();
            }
            self.summary_revert = None;
        }
    }
}

/// Count non-blank lines, tolerating `\r\n` endings.
pub fn count_references(text: &str) -> usize {
    text.lines().filter(|line| !line.trim().is_empty()).count()
}

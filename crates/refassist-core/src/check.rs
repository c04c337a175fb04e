//! Check lifecycle: submit the text buffer, render the report, download it.
//!
//! Per invocation: Idle → Submitting → {Rendered, Failed} → Idle. The
//! Submitting state owns the check control and the progress indicator
//! through the guards inside [`CheckJob`].

use std::path::PathBuf;
use std::time::Instant;

use crate::collaborator::{ClientError, Collaborator, ProcessResponse};
use crate::preview;
use crate::session::{NoticeKind, PREVIEW_PLACEHOLDER, SUMMARY_COMPLETE, Tone};
use crate::workspace::{CheckJob, DownloadJob, Job, Workspace};

pub const NO_REFERENCES: &str = "No references to process.";
pub const NO_INPUT: &str = "No input";
pub const PROCESSING: &str = "Processing...";
pub const GENERATING_PREVIEW: &str = "Generating report...";
pub const NO_REFERENCES_TO_DISPLAY: &str = "No references to display.";
pub const PROCESSING_FAILED: &str = "Processing failed";
pub const ERROR_OCCURRED: &str = "Error occurred";
pub const PREVIEW_FAILED: &str = "An error occurred while generating the report.";
pub const CLEARED: &str = "Cleared";
pub const REPORT_COPIED: &str = "Report copied";
pub const COPY_FAILED: &str = "Copy failed. Please copy manually.";
pub const NOTHING_TO_DOWNLOAD: &str = "No references to download.";
pub const REPORT_DOWNLOADED: &str = "Full report downloaded";
pub const DOWNLOAD_FAILED: &str = "Failed to download report. Please try again.";

/// Label of the download control while idle and while in flight.
pub const DOWNLOAD_LABEL: &str = "Download report";
pub const DOWNLOAD_BUSY_LABEL: &str = "Generating...";

/// Enter Submitting, or take the empty-input fast path.
///
/// Returns `None` without a network job when the buffer has no non-blank
/// line (the empty-state message is rendered) or when a check is already in
/// flight (nothing changes).
pub fn begin_check(ws: &mut Workspace) -> Option<CheckJob> {
    if ws.session.reference_count() == 0 {
        tracing::debug!("check skipped: no input");
        ws.session.set_report_text(NO_REFERENCES);
        ws.session.set_summary(NO_INPUT, Tone::Neutral);
        ws.session.set_preview_text(PREVIEW_PLACEHOLDER);
        ws.session.set_download_enabled(false);
        return None;
    }

    let Some(flight) = ws.controls.check.try_acquire() else {
        tracing::debug!("check already in flight");
        return None;
    };
    let progress = ws.controls.progress.show();

    ws.session.set_download_enabled(false);
    ws.session.set_preview_text(GENERATING_PREVIEW);
    ws.session.set_report_text("");
    ws.session.set_summary(PROCESSING, Tone::Neutral);

    tracing::debug!(refs = ws.session.reference_count(), "check submitted");
    Some(CheckJob {
        // The raw buffer goes out as-is; line filtering is display-only
        references: ws.session.reference_text().to_string(),
        _flight: flight,
        _progress: progress,
    })
}

/// Render the outcome of a process round-trip. Dropping `job` at the end
/// hides the indicator and re-enables the check control.
pub fn finish_check(ws: &mut Workspace, job: CheckJob, result: Result<ProcessResponse, ClientError>) {
    match result {
        Ok(resp) if resp.success => render_success(ws, &resp),
        Ok(resp) => {
            let detail = resp
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| PROCESSING_FAILED.to_string());
            tracing::warn!(error = %detail, "processing reported failure");
            render_failure(ws, &detail);
        }
        Err(e) => {
            tracing::warn!(error = %e, "process request failed");
            render_failure(ws, &e.to_string());
        }
    }
    drop(job);
}

/// Render a check that ended without any response, e.g. a crashed task.
pub fn fail_check(ws: &mut Workspace, detail: &str) {
    tracing::warn!(error = %detail, "check aborted");
    render_failure(ws, detail);
}

fn render_success(ws: &mut Workspace, resp: &ProcessResponse) {
    let report = resp
        .formatted_output
        .as_deref()
        .filter(|s| !s.is_empty())
        .unwrap_or(NO_REFERENCES_TO_DISPLAY);
    let errors = resp.error_count();
    let tone = if errors == 0 { Tone::Good } else { Tone::Bad };

    tracing::info!(errors, "analysis complete");
    ws.session.set_report_text(report);
    ws.session.set_summary(SUMMARY_COMPLETE, tone);
    ws.session
        .set_preview_text(preview::render_preview(resp.preview.as_deref()));
    ws.session.set_download_enabled(true);
}

fn render_failure(ws: &mut Workspace, detail: &str) {
    ws.session
        .set_report_text(format!("Error: {detail}. Please try again."));
    ws.session.set_summary(ERROR_OCCURRED, Tone::Bad);
    ws.session.set_preview_text(PREVIEW_FAILED);
    ws.session.set_download_enabled(false);
}

/// Empty the text buffer and reset the report surface.
pub fn clear_input(ws: &mut Workspace) {
    ws.pending_check = false;
    ws.session.set_reference_text("");
    ws.session.set_report_text("");
    ws.session.set_summary(CLEARED, Tone::Neutral);
    ws.session.set_preview_text(PREVIEW_PLACEHOLDER);
    ws.session.set_download_enabled(false);
}

/// Copy the rendered report to the host clipboard. No-op on an empty report.
pub fn copy_report(ws: &mut Workspace) {
    if ws.session.report_text().is_empty() {
        return;
    }
    let report = ws.session.report_text().to_string();
    match ws.clipboard_mut().write_text(&report) {
        Ok(()) => {
            ws.session
                .flash_summary(REPORT_COPIED, Tone::Good, SUMMARY_COMPLETE, Instant::now());
        }
        Err(e) => {
            tracing::warn!(error = %e, "copy failed");
            ws.session
                .push_notice(NoticeKind::Error, COPY_FAILED, None, Instant::now());
        }
    }
}

/// Claim the download control for a report-archive request.
///
/// Ignored while the download affordance is disabled or a download is in
/// flight. A blank buffer raises a notice instead of a request.
pub fn begin_download(ws: &mut Workspace) -> Option<DownloadJob> {
    if !ws.session.download_enabled() {
        tracing::debug!("download requested while disabled");
        return None;
    }
    if ws.session.reference_text().trim().is_empty() {
        ws.session
            .push_notice(NoticeKind::Error, NOTHING_TO_DOWNLOAD, None, Instant::now());
        return None;
    }
    let Some(flight) = ws.controls.download.try_acquire() else {
        tracing::debug!("download already in flight");
        return None;
    };

    Some(DownloadJob {
        references: ws.session.reference_text().to_string(),
        dest_dir: ws.download_dir().to_path_buf(),
        _flight: flight,
    })
}

/// Apply a finished download. The control is restored when `job` drops.
pub fn finish_download(
    ws: &mut Workspace,
    job: DownloadJob,
    result: Result<PathBuf, ClientError>,
) {
    match result {
        Ok(path) => {
            tracing::info!(path = %path.display(), "report saved");
            ws.session.flash_summary(
                REPORT_DOWNLOADED,
                Tone::Good,
                SUMMARY_COMPLETE,
                Instant::now(),
            );
        }
        Err(e) => fail_download(ws, &e.to_string()),
    }
    drop(job);
}

/// Report a download that did not produce a saved archive.
pub fn fail_download(ws: &mut Workspace, detail: &str) {
    tracing::warn!(error = %detail, "report download failed");
    ws.session
        .push_notice(NoticeKind::Error, DOWNLOAD_FAILED, None, Instant::now());
}

/// Drives the text-input surface against a collaborator.
pub struct CheckOrchestrator<'a, C: Collaborator + ?Sized> {
    workspace: &'a mut Workspace,
    collaborator: &'a C,
}

impl<'a, C: Collaborator + ?Sized> CheckOrchestrator<'a, C> {
    pub fn new(workspace: &'a mut Workspace, collaborator: &'a C) -> Self {
        Self {
            workspace,
            collaborator,
        }
    }

    /// Submit the text buffer and render whatever comes back.
    pub async fn run(&mut self) {
        if let Some(job) = begin_check(self.workspace) {
            self.workspace.drive(Job::Check(job), self.collaborator).await;
        }
    }

    /// Fetch the report archive and save it to the download directory.
    pub async fn download(&mut self) {
        if let Some(job) = begin_download(self.workspace) {
            self.workspace
                .drive(Job::Download(job), self.collaborator)
                .await;
        }
    }

    pub fn copy_report(&mut self) {
        copy_report(self.workspace);
    }

    pub fn clear(&mut self) {
        clear_input(self.workspace);
    }
}

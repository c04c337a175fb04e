//! Upload lifecycle: intake of candidate files and batch extraction.

use std::time::Instant;

use crate::check;
use crate::collaborator::{ClientError, Collaborator, ExtractResponse};
use crate::registry::{FileId, FileStatus, UploadFile};
use crate::session::{NoticeKind, View, WARNING_TTL};
use crate::validation::{allowed_extensions_display, is_acceptable};
use crate::workspace::{CheckJob, ExtractJob, Job, Workspace};

/// Prefix of the notice raised when extraction fails.
pub const EXTRACT_FAILED: &str = "Failed to extract text from files.";

/// What happened to a batch of candidates.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IntakeReport {
    pub accepted: Vec<FileId>,
    pub rejected: Vec<String>,
}

/// The aggregated warning for a set of rejected names.
pub fn rejection_message(rejected: &[String]) -> String {
    format!(
        "Invalid file format(s): {}. Only {} files are supported.",
        rejected.join(", "),
        allowed_extensions_display()
    )
}

/// Partition candidates by extension; register the accepted ones and raise
/// one timed warning naming every rejected file.
pub fn intake(ws: &mut Workspace, candidates: Vec<UploadFile>) -> IntakeReport {
    let (accepted, rejected): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|candidate| is_acceptable(&candidate.name));

    let rejected: Vec<String> = rejected.into_iter().map(|f| f.name).collect();
    if !rejected.is_empty() {
        tracing::info!(count = rejected.len(), "rejected uploads");
        ws.session.push_notice(
            NoticeKind::Warning,
            rejection_message(&rejected),
            Some(WARNING_TTL),
            Instant::now(),
        );
    }

    let accepted = accepted
        .into_iter()
        .map(|file| ws.registry.add(file).id)
        .collect();

    IntakeReport { accepted, rejected }
}

/// Start an extraction run over every registered entry.
///
/// `None` when the registry is empty or a run is already in flight; in both
/// cases nothing changes. Entries left terminal by an earlier run are
/// replaced with fresh Ready entries before moving to Processing.
pub fn begin_extract(ws: &mut Workspace) -> Option<ExtractJob> {
    if ws.registry.is_empty() {
        tracing::debug!("process requested with no files");
        return None;
    }
    let Some(flight) = ws.controls.extract.try_acquire() else {
        tracing::debug!("extraction already in flight");
        return None;
    };

    let mut run = Vec::new();
    let mut files = Vec::new();
    for id in ws.registry.ids() {
        let Some(id) = ws.registry.renew(id) else {
            continue;
        };
        if ws.registry.set_status(id, FileStatus::Processing)
            && let Some(entry) = ws.registry.get(id)
        {
            files.push(entry.file.clone());
            run.push(id);
        }
    }

    tracing::debug!(files = run.len(), "extraction run started");
    Some(ExtractJob {
        run,
        files,
        _flight: flight,
    })
}

/// Apply an extraction result to the entries of its run.
///
/// Non-empty text replaces the reference buffer and starts a check as a
/// continuation, which is returned for the host to run.
pub fn finish_extract(
    ws: &mut Workspace,
    job: ExtractJob,
    result: Result<ExtractResponse, ClientError>,
) -> Option<CheckJob> {
    match result {
        Ok(resp) => {
            let text = resp.text.unwrap_or_default();
            let text = text.trim();
            tracing::info!(files = job.run.len(), chars = text.len(), "extraction complete");

            let continuation = if text.is_empty() {
                None
            } else {
                ws.session.set_reference_text(text);
                ws.session.set_active_view(View::Paste);
                let job = check::begin_check(ws);
                if job.is_none() && ws.controls.check.is_busy() {
                    tracing::debug!("check continuation deferred until the running check settles");
                    ws.pending_check = true;
                }
                job
            };

            for id in &job.run {
                ws.registry.set_status(*id, FileStatus::Processed);
            }
            continuation
        }
        Err(e) => {
            fail_extract(ws, &job.run, &e.to_string());
            None
        }
    }
}

/// Mark every entry of a failed run Error and raise the failure notice.
pub fn fail_extract(ws: &mut Workspace, run: &[FileId], detail: &str) {
    tracing::warn!(error = %detail, "extraction failed");
    for id in run {
        ws.registry.set_status(*id, FileStatus::Error);
    }
    ws.session.push_notice(
        NoticeKind::Error,
        format!("{EXTRACT_FAILED} {detail}"),
        None,
        Instant::now(),
    );
}

/// Drives the upload surface against a collaborator.
pub struct UploadOrchestrator<'a, C: Collaborator + ?Sized> {
    workspace: &'a mut Workspace,
    collaborator: &'a C,
}

impl<'a, C: Collaborator + ?Sized> UploadOrchestrator<'a, C> {
    pub fn new(workspace: &'a mut Workspace, collaborator: &'a C) -> Self {
        Self {
            workspace,
            collaborator,
        }
    }

    pub fn intake(&mut self, candidates: Vec<UploadFile>) -> IntakeReport {
        intake(self.workspace, candidates)
    }

    /// Extract every registered file, then check the extracted text.
    pub async fn process_all(&mut self) {
        if let Some(job) = begin_extract(self.workspace) {
            self.workspace
                .drive(Job::Extract(job), self.collaborator)
                .await;
        }
    }
}

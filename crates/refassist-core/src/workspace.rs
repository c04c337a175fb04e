//! Command dispatch over the shared session.
//!
//! Every user action becomes a [`Command`]. Dispatching applies the
//! synchronous part immediately and may hand back a [`Job`]: the one network
//! round-trip that action needs. The host runs the job wherever it likes and
//! feeds the resulting [`Completion`] back through [`Workspace::complete`],
//! always on the thread that owns the workspace.

use std::path::PathBuf;
use std::time::Instant;

use crate::check;
use crate::clipboard::{Clipboard, NoClipboard};
use crate::collaborator::{
    ClientError, Collaborator, ExtractResponse, ProcessResponse, REPORT_FILE_NAME,
};
use crate::flight::{Controls, FlightGuard, IndicatorGuard};
use crate::registry::{FileId, FileRegistry, UploadFile};
use crate::session::{NoticeKind, SessionState, View};
use crate::upload;

/// A discrete user action.
#[derive(Debug)]
pub enum Command {
    /// Replace the reference text buffer.
    SetText(String),
    /// Candidate files from a picker, drop, or command line.
    Intake(Vec<UploadFile>),
    RemoveFile(FileId),
    ClearFiles,
    /// Send every registered file to the extraction endpoint.
    ProcessFiles,
    Check,
    /// Empty the text buffer and the report.
    Clear,
    CopyReport,
    DownloadReport,
    ShowView(View),
}

/// Extraction round-trip for one run of registry entries.
#[derive(Debug)]
pub struct ExtractJob {
    pub(crate) run: Vec<FileId>,
    pub(crate) files: Vec<UploadFile>,
    pub(crate) _flight: FlightGuard,
}

impl ExtractJob {
    /// Entries taking part in this run, in registry order.
    pub fn run(&self) -> &[FileId] {
        &self.run
    }
}

/// Process round-trip. Holds the check control and the progress indicator.
#[derive(Debug)]
pub struct CheckJob {
    pub(crate) references: String,
    pub(crate) _flight: FlightGuard,
    pub(crate) _progress: IndicatorGuard,
}

/// Report-archive round-trip plus the local save.
#[derive(Debug)]
pub struct DownloadJob {
    pub(crate) references: String,
    pub(crate) dest_dir: PathBuf,
    pub(crate) _flight: FlightGuard,
}

/// Which round-trip a [`Job`] performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    Extract,
    Check,
    Download,
}

impl JobKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::Check => "check",
            Self::Download => "download",
        }
    }
}

#[derive(Debug)]
pub enum Job {
    Extract(ExtractJob),
    Check(CheckJob),
    Download(DownloadJob),
}

/// Outcome of a [`Job`], carrying the job back so its guards are released
/// only once the result has been applied.
#[derive(Debug)]
pub enum Completion {
    Extracted(ExtractJob, Result<ExtractResponse, ClientError>),
    Checked(CheckJob, Result<ProcessResponse, ClientError>),
    Downloaded(DownloadJob, Result<PathBuf, ClientError>),
}

impl Job {
    pub fn kind(&self) -> JobKind {
        match self {
            Self::Extract(_) => JobKind::Extract,
            Self::Check(_) => JobKind::Check,
            Self::Download(_) => JobKind::Download,
        }
    }

    pub fn label(&self) -> &'static str {
        self.kind().label()
    }

    /// Perform the network round-trip. Never touches shared state.
    pub async fn execute<C: Collaborator + ?Sized>(self, collaborator: &C) -> Completion {
        match self {
            Job::Extract(job) => {
                let result = collaborator.extract(&job.files).await;
                Completion::Extracted(job, result)
            }
            Job::Check(job) => {
                let result = collaborator.process(&job.references).await;
                Completion::Checked(job, result)
            }
            Job::Download(job) => {
                let result = match collaborator.download_report(&job.references).await {
                    Ok(bytes) => save_report(&job.dest_dir, &bytes).await,
                    Err(e) => Err(e),
                };
                Completion::Downloaded(job, result)
            }
        }
    }
}

async fn save_report(dir: &std::path::Path, bytes: &[u8]) -> Result<PathBuf, ClientError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(REPORT_FILE_NAME);
    tokio::fs::write(&path, bytes).await?;
    Ok(path)
}

/// Owner of the session state, file registry and per-operation controls.
pub struct Workspace {
    pub session: SessionState,
    pub registry: FileRegistry,
    pub controls: Controls,
    /// An extraction finished while a check was in flight; check the new
    /// text once that check settles.
    pub(crate) pending_check: bool,
    download_dir: PathBuf,
    clipboard: Box<dyn Clipboard>,
}

impl Workspace {
    pub fn new(download_dir: impl Into<PathBuf>) -> Self {
        Self {
            session: SessionState::new(),
            registry: FileRegistry::new(),
            controls: Controls::default(),
            pending_check: false,
            download_dir: download_dir.into(),
            clipboard: Box::new(NoClipboard),
        }
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn Clipboard>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn download_dir(&self) -> &std::path::Path {
        &self.download_dir
    }

    pub(crate) fn clipboard_mut(&mut self) -> &mut dyn Clipboard {
        self.clipboard.as_mut()
    }

    /// Apply a command. Returns the network job it started, if any.
    pub fn dispatch(&mut self, command: Command) -> Option<Job> {
        tracing::trace!(?command, "dispatch");
        match command {
            Command::SetText(text) => {
                self.session.set_reference_text(text);
                None
            }
            Command::Intake(candidates) => {
                upload::intake(self, candidates);
                None
            }
            Command::RemoveFile(id) => {
                self.registry.remove(id);
                None
            }
            Command::ClearFiles => {
                self.registry.clear();
                self.session.dismiss_notices(NoticeKind::Warning);
                None
            }
            Command::ProcessFiles => upload::begin_extract(self).map(Job::Extract),
            Command::Check => check::begin_check(self).map(Job::Check),
            Command::Clear => {
                check::clear_input(self);
                None
            }
            Command::CopyReport => {
                check::copy_report(self);
                None
            }
            Command::DownloadReport => check::begin_download(self).map(Job::Download),
            Command::ShowView(view) => {
                self.session.set_active_view(view);
                None
            }
        }
    }

    /// Apply a finished round-trip. Returns a continuation job, if any.
    pub fn complete(&mut self, completion: Completion) -> Option<Job> {
        match completion {
            Completion::Extracted(job, result) => {
                upload::finish_extract(self, job, result).map(Job::Check)
            }
            Completion::Checked(job, result) => {
                if std::mem::take(&mut self.pending_check) {
                    // The buffer was replaced mid-flight; this result is stale
                    tracing::debug!("discarding check result for replaced text");
                    drop(job);
                    return check::begin_check(self).map(Job::Check);
                }
                check::finish_check(self, job, result);
                None
            }
            Completion::Downloaded(job, result) => {
                check::finish_download(self, job, result);
                None
            }
        }
    }

    /// Settle a job that ended without a completion, such as a task that
    /// panicked. Its guards are already released. Returns a continuation
    /// job, if any.
    pub fn fail(&mut self, kind: JobKind, run: &[FileId], detail: &str) -> Option<Job> {
        match kind {
            JobKind::Extract => {
                upload::fail_extract(self, run, detail);
                None
            }
            JobKind::Check => {
                if std::mem::take(&mut self.pending_check) {
                    return check::begin_check(self).map(Job::Check);
                }
                check::fail_check(self, detail);
                None
            }
            JobKind::Download => {
                check::fail_download(self, detail);
                None
            }
        }
    }

    /// Run `job` and any continuations inline until the chain settles.
    pub async fn drive<C: Collaborator + ?Sized>(&mut self, job: Job, collaborator: &C) {
        let mut next = Some(job);
        while let Some(job) = next.take() {
            let completion = job.execute(collaborator).await;
            next = self.complete(completion);
        }
    }

    /// Dispatch and, if a job results, drive it to completion.
    pub async fn dispatch_and_drive<C: Collaborator + ?Sized>(
        &mut self,
        command: Command,
        collaborator: &C,
    ) {
        if let Some(job) = self.dispatch(command) {
            self.drive(job, collaborator).await;
        }
    }

    /// Advance timers: notice expiry and transient summaries.
    pub fn tick(&mut self, now: Instant) {
        self.session.tick(now);
    }

    /// Whether any round-trip currently shows the progress indicator.
    pub fn is_busy(&self) -> bool {
        self.controls.progress.is_visible()
    }
}

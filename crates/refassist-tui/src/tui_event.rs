use refassist_core::{Completion, FileId, Job, JobKind};

/// Commands sent from the TUI to the backend.
#[derive(Debug)]
pub enum BackendCommand {
    /// Run one network round-trip.
    Run(Job),
}

/// Events flowing from the backend tasks to the TUI.
#[derive(Debug)]
pub enum BackendEvent {
    /// A round-trip finished; apply it on the UI thread.
    Completed(Completion),
    /// The task running a job panicked before producing a completion.
    /// `run` lists the registry entries an extraction was holding.
    Crashed { kind: JobKind, run: Vec<FileId> },
}

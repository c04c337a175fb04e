pub mod check;
pub mod clipboard;
pub mod collaborator;
pub mod config_file;
pub mod flight;
pub mod prefs;
pub mod preview;
pub mod registry;
pub mod session;
pub mod upload;
pub mod validation;
pub mod workspace;

// Re-export for convenience
pub use check::CheckOrchestrator;
pub use clipboard::{Clipboard, ClipboardError, MemoryClipboard, NoClipboard};
pub use collaborator::{
    ClientError, Collaborator, ExtractResponse, HttpCollaborator, ProcessResponse, ProcessSummary,
};
pub use config_file::{ConfigFile, Overrides, Settings};
pub use prefs::{
    FilePreferenceStore, MemoryPreferenceStore, PreferenceError, PreferenceStore, ThemePreference,
};
pub use registry::{FileEntry, FileId, FileRegistry, FileStatus, UploadFile, format_file_size};
pub use session::{Notice, NoticeKind, SessionState, Tone, View};
pub use upload::{IntakeReport, UploadOrchestrator};
pub use workspace::{Command, Completion, Job, JobKind, Workspace};

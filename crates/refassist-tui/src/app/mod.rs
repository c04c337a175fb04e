mod backend;
mod update;
mod update_file_picker;
mod util;
pub use util::Osc52Clipboard;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;

use refassist_core::validation::is_acceptable;
use refassist_core::{Command, Job, NoticeKind, PreferenceStore, ThemePreference, Workspace};

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Which screen is currently displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    /// Tabs, text or upload panel, report and preview.
    Main,
    FilePicker,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Keystrokes go into the reference text buffer.
    Editing,
}

/// State for the file picker screen.
#[derive(Debug, Clone)]
pub struct FilePickerState {
    /// Current directory being browsed.
    pub current_dir: PathBuf,
    /// Entries in the current directory (dirs first, then files).
    pub entries: Vec<PickerEntry>,
    /// Cursor position in the entries list.
    pub cursor: usize,
    /// Files marked for upload.
    pub selected: Vec<PathBuf>,
}

/// A single entry in the file picker.
#[derive(Debug, Clone)]
pub struct PickerEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
    /// Extension is on the upload allow-list.
    pub is_supported: bool,
}

impl FilePickerState {
    pub fn new() -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::in_dir(current_dir)
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        let mut state = Self {
            current_dir: dir.into(),
            entries: Vec::new(),
            cursor: 0,
            selected: Vec::new(),
        };
        state.refresh_entries();
        state
    }

    /// Refresh the entries list from the current directory.
    pub fn refresh_entries(&mut self) {
        let mut entries = Vec::new();

        if let Some(parent) = self.current_dir.parent() {
            entries.push(PickerEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_dir: true,
                is_supported: false,
            });
        }

        if let Ok(read_dir) = std::fs::read_dir(&self.current_dir) {
            let mut dirs = Vec::new();
            let mut files = Vec::new();

            for entry in read_dir.flatten() {
                let path = entry.path();
                let name = entry.file_name().to_string_lossy().to_string();

                // Skip hidden files/dirs
                if name.starts_with('.') {
                    continue;
                }

                if path.is_dir() {
                    dirs.push(PickerEntry {
                        name,
                        path,
                        is_dir: true,
                        is_supported: false,
                    });
                } else {
                    let is_supported = is_acceptable(&name);
                    files.push(PickerEntry {
                        name,
                        path,
                        is_dir: false,
                        is_supported,
                    });
                }
            }

            dirs.sort_by_key(|e| e.name.to_lowercase());
            files.sort_by_key(|e| e.name.to_lowercase());

            entries.extend(dirs);
            entries.extend(files);
        }

        self.entries = entries;
        self.cursor = 0;
    }

    /// Toggle selection of the current entry. Any regular file can be
    /// selected; unsupported ones are rejected (with a warning) at intake.
    pub fn toggle_selected(&mut self) {
        if let Some(entry) = self.entries.get(self.cursor)
            && !entry.is_dir
        {
            if let Some(pos) = self.selected.iter().position(|p| p == &entry.path) {
                self.selected.remove(pos);
            } else {
                self.selected.push(entry.path.clone());
            }
        }
    }

    /// Enter the directory at cursor, or return false if not a directory.
    pub fn enter_directory(&mut self) -> bool {
        if let Some(entry) = self.entries.get(self.cursor)
            && entry.is_dir
        {
            self.current_dir = entry.path.clone();
            self.refresh_entries();
            return true;
        }
        false
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.selected.iter().any(|p| p == path)
    }
}

/// Main application state.
pub struct App {
    pub workspace: Workspace,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub theme_pref: ThemePreference,
    prefs: Box<dyn PreferenceStore>,
    pub file_picker: FilePickerState,
    /// Cursor into the registry list on the Upload tab.
    pub file_cursor: usize,
    /// Scroll offset of the report panel.
    pub report_scroll: u16,
    pub tick: usize,
    pub should_quit: bool,
    pub confirm_quit: bool,
    pub show_help: bool,
    /// Height of the visible list area (set on resize, used for page up/down).
    pub visible_rows: usize,
    /// Channel to send jobs to the backend listener.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
    /// Jobs produced while no backend is attached; they hold their controls
    /// until taken.
    pub(crate) unsent: Vec<Job>,
}

impl App {
    pub fn new(workspace: Workspace, prefs: Box<dyn PreferenceStore>) -> Self {
        let theme_pref = ThemePreference::load(prefs.as_ref());
        Self {
            workspace,
            screen: Screen::Main,
            input_mode: InputMode::Normal,
            theme: Theme::for_preference(theme_pref),
            theme_pref,
            prefs,
            file_picker: FilePickerState::new(),
            file_cursor: 0,
            report_scroll: 0,
            tick: 0,
            should_quit: false,
            confirm_quit: false,
            show_help: false,
            visible_rows: 20,
            backend_cmd_tx: None,
            unsent: Vec::new(),
        }
    }

    /// Override the stored theme for this session without persisting it.
    pub fn set_theme(&mut self, pref: ThemePreference) {
        self.theme_pref = pref;
        self.theme = Theme::for_preference(pref);
    }

    // update() is in update.rs
    // handle_file_picker_action() is in update_file_picker.rs
    // handle_backend_event() is in backend.rs

    /// Apply a command and hand any resulting job to the backend.
    pub fn dispatch(&mut self, command: Command) {
        let job = self.workspace.dispatch(command);
        self.submit(job);
    }

    pub(crate) fn submit(&mut self, job: Option<Job>) {
        let Some(job) = job else {
            return;
        };
        tracing::debug!(job = job.label(), "submitting job");
        match &self.backend_cmd_tx {
            Some(tx) => {
                // A closed channel drops the job, which releases its controls
                if let Err(e) = tx.send(BackendCommand::Run(job)) {
                    tracing::warn!("backend unavailable, dropping job: {e}");
                }
            }
            None => self.unsent.push(job),
        }
    }

    /// Read `paths` into memory and offer them to the registry.
    pub fn add_paths(&mut self, paths: &[PathBuf]) {
        let mut candidates = Vec::new();
        for path in paths {
            match util::read_upload(path) {
                Ok(file) => candidates.push(file),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "could not read file");
                    self.workspace.session.push_notice(
                        NoticeKind::Error,
                        format!("Could not read {}: {}", path.display(), e),
                        None,
                        std::time::Instant::now(),
                    );
                }
            }
        }
        if !candidates.is_empty() {
            self.dispatch(Command::Intake(candidates));
        }
    }

    /// Flip light/dark and persist the choice.
    fn toggle_theme(&mut self) {
        self.set_theme(self.theme_pref.toggled());
        if let Err(e) = self.theme_pref.save(self.prefs.as_mut()) {
            tracing::warn!(error = %e, "could not save theme preference");
        }
    }

    /// Clamp the upload-list cursor after the registry shrinks.
    fn clamp_file_cursor(&mut self) {
        self.file_cursor = self
            .file_cursor
            .min(self.workspace.registry.count().saturating_sub(1));
    }

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();

        match self.screen {
            Screen::FilePicker => crate::view::file_picker::render_in(f, self, area),
            Screen::Main => crate::view::render_main(f, self, area),
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme);
        }
    }
}

#[cfg(test)]
mod tests;

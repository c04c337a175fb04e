use refassist_core::{Command, View};

use super::{App, InputMode, Screen};
use crate::action::Action;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        if action == Action::Tick {
            self.tick = self.tick.wrapping_add(1);
            self.workspace.tick(std::time::Instant::now());
            return false;
        }
        if let Action::Resize(_w, h) = action {
            self.visible_rows = (h as usize).saturating_sub(10);
            return false;
        }

        // Quit confirmation modal: q confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                }
                _ => {}
            }
            return false;
        }

        // Help overlay swallows everything except its own dismissal
        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::NavigateBack | Action::Quit) {
                self.show_help = false;
            }
            return false;
        }

        if self.screen == Screen::FilePicker {
            self.handle_file_picker_action(action);
            return false;
        }

        // Shortcuts and pastes act the same in both input modes
        match action {
            Action::Check => {
                self.report_scroll = 0;
                self.dispatch(Command::Check);
                return false;
            }
            Action::Clear => {
                self.report_scroll = 0;
                self.dispatch(Command::Clear);
                return false;
            }
            Action::Paste(text) => {
                self.handle_paste(&text);
                return false;
            }
            Action::Quit => {
                self.input_mode = InputMode::Normal;
                self.confirm_quit = true;
                return false;
            }
            _ => {}
        }

        if self.input_mode == InputMode::Editing {
            self.handle_editing_action(action);
            return false;
        }

        match self.workspace.session.active_view() {
            View::Paste => self.handle_paste_view_action(action),
            View::Upload => self.handle_upload_view_action(action),
        }
        false
    }

    fn handle_editing_action(&mut self, action: Action) {
        if action == Action::NavigateBack {
            self.input_mode = InputMode::Normal;
            return;
        }
        let text = self.workspace.session.reference_text_mut();
        match action {
            Action::InsertChar(c) => text.push(c),
            Action::InsertNewline => text.push('\n'),
            Action::Backspace => {
                text.pop();
            }
            _ => {}
        }
    }

    /// Pasted text lands in the buffer on the Paste tab. On the Upload tab a
    /// paste is treated as a list of dropped file paths, one per line.
    fn handle_paste(&mut self, text: &str) {
        match self.workspace.session.active_view() {
            View::Paste => {
                let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
                self.workspace
                    .session
                    .reference_text_mut()
                    .push_str(&normalized);
            }
            View::Upload => {
                let paths: Vec<_> = text
                    .lines()
                    .map(|l| l.trim().trim_matches(|c| c == '\'' || c == '"'))
                    .filter(|l| !l.is_empty())
                    .map(std::path::PathBuf::from)
                    .collect();
                self.add_paths(&paths);
            }
        }
    }

    fn handle_paste_view_action(&mut self, action: Action) {
        match action {
            Action::StartEditing | Action::DrillIn => {
                self.input_mode = InputMode::Editing;
            }
            Action::ToggleView => self.toggle_view(),
            Action::CopyReport => self.dispatch(Command::CopyReport),
            Action::DownloadReport => self.dispatch(Command::DownloadReport),
            Action::MoveDown => {
                self.report_scroll = self.report_scroll.saturating_add(1);
            }
            Action::MoveUp => {
                self.report_scroll = self.report_scroll.saturating_sub(1);
            }
            Action::PageDown => {
                let page = self.visible_rows.max(1) as u16;
                self.report_scroll = self.report_scroll.saturating_add(page);
            }
            Action::PageUp => {
                let page = self.visible_rows.max(1) as u16;
                self.report_scroll = self.report_scroll.saturating_sub(page);
            }
            Action::GoTop => {
                self.report_scroll = 0;
            }
            Action::GoBottom => {
                let lines = self.workspace.session.report_text().lines().count();
                self.report_scroll = lines.saturating_sub(1).min(u16::MAX as usize) as u16;
            }
            Action::AddFiles => self.open_file_picker(),
            Action::ToggleTheme => self.toggle_theme(),
            Action::ToggleHelp => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn handle_upload_view_action(&mut self, action: Action) {
        let count = self.workspace.registry.count();
        match action {
            Action::ToggleView => self.toggle_view(),
            Action::MoveDown => {
                if self.file_cursor + 1 < count {
                    self.file_cursor += 1;
                }
            }
            Action::MoveUp => {
                self.file_cursor = self.file_cursor.saturating_sub(1);
            }
            Action::GoTop => {
                self.file_cursor = 0;
            }
            Action::GoBottom => {
                self.file_cursor = count.saturating_sub(1);
            }
            Action::AddFiles | Action::DrillIn => self.open_file_picker(),
            Action::ProcessFiles => self.dispatch(Command::ProcessFiles),
            Action::RemoveFile => {
                if let Some(id) = self.workspace.registry.ids().get(self.file_cursor).copied() {
                    self.dispatch(Command::RemoveFile(id));
                    self.clamp_file_cursor();
                }
            }
            Action::ClearFiles => {
                self.dispatch(Command::ClearFiles);
                self.file_cursor = 0;
            }
            Action::CopyReport => self.dispatch(Command::CopyReport),
            Action::DownloadReport => self.dispatch(Command::DownloadReport),
            Action::ToggleTheme => self.toggle_theme(),
            Action::ToggleHelp => {
                self.show_help = true;
            }
            _ => {}
        }
    }

    fn toggle_view(&mut self) {
        let next = self.workspace.session.active_view().toggle();
        self.dispatch(Command::ShowView(next));
    }

    fn open_file_picker(&mut self) {
        self.file_picker.refresh_entries();
        self.file_picker.selected.clear();
        self.screen = Screen::FilePicker;
    }
}

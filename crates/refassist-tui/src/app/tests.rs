use super::*;
use crate::action::Action;
use crate::tui_event::BackendEvent;

use refassist_core::collaborator::mock::{MockCollaborator, extracted, processed};
use refassist_core::prefs::THEME_KEY;
use refassist_core::{FileStatus, JobKind, MemoryClipboard, MemoryPreferenceStore, Tone, View};

/// Create a minimal App for testing (no backend, no terminal).
fn test_app() -> App {
    test_app_with_prefs(MemoryPreferenceStore::new())
}

fn test_app_with_prefs(prefs: MemoryPreferenceStore) -> App {
    App::new(Workspace::new(std::env::temp_dir()), Box::new(prefs))
}

fn type_text(app: &mut App, text: &str) {
    app.update(Action::StartEditing);
    for c in text.chars() {
        if c == '\n' {
            app.update(Action::InsertNewline);
        } else {
            app.update(Action::InsertChar(c));
        }
    }
    app.update(Action::NavigateBack);
}

/// Run every unsent job against `mock` and feed the completions back,
/// the way the backend listener does.
async fn run_jobs(app: &mut App, mock: &MockCollaborator) {
    while !app.unsent.is_empty() {
        let job = app.unsent.remove(0);
        let completion = job.execute(mock).await;
        app.handle_backend_event(BackendEvent::Completed(completion));
    }
}

// ── Editing ─────────────────────────────────────────────────────

#[test]
fn typing_fills_the_buffer_and_counter() {
    let mut app = test_app();
    type_text(&mut app, "A\n\nB\n  \nC");
    assert_eq!(app.workspace.session.reference_text(), "A\n\nB\n  \nC");
    assert_eq!(app.workspace.session.reference_count(), 3);
    assert_eq!(app.input_mode, InputMode::Normal);
}

#[test]
fn backspace_removes_last_char() {
    let mut app = test_app();
    type_text(&mut app, "ab");
    app.update(Action::StartEditing);
    app.update(Action::Backspace);
    assert_eq!(app.workspace.session.reference_text(), "a");
}

#[test]
fn paste_on_paste_tab_appends_normalized_text() {
    let mut app = test_app();
    app.update(Action::Paste("A\r\nB".into()));
    assert_eq!(app.workspace.session.reference_text(), "A\nB");
}

// ── Check ───────────────────────────────────────────────────────

#[test]
fn check_with_empty_buffer_queues_nothing() {
    let mut app = test_app();
    app.update(Action::Check);
    assert!(app.unsent.is_empty());
    assert_eq!(app.workspace.session.summary_text(), "No input");
}

#[tokio::test]
async fn check_round_trip_renders_report() {
    let mut app = test_app();
    type_text(&mut app, "A");
    app.update(Action::Check);
    assert_eq!(app.unsent.len(), 1);
    assert!(app.workspace.is_busy());

    let mock = MockCollaborator::new().on_process(Ok(processed(
        "R",
        0,
        "Total references processed: 1\nSuccessfully processed: 1\nErrors encountered: 0\nBODY",
    )));
    run_jobs(&mut app, &mock).await;

    assert_eq!(app.workspace.session.report_text(), "R");
    assert_eq!(app.workspace.session.preview_text(), "BODY");
    assert_eq!(app.workspace.session.summary_tone(), Tone::Good);
    assert!(!app.workspace.is_busy());
}

#[test]
fn check_shortcut_works_while_editing() {
    let mut app = test_app();
    app.update(Action::StartEditing);
    app.update(Action::InsertChar('A'));
    app.update(Action::Check);
    assert_eq!(app.unsent.len(), 1);
    assert_eq!(app.input_mode, InputMode::Editing);
}

#[test]
fn clear_shortcut_empties_everything() {
    let mut app = test_app();
    type_text(&mut app, "A");
    app.update(Action::Clear);
    assert_eq!(app.workspace.session.reference_text(), "");
    assert_eq!(app.workspace.session.summary_text(), "Cleared");
}

#[test]
fn crashed_check_leaves_an_error_summary() {
    let mut app = test_app();
    type_text(&mut app, "A");
    app.update(Action::Check);
    drop(app.unsent.remove(0));

    app.handle_backend_event(BackendEvent::Crashed {
        kind: JobKind::Check,
        run: Vec::new(),
    });

    assert_eq!(app.workspace.session.summary_text(), "Error occurred");
    assert!(
        app.workspace
            .session
            .report_text()
            .contains("The check task stopped unexpectedly")
    );
    assert!(!app.workspace.session.download_enabled());
    assert!(!app.workspace.is_busy());
}

#[test]
fn crashed_extract_marks_its_files_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.pdf");
    std::fs::write(&path, b"%PDF").unwrap();

    let mut app = test_app();
    app.add_paths(&[path]);
    app.update(Action::ToggleView);
    app.update(Action::ProcessFiles);
    let Job::Extract(job) = app.unsent.remove(0) else {
        panic!("expected extract job");
    };
    let run = job.run().to_vec();
    drop(job);

    app.handle_backend_event(BackendEvent::Crashed {
        kind: JobKind::Extract,
        run,
    });

    assert_eq!(
        app.workspace.registry.list().next().unwrap().status,
        FileStatus::Error
    );
    assert!(app.workspace.session.notices()[0]
        .message
        .ends_with("The extract task stopped unexpectedly"));
}

// ── Copy / download ─────────────────────────────────────────────

#[tokio::test]
async fn copy_uses_attached_clipboard() {
    let clipboard = MemoryClipboard::new();
    let mut app = App::new(
        Workspace::new(std::env::temp_dir()).with_clipboard(Box::new(clipboard.clone())),
        Box::new(MemoryPreferenceStore::new()),
    );
    type_text(&mut app, "A");
    app.update(Action::Check);
    let mock = MockCollaborator::new().on_process(Ok(processed("R", 0, "P")));
    run_jobs(&mut app, &mock).await;

    app.update(Action::CopyReport);
    assert_eq!(clipboard.contents().as_deref(), Some("R"));
}

#[tokio::test]
async fn download_writes_into_download_dir() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = App::new(
        Workspace::new(dir.path()),
        Box::new(MemoryPreferenceStore::new()),
    );
    type_text(&mut app, "A");
    app.update(Action::Check);
    let mock = MockCollaborator::new()
        .on_process(Ok(processed("R", 0, "P")))
        .on_download(Ok(b"zip".to_vec()));
    run_jobs(&mut app, &mock).await;

    app.update(Action::DownloadReport);
    assert!(app.workspace.controls.download.is_busy());
    run_jobs(&mut app, &mock).await;

    assert!(dir.path().join("refassist_report.zip").exists());
    assert!(!app.workspace.controls.download.is_busy());
}

// ── Tabs / upload ───────────────────────────────────────────────

#[test]
fn tab_switches_between_views() {
    let mut app = test_app();
    assert_eq!(app.workspace.session.active_view(), View::Paste);
    app.update(Action::ToggleView);
    assert_eq!(app.workspace.session.active_view(), View::Upload);
    app.update(Action::ToggleView);
    assert_eq!(app.workspace.session.active_view(), View::Paste);
}

#[test]
fn file_picker_selection_is_added_on_return() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.pdf"), b"%PDF").unwrap();
    std::fs::write(dir.path().join("notes.md"), b"# hi").unwrap();

    let mut app = test_app();
    app.update(Action::AddFiles);
    assert_eq!(app.screen, Screen::FilePicker);
    app.file_picker = FilePickerState::in_dir(dir.path());

    // Entries: "..", a.pdf, notes.md
    for name in ["a.pdf", "notes.md"] {
        let idx = app
            .file_picker
            .entries
            .iter()
            .position(|e| e.name == name)
            .unwrap();
        app.file_picker.cursor = idx;
        app.update(Action::ToggleSelect);
    }
    app.update(Action::NavigateBack);

    assert_eq!(app.screen, Screen::Main);
    assert_eq!(app.workspace.session.active_view(), View::Upload);
    assert_eq!(app.workspace.registry.count(), 1);
    let warning = &app.workspace.session.notices()[0];
    assert!(warning.message.contains("notes.md"));
}

#[test]
fn directories_cannot_be_selected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let mut picker = FilePickerState::in_dir(dir.path());
    picker.cursor = picker.entries.iter().position(|e| e.name == "sub").unwrap();
    picker.toggle_selected();
    assert!(picker.selected.is_empty());
    assert!(picker.enter_directory());
    assert!(picker.current_dir.ends_with("sub"));
}

#[test]
fn unreadable_path_raises_notice() {
    let mut app = test_app();
    app.add_paths(&[PathBuf::from("/definitely/not/here.pdf")]);
    assert!(app.workspace.registry.is_empty());
    assert!(app.workspace.session.notices()[0]
        .message
        .starts_with("Could not read"));
}

#[tokio::test]
async fn process_files_runs_extract_then_check() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("refs.bbl");
    std::fs::write(&path, b"\\bibitem{x}").unwrap();

    let mut app = test_app();
    app.add_paths(&[path]);
    app.update(Action::ToggleView);
    app.update(Action::ProcessFiles);
    assert_eq!(
        app.workspace.registry.list().next().unwrap().status,
        FileStatus::Processing
    );

    let mock = MockCollaborator::new()
        .on_extract(Ok(extracted("Ref one")))
        .on_process(Ok(processed("R", 1, "P")));
    run_jobs(&mut app, &mock).await;

    assert_eq!(mock.process_calls(), 1);
    assert_eq!(app.workspace.session.reference_text(), "Ref one");
    assert_eq!(app.workspace.session.active_view(), View::Paste);
    assert_eq!(app.workspace.session.summary_tone(), Tone::Bad);
    assert_eq!(
        app.workspace.registry.list().next().unwrap().status,
        FileStatus::Processed
    );
}

#[test]
fn remove_and_clear_files() {
    let dir = tempfile::tempdir().unwrap();
    let paths: Vec<_> = ["a.pdf", "b.pdf", "c.pdf"]
        .iter()
        .map(|n| {
            let p = dir.path().join(n);
            std::fs::write(&p, b"x").unwrap();
            p
        })
        .collect();

    let mut app = test_app();
    app.add_paths(&paths);
    app.update(Action::ToggleView);
    app.update(Action::GoBottom);
    app.update(Action::RemoveFile);
    assert_eq!(app.workspace.registry.count(), 2);
    assert_eq!(app.file_cursor, 1);

    app.update(Action::ClearFiles);
    assert!(app.workspace.registry.is_empty());
    assert_eq!(app.file_cursor, 0);
}

#[test]
fn pasted_paths_on_upload_tab_are_added() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paper.docx");
    std::fs::write(&path, b"PK").unwrap();

    let mut app = test_app();
    app.update(Action::ToggleView);
    app.update(Action::Paste(format!("'{}'\n", path.display())));
    assert_eq!(app.workspace.registry.count(), 1);
}

// ── Theme / modals ──────────────────────────────────────────────

#[test]
fn theme_toggle_is_persisted() {
    let prefs = MemoryPreferenceStore::new();
    let mut app = test_app_with_prefs(prefs.clone());
    assert_eq!(app.theme_pref, ThemePreference::Dark);

    app.update(Action::ToggleTheme);

    assert_eq!(app.theme_pref, ThemePreference::Light);
    assert_eq!(prefs.get(THEME_KEY).unwrap().as_deref(), Some("light"));
    let reopened = test_app_with_prefs(prefs);
    assert_eq!(reopened.theme_pref, ThemePreference::Light);
}

#[test]
fn quit_asks_for_confirmation() {
    let mut app = test_app();
    assert!(!app.update(Action::Quit));
    assert!(app.confirm_quit);
    app.update(Action::NavigateBack);
    assert!(!app.confirm_quit);
    app.update(Action::Quit);
    assert!(app.update(Action::Quit));
    assert!(app.should_quit);
}

#[test]
fn help_overlay_swallows_actions() {
    let mut app = test_app();
    app.update(Action::ToggleHelp);
    assert!(app.show_help);
    app.update(Action::ToggleView);
    assert_eq!(app.workspace.session.active_view(), View::Paste);
    app.update(Action::NavigateBack);
    assert!(!app.show_help);
}

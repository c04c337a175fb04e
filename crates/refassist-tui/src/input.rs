use ratatui::crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                match key.code {
                    // Ctrl+C always quits regardless of mode
                    KeyCode::Char('c') => return Action::Quit,
                    KeyCode::Enter => return Action::Check,
                    KeyCode::Char('k') => return Action::Clear,
                    _ => {}
                }
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::Editing => map_key_editing(key),
            }
        }
        Event::Paste(text) => Action::Paste(text.clone()),
        Event::Mouse(mouse) => map_mouse(mouse),
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_mouse(mouse: &MouseEvent) -> Action {
    match mouse.kind {
        MouseEventKind::ScrollDown => Action::MoveDown,
        MouseEventKind::ScrollUp => Action::MoveUp,
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageDown,
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::PageUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Action::GoTop,
        KeyCode::Char('G') | KeyCode::End => Action::GoBottom,
        KeyCode::Enter => Action::DrillIn,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Tab => Action::ToggleView,
        KeyCode::Char('i') | KeyCode::Char('e') => Action::StartEditing,
        KeyCode::Char('c') => Action::Check,
        KeyCode::Char('y') => Action::CopyReport,
        KeyCode::Char('d') => Action::DownloadReport,
        KeyCode::Char('o') | KeyCode::Char('a') => Action::AddFiles,
        KeyCode::Char(' ') => Action::ToggleSelect,
        KeyCode::Char('p') | KeyCode::Char('r') => Action::ProcessFiles,
        KeyCode::Char('x') | KeyCode::Delete => Action::RemoveFile,
        KeyCode::Char('X') => Action::ClearFiles,
        KeyCode::Char('t') => Action::ToggleTheme,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

fn map_key_editing(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Enter => Action::InsertNewline,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::InsertChar(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn shortcuts_work_in_both_modes() {
        for mode in [InputMode::Normal, InputMode::Editing] {
            assert_eq!(
                map_event(&key(KeyCode::Enter, KeyModifiers::CONTROL), &mode),
                Action::Check
            );
            assert_eq!(
                map_event(&key(KeyCode::Char('k'), KeyModifiers::CONTROL), &mode),
                Action::Clear
            );
            assert_eq!(
                map_event(&key(KeyCode::Char('c'), KeyModifiers::CONTROL), &mode),
                Action::Quit
            );
        }
    }

    #[test]
    fn editing_mode_captures_letters() {
        let q = key(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(map_event(&q, &InputMode::Editing), Action::InsertChar('q'));
        assert_eq!(map_event(&q, &InputMode::Normal), Action::Quit);
    }

    #[test]
    fn plain_enter_is_a_newline_while_editing() {
        let enter = key(KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(map_event(&enter, &InputMode::Editing), Action::InsertNewline);
        assert_eq!(map_event(&enter, &InputMode::Normal), Action::DrillIn);
    }

    #[test]
    fn bracketed_paste_is_forwarded() {
        let evt = Event::Paste("A\nB".into());
        assert_eq!(
            map_event(&evt, &InputMode::Normal),
            Action::Paste("A\nB".into())
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let evt = Event::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert_eq!(map_event(&evt, &InputMode::Normal), Action::None);
    }
}

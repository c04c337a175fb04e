pub mod file_picker;
pub mod help;
pub mod paste;
pub mod quit_confirm;
pub mod report;
pub mod upload;

use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use refassist_core::validation::extension_of;
use refassist_core::{NoticeKind, View};

use crate::app::{App, InputMode};

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// Icon for an upload by extension; unknown types get the generic page.
pub fn file_icon(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some(".docx") => "\u{1F4DD}",
        Some(".tex") | Some(".bbl") => "\u{1F4CB}",
        _ => "\u{1F4C4}",
    }
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

/// Render the main screen: tab bar, input panel, report panels, notices, footer.
pub fn render_main(f: &mut Frame, app: &App, area: Rect) {
    let notice_rows = app.workspace.session.notices().len().min(3) as u16;
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(8),
        Constraint::Length(notice_rows),
        Constraint::Length(1),
    ])
    .split(area);

    render_tabs(f, app, chunks[0]);

    let body = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(chunks[1]);
    match app.workspace.session.active_view() {
        View::Paste => paste::render_in(f, app, body[0]),
        View::Upload => upload::render_in(f, app, body[0]),
    }
    report::render_in(f, app, body[1]);

    render_notices(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);
}

fn render_tabs(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let active = app.workspace.session.active_view();
    let tab = |view: View| {
        let label = format!(" {} ", view.label());
        if view == active {
            Span::styled(label, theme.header_style())
        } else {
            Span::styled(label, Style::default().fg(theme.dim))
        }
    };
    let line = Line::from(vec![
        Span::styled(
            " RefAssist ",
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        ),
        tab(View::Paste),
        Span::raw(" "),
        tab(View::Upload),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

fn render_notices(f: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let theme = &app.theme;
    let lines: Vec<Line> = app
        .workspace
        .session
        .notices()
        .iter()
        .rev()
        .take(area.height as usize)
        .map(|n| {
            let (icon, color) = match n.kind {
                NoticeKind::Warning => ("\u{26A0} ", theme.warn),
                NoticeKind::Error => ("\u{2716} ", theme.bad),
            };
            Line::from(vec![
                Span::styled(format!(" {icon}"), Style::default().fg(color)),
                Span::styled(
                    truncate(&n.message, area.width.saturating_sub(4) as usize),
                    Style::default().fg(color),
                ),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let text = match (app.input_mode.clone(), app.workspace.session.active_view()) {
        (InputMode::Editing, _) => " Esc:stop editing  Ctrl+Enter:check  Ctrl+K:clear",
        (InputMode::Normal, View::Paste) => {
            " i:edit  c/Ctrl+Enter:check  Ctrl+K:clear  y:copy  d:download  Tab:upload  t:theme  ?:help  q:quit"
        }
        (InputMode::Normal, View::Upload) => {
            " o:add files  p:process  x:remove  X:clear files  Tab:paste  t:theme  ?:help  q:quit"
        }
    };
    let footer = Line::from(Span::styled(text, app.theme.footer_style()));
    f.render_widget(Paragraph::new(footer), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("héllo", 5), "héllo");
        assert_eq!(truncate("héllo world", 5), "héll\u{2026}");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn icons_follow_extension() {
        assert_eq!(file_icon("paper.DOCX"), "\u{1F4DD}");
        assert_eq!(file_icon("refs.bbl"), "\u{1F4CB}");
        assert_eq!(file_icon("paper.pdf"), "\u{1F4C4}");
        assert_eq!(file_icon("noext"), "\u{1F4C4}");
    }
}

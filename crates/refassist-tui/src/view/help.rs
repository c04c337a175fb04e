use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup = centered_rect(64, 32, area);

    let lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Check", theme),
        key_line("i / Enter", "Edit references (Esc to stop)", theme),
        key_line("Ctrl+Enter / c", "Check references", theme),
        key_line("Ctrl+K", "Clear text and report", theme),
        key_line("y", "Copy report to clipboard (OSC 52)", theme),
        key_line("d", "Download full report", theme),
        key_line("j / k", "Scroll report", theme),
        Line::from(""),
        section_header("Upload", theme),
        key_line("o / a", "Open file picker (add files)", theme),
        key_line("p", "Process all files", theme),
        key_line("x / Del", "Remove file under cursor", theme),
        key_line("X", "Remove all files", theme),
        key_line("paste", "Paste file paths to add them", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("Tab", "Switch Paste / Upload", theme),
        key_line("t", "Toggle light / dark theme", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q", "Quit", theme),
        key_line("Ctrl+c", "Force quit", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<16}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}

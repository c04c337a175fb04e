use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use refassist_core::check::{DOWNLOAD_BUSY_LABEL, DOWNLOAD_LABEL};

use crate::app::App;
use crate::view::spinner_char;

/// Render the summary line, the report text and the preview.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let session = &app.workspace.session;

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Percentage(55),
        Constraint::Min(4),
    ])
    .split(area);

    // Summary line with the progress indicator and the download control
    let mut spans = Vec::new();
    if app.workspace.is_busy() {
        spans.push(Span::styled(
            format!(" {} ", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        ));
    } else {
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        session.summary_text().to_string(),
        Style::default()
            .fg(theme.tone_color(session.summary_tone()))
            .add_modifier(Modifier::BOLD),
    ));
    let download = if app.workspace.controls.download.is_busy() {
        Span::styled(
            format!("   [d] {DOWNLOAD_BUSY_LABEL}"),
            Style::default().fg(theme.active),
        )
    } else if session.download_enabled() {
        Span::styled(
            format!("   [d] {DOWNLOAD_LABEL}"),
            Style::default().fg(theme.active),
        )
    } else {
        Span::styled(
            format!("   [d] {DOWNLOAD_LABEL}"),
            Style::default().fg(theme.dim),
        )
    };
    spans.push(download);
    f.render_widget(Paragraph::new(Line::from(spans)), chunks[0]);

    let report = Paragraph::new(session.report_text().to_string())
        .style(Style::default().fg(theme.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Report "),
        )
        .wrap(Wrap { trim: false })
        .scroll((app.report_scroll, 0));
    f.render_widget(report, chunks[1]);

    let preview = Paragraph::new(session.preview_text().to_string())
        .style(Style::default().fg(theme.dim))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.border_style())
                .title(" Preview "),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(preview, chunks[2]);
}

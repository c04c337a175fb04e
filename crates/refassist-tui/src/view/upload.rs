use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use refassist_core::{FileStatus, format_file_size};

use crate::app::App;
use crate::view::{file_icon, spinner_char, truncate};

/// Render the registry list and the process control.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let registry = &app.workspace.registry;

    let chunks = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(area);

    let name_width = chunks[0].width.saturating_sub(30) as usize;
    let items: Vec<ListItem> = registry
        .list()
        .map(|entry| {
            let status_label = if entry.status == FileStatus::Processing {
                format!("{} {}", spinner_char(app.tick), entry.status.label())
            } else {
                entry.status.label().to_string()
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", file_icon(&entry.file.name))),
                Span::styled(
                    format!("{:<width$}", truncate(&entry.file.name, name_width), width = name_width),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!(" {:>10} ", format_file_size(entry.file.size())),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(status_label, theme.file_status_style(entry.status)),
            ]))
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(" Files ")
        .title_bottom(Line::from(format!(" {} files ", registry.count())).right_aligned());

    if items.is_empty() {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No files yet. Press o to browse, or paste file paths.",
                Style::default().fg(theme.dim),
            )),
            Line::from(Span::styled(
                "  Supported: .docx, .pdf, .tex, .bbl, .txt",
                Style::default().fg(theme.dim),
            )),
        ])
        .block(block);
        f.render_widget(hint, chunks[0]);
    } else {
        let list = List::new(items)
            .block(block)
            .highlight_style(theme.highlight_style());
        let mut state = ListState::default();
        state.select(Some(app.file_cursor.min(registry.count().saturating_sub(1))));
        f.render_stateful_widget(list, chunks[0], &mut state);
    }

    // The process control is disabled with no files or while a run is in flight
    let extracting = app.workspace.controls.extract.is_busy();
    let control = if extracting {
        Span::styled(
            format!(" {} Extracting...", spinner_char(app.tick)),
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        )
    } else if registry.is_empty() {
        Span::styled(" [p] Process files", Style::default().fg(theme.dim))
    } else {
        Span::styled(
            " [p] Process files",
            Style::default()
                .fg(theme.active)
                .add_modifier(Modifier::BOLD),
        )
    };
    f.render_widget(Paragraph::new(Line::from(control)), chunks[1]);
}

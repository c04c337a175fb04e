use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{App, InputMode};

/// Render the reference text input with its live `N refs` counter.
pub fn render_in(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let session = &app.workspace.session;
    let editing = app.input_mode == InputMode::Editing;

    let text = session.reference_text();
    let mut lines: Vec<Line> = if text.is_empty() && !editing {
        vec![Line::from(Span::styled(
            "Paste references here, one per line (press i to type)",
            Style::default().fg(theme.dim),
        ))]
    } else {
        text.split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(theme.text))))
            .collect()
    };
    if editing {
        // Block cursor at the end of the buffer
        let cursor = Span::styled("\u{2588}", Style::default().fg(theme.active));
        match lines.last_mut() {
            Some(last) => last.spans.push(cursor),
            None => lines.push(Line::from(cursor)),
        }
    }

    // Keep the end of the buffer in view while typing
    let inner_height = area.height.saturating_sub(2) as usize;
    let scroll = if editing {
        lines.len().saturating_sub(inner_height) as u16
    } else {
        0
    };

    let border_style = if editing {
        theme.focused_border_style()
    } else {
        theme.border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" References ")
        .title_bottom(Line::from(format!(" {} refs ", session.reference_count())).right_aligned());

    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((scroll, 0));
    f.render_widget(paragraph.wrap(Wrap { trim: false }), area);
}

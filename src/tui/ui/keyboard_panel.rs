use ratatui::prelude::*;
use ratatui::widgets::*;

use keyview_core::view::{key_rows, KeyCap};

use crate::tui::app::App;
use crate::tui::theme::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    let shifted = app.snapshot.shift_held;

    let block = Block::default()
        .title(t.panel_title("KEYBOARD", shifted))
        .borders(Borders::ALL)
        .border_style(t.panel_border(shifted))
        .border_type(BorderType::Rounded);

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for (i, row) in key_rows(&app.snapshot).iter().enumerate() {
        if i > 0 {
            lines.push(Line::raw(""));
        }
        lines.push(Line::from(row_spans(row, app)));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

fn row_spans<'a>(row: &[KeyCap<'a>], app: &App) -> Vec<Span<'a>> {
    let t = theme();
    let mut spans = Vec::with_capacity(row.len() * 2);
    for cap in row {
        // Shift caps carry no shifted label, so their label is the key id
        let is_shift_key = app.settings.shift_keys().iter().any(|id| id == cap.label);
        spans.push(Span::styled(
            format!("[{}]", cap.label),
            t.key_cap(cap.shifted, is_shift_key),
        ));
        spans.push(Span::raw(" "));
    }
    spans
}

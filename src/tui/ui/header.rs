use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::theme::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    let held = app.snapshot.shift_held;

    let line = Line::from(vec![
        // App name
        Span::styled("keyview ", t.text_primary().add_modifier(Modifier::BOLD)),
        // Shift badge
        Span::styled(
            if held { "[SHIFT] " } else { "[shift] " },
            t.shift_badge(held),
        ),
        Span::raw(" "),
        Span::styled(format!("source: {}", app.source.label()), t.text_muted()),
        Span::styled(
            format!("  #{}", app.snapshot.sequence),
            t.text_muted(),
        ),
        Span::raw(" "),
        Span::styled("Ctrl+C:quit", t.key_hint()),
    ]);

    let header = Paragraph::new(line).alignment(Alignment::Left);

    frame.render_widget(header, area);
}

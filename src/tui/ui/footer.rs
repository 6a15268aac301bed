use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::tui::app::App;
use crate::tui::theme::theme;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();

    let status_style = if app.status.starts_with("Reload failed") {
        t.error()
    } else {
        t.status_message()
    };

    let mut line1 = vec![Span::styled(format!("Status: {}", app.status), status_style)];
    if !app.releases_reported && app.source == crate::tui::app::InputSource::Terminal {
        line1.push(Span::styled(
            "  (terminal reports no key releases, keys shown as taps)",
            t.text_muted(),
        ));
    }

    let line2 = Line::from(vec![
        Span::styled("Ctrl+C", t.key_hint()),
        Span::styled(":quit  ", t.text_muted()),
        Span::styled("Ctrl+R", t.key_hint()),
        Span::styled(":reload settings  ", t.text_muted()),
        Span::styled("Ctrl+Up/Down", t.key_hint()),
        Span::styled(":scroll log  ", t.text_muted()),
        Span::styled(
            format!("{} frames skipped", app.skipped_frames()),
            t.text_muted(),
        ),
    ]);

    let footer = Paragraph::new(vec![Line::from(line1), line2]);
    frame.render_widget(footer, area);
}

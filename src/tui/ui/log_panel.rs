use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::tui::app::App;
use crate::tui::theme::theme;

fn block(following: bool) -> Block<'static> {
    let t = theme();
    Block::default()
        .title(t.panel_title("EVENT LOG", following))
        .borders(Borders::ALL)
        .border_style(t.panel_border(following))
        .border_type(if following {
            BorderType::Thick
        } else {
            BorderType::Plain
        })
}

pub fn inner_height(area: Rect) -> usize {
    block(true).inner(area).height as usize
}

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let t = theme();
    let following = app.log_scroll.is_none();

    let block = block(following);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.snapshot.log().is_empty() {
        let empty = Paragraph::new(Line::styled(
            "No events yet. Press some keys.",
            t.text_muted(),
        ));
        frame.render_widget(empty, inner);
        return;
    }

    let lines: Vec<Line> = app
        .visible_log(inner.height as usize)
        .iter()
        .map(|entry| Line::styled(entry.clone(), t.log_entry(entry)))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

mod footer;
mod header;
mod keyboard_panel;
mod log_panel;

use ratatui::prelude::*;

use crate::tui::app::App;

/// Six key rows with blank lines between them, plus borders
const KEYBOARD_HEIGHT: u16 = 6 * 2 - 1 + 2;

fn layout(area: Rect) -> std::rc::Rc<[Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // Header with Shift badge
            Constraint::Length(KEYBOARD_HEIGHT), // Keyboard
            Constraint::Min(4),                  // Event log
            Constraint::Length(2),               // Footer
        ])
        .split(area)
}

pub fn draw_ui(frame: &mut Frame, app: &App) {
    let root = layout(frame.area());

    header::render(frame, app, root[0]);
    keyboard_panel::render(frame, app, root[1]);
    log_panel::render(frame, app, root[2]);
    footer::render(frame, app, root[3]);
}

/// Lines of log visible for a terminal of the given size
pub fn log_height(area: Rect) -> usize {
    log_panel::inner_height(layout(area)[2])
}

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode};

use keyview_core::InputEvent;

use crate::tui::app::{App, InputSource};

/// Handle a terminal key and return true if the app should quit.
///
/// Ctrl chords control the app and are never shown on the keyboard.
pub fn handle_input(app: &mut App, key: KeyEvent, log_height: usize) -> bool {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.kind != KeyEventKind::Release {
        match key.code {
            KeyCode::Char('c') => return true,
            KeyCode::Char('r') => {
                app.reload_layout();
                return false;
            }
            KeyCode::Up => {
                app.scroll_up(log_height);
                return false;
            }
            KeyCode::Down => {
                app.scroll_down(log_height);
                return false;
            }
            _ => {}
        }
    }

    if app.source == InputSource::Terminal {
        for input in terminal_events(app, &key) {
            app.publish(input);
        }
    }
    false
}

/// Translate one crossterm key event into down/up/press events
fn terminal_events(app: &mut App, key: &KeyEvent) -> Vec<InputEvent> {
    let mut out = Vec::new();
    let Some((id, typed)) = key_identity(key.code) else {
        return out;
    };

    if !matches!(key.code, KeyCode::Modifier(_)) {
        app.sync_terminal_shift(key.modifiers.contains(KeyModifiers::SHIFT));
    }

    match key.kind {
        KeyEventKind::Press | KeyEventKind::Repeat => {
            out.push(InputEvent::down(id.clone()));
            if let Some(ch) = typed {
                out.push(InputEvent::press(id.clone(), ch));
            }
            // Without release reporting every key is a tap
            if !app.releases_reported {
                out.push(InputEvent::up(id));
            }
        }
        KeyEventKind::Release => out.push(InputEvent::up(id)),
    }
    out
}

/// Key id and typed character for a crossterm key code
pub fn key_identity(code: KeyCode) -> Option<(String, Option<String>)> {
    let named = |id: &str| Some((id.to_string(), None));
    match code {
        KeyCode::Char(' ') => Some(("space".to_string(), Some(" ".to_string()))),
        KeyCode::Char(c) => Some((char_key_id(c), Some(c.to_string()))),
        KeyCode::Enter => named("enter"),
        KeyCode::Tab | KeyCode::BackTab => named("tab"),
        KeyCode::Backspace => named("backspace"),
        KeyCode::Esc => named("esc"),
        KeyCode::Up => named("up"),
        KeyCode::Down => named("down"),
        KeyCode::Left => named("left"),
        KeyCode::Right => named("right"),
        KeyCode::Home => named("home"),
        KeyCode::End => named("end"),
        KeyCode::PageUp => named("pgup"),
        KeyCode::PageDown => named("pgdn"),
        KeyCode::Insert => named("ins"),
        KeyCode::Delete => named("del"),
        KeyCode::F(n) => Some((format!("f{}", n), None)),
        KeyCode::CapsLock => named("caps"),
        KeyCode::ScrollLock => named("slock"),
        KeyCode::NumLock => named("num lock"),
        KeyCode::PrintScreen => named("pscr"),
        KeyCode::Pause => named("pause"),
        KeyCode::Menu => named("menu"),
        KeyCode::Modifier(m) => match m {
            ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift => {
                named(keyview_core::SHIFT_KEY_ID)
            }
            ModifierKeyCode::LeftControl | ModifierKeyCode::RightControl => named("ctrl"),
            ModifierKeyCode::LeftAlt | ModifierKeyCode::RightAlt => named("alt"),
            ModifierKeyCode::LeftSuper
            | ModifierKeyCode::RightSuper
            | ModifierKeyCode::LeftMeta
            | ModifierKeyCode::RightMeta => named("win"),
            _ => None,
        },
        _ => None,
    }
}

/// Physical key id for a typed character on a US layout
fn char_key_id(c: char) -> String {
    let base = match c {
        '!' => '1',
        '@' => '2',
        '#' => '3',
        '$' => '4',
        '%' => '5',
        '^' => '6',
        '&' => '7',
        '*' => '8',
        '(' => '9',
        ')' => '0',
        '_' => '-',
        '+' => '=',
        '{' => '[',
        '}' => ']',
        ':' => ';',
        '"' => '\'',
        '~' => '`',
        '|' => '\\',
        '<' => ',',
        '>' => '.',
        '?' => '/',
        other => other.to_ascii_lowercase(),
    };
    base.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;
    use keyview_core::Settings;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        }
    }

    fn app() -> App {
        App::new(Settings::new(), InputSource::Terminal).unwrap()
    }

    #[test]
    fn test_key_identity() {
        assert_eq!(
            key_identity(KeyCode::Char('A')),
            Some(("a".to_string(), Some("A".to_string())))
        );
        assert_eq!(
            key_identity(KeyCode::Char('!')),
            Some(("1".to_string(), Some("!".to_string())))
        );
        assert_eq!(key_identity(KeyCode::F(5)), Some(("f5".to_string(), None)));
        assert_eq!(
            key_identity(KeyCode::Modifier(ModifierKeyCode::RightShift)),
            Some(("shift".to_string(), None))
        );
        assert_eq!(key_identity(KeyCode::Null), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = app();
        let quit = handle_input(
            &mut app,
            key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press),
            10,
        );
        assert!(quit);
    }

    #[test]
    fn test_tap_without_release_reporting() {
        let mut app = app();
        handle_input(
            &mut app,
            key(KeyCode::Char('A'), KeyModifiers::SHIFT, KeyEventKind::Press),
            10,
        );
        app.tick();
        assert_eq!(
            app.snapshot.log(),
            &["shift key is down", "a key is down", "A is typed", "a key is up"]
        );
        assert!(app.snapshot.shift_held);
    }

    #[test]
    fn test_press_and_release_reported() {
        let mut app = app();
        app.releases_reported = true;
        let shift = KeyCode::Modifier(ModifierKeyCode::LeftShift);
        for (code, kind) in [
            (shift, KeyEventKind::Press),
            (KeyCode::Char('A'), KeyEventKind::Press),
            (KeyCode::Char('A'), KeyEventKind::Release),
            (shift, KeyEventKind::Release),
        ] {
            handle_input(&mut app, key(code, KeyModifiers::SHIFT, kind), 10);
        }
        app.tick();
        assert_eq!(
            app.snapshot.log(),
            &[
                "shift key is down",
                "a key is down",
                "A is typed",
                "a key is up",
                "shift key is up",
            ]
        );
        assert!(!app.snapshot.shift_held);
    }

    #[test]
    fn test_evdev_source_ignores_terminal_keys() {
        let mut app = App::new(Settings::new(), InputSource::Evdev).unwrap();
        handle_input(
            &mut app,
            key(KeyCode::Char('x'), KeyModifiers::NONE, KeyEventKind::Press),
            10,
        );
        app.tick();
        assert!(app.snapshot.log().is_empty());
    }
}

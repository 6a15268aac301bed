// Keyview Input Layer - Key Translation
// Raw evdev key codes to typed down/up/press events

use smallvec::SmallVec;

use crate::key::{InputEvent, SHIFT_KEY_ID};

/// EV_KEY value for a release
pub const KEY_RELEASE: i32 = 0;
/// EV_KEY value for a press
pub const KEY_PRESS: i32 = 1;
/// EV_KEY value for an auto-repeat
pub const KEY_REPEAT: i32 = 2;

const KEY_LEFTSHIFT: u16 = 42;
const KEY_RIGHTSHIFT: u16 = 54;
const KEY_CAPSLOCK: u16 = 58;

/// One EV_KEY event as read from a device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawKeyEvent {
    pub code: u16,
    pub value: i32,
}

impl RawKeyEvent {
    pub fn new(code: u16, value: i32) -> Self {
        Self { code, value }
    }
}

/// Canonical key id for a Linux key code (input-event-codes.h)
pub fn key_id(code: u16) -> Option<&'static str> {
    let id = match code {
        1 => "esc",
        2 => "1",
        3 => "2",
        4 => "3",
        5 => "4",
        6 => "5",
        7 => "6",
        8 => "7",
        9 => "8",
        10 => "9",
        11 => "0",
        12 => "-",
        13 => "=",
        14 => "backspace",
        15 => "tab",
        16 => "q",
        17 => "w",
        18 => "e",
        19 => "r",
        20 => "t",
        21 => "y",
        22 => "u",
        23 => "i",
        24 => "o",
        25 => "p",
        26 => "[",
        27 => "]",
        28 => "enter",
        29 | 97 => "ctrl",
        30 => "a",
        31 => "s",
        32 => "d",
        33 => "f",
        34 => "g",
        35 => "h",
        36 => "j",
        37 => "k",
        38 => "l",
        39 => ";",
        40 => "'",
        41 => "`",
        KEY_LEFTSHIFT | KEY_RIGHTSHIFT => SHIFT_KEY_ID,
        43 => "\\",
        44 => "z",
        45 => "x",
        46 => "c",
        47 => "v",
        48 => "b",
        49 => "n",
        50 => "m",
        51 => ",",
        52 => ".",
        53 => "/",
        55 => "num *",
        56 | 100 => "alt",
        57 => "space",
        KEY_CAPSLOCK => "caps",
        59 => "f1",
        60 => "f2",
        61 => "f3",
        62 => "f4",
        63 => "f5",
        64 => "f6",
        65 => "f7",
        66 => "f8",
        67 => "f9",
        68 => "f10",
        69 => "num lock",
        70 => "slock",
        71 => "num 7",
        72 => "num 8",
        73 => "num 9",
        74 => "num -",
        75 => "num 4",
        76 => "num 5",
        77 => "num 6",
        78 => "num +",
        79 => "num 1",
        80 => "num 2",
        81 => "num 3",
        82 => "num 0",
        83 => "num .",
        87 => "f11",
        88 => "f12",
        96 => "num enter",
        98 => "num /",
        99 => "pscr",
        102 => "home",
        103 => "up",
        104 => "pgup",
        105 => "left",
        106 => "right",
        107 => "end",
        108 => "down",
        109 => "pgdn",
        110 => "ins",
        111 => "del",
        119 => "pause",
        125 | 126 => "win",
        127 => "menu",
        _ => return None,
    };
    Some(id)
}

/// Character a key types on a US layout, `(plain, shifted)`
fn typed_chars(code: u16) -> Option<(&'static str, &'static str)> {
    let chars = match code {
        2 => ("1", "!"),
        3 => ("2", "@"),
        4 => ("3", "#"),
        5 => ("4", "$"),
        6 => ("5", "%"),
        7 => ("6", "^"),
        8 => ("7", "&"),
        9 => ("8", "*"),
        10 => ("9", "("),
        11 => ("0", ")"),
        12 => ("-", "_"),
        13 => ("=", "+"),
        26 => ("[", "{"),
        27 => ("]", "}"),
        39 => (";", ":"),
        40 => ("'", "\""),
        41 => ("`", "~"),
        43 => ("\\", "|"),
        51 => (",", "<"),
        52 => (".", ">"),
        53 => ("/", "?"),
        57 => (" ", " "),
        55 => ("*", "*"),
        74 => ("-", "-"),
        78 => ("+", "+"),
        98 => ("/", "/"),
        83 => (".", "."),
        71 => ("7", "7"),
        72 => ("8", "8"),
        73 => ("9", "9"),
        75 => ("4", "4"),
        76 => ("5", "5"),
        77 => ("6", "6"),
        79 => ("1", "1"),
        80 => ("2", "2"),
        81 => ("3", "3"),
        82 => ("0", "0"),
        _ => return None,
    };
    Some(chars)
}

fn is_letter(code: u16) -> bool {
    matches!(code, 16..=25 | 30..=38 | 44..=50)
}

/// Turns raw EV_KEY events into the three typed feeds.
///
/// A press becomes `down` followed by `press` when the key types a
/// character, an auto-repeat does the same again, a release becomes `up`.
/// Shift and Caps Lock are tracked here only to choose the typed character.
#[derive(Debug, Clone, Default)]
pub struct KeyTranslator {
    shifts_down: SmallVec<[u16; 2]>,
    caps_lock: bool,
}

impl KeyTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    fn shifted(&self) -> bool {
        !self.shifts_down.is_empty()
    }

    /// Character typed by `code` given the current Shift and Caps Lock state
    pub fn typed_char(&self, code: u16) -> Option<String> {
        if is_letter(code) {
            let id = key_id(code)?;
            let upper = self.shifted() != self.caps_lock;
            return Some(if upper {
                id.to_uppercase()
            } else {
                id.to_string()
            });
        }
        let (plain, shifted) = typed_chars(code)?;
        Some(if self.shifted() { shifted } else { plain }.to_string())
    }

    pub fn translate(&mut self, raw: RawKeyEvent) -> SmallVec<[InputEvent; 2]> {
        let mut out = SmallVec::new();
        let Some(id) = key_id(raw.code) else {
            log::trace!("ignoring unknown key code {}", raw.code);
            return out;
        };

        match raw.value {
            KEY_PRESS | KEY_REPEAT => {
                if raw.value == KEY_PRESS {
                    self.note_press(raw.code);
                }
                out.push(InputEvent::down(id));
                if let Some(ch) = self.typed_char(raw.code) {
                    out.push(InputEvent::press(id, ch));
                }
            }
            KEY_RELEASE => {
                self.shifts_down.retain(|c| *c != raw.code);
                out.push(InputEvent::up(id));
            }
            other => log::trace!("ignoring key value {} for code {}", other, raw.code),
        }
        out
    }

    fn note_press(&mut self, code: u16) {
        match code {
            KEY_LEFTSHIFT | KEY_RIGHTSHIFT if !self.shifts_down.contains(&code) => {
                self.shifts_down.push(code)
            }
            KEY_CAPSLOCK => self.caps_lock = !self.caps_lock,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(translator: &mut KeyTranslator, raw: &[(u16, i32)]) -> Vec<InputEvent> {
        raw.iter()
            .flat_map(|&(code, value)| translator.translate(RawKeyEvent::new(code, value)))
            .collect()
    }

    #[test]
    fn test_key_ids() {
        assert_eq!(key_id(30), Some("a"));
        assert_eq!(key_id(42), Some("shift"));
        assert_eq!(key_id(54), Some("shift"));
        assert_eq!(key_id(57), Some("space"));
        assert_eq!(key_id(0x2ff), None);
    }

    #[test]
    fn test_letter_tap() {
        let mut t = KeyTranslator::new();
        let events = run(&mut t, &[(30, KEY_PRESS), (30, KEY_RELEASE)]);
        assert_eq!(
            events,
            vec![
                InputEvent::down("a"),
                InputEvent::press("a", "a"),
                InputEvent::up("a"),
            ]
        );
    }

    #[test]
    fn test_shifted_letter_and_symbol() {
        let mut t = KeyTranslator::new();
        let events = run(
            &mut t,
            &[(42, KEY_PRESS), (30, KEY_PRESS), (2, KEY_PRESS), (42, KEY_RELEASE)],
        );
        assert_eq!(
            events,
            vec![
                InputEvent::down("shift"),
                InputEvent::down("a"),
                InputEvent::press("a", "A"),
                InputEvent::down("1"),
                InputEvent::press("1", "!"),
                InputEvent::up("shift"),
            ]
        );
    }

    #[test]
    fn test_both_shifts_held() {
        let mut t = KeyTranslator::new();
        run(&mut t, &[(42, KEY_PRESS), (54, KEY_PRESS), (42, KEY_RELEASE)]);
        assert_eq!(t.typed_char(30).as_deref(), Some("A"));
        run(&mut t, &[(54, KEY_RELEASE)]);
        assert_eq!(t.typed_char(30).as_deref(), Some("a"));
    }

    #[test]
    fn test_caps_lock_inverts_letters_only() {
        let mut t = KeyTranslator::new();
        run(&mut t, &[(58, KEY_PRESS), (58, KEY_RELEASE)]);
        assert_eq!(t.typed_char(30).as_deref(), Some("A"));
        assert_eq!(t.typed_char(2).as_deref(), Some("1"));
        run(&mut t, &[(42, KEY_PRESS)]);
        assert_eq!(t.typed_char(30).as_deref(), Some("a"));
    }

    #[test]
    fn test_repeat_emits_down_and_press() {
        let mut t = KeyTranslator::new();
        let events = run(&mut t, &[(30, KEY_PRESS), (30, KEY_REPEAT)]);
        assert_eq!(events.len(), 4);
        assert_eq!(events[2], InputEvent::down("a"));
        assert_eq!(events[3], InputEvent::press("a", "a"));
    }

    #[test]
    fn test_non_printing_key_has_no_press() {
        let mut t = KeyTranslator::new();
        let events = run(&mut t, &[(28, KEY_PRESS), (28, KEY_RELEASE)]);
        assert_eq!(events, vec![InputEvent::down("enter"), InputEvent::up("enter")]);
    }

    #[test]
    fn test_space_types_blank() {
        let mut t = KeyTranslator::new();
        let events = run(&mut t, &[(57, KEY_PRESS)]);
        assert_eq!(events[1], InputEvent::press("space", " "));
    }

    #[test]
    fn test_unknown_code_and_value_ignored() {
        let mut t = KeyTranslator::new();
        assert!(t.translate(RawKeyEvent::new(0x2ff, KEY_PRESS)).is_empty());
        assert!(t.translate(RawKeyEvent::new(30, 7)).is_empty());
    }
}

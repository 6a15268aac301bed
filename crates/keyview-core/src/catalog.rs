// Keyview Key Catalog
// Static description of a keyboard's physical layout

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

/// Errors that can occur when loading a custom layout
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Layout has no keys")]
    Empty,

    #[error("Row {0} has no keys")]
    EmptyRow(usize),
}

/// One physical key of the layout.
///
/// `alt_id`, when present, is the identity used for rendering; otherwise the
/// `base_id` is. `shifted_label` is what the key shows while Shift is held.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct KeyDescriptor {
    #[serde(rename = "name")]
    pub base_id: String,
    #[serde(rename = "shift", default)]
    pub shifted_label: Option<String>,
    #[serde(rename = "alt", default)]
    pub alt_id: Option<String>,
}

impl KeyDescriptor {
    pub fn new(base_id: &str, shifted_label: Option<&str>, alt_id: Option<&str>) -> Self {
        Self {
            base_id: base_id.to_string(),
            shifted_label: shifted_label.map(str::to_string),
            alt_id: alt_id.map(str::to_string),
        }
    }

    /// Rendering/identity key
    pub fn identity(&self) -> &str {
        self.alt_id.as_deref().unwrap_or(&self.base_id)
    }

    /// Label to show for the given Shift state
    pub fn label(&self, shift_held: bool) -> &str {
        if shift_held {
            self.shifted_label.as_deref().unwrap_or(&self.base_id)
        } else {
            &self.base_id
        }
    }
}

/// Read-only, cheaply clonable key layout.
///
/// Keys are kept in layout order; `row_lengths` splits that order into the
/// physical rows of the board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyCatalog {
    keys: Arc<[KeyDescriptor]>,
    row_lengths: Arc<[usize]>,
}

#[derive(Debug, Deserialize)]
struct LayoutToml {
    #[serde(default)]
    row: Vec<RowToml>,
}

#[derive(Debug, Deserialize)]
struct RowToml {
    #[serde(default)]
    keys: Vec<KeyDescriptor>,
}

impl KeyCatalog {
    /// Build a catalog from explicit rows
    pub fn from_rows(rows: Vec<Vec<KeyDescriptor>>) -> Result<Self, CatalogError> {
        let mut keys = Vec::new();
        let mut row_lengths = Vec::with_capacity(rows.len());
        for (index, row) in rows.into_iter().enumerate() {
            if row.is_empty() {
                return Err(CatalogError::EmptyRow(index + 1));
            }
            row_lengths.push(row.len());
            keys.extend(row);
        }
        if keys.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self {
            keys: keys.into(),
            row_lengths: row_lengths.into(),
        })
    }

    /// Load a custom layout from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml(&content)
    }

    /// Parse a custom layout:
    ///
    /// ```toml
    /// [[row]]
    /// keys = [{ name = "esc" }, { name = "1", shift = "!", alt = "one" }]
    /// ```
    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let layout: LayoutToml =
            toml::from_str(content).map_err(|e| CatalogError::TomlParse(e.to_string()))?;
        Self::from_rows(layout.row.into_iter().map(|r| r.keys).collect())
    }

    /// The full-size US layout
    pub fn standard() -> Self {
        let rows = STANDARD_LAYOUT
            .iter()
            .map(|row| {
                row.iter()
                    .map(|&(base, shifted, alt)| KeyDescriptor::new(base, shifted, alt))
                    .collect()
            })
            .collect();
        Self::from_rows(rows).expect("standard layout is non-empty")
    }

    pub fn keys(&self) -> &[KeyDescriptor] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Iterate the layout row by row
    pub fn rows(&self) -> impl Iterator<Item = &[KeyDescriptor]> + '_ {
        let mut start = 0;
        self.row_lengths.iter().map(move |&len| {
            let row = &self.keys[start..start + len];
            start += len;
            row
        })
    }

    /// First key whose identity matches
    pub fn find(&self, identity: &str) -> Option<&KeyDescriptor> {
        self.keys.iter().find(|k| k.identity() == identity)
    }
}

impl Default for KeyCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

type Entry = (&'static str, Option<&'static str>, Option<&'static str>);

const fn k(base: &'static str) -> Entry {
    (base, None, None)
}

const fn s(base: &'static str, shifted: &'static str) -> Entry {
    (base, Some(shifted), None)
}

const fn sa(base: &'static str, shifted: &'static str, alt: &'static str) -> Entry {
    (base, Some(shifted), Some(alt))
}

const fn a(base: &'static str, alt: &'static str) -> Entry {
    (base, None, Some(alt))
}

// Each row runs main block, navigation block, numpad.
const STANDARD_LAYOUT: &[&[Entry]] = &[
    &[
        k("esc"), k("f1"), k("f2"), k("f3"), k("f4"), k("f5"), k("f6"), k("f7"), k("f8"),
        k("f9"), k("f10"), k("f11"), k("f12"), k("pscr"), k("slock"), k("pause"),
    ],
    &[
        sa("`", "~", "tilde"), sa("1", "!", "one"), sa("2", "@", "two"),
        sa("3", "#", "three"), sa("4", "$", "four"), sa("5", "%", "five"),
        sa("6", "^", "six"), sa("7", "&", "seven"), sa("8", "*", "eight"),
        sa("9", "(", "nine"), sa("0", ")", "zero"), sa("-", "_", "hyphen"),
        sa("=", "+", "plus"), a("<-", "backspace"),
        k("pgup"), k("home"), k("ins"),
        k("num lock"), a("/", "num.backslash"), a("*", "num.star"), a("-", "minus"),
    ],
    &[
        k("tab"), s("q", "Q"), s("w", "W"), s("e", "E"), s("r", "R"), s("t", "T"),
        s("y", "Y"), s("u", "U"), s("i", "I"), s("o", "O"), s("p", "P"),
        sa("[", "{", "square.braces.open"), sa("]", "}", "square.braces.close"),
        sa("\\", "|", "slash"),
        k("pgdn"), k("end"), k("del"),
        a("7", "num.seven"), a("8", "num.eight"), a("9", "num.nine"),
    ],
    &[
        k("caps"), s("a", "A"), s("s", "S"), s("d", "D"), s("f", "F"), s("g", "G"),
        s("h", "H"), s("j", "J"), s("k", "K"), s("l", "L"),
        sa(";", ":", "colon"), sa("'", "\"", "quotes"), k("enter"),
        a("4", "num.four"), a("5", "num.five"), a("6", "num.six"), a("+", "num.plus"),
    ],
    &[
        k("shift"), s("z", "Z"), s("x", "X"), s("c", "C"), s("v", "V"), s("b", "B"),
        s("n", "N"), s("m", "M"), sa(",", "<", "comma"), sa(".", ">", "period"),
        sa("/", "?", "backslash"), a("shift", "right.shift"),
        a("^", "up.arrow"),
        a("1", "num.one"), a("2", "num.two"), a("3", "num.three"),
    ],
    &[
        k("ctrl"), k("win"), k("alt"), k("space"), a("ctrl", "right.ctrl"), k("win"), k("alt"),
        a("<", "left.arrow"), a("dn", "down.arrow"), a(">", "right.arrow"),
        a("0", "num.zero"), a(".", "num.period"), a("enter", "num.enter"),
    ],
];

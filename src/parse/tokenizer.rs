//! Zero-copy splitting of one physical line into fields.
//!
//! A line is never modified. Wherever a field boundary erases a byte (a
//! quote, the separator itself or whitespace before a separator) the byte is
//! marked in a per-line cut mask instead, and a field's text runs from its
//! start up to the first cut byte. Field views are plain byte ranges into
//! the owning [`LineBuffer`].

use std::sync::OnceLock;

use super::field::FromField;

/// The only recognised quote character.
pub const QUOTE: u8 = b'"';

/// Space and tab are skipped around fields unless they are the separator.
#[inline]
pub const fn is_skip_byte(c: u8, separator: u8) -> bool {
    c != separator && (c == b' ' || c == b'\t')
}

/// View of one field inside a tokenized line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// A separator directly followed the previous boundary.
    Empty,
    /// Byte range of the field text within the line.
    Span { start: usize, end: usize },
}

impl Field {
    /// Resolve the field against the line it was produced from.
    ///
    /// Returns `None` for the empty sentinel.
    #[inline]
    pub fn as_str(self, line: &str) -> Option<&str> {
        match self {
            Field::Empty => None,
            Field::Span { start, end } => Some(&line[start..end]),
        }
    }
}

/// Split `line` at every `separator` outside quotes.
///
/// A line containing N separators always yields N+1 fields. Quotes toggle
/// the quoted state and are dropped; leading space/tab of a field is skipped,
/// trailing space/tab is dropped only where the field is closed by a
/// separator.
pub fn tokenize(line: &str, separator: u8) -> Vec<Field> {
    let bytes = line.as_bytes();
    let len = bytes.len();
    let mut cut = vec![false; len];
    let mut starts: Vec<Option<usize>> = Vec::new();

    let mut start = 0;
    let mut inside_quote = false;

    for pos in 0..len {
        let c = bytes[pos];

        if is_skip_byte(c, separator) {
            if start == pos {
                start += 1;
            }
            continue;
        }

        if c == QUOTE {
            inside_quote = !inside_quote;
            cut[pos] = true;
            if start == pos {
                start += 1;
            }
        } else if !inside_quote && c == separator {
            if start < pos {
                cut[pos] = true;
                let mut p = pos;
                while p > 0 && is_skip_byte(bytes[p - 1], separator) {
                    cut[p - 1] = true;
                    p -= 1;
                }
                starts.push(Some(start));
            } else {
                starts.push(None);
            }
            start = pos + 1;
        }
    }
    // The last field has no closing separator and always exists.
    starts.push(Some(start));

    starts
        .into_iter()
        .map(|s| match s {
            None => Field::Empty,
            Some(start) => {
                let start = start.min(len);
                let end = cut[start..]
                    .iter()
                    .position(|&c| c)
                    .map_or(len, |offset| start + offset);
                Field::Span { start, end }
            }
        })
        .collect()
}

/// One physical line of a table together with its lazily computed fields.
#[derive(Debug, Default)]
pub struct LineBuffer {
    text: String,
    fields: OnceLock<Vec<Field>>,
}

impl LineBuffer {
    /// Wrap a line without tokenizing it.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            fields: OnceLock::new(),
        }
    }

    /// The raw line text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns true once the line has been tokenized.
    #[inline]
    pub fn processed(&self) -> bool {
        self.fields.get().is_some()
    }

    /// Tokenize the line on first use and return its fields.
    ///
    /// The first call fixes the fields; later calls return the cached split
    /// whatever separator they pass.
    pub fn tokenize(&self, separator: u8) -> &[Field] {
        self.fields.get_or_init(|| tokenize(&self.text, separator))
    }

    /// Number of fields, or 0 while the line is unprocessed.
    #[inline]
    pub fn len(&self) -> usize {
        self.fields.get().map_or(0, Vec::len)
    }

    /// Returns true if the line has no fields yet.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Field `index`; out of range (or unprocessed) reads as empty.
    #[inline]
    pub fn field(&self, index: usize) -> Field {
        self.fields
            .get()
            .and_then(|f| f.get(index).copied())
            .unwrap_or(Field::Empty)
    }

    /// Text of field `index`, `None` for empty fields.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.field(index).as_str(&self.text)
    }

    /// Convert field `index` into `out`. Empty fields leave `out` untouched.
    #[inline]
    pub fn get_as<T: FromField>(&self, index: usize, out: &mut T) {
        if let Some(text) = self.get(index) {
            *out = T::from_field(text);
        }
    }
}

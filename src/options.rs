use std::path::Path;

/// How the values of a table should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceType {
    /// Classify every column as numerical, categorical or color.
    #[default]
    Mixed,
    /// Load the whole table as a dense numeric matrix.
    Numerical,
    /// Never treat a column as numerical; only colors are told apart.
    Categorical,
}

impl SourceType {
    /// Returns true if columns go through the classifier.
    #[inline]
    pub fn is_classified(&self) -> bool {
        !matches!(self, SourceType::Numerical)
    }
}

/// Element type of every numeric buffer produced by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageType {
    /// 32-bit IEEE float.
    #[default]
    Float32,
    /// 16-bit brain float (upper half of an `f32`).
    BFloat16,
}

/// Default field separator.
pub const DEFAULT_SEPARATOR: u8 = b',';

/// Pick the separator for a path: `.tsv` files are always tab separated.
pub fn separator_for_path(path: &Path, configured: u8) -> u8 {
    let is_tsv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("tsv"));
    if is_tsv { b'\t' } else { configured }
}

/// Check that a byte can be used as field separator.
///
/// Returns a description of the problem for unusable separators.
pub fn validate_separator(separator: u8) -> Option<String> {
    match separator {
        b'"' => Some("the quote character cannot be used as separator".to_string()),
        b'\n' | b'\r' => Some("line breaks cannot be used as separator".to_string()),
        0 => Some("NUL cannot be used as separator".to_string()),
        s if !s.is_ascii() => Some(format!("separator 0x{s:02x} is not ASCII")),
        _ => None,
    }
}

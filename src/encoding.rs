//! Input decoding: every table is handled as UTF-8 text internally.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use simdutf8::basic::from_utf8;

/// Check if the given bytes are valid UTF-8.
pub fn is_utf8(data: &[u8]) -> bool {
    from_utf8(data).is_ok()
}

/// Check if the data starts with a UTF-8 BOM (EF BB BF).
pub fn has_utf8_bom(data: &[u8]) -> bool {
    data.starts_with(&[0xEF, 0xBB, 0xBF])
}

/// Skip the UTF-8 BOM if present and return the remaining data.
pub fn skip_bom(data: &[u8]) -> &[u8] {
    if has_utf8_bom(data) { &data[3..] } else { data }
}

/// Decode raw file contents into text.
///
/// UTF-8 input (with or without BOM) is borrowed. UTF-16 input with a BOM
/// and legacy single/multi-byte encodings guessed by chardetng are
/// transcoded. Returns the text and whether transcoding happened.
pub fn decode_text(data: &[u8]) -> (Cow<'_, str>, bool) {
    if data.starts_with(&[0xFF, 0xFE]) {
        let (decoded, _, _) = encoding_rs::UTF_16LE.decode(data);
        return (Cow::Owned(decoded.into_owned()), true);
    }
    if data.starts_with(&[0xFE, 0xFF]) {
        let (decoded, _, _) = encoding_rs::UTF_16BE.decode(data);
        return (Cow::Owned(decoded.into_owned()), true);
    }

    let data = skip_bom(data);
    if let Ok(text) = from_utf8(data) {
        return (Cow::Borrowed(text), false);
    }

    let mut detector = EncodingDetector::new();
    detector.feed(data, true);
    let encoding = detector.guess(None, true);

    if encoding == encoding_rs::UTF_8 {
        // Mostly UTF-8 with a few broken sequences.
        return (String::from_utf8_lossy(data), false);
    }

    log::debug!("transcoding input from {}", encoding.name());
    let (decoded, _, _) = encoding.decode(data);
    (Cow::Owned(decoded.into_owned()), true)
}

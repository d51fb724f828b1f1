//! Byte-level classification for the ISO-8859-1 alphabet.
//!
//! Words are stored as raw Latin-1 bytes. Letters are `[A-Za-z]` plus the
//! accented ranges `À-Ö Ø-Þ à-ö ø-þ`; `×` (0xD7), `÷` (0xF7), `ß` (0xDF) and
//! `ÿ` (0xFF) are not letters.

pub fn is_upper(b: u8) -> bool {
    b.is_ascii_uppercase() || (0xC0..=0xD6).contains(&b) || (0xD8..=0xDE).contains(&b)
}

pub fn is_lower(b: u8) -> bool {
    b.is_ascii_lowercase() || (0xE0..=0xF6).contains(&b) || (0xF8..=0xFE).contains(&b)
}

pub fn is_alpha(b: u8) -> bool {
    is_upper(b) || is_lower(b)
}

/// Uppercase letters map to their lowercase counterpart 0x20 higher;
/// everything else passes through.
pub fn to_lower(b: u8) -> u8 {
    if is_upper(b) {
        b + (b'a' - b'A')
    } else {
        b
    }
}

pub fn fold_lowercase(bytes: &mut [u8]) {
    for b in bytes.iter_mut() {
        *b = to_lower(*b);
    }
}

/// Convert UTF-8 text to Latin-1 bytes. Returns `None` if any char lies
/// outside U+0000..U+00FF.
pub fn encode(s: &str) -> Option<Vec<u8>> {
    s.chars().map(|c| u8::try_from(u32::from(c)).ok()).collect()
}

/// Like [`encode`], but chars outside Latin-1 become spaces, which the
/// word tokenizer treats as separators.
pub fn encode_lossy(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b' '))
        .collect()
}

/// Latin-1 code points coincide with the first 256 Unicode scalars.
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

//! Fixed-width base-36 encoding of text for URL path segments.
//!
//! Every character is written as its code point in base 36, left-padded to four
//! digits. The largest Unicode scalar value (`0x10FFFF`) is below `36^4`, so any
//! Rust string encodes without loss.
//!
//! ```
//! use openfrogans::codec::{decode, encode};
//!
//! assert_eq!(encode("AB"), "001t001u");
//! assert_eq!(decode("001t001u").unwrap(), "AB");
//! ```

use crate::error::{FormatError, FormatResult};

/// Width in digits of one encoded character.
pub const CHUNK_WIDTH: usize = 4;

const RADIX: u32 = 36;

/// Encodes text as concatenated 4-digit base-36 code points.
///
/// Empty text still yields `"0000"`.
///
/// Characters outside the Basic Multilingual Plane produce one chunk for the
/// whole scalar value, not one per UTF-16 surrogate: U+1F600 is `"2r5s"`, where
/// a UTF-16 based encoder would emit `"16pp17uo"`. Servers keyed on the UTF-16
/// form will not match such identifiers.
pub fn encode(text: &str) -> String {
    let mut out = String::with_capacity(text.chars().count().max(1) * CHUNK_WIDTH);
    for ch in text.chars() {
        push_chunk(&mut out, ch as u32);
    }
    if out.is_empty() {
        out.push_str("0000");
    }
    out
}

/// Decodes a string produced by [`encode`].
///
/// # Errors
///
/// Returns a [`FormatError`] if the length is not a positive multiple of 4, a chunk
/// holds a non-base-36 character, or a chunk is not a valid code point.
pub fn decode(code: &str) -> FormatResult<String> {
    if code.is_empty() || code.len() % CHUNK_WIDTH != 0 {
        return Err(FormatError::InvalidCodeLength { length: code.len() });
    }

    let mut out = String::with_capacity(code.len() / CHUNK_WIDTH);
    for chunk in code.as_bytes().chunks(CHUNK_WIDTH) {
        let value = parse_chunk(chunk)?;
        let ch = char::from_u32(value).ok_or_else(|| FormatError::InvalidCodePoint {
            chunk: String::from_utf8_lossy(chunk).into_owned(),
            value,
        })?;
        out.push(ch);
    }
    Ok(out)
}

fn push_chunk(out: &mut String, mut value: u32) {
    let mut digits = ['0'; CHUNK_WIDTH];
    for slot in digits.iter_mut().rev() {
        // Values never exceed 0x10FFFF, which fits in four digits.
        *slot = char::from_digit(value % RADIX, RADIX).unwrap_or('0');
        value /= RADIX;
    }
    out.extend(digits);
}

fn parse_chunk(chunk: &[u8]) -> FormatResult<u32> {
    let invalid = || FormatError::InvalidCodeChunk {
        chunk: String::from_utf8_lossy(chunk).into_owned(),
    };

    chunk.iter().try_fold(0u32, |acc, &byte| {
        let digit = (byte as char).to_digit(RADIX).ok_or_else(invalid)?;
        Ok(acc * RADIX + digit)
    })
}

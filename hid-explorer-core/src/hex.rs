//! Hex text codec for raw report payloads
//!
//! Operators type reports as loose hex text (`01 ff 00`, `0x01,0xFF`, `01FF00`).
//! Decoding keeps only hex digits; encoding always produces the canonical
//! form: uppercase byte pairs separated by single spaces.

use crate::error::ExplorerError;

/// Zero-padded uppercase hex, keeping the low `width` digits of `value`
pub fn hex(value: u64, width: usize) -> String {
    let text = format!("{value:0width$X}");
    text[text.len() - width..].to_string()
}

/// Two-digit hex for byte-sized values (report IDs, payload bytes)
#[inline]
pub fn hex8(value: u8) -> String {
    hex(u64::from(value), 2)
}

/// Four-digit hex for 16-bit values (vendor/product IDs, usages)
#[inline]
pub fn hex16(value: u16) -> String {
    hex(u64::from(value), 4)
}

/// Decode operator hex text into bytes
///
/// Every character that is not a hex digit is dropped. A `0x`/`0X` that
/// opens a token is treated as a radix prefix and dropped with it, so
/// `0x4A` decodes to a single byte. The remaining digits are paired up in
/// order; an odd digit count fails with [`ExplorerError::MalformedHexInput`].
pub fn decode(text: &str) -> Result<Vec<u8>, ExplorerError> {
    let mut digits: Vec<u8> = Vec::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut token_start = true;

    while let Some(c) = chars.next() {
        if c == '0' && token_start && matches!(chars.peek(), Some('x' | 'X')) {
            chars.next();
            token_start = false;
            continue;
        }
        match c.to_digit(16) {
            Some(d) => {
                digits.push(d as u8);
                token_start = false;
            }
            None => token_start = true,
        }
    }

    if digits.len() % 2 != 0 {
        return Err(ExplorerError::MalformedHexInput {
            digits: digits.len(),
        });
    }

    Ok(digits
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

/// Encode bytes as uppercase pairs joined by single spaces
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push_str(&hex8(*byte));
    }
    out
}

//! Base62 encoding used by every generated short code.
//!
//! The alphabet is ordered `0-9A-Za-z`, so encoded integers sort the same way
//! as their numeric values when they have equal length.

/// The 62-character alphabet short codes are drawn from.
pub const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Number of symbols in [`ALPHABET`].
pub const BASE: u64 = 62;

/// Returns `true` if `c` belongs to [`ALPHABET`].
pub fn is_base62(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

/// Encodes `value` as base62 without any padding.
///
/// `0` encodes to `"0"`.
pub fn encode_u64(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut buf = Vec::with_capacity(11);
    while value > 0 {
        buf.push(ALPHABET[(value % BASE) as usize]);
        value /= BASE;
    }
    buf.reverse();

    // every byte comes from ALPHABET, which is ASCII
    buf.into_iter().map(char::from).collect()
}

/// Encodes `value` as base62, left-padding with `'0'` up to `width` characters.
///
/// Values that need more than `width` characters are returned unpadded.
pub fn encode_u64_padded(value: u64, width: usize) -> String {
    let encoded = encode_u64(value);
    if encoded.len() >= width {
        return encoded;
    }
    let mut padded = "0".repeat(width - encoded.len());
    padded.push_str(&encoded);
    padded
}

/// Decodes a base62 string back into an integer.
///
/// Returns `None` for empty input, characters outside the alphabet, or values
/// that overflow a `u64`.
pub fn decode_u64(encoded: &str) -> Option<u64> {
    if encoded.is_empty() {
        return None;
    }

    encoded.bytes().try_fold(0_u64, |acc, b| {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'A'..=b'Z' => b - b'A' + 10,
            b'a'..=b'z' => b - b'a' + 36,
            _ => return None,
        };
        acc.checked_mul(BASE)?.checked_add(u64::from(digit))
    })
}

//! Conversions between printable text and the symbol indices used internally.
//!
//! Plaintext symbols are indices into [`PLAIN_ALPHABET`] (0..36) and cipher
//! symbols are indices into [`CIPHER_ALPHABET`] (0..6).

use crate::consts::{CIPHER_ALPHABET, CIPHER_SYMBOLS, PLAIN_ALPHABET, PLAIN_SYMBOLS};
use crate::error::{invalid_input, AdfgvxResult};

/// Index of a plaintext byte, case-insensitive. `None` for anything outside A-Z0-9.
#[inline]
pub fn plain_index(b: u8) -> Option<u8> {
    match b.to_ascii_uppercase() {
        c @ b'A'..=b'Z' => Some(c - b'A'),
        c @ b'0'..=b'9' => Some(c - b'0' + 26),
        _ => None,
    }
}

/// Index of a cipher byte, case-insensitive. `None` for anything outside ADFGVX.
#[inline]
pub fn cipher_index(b: u8) -> Option<u8> {
    let upper = b.to_ascii_uppercase();
    CIPHER_ALPHABET
        .iter()
        .position(|&c| c == upper)
        .map(|p| p as u8)
}

/// Uppercases the text and drops everything outside the plaintext alphabet.
pub fn normalize(text: &str) -> String {
    text.bytes()
        .filter_map(plain_index)
        .map(|i| PLAIN_ALPHABET[i as usize] as char)
        .collect()
}

/// Lenient conversion: symbol indices of every plaintext byte, the rest dropped.
pub fn plain_symbols(text: &str) -> Vec<u8> {
    text.bytes().filter_map(plain_index).collect()
}

/// Strict conversion of plaintext into symbol indices.
pub fn encode_plain(text: &str) -> AdfgvxResult<Vec<u8>> {
    text.bytes()
        .enumerate()
        .map(|(pos, b)| {
            plain_index(b).ok_or_else(|| {
                invalid_input!("'{}' at offset {} is not a plaintext symbol", b as char, pos)
            })
        })
        .collect()
}

/// Strict conversion of ciphertext into coordinate indices. Whitespace is ignored.
pub fn encode_cipher(text: &str) -> AdfgvxResult<Vec<u8>> {
    text.bytes()
        .enumerate()
        .filter(|(_, b)| !b.is_ascii_whitespace())
        .map(|(pos, b)| {
            cipher_index(b).ok_or_else(|| {
                invalid_input!("'{}' at offset {} is not an ADFGVX symbol", b as char, pos)
            })
        })
        .collect()
}

pub fn decode_plain(symbols: &[u8]) -> String {
    symbols
        .iter()
        .map(|&s| PLAIN_ALPHABET[s as usize % PLAIN_SYMBOLS] as char)
        .collect()
}

pub fn decode_cipher(symbols: &[u8]) -> String {
    symbols
        .iter()
        .map(|&s| CIPHER_ALPHABET[s as usize % CIPHER_SYMBOLS] as char)
        .collect()
}

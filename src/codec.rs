//! Reversible text codec for the redirect state parameter
//!
//! Packs arbitrary Unicode text into a printable ASCII representation using a
//! 64-symbol alphabet with 3-bytes-to-4-symbols grouping and `=` padding.
//!
//! The decoder is deliberately lax, and that laxness is documented contract
//! rather than an oversight: characters outside the alphabet are stripped
//! before decoding, a truncated final quantum is read as if the missing
//! symbols were the first alphabet entry, and byte sequences that are not
//! valid UTF-8 are reassembled with replacement characters. `decode` never
//! fails; on malformed input it produces best-effort, possibly-garbage
//! output. The one invariant callers may rely on is
//! `decode(encode(x)) == x` for every `x`.

use once_cell::sync::Lazy;

/// 64 data symbols plus `=` as the padding symbol (index 64)
const ALPHABET: &[u8; 65] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";

/// Padding symbol index
const PAD: u8 = 64;

/// Marker for bytes outside the alphabet
const FOREIGN: u8 = 0xff;

/// Byte-to-symbol-index lookup table
static SYMBOL_INDEX: Lazy<[u8; 256]> = Lazy::new(|| {
    let mut table = [FOREIGN; 256];
    for (index, &byte) in ALPHABET.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)] // 65 entries
        {
            table[byte as usize] = index as u8;
        }
    }
    table
});

/// Encode text into its ASCII-safe representation
///
/// Works over the UTF-8 byte sequence of `text`, three input bytes per four
/// output symbols, padding the final short group with `=`. Never fails;
/// `encode("")` is the empty string.
#[must_use]
pub fn encode(text: &str) -> String {
    let bytes = text.as_bytes();
    let mut output = String::with_capacity(bytes.len().div_ceil(3) * 4);

    for chunk in bytes.chunks(3) {
        let quad = match *chunk {
            [b0] => [b0 >> 2, (b0 & 0x03) << 4, PAD, PAD],
            [b0, b1] => [
                b0 >> 2,
                ((b0 & 0x03) << 4) | (b1 >> 4),
                (b1 & 0x0f) << 2,
                PAD,
            ],
            [b0, b1, b2] => [
                b0 >> 2,
                ((b0 & 0x03) << 4) | (b1 >> 4),
                ((b1 & 0x0f) << 2) | (b2 >> 6),
                b2 & 0x3f,
            ],
            _ => unreachable!("chunks(3) yields 1 to 3 bytes"),
        };
        for symbol in quad {
            output.push(ALPHABET[symbol as usize] as char);
        }
    }

    output
}

/// Decode an ASCII-safe representation back into text
///
/// Strips every character outside the alphabet, then inverts the grouping.
/// Symbols missing from a truncated final quantum are read as index 0, and
/// invalid UTF-8 in the reconstructed bytes is replaced rather than rejected,
/// so malformed input yields best-effort output instead of an error.
/// `decode("")` is the empty string.
#[must_use]
#[allow(clippy::cast_possible_truncation)] // symbol arithmetic is masked back into byte range
pub fn decode(code: &str) -> String {
    let symbols: Vec<u8> = code
        .bytes()
        .map(|b| SYMBOL_INDEX[b as usize])
        .filter(|&s| s != FOREIGN)
        .collect();

    let mut bytes = Vec::with_capacity(symbols.len() / 4 * 3 + 3);
    let mut i = 0;
    while i < symbols.len() {
        let e1 = symbols.get(i).copied().unwrap_or(0);
        let e2 = symbols.get(i + 1).copied().unwrap_or(0);
        let e3 = symbols.get(i + 2).copied().unwrap_or(0);
        let e4 = symbols.get(i + 3).copied().unwrap_or(0);
        i += 4;

        // A leading padding symbol makes e1 << 2 exceed one byte; truncate
        // rather than reject.
        bytes.push(((u16::from(e1) << 2) | u16::from(e2 >> 4)) as u8);
        if e3 != PAD {
            bytes.push(((e2 & 0x0f) << 4) | (e3 >> 2));
        }
        if e4 != PAD {
            bytes.push(((e3 & 0x03) << 6) | e4);
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}

//! Email header decoding.
//!
//! Turns a raw, possibly RFC 2047 encoded header value into a readable
//! string for display and pattern matching. The decode path is a plain
//! ordered cascade rather than exception-driven control flow: try the
//! declared charset, fall through to permissive UTF-8 with replacement
//! characters. It never fails.
//!
//! Deliberate quirk, kept for output compatibility: only the *first
//! fragment* of the header is returned. A header with no encoded word
//! passes through whole; a header that starts with an encoded word yields
//! just that word decoded; a header with plain text before the first
//! encoded word yields only that leading text. Multi-fragment headers are
//! not reassembled.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use charset::Charset;
use once_cell::sync::Lazy;
use regex::Regex;

/// An RFC 2047 encoded word: `=?charset?B|Q?payload?=`.
static ENCODED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"=\?([^?\s]+)\?([bBqQ])\?([^?\s]*)\?=").expect("valid regex"));

/// Decode a raw header value into readable text. Absent headers decode to
/// the empty string, never an error.
pub fn decode_header_value(raw: Option<&str>) -> String {
    let raw = match raw {
        Some(r) => r.trim(),
        None => return String::new(),
    };

    let caps = match ENCODED_WORD.captures(raw) {
        Some(c) => c,
        None => return raw.to_string(),
    };

    // First fragment only: plain text before the encoded word wins.
    let whole = caps.get(0).expect("capture 0 always present");
    let prefix = raw[..whole.start()].trim();
    if !prefix.is_empty() {
        return prefix.to_string();
    }

    // Language tags (`utf-8*en`) are allowed after the charset label.
    let label = caps[1].split('*').next().unwrap_or("").to_string();
    let payload = &caps[3];
    let bytes = match &caps[2] {
        "b" | "B" => BASE64
            .decode(payload)
            .unwrap_or_else(|_| payload.as_bytes().to_vec()),
        _ => q_decode(payload),
    };
    decode_with_charset(&bytes, Some(&label))
}

/// Decode bytes using a declared charset label, substituting replacement
/// characters for undecodable sequences. The `unknown` / `unknown-8bit`
/// sentinels and any unrecognized label fall back to permissive UTF-8;
/// a missing label defaults to UTF-8. Total function.
pub fn decode_with_charset(bytes: &[u8], label: Option<&str>) -> String {
    let label = label.unwrap_or("utf-8").trim();
    if label.is_empty()
        || label.eq_ignore_ascii_case("unknown")
        || label.eq_ignore_ascii_case("unknown-8bit")
    {
        return String::from_utf8_lossy(bytes).into_owned();
    }
    match Charset::for_label(label.as_bytes()) {
        Some(cs) => cs.decode(bytes).0.into_owned(),
        None => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// RFC 2047 Q-encoding: `_` is a space, `=XX` is a hex-encoded byte,
/// everything else is taken literally. Malformed escapes pass through.
fn q_decode(payload: &str) -> Vec<u8> {
    let bytes = payload.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'_' => {
                out.push(b' ');
                i += 1;
            }
            b'=' if i + 2 < bytes.len() => {
                match (hex_val(bytes[i + 1]), hex_val(bytes[i + 2])) {
                    (Some(hi), Some(lo)) => {
                        out.push(hi << 4 | lo);
                        i += 3;
                    }
                    _ => {
                        out.push(b'=');
                        i += 1;
                    }
                }
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    out
}

fn hex_val(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

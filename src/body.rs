//! Message body resolution.
//!
//! Walks a parsed message (flat or multipart) and produces a single
//! decoded text blob representing the readable body. Multipart messages
//! contribute every `text/plain` and `text/html` part in document order;
//! HTML is kept verbatim so markup-embedded URLs stay extractable.
//!
//! Failures stay part-local. Each part decodes to a `PartOutcome` rather
//! than an error crossing the component boundary: a part whose payload
//! cannot be recovered is skipped with a reason and the remaining parts
//! still contribute. Resolution itself never fails; a fully malformed
//! body is just an empty string.

use mailparse::ParsedMail;

use crate::headers::decode_with_charset;

/// Result of decoding one content part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartOutcome {
    /// Decoded readable text (possibly with replacement characters).
    Text(String),
    /// The part contributed nothing; the reason is diagnostic only.
    Skipped { reason: String },
}

/// Decode a single part's payload using its declared charset. The
/// `unknown` / `unknown-8bit` sentinels and a missing declaration both
/// fall back to UTF-8; undecodable bytes become replacement characters.
/// Only an unrecoverable payload (broken transfer encoding) skips the part.
pub fn decode_part(part: &ParsedMail) -> PartOutcome {
    match part.get_body_raw() {
        Ok(payload) => {
            let label = normalize_charset(&part.ctype.charset);
            PartOutcome::Text(decode_with_charset(&payload, Some(&label)))
        }
        Err(e) => PartOutcome::Skipped {
            reason: e.to_string(),
        },
    }
}

/// Resolve the readable body of a message into one text blob.
pub fn resolve_body(msg: &ParsedMail) -> String {
    if msg.subparts.is_empty() {
        // Single-part message: decode the payload directly, whatever its type.
        return match decode_part(msg) {
            PartOutcome::Text(text) => text,
            PartOutcome::Skipped { reason } => {
                eprintln!("Error decoding body: {reason}");
                String::new()
            }
        };
    }

    let mut acc = String::new();
    collect_text_parts(msg, &mut acc);
    acc
}

/// Depth-first traversal appending every text/plain and text/html leaf.
fn collect_text_parts(part: &ParsedMail, acc: &mut String) {
    for sub in &part.subparts {
        if !sub.subparts.is_empty() {
            collect_text_parts(sub, acc);
            continue;
        }
        let mimetype = sub.ctype.mimetype.as_str();
        if mimetype != "text/plain" && mimetype != "text/html" {
            continue;
        }
        match decode_part(sub) {
            PartOutcome::Text(text) => acc.push_str(&text),
            PartOutcome::Skipped { reason } => {
                eprintln!("Error decoding part: {reason}");
            }
        }
    }
}

fn normalize_charset(declared: &str) -> String {
    let declared = declared.trim();
    if declared.is_empty()
        || declared.eq_ignore_ascii_case("unknown")
        || declared.eq_ignore_ascii_case("unknown-8bit")
    {
        "utf-8".to_string()
    } else {
        declared.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailparse::parse_mail;

    fn parse(raw: &str) -> ParsedMail<'_> {
        parse_mail(raw.as_bytes()).expect("fixture parses")
    }

    #[test]
    fn single_part_plain_body() {
        let msg = parse(
            "From: a@example.org\r\n\
             Content-Type: text/plain; charset=utf-8\r\n\
             \r\n\
             hello body\r\n",
        );
        assert_eq!(resolve_body(&msg).trim_end(), "hello body");
    }

    #[test]
    fn unknown_charset_sentinel_falls_back_to_utf8() {
        let msg = parse(
            "From: a@example.org\r\n\
             Content-Type: text/plain; charset=unknown-8bit\r\n\
             \r\n\
             hello\r\n",
        );
        assert_eq!(resolve_body(&msg).trim_end(), "hello");
    }

    #[test]
    fn multipart_concatenates_plain_and_html_in_order() {
        let msg = parse(
            "From: a@example.org\r\n\
             Content-Type: multipart/alternative; boundary=\"XX\"\r\n\
             \r\n\
             --XX\r\n\
             Content-Type: text/plain; charset=utf-8\r\n\
             \r\n\
             A\r\n\
             --XX\r\n\
             Content-Type: text/html; charset=utf-8\r\n\
             \r\n\
             <b>B</b>\r\n\
             --XX--\r\n",
        );
        let body = resolve_body(&msg);
        let a = body.find('A').expect("plain part present");
        let b = body.find("<b>B</b>").expect("html part kept verbatim");
        assert!(a < b, "parts must appear in document order: {body:?}");
    }

    #[test]
    fn non_text_parts_are_ignored() {
        let msg = parse(
            "From: a@example.org\r\n\
             Content-Type: multipart/mixed; boundary=\"XX\"\r\n\
             \r\n\
             --XX\r\n\
             Content-Type: text/plain; charset=utf-8\r\n\
             \r\n\
             readable\r\n\
             --XX\r\n\
             Content-Type: application/octet-stream\r\n\
             Content-Transfer-Encoding: base64\r\n\
             \r\n\
             AAAA\r\n\
             --XX--\r\n",
        );
        let body = resolve_body(&msg);
        assert!(body.contains("readable"));
        assert!(!body.contains("AAAA"));
    }

    #[test]
    fn nested_multipart_is_traversed() {
        let msg = parse(
            "From: a@example.org\r\n\
             Content-Type: multipart/mixed; boundary=\"OUTER\"\r\n\
             \r\n\
             --OUTER\r\n\
             Content-Type: multipart/alternative; boundary=\"INNER\"\r\n\
             \r\n\
             --INNER\r\n\
             Content-Type: text/plain; charset=utf-8\r\n\
             \r\n\
             inner text\r\n\
             --INNER--\r\n\
             --OUTER\r\n\
             Content-Type: text/html; charset=utf-8\r\n\
             \r\n\
             <p>outer html</p>\r\n\
             --OUTER--\r\n",
        );
        let body = resolve_body(&msg);
        assert!(body.contains("inner text"));
        assert!(body.contains("<p>outer html</p>"));
    }

    #[test]
    fn quoted_printable_payload_is_undone_before_charset_decode() {
        let msg = parse(
            "From: a@example.org\r\n\
             Content-Type: text/plain; charset=iso-8859-1\r\n\
             Content-Transfer-Encoding: quoted-printable\r\n\
             \r\n\
             caf=E9\r\n",
        );
        assert_eq!(resolve_body(&msg).trim_end(), "café");
    }

    #[test]
    fn invalid_utf8_bytes_never_error() {
        let raw = b"From: a@example.org\r\n\
             Content-Type: text/plain; charset=utf-8\r\n\
             \r\n\
             bad \xFF byte\r\n";
        let msg = parse_mail(raw).expect("fixture parses");
        let body = resolve_body(&msg);
        assert!(body.contains("bad"));
        assert!(body.contains('\u{FFFD}'));
    }
}

//! Per-message IOC assembly.
//!
//! Orchestrates extraction end-to-end for one message file: parse, decode
//! the address headers, pull the originating IP out of the Received
//! chain, resolve the body and scan it for URLs and domains. The public
//! entry point is infallible — anything that goes wrong past the
//! component-local recovery degrades the record instead of surfacing an
//! error, so one broken message never stops a batch.

use std::fs;
use std::path::Path;

use chrono::Utc;
use mailparse::{parse_mail, ParsedMail};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::body::resolve_body;
use crate::errors::{IoResultExt, MailIocError, Result};
use crate::headers::decode_header_value;
use crate::ioc::{DegradedRecord, IocRecord, MessageIocs};
use crate::patterns::{extract_domains, extract_ips, extract_urls, push_unique};

/// Loose address-shaped token, good enough for triage display.
static EMAIL_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("valid email regex"));

/// Extract IOCs from one message file. Never fails: message-level errors
/// come back as a degraded record carrying the error description.
pub fn extract_iocs_from_path<P: AsRef<Path>>(path: P) -> IocRecord {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());

    match assemble(path, &file_name) {
        Ok(record) => IocRecord::Complete(record),
        Err(e) => IocRecord::Degraded(DegradedRecord {
            timestamp: Utc::now(),
            file_name,
            error: e.to_string(),
        }),
    }
}

/// The fallible pipeline behind `extract_iocs_from_path`. The file handle
/// is released as soon as the bytes are in memory.
fn assemble(path: &Path, file_name: &str) -> Result<MessageIocs> {
    let raw = fs::read(path).with_path(path.display().to_string(), "read")?;
    let msg = parse_mail(&raw).map_err(|e| MailIocError::message_parse(file_name, e.to_string()))?;

    let sender = decode_header_value(raw_header(&msg, "From").as_deref());
    let recipient = decode_header_value(raw_header(&msg, "To").as_deref());
    let subject = decode_header_value(raw_header(&msg, "Subject").as_deref());

    let sender_email = first_email_token(&sender);
    let recipient_email = first_email_token(&recipient);

    // The topologically first Received line is usually closest to origin;
    // its first IP-shaped token is our best-effort sender IP.
    let received = raw_headers(&msg, "Received").join(" ");
    let sender_ip = extract_ips(&received).into_iter().next().unwrap_or_default();

    let body = resolve_body(&msg);
    let mut urls = Vec::new();
    for url in extract_urls(&body) {
        push_unique(&mut urls, &url);
    }
    let domains = extract_domains(&body);

    Ok(MessageIocs {
        timestamp: Utc::now(),
        file_name: file_name.to_string(),
        sender,
        sender_email,
        sender_ip,
        recipient,
        recipient_email,
        subject,
        urls,
        domains,
    })
}

/// First raw (undecoded) value of a named header, unfolded. Raw because
/// the header decoder owns encoded-word handling, including its
/// first-fragment-only behavior.
fn raw_header(msg: &ParsedMail, name: &str) -> Option<String> {
    msg.headers
        .iter()
        .find(|h| h.get_key_ref().eq_ignore_ascii_case(name))
        .map(|h| unfold(&String::from_utf8_lossy(h.get_value_raw())))
}

/// All raw values of a named header, unfolded, in message order.
fn raw_headers(msg: &ParsedMail, name: &str) -> Vec<String> {
    msg.headers
        .iter()
        .filter(|h| h.get_key_ref().eq_ignore_ascii_case(name))
        .map(|h| unfold(&String::from_utf8_lossy(h.get_value_raw())))
        .collect()
}

/// Join continuation lines of a folded header value.
fn unfold(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for line in raw.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(trimmed);
    }
    out
}

fn first_email_token(text: &str) -> String {
    EMAIL_TOKEN
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

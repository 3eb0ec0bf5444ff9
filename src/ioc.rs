//! IOC record data model.
//!
//! One record per input message file, immutable once assembled. A record
//! is either complete (full extraction) or degraded (the message could
//! not be processed; only timestamp, file name and an error description
//! survive). Callers pattern-match instead of catching errors.
//!
//! Serialized field names are part of the tool's output contract:
//! downstream index mappings and the JSON document list both rely on
//! them. Absent scalar values serialize as empty strings, not null.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Output unit of the extraction pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IocRecord {
    Complete(MessageIocs),
    Degraded(DegradedRecord),
}

/// Full per-message extraction result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageIocs {
    /// Extraction time, not message time.
    pub timestamp: DateTime<Utc>,
    pub file_name: String,
    /// Decoded From header display string.
    pub sender: String,
    /// First address-shaped token of the sender, or empty.
    pub sender_email: String,
    /// Best-effort first IP of the Received chain, or empty.
    pub sender_ip: String,
    /// Decoded To header display string.
    pub recipient: String,
    pub recipient_email: String,
    pub subject: String,
    /// Ordered-unique URLs found in the body.
    pub urls: Vec<String>,
    /// Ordered-unique domains found in the body.
    pub domains: Vec<String>,
}

/// Minimal record emitted when a message cannot be processed at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DegradedRecord {
    pub timestamp: DateTime<Utc>,
    pub file_name: String,
    pub error: String,
}

impl IocRecord {
    pub fn file_name(&self) -> &str {
        match self {
            IocRecord::Complete(r) => &r.file_name,
            IocRecord::Degraded(r) => &r.file_name,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            IocRecord::Complete(r) => r.timestamp,
            IocRecord::Degraded(r) => r.timestamp,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, IocRecord::Degraded(_))
    }
}

//! mailioc Library
//!
//! A Rust library for extracting indicators of compromise (IOCs) from
//! email (.eml) files. This library provides functionality to:
//!
//! - Decode possibly multi-encoded message headers to readable text
//! - Resolve flat and multipart MIME bodies into one decoded text blob
//! - Scan text for IP addresses, URLs and domain-like tokens
//! - Assemble per-message IOC records, degrading gracefully on failure
//! - Ship records to an Elasticsearch index and persist a JSON document list
//!
//! # Example
//!
//! ```rust,no_run
//! use mailioc::assembler::extract_iocs_from_path;
//! use mailioc::ioc::IocRecord;
//!
//! match extract_iocs_from_path("message.eml") {
//!     IocRecord::Complete(iocs) => {
//!         println!("{} URLs, sender IP {:?}", iocs.urls.len(), iocs.sender_ip);
//!     }
//!     IocRecord::Degraded(rec) => {
//!         eprintln!("could not process {}: {}", rec.file_name, rec.error);
//!     }
//! }
//! ```

// Re-export all modules for library use
pub mod app;
pub mod assembler;
pub mod body;
pub mod cli;
pub mod config;
pub mod delivery;
pub mod errors;
pub mod headers;
pub mod ioc;
pub mod output;
pub mod patterns;

// Re-export commonly used types and functions for convenience
pub use assembler::extract_iocs_from_path;
pub use body::{resolve_body, PartOutcome};
pub use delivery::ElasticSink;
pub use errors::{MailIocError, Result};
pub use headers::decode_header_value;
pub use ioc::{DegradedRecord, IocRecord, MessageIocs};
pub use patterns::{extract_domains, extract_ips, extract_urls};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");

//! Output sink for collected IOC records.
//!
//! Serializes the batch into a JSON document list (an array of record
//! objects with the field names downstream tooling expects) and renders
//! the human-readable end-of-run summary.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::ioc::IocRecord;

/// Serialize records as a pretty-printed JSON array.
pub fn records_to_json(records: &[IocRecord]) -> Result<String> {
    serde_json::to_string_pretty(records).context("serializing IOC records")
}

/// Write the JSON document list to disk.
pub fn write_records(path: &Path, records: &[IocRecord]) -> Result<()> {
    let json = records_to_json(records)?;
    fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

/// Aggregate counts for the end-of-run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub degraded: usize,
    pub urls: usize,
    pub domains: usize,
    pub sender_ips: usize,
}

impl BatchSummary {
    pub fn from_records(records: &[IocRecord]) -> Self {
        let mut summary = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            match record {
                IocRecord::Complete(iocs) => {
                    summary.urls += iocs.urls.len();
                    summary.domains += iocs.domains.len();
                    if !iocs.sender_ip.is_empty() {
                        summary.sender_ips += 1;
                    }
                }
                IocRecord::Degraded(_) => summary.degraded += 1,
            }
        }
        summary
    }

    /// Render the summary block printed after a batch run.
    pub fn render(&self, output_file: &Path) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Extracted IOCs from {} emails and saved to {}\n",
            self.total,
            output_file.display()
        ));
        if self.degraded > 0 {
            out.push_str(&format!(
                "  {} message(s) could not be processed (degraded records)\n",
                self.degraded
            ));
        }
        out.push_str(&format!(
            "  urls: {}  domains: {}  sender IPs: {}\n",
            self.urls, self.domains, self.sender_ips
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ioc::{DegradedRecord, MessageIocs};
    use chrono::Utc;
    use std::path::PathBuf;

    fn complete(urls: usize, ip: &str) -> IocRecord {
        IocRecord::Complete(MessageIocs {
            timestamp: Utc::now(),
            file_name: "a.eml".into(),
            sender: String::new(),
            sender_email: String::new(),
            sender_ip: ip.into(),
            recipient: String::new(),
            recipient_email: String::new(),
            subject: String::new(),
            urls: (0..urls).map(|i| format!("https://u{i}.example")).collect(),
            domains: vec!["example.com".into()],
        })
    }

    fn degraded() -> IocRecord {
        IocRecord::Degraded(DegradedRecord {
            timestamp: Utc::now(),
            file_name: "bad.eml".into(),
            error: "unreadable".into(),
        })
    }

    #[test]
    fn json_document_list_is_an_array() {
        let json = records_to_json(&[complete(1, "203.0.113.7"), degraded()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let arr = value.as_array().unwrap();
        assert_eq!(arr.len(), 2);
        assert!(arr[0].get("urls").is_some());
        assert!(arr[1].get("error").is_some());
    }

    #[test]
    fn summary_counts() {
        let records = vec![complete(2, "203.0.113.7"), complete(1, ""), degraded()];
        let summary = BatchSummary::from_records(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.degraded, 1);
        assert_eq!(summary.urls, 3);
        assert_eq!(summary.domains, 2);
        assert_eq!(summary.sender_ips, 1);
    }

    #[test]
    fn summary_render_mentions_degraded_only_when_present() {
        let out = PathBuf::from("iocs.json");
        let clean = BatchSummary::from_records(&[complete(1, "")]);
        assert!(!clean.render(&out).contains("degraded"));

        let mixed = BatchSummary::from_records(&[complete(1, ""), degraded()]);
        let rendered = mixed.render(&out);
        assert!(rendered.contains("Extracted IOCs from 2 emails"));
        assert!(rendered.contains("1 message(s) could not be processed"));
    }

    #[test]
    fn write_records_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("iocs.json");
        write_records(&path, &[complete(1, "203.0.113.7")]).unwrap();
        let back: Vec<IocRecord> =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.len(), 1);
        assert!(!back[0].is_degraded());
    }
}

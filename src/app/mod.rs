//! High-level application orchestration layer.
//!
//! This module provides the CLI-facing `App` façade: it merges and
//! validates configuration, enumerates the message directory, runs the
//! extraction assembler once per file, forwards records to the optional
//! Elasticsearch sink, and writes the collected JSON document list.
//!
//! Major steps in `App::run`:
//!   1. Config load (env) / CLI merge / validation
//!   2. Directory enumeration by extension filter (sorted for
//!      deterministic output order)
//!   3. Per-file extraction — infallible, degraded records on failure
//!   4. Optional per-record delivery (single attempt, warnings only)
//!   5. Output document list + end-of-run summary
//!
//! Files are processed strictly sequentially; a slow or failed delivery
//! for one file has no bearing on the extraction of the next.

use std::path::PathBuf;

use crate::assembler::extract_iocs_from_path;
use crate::cli::Cli;
use crate::config::Config;
use crate::delivery::ElasticSink;
use crate::errors::{IoResultExt, MailIocError, Result};
use crate::ioc::IocRecord;
use crate::output::{self, BatchSummary};

/// Application façade.
pub struct App;

impl App {
    /// Execute the end-to-end batch extraction workflow.
    ///
    /// Returns the intended process exit code: 0 when the batch completed
    /// (degraded records included), 1 for configuration or output errors.
    pub async fn run(cli: &Cli) -> Result<i32> {
        let mut config = Config::from_env();
        config.merge_with_cli(cli);

        if let Err(e) = config.validate() {
            if cli.error_enabled() {
                // The error's Display already carries its prefix.
                eprintln!("{e}");
            }
            return Ok(1);
        }

        let files = Self::enumerate_messages(&config)?;
        if files.is_empty() && cli.warn_enabled() {
            eprintln!(
                "No .{} files found in {}",
                config.batch.extension,
                config.batch.email_dir.display()
            );
        }

        let sink = match ElasticSink::from_config(&config.delivery)? {
            Some(sink) => Self::probe_sink(cli, sink).await,
            None => None,
        };

        let mut records: Vec<IocRecord> = Vec::with_capacity(files.len());
        for path in &files {
            if cli.progress_enabled() {
                println!("Processing {}...", path.display());
            }

            let record = extract_iocs_from_path(path);
            if let IocRecord::Degraded(ref degraded) = record {
                if cli.error_enabled() {
                    eprintln!("Error processing {}: {}", path.display(), degraded.error);
                }
            }

            if let Some(ref sink) = sink {
                match sink.deliver(&record).await {
                    Ok(doc_id) => {
                        if cli.is_trace() {
                            eprintln!("[trace] Document indexed with ID: {doc_id}");
                        }
                    }
                    Err(e) => {
                        if cli.warn_enabled() {
                            eprintln!("Warning: delivery failed for {}: {e}", record.file_name());
                        }
                    }
                }
            }

            records.push(record);
        }

        let output_file = config.output.output_file.clone();
        output::write_records(&output_file, &records).map_err(|e| {
            MailIocError::output_write(output_file.display().to_string(), e.to_string())
        })?;

        if cli.progress_enabled() {
            print!("{}", BatchSummary::from_records(&records).render(&output_file));
        }

        Ok(0)
    }

    /// Enumerate message files by extension, sorted by name so output
    /// order does not depend on directory iteration order.
    fn enumerate_messages(config: &Config) -> Result<Vec<PathBuf>> {
        let dir = &config.batch.email_dir;
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)
            .with_path(dir.display().to_string(), "read_dir")?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .map(|ext| ext.eq_ignore_ascii_case(config.batch.extension.as_str()))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Probe the configured sink once before the batch. An unreachable
    /// cluster disables delivery for the run with a warning rather than
    /// failing the batch.
    async fn probe_sink(cli: &Cli, sink: ElasticSink) -> Option<ElasticSink> {
        if sink.ping().await {
            if cli.is_trace() {
                eprintln!("[trace] Connected to Elasticsearch at {}", sink.base_url());
            }
            Some(sink)
        } else {
            if cli.error_enabled() {
                eprintln!("Failed to connect to Elasticsearch at {}", sink.base_url());
            }
            None
        }
    }
}

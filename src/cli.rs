use clap::Parser;
use std::path::PathBuf;

/// Command-line interface definition.
/// Provides command-line options for batch IOC extraction.
///
/// Verbosity levels:
/// 0 - silent (only the output document is written)
/// 1 - progress + errors (default)
/// 2 - warnings + errors
/// 5 - trace/debug
#[derive(Parser, Debug, Clone)]
#[command(
    author,
    version,
    about = "Extract indicators of compromise from a directory of .eml files, optionally indexing each record in Elasticsearch"
)]
pub struct Cli {
    /// Directory containing email message files.
    #[arg(long = "email-dir", value_name = "DIR")]
    pub email_dir: PathBuf,

    /// Output JSON file for the collected IOC records (default: iocs.json).
    #[arg(long = "output-file", value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// File extension to process, without the dot (default: eml).
    #[arg(long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Elasticsearch endpoint URL (e.g. https://es.example:9200).
    #[arg(long = "es-url", value_name = "URL", conflicts_with = "es_cloud_id")]
    pub es_url: Option<String>,

    /// Elastic Cloud deployment ID.
    #[arg(long = "es-cloud-id", value_name = "ID")]
    pub es_cloud_id: Option<String>,

    /// Elasticsearch username.
    #[arg(long = "es-username", value_name = "USER")]
    pub es_username: Option<String>,

    /// Elasticsearch password.
    #[arg(long = "es-password", value_name = "PASS")]
    pub es_password: Option<String>,

    /// Elasticsearch index name (default: email-iocs).
    #[arg(long = "index-name", value_name = "INDEX")]
    pub index_name: Option<String>,

    /// Verbosity level (0,1,2,5)
    #[arg(long, default_value_t = 1)]
    pub verbose: u8,
}

impl Cli {
    /// Parse CLI arguments from process args.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Convenience: are we in very verbose/debug mode?
    pub fn is_trace(&self) -> bool {
        self.verbose >= 5
    }

    /// Are warning-level messages enabled?
    pub fn warn_enabled(&self) -> bool {
        self.verbose >= 2
    }

    /// Are error-level messages enabled?
    pub fn error_enabled(&self) -> bool {
        self.verbose >= 1
    }

    /// Are per-file progress messages enabled?
    pub fn progress_enabled(&self) -> bool {
        self.verbose >= 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_thresholds() {
        let mut cli = Cli::parse_from(["mailioc", "--email-dir", "/tmp", "--verbose", "0"]);
        assert!(!cli.error_enabled());
        assert!(!cli.progress_enabled());

        cli.verbose = 2;
        assert!(cli.warn_enabled());
        assert!(!cli.is_trace());

        cli.verbose = 5;
        assert!(cli.is_trace());
    }

    #[test]
    fn defaults() {
        let cli = Cli::parse_from(["mailioc", "--email-dir", "/tmp/mails"]);
        assert_eq!(cli.email_dir, PathBuf::from("/tmp/mails"));
        assert_eq!(cli.verbose, 1);
        assert!(cli.output_file.is_none());
        assert!(cli.es_url.is_none());
    }
}

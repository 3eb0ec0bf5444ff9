//! Configuration management for mailioc.
//!
//! Structured configuration merged from three layers with CLI precedence:
//! built-in defaults, `MAILIOC_*` environment variables, then command-line
//! arguments. Validation runs once after merging, before any file is
//! touched.

use std::path::PathBuf;

use crate::cli::Cli;
use crate::errors::{MailIocError, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Batch enumeration settings.
    pub batch: BatchConfig,

    /// Elasticsearch delivery settings.
    pub delivery: DeliveryConfig,

    /// Output document settings.
    pub output: OutputConfig,
}

/// Batch enumeration configuration.
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Directory containing the message files.
    pub email_dir: PathBuf,

    /// File extension filter (without the dot).
    pub extension: String,
}

/// Elasticsearch delivery configuration. Delivery is enabled only when an
/// endpoint and complete credentials are present.
#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    /// Explicit endpoint URL (mutually exclusive with the cloud ID).
    pub es_url: Option<String>,

    /// Elastic Cloud deployment ID.
    pub es_cloud_id: Option<String>,

    pub es_username: Option<String>,

    pub es_password: Option<String>,

    /// Target index name.
    pub index_name: String,
}

/// Output document configuration.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Path of the JSON document list.
    pub output_file: PathBuf,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            email_dir: PathBuf::new(),
            extension: "eml".to_string(),
        }
    }
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            es_url: None,
            es_cloud_id: None,
            es_username: None,
            es_password: None,
            index_name: "email-iocs".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("iocs.json"),
        }
    }
}

impl DeliveryConfig {
    /// Delivery runs only with an endpoint and complete credentials,
    /// mirroring the batch driver's historical behavior of skipping
    /// delivery when anything is missing.
    pub fn enabled(&self) -> bool {
        (self.es_url.is_some() || self.es_cloud_id.is_some())
            && self.es_username.is_some()
            && self.es_password.is_some()
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var("MAILIOC_ES_URL") {
            config.delivery.es_url = Some(url);
        }
        if let Ok(cloud_id) = std::env::var("MAILIOC_ES_CLOUD_ID") {
            config.delivery.es_cloud_id = Some(cloud_id);
        }
        if let Ok(username) = std::env::var("MAILIOC_ES_USERNAME") {
            config.delivery.es_username = Some(username);
        }
        if let Ok(password) = std::env::var("MAILIOC_ES_PASSWORD") {
            config.delivery.es_password = Some(password);
        }
        if let Ok(index) = std::env::var("MAILIOC_INDEX_NAME") {
            config.delivery.index_name = index;
        }
        if let Ok(output) = std::env::var("MAILIOC_OUTPUT_FILE") {
            config.output.output_file = PathBuf::from(output);
        }

        config
    }

    /// Merge with CLI arguments, giving CLI precedence.
    pub fn merge_with_cli(&mut self, cli: &Cli) {
        self.batch.email_dir = cli.email_dir.clone();

        if let Some(ref ext) = cli.extension {
            self.batch.extension = ext.trim_start_matches('.').to_string();
        }
        if let Some(ref url) = cli.es_url {
            self.delivery.es_url = Some(url.clone());
        }
        if let Some(ref cloud_id) = cli.es_cloud_id {
            self.delivery.es_cloud_id = Some(cloud_id.clone());
        }
        if let Some(ref username) = cli.es_username {
            self.delivery.es_username = Some(username.clone());
        }
        if let Some(ref password) = cli.es_password {
            self.delivery.es_password = Some(password.clone());
        }
        if let Some(ref index) = cli.index_name {
            self.delivery.index_name = index.clone();
        }
        if let Some(ref output) = cli.output_file {
            self.output.output_file = output.clone();
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.batch.email_dir.as_os_str().is_empty() {
            return Err(MailIocError::configuration("email directory is required"));
        }
        if !self.batch.email_dir.is_dir() {
            return Err(MailIocError::configuration(format!(
                "email directory '{}' does not exist or is not a directory",
                self.batch.email_dir.display()
            )));
        }
        if self.batch.extension.is_empty() {
            return Err(MailIocError::configuration(
                "extension filter must not be empty",
            ));
        }
        if self.delivery.es_url.is_some() && self.delivery.es_cloud_id.is_some() {
            return Err(MailIocError::configuration(
                "--es-url and --es-cloud-id are mutually exclusive",
            ));
        }
        let has_endpoint =
            self.delivery.es_url.is_some() || self.delivery.es_cloud_id.is_some();
        let has_any_credential =
            self.delivery.es_username.is_some() || self.delivery.es_password.is_some();
        if has_endpoint && !self.delivery.enabled() {
            return Err(MailIocError::configuration(
                "delivery endpoint set but credentials are incomplete (need username and password)",
            ));
        }
        if !has_endpoint && has_any_credential {
            return Err(MailIocError::configuration(
                "delivery credentials set but no endpoint (need --es-url or --es-cloud-id)",
            ));
        }
        if self.delivery.index_name.is_empty() {
            return Err(MailIocError::configuration("index name must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_dir() -> Config {
        let mut config = Config::new();
        config.delivery.index_name = "email-iocs".to_string();
        config.batch.email_dir = std::env::temp_dir();
        config
    }

    #[test]
    fn default_config() {
        let config = Config::new();
        assert_eq!(config.batch.extension, "eml");
        assert_eq!(config.output.output_file, PathBuf::from("iocs.json"));
        assert!(!config.delivery.enabled());
    }

    #[test]
    fn validation_requires_existing_dir() {
        let mut config = config_with_dir();
        assert!(config.validate().is_ok());

        config.batch.email_dir = PathBuf::from("/definitely/not/a/real/dir");
        assert!(config.validate().is_err());
    }

    #[test]
    fn delivery_enabled_needs_complete_credentials() {
        let mut delivery = DeliveryConfig {
            es_cloud_id: Some("deployment:abcd".into()),
            index_name: "email-iocs".into(),
            ..Default::default()
        };
        assert!(!delivery.enabled());

        delivery.es_username = Some("elastic".into());
        assert!(!delivery.enabled());

        delivery.es_password = Some("secret".into());
        assert!(delivery.enabled());
    }

    #[test]
    fn endpoint_without_credentials_fails_validation() {
        let mut config = config_with_dir();
        config.delivery.es_url = Some("https://es.example:9200".into());
        assert!(config.validate().is_err());

        config.delivery.es_username = Some("elastic".into());
        config.delivery.es_password = Some("secret".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn url_and_cloud_id_are_mutually_exclusive() {
        let mut config = config_with_dir();
        config.delivery.es_url = Some("https://es.example:9200".into());
        config.delivery.es_cloud_id = Some("deployment:abcd".into());
        config.delivery.es_username = Some("elastic".into());
        config.delivery.es_password = Some("secret".into());
        assert!(config.validate().is_err());
    }
}

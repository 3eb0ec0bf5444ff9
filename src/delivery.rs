//! Elasticsearch delivery sink.
//!
//! Forwards each assembled IOC record to an Elasticsearch index for later
//! analysis. Delivery is strictly best-effort from the pipeline's point
//! of view: one attempt per record, no retry, and a failed delivery never
//! touches the record that was already produced.
//!
//! The endpoint comes either from an explicit URL or from an Elastic
//! Cloud ID, the `name:base64(host$es-uuid$kb-uuid)` form that Elastic
//! Cloud hands out, which decodes to `https://{es-uuid}.{host}`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde_json::Value;

use crate::config::DeliveryConfig;
use crate::errors::{MailIocError, Result};
use crate::ioc::IocRecord;

/// One configured Elasticsearch destination.
#[derive(Debug, Clone)]
pub struct ElasticSink {
    client: reqwest::Client,
    base_url: String,
    index: String,
    username: String,
    password: String,
}

impl ElasticSink {
    /// Build a sink from config, or `None` when delivery is not enabled.
    /// Complete credentials are a config invariant checked by
    /// `Config::validate`, so this only resolves the endpoint.
    pub fn from_config(cfg: &DeliveryConfig) -> Result<Option<Self>> {
        if !cfg.enabled() {
            return Ok(None);
        }
        let base_url = match (&cfg.es_url, &cfg.es_cloud_id) {
            (Some(url), _) => url.trim_end_matches('/').to_string(),
            (None, Some(cloud_id)) => decode_cloud_id(cloud_id)?,
            (None, None) => return Ok(None),
        };
        Ok(Some(Self {
            client: reqwest::Client::new(),
            base_url,
            index: cfg.index_name.clone(),
            username: cfg.es_username.clone().unwrap_or_default(),
            password: cfg.es_password.clone().unwrap_or_default(),
        }))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    /// Connectivity probe, run once before batch delivery starts.
    pub async fn ping(&self) -> bool {
        match self
            .client
            .head(&self.base_url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    /// Index one record; returns the document `_id` assigned by
    /// Elasticsearch. Single attempt, failures are the caller's to report.
    pub async fn deliver(&self, record: &IocRecord) -> Result<String> {
        let url = format!("{}/{}/_doc", self.base_url, self.index);
        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.username, Some(&self.password))
            .json(record)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(MailIocError::delivery(
                "index",
                url,
                format!("HTTP {status}: {body}"),
            ));
        }

        let body: Value = resp.json().await?;
        Ok(body
            .get("_id")
            .and_then(Value::as_str)
            .unwrap_or("<unknown>")
            .to_string())
    }
}

/// Decode an Elastic Cloud ID into the cluster's HTTPS endpoint.
pub fn decode_cloud_id(cloud_id: &str) -> Result<String> {
    let encoded = cloud_id
        .split_once(':')
        .map(|(_, rest)| rest)
        .unwrap_or(cloud_id);
    let decoded = BASE64
        .decode(encoded)
        .map_err(|e| MailIocError::invalid_cloud_id(cloud_id, e.to_string()))?;
    let decoded = String::from_utf8(decoded)
        .map_err(|_| MailIocError::invalid_cloud_id(cloud_id, "payload is not UTF-8"))?;

    let mut parts = decoded.split('$');
    let host = parts.next().unwrap_or("");
    let es_uuid = parts.next().unwrap_or("");
    if host.is_empty() || es_uuid.is_empty() {
        return Err(MailIocError::invalid_cloud_id(
            cloud_id,
            "expected host$es-uuid$kb-uuid payload",
        ));
    }
    Ok(format!("https://{es_uuid}.{host}"))
}

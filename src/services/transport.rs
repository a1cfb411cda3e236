//! Upstream employee-data transport
//!
//! Isolates all HTTP concerns for the table-data endpoint. The payload
//! envelope is `{ "TABLE_DATA": { "data": [record, ...] } }` where each
//! record is either a positional array or a keyed object (see
//! [`crate::models::RawRecord`]).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info};

use crate::config::TransportConfig;
use crate::error::{Error, Result};
use crate::models::RawRecord;

const USER_AGENT: &str = concat!("empdir/", env!("CARGO_PKG_VERSION"));

/// Wire payload envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawPayload {
    #[serde(rename = "TABLE_DATA")]
    pub table_data: TableData,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TableData {
    pub data: Vec<RawRecord>,
}

/// Transport seam for the employee source; injectable so tests can count
/// calls and serve fixtures.
#[async_trait]
pub trait EmployeeTransport: Send + Sync {
    async fn fetch_raw(&self) -> Result<RawPayload>;
}

/// Production transport: POSTs the configured credentials to the table-data
/// endpoint.
pub struct HttpEmployeeTransport {
    http_client: reqwest::Client,
    config: TransportConfig,
}

impl HttpEmployeeTransport {
    pub fn new(config: TransportConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            config,
        })
    }
}

#[async_trait]
impl EmployeeTransport for HttpEmployeeTransport {
    async fn fetch_raw(&self) -> Result<RawPayload> {
        let url = format!("{}/gettabledata.php", self.config.base_url);
        debug!(url = %url, "Fetching employee table data");

        let response = self
            .http_client
            .post(&url)
            .json(&json!({
                "username": self.config.username,
                "password": self.config.password,
            }))
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Transport(format!(
                "Upstream returned {status}: {error_text}"
            )));
        }

        let payload: RawPayload = response
            .json()
            .await
            .map_err(|e| Error::Payload(e.to_string()))?;

        info!(
            records = payload.table_data.data.len(),
            "Fetched raw employee payload"
        );

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_creation() {
        let transport = HttpEmployeeTransport::new(TransportConfig::default());
        assert!(transport.is_ok());
    }

    #[test]
    fn test_payload_envelope_deserialization() {
        let payload: RawPayload = serde_json::from_value(json!({
            "TABLE_DATA": {
                "data": [
                    ["Asha Rao", "Engineer", "Mumbai", "7", "2020-01-01", "$90,000"],
                    { "id": "8", "name": "Vikram Iyer" }
                ]
            }
        }))
        .unwrap();
        assert_eq!(payload.table_data.data.len(), 2);
    }

    #[test]
    fn test_unexpected_envelope_is_rejected() {
        let result: std::result::Result<RawPayload, _> =
            serde_json::from_value(json!({ "rows": [] }));
        assert!(result.is_err());
    }
}

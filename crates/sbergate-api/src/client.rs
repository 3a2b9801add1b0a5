//! HTTP client for the SberGate admin REST API.
//!
//! All endpoints are JSON-bodied and relative to the gateway's own origin.
//! Fetches replace state wholesale on the caller's side; updates and
//! commands are fire-and-forget, so their response bodies are ignored.
//!
//! # Example
//!
//! ```no_run
//! use sbergate_api::GateClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GateClient::new("http://localhost:9123")?;
//!
//! let devices = client.devices().await?;
//! for device in devices.values() {
//!     println!("{}: exposed={}", device.id, device.enabled);
//! }
//! # Ok(())
//! # }
//! ```

use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::device::{DeviceMap, DevicePatch};
use crate::error::{GateError, Result};

/// HTTP client for the SberGate admin API.
#[derive(Debug, Clone)]
pub struct GateClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct VersionResponse {
    #[serde(default)]
    version: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    #[serde(default)]
    categories: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DevicesResponse {
    #[serde(default)]
    devices: DeviceMap,
}

impl GateClient {
    /// Create a new client for the gateway at `base_url`.
    ///
    /// The URL must use an http(s) scheme; a trailing slash is trimmed.
    /// Requests carry no timeout: a hung gateway simply delays that
    /// operation's continuation.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(GateError::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {base_url}"
            )));
        }

        let client = Client::builder().build().map_err(GateError::Request)?;

        Ok(Self { client, base_url })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Gateway software version, if the gateway reports one.
    pub async fn version(&self) -> Result<Option<String>> {
        let url = format!("{}/api/version", self.base_url);
        let response: VersionResponse = self.get(&url).await?;
        Ok(response.version)
    }

    /// Assistant-side category labels, sorted lexicographically.
    pub async fn categories(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/v1/categories", self.base_url);
        let mut response: CategoriesResponse = self.get(&url).await?;
        response.categories.sort();
        debug!(count = response.categories.len(), "Fetched categories");
        Ok(response.categories)
    }

    /// Full device collection keyed by entity id.
    ///
    /// Each record's `id` field is set to its map key so rows can be
    /// rendered from the record alone.
    pub async fn devices(&self) -> Result<DeviceMap> {
        let url = format!("{}/api/v2/devices", self.base_url);
        let response: DevicesResponse = self.get(&url).await?;
        let mut devices = response.devices;
        for (id, device) in &mut devices {
            device.id = id.clone();
        }
        debug!(count = devices.len(), "Fetched devices");
        Ok(devices)
    }

    /// Send a partial update for one device. The response body is ignored.
    pub async fn update_device(&self, id: &str, patch: &DevicePatch) -> Result<()> {
        let url = format!("{}/api/v2/devices", self.base_url);
        self.post_json(&url, &update_body(id, patch)).await
    }

    /// Fire an administrative command by identifier.
    ///
    /// The identifier string itself is the payload; the gateway currently
    /// understands `DB_delete` and `exit`.
    pub async fn send_command(&self, command: &str) -> Result<()> {
        let url = format!("{}/api/v2/command", self.base_url);
        self.post_json(&url, &json!({ "command": command })).await
    }

    // ======================================================================
    // Internal HTTP helpers
    // ======================================================================

    async fn get<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response =
            self.client
                .get(url)
                .send()
                .await
                .map_err(|e| GateError::NotReachable {
                    url: url.to_string(),
                    source: e,
                })?;

        let response = Self::check_status(response)?;
        response.json().await.map_err(GateError::Request)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<()> {
        let response = self.client.post(url).json(body).send().await.map_err(|e| {
            GateError::NotReachable {
                url: url.to_string(),
                source: e,
            }
        })?;

        Self::check_status(response)?;
        Ok(())
    }

    fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(GateError::Api {
                status: status.as_u16(),
                message: status.to_string(),
            })
        }
    }
}

/// JSON body for a partial device update: `{"devices": [{<id>: <patch>}]}`.
pub fn update_body(id: &str, patch: &DevicePatch) -> Value {
    let mut entry = Map::new();
    entry.insert(
        id.to_owned(),
        serde_json::to_value(patch).unwrap_or(Value::Null),
    );
    json!({ "devices": [entry] })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let client = GateClient::new("http://localhost:9123");
        assert!(client.is_ok());
        assert_eq!(client.unwrap().base_url(), "http://localhost:9123");
    }

    #[test]
    fn client_normalizes_url() {
        let client = GateClient::new("http://localhost:9123/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:9123");
    }

    #[test]
    fn client_rejects_invalid_url() {
        let result = GateClient::new("localhost:9123");
        assert!(matches!(result, Err(GateError::InvalidUrl(_))));
    }

    #[test]
    fn update_body_matches_wire_format() {
        let body = update_body("X", &DevicePatch::enabled(true));
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"devices":[{"X":{"enabled":true}}]}"#
        );

        let body = update_body("light.kitchen", &DevicePatch::category("свет"));
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"devices":[{"light.kitchen":{"category":"свет"}}]}"#
        );
    }
}

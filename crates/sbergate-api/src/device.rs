//! Device records and update payloads for the gateway device registry.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One bridged entity as stored in the gateway's device database.
///
/// Everything except `id` is optional on the wire: the hub may not have
/// reported a field yet, and display degrades to empty text instead of
/// failing. `id` doubles as the collection key; after a fetch it is copied
/// onto the record so a row can be rendered from the record alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Stable entity identifier. Never edited, only displayed and used as
    /// the correlation key for updates.
    #[serde(default)]
    pub id: String,

    /// Whether the device is exposed to the voice assistant.
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Entity type as reported by the Home Assistant hub.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_type: Option<String>,

    /// Assistant-side category. Mutable by the operator; may name a
    /// category that is no longer in the gateway's category list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Last known state snapshot, shown read-only as serialized JSON.
    #[serde(default, rename = "States", skip_serializing_if = "Option::is_none")]
    pub states: Option<Value>,
}

/// The full device collection keyed by entity id.
pub type DeviceMap = BTreeMap<String, Device>;

/// Partial device update sent to the gateway.
///
/// Only the two operator-editable fields exist here; `None` fields are
/// omitted from the JSON body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DevicePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl DevicePatch {
    /// Patch that toggles cloud exposure.
    pub fn enabled(value: bool) -> Self {
        Self {
            enabled: Some(value),
            category: None,
        }
    }

    /// Patch that reassigns the assistant-side category.
    pub fn category(value: impl Into<String>) -> Self {
        Self {
            enabled: None,
            category: Some(value.into()),
        }
    }
}

//! Message types for UI/worker communication.
//!
//! ```text
//! +------------------+     Command      +------------------+
//! |    UI thread     | --------------> |    GateWorker    |
//! |    (ratatui)     |                 |  (tokio runtime) |
//! |                  | <-------------- |                  |
//! +------------------+    GateEvent    +------------------+
//! ```
//!
//! - [`Command`]: requests sent from the UI thread to the background worker
//! - [`GateEvent`]: results sent from the worker back to the UI thread

use sbergate_api::{DeviceMap, DevicePatch};

/// Commands sent from the UI thread to the background worker.
#[derive(Debug, Clone)]
pub enum Command {
    /// Run the startup sequence: version, categories, then devices.
    ///
    /// The device fetch runs whether or not the earlier steps succeed.
    LoadAll,

    /// Refetch the device collection and replace local state wholesale.
    RefreshDevices,

    /// Fire-and-forget partial update for one device.
    UpdateDevice {
        device_id: String,
        patch: DevicePatch,
    },

    /// Fire-and-forget administrative command by identifier.
    RunCommand { command: String },

    /// Shut down the worker task.
    Shutdown,
}

/// Events sent from the worker back to the UI thread.
///
/// Failures produce no event at all: the worker logs a diagnostic and the
/// UI keeps whatever state it had.
#[derive(Debug, Clone)]
pub enum GateEvent {
    /// The gateway version resolved.
    Version(String),

    /// Category list fetched and sorted; replaces the session's list.
    Categories(Vec<String>),

    /// Full device collection fetched; replaces local state wholesale.
    Devices(DeviceMap),
}

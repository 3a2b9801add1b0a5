//! Client library for the SberGate smart-home gateway admin API.
//!
//! SberGate bridges devices exposed by a Home Assistant hub into the Sber
//! voice-assistant device model. The gateway serves a small JSON REST API
//! for its admin surface; this crate provides the typed client for that
//! API and the records that cross the wire.
//!
//! The API has four concerns:
//!
//! - the gateway version (`GET /api/version`)
//! - the assistant-side category list (`GET /api/v1/categories`)
//! - the device registry (`GET`/`POST /api/v2/devices`)
//! - administrative commands (`POST /api/v2/command`)

pub mod client;
pub mod device;
pub mod error;

pub use client::{GateClient, update_body};
pub use device::{Device, DeviceMap, DevicePatch};
pub use error::{GateError, Result};

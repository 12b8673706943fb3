//! Thunder Sense Protocol
//!
//! GATT identifiers, the characteristic registry and payload decoding for
//! Silicon Labs Thunder Sense boards. Pure data, no BLE stack.

pub mod gatt;
pub mod sensor;

pub use gatt::{indicator_payload, is_indicator, INDICATOR_UUID, NAME_PREFIX};
pub use sensor::{DecodeError, SensorKind};

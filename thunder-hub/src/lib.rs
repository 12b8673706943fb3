//! Thunder Sense Hub
//!
//! Discovers Silicon Labs Thunder Sense boards over BLE, polls their sensor
//! characteristics on a fixed interval and logs the decoded readings.
//!
//! # Example
//!
//! ```ignore
//! use thunder_hub::{btle, HubConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // List boards in range
//!     for board in btle::scan(0, std::time::Duration::from_secs(5), "Thunder Sense").await? {
//!         println!("{} ({})", board.name, board.address);
//!     }
//!
//!     // Poll every board until interrupted
//!     btle::run(HubConfig::default()).await?;
//!     Ok(())
//! }
//! ```

pub mod btle;
mod config;
mod hub;
mod link;
pub mod poll;
mod readings;
mod registry;
mod session;

#[cfg(test)]
mod mock;

pub use btle::{GattHandle, HubError};
pub use config::{HubConfig, DEFAULT_POLL_INTERVAL};
pub use hub::Hub;
pub use link::{GattCharacteristic, LinkError};
pub use poll::PollError;
pub use readings::Readings;
pub use registry::{RegistryError, SessionRegistry};
pub use session::BoardSession;

pub use thunder_proto::{DecodeError, SensorKind};

//! The seam between board sessions and the host BLE stack
//!
//! A session only ever sees discovered characteristic handles. The btleplug
//! driver provides the real implementation; tests script a mock.

use std::future::Future;

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    #[error("ble stack error: {0}")]
    Ble(#[from] btleplug::Error),
    #[error("{0}")]
    Other(String),
}

/// Discovered GATT characteristic that can be read and written
pub trait GattCharacteristic: Clone + Send + Sync + 'static {
    /// Stable characteristic identifier
    fn uuid(&self) -> Uuid;

    /// Read the current value. Completes when the stack delivers a value or an error.
    fn read(&self) -> impl Future<Output = Result<Vec<u8>, LinkError>> + Send;

    /// Write `data`; `with_response` asks the peer to confirm delivery
    fn write(
        &self,
        data: &[u8],
        with_response: bool,
    ) -> impl Future<Output = Result<(), LinkError>> + Send;
}

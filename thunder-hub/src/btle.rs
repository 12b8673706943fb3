//! btleplug driver
//!
//! Scans for Thunder Sense boards, connects to them and hands their
//! characteristics to the [`Hub`]. Everything after discovery lives in the
//! BLE-agnostic session code.

use btleplug::api::{
    BDAddr, Central, CentralEvent, Characteristic, Manager as _, Peripheral as _, ScanFilter,
    WriteType,
};
use btleplug::platform::{Adapter, Manager, Peripheral};
use futures::{Stream, StreamExt};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::HubConfig;
use crate::hub::Hub;
use crate::link::{GattCharacteristic, LinkError};
use crate::session::BoardSession;

#[derive(Debug, thiserror::Error)]
pub enum HubError {
    #[error("no bluetooth adapter at index {0}")]
    NoAdapter(usize),
    #[error("ble stack error: {0}")]
    Ble(#[from] btleplug::Error),
    #[error("adapter event stream ended")]
    EventStreamEnded,
}

/// A characteristic on a connected peripheral
#[derive(Clone)]
pub struct GattHandle {
    peripheral: Peripheral,
    characteristic: Characteristic,
}

impl GattHandle {
    pub fn new(peripheral: Peripheral, characteristic: Characteristic) -> Self {
        Self {
            peripheral,
            characteristic,
        }
    }
}

impl GattCharacteristic for GattHandle {
    fn uuid(&self) -> Uuid {
        self.characteristic.uuid
    }

    async fn read(&self) -> Result<Vec<u8>, LinkError> {
        Ok(self.peripheral.read(&self.characteristic).await?)
    }

    async fn write(&self, data: &[u8], with_response: bool) -> Result<(), LinkError> {
        let write_type = if with_response {
            WriteType::WithResponse
        } else {
            WriteType::WithoutResponse
        };
        Ok(self
            .peripheral
            .write(&self.characteristic, data, write_type)
            .await?)
    }
}

/// A device seen during a one-shot scan
#[derive(Debug, Clone)]
pub struct Advertisement {
    pub name: String,
    pub address: String,
    pub rssi: Option<i16>,
    pub is_board: bool,
}

/// Get the Bluetooth adapter at `index`
pub async fn get_adapter(index: usize) -> Result<Adapter, HubError> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;
    adapters
        .into_iter()
        .nth(index)
        .ok_or(HubError::NoAdapter(index))
}

/// Scan for `duration` and list every named device. Boards matching `prefix`
/// have `is_board = true`.
pub async fn scan(
    adapter_index: usize,
    duration: Duration,
    prefix: &str,
) -> Result<Vec<Advertisement>, HubError> {
    let adapter = get_adapter(adapter_index).await?;

    adapter.start_scan(ScanFilter::default()).await?;
    tokio::time::sleep(duration).await;

    let peripherals = adapter.peripherals().await?;
    let mut devices = Vec::new();

    for peripheral in peripherals {
        if let Some(props) = peripheral.properties().await? {
            let Some(name) = props.local_name else {
                continue;
            };
            let is_board = name.starts_with(prefix);
            devices.push(Advertisement {
                name,
                address: peripheral.address().to_string(),
                rssi: props.rssi,
                is_board,
            });
        }
    }

    adapter.stop_scan().await?;
    Ok(devices)
}

/// Scan forever, adopting every matching board and polling it while connected.
/// Only returns on error, including the adapter's event stream closing.
pub async fn run(config: HubConfig) -> Result<(), HubError> {
    let adapter = get_adapter(config.adapter_index).await?;
    let hub: Arc<Hub<GattHandle>> = Hub::new(config);

    let events = adapter.events().await?;

    info!(prefix = %hub.config().name_prefix, "scanning...");
    adapter.start_scan(ScanFilter::default()).await?;

    Err(drive(events, |event| handle_event(&adapter, &hub, event)).await)
}

/// Feed `events` to `handle` one at a time until the stream ends
async fn drive<T, F, Fut>(mut events: impl Stream<Item = T> + Unpin, mut handle: F) -> HubError
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = ()>,
{
    while let Some(event) = events.next().await {
        handle(event).await;
    }

    warn!("adapter event stream ended, no longer scanning");
    HubError::EventStreamEnded
}

async fn handle_event(adapter: &Adapter, hub: &Arc<Hub<GattHandle>>, event: CentralEvent) {
    match event {
        CentralEvent::DeviceDiscovered(id) | CentralEvent::DeviceUpdated(id) => {
            match adapter.peripheral(&id).await {
                Ok(peripheral) => discovered(hub, peripheral).await,
                Err(e) => debug!(error = %e, "peripheral vanished"),
            }
        }
        CentralEvent::DeviceDisconnected(id) => {
            if let Ok(peripheral) = adapter.peripheral(&id).await {
                let address = peripheral.address().to_string();
                if hub.release(&address).await {
                    info!(address, "disconnected");
                }
            }
        }
        _ => {}
    }
}

async fn discovered(hub: &Arc<Hub<GattHandle>>, peripheral: Peripheral) {
    let address = peripheral.address();
    if address == BDAddr::default() {
        return;
    }

    let name = match peripheral.properties().await {
        Ok(props) => props.and_then(|props| props.local_name),
        Err(e) => {
            debug!(%address, error = %e, "no properties");
            return;
        }
    };

    if let Some(session) = hub.adopt(&address.to_string(), name.as_deref()).await {
        tokio::spawn(connect_board(hub.clone(), peripheral, session));
    }
}

async fn connect_board(
    hub: Arc<Hub<GattHandle>>,
    peripheral: Peripheral,
    session: Arc<BoardSession<GattHandle>>,
) {
    let address = session.address().to_string();

    if let Err(e) = peripheral.connect().await {
        warn!(address, error = %e, "connect failed");
        session.disconnect().await;
        return;
    }
    info!(address, "connected");

    match peripheral.discover_services().await {
        Ok(()) => {
            let handles: Vec<_> = peripheral
                .services()
                .into_iter()
                .flat_map(|service| service.characteristics)
                .map(|characteristic| GattHandle::new(peripheral.clone(), characteristic))
                .collect();
            debug!(address, count = handles.len(), "characteristics discovered");
            hub.attach(&session, handles).await;
        }
        Err(e) => warn!(address, error = %e, "service discovery failed"),
    }

    hub.start(&session).await;
}

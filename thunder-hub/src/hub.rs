//! Discovery and connection glue, independent of the BLE stack
//!
//! The driver feeds discovery, connection and disconnection events in here;
//! the hub decides which boards to adopt and owns the session registry.

use std::sync::Arc;
use tracing::{debug, info};

use crate::config::HubConfig;
use crate::link::GattCharacteristic;
use crate::registry::SessionRegistry;
use crate::session::BoardSession;

pub struct Hub<C: GattCharacteristic> {
    config: HubConfig,
    registry: Arc<SessionRegistry<C>>,
}

impl<C: GattCharacteristic> Hub<C> {
    pub fn new(config: HubConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            registry: SessionRegistry::new(),
        })
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<SessionRegistry<C>> {
        &self.registry
    }

    pub fn matches(&self, name: &str) -> bool {
        name.starts_with(&self.config.name_prefix)
    }

    /// A device was seen advertising. Returns a fresh session if the device is a
    /// board we should connect to: named with our prefix and not already connected.
    pub async fn adopt(&self, address: &str, name: Option<&str>) -> Option<Arc<BoardSession<C>>> {
        if address.is_empty() {
            return None;
        }

        let name = name.filter(|name| self.matches(name))?;

        if self.registry.exists(address).await {
            debug!(address, "ignoring already connected board");
            return None;
        }

        let session = BoardSession::new(address, name, self.registry.clone());
        if let Err(e) = self.registry.register(address, session.clone()).await {
            debug!(address, error = %e, "ignoring board");
            return None;
        }

        info!(address, name, "discovered");
        Some(session)
    }

    /// Hand discovered characteristics to the session, in discovery order
    pub async fn attach(&self, session: &BoardSession<C>, handles: impl IntoIterator<Item = C>) {
        for handle in handles {
            session.add_characteristic(handle).await;
        }
    }

    /// Begin polling a connected board on the configured interval
    pub async fn start(&self, session: &Arc<BoardSession<C>>) {
        session.start_polling(self.config.poll_interval).await;
    }

    /// The board went away. Returns `false` if it had no session.
    pub async fn release(&self, address: &str) -> bool {
        match self.registry.get(address).await {
            Some(session) => {
                session.disconnect().await;
                true
            }
            None => false,
        }
    }

    pub async fn sessions(&self) -> Vec<Arc<BoardSession<C>>> {
        self.registry.sessions().await
    }
}

//! Session registry: maps board address to its live session

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::link::GattCharacteristic;
use crate::session::BoardSession;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("board {0} already has a session")]
    AlreadyRegistered(String),
}

/// Table of connected boards. Owned by the [`crate::Hub`] and shared with each session.
pub struct SessionRegistry<C: GattCharacteristic> {
    sessions: RwLock<HashMap<String, Arc<BoardSession<C>>>>,
}

impl<C: GattCharacteristic> SessionRegistry<C> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            sessions: RwLock::new(HashMap::new()),
        })
    }

    /// Register a session. An existing entry is never overwritten.
    pub async fn register(
        &self,
        address: &str,
        session: Arc<BoardSession<C>>,
    ) -> Result<(), RegistryError> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(address) {
            return Err(RegistryError::AlreadyRegistered(address.to_string()));
        }
        sessions.insert(address.to_string(), session);
        debug!(address, "registry: registered");
        Ok(())
    }

    pub async fn unregister(&self, address: &str) -> Option<Arc<BoardSession<C>>> {
        let removed = self.sessions.write().await.remove(address);
        if removed.is_some() {
            debug!(address, "registry: unregistered");
        }
        removed
    }

    /// Remove `session` only if it is still the entry for its address
    pub async fn unregister_session(&self, session: &BoardSession<C>) -> bool {
        let mut sessions = self.sessions.write().await;
        let current = sessions
            .get(session.address())
            .is_some_and(|entry| std::ptr::eq(Arc::as_ptr(entry), session));
        if current {
            sessions.remove(session.address());
            debug!(address = session.address(), "registry: unregistered");
        }
        current
    }

    pub async fn exists(&self, address: &str) -> bool {
        self.sessions.read().await.contains_key(address)
    }

    pub async fn get(&self, address: &str) -> Option<Arc<BoardSession<C>>> {
        self.sessions.read().await.get(address).cloned()
    }

    pub async fn sessions(&self) -> Vec<Arc<BoardSession<C>>> {
        self.sessions.read().await.values().cloned().collect()
    }

    pub async fn addresses(&self) -> Vec<String> {
        let mut addresses: Vec<_> = self.sessions.read().await.keys().cloned().collect();
        addresses.sort();
        addresses
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockCharacteristic;

    #[tokio::test]
    async fn register_rejects_duplicate_address() {
        let registry = SessionRegistry::<MockCharacteristic>::new();
        let first = BoardSession::new("AA:BB", "Thunder Sense #1", registry.clone());
        let second = BoardSession::new("AA:BB", "Thunder Sense #2", registry.clone());

        registry.register("AA:BB", first).await.unwrap();
        assert_eq!(
            registry.register("AA:BB", second).await,
            Err(RegistryError::AlreadyRegistered("AA:BB".to_string()))
        );

        let kept = registry.get("AA:BB").await.unwrap();
        assert_eq!(kept.name(), "Thunder Sense #1");
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn unregister_and_exists() {
        let registry = SessionRegistry::<MockCharacteristic>::new();
        let session = BoardSession::new("AA:BB", "Thunder Sense", registry.clone());
        registry.register("AA:BB", session).await.unwrap();

        assert!(registry.exists("AA:BB").await);
        assert!(!registry.exists("CC:DD").await);
        assert_eq!(registry.addresses().await, vec!["AA:BB".to_string()]);

        assert!(registry.unregister("AA:BB").await.is_some());
        assert!(registry.unregister("AA:BB").await.is_none());
        assert!(registry.is_empty().await);
    }
}

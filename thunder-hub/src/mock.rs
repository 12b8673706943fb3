//! Scripted characteristic for exercising sessions without a radio

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::Notify;
use uuid::Uuid;

use crate::link::{GattCharacteristic, LinkError};

#[derive(Clone)]
pub struct MockCharacteristic {
    uuid: Uuid,
    script: Arc<Mutex<VecDeque<Result<Vec<u8>, String>>>>,
    fallback: Option<Vec<u8>>,
    gate: Option<Arc<Notify>>,
    fail_writes: bool,
    reads: Arc<AtomicUsize>,
    writes: Arc<Mutex<Vec<Vec<u8>>>>,
}

impl MockCharacteristic {
    pub fn new(uuid: Uuid) -> Self {
        Self {
            uuid,
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: None,
            gate: None,
            fail_writes: false,
            reads: Arc::new(AtomicUsize::new(0)),
            writes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Value returned whenever the script is empty
    pub fn with_value(mut self, value: &[u8]) -> Self {
        self.fallback = Some(value.to_vec());
        self
    }

    pub fn then_error(self, error: &str) -> Self {
        self.script.lock().unwrap().push_back(Err(error.to_string()));
        self
    }

    /// Each read or write waits for one `notify_one` on `gate`
    pub fn gated(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.writes.lock().unwrap().clone()
    }
}

impl GattCharacteristic for MockCharacteristic {
    fn uuid(&self) -> Uuid {
        self.uuid
    }

    async fn read(&self) -> Result<Vec<u8>, LinkError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Ok(value)) => Ok(value),
            Some(Err(e)) => Err(LinkError::Other(e)),
            None => self
                .fallback
                .clone()
                .ok_or_else(|| LinkError::Other("nothing scripted".to_string())),
        }
    }

    async fn write(&self, data: &[u8], _with_response: bool) -> Result<(), LinkError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.writes.lock().unwrap().push(data.to_vec());
        if self.fail_writes {
            return Err(LinkError::Other("write rejected".to_string()));
        }
        Ok(())
    }
}

/// Let spawned tasks run until `done` holds
pub async fn settle(mut done: impl FnMut() -> bool) {
    for _ in 0..1000 {
        if done() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}

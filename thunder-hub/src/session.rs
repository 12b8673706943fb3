//! Board session: per-board characteristics, readings, indicator and poll loop

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thunder_proto::{indicator_payload, is_indicator, SensorKind};
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, trace, warn};

use crate::link::GattCharacteristic;
use crate::poll::{CycleGuard, PollError, PollState};
use crate::readings::Readings;
use crate::registry::SessionRegistry;

#[derive(Clone)]
struct Tracked<C> {
    kind: SensorKind,
    handle: C,
}

pub struct BoardSession<C: GattCharacteristic> {
    address: String,
    name: String,
    /// Sensor characteristics in discovery order
    characteristics: RwLock<Vec<Tracked<C>>>,
    readings: RwLock<Readings>,
    indicator: RwLock<Option<C>>,
    poll: Arc<parking_lot::Mutex<PollState>>,
    timer: Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
    registry: Arc<SessionRegistry<C>>,
}

impl<C: GattCharacteristic> BoardSession<C> {
    pub fn new(address: &str, name: &str, registry: Arc<SessionRegistry<C>>) -> Arc<Self> {
        Arc::new(Self {
            address: address.to_string(),
            name: name.to_string(),
            characteristics: RwLock::new(Vec::new()),
            readings: RwLock::new(Readings::new()),
            indicator: RwLock::new(None),
            poll: Arc::new(parking_lot::Mutex::new(PollState::new())),
            timer: Mutex::new(None),
            closed: AtomicBool::new(false),
            registry,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Overwrite the last known reading for `kind`
    pub async fn record(&self, kind: SensorKind, value: f64) {
        self.readings.write().await.insert(kind, value);
    }

    pub async fn readings(&self) -> Readings {
        self.readings.read().await.clone()
    }

    pub async fn reading(&self, kind: SensorKind) -> Option<f64> {
        self.readings.read().await.get(kind)
    }

    pub async fn tracked_kinds(&self) -> Vec<SensorKind> {
        self.characteristics
            .read()
            .await
            .iter()
            .map(|tracked| tracked.kind)
            .collect()
    }

    pub async fn has_indicator(&self) -> bool {
        self.indicator.read().await.is_some()
    }

    pub fn in_flight(&self) -> u32 {
        self.poll.lock().in_flight()
    }

    /// Write `[0x0f, r, g, b]` to the RGB indicator, if the board has one.
    /// The write runs in the background; failures are logged and dropped.
    pub async fn set_indicator_color(&self, r: u8, g: u8, b: u8) -> Option<JoinHandle<()>> {
        let indicator = self.indicator.read().await.clone()?;
        let address = self.address.clone();

        Some(tokio::spawn(async move {
            if let Err(e) = indicator.write(&indicator_payload(r, g, b), false).await {
                warn!(address, error = %e, "error writing indicator");
            }
        }))
    }

    /// Register a discovered characteristic. The indicator is kept aside and lit
    /// white; known sensors are tracked; anything else is ignored.
    pub async fn add_characteristic(&self, handle: C) {
        let uuid = handle.uuid();

        if is_indicator(uuid) {
            *self.indicator.write().await = Some(handle);
            debug!(address = %self.address, "indicator found");
            let _ = self.set_indicator_color(255, 255, 255).await;
            return;
        }

        match SensorKind::from_uuid(uuid) {
            Some(kind) => {
                self.characteristics
                    .write()
                    .await
                    .push(Tracked { kind, handle });
                debug!(address = %self.address, %kind, "tracking characteristic");
            }
            None => trace!(address = %self.address, %uuid, "ignoring characteristic"),
        }
    }

    /// Run one poll cycle inline. `Ok(None)` if a cycle is already running.
    /// Dropping the returned future mid-cycle puts the board back to idle.
    pub async fn poll_cycle(&self) -> Result<Option<Readings>, PollError> {
        let Some(guard) = self.try_begin() else {
            return Ok(None);
        };
        self.run_cycle(guard).await.map(Some)
    }

    /// Start a poll cycle in the background. Returns `None` when the tick is
    /// dropped because a cycle is still in progress or the board is gone.
    pub async fn tick(self: &Arc<Self>) -> Option<JoinHandle<Result<Readings, PollError>>> {
        let guard = self.try_begin()?;

        let session = Arc::clone(self);
        Some(tokio::spawn(async move {
            let result = session.run_cycle(guard).await;
            if let Err(e) = &result {
                error!(address = %session.address, error = %e, "poll sequencer broken, dropping board");
                session.disconnect().await;
            }
            result
        }))
    }

    /// Tick every `period` until [`Self::disconnect`]. The first tick fires immediately.
    pub async fn start_polling(self: &Arc<Self>, period: Duration) {
        let mut timer = self.timer.lock().await;
        if timer.is_some() || self.is_closed() {
            return;
        }

        let session = Arc::clone(self);
        *timer = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                let _ = session.tick().await;
            }
        }));
    }

    pub async fn is_polling(&self) -> bool {
        self.timer
            .lock()
            .await
            .as_ref()
            .is_some_and(|timer| !timer.is_finished())
    }

    /// Stop the poll timer and leave the registry. A cycle already running
    /// finishes; no new one starts. Safe to call more than once.
    pub async fn disconnect(&self) {
        self.closed.store(true, Ordering::SeqCst);

        if let Some(timer) = self.timer.lock().await.take() {
            timer.abort();
        }

        self.registry.unregister_session(self).await;
    }

    fn try_begin(&self) -> Option<CycleGuard> {
        if self.is_closed() {
            return None;
        }
        let guard = CycleGuard::begin(&self.poll, &self.address);
        if guard.is_none() {
            debug!(address = %self.address, "poll tick dropped, cycle still running");
        }
        guard
    }

    async fn tracked_at(&self, index: usize) -> Option<Tracked<C>> {
        self.characteristics.read().await.get(index).cloned()
    }

    async fn run_cycle(&self, guard: CycleGuard) -> Result<Readings, PollError> {
        let mut index = 0;

        while let Some(tracked) = self.tracked_at(index).await {
            guard.begin_read(index);
            let result = tracked.handle.read().await;
            guard.end_read();

            match result {
                Ok(payload) => match tracked.kind.decode(&payload) {
                    Ok(value) => self.record(tracked.kind, value).await,
                    Err(e) => {
                        warn!(address = %self.address, kind = %tracked.kind, error = %e, "had error decoding");
                    }
                },
                Err(e) => {
                    warn!(address = %self.address, kind = %tracked.kind, error = %e, "had error reading");
                }
            }

            index += 1;
        }

        guard.finish()?;

        let readings = self.readings().await;
        info!(address = %self.address, name = %self.name, %readings, "readings");
        Ok(readings)
    }
}

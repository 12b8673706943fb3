//! Poll sequencer state: `Idle -> Reading(0) -> .. -> Reading(n-1) -> Idle`

use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// Reading the tracked characteristic at this index
    Reading(usize),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PollError {
    #[error("poll cycle ended with {0} reads still in flight")]
    InFlightLeak(u32),
}

/// Per-board cycle guard. At most one cycle is active at a time.
#[derive(Debug)]
pub struct PollState {
    phase: Phase,
    in_flight: u32,
}

impl Default for PollState {
    fn default() -> Self {
        Self::new()
    }
}

impl PollState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            in_flight: 0,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn in_flight(&self) -> u32 {
        self.in_flight
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Start a cycle. Returns `false` (tick dropped) unless idle with nothing in flight.
    pub fn try_begin(&mut self) -> bool {
        if self.phase != Phase::Idle || self.in_flight > 0 {
            return false;
        }
        self.phase = Phase::Reading(0);
        true
    }

    /// Issue the read for `index`
    pub fn begin_read(&mut self, index: usize) {
        self.phase = Phase::Reading(index);
        self.in_flight += 1;
    }

    /// The read issued by `begin_read` completed, with a value or an error
    pub fn end_read(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if let Phase::Reading(index) = self.phase {
            self.phase = Phase::Reading(index + 1);
        }
    }

    /// Characteristics exhausted. A nonzero in-flight count means sequencing is broken.
    pub fn finish(&mut self) -> Result<(), PollError> {
        if self.in_flight != 0 {
            return Err(PollError::InFlightLeak(self.in_flight));
        }
        self.phase = Phase::Idle;
        Ok(())
    }

    /// The cycle was cancelled mid-way. Back to idle; returns the reads left behind.
    pub fn abandon(&mut self) -> u32 {
        let dropped = self.in_flight;
        self.in_flight = 0;
        self.phase = Phase::Idle;
        dropped
    }
}

/// Claim on the active cycle of one board. Dropping it without
/// [`CycleGuard::finish`] (the cycle future was cancelled) returns the
/// board to idle so later ticks are accepted.
pub struct CycleGuard {
    state: Arc<Mutex<PollState>>,
    address: String,
    finished: bool,
}

impl CycleGuard {
    /// `None` if a cycle is already running
    pub fn begin(state: &Arc<Mutex<PollState>>, address: &str) -> Option<Self> {
        if !state.lock().try_begin() {
            return None;
        }
        Some(Self {
            state: Arc::clone(state),
            address: address.to_string(),
            finished: false,
        })
    }

    pub fn begin_read(&self, index: usize) {
        self.state.lock().begin_read(index);
    }

    pub fn end_read(&self) {
        self.state.lock().end_read();
    }

    pub fn finish(mut self) -> Result<(), PollError> {
        self.finished = true;
        self.state.lock().finish()
    }
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        let dropped = self.state.lock().abandon();
        warn!(address = %self.address, dropped, "poll cycle cancelled");
    }
}

use std::time::Duration;

/// Default time between poll cycles of one board
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Boards are adopted only if their advertised name starts with this
    pub name_prefix: String,
    pub poll_interval: Duration,
    /// Which local Bluetooth adapter to use
    pub adapter_index: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            name_prefix: thunder_proto::NAME_PREFIX.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            adapter_index: 0,
        }
    }
}

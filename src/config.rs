use std::path::PathBuf;
use std::time::Duration;

// Defaults matching the capture hardware this was built against.
pub const DEFAULT_BAUDRATE: u32 = 115_200;
pub const DEFAULT_HISTORY_CAPACITY: usize = 200;
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Everything a capture run needs to know.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: PathBuf,
    pub baudrate: u32,
    pub history_capacity: usize,
    pub poll_interval: Duration,
    /// Records are persisted only when a path is configured.
    pub persist_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: PathBuf::from("/dev/ttyUSB0"),
            baudrate: DEFAULT_BAUDRATE,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            persist_path: None,
        }
    }
}

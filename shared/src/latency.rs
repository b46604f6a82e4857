/// Simulated latency for the mock task pipelines.
///
/// The runners pause here instead of doing real network or transcode I/O.
/// A real implementation swaps the pause for actual work behind the same
/// await point; tests construct a disabled pacer and run instantly.
use std::time::Duration;

#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    enabled: bool,
}

impl Pacer {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }

    /// Honors SIMULATE_LATENCY; anything but "0"/"false" keeps pauses on.
    pub fn from_env() -> Self {
        match std::env::var("SIMULATE_LATENCY") {
            Ok(v) if v == "0" || v.eq_ignore_ascii_case("false") => Self::disabled(),
            _ => Self::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub async fn pause(&self, delay: Duration) {
        if self.enabled {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new()
    }
}

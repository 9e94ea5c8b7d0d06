//! Awaitable stand-in for data-store latency.

use std::future::Future;
use std::time::Duration;

/// Delay applied by the direct-invocation handler.
pub const ACTION_LATENCY: Duration = Duration::from_millis(500);

/// Delay applied by the simulated form submitter.
pub const FORM_LATENCY: Duration = Duration::from_millis(1000);

/// Something a handler waits on before completing.
///
/// Handlers only depend on this trait, so the simulated delay can be swapped
/// for a real data-store round trip without touching their contract.
pub trait Latency: Send + Sync {
    fn wait(&self) -> impl Future<Output = ()> + Send;
}

/// Fixed-duration sleep on the tokio timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedLatency {
    duration: Duration,
}

impl SimulatedLatency {
    pub const fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self::new(Duration::from_millis(millis))
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for SimulatedLatency {
    fn default() -> Self {
        Self::new(ACTION_LATENCY)
    }
}

impl Latency for SimulatedLatency {
    fn wait(&self) -> impl Future<Output = ()> + Send {
        tokio::time::sleep(self.duration)
    }
}

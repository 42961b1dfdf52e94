use std::{future::Future, pin::Pin, time::Duration};

/// The non-blocking delay seam the retry machinery sleeps on.
///
/// Implementations schedule a wake-up without parking a thread. The trait
/// is object-safe so a strategy can hold any scheduler behind an `Arc`;
/// tests substitute a deterministic scheduler that records requested
/// delays and completes immediately.
pub trait Scheduler: Send + Sync + 'static {
    /// a future that completes after `duration` of wall time
    fn delay(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>>;
}

/// The production scheduler, waking through [`async_io::Timer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AsyncIoScheduler;

impl AsyncIoScheduler {
    /// construct the scheduler
    pub fn new() -> Self {
        Self
    }
}

impl Scheduler for AsyncIoScheduler {
    fn delay(&self, duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>> {
        Box::pin(async move {
            async_io::Timer::after(duration).await;
        })
    }
}

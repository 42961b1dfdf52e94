use crate::RetryContext;
use std::sync::Arc;
use std::time::Duration;

/// Observer callbacks for retry execution.
///
/// Every hook has an empty default body; implement only what you measure.
/// Implementations must be cheap and non-blocking, since they run inline
/// with the retry loop.
pub trait RetryMetrics: Send + Sync + 'static {
    /// a retry execution is starting
    fn on_start(&self, context: &RetryContext) {
        let _ = context;
    }

    /// an attempt finished, successfully or not
    fn on_attempt(&self, context: &RetryContext, duration: Duration, success: bool) {
        let _ = (context, duration, success);
    }

    /// a backoff delay completed; `planned` is the computed delay,
    /// `actual` the observed wait (shorter when cancelled)
    fn on_delay(&self, context: &RetryContext, planned: Duration, actual: Duration) {
        let _ = (context, planned, actual);
    }

    /// the execution completed with its final result
    fn on_complete(&self, context: &RetryContext, total: Duration, success: bool, attempts: u32) {
        let _ = (context, total, success, attempts);
    }
}

/// The do-nothing metrics implementation, used unless a strategy is given
/// something better.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRetryMetrics;

impl RetryMetrics for NoopRetryMetrics {}

impl<T: RetryMetrics + ?Sized> RetryMetrics for Arc<T> {
    fn on_start(&self, context: &RetryContext) {
        (**self).on_start(context);
    }

    fn on_attempt(&self, context: &RetryContext, duration: Duration, success: bool) {
        (**self).on_attempt(context, duration, success);
    }

    fn on_delay(&self, context: &RetryContext, planned: Duration, actual: Duration) {
        (**self).on_delay(context, planned, actual);
    }

    fn on_complete(&self, context: &RetryContext, total: Duration, success: bool, attempts: u32) {
        (**self).on_complete(context, total, success, attempts);
    }
}

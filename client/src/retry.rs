use crate::{
    HttpErrorCategory, HttpResult, NoopRetryMetrics, RetryMetrics, Scheduler,
};
use std::fmt::{self, Debug, Display, Formatter};
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use swansong::Swansong;

/// Labels one retry execution: the operation's name and the 1-based
/// attempt number. Immutable; advancing to the next attempt produces a new
/// context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryContext {
    operation_name: String,
    attempt: u32,
}

impl RetryContext {
    /// construct a context for the first attempt of this operation
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            attempt: 1,
        }
    }

    /// the operation's name
    pub fn operation_name(&self) -> &str {
        &self.operation_name
    }

    /// the 1-based attempt number
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// the context of the following attempt
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            operation_name: self.operation_name.clone(),
            attempt: self.attempt + 1,
        }
    }
}

impl Display for RetryContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} (attempt {})", self.operation_name, self.attempt)
    }
}

/// Exponential backoff with jitter, executed with non-blocking delays.
///
/// An execution runs its operation up to `max_attempts` times, strictly
/// sequentially. The delay before attempt `n + 1` is
/// `initial_delay · multiplierⁿ⁻¹`, perturbed multiplicatively by a jitter
/// factor and clamped to `max_delay`. Successes and non-retryable failures
/// complete immediately; with `jitter_factor` zero the whole schedule is
/// deterministic.
///
/// A [`Swansong`] can be attached as a cancellation signal: shutdown is
/// observed between attempts (before a delay is scheduled) and interrupts
/// an in-flight delay, completing the execution with a
/// [`NetworkError`][HttpErrorCategory::NetworkError] failure.
#[derive(Clone)]
pub struct RetryStrategy {
    max_attempts: u32,
    initial_delay: Duration,
    backoff_multiplier: f64,
    max_delay: Duration,
    jitter_factor: f64,
    scheduler: Arc<dyn Scheduler>,
    metrics: Arc<dyn RetryMetrics>,
    swansong: Option<Swansong>,
}

impl Debug for RetryStrategy {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryStrategy")
            .field("max_attempts", &self.max_attempts)
            .field("initial_delay", &self.initial_delay)
            .field("backoff_multiplier", &self.backoff_multiplier)
            .field("max_delay", &self.max_delay)
            .field("jitter_factor", &self.jitter_factor)
            .finish_non_exhaustive()
    }
}

impl RetryStrategy {
    /// Construct a strategy with the default schedule: five attempts,
    /// initial delay 1s, multiplier 2.0, delays capped at 60s, jitter
    /// factor 0.1.
    pub fn new(scheduler: impl Scheduler) -> Self {
        Self {
            max_attempts: 5,
            initial_delay: Duration::from_secs(1),
            backoff_multiplier: 2.0,
            max_delay: Duration::from_secs(60),
            jitter_factor: 0.1,
            scheduler: Arc::new(scheduler),
            metrics: Arc::new(NoopRetryMetrics),
            swansong: None,
        }
    }

    /// A strategy that executes exactly once, with no retry.
    pub fn none(scheduler: impl Scheduler) -> Self {
        Self::new(scheduler).with_max_attempts(1)
    }

    /// Chainable setter for the attempt limit.
    ///
    /// # Panics
    ///
    /// Panics if `max_attempts` is zero.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        assert!(max_attempts >= 1, "max_attempts must be at least 1");
        self.max_attempts = max_attempts;
        self
    }

    /// chainable setter for the delay before the second attempt
    #[must_use]
    pub fn with_initial_delay(mut self, initial_delay: Duration) -> Self {
        self.initial_delay = initial_delay;
        self
    }

    /// Chainable setter for the backoff multiplier.
    ///
    /// # Panics
    ///
    /// Panics if `backoff_multiplier` is below 1.0.
    #[must_use]
    pub fn with_backoff_multiplier(mut self, backoff_multiplier: f64) -> Self {
        assert!(
            backoff_multiplier >= 1.0,
            "backoff_multiplier must be at least 1.0"
        );
        self.backoff_multiplier = backoff_multiplier;
        self
    }

    /// chainable setter for the delay cap
    #[must_use]
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Chainable setter for the jitter factor.
    ///
    /// # Panics
    ///
    /// Panics if `jitter_factor` is outside `0.0..=1.0`.
    #[must_use]
    pub fn with_jitter_factor(mut self, jitter_factor: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&jitter_factor),
            "jitter_factor must be within 0.0..=1.0"
        );
        self.jitter_factor = jitter_factor;
        self
    }

    /// chainable setter for the metrics observer
    #[must_use]
    pub fn with_metrics(mut self, metrics: impl RetryMetrics) -> Self {
        self.metrics = Arc::new(metrics);
        self
    }

    /// chainable setter for the cancellation signal
    #[must_use]
    pub fn with_swansong(mut self, swansong: Swansong) -> Self {
        self.swansong = Some(swansong);
        self
    }

    /// the attempt limit
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `operation` until it succeeds, fails unretryably, or the
    /// attempt limit is reached. The operation receives the 1-based
    /// attempt number; attempts within one execution are strictly
    /// sequential.
    pub async fn execute<T, Op, Fut>(&self, mut operation: Op, context: RetryContext) -> HttpResult<T>
    where
        Op: FnMut(u32) -> Fut,
        Fut: Future<Output = HttpResult<T>>,
    {
        let started = Instant::now();
        self.metrics.on_start(&context);
        let mut context = context;

        loop {
            let attempt_started = Instant::now();
            let result = operation(context.attempt()).await;
            let duration = attempt_started.elapsed();
            self.metrics
                .on_attempt(&context, duration, result.is_success());

            if result.is_success() {
                if context.attempt() > 1 {
                    log::debug!("{context} recovered after {} attempts", context.attempt());
                }
                return self.complete(context, started, result);
            }

            if context.attempt() >= self.max_attempts {
                log::warn!("{context} exhausted its attempt limit");
                return self.complete(context, started, result);
            }

            if !result.is_retryable() {
                log::warn!("{context} failed unretryably");
                return self.complete(context, started, result);
            }

            if self.is_shutting_down() {
                log::debug!("{context} cancelled before scheduling a retry delay");
                return self.complete(context, started, cancelled(result));
            }

            let planned = self.delay_for(context.attempt());
            log::debug!("{context} failed; next attempt in {planned:?}");

            let delay_started = Instant::now();
            let completed = self.sleep(planned).await;
            self.metrics
                .on_delay(&context, planned, delay_started.elapsed());

            if !completed {
                log::debug!("{context} cancelled during a retry delay");
                return self.complete(context, started, cancelled(result));
            }

            context = context.next();
        }
    }

    /// the delay scheduled after the `attempt`-th failure (1-based)
    fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let base = self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(exponent);

        let jittered = if self.jitter_factor == 0.0 {
            base
        } else {
            let unit = fastrand::f64() * 2.0 - 1.0;
            base * (1.0 + unit * self.jitter_factor)
        };

        let millis = (jittered * 1000.0).round().max(0.0);
        Duration::from_millis(millis as u64).min(self.max_delay)
    }

    /// false when the delay was interrupted by shutdown
    async fn sleep(&self, duration: Duration) -> bool {
        match &self.swansong {
            Some(swansong) => swansong
                .interrupt(self.scheduler.delay(duration))
                .await
                .is_some(),
            None => {
                self.scheduler.delay(duration).await;
                true
            }
        }
    }

    fn is_shutting_down(&self) -> bool {
        self.swansong
            .as_ref()
            .is_some_and(|swansong| swansong.state().is_shutting_down())
    }

    fn complete<T>(
        &self,
        context: RetryContext,
        started: Instant,
        result: HttpResult<T>,
    ) -> HttpResult<T> {
        self.metrics.on_complete(
            &context,
            started.elapsed(),
            result.is_success(),
            context.attempt(),
        );
        result
    }
}

/// Rewrite a failure interrupted by cancellation as a network error, per
/// the cancellation contract; successes pass through untouched.
fn cancelled<T>(result: HttpResult<T>) -> HttpResult<T> {
    match result {
        HttpResult::Failure {
            message,
            cause,
            fallback,
            etag,
            status,
            ..
        } => HttpResult::Failure {
            message: format!("operation cancelled; last failure: {message}"),
            cause,
            category: HttpErrorCategory::NetworkError,
            fallback,
            etag,
            status,
        },
        success => success,
    }
}

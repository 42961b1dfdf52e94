/*!
Resilient etag-aware http fetching with async retry.

[`ResilientFetcher`] wraps a single-resource fetch in three layers of
robustness:

* **conditional requests** — the etag of the last successful response is
  echoed back as `If-None-Match`, and a `304 Not Modified` is answered from
  the in-memory cache without touching the response converter;
* **graceful degradation** — failures carry the last successfully fetched
  content as fallback, so consumers can keep serving stale data;
* **retry** — retryable failures (network and 5xx) are re-attempted on a
  [`RetryStrategy`] with exponential backoff and jitter, delayed through a
  non-blocking [`Scheduler`] so no thread ever parks in a backoff window.

All outcomes flow through the [`HttpResult`] sum type; nothing here is
signalled by panics or error types.
*/
#![forbid(unsafe_code)]
#![deny(
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

mod result;
pub use result::{HttpErrorCategory, HttpResult};

mod loader_status;
pub use loader_status::LoaderStatus;

mod converter;
pub use converter::{ResponseConverter, StringConverter, VoidConverter};

mod scheduler;
pub use scheduler::{AsyncIoScheduler, Scheduler};

mod metrics;
pub use metrics::{NoopRetryMetrics, RetryMetrics};

mod retry;
pub use retry::{RetryContext, RetryStrategy};

mod fetcher;
pub use fetcher::ResilientFetcher;

pub use swansong::Swansong;

use crate::{
    HttpErrorCategory, HttpResult, LoaderStatus, ResponseConverter, RetryContext, RetryStrategy,
};
use async_lock::Mutex;
use parapet_http::{
    ACCEPT, Dispatch, Error, IF_NONE_MATCH, Method, Request, StatusFamily, Url,
};
use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicU8, Ordering};

/// The last successful fetch, kept for conditional requests and fallback.
/// Written only on a 2xx whose conversion succeeded; never expired.
struct CachedEntry<T> {
    content: T,
    etag: Option<String>,
    status: u16,
}

/// A single-resource fetcher combining conditional requests, cached
/// fallback and retry.
///
/// `load` serializes through an internal async mutex, so concurrent calls
/// on one fetcher execute one at a time; the [`LoaderStatus`] is published
/// atomically and can be read at any point without the lock. The cache is
/// owned exclusively and only ever cloned out, never exposed by reference.
pub struct ResilientFetcher<C: ResponseConverter, D: Dispatch> {
    dispatch: D,
    converter: C,
    retry: RetryStrategy,
    url: Url,
    method: Method,
    retry_non_idempotent: bool,
    operation_name: String,
    cache: Mutex<Option<CachedEntry<C::Output>>>,
    status: AtomicU8,
}

impl<C: ResponseConverter, D: Dispatch> Debug for ResilientFetcher<C, D> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientFetcher")
            .field("operation_name", &self.operation_name)
            .field("url", &self.url.as_str())
            .field("method", &self.method)
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}

impl<C: ResponseConverter, D: Dispatch> ResilientFetcher<C, D> {
    /// construct a fetcher for this resource
    pub fn new(dispatch: D, converter: C, retry: RetryStrategy, url: Url) -> Self {
        Self {
            operation_name: format!("fetch {url}"),
            dispatch,
            converter,
            retry,
            url,
            method: Method::Get,
            retry_non_idempotent: false,
            cache: Mutex::new(None),
            status: AtomicU8::new(LoaderStatus::Undefined as u8),
        }
    }

    /// chainable setter for the name used in logs and retry contexts
    #[must_use]
    pub fn with_operation_name(mut self, operation_name: impl Into<String>) -> Self {
        self.operation_name = operation_name.into();
        self
    }

    /// Chainable setter for the request method (default GET).
    ///
    /// Non-idempotent methods (POST, PATCH) execute exactly once per
    /// `load` unless retry is explicitly opted into with
    /// [`retry_non_idempotent`][Self::retry_non_idempotent].
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// chainable opt-in to retrying non-idempotent methods
    #[must_use]
    pub fn retry_non_idempotent(mut self, retry_non_idempotent: bool) -> Self {
        self.retry_non_idempotent = retry_non_idempotent;
        self
    }

    /// the current lifecycle status, readable without the lock
    pub fn status(&self) -> LoaderStatus {
        LoaderStatus::from_u8(self.status.load(Ordering::Acquire))
    }

    /// the etag of the cached content, if any
    pub async fn last_etag(&self) -> Option<String> {
        self.cache
            .lock()
            .await
            .as_ref()
            .and_then(|entry| entry.etag.clone())
    }

    /// whether a previous load left content to fall back on
    pub async fn has_cached_content(&self) -> bool {
        self.cache.lock().await.is_some()
    }

    /// Fetch the resource.
    ///
    /// Acquires the fetcher lock, marks the status `Loading`, runs the
    /// fetch under the retry strategy, updates the cache on fresh success,
    /// and publishes `Ok` or `Error`. Every failure carries the cached
    /// content as fallback when one exists.
    pub async fn load(&self) -> HttpResult<C::Output> {
        let mut cache = self.cache.lock().await;
        self.store_status(LoaderStatus::Loading);

        let etag = cache.as_ref().and_then(|entry| entry.etag.clone());
        let fallback = cache.as_ref().map(|entry| entry.content.clone());

        let context = RetryContext::new(self.operation_name.clone());
        let operation = |_attempt: u32| self.fetch_once(etag.clone(), fallback.clone());

        let mut result = if self.method.is_idempotent() || self.retry_non_idempotent {
            self.retry.execute(operation, context).await
        } else {
            let single = self.retry.clone().with_max_attempts(1);
            single.execute(operation, context).await
        };

        if let HttpResult::Success {
            content,
            etag,
            status,
        } = &result
            && *status != 304
        {
            log::debug!(
                "{} cached fresh content (status {status}, etag {etag:?})",
                self.operation_name
            );
            *cache = Some(CachedEntry {
                content: content.clone(),
                etag: etag.clone(),
                status: *status,
            });
        }

        if let HttpResult::Failure {
            fallback: slot @ None,
            ..
        } = &mut result
        {
            *slot = cache.as_ref().map(|entry| entry.content.clone());
        }

        self.store_status(if result.is_success() {
            LoaderStatus::Ok
        } else {
            LoaderStatus::Error
        });
        result
    }

    async fn fetch_once(
        &self,
        etag: Option<String>,
        fallback: Option<C::Output>,
    ) -> HttpResult<C::Output> {
        let mut request = Request::new(self.method, self.url.clone());
        if let Some(etag) = &etag {
            request.headers_mut().insert(IF_NONE_MATCH, etag.clone());
        }
        if let Some(accept) = self.converter.content_type() {
            request.headers_mut().insert(ACCEPT, accept);
        }

        let response = match self
            .dispatch
            .send(request, self.converter.body_format())
            .await
        {
            Ok(response) => response,
            Err(error @ Error::Closed) => {
                return HttpResult::failure(
                    "transport interrupted or connection closed",
                    HttpErrorCategory::NetworkError,
                )
                .with_cause(error)
                .with_fallback(fallback);
            }
            Err(error) => {
                return HttpResult::failure(
                    format!("transport error: {error}"),
                    HttpErrorCategory::NetworkError,
                )
                .with_cause(error)
                .with_fallback(fallback);
            }
        };

        let status = response.status();

        if status == 304 {
            return match fallback {
                Some(content) => {
                    log::debug!("{} not modified; serving cached content", self.operation_name);
                    HttpResult::success(content, etag, 304)
                }
                None => HttpResult::failure(
                    "304 Not Modified but no cached content",
                    HttpErrorCategory::ServerError,
                )
                .with_status(304),
            };
        }

        match response.status_family() {
            StatusFamily::Success => {
                let response_etag = response.etag().map(str::to_string);
                match self.converter.convert(response.into_body()) {
                    Some(content) => HttpResult::success(content, response_etag, status),
                    None => HttpResult::failure(
                        format!("response body (status {status}) could not be converted"),
                        HttpErrorCategory::InvalidContent,
                    )
                    .with_status(status)
                    .with_etag(response_etag)
                    .with_fallback(fallback),
                }
            }
            StatusFamily::ClientError => HttpResult::failure(
                format!("client error {status}"),
                HttpErrorCategory::ClientError,
            )
            .with_status(status)
            .with_fallback(fallback),
            StatusFamily::ServerError => HttpResult::failure(
                format!("server error {status}"),
                HttpErrorCategory::ServerError,
            )
            .with_status(status)
            .with_fallback(fallback),
            family => HttpResult::failure(
                format!("unexpected {family} status {status}"),
                HttpErrorCategory::ServerError,
            )
            .with_status(status)
            .with_fallback(fallback),
        }
    }

    fn store_status(&self, status: LoaderStatus) {
        self.status.store(status as u8, Ordering::Release);
    }
}

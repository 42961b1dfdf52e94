use futures_lite::future::block_on;
use parapet_client::{
    HttpErrorCategory, LoaderStatus, ResilientFetcher, ResponseConverter, RetryStrategy,
    Scheduler, StringConverter,
};
use parapet_http::{
    BodyFormat, Dispatch, Error, Headers, Method, ReceivedBody, Request, Response, Url,
};
use pretty_assertions::assert_eq;
use std::{
    collections::VecDeque,
    future::Future,
    io,
    pin::Pin,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU32, Ordering},
    },
    time::Duration,
};

/// Completes immediately; delays are irrelevant to these tests.
#[derive(Debug, Clone, Copy, Default)]
struct InstantScheduler;

impl Scheduler for InstantScheduler {
    fn delay(&self, _duration: Duration) -> Pin<Box<dyn Future<Output = ()> + Send + 'static>> {
        Box::pin(std::future::ready(()))
    }
}

/// Replays a fixed sequence of responses, recording each request.
#[derive(Debug, Default)]
struct ScriptedDispatch {
    responses: Mutex<VecDeque<parapet_http::Result<Response>>>,
    requests: Mutex<Vec<Request>>,
}

impl ScriptedDispatch {
    fn script(
        responses: impl IntoIterator<Item = parapet_http::Result<Response>>,
    ) -> Arc<Self> {
        let _ = env_logger::try_init();
        Arc::new(Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

impl Dispatch for ScriptedDispatch {
    fn send(
        &self,
        request: Request,
        _format: BodyFormat,
    ) -> impl Future<Output = parapet_http::Result<Response>> + Send {
        self.requests.lock().unwrap().push(request);
        let next = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(Error::Closed));
        std::future::ready(next)
    }
}

fn ok_response(body: &str, etag: Option<&str>) -> parapet_http::Result<Response> {
    let mut headers = Headers::new();
    if let Some(etag) = etag {
        headers.insert("ETag", etag);
    }
    Ok(Response::new(200, headers, ReceivedBody::from(body)))
}

fn status_response(status: u16) -> parapet_http::Result<Response> {
    Ok(Response::new(status, Headers::new(), ReceivedBody::Empty))
}

fn network_error() -> parapet_http::Result<Response> {
    Err(Error::Io(io::Error::new(
        io::ErrorKind::ConnectionReset,
        "connection reset",
    )))
}

fn url() -> Url {
    "https://config.example.com/app.json".parse().unwrap()
}

fn fetcher(
    dispatch: Arc<ScriptedDispatch>,
) -> ResilientFetcher<StringConverter, Arc<ScriptedDispatch>> {
    ResilientFetcher::new(
        dispatch,
        StringConverter::new(),
        RetryStrategy::none(InstantScheduler),
        url(),
    )
}

/// Converts text bodies, counting invocations and rejecting "reject me".
#[derive(Debug, Clone, Default)]
struct CountingConverter {
    conversions: Arc<AtomicU32>,
}

impl ResponseConverter for CountingConverter {
    type Output = String;

    fn body_format(&self) -> BodyFormat {
        BodyFormat::Text
    }

    fn content_type(&self) -> Option<&str> {
        Some("application/json")
    }

    fn convert(&self, body: ReceivedBody) -> Option<String> {
        self.conversions.fetch_add(1, Ordering::SeqCst);
        body.into_text().filter(|text| text != "reject me")
    }
}

#[test]
fn etag_round_trip_serves_304_from_cache() {
    let dispatch = ScriptedDispatch::script([
        ok_response("v1", Some("W/\"1\"")),
        status_response(304),
    ]);
    let conversions = Arc::new(AtomicU32::new(0));
    let fetcher = ResilientFetcher::new(
        dispatch.clone(),
        CountingConverter {
            conversions: conversions.clone(),
        },
        RetryStrategy::none(InstantScheduler),
        url(),
    );

    let first = block_on(fetcher.load());
    assert_eq!(first.content().map(String::as_str), Some("v1"));
    assert_eq!(first.etag(), Some("W/\"1\""));
    assert_eq!(first.status(), Some(200));

    let second = block_on(fetcher.load());
    assert_eq!(second.content().map(String::as_str), Some("v1"));
    assert_eq!(second.etag(), Some("W/\"1\""));
    assert_eq!(second.status(), Some(304));

    // the conditional header went out on the second request only
    let requests = dispatch.requests();
    assert_eq!(requests[0].headers().get("If-None-Match"), None);
    assert_eq!(
        requests[1].headers().get("If-None-Match"),
        Some("W/\"1\"")
    );

    // 304 is served from cache without reconverting
    assert_eq!(conversions.load(Ordering::SeqCst), 1);
    assert_eq!(fetcher.status(), LoaderStatus::Ok);
    assert_eq!(block_on(fetcher.last_etag()), Some("W/\"1\"".to_string()));
}

#[test]
fn status_is_undefined_before_the_first_load() {
    let fetcher = fetcher(ScriptedDispatch::script([]));
    assert_eq!(fetcher.status(), LoaderStatus::Undefined);
    assert!(!block_on(fetcher.has_cached_content()));
}

#[test]
fn server_errors_fall_back_to_cached_content() {
    let dispatch = ScriptedDispatch::script([
        ok_response("v1", Some("\"e1\"")),
        status_response(503),
    ]);
    let fetcher = fetcher(dispatch);

    assert!(block_on(fetcher.load()).is_success());

    let failed = block_on(fetcher.load());
    assert_eq!(failed.category(), Some(HttpErrorCategory::ServerError));
    assert_eq!(failed.fallback().map(String::as_str), Some("v1"));
    assert_eq!(failed.status(), Some(503));
    assert!(failed.is_retryable());
    assert_eq!(fetcher.status(), LoaderStatus::Error);
}

#[test]
fn client_errors_are_not_retryable() {
    let dispatch = ScriptedDispatch::script([status_response(404)]);
    let fetcher = fetcher(dispatch.clone());

    let result = block_on(fetcher.load());
    assert_eq!(result.category(), Some(HttpErrorCategory::ClientError));
    assert!(!result.is_retryable());
    assert_eq!(result.fallback(), None);
    assert_eq!(dispatch.requests().len(), 1);
}

#[test]
fn not_modified_without_cache_is_a_server_error() {
    let dispatch = ScriptedDispatch::script([status_response(304)]);
    let fetcher = fetcher(dispatch);

    let result = block_on(fetcher.load());
    assert_eq!(result.category(), Some(HttpErrorCategory::ServerError));
    assert_eq!(
        result.message(),
        Some("304 Not Modified but no cached content")
    );
}

#[test]
fn failed_conversion_preserves_the_cache() {
    let dispatch = ScriptedDispatch::script([
        ok_response("v1", Some("\"e1\"")),
        ok_response("reject me", Some("\"e2\"")),
        status_response(304),
    ]);
    let fetcher = ResilientFetcher::new(
        dispatch,
        CountingConverter::default(),
        RetryStrategy::none(InstantScheduler),
        url(),
    );

    assert!(block_on(fetcher.load()).is_success());

    let invalid = block_on(fetcher.load());
    assert_eq!(invalid.category(), Some(HttpErrorCategory::InvalidContent));
    assert_eq!(invalid.fallback().map(String::as_str), Some("v1"));
    assert!(!invalid.is_retryable());

    // the cache still answers for the old etag
    let recovered = block_on(fetcher.load());
    assert_eq!(recovered.content().map(String::as_str), Some("v1"));
    assert_eq!(recovered.status(), Some(304));
    assert_eq!(block_on(fetcher.last_etag()), Some("\"e1\"".to_string()));
}

#[test]
fn transport_errors_become_network_failures() {
    let dispatch = ScriptedDispatch::script([network_error()]);
    let fetcher = fetcher(dispatch);

    let result = block_on(fetcher.load());
    assert_eq!(result.category(), Some(HttpErrorCategory::NetworkError));
    assert!(result.is_retryable());
    assert_eq!(fetcher.status(), LoaderStatus::Error);
}

#[test]
fn retry_recovers_across_transport_failures() {
    let dispatch = ScriptedDispatch::script([
        network_error(),
        network_error(),
        ok_response("ok", None),
    ]);
    let fetcher = ResilientFetcher::new(
        dispatch.clone(),
        StringConverter::new(),
        RetryStrategy::new(InstantScheduler).with_jitter_factor(0.0),
        url(),
    );

    let result = block_on(fetcher.load());
    assert_eq!(result.content().map(String::as_str), Some("ok"));
    assert_eq!(dispatch.requests().len(), 3);
    assert_eq!(fetcher.status(), LoaderStatus::Ok);
}

#[test]
fn non_idempotent_methods_do_not_retry_by_default() {
    let dispatch = ScriptedDispatch::script([network_error(), ok_response("ok", None)]);
    let fetcher = ResilientFetcher::new(
        dispatch.clone(),
        StringConverter::new(),
        RetryStrategy::new(InstantScheduler).with_jitter_factor(0.0),
        url(),
    )
    .with_method(Method::Post);

    let result = block_on(fetcher.load());
    assert!(!result.is_success());
    assert_eq!(dispatch.requests().len(), 1);
}

#[test]
fn non_idempotent_retry_is_an_explicit_opt_in() {
    let dispatch = ScriptedDispatch::script([network_error(), ok_response("ok", None)]);
    let fetcher = ResilientFetcher::new(
        dispatch.clone(),
        StringConverter::new(),
        RetryStrategy::new(InstantScheduler).with_jitter_factor(0.0),
        url(),
    )
    .with_method(Method::Post)
    .retry_non_idempotent(true);

    let result = block_on(fetcher.load());
    assert!(result.is_success());
    assert_eq!(dispatch.requests().len(), 2);
}

#[test]
fn converter_content_type_is_sent_as_accept() {
    let dispatch = ScriptedDispatch::script([ok_response("{}", None)]);
    let fetcher = ResilientFetcher::new(
        dispatch.clone(),
        CountingConverter::default(),
        RetryStrategy::none(InstantScheduler),
        url(),
    );

    assert!(block_on(fetcher.load()).is_success());
    assert_eq!(
        dispatch.requests()[0].headers().get("Accept"),
        Some("application/json")
    );
}

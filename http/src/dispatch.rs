use crate::{BodyFormat, Method, Request, Response, Result, StatusFamily, TlsPolicy};
use std::{future::Future, sync::Arc, time::Duration};
use url::Url;

/// The transport seam.
///
/// Everything that actually moves bytes implements this trait; the rest of
/// the toolkit is written against it and never assumes a specific transport
/// library. Transport faults surface as [`Error::Io`][crate::Error::Io];
/// interruption and peer hangup as [`Error::Closed`][crate::Error::Closed].
pub trait Dispatch: Send + Sync {
    /// Dispatch a request, reading the response body according to `format`.
    fn send(
        &self,
        request: Request,
        format: BodyFormat,
    ) -> impl Future<Output = Result<Response>> + Send;

    /// Issue a HEAD request to `url` and classify the response status.
    fn ping_head(&self, url: Url) -> impl Future<Output = Result<StatusFamily>> + Send
    where
        Self: Sized,
    {
        async move {
            let response = self
                .send(Request::new(Method::Head, url), BodyFormat::Discard)
                .await?;
            log::debug!("ping (head) classified as {}", response.status_family());
            Ok(response.status_family())
        }
    }

    /// Issue a GET request to `url`, discarding the body, and classify the
    /// response status. For peers that reject HEAD.
    fn ping_get(&self, url: Url) -> impl Future<Output = Result<StatusFamily>> + Send
    where
        Self: Sized,
    {
        async move {
            let response = self
                .send(Request::new(Method::Get, url), BodyFormat::Discard)
                .await?;
            log::debug!("ping (get) classified as {}", response.status_family());
            Ok(response.status_family())
        }
    }
}

impl<T: Dispatch + ?Sized> Dispatch for Arc<T> {
    fn send(
        &self,
        request: Request,
        format: BodyFormat,
    ) -> impl Future<Output = Result<Response>> + Send {
        (**self).send(request, format)
    }
}

/// Configuration consumed by concrete [`Dispatch`] implementations.
///
/// The timeouts here belong to the transport; retry machinery layers no
/// additional deadline on top of them.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    base: Url,
    connect_timeout: Duration,
    read_timeout: Duration,
    tls: Option<TlsPolicy>,
}

impl DispatchConfig {
    /// construct a config for this base url with default timeouts
    pub fn new(base: Url) -> Self {
        Self {
            base,
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(30),
            tls: None,
        }
    }

    /// chainable setter for the connect timeout (default 10s)
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// chainable setter for the read timeout (default 30s)
    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// chainable setter for the tls policy the transport must enforce
    #[must_use]
    pub fn with_tls(mut self, tls: TlsPolicy) -> Self {
        self.tls = Some(tls);
        self
    }

    /// the base url requests are resolved against
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// the connect timeout
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// the read timeout
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// the tls policy, if one was supplied
    pub fn tls(&self) -> Option<&TlsPolicy> {
        self.tls.as_ref()
    }
}

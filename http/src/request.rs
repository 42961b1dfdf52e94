use crate::{Headers, Method};
use url::Url;

/// An assembled outbound request.
///
/// Owned and cheap to rebuild; the retry machinery constructs a fresh
/// `Request` per attempt rather than reusing a dispatched one.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    url: Url,
    headers: Headers,
}

impl Request {
    /// construct a new request for this method and target
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: Headers::new(),
        }
    }

    /// chainable setter to add a request header
    #[must_use]
    pub fn with_header(mut self, name: impl Into<crate::HeaderName>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// this request's method
    pub fn method(&self) -> Method {
        self.method
    }

    /// this request's target url
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// borrow the request headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// mutably borrow the request headers
    pub fn headers_mut(&mut self) -> &mut Headers {
        &mut self.headers
    }
}

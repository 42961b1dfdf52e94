use crate::{ETAG, Headers, ReceivedBody, StatusFamily};

/// A fully received inbound response.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    headers: Headers,
    body: ReceivedBody,
}

impl Response {
    /// construct a response from its parts
    pub fn new(status: u16, headers: Headers, body: ReceivedBody) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// the numeric status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// the class of the status code
    pub fn status_family(&self) -> StatusFamily {
        StatusFamily::of(self.status)
    }

    /// borrow the response headers
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// The `ETag` header value, verbatim.
    ///
    /// Weak validators keep their `W/` prefix; the value is opaque to this
    /// toolkit and is only ever echoed back in `If-None-Match`.
    pub fn etag(&self) -> Option<&str> {
        self.headers.get(ETAG)
    }

    /// borrow the response body
    pub fn body(&self) -> &ReceivedBody {
        &self.body
    }

    /// consume this response, returning its body
    pub fn into_body(self) -> ReceivedBody {
        self.body
    }
}

#[cfg(test)]
mod test {
    use super::Response;
    use crate::{Headers, ReceivedBody, StatusFamily};
    use pretty_assertions::assert_eq;

    #[test]
    fn etag_is_verbatim() {
        let mut headers = Headers::new();
        headers.insert("etag", "W/\"weak\"");
        let response = Response::new(200, headers, ReceivedBody::from("body"));
        assert_eq!(response.etag(), Some("W/\"weak\""));
        assert_eq!(response.status_family(), StatusFamily::Success);
    }
}

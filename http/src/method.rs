use std::{
    fmt::{self, Display},
    str::FromStr,
};

/// HTTP request methods.
///
/// Only the verbs this toolkit dispatches are represented. See [Mozilla's
/// documentation][Mozilla docs] and [RFC7231, Section 4][].
///
/// [Mozilla docs]: https://developer.mozilla.org/en-US/docs/Web/HTTP/Methods
/// [RFC7231, Section 4]: https://tools.ietf.org/html/rfc7231#section-4
#[non_exhaustive]
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Method {
    /// The GET method requests transfer of a current selected representation
    /// for the target resource.
    ///
    /// See [RFC7231, Section 4.3.1][].
    ///
    /// [RFC7231, Section 4.3.1]: https://tools.ietf.org/html/rfc7231#section-4.3.1
    Get,

    /// The POST method requests that the target resource process the
    /// representation enclosed in the request according to the resource's own
    /// specific semantics.
    ///
    /// See [RFC7231, Section 4.3.3][].
    ///
    /// [RFC7231, Section 4.3.3]: https://tools.ietf.org/html/rfc7231#section-4.3.3
    Post,

    /// The PUT method requests that the state of the target resource be
    /// created or replaced with the state defined by the representation
    /// enclosed in the request message payload.
    ///
    /// See [RFC7231, Section 4.3.4][].
    ///
    /// [RFC7231, Section 4.3.4]: https://tools.ietf.org/html/rfc7231#section-4.3.4
    Put,

    /// The DELETE method requests that the origin server remove the
    /// association between the target resource and its current functionality.
    ///
    /// See [RFC7231, Section 4.3.5][].
    ///
    /// [RFC7231, Section 4.3.5]: https://tools.ietf.org/html/rfc7231#section-4.3.5
    Delete,

    /// The PATCH method requests that a set of changes described in the
    /// request entity be applied to the resource identified by the
    /// Request-URI.
    ///
    /// See [RFC5789, Section 2][].
    ///
    /// [RFC5789, Section 2]: https://tools.ietf.org/html/rfc5789#section-2
    Patch,

    /// The HEAD method is identical to GET except that the server MUST NOT
    /// send a message body in the response.
    ///
    /// See [RFC7231, Section 4.3.2][].
    ///
    /// [RFC7231, Section 4.3.2]: https://tools.ietf.org/html/rfc7231#section-4.3.2
    Head,

    /// The OPTIONS method requests information about the communication
    /// options available for the target resource.
    ///
    /// See [RFC7231, Section 4.3.7][].
    ///
    /// [RFC7231, Section 4.3.7]: https://tools.ietf.org/html/rfc7231#section-4.3.7
    Options,
}

impl Method {
    /// predicate that returns whether this method is considered "safe".
    ///
    /// > Request methods are considered "safe" if their defined semantics are
    /// > essentially read-only; i.e., the client does not request, and does
    /// > not expect, any state change on the origin server as a result of
    /// > applying a safe method to a target resource.
    ///
    /// See [RFC7231, Section 4.2.1][].
    ///
    /// [RFC7231, Section 4.2.1]: https://tools.ietf.org/html/rfc7231#section-4.2.1
    pub const fn is_safe(&self) -> bool {
        matches!(self, Method::Get | Method::Head | Method::Options)
    }

    /// predicate that returns whether this method is considered "idempotent".
    ///
    /// > A request method is considered "idempotent" if the intended effect on
    /// > the server of multiple identical requests with that method is the
    /// > same as the effect for a single such request.
    ///
    /// See [RFC7231, Section 4.2.2][].
    ///
    /// [RFC7231, Section 4.2.2]: https://tools.ietf.org/html/rfc7231#section-4.2.2
    pub const fn is_idempotent(&self) -> bool {
        self.is_safe() || matches!(self, Method::Put | Method::Delete)
    }

    /// the uppercase wire representation of this method
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match &*s.to_ascii_uppercase() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            "PATCH" => Ok(Self::Patch),
            "HEAD" => Ok(Self::Head),
            "OPTIONS" => Ok(Self::Options),
            _ => Err(crate::Error::UnrecognizedMethod(s.to_string())),
        }
    }
}

impl<'a> TryFrom<&'a str> for Method {
    type Error = crate::Error;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        Self::from_str(value)
    }
}

impl AsRef<str> for Method {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

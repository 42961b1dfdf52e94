use std::fmt::{self, Display};

/// The class of an HTTP response status code.
///
/// As defined by [rfc7231 section 6](https://tools.ietf.org/html/rfc7231#section-6),
/// the first digit of the status code defines the class of response. The
/// fetch machinery in this toolkit branches on the class, never on
/// individual codes, so only the class is represented.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum StatusFamily {
    /// 1xx: the request was received, continuing process
    Informational,

    /// 2xx: the request was successfully received, understood, and accepted
    Success,

    /// 3xx: further action needs to be taken in order to complete the request
    Redirection,

    /// 4xx: the request contains bad syntax or cannot be fulfilled
    ClientError,

    /// 5xx: the server failed to fulfill an apparently valid request
    ServerError,

    /// a code outside of 100..=599
    Unknown,
}

impl StatusFamily {
    /// classify a status code by its hundreds digit
    pub const fn of(code: u16) -> Self {
        match code {
            100..=199 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }

    /// returns true if the code is within the registered range 100..=599
    pub const fn is_valid_code(code: u16) -> bool {
        matches!(code, 100..=599)
    }

    /// returns true for the 2xx class
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// returns true for the 3xx class
    pub const fn is_redirection(&self) -> bool {
        matches!(self, Self::Redirection)
    }

    /// returns true for the 4xx class
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::ClientError)
    }

    /// returns true for the 5xx class
    pub const fn is_server_error(&self) -> bool {
        matches!(self, Self::ServerError)
    }
}

impl From<u16> for StatusFamily {
    fn from(code: u16) -> Self {
        Self::of(code)
    }
}

impl Display for StatusFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Informational => "1xx",
            Self::Success => "2xx",
            Self::Redirection => "3xx",
            Self::ClientError => "4xx",
            Self::ServerError => "5xx",
            Self::Unknown => "unknown",
        })
    }
}

use std::io;
use thiserror::Error;

/// Concrete errors that occur within parapet's HTTP vocabulary and the
/// transports that implement [`Dispatch`][crate::Dispatch]
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// [`std::io::Error`]
    #[error(transparent)]
    Io(#[from] io::Error),

    /// the transport was interrupted or the peer closed the connection
    #[error("Connection closed")]
    Closed,

    /// we were unable to parse a header name
    #[error("Invalid or unparseable header name: {0}")]
    MalformedHeaderName(String),

    /// we were unable to parse this method
    #[error("Unsupported method {0}")]
    UnrecognizedMethod(String),

    /// this error describes a request target that is not an absolute http or
    /// https url
    #[error("Unexpected uri format")]
    UnexpectedUriFormat,

    /// a tls policy that would permit a forbidden or unknown protocol version
    #[error("Insecure tls policy: {0}")]
    InsecureTlsPolicy(&'static str),

    /// a status code outside of 100..=599
    #[error("Invalid status code {0}")]
    InvalidStatusCode(u16),
}

/// this crate's result type
pub type Result<T> = std::result::Result<T, Error>;

/*!
Shared http vocabulary for the parapet toolkit.

This crate holds the types that the rest of the workspace speaks in:
[`Method`], [`StatusFamily`], [`Headers`], [`Request`]/[`Response`], and the
[`Dispatch`] seam that concrete transports implement. It deliberately contains
no transport of its own.
*/
#![forbid(unsafe_code)]
#![deny(
    missing_copy_implementations,
    rustdoc::missing_crate_level_docs,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    unused_qualifications
)]

mod error;
pub use error::{Error, Result};

mod method;
pub use method::Method;

mod status_family;
pub use status_family::StatusFamily;

mod headers;
pub use headers::{ACCEPT, CONTENT_TYPE, ETAG, HeaderName, Headers, IF_NONE_MATCH};

mod body;
pub use body::{BodyFormat, ReceivedBody};

mod request;
pub use request::Request;

mod response;
pub use response::Response;

mod dispatch;
pub use dispatch::{Dispatch, DispatchConfig};

mod tls;
pub use tls::{TlsPolicy, TlsVersion};

pub use url::Url;

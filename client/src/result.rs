use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

/// Classification of fetch failures.
///
/// The category determines retry behavior: transient categories
/// ([`NetworkError`][Self::NetworkError], [`ServerError`][Self::ServerError])
/// are worth another attempt, the rest never are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpErrorCategory {
    /// transport faults: connect failures, resets, interruptions
    NetworkError,

    /// 4xx responses
    ClientError,

    /// 5xx responses (and statuses this client cannot make sense of)
    ServerError,

    /// the response arrived but could not be converted
    InvalidContent,

    /// the fetcher was assembled inconsistently
    ConfigurationError,
}

impl HttpErrorCategory {
    /// whether another attempt could plausibly succeed
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::NetworkError | Self::ServerError)
    }

    /// a stable kebab-case name for log text
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NetworkError => "network-error",
            Self::ClientError => "client-error",
            Self::ServerError => "server-error",
            Self::InvalidContent => "invalid-content",
            Self::ConfigurationError => "configuration-error",
        }
    }
}

impl Display for HttpErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outcome of a fetch.
///
/// A sealed sum type: consumers branch on the variant, never on nullable
/// fields. Only [`Success`][Self::Success] guarantees content; a
/// [`Failure`][Self::Failure] may still carry stale content as
/// `fallback` for graceful degradation.
#[derive(Debug, Clone)]
pub enum HttpResult<T> {
    /// the fetch produced usable content
    Success {
        /// the converted content
        content: T,

        /// the etag the server attached, for the next conditional request
        etag: Option<String>,

        /// the http status (200-class, or 304 when served from cache)
        status: u16,
    },

    /// the fetch failed
    Failure {
        /// what went wrong, for humans
        message: String,

        /// the underlying error, when one exists
        cause: Option<Arc<dyn StdError + Send + Sync>>,

        /// the failure classification driving retry decisions
        category: HttpErrorCategory,

        /// stale content from the last success, when available
        fallback: Option<T>,

        /// the etag associated with the fallback content
        etag: Option<String>,

        /// the http status, when the failure came from a response
        status: Option<u16>,
    },
}

impl<T> HttpResult<T> {
    /// construct a success
    pub fn success(content: T, etag: Option<String>, status: u16) -> Self {
        Self::Success {
            content,
            etag,
            status,
        }
    }

    /// construct a failure with no cause, fallback or status
    pub fn failure(message: impl Into<String>, category: HttpErrorCategory) -> Self {
        Self::Failure {
            message: message.into(),
            cause: None,
            category,
            fallback: None,
            etag: None,
            status: None,
        }
    }

    /// chainable setter for the underlying cause (no effect on a success)
    #[must_use]
    pub fn with_cause(mut self, new_cause: impl StdError + Send + Sync + 'static) -> Self {
        if let Self::Failure { cause, .. } = &mut self {
            *cause = Some(Arc::new(new_cause));
        }
        self
    }

    /// chainable setter for fallback content (no effect on a success)
    #[must_use]
    pub fn with_fallback(mut self, new_fallback: Option<T>) -> Self {
        if let Self::Failure { fallback, .. } = &mut self {
            *fallback = new_fallback;
        }
        self
    }

    /// chainable setter for the failure status (no effect on a success)
    #[must_use]
    pub fn with_status(mut self, new_status: u16) -> Self {
        if let Self::Failure { status, .. } = &mut self {
            *status = Some(new_status);
        }
        self
    }

    /// chainable setter for the failure etag (no effect on a success)
    #[must_use]
    pub fn with_etag(mut self, new_etag: Option<String>) -> Self {
        if let Self::Failure { etag, .. } = &mut self {
            *etag = new_etag;
        }
        self
    }

    /// whether this is a [`Success`][Self::Success]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// whether this is a failure in a retryable category
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Failure { category, .. } if category.is_retryable())
    }

    /// the content, for successes
    pub fn content(&self) -> Option<&T> {
        match self {
            Self::Success { content, .. } => Some(content),
            Self::Failure { .. } => None,
        }
    }

    /// the stale fallback content, for failures that carry one
    pub fn fallback(&self) -> Option<&T> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { fallback, .. } => fallback.as_ref(),
        }
    }

    /// the etag, from either variant
    pub fn etag(&self) -> Option<&str> {
        match self {
            Self::Success { etag, .. } | Self::Failure { etag, .. } => etag.as_deref(),
        }
    }

    /// the http status, when one is known
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Success { status, .. } => Some(*status),
            Self::Failure { status, .. } => *status,
        }
    }

    /// the failure category, for failures
    pub fn category(&self) -> Option<HttpErrorCategory> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { category, .. } => Some(*category),
        }
    }

    /// the failure message, for failures
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { message, .. } => Some(message),
        }
    }
}

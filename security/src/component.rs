use std::fmt::{self, Display};

/// The request component a validator is bound to.
///
/// Each component carries its own character rules, length limit and stage
/// sequence; a [`Pipeline`][crate::Pipeline] is fixed to exactly one
/// component for its whole life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    /// the path portion of a url
    UrlPath,

    /// the name of a query parameter
    ParameterName,

    /// the value of a query parameter
    ParameterValue,

    /// the name of a request header
    HeaderName,

    /// the value of a request header
    HeaderValue,

    /// the name of a cookie
    CookieName,

    /// the value of a cookie
    CookieValue,

    /// a request body
    Body,
}

impl Component {
    /// returns true for [`Component::UrlPath`]
    pub const fn is_path(&self) -> bool {
        matches!(self, Self::UrlPath)
    }

    /// returns true for parameter names and values
    pub const fn is_parameter(&self) -> bool {
        matches!(self, Self::ParameterName | Self::ParameterValue)
    }

    /// returns true for header names and values
    pub const fn is_header(&self) -> bool {
        matches!(self, Self::HeaderName | Self::HeaderValue)
    }

    /// returns true for cookie names and values
    pub const fn is_cookie(&self) -> bool {
        matches!(self, Self::CookieName | Self::CookieValue)
    }

    /// returns true for [`Component::Body`]
    pub const fn is_body(&self) -> bool {
        matches!(self, Self::Body)
    }

    /// a stable kebab-case name for log and error text
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UrlPath => "url-path",
            Self::ParameterName => "parameter-name",
            Self::ParameterValue => "parameter-value",
            Self::HeaderName => "header-name",
            Self::HeaderValue => "header-value",
            Self::CookieName => "cookie-name",
            Self::CookieValue => "cookie-value",
            Self::Body => "body",
        }
    }
}

impl Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

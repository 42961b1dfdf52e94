use crate::Component;
use hashbrown::HashSet;
use thiserror::Error;

/// An invalid [`SecurityConfigBuilder`] was finalized.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// every length limit must be positive
    #[error("{0} must be positive")]
    NonPositiveLimit(&'static str),
}

/// Immutable validation policy.
///
/// Limits, allow/block sets and feature flags consumed by the stages and
/// validators. Construct through [`SecurityConfig::builder`] or one of the
/// presets ([`strict`][SecurityConfig::strict],
/// [`default`][SecurityConfig::default],
/// [`lenient`][SecurityConfig::lenient]). All sets are fixed at build time;
/// when comparisons are case-insensitive, lowercase copies are precomputed
/// so membership checks stay O(1) without per-call allocation.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    max_path_length: usize,
    max_parameter_name_length: usize,
    max_parameter_value_length: usize,
    max_header_name_length: usize,
    max_header_value_length: usize,
    max_cookie_name_length: usize,
    max_cookie_value_length: usize,
    max_body_length: usize,
    max_parameter_count: usize,
    max_header_count: usize,
    max_cookie_count: usize,
    allowed_header_names: Option<HashSet<String>>,
    blocked_header_names: Option<HashSet<String>>,
    allowed_content_types: Option<HashSet<String>>,
    blocked_content_types: Option<HashSet<String>>,
    allowed_header_names_lower: Option<HashSet<String>>,
    blocked_header_names_lower: Option<HashSet<String>>,
    allowed_content_types_lower: Option<HashSet<String>>,
    blocked_content_types_lower: Option<HashSet<String>>,
    allow_path_traversal: bool,
    allow_double_encoding: bool,
    allow_null_bytes: bool,
    allow_control_characters: bool,
    allow_extended_ascii: bool,
    normalize_unicode: bool,
    case_sensitive_comparison: bool,
    fail_on_suspicious_patterns: bool,
    require_secure_cookies: bool,
    require_http_only_cookies: bool,
}

impl SecurityConfig {
    /// a builder initialized with the [`default`][SecurityConfig::default]
    /// preset
    pub fn builder() -> SecurityConfigBuilder {
        SecurityConfigBuilder::default()
    }

    /// The restrictive preset: small limits, nothing relaxed, secure and
    /// http-only cookies required.
    pub fn strict() -> Self {
        SecurityConfigBuilder::default()
            .max_path_length(1024)
            .max_parameter_name_length(64)
            .max_parameter_value_length(1024)
            .max_header_name_length(128)
            .max_header_value_length(4096)
            .max_cookie_name_length(128)
            .max_cookie_value_length(2048)
            .max_body_length(64 * 1024)
            .max_parameter_count(50)
            .max_header_count(50)
            .max_cookie_count(20)
            .require_secure_cookies(true)
            .require_http_only_cookies(true)
            .build()
            .expect("preset limits are positive")
    }

    /// The permissive preset: large limits, extended ascii and double
    /// encoding tolerated, suspicious patterns counted but not fatal.
    pub fn lenient() -> Self {
        SecurityConfigBuilder::default()
            .max_path_length(8192)
            .max_parameter_name_length(256)
            .max_parameter_value_length(8192)
            .max_header_name_length(512)
            .max_header_value_length(16 * 1024)
            .max_cookie_name_length(512)
            .max_cookie_value_length(8192)
            .max_body_length(10 * 1024 * 1024)
            .max_parameter_count(256)
            .max_header_count(256)
            .max_cookie_count(100)
            .allow_double_encoding(true)
            .allow_extended_ascii(true)
            .fail_on_suspicious_patterns(false)
            .build()
            .expect("preset limits are positive")
    }

    /// the length limit for this component
    pub fn max_length(&self, component: Component) -> usize {
        match component {
            Component::UrlPath => self.max_path_length,
            Component::ParameterName => self.max_parameter_name_length,
            Component::ParameterValue => self.max_parameter_value_length,
            Component::HeaderName => self.max_header_name_length,
            Component::HeaderValue => self.max_header_value_length,
            Component::CookieName => self.max_cookie_name_length,
            Component::CookieValue => self.max_cookie_value_length,
            Component::Body => self.max_body_length,
        }
    }

    /// the maximum number of query parameters per request
    pub fn max_parameter_count(&self) -> usize {
        self.max_parameter_count
    }

    /// the maximum number of headers per request
    pub fn max_header_count(&self) -> usize {
        self.max_header_count
    }

    /// the maximum number of cookies per request
    pub fn max_cookie_count(&self) -> usize {
        self.max_cookie_count
    }

    /// whether `..` resolution may escape the root without failing
    pub fn allow_path_traversal(&self) -> bool {
        self.allow_path_traversal
    }

    /// whether percent escapes surviving a decode round are tolerated
    pub fn allow_double_encoding(&self) -> bool {
        self.allow_double_encoding
    }

    /// whether NUL bytes are tolerated in bodies
    pub fn allow_null_bytes(&self) -> bool {
        self.allow_null_bytes
    }

    /// whether control characters are tolerated in bodies
    pub fn allow_control_characters(&self) -> bool {
        self.allow_control_characters
    }

    /// whether code points at or above 0x80 are tolerated
    pub fn allow_extended_ascii(&self) -> bool {
        self.allow_extended_ascii
    }

    /// whether the normalization stage applies unicode NFC
    pub fn normalize_unicode(&self) -> bool {
        self.normalize_unicode
    }

    /// whether set membership and pattern matching are case sensitive
    pub fn case_sensitive_comparison(&self) -> bool {
        self.case_sensitive_comparison
    }

    /// whether a matched attack signature stops the pipeline
    pub fn fail_on_suspicious_patterns(&self) -> bool {
        self.fail_on_suspicious_patterns
    }

    /// whether every cookie must carry the `Secure` attribute
    pub fn require_secure_cookies(&self) -> bool {
        self.require_secure_cookies
    }

    /// whether every cookie must carry the `HttpOnly` attribute
    pub fn require_http_only_cookies(&self) -> bool {
        self.require_http_only_cookies
    }

    /// Whether this header name passes the allow/block sets. An absent
    /// allow set admits everything not blocked.
    pub fn is_header_name_permitted(&self, name: &str) -> bool {
        self.permitted(
            name,
            &self.allowed_header_names,
            &self.allowed_header_names_lower,
            &self.blocked_header_names,
            &self.blocked_header_names_lower,
        )
    }

    /// Whether this content type (parameters stripped by the caller) passes
    /// the allow/block sets.
    pub fn is_content_type_permitted(&self, content_type: &str) -> bool {
        self.permitted(
            content_type,
            &self.allowed_content_types,
            &self.allowed_content_types_lower,
            &self.blocked_content_types,
            &self.blocked_content_types_lower,
        )
    }

    fn permitted(
        &self,
        value: &str,
        allowed: &Option<HashSet<String>>,
        allowed_lower: &Option<HashSet<String>>,
        blocked: &Option<HashSet<String>>,
        blocked_lower: &Option<HashSet<String>>,
    ) -> bool {
        let contains = |exact: &Option<HashSet<String>>, lower: &Option<HashSet<String>>| {
            if self.case_sensitive_comparison {
                exact.as_ref().is_some_and(|set| set.contains(value))
            } else {
                lower
                    .as_ref()
                    .is_some_and(|set| set.contains(&value.to_ascii_lowercase()))
            }
        };

        if blocked.is_some() && contains(blocked, blocked_lower) {
            return false;
        }

        allowed.is_none() || contains(allowed, allowed_lower)
    }
}

impl Default for SecurityConfig {
    /// The balanced preset: moderate limits, unicode normalization on,
    /// suspicious patterns fatal, cookie attribute requirements off.
    fn default() -> Self {
        SecurityConfigBuilder::default()
            .build()
            .expect("preset limits are positive")
    }
}

/// Builder for [`SecurityConfig`].
///
/// Starts from the default preset; every setter is chainable. Length limits
/// are validated at [`build`][SecurityConfigBuilder::build].
#[derive(Debug, Clone)]
#[must_use]
pub struct SecurityConfigBuilder {
    max_path_length: usize,
    max_parameter_name_length: usize,
    max_parameter_value_length: usize,
    max_header_name_length: usize,
    max_header_value_length: usize,
    max_cookie_name_length: usize,
    max_cookie_value_length: usize,
    max_body_length: usize,
    max_parameter_count: usize,
    max_header_count: usize,
    max_cookie_count: usize,
    allowed_header_names: Option<HashSet<String>>,
    blocked_header_names: Option<HashSet<String>>,
    allowed_content_types: Option<HashSet<String>>,
    blocked_content_types: Option<HashSet<String>>,
    allow_path_traversal: bool,
    allow_double_encoding: bool,
    allow_null_bytes: bool,
    allow_control_characters: bool,
    allow_extended_ascii: bool,
    normalize_unicode: bool,
    case_sensitive_comparison: bool,
    fail_on_suspicious_patterns: bool,
    require_secure_cookies: bool,
    require_http_only_cookies: bool,
}

impl Default for SecurityConfigBuilder {
    fn default() -> Self {
        Self {
            max_path_length: 4096,
            max_parameter_name_length: 128,
            max_parameter_value_length: 2048,
            max_header_name_length: 256,
            max_header_value_length: 8192,
            max_cookie_name_length: 256,
            max_cookie_value_length: 4096,
            max_body_length: 1024 * 1024,
            max_parameter_count: 100,
            max_header_count: 100,
            max_cookie_count: 50,
            allowed_header_names: None,
            blocked_header_names: None,
            allowed_content_types: None,
            blocked_content_types: None,
            allow_path_traversal: false,
            allow_double_encoding: false,
            allow_null_bytes: false,
            allow_control_characters: false,
            allow_extended_ascii: false,
            normalize_unicode: true,
            case_sensitive_comparison: false,
            fail_on_suspicious_patterns: true,
            require_secure_cookies: false,
            require_http_only_cookies: false,
        }
    }
}

macro_rules! limit_setter {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub fn $name(mut self, $name: usize) -> Self {
            self.$name = $name;
            self
        }
    };
}

macro_rules! flag_setter {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        pub fn $name(mut self, $name: bool) -> Self {
            self.$name = $name;
            self
        }
    };
}

impl SecurityConfigBuilder {
    limit_setter!(
        /// length limit for url paths
        max_path_length
    );
    limit_setter!(
        /// length limit for parameter names
        max_parameter_name_length
    );
    limit_setter!(
        /// length limit for parameter values
        max_parameter_value_length
    );
    limit_setter!(
        /// length limit for header names
        max_header_name_length
    );
    limit_setter!(
        /// length limit for header values
        max_header_value_length
    );
    limit_setter!(
        /// length limit for cookie names
        max_cookie_name_length
    );
    limit_setter!(
        /// length limit for cookie values
        max_cookie_value_length
    );
    limit_setter!(
        /// length limit for request bodies
        max_body_length
    );
    limit_setter!(
        /// maximum number of query parameters (zero forbids parameters)
        max_parameter_count
    );
    limit_setter!(
        /// maximum number of headers (zero forbids headers)
        max_header_count
    );
    limit_setter!(
        /// maximum number of cookies (zero forbids cookies)
        max_cookie_count
    );

    flag_setter!(
        /// tolerate `..` resolution escaping the root
        allow_path_traversal
    );
    flag_setter!(
        /// tolerate percent escapes that survive a decode round
        allow_double_encoding
    );
    flag_setter!(
        /// tolerate NUL bytes in bodies
        allow_null_bytes
    );
    flag_setter!(
        /// tolerate control characters in bodies
        allow_control_characters
    );
    flag_setter!(
        /// tolerate code points at or above 0x80
        allow_extended_ascii
    );
    flag_setter!(
        /// apply unicode NFC in the normalization stage
        normalize_unicode
    );
    flag_setter!(
        /// make set membership and pattern matching case sensitive
        case_sensitive_comparison
    );
    flag_setter!(
        /// stop the pipeline when an attack signature matches
        fail_on_suspicious_patterns
    );
    flag_setter!(
        /// require the `Secure` attribute on every cookie
        require_secure_cookies
    );
    flag_setter!(
        /// require the `HttpOnly` attribute on every cookie
        require_http_only_cookies
    );

    /// restrict header names to this set (in addition to the block set)
    pub fn allowed_header_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_header_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// reject header names in this set
    pub fn blocked_header_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocked_header_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// restrict content types to this set (in addition to the block set)
    pub fn allowed_content_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_content_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// reject content types in this set
    pub fn blocked_content_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.blocked_content_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Finalize the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NonPositiveLimit`] if any length limit is
    /// zero. Counts may be zero.
    pub fn build(self) -> Result<SecurityConfig, ConfigError> {
        for (limit, name) in [
            (self.max_path_length, "max_path_length"),
            (self.max_parameter_name_length, "max_parameter_name_length"),
            (
                self.max_parameter_value_length,
                "max_parameter_value_length",
            ),
            (self.max_header_name_length, "max_header_name_length"),
            (self.max_header_value_length, "max_header_value_length"),
            (self.max_cookie_name_length, "max_cookie_name_length"),
            (self.max_cookie_value_length, "max_cookie_value_length"),
            (self.max_body_length, "max_body_length"),
        ] {
            if limit == 0 {
                return Err(ConfigError::NonPositiveLimit(name));
            }
        }

        let lower = |set: &Option<HashSet<String>>| {
            if self.case_sensitive_comparison {
                None
            } else {
                set.as_ref()
                    .map(|set| set.iter().map(|value| value.to_ascii_lowercase()).collect())
            }
        };

        Ok(SecurityConfig {
            allowed_header_names_lower: lower(&self.allowed_header_names),
            blocked_header_names_lower: lower(&self.blocked_header_names),
            allowed_content_types_lower: lower(&self.allowed_content_types),
            blocked_content_types_lower: lower(&self.blocked_content_types),
            max_path_length: self.max_path_length,
            max_parameter_name_length: self.max_parameter_name_length,
            max_parameter_value_length: self.max_parameter_value_length,
            max_header_name_length: self.max_header_name_length,
            max_header_value_length: self.max_header_value_length,
            max_cookie_name_length: self.max_cookie_name_length,
            max_cookie_value_length: self.max_cookie_value_length,
            max_body_length: self.max_body_length,
            max_parameter_count: self.max_parameter_count,
            max_header_count: self.max_header_count,
            max_cookie_count: self.max_cookie_count,
            allowed_header_names: self.allowed_header_names,
            blocked_header_names: self.blocked_header_names,
            allowed_content_types: self.allowed_content_types,
            blocked_content_types: self.blocked_content_types,
            allow_path_traversal: self.allow_path_traversal,
            allow_double_encoding: self.allow_double_encoding,
            allow_null_bytes: self.allow_null_bytes,
            allow_control_characters: self.allow_control_characters,
            allow_extended_ascii: self.allow_extended_ascii,
            normalize_unicode: self.normalize_unicode,
            case_sensitive_comparison: self.case_sensitive_comparison,
            fail_on_suspicious_patterns: self.fail_on_suspicious_patterns,
            require_secure_cookies: self.require_secure_cookies,
            require_http_only_cookies: self.require_http_only_cookies,
        })
    }
}

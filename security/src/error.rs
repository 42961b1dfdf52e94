use crate::{Component, FailureKind, PatternFamily};
use std::error::Error as StdError;
use std::fmt::{self, Display};

const MAX_LOGGED_INPUT: usize = 200;

/// A rejected input, with everything needed to log and count it safely.
///
/// The original input is sanitized at construction: control characters
/// become `?` and the text is clipped to 200 characters, so a
/// `SecurityError` can be rendered into logs without re-opening the
/// injection vector it reports.
#[derive(Debug)]
pub struct SecurityError {
    kind: FailureKind,
    component: Component,
    original_input: String,
    sanitized_input: Option<String>,
    detail: Option<String>,
    pattern_family: Option<PatternFamily>,
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl SecurityError {
    /// construct an error for this kind, component and offending input
    pub fn new(kind: FailureKind, component: Component, input: &str) -> Self {
        Self {
            kind,
            component,
            original_input: sanitize_for_log(input),
            sanitized_input: None,
            detail: None,
            pattern_family: None,
            source: None,
        }
    }

    /// chainable setter for a human-readable detail
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// chainable setter for the sanitized/normalized form, where one exists
    #[must_use]
    pub fn with_sanitized(mut self, sanitized: impl Into<String>) -> Self {
        self.sanitized_input = Some(sanitized.into());
        self
    }

    /// chainable setter for the matched attack family
    #[must_use]
    pub fn with_pattern_family(mut self, family: PatternFamily) -> Self {
        self.pattern_family = Some(family);
        self
    }

    /// chainable setter for an underlying cause
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Re-attribute this error to the component of the reporting pipeline,
    /// preserving kind, input, detail and cause.
    #[must_use]
    pub fn rewrap(mut self, component: Component) -> Self {
        self.component = component;
        self
    }

    /// the kind of violation
    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    /// the component that was being validated
    pub fn component(&self) -> Component {
        self.component
    }

    /// the offending input, control-stripped and clipped for logging
    pub fn original_input(&self) -> &str {
        &self.original_input
    }

    /// the sanitized/normalized form, if the failing stage produced one
    pub fn sanitized_input(&self) -> Option<&str> {
        self.sanitized_input.as_deref()
    }

    /// the human-readable detail, if any
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }

    /// the matched attack family, for suspicious-pattern errors
    pub fn pattern_family(&self) -> Option<PatternFamily> {
        self.pattern_family
    }
}

impl Display for SecurityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {}", self.kind, self.component)?;

        if let Some(family) = self.pattern_family {
            write!(f, " ({family})")?;
        }

        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }

        write!(f, " (input: {:?})", self.original_input)
    }
}

impl StdError for SecurityError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|source| &**source as &(dyn StdError + 'static))
    }
}

/// Prepare untrusted input for inclusion in log or error text: control
/// characters (including DEL) become `?`, and anything beyond 200
/// characters is dropped in favor of a `...` marker.
pub fn sanitize_for_log(input: &str) -> String {
    let mut out = String::with_capacity(input.len().min(MAX_LOGGED_INPUT + 3));
    for (count, c) in input.chars().enumerate() {
        if count == MAX_LOGGED_INPUT {
            out.push_str("...");
            break;
        }
        out.push(if c.is_control() { '?' } else { c });
    }
    out
}

#[cfg(test)]
mod test {
    use super::{SecurityError, sanitize_for_log};
    use crate::{Component, FailureKind};
    use pretty_assertions::assert_eq;

    #[test]
    fn sanitization() {
        assert_eq!(sanitize_for_log("plain"), "plain");
        assert_eq!(sanitize_for_log("a\r\nb\0c"), "a??b?c");
        assert_eq!(sanitize_for_log(&"x".repeat(200)), "x".repeat(200));
        assert_eq!(
            sanitize_for_log(&"x".repeat(201)),
            format!("{}...", "x".repeat(200))
        );
    }

    #[test]
    fn display_is_log_safe() {
        let error = SecurityError::new(
            FailureKind::ControlCharacter,
            Component::HeaderValue,
            "evil\r\nInjected: header",
        )
        .with_detail("control character at position 4");

        let rendered = error.to_string();
        assert!(!rendered.contains('\r'));
        assert!(!rendered.contains('\n'));
        assert!(rendered.contains("control-character in header-value"));
        assert!(rendered.contains("position 4"));
    }

    #[test]
    fn rewrap_preserves_everything_else() {
        let error = SecurityError::new(FailureKind::NullByte, Component::ParameterValue, "a\0")
            .with_detail("null byte at position 1")
            .rewrap(Component::UrlPath);

        assert_eq!(error.component(), Component::UrlPath);
        assert_eq!(error.kind(), FailureKind::NullByte);
        assert_eq!(error.detail(), Some("null byte at position 1"));
    }
}

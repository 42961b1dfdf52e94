use std::fmt::{self, Display};

/// The taxonomy of security violations.
///
/// Every [`SecurityError`][crate::SecurityError] carries exactly one kind,
/// and the [`SecurityEventCounter`][crate::SecurityEventCounter] keeps one
/// monotonic counter per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// `.`/`..` resolution would escape above the root
    PathTraversal,

    /// a literal NUL byte or a `%00` escape
    NullByte,

    /// a malformed percent sequence or undecodable bytes
    InvalidEncoding,

    /// percent escapes that survive a full decoding round
    DoubleEncoding,

    /// a character outside the component's allowed set
    InvalidCharacter,

    /// a control character where none is permitted
    ControlCharacter,

    /// an attack signature matched (see [`PatternFamily`])
    SuspiciousPattern,

    /// input longer than the component's limit
    LengthExceeded,

    /// more elements than the configured limit
    CountExceeded,

    /// a `__Host-`/`__Secure-` cookie without its mandatory attributes
    CookiePrefixViolation,

    /// input that is structurally unusable (empty names, forbidden names)
    InvalidInput,
}

impl FailureKind {
    /// every kind, in counter order
    pub const ALL: [FailureKind; 11] = [
        Self::PathTraversal,
        Self::NullByte,
        Self::InvalidEncoding,
        Self::DoubleEncoding,
        Self::InvalidCharacter,
        Self::ControlCharacter,
        Self::SuspiciousPattern,
        Self::LengthExceeded,
        Self::CountExceeded,
        Self::CookiePrefixViolation,
        Self::InvalidInput,
    ];

    /// the position of this kind within [`FailureKind::ALL`]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// a stable kebab-case name for log and error text
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PathTraversal => "path-traversal",
            Self::NullByte => "null-byte-injection",
            Self::InvalidEncoding => "invalid-encoding",
            Self::DoubleEncoding => "double-encoding",
            Self::InvalidCharacter => "invalid-character",
            Self::ControlCharacter => "control-character",
            Self::SuspiciousPattern => "suspicious-pattern",
            Self::LengthExceeded => "length-exceeded",
            Self::CountExceeded => "count-exceeded",
            Self::CookiePrefixViolation => "cookie-prefix-violation",
            Self::InvalidInput => "invalid-input",
        }
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The family of an attack signature matched by the pattern stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternFamily {
    /// cross-site scripting
    Xss,

    /// sql injection
    Sqli,

    /// shell command injection
    CommandInjection,

    /// ldap filter injection
    Ldap,

    /// dangerous protocol handlers (`javascript:`, `data:`, ...)
    ProtocolHandler,

    /// template expression injection
    Template,

    /// CR/LF header injection
    HeaderInjection,
}

impl PatternFamily {
    /// a stable kebab-case name for log and error text
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Xss => "xss",
            Self::Sqli => "sql-injection",
            Self::CommandInjection => "command-injection",
            Self::Ldap => "ldap-injection",
            Self::ProtocolHandler => "protocol-handler",
            Self::Template => "template-injection",
            Self::HeaderInjection => "header-injection",
        }
    }
}

impl Display for PatternFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod test {
    use super::FailureKind;

    #[test]
    fn indices_match_all() {
        for (position, kind) in FailureKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), position);
        }
    }
}

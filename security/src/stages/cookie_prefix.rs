use crate::{Component, Cookie, FailureKind, SecurityError};

/// Enforces the RFC 6265bis `__Host-`/`__Secure-` cookie name prefixes.
///
/// Unlike the string stages, this operates on a whole [`Cookie`], since the
/// rules couple the name to the attribute suffix. Checks run in a fixed
/// order (Secure, then `Path=/`, then absence of `Domain`) so the reported
/// detail is stable for a given cookie.
#[derive(Debug, Clone, Copy, Default)]
pub struct CookiePrefixStage;

impl CookiePrefixStage {
    /// construct the prefix stage
    pub fn new() -> Self {
        Self
    }

    /// validate a cookie against the prefix rules
    pub fn apply(&self, cookie: &Cookie) -> Result<(), SecurityError> {
        let name = cookie.name();

        if name.is_empty() {
            return Err(SecurityError::new(
                FailureKind::InvalidInput,
                Component::CookieName,
                name,
            )
            .with_detail("cookie name must not be empty"));
        }

        if name.trim() != name {
            return Err(SecurityError::new(
                FailureKind::InvalidCharacter,
                Component::CookieName,
                name,
            )
            .with_detail("cookie name has leading or trailing whitespace"));
        }

        if name.starts_with("__Host-") {
            if !cookie.is_secure() {
                return Err(self.violation(name, "__Host- prefix requires the Secure attribute"));
            }
            if cookie.path().as_deref() != Some("/") {
                return Err(self.violation(name, "__Host- prefix requires Path=/"));
            }
            if cookie.domain().is_some() {
                return Err(self.violation(name, "__Host- prefix forbids the Domain attribute"));
            }
        } else if name.starts_with("__Secure-") && !cookie.is_secure() {
            return Err(self.violation(name, "__Secure- prefix requires the Secure attribute"));
        }

        Ok(())
    }

    fn violation(&self, name: &str, detail: &'static str) -> SecurityError {
        SecurityError::new(
            FailureKind::CookiePrefixViolation,
            Component::CookieName,
            name,
        )
        .with_detail(detail)
    }
}

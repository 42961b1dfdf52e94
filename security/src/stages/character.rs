use crate::{Component, FailureKind, SecurityConfig, SecurityError, stages::Stage};
use memchr::{memchr, memmem};
use std::sync::Arc;

/// Enforces the component's character whitelist.
///
/// Each component admits the character set its RFC grammar admits: the url
/// path and parameter sets come from RFC 3986, header names and values from
/// RFC 7230, cookie names and values from RFC 6265. NUL bytes and `%00`
/// escapes are named explicitly as injection; everything else outside the
/// set is an invalid or control character with its byte offset.
#[derive(Debug, Clone)]
pub struct CharacterStage {
    config: Arc<SecurityConfig>,
    component: Component,
}

fn is_unreserved(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~')
}

fn is_sub_delim(c: char) -> bool {
    matches!(c, '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '=')
}

fn is_tchar(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~'
        )
}

// cookie-octet per RFC 6265: printable ascii minus DQUOTE, comma,
// semicolon and backslash
fn is_cookie_octet(c: char) -> bool {
    matches!(c, '\u{21}' | '\u{23}'..='\u{2b}' | '\u{2d}'..='\u{3a}' | '\u{3c}'..='\u{5b}' | '\u{5d}'..='\u{7e}')
}

impl CharacterStage {
    /// construct a character stage for this component
    pub fn new(config: Arc<SecurityConfig>, component: Component) -> Self {
        Self { config, component }
    }

    fn allows_char(&self, c: char) -> bool {
        match self.component {
            Component::UrlPath => {
                is_unreserved(c) || is_sub_delim(c) || matches!(c, ':' | '@' | '/' | '%')
            }
            Component::ParameterName | Component::ParameterValue => {
                is_unreserved(c) || is_sub_delim(c) || c == '%'
            }
            Component::HeaderName | Component::CookieName => is_tchar(c),
            Component::HeaderValue => c == '\t' || matches!(c, '\u{20}'..='\u{7e}'),
            Component::CookieValue => is_cookie_octet(c),
            Component::Body => true,
        }
    }

    fn null_byte_tolerated(&self) -> bool {
        self.component.is_body() && self.config.allow_null_bytes()
    }

    fn control_tolerated(&self, c: char) -> bool {
        match self.component {
            Component::Body => {
                matches!(c, '\t' | '\r' | '\n') || self.config.allow_control_characters()
            }
            Component::HeaderValue => c == '\t',
            _ => false,
        }
    }

    fn percent_is_escape_lead(&self) -> bool {
        matches!(
            self.component,
            Component::UrlPath | Component::ParameterName | Component::ParameterValue
        )
    }
}

impl Stage for CharacterStage {
    fn apply(&self, input: Option<&str>) -> Result<Option<String>, SecurityError> {
        let Some(input) = input else { return Ok(None) };
        let bytes = input.as_bytes();

        if !self.null_byte_tolerated() {
            if let Some(position) = memchr(0, bytes) {
                return Err(
                    SecurityError::new(FailureKind::NullByte, self.component, input)
                        .with_detail(format!("null byte at position {position}")),
                );
            }

            if let Some(position) = memmem::find(bytes, b"%00") {
                return Err(
                    SecurityError::new(FailureKind::NullByte, self.component, input)
                        .with_detail(format!("null byte at position {position}")),
                );
            }
        }

        for (position, c) in input.char_indices() {
            if c == '\0' {
                // only reachable when null bytes are tolerated
                continue;
            }

            if c.is_ascii_control() {
                if self.control_tolerated(c) {
                    continue;
                }
                return Err(SecurityError::new(
                    FailureKind::ControlCharacter,
                    self.component,
                    input,
                )
                .with_detail(format!("control character at position {position}")));
            }

            if !c.is_ascii() {
                if self.config.allow_extended_ascii() {
                    continue;
                }
                return Err(SecurityError::new(
                    FailureKind::InvalidCharacter,
                    self.component,
                    input,
                )
                .with_detail(format!("non-ascii character at position {position}")));
            }

            if !self.allows_char(c) {
                return Err(SecurityError::new(
                    FailureKind::InvalidCharacter,
                    self.component,
                    input,
                )
                .with_detail(format!("character {c:?} at position {position}")));
            }
        }

        if self.percent_is_escape_lead() {
            let mut i = 0;
            while let Some(offset) = memchr(b'%', &bytes[i..]) {
                let position = i + offset;
                let valid = matches!(
                    (bytes.get(position + 1), bytes.get(position + 2)),
                    (Some(high), Some(low))
                        if high.is_ascii_hexdigit() && low.is_ascii_hexdigit()
                );
                if !valid {
                    return Err(SecurityError::new(
                        FailureKind::InvalidEncoding,
                        self.component,
                        input,
                    )
                    .with_detail(format!(
                        "malformed percent sequence at position {position}"
                    )));
                }
                i = position + 1;
            }
        }

        Ok(Some(input.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::CharacterStage;
    use crate::{Component, FailureKind, SecurityConfig, stages::Stage};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn stage(component: Component) -> CharacterStage {
        CharacterStage::new(Arc::new(SecurityConfig::default()), component)
    }

    #[test]
    fn url_path_charset() {
        let path = stage(Component::UrlPath);
        assert!(path.apply(Some("/api/v1/items:all@host")).is_ok());
        assert!(path.apply(Some("/a%20b")).is_ok());

        let error = path.apply(Some("/a b")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::InvalidCharacter);
        assert!(error.detail().unwrap().contains("position 2"));

        assert!(path.apply(Some("/a<b")).is_err());
    }

    #[test]
    fn parameter_charset_excludes_uri_delimiters() {
        let value = stage(Component::ParameterValue);
        assert!(value.apply(Some("simple-value_1.2~")).is_ok());
        assert!(value.apply(Some("a/b")).is_err());
        assert!(value.apply(Some("a?b")).is_err());
        assert!(value.apply(Some("a#b")).is_err());
        assert!(value.apply(Some("a:b")).is_err());
    }

    #[test]
    fn header_value_allows_visible_ascii_and_blanks() {
        let value = stage(Component::HeaderValue);
        assert!(value.apply(Some("text/html; q=0.9, */*")).is_ok());
        assert!(value.apply(Some("tab\tseparated")).is_ok());

        let error = value.apply(Some("evil\r\ninjected")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::ControlCharacter);
        assert!(error.detail().unwrap().contains("position 4"));
    }

    #[test]
    fn header_name_is_token() {
        let name = stage(Component::HeaderName);
        assert!(name.apply(Some("X-Request-Id")).is_ok());
        assert!(name.apply(Some("Bad Header")).is_err());
        assert!(name.apply(Some("Bad:Header")).is_err());
    }

    #[test]
    fn cookie_value_octets() {
        let value = stage(Component::CookieValue);
        assert!(value.apply(Some("opaque-token_1.2")).is_ok());
        assert!(value.apply(Some("has space")).is_err());
        assert!(value.apply(Some("has\"quote")).is_err());
        assert!(value.apply(Some("has;semicolon")).is_err());
        assert!(value.apply(Some("has\\backslash")).is_err());
    }

    #[test]
    fn null_bytes_are_named_with_position() {
        let path = stage(Component::UrlPath);

        let error = path.apply(Some("/ok\0evil")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::NullByte);
        assert!(error.detail().unwrap().contains("position 3"));

        let error = path.apply(Some("/ok%00evil")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::NullByte);
        assert!(error.detail().unwrap().contains("position 3"));
    }

    #[test]
    fn extended_ascii_is_gated() {
        let strict = stage(Component::ParameterValue);
        let error = strict.apply(Some("caf\u{e9}")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::InvalidCharacter);

        let relaxed = CharacterStage::new(
            Arc::new(
                SecurityConfig::builder()
                    .allow_extended_ascii(true)
                    .build()
                    .unwrap(),
            ),
            Component::ParameterValue,
        );
        assert!(relaxed.apply(Some("caf\u{e9}")).is_ok());
    }

    #[test]
    fn body_controls_are_gated() {
        let body = stage(Component::Body);
        assert!(body.apply(Some("line one\r\nline two\ttabbed")).is_ok());
        assert!(body.apply(Some("bell\u{7}")).is_err());

        let relaxed = CharacterStage::new(
            Arc::new(
                SecurityConfig::builder()
                    .allow_control_characters(true)
                    .build()
                    .unwrap(),
            ),
            Component::Body,
        );
        assert!(relaxed.apply(Some("bell\u{7}")).is_ok());
    }

    #[test]
    fn dangling_percent_in_parameter() {
        let value = stage(Component::ParameterValue);
        let error = value.apply(Some("a%2")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::InvalidEncoding);
        assert!(value.apply(Some("a%2f")).is_ok());
    }
}

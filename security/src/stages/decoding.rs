use crate::{Component, FailureKind, SecurityConfig, SecurityError, stages::Stage};
use std::sync::Arc;

/// Performs exactly one round of percent-decoding.
///
/// A single round is the contract: whatever valid `%XX` escapes remain in
/// the *decoded* output were encoded at least twice, and are reported as
/// double encoding when they decode to characters that carry syntax (the
/// reserved set, `%`, `.`, controls). Malformed escapes and NUL escapes are
/// rejected outright.
///
/// This is the one stage that is not idempotent; it must appear at most
/// once per pipeline, before character validation.
#[derive(Debug, Clone)]
pub struct DecodingStage {
    config: Arc<SecurityConfig>,
    component: Component,
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// characters whose double-encoded form indicates an evasion attempt:
/// url syntax, escape lead, dot segments, and controls
fn is_encoding_significant(octet: u8) -> bool {
    matches!(
        octet,
        b'%' | b'.'
            | b':'
            | b'/'
            | b'?'
            | b'#'
            | b'['
            | b']'
            | b'@'
            | b'!'
            | b'$'
            | b'&'
            | b'\''
            | b'('
            | b')'
            | b'*'
            | b'+'
            | b','
            | b';'
            | b'='
            | b'\\'
            | b' '
    ) || octet < 0x20
}

impl DecodingStage {
    /// construct a decoding stage for this component
    pub fn new(config: Arc<SecurityConfig>, component: Component) -> Self {
        Self { config, component }
    }

    fn decode_once(&self, input: &str) -> Result<Vec<u8>, SecurityError> {
        let bytes = input.as_bytes();
        let mut decoded = Vec::with_capacity(bytes.len());
        let mut i = 0;

        while i < bytes.len() {
            match bytes[i] {
                0 => {
                    return Err(self.error(FailureKind::NullByte, input, i));
                }
                b'%' => {
                    let (high, low) = match (bytes.get(i + 1), bytes.get(i + 2)) {
                        (Some(&high), Some(&low)) => (high, low),
                        _ => {
                            return Err(self.error(FailureKind::InvalidEncoding, input, i));
                        }
                    };

                    let octet = match (hex_value(high), hex_value(low)) {
                        (Some(high), Some(low)) => (high << 4) | low,
                        _ => {
                            return Err(self.error(FailureKind::InvalidEncoding, input, i));
                        }
                    };

                    if octet == 0 {
                        return Err(self.error(FailureKind::NullByte, input, i));
                    }

                    decoded.push(octet);
                    i += 3;
                }
                byte => {
                    decoded.push(byte);
                    i += 1;
                }
            }
        }

        Ok(decoded)
    }

    fn error(&self, kind: FailureKind, input: &str, position: usize) -> SecurityError {
        let what = match kind {
            FailureKind::NullByte => "null byte",
            _ => "malformed percent sequence",
        };
        SecurityError::new(kind, self.component, input)
            .with_detail(format!("{what} at position {position}"))
    }

    /// Scan decoded output for surviving `%XX` escapes of significant
    /// characters.
    fn check_double_encoding(&self, input: &str, decoded: &str) -> Result<(), SecurityError> {
        let bytes = decoded.as_bytes();
        for i in 0..bytes.len() {
            if bytes[i] != b'%' {
                continue;
            }
            let (Some(&high), Some(&low)) = (bytes.get(i + 1), bytes.get(i + 2)) else {
                continue;
            };
            if let (Some(h), Some(l)) = (hex_value(high), hex_value(low))
                && is_encoding_significant((h << 4) | l)
            {
                return Err(SecurityError::new(
                    FailureKind::DoubleEncoding,
                    self.component,
                    input,
                )
                .with_detail(format!(
                    "escape %{}{} survives decoding at position {i}",
                    high as char, low as char
                ))
                .with_sanitized(decoded));
            }
        }
        Ok(())
    }
}

impl Stage for DecodingStage {
    fn apply(&self, input: Option<&str>) -> Result<Option<String>, SecurityError> {
        let Some(input) = input else { return Ok(None) };

        let decoded = self.decode_once(input)?;
        let decoded = String::from_utf8(decoded).map_err(|_| {
            SecurityError::new(FailureKind::InvalidEncoding, self.component, input)
                .with_detail("decoded bytes are not valid utf-8")
        })?;

        if !self.config.allow_double_encoding() {
            self.check_double_encoding(input, &decoded)?;
        }

        Ok(Some(decoded))
    }
}

#[cfg(test)]
mod test {
    use super::DecodingStage;
    use crate::{Component, FailureKind, SecurityConfig, stages::Stage};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn stage() -> DecodingStage {
        DecodingStage::new(Arc::new(SecurityConfig::default()), Component::UrlPath)
    }

    #[test]
    fn single_round() {
        assert_eq!(
            stage().apply(Some("/a%20b")).unwrap(),
            Some("/a b".into())
        );
        assert_eq!(stage().apply(Some("/plain")).unwrap(), Some("/plain".into()));
        assert_eq!(stage().apply(None).unwrap(), None);
    }

    #[test]
    fn malformed_sequences() {
        for input in ["/a%", "/a%2", "/a%zz", "/a%2x"] {
            let error = stage().apply(Some(input)).unwrap_err();
            assert_eq!(error.kind(), FailureKind::InvalidEncoding, "{input}");
        }
    }

    #[test]
    fn null_byte_escape() {
        let error = stage().apply(Some("/ok%00evil")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::NullByte);
        assert!(error.detail().unwrap().contains("position 3"));

        let error = stage().apply(Some("/ok\0evil")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::NullByte);
    }

    #[test]
    fn double_encoding_detected() {
        let error = stage().apply(Some("/api/%252e%252e/x")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::DoubleEncoding);

        let error = stage().apply(Some("/a%252fb")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::DoubleEncoding);
    }

    #[test]
    fn double_encoding_allowed_when_configured() {
        let config = SecurityConfig::builder()
            .allow_double_encoding(true)
            .build()
            .unwrap();
        let stage = DecodingStage::new(Arc::new(config), Component::UrlPath);
        assert_eq!(
            stage.apply(Some("/api/%252e%252e/x")).unwrap(),
            Some("/api/%2e%2e/x".into())
        );
    }

    #[test]
    fn harmless_surviving_escape_passes() {
        // %41 decodes to 'A'; a surviving alphanumeric escape carries no syntax
        assert_eq!(
            stage().apply(Some("/a%2541")).unwrap(),
            Some("/a%41".into())
        );
    }
}

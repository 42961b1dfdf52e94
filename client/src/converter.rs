use parapet_http::{BodyFormat, ReceivedBody};

/// Turns raw response bodies into typed content.
///
/// A converter makes three choices for its fetcher: how the transport
/// should read the body ([`body_format`][Self::body_format]), what media
/// type to ask for ([`content_type`][Self::content_type], sent as
/// `Accept`), and how raw bytes become a value
/// ([`convert`][Self::convert]). Returning `None` from `convert` marks the
/// response as invalid content; the fetcher will fail without touching its
/// cache.
pub trait ResponseConverter: Send + Sync {
    /// the typed content this converter produces
    type Output: Clone + Send + Sync + 'static;

    /// how the transport should read the response body
    fn body_format(&self) -> BodyFormat;

    /// the media type to request, if a specific one applies
    fn content_type(&self) -> Option<&str> {
        None
    }

    /// convert a received body; `None` marks the response as unusable
    fn convert(&self, body: ReceivedBody) -> Option<Self::Output>;
}

/// The identity converter: the response body as text.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringConverter;

impl StringConverter {
    /// construct a string converter
    pub fn new() -> Self {
        Self
    }
}

impl ResponseConverter for StringConverter {
    type Output = String;

    fn body_format(&self) -> BodyFormat {
        BodyFormat::Text
    }

    fn convert(&self, body: ReceivedBody) -> Option<String> {
        body.into_text()
    }
}

/// A converter for fetches where only the status matters: the body is
/// discarded at the transport and the content carries no information.
#[derive(Debug, Clone, Copy, Default)]
pub struct VoidConverter;

impl VoidConverter {
    /// construct a void converter
    pub fn new() -> Self {
        Self
    }
}

impl ResponseConverter for VoidConverter {
    type Output = ();

    fn body_format(&self) -> BodyFormat {
        BodyFormat::Discard
    }

    fn convert(&self, _body: ReceivedBody) -> Option<()> {
        Some(())
    }
}

#[cfg(test)]
mod test {
    use super::{ResponseConverter, StringConverter, VoidConverter};
    use parapet_http::{BodyFormat, ReceivedBody};
    use pretty_assertions::assert_eq;

    #[test]
    fn string_converter_is_identity_on_text() {
        assert_eq!(
            StringConverter::new().convert(ReceivedBody::from("payload")),
            Some("payload".to_string())
        );
        assert_eq!(StringConverter::new().convert(ReceivedBody::Empty), None);
        assert_eq!(StringConverter::new().body_format(), BodyFormat::Text);
    }

    #[test]
    fn void_converter_always_produces_unit() {
        assert_eq!(VoidConverter::new().convert(ReceivedBody::Empty), Some(()));
        assert_eq!(VoidConverter::new().body_format(), BodyFormat::Discard);
    }
}

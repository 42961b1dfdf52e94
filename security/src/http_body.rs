use mime::Mime;

/// A request body with its declared content type and encoding.
///
/// The content is held as text; binary payloads are validated through their
/// declared content type, not by sniffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpBody {
    content: String,
    content_type: Option<String>,
    encoding: Option<String>,
}

impl HttpBody {
    /// construct a body from its parts
    pub fn new(
        content: impl Into<String>,
        content_type: Option<String>,
        encoding: Option<String>,
    ) -> Self {
        Self {
            content: content.into(),
            content_type,
            encoding,
        }
    }

    /// the body content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// the declared content type, verbatim
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// the declared transfer encoding, verbatim
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    fn mime(&self) -> Option<Mime> {
        self.content_type.as_ref()?.parse().ok()
    }

    /// whether the declared type is json (`application/json` or a `+json`
    /// suffix)
    pub fn is_json(&self) -> bool {
        self.mime()
            .is_some_and(|mime| mime.subtype() == mime::JSON || mime.suffix() == Some(mime::JSON))
    }

    /// whether the declared type is xml (`*/xml` or a `+xml` suffix)
    pub fn is_xml(&self) -> bool {
        self.mime()
            .is_some_and(|mime| mime.subtype() == mime::XML || mime.suffix() == Some(mime::XML))
    }

    /// whether the declared type is html
    pub fn is_html(&self) -> bool {
        self.mime().is_some_and(|mime| mime.subtype() == mime::HTML)
    }

    /// whether the declared type is a url-encoded form
    pub fn is_form(&self) -> bool {
        self.mime()
            .is_some_and(|mime| mime.subtype() == mime::WWW_FORM_URLENCODED)
    }

    /// whether the declared type is an opaque binary payload
    pub fn is_binary(&self) -> bool {
        self.mime().is_some_and(|mime| {
            mime.subtype() == mime::OCTET_STREAM
                || matches!(
                    mime.type_(),
                    mime::IMAGE | mime::AUDIO | mime::VIDEO | mime::FONT
                )
        })
    }

    /// The effective character set: the explicit encoding when declared,
    /// otherwise the content type's `charset` parameter.
    pub fn charset(&self) -> Option<String> {
        self.encoding.clone().or_else(|| {
            self.mime()?
                .get_param(mime::CHARSET)
                .map(|charset| charset.as_str().to_string())
        })
    }
}

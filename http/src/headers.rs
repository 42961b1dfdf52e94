use crate::Error;
use hashbrown::HashMap;
use smallvec::{SmallVec, smallvec};
use smartstring::alias::String as SmartString;
use std::{
    fmt::{self, Debug, Display, Formatter},
    hash::{Hash, Hasher},
    str::FromStr,
};

/// the `ETag` response header
pub const ETAG: &str = "ETag";

/// the `If-None-Match` conditional request header
pub const IF_NONE_MATCH: &str = "If-None-Match";

/// the `Content-Type` entity header
pub const CONTENT_TYPE: &str = "Content-Type";

/// the `Accept` request header
pub const ACCEPT: &str = "Accept";

/// The name of a http header.
///
/// Comparison and hashing are ascii-case-insensitive, so `"etag"` and
/// `"ETag"` name the same header. Construction through [`From`] does not
/// validate; use [`FromStr`] or [`HeaderName::is_valid`] when the name comes
/// from an untrusted source.
#[derive(Clone)]
pub struct HeaderName(SmartString);

fn is_tchar(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`' | '|' | '~'
        )
}

impl HeaderName {
    /// Determine if this header name contains only the appropriate
    /// characters.
    ///
    /// token per <https://www.rfc-editor.org/rfc/rfc9110#section-5.1>,
    /// tchar per <https://www.rfc-editor.org/rfc/rfc9110#section-5.6.2>
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty() && self.0.chars().all(is_tchar)
    }

    /// this header name as a `&str`
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for HeaderName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for HeaderName {}

impl Hash for HeaderName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for c in self.0.as_bytes() {
            c.to_ascii_lowercase().hash(state);
        }
    }
}

impl Debug for HeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.0, f)
    }
}

impl Display for HeaderName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<&str> for HeaderName {
    fn from(s: &str) -> Self {
        Self(SmartString::from(s))
    }
}

impl From<String> for HeaderName {
    fn from(s: String) -> Self {
        Self(SmartString::from(s))
    }
}

impl FromStr for HeaderName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = Self(SmartString::from(s));
        if name.is_valid() {
            Ok(name)
        } else {
            Err(Error::MalformedHeaderName(s.to_string()))
        }
    }
}

impl AsRef<str> for HeaderName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A case-insensitive multimap of header names to values.
///
/// Most headers hold exactly one value; storage is optimized for that case.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Headers(HashMap<HeaderName, SmallVec<[String; 1]>>);

impl Headers {
    /// construct an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any existing values for this header name with the provided
    /// value.
    pub fn insert(&mut self, name: impl Into<HeaderName>, value: impl Into<String>) {
        self.0.insert(name.into(), smallvec![value.into()]);
    }

    /// Add a value for this header name, retaining any existing values.
    pub fn append(&mut self, name: impl Into<HeaderName>, value: impl Into<String>) {
        self.0.entry(name.into()).or_default().push(value.into());
    }

    /// the first value for this header name, if any
    pub fn get(&self, name: impl Into<HeaderName>) -> Option<&str> {
        self.0
            .get(&name.into())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// all values for this header name
    pub fn get_values(&self, name: impl Into<HeaderName>) -> Option<&[String]> {
        self.0.get(&name.into()).map(SmallVec::as_slice)
    }

    /// returns true if this header name is present
    pub fn contains(&self, name: impl Into<HeaderName>) -> bool {
        self.0.contains_key(&name.into())
    }

    /// Remove and return all values for this header name.
    pub fn remove(&mut self, name: impl Into<HeaderName>) -> Option<Vec<String>> {
        self.0.remove(&name.into()).map(SmallVec::into_vec)
    }

    /// the number of distinct header names
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// returns true if no headers have been set
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(name, value)` pairs, yielding each value of a
    /// multi-valued header separately. Order is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderName, &str)> {
        self.0.iter().flat_map(|(name, values)| {
            values.iter().map(move |value| (name, value.as_str()))
        })
    }
}

#[cfg(test)]
mod test {
    use super::{HeaderName, Headers};
    use pretty_assertions::assert_eq;

    #[test]
    fn case_insensitive_access() {
        let mut headers = Headers::new();
        headers.insert("ETag", "\"xyzzy\"");
        assert_eq!(headers.get("etag"), Some("\"xyzzy\""));
        assert_eq!(headers.get("ETAG"), Some("\"xyzzy\""));
        assert!(headers.contains("eTaG"));
        assert_eq!(headers.len(), 1);

        headers.insert("etag", "\"r2d2\"");
        assert_eq!(headers.get("ETag"), Some("\"r2d2\""));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn append_retains_values() {
        let mut headers = Headers::new();
        headers.append("Accept", "text/html");
        headers.append("accept", "application/json");
        assert_eq!(
            headers.get_values("Accept").unwrap(),
            &["text/html".to_string(), "application/json".to_string()]
        );
        assert_eq!(headers.get("Accept"), Some("text/html"));
    }

    #[test]
    fn validation() {
        assert!("X-Custom-Header".parse::<HeaderName>().is_ok());
        assert!("".parse::<HeaderName>().is_err());
        assert!("Bad Header".parse::<HeaderName>().is_err());
        assert!("Bad\r\nHeader".parse::<HeaderName>().is_err());
        assert!(!HeaderName::from("Bad:Header").is_valid());
    }
}

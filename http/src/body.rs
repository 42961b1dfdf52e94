/// How a transport should read a response body.
///
/// Selected by the response converter before dispatch, so the transport
/// never buffers more than the consumer will use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    /// read the body to completion as utf-8 text
    Text,

    /// read the body to completion as raw bytes
    Bytes,

    /// drain and discard the body
    Discard,
}

/// A fully received response body, in the representation requested by
/// [`BodyFormat`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceivedBody {
    /// a utf-8 text body
    Text(String),

    /// a raw byte body
    Bytes(Vec<u8>),

    /// the body was discarded or absent
    Empty,
}

impl ReceivedBody {
    /// the body as text, if it was received as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// the body as bytes, for either text or byte representations
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Text(text) => Some(text.as_bytes()),
            Self::Bytes(bytes) => Some(bytes),
            Self::Empty => None,
        }
    }

    /// consume this body, returning text if it was received as text
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// the received length in bytes
    pub fn len(&self) -> usize {
        match self {
            Self::Text(text) => text.len(),
            Self::Bytes(bytes) => bytes.len(),
            Self::Empty => 0,
        }
    }

    /// returns true if no bytes were retained
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<String> for ReceivedBody {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for ReceivedBody {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for ReceivedBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

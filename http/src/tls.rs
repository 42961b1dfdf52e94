use crate::Error;
use std::fmt::{self, Display};

/// A TLS protocol version, named for policy purposes.
///
/// This crate holds no TLS implementation; versions exist so that a
/// [`TlsPolicy`] can be expressed and enforced by whichever transport is in
/// use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TlsVersion {
    /// TLS 1.2
    Tls1_2,

    /// TLS 1.3
    Tls1_3,

    /// the generic "TLS" protocol, letting the library negotiate
    Negotiated,

    /// TLS 1.0, long deprecated
    Tls1_0,

    /// TLS 1.1, long deprecated
    Tls1_1,

    /// SSLv3, broken
    Ssl3,
}

impl Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tls1_2 => "TLSv1.2",
            Self::Tls1_3 => "TLSv1.3",
            Self::Negotiated => "TLS",
            Self::Tls1_0 => "TLSv1.0",
            Self::Tls1_1 => "TLSv1.1",
            Self::Ssl3 => "SSLv3",
        })
    }
}

/// A policy over TLS protocol versions.
///
/// Construction fails hard rather than producing a policy that could permit
/// a forbidden protocol; there is no insecure fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsPolicy {
    allowed: Vec<TlsVersion>,
    forbidden: Vec<TlsVersion>,
    default_version: TlsVersion,
}

impl TlsPolicy {
    /// The secure default policy: TLSv1.2 and TLSv1.3 (and negotiated
    /// "TLS"), with TLSv1.0, TLSv1.1 and SSLv3 forbidden. The default
    /// protocol is TLSv1.2.
    pub fn secure() -> Self {
        Self {
            allowed: vec![
                TlsVersion::Tls1_2,
                TlsVersion::Tls1_3,
                TlsVersion::Negotiated,
            ],
            forbidden: vec![TlsVersion::Tls1_0, TlsVersion::Tls1_1, TlsVersion::Ssl3],
            default_version: TlsVersion::Tls1_2,
        }
    }

    /// Construct a policy from explicit allowed and forbidden sets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsecureTlsPolicy`] if the allowed set is empty or
    /// overlaps the forbidden set.
    pub fn new(
        allowed: impl IntoIterator<Item = TlsVersion>,
        forbidden: impl IntoIterator<Item = TlsVersion>,
    ) -> Result<Self, Error> {
        let allowed: Vec<_> = allowed.into_iter().collect();
        let forbidden: Vec<_> = forbidden.into_iter().collect();

        if allowed.is_empty() {
            return Err(Error::InsecureTlsPolicy("no allowed tls versions"));
        }

        if allowed.iter().any(|version| forbidden.contains(version)) {
            return Err(Error::InsecureTlsPolicy(
                "allowed and forbidden tls versions overlap",
            ));
        }

        let default_version = if allowed.contains(&TlsVersion::Tls1_2) {
            TlsVersion::Tls1_2
        } else {
            allowed[0]
        };

        Ok(Self {
            allowed,
            forbidden,
            default_version,
        })
    }

    /// returns true if this version is explicitly allowed
    pub fn is_allowed(&self, version: TlsVersion) -> bool {
        self.allowed.contains(&version)
    }

    /// the protocol a transport should request by default
    pub fn default_version(&self) -> TlsVersion {
        self.default_version
    }

    /// Validate a negotiated or requested version against this policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsecureTlsPolicy`] for forbidden or unlisted
    /// versions.
    pub fn check(&self, version: TlsVersion) -> Result<(), Error> {
        if self.forbidden.contains(&version) {
            log::warn!("rejected forbidden tls version {version}");
            return Err(Error::InsecureTlsPolicy("forbidden tls version"));
        }

        if !self.allowed.contains(&version) {
            return Err(Error::InsecureTlsPolicy("tls version not in allowed set"));
        }

        Ok(())
    }
}

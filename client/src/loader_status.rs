use std::fmt::{self, Display};

/// The lifecycle of a [`ResilientFetcher`][crate::ResilientFetcher].
///
/// `Undefined` until the first [`load`][crate::ResilientFetcher::load],
/// `Loading` while one is in flight, then `Ok` or `Error` after it
/// completes. Published atomically, so it can be observed without taking
/// the fetcher's lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum LoaderStatus {
    /// no load has started yet
    #[default]
    Undefined = 0,

    /// a load is in flight
    Loading = 1,

    /// the most recent load succeeded
    Ok = 2,

    /// the most recent load failed
    Error = 3,
}

impl LoaderStatus {
    /// decode a status published through an atomic
    pub const fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Loading,
            2 => Self::Ok,
            3 => Self::Error,
            _ => Self::Undefined,
        }
    }

    /// a stable lowercase name for log text
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Loading => "loading",
            Self::Ok => "ok",
            Self::Error => "error",
        }
    }
}

impl Display for LoaderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

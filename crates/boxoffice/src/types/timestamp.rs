use candid::CandidType;
use canic_cdk::utils::time::now_secs;
use derive_more::{Add, AddAssign, Display, FromStr, Sub, SubAssign};
use serde::{Deserialize, Serialize};

///
/// Timestamp
/// (in seconds)
///

#[derive(
    Add,
    AddAssign,
    CandidType,
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    FromStr,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
    Sub,
    SubAssign,
)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const EPOCH: Self = Self(u64::MIN);
    pub const MAX: Self = Self(u64::MAX);

    /// Construct from seconds.
    #[must_use]
    pub const fn from_seconds(secs: u64) -> Self {
        Self(secs)
    }

    /// Construct from nanoseconds (truncate to seconds).
    #[must_use]
    pub const fn from_nanos(ns: u64) -> Self {
        Self(ns / 1_000_000_000)
    }

    #[must_use]
    /// Current wall-clock timestamp in seconds.
    pub fn now() -> Self {
        Self(now_secs())
    }

    /// Seconds since epoch.
    #[must_use]
    pub const fn seconds(self) -> u64 {
        self.0
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Self(secs)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nanos_truncate_to_seconds() {
        assert_eq!(Timestamp::from_nanos(1_999_999_999).seconds(), 1);
        assert_eq!(Timestamp::from_nanos(2_000_000_000).seconds(), 2);
    }

    #[test]
    fn ordering_is_numeric() {
        assert!(Timestamp::from_seconds(1) < Timestamp::from_seconds(2));
        assert_eq!(Timestamp::EPOCH.seconds(), 0);
    }
}

//! Wall-clock seconds for session and badge bookkeeping.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unix epoch seconds (UTC). Serialized as a bare integer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    pub fn now() -> Self {
        SystemTime::now().into()
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Seconds from `self` to `now`; zero if `now` is earlier.
    pub fn elapsed_since(&self, now: Timestamp) -> u64 {
        now.0.saturating_sub(self.0)
    }
}

/// Times before the epoch clamp to zero.
impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        Self(time.duration_since(UNIX_EPOCH).map_or(0, |d| d.as_secs()))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn pre_epoch_clock_reads_zero() {
        let before = UNIX_EPOCH - Duration::from_secs(10);
        assert_eq!(Timestamp::from(before).as_secs(), 0);
    }

    #[test]
    fn elapsed_never_underflows() {
        let connected = Timestamp::new(500);
        assert_eq!(connected.elapsed_since(Timestamp::new(560)), 60);
        assert_eq!(connected.elapsed_since(Timestamp::new(100)), 0);
    }

    #[test]
    fn serializes_as_plain_seconds() {
        assert_eq!(serde_json::to_string(&Timestamp::new(42)).unwrap(), "42");
    }
}

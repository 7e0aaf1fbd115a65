//! Private module for selective re-export.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug, Formatter};
use std::ops::Add;
use std::time::Duration;

/// An instant on the simulation timeline, measured in nanoseconds from the
/// origin.
///
/// [`Time::NEVER`] is the maximum representable instant and doubles as the
/// "no reception will ever happen" sentinel. Adding a [`Duration`] saturates
/// there, so a delay that overflows the timeline reads as "never".
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Time(u64);

impl Time {
    /// The simulation origin.
    pub const ZERO: Time = Time(0);

    /// The unreachable future.
    pub const NEVER: Time = Time(u64::MAX);

    pub const fn from_nanos(nanos: u64) -> Time {
        Time(nanos)
    }

    pub const fn from_micros(micros: u64) -> Time {
        Time(micros.saturating_mul(1_000))
    }

    pub const fn from_millis(millis: u64) -> Time {
        Time(millis.saturating_mul(1_000_000))
    }

    pub const fn from_secs(secs: u64) -> Time {
        Time(secs.saturating_mul(1_000_000_000))
    }

    pub const fn as_nanos(self) -> u64 {
        self.0
    }
}

impl Add<Duration> for Time {
    type Output = Time;

    fn add(self, rhs: Duration) -> Time {
        let sum = self.0 as u128 + rhs.as_nanos();
        if sum >= u64::MAX as u128 {
            Time::NEVER
        } else {
            Time(sum as u64)
        }
    }
}

impl Debug for Time {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if *self == Time::NEVER {
            write!(f, "Time(NEVER)")
        } else {
            write!(f, "Time({}ns)", self.0)
        }
    }
}

// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Unsigned time management
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod error;
pub use error::TimeError;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Div;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Time structure used everywhere.
/// Milliseconds since 01/01/1970.
#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ZeltTime(u64);

impl ZeltTime {
    /// Smallest time interval
    pub const EPSILON: ZeltTime = ZeltTime(1);

    /// Gets the current UNIX timestamp in milliseconds
    ///
    /// # Example
    /// ```
    /// # use zelt_time::ZeltTime;
    /// let now = ZeltTime::now().unwrap();
    /// ```
    pub fn now() -> Result<Self, TimeError> {
        let now: u64 = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| TimeError::TimeOverflowError)?
            .as_millis()
            .try_into()
            .map_err(|_| TimeError::TimeOverflowError)?;
        Ok(ZeltTime(now))
    }

    /// Conversion to `std::time::Duration`
    pub fn to_duration(&self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// Conversion to milliseconds
    pub fn to_millis(&self) -> u64 {
        self.0
    }

    /// Constructs from milliseconds
    pub const fn from_millis(millis: u64) -> Self {
        ZeltTime(millis)
    }

    /// ```
    /// # use zelt_time::ZeltTime;
    /// let time_1 : ZeltTime = ZeltTime::from_millis(420);
    /// let time_2 : ZeltTime = ZeltTime::from_millis(50);
    /// let res : ZeltTime = time_1.saturating_sub(time_2);
    /// assert_eq!(res, ZeltTime::from_millis(370))
    /// ```
    #[must_use]
    pub fn saturating_sub(self, t: ZeltTime) -> Self {
        ZeltTime(self.0.saturating_sub(t.0))
    }

    /// ```
    /// # use zelt_time::ZeltTime;
    /// let time_1 : ZeltTime = ZeltTime::from_millis(42);
    /// let time_2 : ZeltTime = ZeltTime::from_millis(7);
    /// let res : ZeltTime = time_1.saturating_add(time_2);
    /// assert_eq!(res, ZeltTime::from_millis(49))
    /// ```
    #[must_use]
    pub fn saturating_add(self, t: ZeltTime) -> Self {
        ZeltTime(self.0.saturating_add(t.0))
    }

    /// ```
    /// # use zelt_time::ZeltTime;
    /// let time_1 : ZeltTime = ZeltTime::from_millis(42);
    /// let res : ZeltTime = time_1.saturating_mul(2);
    /// assert_eq!(res, ZeltTime::from_millis(84))
    /// ```
    #[must_use]
    pub fn saturating_mul(self, factor: u64) -> Self {
        ZeltTime(self.0.saturating_mul(factor))
    }

    /// ```
    /// # use zelt_time::ZeltTime;
    /// let time_1 : ZeltTime = ZeltTime::from_millis(42);
    /// let time_2 : ZeltTime = ZeltTime::from_millis(7);
    /// let res : ZeltTime = time_1.checked_sub(time_2).unwrap();
    /// assert_eq!(res, ZeltTime::from_millis(35))
    /// ```
    pub fn checked_sub(self, t: ZeltTime) -> Result<Self, TimeError> {
        self.0
            .checked_sub(t.0)
            .ok_or(TimeError::TimeOverflowError)
            .map(ZeltTime)
    }

    /// ```
    /// # use zelt_time::ZeltTime;
    /// let time_1 : ZeltTime = ZeltTime::from_millis(42);
    /// let time_2 : ZeltTime = ZeltTime::from_millis(7);
    /// let res : ZeltTime = time_1.checked_add(time_2).unwrap();
    /// assert_eq!(res, ZeltTime::from_millis(49))
    /// ```
    pub fn checked_add(self, t: ZeltTime) -> Result<Self, TimeError> {
        self.0
            .checked_add(t.0)
            .ok_or(TimeError::TimeOverflowError)
            .map(ZeltTime)
    }
}

impl fmt::Display for ZeltTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ZeltTime {
    fn from(value: u64) -> Self {
        ZeltTime(value)
    }
}

impl TryFrom<Duration> for ZeltTime {
    type Error = TimeError;

    fn try_from(value: Duration) -> Result<Self, Self::Error> {
        Ok(ZeltTime(
            value
                .as_millis()
                .try_into()
                .map_err(|_| TimeError::ConversionError)?,
        ))
    }
}

impl Div<u64> for ZeltTime {
    type Output = ZeltTime;

    fn div(self, rhs: u64) -> Self::Output {
        ZeltTime(self.0 / rhs)
    }
}

//! Packed dictionary timestamps.
//!
//! `created` and `last_altered` are stored as a decimal integer whose digits spell
//! `YYYYMMDDhhmmss`, e.g. `20201012093015`. Zero means "not set".

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::de::{self, Visitor};
use serde::ser;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A second-resolution timestamp in packed `YYYYMMDDhhmmss` form.
///
/// # Examples
///
/// ```rust
/// use sdi_codec::Timestamp;
///
/// let ts = Timestamp::from_packed(20201012093015).unwrap();
/// assert_eq!(ts.to_packed(), Some(20201012093015));
/// assert_eq!(ts.to_string(), "2020-10-12 09:30:15");
/// assert!(Timestamp::from_packed(20201312000000).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(Option<NaiveDateTime>);

impl Timestamp {
    /// The unset timestamp, packed as `0`.
    pub const UNSET: Timestamp = Timestamp(None);

    /// Wraps `datetime`, dropping any sub-second part.
    #[must_use]
    pub fn new(datetime: NaiveDateTime) -> Self {
        Timestamp(Some(datetime.with_nanosecond(0).unwrap_or(datetime)))
    }

    /// Decodes a packed value. Returns `None` if the digits do not form a valid date and time.
    #[must_use]
    pub fn from_packed(packed: u64) -> Option<Self> {
        if packed == 0 {
            return Some(Timestamp::UNSET);
        }
        let part = |div: u64, modulo: u64| u32::try_from(packed / div % modulo).ok();

        let year = i32::try_from(packed / 10_000_000_000).ok()?;
        if year > 9999 {
            return None;
        }
        let date = NaiveDate::from_ymd_opt(year, part(100_000_000, 100)?, part(1_000_000, 100)?)?;
        let datetime =
            date.and_hms_opt(part(10_000, 100)?, part(100, 100)?, part(1, 100)?)?;
        Some(Timestamp(Some(datetime)))
    }

    /// Encodes as `YYYYMMDDhhmmss`, or `0` when unset.
    ///
    /// Returns `None` for years outside `0..=9999`, which have no packed form.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use sdi_codec::Timestamp;
    ///
    /// let far = NaiveDate::from_ymd_opt(10000, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
    /// assert_eq!(Timestamp::new(far).to_packed(), None);
    /// assert_eq!(Timestamp::UNSET.to_packed(), Some(0));
    /// ```
    #[must_use]
    pub fn to_packed(&self) -> Option<u64> {
        let Some(dt) = self.0 else { return Some(0) };
        let year = u64::try_from(dt.year()).ok().filter(|y| *y <= 9999)?;
        Some(
            year * 10_000_000_000
                + u64::from(dt.month()) * 100_000_000
                + u64::from(dt.day()) * 1_000_000
                + u64::from(dt.hour()) * 10_000
                + u64::from(dt.minute()) * 100
                + u64::from(dt.second()),
        )
    }

    /// The wrapped date and time, or `None` when unset.
    #[must_use]
    pub const fn datetime(&self) -> Option<NaiveDateTime> {
        self.0
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            None => f.write_str("unset"),
        }
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(datetime: NaiveDateTime) -> Self {
        Timestamp::new(datetime)
    }
}

impl Serialize for Timestamp {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let packed = self.to_packed().ok_or_else(|| {
            <S::Error as ser::Error>::custom(format!("timestamp {self} is outside years 0..=9999"))
        })?;
        serializer.serialize_u64(packed)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TimestampVisitor;

        impl<'de> Visitor<'de> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a packed YYYYMMDDhhmmss integer")
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Timestamp::from_packed(value)
                    .ok_or_else(|| E::custom(format!("invalid packed timestamp {value}")))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                let value = u64::try_from(value)
                    .map_err(|_| E::custom(format!("negative packed timestamp {value}")))?;
                self.visit_u64(value)
            }
        }

        deserializer.deserialize_u64(TimestampVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_unset() {
        let ts = Timestamp::from_packed(0).unwrap();
        assert!(!ts.is_set());
        assert_eq!(ts, Timestamp::UNSET);
        assert_eq!(ts.to_packed(), Some(0));
    }

    #[test]
    fn test_round_trip_packed() {
        for packed in [20201012093015_u64, 19700101000000, 99991231235959, 20240229120000] {
            assert_eq!(
                Timestamp::from_packed(packed).unwrap().to_packed(),
                Some(packed)
            );
        }
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(Timestamp::from_packed(20230229000000).is_none());
        assert!(Timestamp::from_packed(20201012246000).is_none());
        assert!(Timestamp::from_packed(100000101000000).is_none());
    }

    #[test]
    fn test_serde_as_integer() {
        let ts: Timestamp = serde_json::from_str("20201012093015").unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "20201012093015");
        assert!(serde_json::from_str::<Timestamp>("-5").is_err());
        assert!(serde_json::from_str::<Timestamp>("\"2020\"").is_err());
    }

    fn at_year(year: i32) -> Timestamp {
        let dt = NaiveDate::from_ymd_opt(year, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .unwrap();
        Timestamp::new(dt)
    }

    #[test]
    fn test_year_after_9999_has_no_packed_form() {
        let ts = at_year(10000);
        assert_eq!(ts.to_packed(), None);
        let err = serde_json::to_string(&ts).unwrap_err();
        assert!(err.to_string().contains("outside years"));
    }

    #[test]
    fn test_negative_year_is_not_packed_as_unset() {
        let ts = at_year(-5);
        assert!(ts.is_set());
        assert_eq!(ts.to_packed(), None);
        assert!(serde_json::to_string(&ts).is_err());
    }

    #[test]
    fn test_year_bounds_round_trip() {
        for year in [0, 9999] {
            let ts = at_year(year);
            let packed = ts.to_packed().unwrap();
            assert_eq!(Timestamp::from_packed(packed), Some(ts));
        }
    }

    #[test]
    fn test_new_truncates_to_seconds() {
        let dt = NaiveDate::from_ymd_opt(2020, 10, 12)
            .and_then(|d| d.and_hms_milli_opt(9, 30, 15, 750))
            .unwrap();
        let ts = Timestamp::new(dt);
        assert_eq!(Timestamp::from_packed(ts.to_packed().unwrap()), Some(ts));
    }
}

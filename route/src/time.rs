use std::ops::{Add, Mul, Sub};

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// An absolute instant, in milliseconds since the Unix epoch. Fractional milliseconds are kept so
/// interpolated samples don't get quantized.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Timestamp(f64);

impl Timestamp {
    pub fn from_millis(ms: f64) -> Self {
        Self(ms)
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt.timestamp_millis() as f64)
    }

    /// Accepts RFC 3339 / ISO-8601 with an offset, or a naive `%Y-%m-%d %H:%M:%S` (optionally with
    /// a `T` separator and fractional seconds) that's interpreted as UTC.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Ok(Self::from_datetime(dt.with_timezone(&Utc)));
        }
        for fmt in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Ok(Self::from_datetime(Utc.from_utc_datetime(&naive)));
            }
        }
        bail!("Can't parse timestamp {raw:?}")
    }

    pub fn inner_millis(self) -> f64 {
        self.0
    }

    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0.floor() as i64).single()
    }

    /// Wall-clock time of day, `HH:MM:SS` in UTC
    pub fn clock_label(self) -> String {
        match self.to_datetime() {
            Some(dt) => dt.format("%H:%M:%S").to_string(),
            None => "--:--:--".to_string(),
        }
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)),
            None => write!(f, "{}ms", self.0),
        }
    }
}

impl Sub for Timestamp {
    type Output = Duration;

    fn sub(self, other: Timestamp) -> Duration {
        Duration(self.0 - other.0)
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, other: Duration) -> Timestamp {
        Timestamp(self.0 + other.0)
    }
}

/// A span of time in milliseconds. Can be negative.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Duration(f64);

impl Duration {
    pub const ZERO: Duration = Duration(0.0);

    pub fn milliseconds(ms: f64) -> Self {
        Self(ms)
    }

    pub fn seconds(s: f64) -> Self {
        Self(s * 1000.0)
    }

    pub fn minutes(m: f64) -> Self {
        Self(m * 60_000.0)
    }

    pub fn hours(h: f64) -> Self {
        Self(h * 3_600_000.0)
    }

    pub fn inner_milliseconds(self) -> f64 {
        self.0
    }

    pub fn inner_seconds(self) -> f64 {
        self.0 / 1000.0
    }

    pub fn inner_hours(self) -> f64 {
        self.0 / 3_600_000.0
    }
}

/// Zero-padded `HH:MM:SS`. Hours don't wrap at 24, and negative durations show as zero.
impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let total_seconds = (self.0 / 1000.0).floor().max(0.0) as u64;
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;
        write!(f, "{hours:02}:{minutes:02}:{seconds:02}")
    }
}

impl Add for Duration {
    type Output = Duration;

    fn add(self, other: Duration) -> Duration {
        Duration(self.0 + other.0)
    }
}

impl Sub for Duration {
    type Output = Duration;

    fn sub(self, other: Duration) -> Duration {
        Duration(self.0 - other.0)
    }
}

impl Mul<f64> for Duration {
    type Output = Duration;

    fn mul(self, factor: f64) -> Duration {
        Duration(self.0 * factor)
    }
}

impl std::ops::Div for Duration {
    type Output = f64;

    fn div(self, other: Duration) -> f64 {
        self.0 / other.0
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("2024-03-01T08:00:00Z")]
    #[case("2024-03-01T09:00:00+01:00")]
    #[case("2024-03-01T08:00:00.000Z")]
    #[case("2024-03-01 08:00:00")]
    #[case("2024-03-01T08:00:00")]
    fn parse_equivalent_forms(#[case] raw: &str) {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(Timestamp::parse(raw).unwrap(), Timestamp::from_datetime(expected));
    }

    #[rstest]
    #[case("")]
    #[case("yesterday")]
    #[case("2024-13-01T08:00:00Z")]
    fn parse_garbage(#[case] raw: &str) {
        assert!(Timestamp::parse(raw).is_err());
    }

    #[test]
    fn arithmetic() {
        let t0 = Timestamp::parse("2024-03-01T08:00:00Z").unwrap();
        let t1 = t0 + Duration::seconds(90.0);
        assert_eq!(t1 - t0, Duration::milliseconds(90_000.0));
        assert_eq!(Duration::seconds(30.0) / Duration::seconds(60.0), 0.5);
        assert_eq!(Duration::minutes(1.0) * 2.0, Duration::seconds(120.0));
        assert_eq!(Duration::hours(1.0).inner_hours(), 1.0);
    }

    #[rstest]
    #[case(Duration::ZERO, "00:00:00")]
    #[case(Duration::milliseconds(999.0), "00:00:00")]
    #[case(Duration::seconds(61.0), "00:01:01")]
    #[case(Duration::hours(1.0) + Duration::minutes(2.0) + Duration::seconds(3.0), "01:02:03")]
    #[case(Duration::hours(27.0), "27:00:00")]
    #[case(Duration::hours(123.0) + Duration::seconds(5.0), "123:00:05")]
    #[case(Duration::seconds(-5.0), "00:00:00")]
    fn duration_display(#[case] d: Duration, #[case] expected: &str) {
        assert_eq!(d.to_string(), expected);
    }

    #[test]
    fn clock_label() {
        let t = Timestamp::parse("2024-03-01T13:04:05.750Z").unwrap();
        assert_eq!(t.clock_label(), "13:04:05");
        assert_eq!(t.to_string(), "2024-03-01T13:04:05.750Z");
    }
}

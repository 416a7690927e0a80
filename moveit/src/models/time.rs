use std::fmt;
use std::ops::Sub;

/// Event timestamp in seconds, as written by the cluster manager.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Timestamp(f64);

impl Timestamp {
    /// Create a new timestamp value.
    pub fn new(seconds: f64) -> Self {
        Self(seconds)
    }

    /// Raw value in seconds.
    pub fn value(&self) -> f64 {
        self.0
    }

    /// Total ordering, used when sorting events.
    pub fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }

    /// Interpret the value as seconds since the Unix epoch.
    pub fn to_datetime(&self) -> chrono::DateTime<chrono::Utc> {
        let secs = self.0.floor();
        let nanos = ((self.0 - secs) * 1e9) as u32;
        chrono::DateTime::from_timestamp(secs as i64, nanos)
            .unwrap_or(chrono::DateTime::UNIX_EPOCH)
    }

    /// UTC wall-clock form with millisecond precision, for log output.
    pub fn to_rfc3339(&self) -> String {
        self.to_datetime()
            .to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
    }
}

impl From<f64> for Timestamp {
    fn from(v: f64) -> Self {
        Timestamp::new(v)
    }
}

/// Difference in seconds.
impl Sub for Timestamp {
    type Output = f64;

    fn sub(self, rhs: Self) -> f64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The span between the earliest movement start and the latest movement end.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl TimeWindow {
    pub fn new(start: Timestamp, end: Timestamp) -> Self {
        Self { start, end }
    }

    /// Length of the window in seconds.
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Length of the window in minutes, rounded to one decimal.
    pub fn duration_minutes(&self) -> f64 {
        (self.duration() / 60.0 * 10.0).round() / 10.0
    }

    /// A window that cannot be used as a scale denominator.
    pub fn is_degenerate(&self) -> bool {
        let d = self.duration();
        d.is_nan() || d <= 0.0 || d.is_infinite()
    }
}

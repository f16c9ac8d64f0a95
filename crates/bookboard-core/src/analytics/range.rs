//! Range selection: symbolic tokens to concrete time windows
//!
//! Day-based tokens map through one fixed table. `12m` is special: it is
//! anchored on calendar months so the trend chart gets exactly twelve months
//! including the current one.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, Result};

/// Symbolic time range picked in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RangeToken {
    #[serde(rename = "7d")]
    Last7Days,
    #[default]
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "90d")]
    Last90Days,
    #[serde(rename = "12m")]
    Last12Months,
}

impl RangeToken {
    /// Fallback used when a caller cannot parse the requested token
    pub const DEFAULT: RangeToken = RangeToken::Last30Days;

    pub const ALL: [RangeToken; 4] = [
        RangeToken::Last7Days,
        RangeToken::Last30Days,
        RangeToken::Last90Days,
        RangeToken::Last12Months,
    ];

    /// Parse a token such as `"30d"`. Unknown tokens are an error, never a guess.
    pub fn parse(token: &str) -> Result<Self> {
        let normalized = token.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| CoreError::InvalidRange {
                token: token.to_string(),
            })
    }

    /// Parse a token, falling back to [`RangeToken::DEFAULT`] with a warning
    pub fn parse_or_default(token: &str) -> Self {
        Self::parse(token).unwrap_or_else(|err| {
            tracing::warn!("{}, falling back to {}", err, Self::DEFAULT);
            Self::DEFAULT
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Last7Days => "7d",
            Self::Last30Days => "30d",
            Self::Last90Days => "90d",
            Self::Last12Months => "12m",
        }
    }

    /// Display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Last7Days => "Last 7 days",
            Self::Last30Days => "Last 30 days",
            Self::Last90Days => "Last 90 days",
            Self::Last12Months => "Last 12 months",
        }
    }

    /// Fixed window length in days, `None` for calendar-month ranges
    pub fn fixed_days(&self) -> Option<i64> {
        match self {
            Self::Last7Days => Some(7),
            Self::Last30Days => Some(30),
            Self::Last90Days => Some(90),
            Self::Last12Months => None,
        }
    }

    /// Resolve to the current window ending at `now` and the equal-length window before it
    ///
    /// `offset` is the business's UTC offset; it only matters for `12m`, whose
    /// window starts at local midnight on the first day of the oldest month.
    pub fn resolve(&self, now: DateTime<Utc>, offset: FixedOffset) -> RangeWindows {
        let start = match self.fixed_days() {
            Some(days) => now - Duration::days(days),
            None => MonthKey::containing(now, offset).shift(-11).start(offset),
        };
        let current = TimeWindow { start, end: now };
        RangeWindows {
            previous: current.preceding(),
            current,
        }
    }
}

impl FromStr for RangeToken {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RangeToken {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Half-open interval `[start, end)`; `start < end` always holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    /// Returns `None` unless `start < end`
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Option<Self> {
        (start < end).then_some(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts < self.end
    }

    /// Window of the same length ending where this one starts
    pub fn preceding(&self) -> TimeWindow {
        TimeWindow {
            start: self.start - self.duration(),
            end: self.start,
        }
    }
}

/// Selected window plus its comparison window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RangeWindows {
    pub current: TimeWindow,
    pub previous: TimeWindow,
}

/// Calendar month in the business's local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct MonthKey {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl MonthKey {
    pub fn containing(ts: DateTime<Utc>, offset: FixedOffset) -> Self {
        let local = ts.with_timezone(&offset);
        Self {
            year: local.year(),
            month: local.month(),
        }
    }

    /// Move by `delta` months (negative goes back)
    pub fn shift(self, delta: i32) -> Self {
        let index = self.year * 12 + (self.month as i32 - 1) + delta;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    /// Local midnight on the 1st, as a UTC instant
    pub fn start(self, offset: FixedOffset) -> DateTime<Utc> {
        // Only fails for years outside chrono's range
        let date = NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN);
        let local_midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        (local_midnight - Duration::seconds(offset.local_minus_utc() as i64)).and_utc()
    }

    pub fn window(self, offset: FixedOffset) -> TimeWindow {
        TimeWindow {
            start: self.start(offset),
            end: self.shift(1).start(offset),
        }
    }

    /// "YYYY-MM"
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// The last `months_back` calendar months including the current one, oldest first
pub fn month_keys(now: DateTime<Utc>, months_back: usize, offset: FixedOffset) -> Vec<MonthKey> {
    let current = MonthKey::containing(now, offset);
    (0..months_back as i32)
        .rev()
        .map(|back| current.shift(-back))
        .collect()
}

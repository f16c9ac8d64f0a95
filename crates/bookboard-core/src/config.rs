//! Analytics configuration
//!
//! Explicit parameters for a report run, optionally loaded from a TOML file
//! such as:
//!
//! ```toml
//! default_range = "30d"
//! top_n = 5
//! leaderboard_top_n = 10
//! bucket_field = "start_time"
//! utc_offset_minutes = 60
//!
//! [business_hours]
//! start = 8
//! end = 21
//! ```

use chrono::{FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::analytics::range::RangeToken;
use crate::analytics::temporal::TimeField;
use crate::error::{CoreError, Result};

/// Largest UTC offset accepted, in minutes (UTC+14 / UTC-12 zones exist)
const MAX_OFFSET_MINUTES: i32 = 14 * 60;

/// Opening hours used for the hourly histogram, `[start, end)` in local hours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    pub start: u32,
    pub end: u32,
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self { start: 8, end: 21 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Range used when the caller does not pick one
    pub default_range: RangeToken,
    /// Insight-card and summary leaderboards
    pub top_n: usize,
    /// Full leaderboard pages
    pub leaderboard_top_n: usize,
    pub business_hours: BusinessHours,
    /// Timestamp that places a booking on the timeline
    pub bucket_field: TimeField,
    /// Business's offset from UTC, used for hour/weekday/month bucketing
    pub utc_offset_minutes: i32,
    /// Length of the monthly trend series
    pub months_back: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_range: RangeToken::DEFAULT,
            top_n: 5,
            leaderboard_top_n: 10,
            business_hours: BusinessHours::default(),
            bucket_field: TimeField::StartTime,
            utc_offset_minutes: 0,
            months_back: 12,
        }
    }
}

impl AnalyticsConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(CoreError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = toml::from_str(&content).map_err(|source| CoreError::ConfigParse {
            path: path.to_path_buf(),
            message: source.message().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let BusinessHours { start, end } = self.business_hours;
        if start >= end || end > 24 {
            return Err(CoreError::InvalidConfig {
                message: format!("business_hours must satisfy start < end <= 24 (got {start}..{end})"),
            });
        }
        if self.top_n == 0 || self.leaderboard_top_n == 0 {
            return Err(CoreError::InvalidConfig {
                message: "top_n and leaderboard_top_n must be at least 1".to_string(),
            });
        }
        if self.months_back == 0 {
            return Err(CoreError::InvalidConfig {
                message: "months_back must be at least 1".to_string(),
            });
        }
        if self.utc_offset_minutes.abs() > MAX_OFFSET_MINUTES {
            return Err(CoreError::InvalidConfig {
                message: format!(
                    "utc_offset_minutes must be within ±{MAX_OFFSET_MINUTES} (got {})",
                    self.utc_offset_minutes
                ),
            });
        }
        Ok(())
    }

    /// Business's UTC offset; out-of-range values fall back to UTC
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_minutes.saturating_mul(60)).unwrap_or(Utc.fix())
    }
}

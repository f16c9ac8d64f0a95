//! Metric aggregation over booking groups
//!
//! Counts and revenue are integers (revenue in cents), so aggregating two
//! disjoint groups and adding the results gives exactly the aggregate of their
//! union. Rates are derived afterwards and never stored in a bucket.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

use crate::models::{BookingRecord, BookingStatus, Money};

/// Booking counts by status
///
/// `pending` is everything not completed, cancelled or no-show
/// (including confirmed and unrecognised labels).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub total: usize,
    pub completed: usize,
    pub cancelled: usize,
    pub no_show: usize,
    pub pending: usize,
}

impl StatusCounts {
    pub fn record(&mut self, status: BookingStatus) {
        self.total += 1;
        match status {
            BookingStatus::Completed => self.completed += 1,
            BookingStatus::Cancelled => self.cancelled += 1,
            BookingStatus::NoShow => self.no_show += 1,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::Unknown => {
                self.pending += 1
            }
        }
    }
}

impl Add for StatusCounts {
    type Output = StatusCounts;

    fn add(self, rhs: StatusCounts) -> StatusCounts {
        StatusCounts {
            total: self.total + rhs.total,
            completed: self.completed + rhs.completed,
            cancelled: self.cancelled + rhs.cancelled,
            no_show: self.no_show + rhs.no_show,
            pending: self.pending + rhs.pending,
        }
    }
}

impl AddAssign for StatusCounts {
    fn add_assign(&mut self, rhs: StatusCounts) {
        *self = *self + rhs;
    }
}

/// Counts plus completed revenue for one bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricSet {
    pub counts: StatusCounts,
    /// Sum of `totalPrice` over completed bookings
    pub revenue: Money,
}

impl MetricSet {
    /// Single-pass aggregate of a group
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a BookingRecord>) -> Self {
        let mut set = MetricSet::default();
        for record in records {
            set.accumulate(record);
        }
        set
    }

    pub fn accumulate(&mut self, record: &BookingRecord) {
        self.counts.record(record.status);
        if record.is_completed() {
            self.revenue += record.total_price();
        }
    }

    pub fn rates(&self) -> Rates {
        compute_rates(&self.counts)
    }

    /// Revenue per completed booking, 0 when nothing completed
    pub fn average_ticket(&self) -> f64 {
        if self.counts.completed == 0 {
            0.0
        } else {
            self.revenue.as_major() / self.counts.completed as f64
        }
    }
}

impl Add for MetricSet {
    type Output = MetricSet;

    fn add(self, rhs: MetricSet) -> MetricSet {
        MetricSet {
            counts: self.counts + rhs.counts,
            revenue: self.revenue + rhs.revenue,
        }
    }
}

impl AddAssign for MetricSet {
    fn add_assign(&mut self, rhs: MetricSet) {
        *self = *self + rhs;
    }
}

/// Status rates in percent (0-100), full precision
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rates {
    pub completion_rate: f64,
    pub cancellation_rate: f64,
    pub no_show_rate: f64,
    pub pending_rate: f64,
}

pub fn compute_counts<'a>(group: impl IntoIterator<Item = &'a BookingRecord>) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for record in group {
        counts.record(record.status);
    }
    counts
}

/// Completed revenue; bookings without a price contribute nothing
pub fn compute_revenue<'a>(group: impl IntoIterator<Item = &'a BookingRecord>) -> Money {
    group
        .into_iter()
        .filter(|r| r.is_completed())
        .map(|r| r.total_price())
        .sum()
}

/// Rates as percentages of `total`; all zero when `total` is zero
pub fn compute_rates(counts: &StatusCounts) -> Rates {
    if counts.total == 0 {
        return Rates::default();
    }

    let pct = |n: usize| n as f64 / counts.total as f64 * 100.0;
    Rates {
        completion_rate: pct(counts.completed),
        cancellation_rate: pct(counts.cancelled),
        no_show_rate: pct(counts.no_show),
        pending_rate: pct(counts.pending),
    }
}

/// A metric that may not be backed by real data yet
///
/// Dashboard cards for figures the backend does not supply (average rating,
/// notifications sent) carry `Unavailable` instead of a made-up number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MetricValue {
    Available { value: f64 },
    Unavailable { reason: String },
}

impl MetricValue {
    pub fn unavailable(reason: &str) -> Self {
        Self::Unavailable {
            reason: reason.to_string(),
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Available { value } => Some(*value),
            Self::Unavailable { .. } => None,
        }
    }
}

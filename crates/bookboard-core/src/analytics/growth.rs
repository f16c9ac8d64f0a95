//! Period-over-period growth
//!
//! One policy for every metric: percentage change against the previous window,
//! 100% for activity appearing from nothing, 0% when both sides are empty.

use serde::{Deserialize, Serialize};

use super::metrics::MetricSet;

/// Percentage change from `previous` to `current`
///
/// - `previous > 0`: `(current - previous) / previous * 100`
/// - `previous <= 0` and `current > 0`: `100` ("new activity")
/// - otherwise: `0`
///
/// Never returns NaN or infinity for finite inputs.
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    if previous > 0.0 {
        (current - previous) / previous * 100.0
    } else if current > 0.0 {
        100.0
    } else {
        0.0
    }
}

/// Growth of one metric between two aggregates
pub fn growth_by<F>(current: &MetricSet, previous: &MetricSet, metric: F) -> f64
where
    F: Fn(&MetricSet) -> f64,
{
    growth_rate(metric(current), metric(previous))
}

/// Direction of a growth figure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GrowthDirection {
    Up,
    Down,
    Flat,
}

impl GrowthDirection {
    pub fn of(rate: f64) -> Self {
        if rate > 0.0 {
            Self::Up
        } else if rate < 0.0 {
            Self::Down
        } else {
            Self::Flat
        }
    }
}

/// Growth figures for the selected range against its comparison window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodGrowth {
    pub bookings: f64,
    pub revenue: f64,
    pub completed: f64,
    pub new_clients: f64,
}

/// Current vs previous window aggregates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub current: MetricSet,
    pub previous: MetricSet,
    pub current_new_clients: usize,
    pub previous_new_clients: usize,
    pub growth: PeriodGrowth,
}

impl PeriodComparison {
    pub fn new(
        current: MetricSet,
        previous: MetricSet,
        current_new_clients: usize,
        previous_new_clients: usize,
    ) -> Self {
        let growth = PeriodGrowth {
            bookings: growth_by(&current, &previous, |m| m.counts.total as f64),
            revenue: growth_by(&current, &previous, |m| m.revenue.as_major()),
            completed: growth_by(&current, &previous, |m| m.counts.completed as f64),
            new_clients: growth_rate(current_new_clients as f64, previous_new_clients as f64),
        };

        Self {
            current,
            previous,
            current_new_clients,
            previous_new_clients,
            growth,
        }
    }

    pub fn booking_direction(&self) -> GrowthDirection {
        GrowthDirection::of(self.growth.bookings)
    }

    pub fn revenue_direction(&self) -> GrowthDirection {
        GrowthDirection::of(self.growth.revenue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::metrics::StatusCounts;
    use crate::models::Money;

    #[test]
    fn test_growth_rate_policy() {
        assert_eq!(growth_rate(0.0, 0.0), 0.0);
        assert_eq!(growth_rate(5.0, 0.0), 100.0);
        assert_eq!(growth_rate(10.0, 5.0), 100.0);
        assert_eq!(growth_rate(5.0, 10.0), -50.0);
        assert_eq!(growth_rate(0.0, 10.0), -100.0);
    }

    #[test]
    fn test_growth_rate_is_finite() {
        for (c, p) in [(0.0, 0.0), (1e9, 0.0), (0.0, 1e-9), (-3.0, 0.0)] {
            assert!(growth_rate(c, p).is_finite());
        }
    }

    #[test]
    fn test_period_comparison() {
        let current = MetricSet {
            counts: StatusCounts {
                total: 12,
                completed: 6,
                pending: 6,
                ..Default::default()
            },
            revenue: Money::from_cents(30_000),
        };
        let previous = MetricSet {
            counts: StatusCounts {
                total: 8,
                completed: 6,
                pending: 2,
                ..Default::default()
            },
            revenue: Money::ZERO,
        };

        let comparison = PeriodComparison::new(current, previous, 3, 0);
        assert_eq!(comparison.growth.bookings, 50.0);
        assert_eq!(comparison.growth.revenue, 100.0);
        assert_eq!(comparison.growth.completed, 0.0);
        assert_eq!(comparison.growth.new_clients, 100.0);
        assert_eq!(comparison.booking_direction(), GrowthDirection::Up);
    }

    #[test]
    fn test_direction() {
        assert_eq!(GrowthDirection::of(-0.5), GrowthDirection::Down);
        assert_eq!(GrowthDirection::of(0.0), GrowthDirection::Flat);
    }
}

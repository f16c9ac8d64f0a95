//! Rule-based insights
//!
//! A fixed, ordered list of threshold rules evaluated over an aggregated
//! snapshot. Rules are evaluated in declaration order and the first
//! [`MAX_INSIGHTS`] that fire are kept. `impact` is descriptive only and plays
//! no part in which insights survive the cut.

use serde::{Deserialize, Serialize};

use super::growth::PeriodGrowth;
use super::metrics::{Rates, StatusCounts};
use super::ranking::CategoryGroup;

/// Maximum number of insights shown on the dashboard
pub const MAX_INSIGHTS: usize = 3;

/// Cancellation rate (percent) above which the rule fires with high impact
pub const HIGH_CANCELLATION_PCT: f64 = 15.0;
/// Cancellation rate (percent) above which the rule fires with medium impact
pub const ELEVATED_CANCELLATION_PCT: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsightKind {
    PeakHour,
    HighCancellation,
    TopService,
    Activity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Impact {
    High,
    Medium,
}

/// Rule-derived observation for an insight card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
    pub impact: Impact,
    pub related_metric: String,
}

/// Busiest hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourCount {
    pub hour: u32,
    pub count: usize,
}

/// Busiest hour among `(hour, count)` buckets; the earliest hour wins ties.
/// `None` when every bucket is empty.
pub fn find_peak_hour(buckets: impl IntoIterator<Item = (u32, usize)>) -> Option<HourCount> {
    buckets
        .into_iter()
        .filter(|&(_, count)| count > 0)
        .fold(None, |best: Option<HourCount>, (hour, count)| match best {
            Some(b) if b.count >= count => Some(b),
            _ => Some(HourCount { hour, count }),
        })
}

/// Everything the rules look at
#[derive(Debug, Clone, PartialEq)]
pub struct InsightSnapshot {
    pub counts: StatusCounts,
    pub rates: Rates,
    pub top_service: Option<CategoryGroup>,
    pub peak_hour: Option<HourCount>,
    pub growth: PeriodGrowth,
}

/// The rule set, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightRule {
    PeakHour,
    HighCancellation,
    TopService,
    Activity,
}

impl InsightRule {
    pub const ALL: [InsightRule; 4] = [
        InsightRule::PeakHour,
        InsightRule::HighCancellation,
        InsightRule::TopService,
        InsightRule::Activity,
    ];

    /// `Some` when the rule fires
    pub fn evaluate(&self, snapshot: &InsightSnapshot) -> Option<Insight> {
        match self {
            Self::PeakHour => {
                let peak = snapshot.peak_hour.filter(|p| p.count > 0)?;
                Some(Insight {
                    kind: InsightKind::PeakHour,
                    title: "Peak hour".to_string(),
                    description: format!(
                        "{:02}:00 is your busiest hour with {} booking{}. Schedule extra staff around it.",
                        peak.hour,
                        peak.count,
                        plural(peak.count)
                    ),
                    impact: Impact::High,
                    related_metric: "peakHour".to_string(),
                })
            }
            Self::HighCancellation => {
                let rate = snapshot.rates.cancellation_rate;
                let impact = if rate > HIGH_CANCELLATION_PCT {
                    Impact::High
                } else if rate > ELEVATED_CANCELLATION_PCT {
                    Impact::Medium
                } else {
                    return None;
                };
                Some(Insight {
                    kind: InsightKind::HighCancellation,
                    title: "High cancellation rate".to_string(),
                    description: format!(
                        "{:.1}% of bookings were cancelled ({} of {}). Consider reminders or a deposit policy.",
                        rate, snapshot.counts.cancelled, snapshot.counts.total
                    ),
                    impact,
                    related_metric: "cancellationRate".to_string(),
                })
            }
            Self::TopService => {
                let service = snapshot.top_service.as_ref()?;
                let count = service.metrics.counts.total;
                Some(Insight {
                    kind: InsightKind::TopService,
                    title: "Most popular service".to_string(),
                    description: format!(
                        "{} leads with {} booking{}.",
                        service.label,
                        count,
                        plural(count)
                    ),
                    impact: Impact::High,
                    related_metric: "topService".to_string(),
                })
            }
            Self::Activity => {
                let total = snapshot.counts.total;
                if total == 0 {
                    return None;
                }
                Some(Insight {
                    kind: InsightKind::Activity,
                    title: "Booking activity".to_string(),
                    description: format!(
                        "{} booking{} in this period ({:+.1}% vs the previous period).",
                        total,
                        plural(total),
                        snapshot.growth.bookings
                    ),
                    impact: Impact::Medium,
                    related_metric: "totalBookings".to_string(),
                })
            }
        }
    }
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

/// Evaluate every rule in order and keep the first [`MAX_INSIGHTS`] that fire
pub fn generate_insights(snapshot: &InsightSnapshot) -> Vec<Insight> {
    InsightRule::ALL
        .iter()
        .filter_map(|rule| rule.evaluate(snapshot))
        .take(MAX_INSIGHTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::metrics::{compute_rates, MetricSet};
    use crate::models::Money;

    fn counts(total: usize, cancelled: usize) -> StatusCounts {
        StatusCounts {
            total,
            cancelled,
            pending: total - cancelled,
            ..Default::default()
        }
    }

    fn service(name: &str, total: usize) -> CategoryGroup {
        CategoryGroup {
            key: name.to_string(),
            label: name.to_string(),
            metrics: MetricSet {
                counts: counts(total, 0),
                revenue: Money::ZERO,
            },
        }
    }

    fn snapshot(total: usize, cancelled: usize) -> InsightSnapshot {
        let counts = counts(total, cancelled);
        InsightSnapshot {
            counts,
            rates: compute_rates(&counts),
            top_service: Some(service("Haircut", 12)),
            peak_hour: Some(HourCount { hour: 14, count: 9 }),
            growth: PeriodGrowth::default(),
        }
    }

    #[test]
    fn test_truncation_follows_declaration_order() {
        let snap = snapshot(50, 10); // 20% cancellation
        let insights = generate_insights(&snap);

        assert_eq!(insights.len(), 3);
        assert_eq!(insights[0].kind, InsightKind::PeakHour);
        assert_eq!(insights[1].kind, InsightKind::HighCancellation);
        assert_eq!(insights[1].impact, Impact::High);
        assert_eq!(insights[2].kind, InsightKind::TopService);
    }

    #[test]
    fn test_medium_impact_rule_is_not_dropped_for_high_impact_ones() {
        // 10% cancellation: medium impact, still ranked by position not impact
        let insights = generate_insights(&snapshot(50, 5));
        assert_eq!(insights[1].kind, InsightKind::HighCancellation);
        assert_eq!(insights[1].impact, Impact::Medium);
        assert!(insights.iter().all(|i| i.kind != InsightKind::Activity));
    }

    #[test]
    fn test_cancellation_thresholds() {
        let rule = InsightRule::HighCancellation;
        let at = |rate: f64| {
            let mut snap = snapshot(100, 0);
            snap.rates.cancellation_rate = rate;
            rule.evaluate(&snap).map(|i| i.impact)
        };
        assert_eq!(at(5.0), None, "exactly 5% does not fire");
        assert_eq!(at(5.5), Some(Impact::Medium));
        assert_eq!(at(15.0), Some(Impact::Medium));
        assert_eq!(at(15.1), Some(Impact::High));
        assert_eq!(at(30.0), Some(Impact::High));
    }

    #[test]
    fn test_activity_fills_in_when_others_do_not_fire() {
        let mut snap = snapshot(20, 0);
        snap.peak_hour = None;
        snap.growth.bookings = 25.0;

        let insights = generate_insights(&snap);
        assert_eq!(insights.len(), 2);
        assert_eq!(insights[0].kind, InsightKind::TopService);
        assert_eq!(insights[1].kind, InsightKind::Activity);
        assert!(insights[1].description.contains("+25.0%"));
    }

    #[test]
    fn test_empty_snapshot_has_no_insights() {
        let snap = InsightSnapshot {
            counts: StatusCounts::default(),
            rates: Rates::default(),
            top_service: None,
            peak_hour: None,
            growth: PeriodGrowth::default(),
        };
        assert!(generate_insights(&snap).is_empty());
    }

    #[test]
    fn test_find_peak_hour() {
        assert_eq!(find_peak_hour([(8, 0), (9, 0)]), None);
        assert_eq!(
            find_peak_hour([(8, 2), (9, 5), (10, 5), (11, 1)]),
            Some(HourCount { hour: 9, count: 5 })
        );
    }

    #[test]
    fn test_insight_serializes_type_field() {
        let insight = InsightRule::PeakHour.evaluate(&snapshot(10, 0)).unwrap();
        let json = serde_json::to_value(&insight).unwrap();
        assert_eq!(json["type"], "peakHour");
        assert_eq!(json["impact"], "high");
        assert_eq!(json["relatedMetric"], "peakHour");
    }
}

//! Categorical grouping and top-N leaderboards
//!
//! Groups keep first-seen order so that ranking ties resolve the same way on
//! every run. Bookings without the grouping field belong to no group.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::metrics::MetricSet;
use crate::models::BookingRecord;

/// One categorical bucket (service, professional, client...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryGroup {
    pub key: String,
    pub label: String,
    pub metrics: MetricSet,
}

/// Metric a leaderboard is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RankMetric {
    Revenue,
    /// All bookings regardless of status
    Visits,
    Completed,
}

impl RankMetric {
    /// Sort key; revenue compares as an exact decimal
    fn score(&self, metrics: &MetricSet) -> Decimal {
        match self {
            Self::Revenue => metrics.revenue.amount(),
            Self::Visits => Decimal::from(metrics.counts.total),
            Self::Completed => Decimal::from(metrics.counts.completed),
        }
    }
}

/// Sort descending by `metric` and keep the first `n`
///
/// The sort is stable: equal scores keep their input order.
pub fn top_n(mut groups: Vec<CategoryGroup>, metric: RankMetric, n: usize) -> Vec<CategoryGroup> {
    groups.sort_by(|a, b| metric.score(&b.metrics).cmp(&metric.score(&a.metrics)));
    groups.truncate(n);
    groups
}

/// Single-pass grouping by an extracted (key, label); `None` skips the record
fn group_by<'a, I, F>(records: I, extract: F) -> Vec<CategoryGroup>
where
    I: IntoIterator<Item = &'a BookingRecord>,
    F: Fn(&BookingRecord) -> Option<(String, String)>,
{
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<CategoryGroup> = Vec::new();

    for record in records {
        let Some((key, label)) = extract(record) else {
            continue;
        };
        let slot = match index.get(&key) {
            Some(&slot) => slot,
            None => {
                index.insert(key.clone(), groups.len());
                groups.push(CategoryGroup {
                    key,
                    label,
                    metrics: MetricSet::default(),
                });
                groups.len() - 1
            }
        };
        groups[slot].metrics.accumulate(record);
    }

    groups
}

pub fn group_by_service<'a>(records: impl IntoIterator<Item = &'a BookingRecord>) -> Vec<CategoryGroup> {
    group_by(records, |r| r.service_name().map(|n| (n.to_string(), n.to_string())))
}

pub fn group_by_service_category<'a>(
    records: impl IntoIterator<Item = &'a BookingRecord>,
) -> Vec<CategoryGroup> {
    group_by(records, |r| {
        r.service_category().map(|c| (c.to_string(), c.to_string()))
    })
}

pub fn group_by_professional<'a>(
    records: impl IntoIterator<Item = &'a BookingRecord>,
) -> Vec<CategoryGroup> {
    group_by(records, |r| {
        r.professional_name().map(|n| (n.to_string(), n.to_string()))
    })
}

/// Keyed by client id, labelled with the client's name
pub fn group_by_client<'a>(records: impl IntoIterator<Item = &'a BookingRecord>) -> Vec<CategoryGroup> {
    group_by(records, |r| {
        r.client().map(|c| {
            let label = if c.name.is_empty() { c.id.clone() } else { c.name.clone() };
            (c.id.clone(), label)
        })
    })
}

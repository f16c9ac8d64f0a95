//! Booking analytics engine
//!
//! Turns a snapshot of booking and client records into the rollups shown on
//! the reporting pages: monthly trends, busy-hour and weekday histograms,
//! leaderboards, status rates, period-over-period growth and rule-based
//! insights. Every function here is pure: same snapshot, range, reference time
//! and config give the same report.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::snapshot::BookingSnapshot;

pub mod growth;
pub mod insights;
pub mod metrics;
pub mod range;
pub mod ranking;
pub mod temporal;

#[cfg(test)]
mod tests;

pub use growth::{growth_by, growth_rate, GrowthDirection, PeriodComparison, PeriodGrowth};
pub use insights::{
    find_peak_hour, generate_insights, HourCount, Impact, Insight, InsightKind, InsightRule,
    InsightSnapshot, MAX_INSIGHTS,
};
pub use metrics::{
    compute_counts, compute_rates, compute_revenue, MetricSet, MetricValue, Rates, StatusCounts,
};
pub use range::{month_keys, MonthKey, RangeToken, RangeWindows, TimeWindow};
pub use ranking::{
    group_by_client, group_by_professional, group_by_service, group_by_service_category, top_n,
    CategoryGroup, RankMetric,
};
pub use temporal::{
    filter_window, group_by_day_of_week, group_by_hour_of_day, group_by_month,
    partition_by_daypart, to_sunday_first, weekday_daypart_matrix, Daypart, DaypartPartition,
    RecordGroup, TimeField, Timestamped,
};

/// One point of a chart series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Client counts for the selected range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    /// All clients in the snapshot
    pub total_clients: usize,
    /// Clients created inside the current window
    pub new_clients: usize,
    /// Clients with two or more bookings inside the current window
    pub returning_clients: usize,
}

/// Figures the dashboard shows but no backend supplies yet
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceholderMetrics {
    pub average_rating: MetricValue,
    pub notifications_sent: MetricValue,
}

impl Default for PlaceholderMetrics {
    fn default() -> Self {
        Self {
            average_rating: MetricValue::unavailable("Ratings are not collected yet"),
            notifications_sent: MetricValue::unavailable("Notification delivery is not tracked yet"),
        }
    }
}

/// Complete report for one range
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingReport {
    pub range: RangeToken,
    pub windows: RangeWindows,
    /// Reference time the report was computed against
    pub generated_at: DateTime<Utc>,

    /// Every booking in the snapshot, dated or not
    pub totals: MetricSet,
    /// Bookings without the bucketing timestamp (only in `totals`)
    pub undated_bookings: usize,

    /// Bookings inside the current window
    pub period: MetricSet,
    pub rates: Rates,
    pub average_ticket: f64,
    pub comparison: PeriodComparison,

    pub monthly_bookings: Vec<ChartPoint>,
    pub monthly_revenue: Vec<ChartPoint>,
    pub monthly_new_clients: Vec<ChartPoint>,
    /// Monday first
    pub weekday_bookings: Vec<ChartPoint>,
    /// Business hours only
    pub hourly_bookings: Vec<ChartPoint>,
    /// `[weekday][daypart]`, Monday first, morning/afternoon/evening
    pub daypart_heatmap: [[usize; 3]; 7],

    pub top_services: Vec<CategoryGroup>,
    pub top_categories: Vec<CategoryGroup>,
    pub top_professionals: Vec<CategoryGroup>,
    pub top_clients: Vec<CategoryGroup>,
    pub clients: ClientSummary,

    pub insights: Vec<Insight>,
    pub placeholders: PlaceholderMetrics,
}

impl BookingReport {
    /// Compute the report for a range token string
    ///
    /// Fails only when `token` is not a known range; callers wanting a
    /// fallback should use [`RangeToken::parse_or_default`] and [`Self::compute`].
    pub fn compute_for_token(
        snapshot: &BookingSnapshot,
        token: &str,
        now: DateTime<Utc>,
        config: &AnalyticsConfig,
    ) -> Result<Self> {
        let range = RangeToken::parse(token)?;
        Ok(Self::compute(snapshot, range, now, config))
    }

    /// Compute the report (sync, pure)
    ///
    /// # Performance
    /// Linear in the number of bookings and clients; each view is a single pass.
    pub fn compute(
        snapshot: &BookingSnapshot,
        range: RangeToken,
        now: DateTime<Utc>,
        config: &AnalyticsConfig,
    ) -> Self {
        let offset = config.offset();
        let field = config.bucket_field;
        let bookings = &snapshot.bookings;
        let windows = range.resolve(now, offset);

        let totals = MetricSet::from_records(bookings);
        let undated_bookings = bookings
            .iter()
            .filter(|b| b.timestamp(field).is_none())
            .count();
        if undated_bookings > 0 {
            tracing::warn!(
                "{} of {} bookings missing {:?}, excluded from time-keyed views",
                undated_bookings,
                bookings.len(),
                field
            );
        }

        let current = filter_window(bookings, &windows.current, field);
        let previous = filter_window(bookings, &windows.previous, field);
        tracing::debug!(
            range = %range,
            current = current.len(),
            previous = previous.len(),
            "Computing booking report"
        );

        let period = MetricSet::from_records(current.iter().copied());
        let rates = period.rates();
        let current_new_clients =
            filter_window(&snapshot.clients, &windows.current, TimeField::CreatedAt).len();
        let previous_new_clients =
            filter_window(&snapshot.clients, &windows.previous, TimeField::CreatedAt).len();
        let comparison = PeriodComparison::new(
            period,
            MetricSet::from_records(previous.iter().copied()),
            current_new_clients,
            previous_new_clients,
        );

        // Monthly trends cover the whole snapshot, not just the selected range
        let months = group_by_month(bookings, now, config.months_back, field, offset);
        let monthly_metrics: Vec<(String, MetricSet)> = months
            .into_iter()
            .map(|m| (m.label, MetricSet::from_records(m.records)))
            .collect();
        let monthly_bookings = monthly_metrics
            .iter()
            .map(|(label, m)| ChartPoint::new(label.clone(), m.counts.total as f64))
            .collect();
        let monthly_revenue = monthly_metrics
            .iter()
            .map(|(label, m)| ChartPoint::new(label.clone(), m.revenue.as_major()))
            .collect();
        let monthly_new_clients = group_by_month(
            &snapshot.clients,
            now,
            config.months_back,
            TimeField::CreatedAt,
            offset,
        )
        .into_iter()
        .map(|m| ChartPoint::new(m.label.clone(), m.len() as f64))
        .collect();

        let weekday_bookings = group_by_day_of_week(current.iter().copied(), field, offset)
            .into_iter()
            .map(|d| ChartPoint::new(d.label.clone(), d.len() as f64))
            .collect();
        let hours = group_by_hour_of_day(
            current.iter().copied(),
            field,
            config.business_hours.start,
            config.business_hours.end,
            offset,
        );
        let peak_hour = find_peak_hour(hours.iter().map(|h| (h.key, h.len())));
        let hourly_bookings = hours
            .iter()
            .map(|h| ChartPoint::new(h.label.clone(), h.len() as f64))
            .collect();
        let daypart_heatmap = weekday_daypart_matrix(current.iter().copied(), field, offset);

        let services = group_by_service(current.iter().copied());
        let top_service = top_n(services.clone(), RankMetric::Visits, 1).into_iter().next();
        let top_services = top_n(services, RankMetric::Revenue, config.top_n);
        let top_categories = top_n(
            group_by_service_category(current.iter().copied()),
            RankMetric::Revenue,
            config.top_n,
        );
        let top_professionals = top_n(
            group_by_professional(current.iter().copied()),
            RankMetric::Completed,
            config.leaderboard_top_n,
        );

        let client_groups = group_by_client(current.iter().copied());
        let returning_clients = client_groups
            .iter()
            .filter(|g| g.metrics.counts.total >= 2)
            .count();
        let top_clients = top_n(client_groups, RankMetric::Visits, config.leaderboard_top_n);

        let insights = generate_insights(&InsightSnapshot {
            counts: period.counts,
            rates,
            top_service,
            peak_hour,
            growth: comparison.growth,
        });

        Self {
            range,
            windows,
            generated_at: now,
            totals,
            undated_bookings,
            period,
            rates,
            average_ticket: period.average_ticket(),
            comparison,
            monthly_bookings,
            monthly_revenue,
            monthly_new_clients,
            weekday_bookings,
            hourly_bookings,
            daypart_heatmap,
            top_services,
            top_categories,
            top_professionals,
            top_clients,
            clients: ClientSummary {
                total_clients: snapshot.clients.len(),
                new_clients: current_new_clients,
                returning_clients,
            },
            insights,
            placeholders: PlaceholderMetrics::default(),
        }
    }

    /// Weekday series reordered Sunday first
    pub fn weekday_bookings_sunday_first(&self) -> Vec<ChartPoint> {
        match <[ChartPoint; 7]>::try_from(self.weekday_bookings.clone()) {
            Ok(week) => to_sunday_first(&week).to_vec(),
            Err(series) => series,
        }
    }
}

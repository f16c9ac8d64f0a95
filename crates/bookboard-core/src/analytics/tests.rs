//! Unit tests for the analytics engine as a whole

use super::*;
use chrono::{Duration, FixedOffset, TimeZone};
use proptest::prelude::*;

use crate::models::{
    BookingRecord, BookingStatus, ClientRecord, ClientRef, Money, Pricing, ProfessionalRef,
    ServiceRef,
};

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

fn reference_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
}

fn booking(
    id: usize,
    start: DateTime<Utc>,
    service: &str,
    status: BookingStatus,
    price: f64,
) -> BookingRecord {
    BookingRecord {
        id: format!("booking-{}", id).into(),
        service_ref: Some(ServiceRef {
            name: service.to_string(),
            category: Some("Salon".to_string()),
            price: Some(price),
            duration: Some(60),
        }),
        professional_ref: Some(ProfessionalRef {
            name: format!("pro-{}", id % 3),
        }),
        client_ref: Some(ClientRef {
            id: format!("client-{}", id % 10),
            name: format!("Client {}", id % 10),
        }),
        start_time: Some(start),
        created_at: Some(start - Duration::days(2)),
        updated_at: Some(start),
        status,
        pricing: Some(Pricing {
            total_price: Some(price),
            currency: Some("EUR".to_string()),
        }),
    }
}

/// Spread `count` bookings over the last `days` days, one per hour slot from 09:00
fn generate_test_bookings(count: usize, days: usize) -> Vec<BookingRecord> {
    let base = reference_now() - Duration::hours(3);
    (0..count)
        .map(|i| {
            let start = base - Duration::days((i % days) as i64) - Duration::hours((i % 5) as i64);
            let status = match i % 4 {
                0 | 1 => BookingStatus::Completed,
                2 => BookingStatus::Cancelled,
                _ => BookingStatus::Confirmed,
            };
            booking(i, start, if i % 2 == 0 { "Cut" } else { "Color" }, status, 25.0)
        })
        .collect()
}

/// 100 bookings over Aug-Oct 2026. October: 40 bookings, 40% completed,
/// 30% cancelled, 30% pending; 25 of them are "Balayage".
fn three_month_scenario() -> Vec<BookingRecord> {
    let mut bookings = Vec::new();
    let others = ["Manicure", "Massage", "Facial"];

    for month in [8u32, 9] {
        for i in 0..30 {
            let start = Utc
                .with_ymd_and_hms(2026, month, 1 + (i % 28) as u32, 10 + (i % 6) as u32, 0, 0)
                .unwrap();
            let id = bookings.len();
            bookings.push(booking(id, start, others[i % 3], BookingStatus::Completed, 30.0));
        }
    }

    for i in 0..40usize {
        let start = Utc
            .with_ymd_and_hms(2026, 10, 1 + (i % 18) as u32, 9 + (i % 10) as u32, 0, 0)
            .unwrap();
        let status = if i < 16 {
            BookingStatus::Completed
        } else if i < 28 {
            BookingStatus::Cancelled
        } else {
            BookingStatus::Pending
        };
        let service = if i < 25 { "Balayage" } else { "Brow Tint" };
        let id = bookings.len();
        bookings.push(booking(id, start, service, status, 120.0));
    }

    bookings
}

// ============================================================================
// End-to-end scenario
// ============================================================================

#[test]
fn test_three_month_scenario_month_three() {
    let bookings = three_month_scenario();
    assert_eq!(bookings.len(), 100);

    let months = group_by_month(&bookings, reference_now(), 12, TimeField::StartTime, utc());
    assert_eq!(months.len(), 12);
    let october = &months[11];
    assert_eq!(october.label, "2026-10");
    assert_eq!(october.len(), 40);
    assert_eq!(months[10].len(), 30);
    assert_eq!(months[9].len(), 30);

    let counts = compute_counts(october.records.iter().copied());
    let rates = compute_rates(&counts);
    assert_eq!(rates.completion_rate, 40.0);
    assert_eq!(rates.cancellation_rate, 30.0);
    assert_eq!(rates.pending_rate, 30.0);

    let by_revenue = top_n(
        group_by_service(october.records.iter().copied()),
        RankMetric::Revenue,
        1,
    );
    assert_eq!(by_revenue.len(), 1);
    assert_eq!(by_revenue[0].key, "Balayage");
    assert_eq!(by_revenue[0].metrics.counts.total, 25);

    let hours = group_by_hour_of_day(october.records.iter().copied(), TimeField::StartTime, 8, 21, utc());
    let insights = generate_insights(&InsightSnapshot {
        counts,
        rates,
        top_service: by_revenue.into_iter().next(),
        peak_hour: find_peak_hour(hours.iter().map(|h| (h.key, h.len()))),
        growth: PeriodGrowth::default(),
    });

    let cancellation = insights
        .iter()
        .find(|i| i.kind == InsightKind::HighCancellation)
        .expect("cancellation rule should fire at 30%");
    assert_eq!(cancellation.impact, Impact::High);
    assert_eq!(insights[0].kind, InsightKind::PeakHour);
}

#[test]
fn test_three_month_scenario_report() {
    let snapshot = BookingSnapshot::new(three_month_scenario(), Vec::new());
    let report = BookingReport::compute(
        &snapshot,
        RangeToken::Last12Months,
        reference_now(),
        &AnalyticsConfig::default(),
    );

    let tail: Vec<f64> = report.monthly_bookings[9..].iter().map(|p| p.value).collect();
    assert_eq!(tail, vec![30.0, 30.0, 40.0]);
    assert_eq!(report.period.counts.total, 100);
    assert_eq!(report.period.counts.completed, 76);
    assert_eq!(report.period.revenue, Money::from_cents(60 * 3000 + 16 * 12000));

    // 12 cancelled out of 100 over the whole range: medium impact
    assert_eq!(report.insights.len(), 3);
    assert_eq!(report.insights[0].kind, InsightKind::PeakHour);
    assert_eq!(report.insights[1].kind, InsightKind::HighCancellation);
    assert_eq!(report.insights[1].impact, Impact::Medium);
    assert_eq!(report.insights[2].kind, InsightKind::TopService);
    assert!(report.insights[2].description.contains("Balayage"));

    // Nothing before the range: all growth counts as new activity
    assert_eq!(report.comparison.growth.bookings, 100.0);
    assert_eq!(report.top_services[0].key, "Balayage");
}

// ============================================================================
// Report assembly
// ============================================================================

#[test]
fn test_report_empty_snapshot() {
    let report = BookingReport::compute(
        &BookingSnapshot::default(),
        RangeToken::Last30Days,
        reference_now(),
        &AnalyticsConfig::default(),
    );

    assert_eq!(report.totals, MetricSet::default());
    assert_eq!(report.rates, Rates::default());
    assert_eq!(report.monthly_bookings.len(), 12);
    assert!(report.monthly_bookings.iter().all(|p| p.value == 0.0));
    assert_eq!(report.weekday_bookings.len(), 7);
    assert_eq!(report.hourly_bookings.len(), 13);
    assert!(report.insights.is_empty());
    assert_eq!(report.comparison.growth, PeriodGrowth::default());
    assert!(report.placeholders.average_rating.value().is_none());
}

#[test]
fn test_report_undated_bookings_only_in_totals() {
    let mut bookings = generate_test_bookings(20, 10);
    for b in bookings.iter_mut().take(5) {
        b.start_time = None;
    }

    let report = BookingReport::compute(
        &BookingSnapshot::new(bookings, Vec::new()),
        RangeToken::Last30Days,
        reference_now(),
        &AnalyticsConfig::default(),
    );

    assert_eq!(report.totals.counts.total, 20);
    assert_eq!(report.undated_bookings, 5);
    assert_eq!(report.period.counts.total, 15);
    let weekday_total: f64 = report.weekday_bookings.iter().map(|p| p.value).sum();
    assert_eq!(weekday_total, 15.0);
}

#[test]
fn test_report_period_comparison() {
    // 10 bookings in the last 7 days, 5 in the 7 days before
    let now = reference_now();
    let mut bookings: Vec<BookingRecord> = (0..10)
        .map(|i| booking(i, now - Duration::days(1) - Duration::hours(i as i64), "Cut", BookingStatus::Completed, 20.0))
        .collect();
    bookings.extend(
        (10..15).map(|i| booking(i, now - Duration::days(9), "Cut", BookingStatus::Completed, 20.0)),
    );
    let clients = vec![
        ClientRecord {
            id: "new".to_string(),
            created_at: Some(now - Duration::days(2)),
        },
        ClientRecord {
            id: "old".to_string(),
            created_at: Some(now - Duration::days(400)),
        },
    ];

    let report = BookingReport::compute(
        &BookingSnapshot::new(bookings, clients),
        RangeToken::Last7Days,
        now,
        &AnalyticsConfig::default(),
    );

    assert_eq!(report.comparison.current.counts.total, 10);
    assert_eq!(report.comparison.previous.counts.total, 5);
    assert_eq!(report.comparison.growth.bookings, 100.0);
    assert_eq!(report.comparison.growth.revenue, 100.0);
    assert_eq!(report.comparison.booking_direction(), GrowthDirection::Up);
    assert_eq!(report.clients.total_clients, 2);
    assert_eq!(report.clients.new_clients, 1);
    assert_eq!(report.average_ticket, 20.0);
}

#[test]
fn test_report_leaderboards_respect_limits() {
    let bookings = generate_test_bookings(200, 30);
    let config = AnalyticsConfig {
        top_n: 1,
        leaderboard_top_n: 2,
        ..Default::default()
    };

    let report = BookingReport::compute(
        &BookingSnapshot::new(bookings, Vec::new()),
        RangeToken::Last90Days,
        reference_now(),
        &config,
    );

    assert_eq!(report.top_services.len(), 1);
    assert_eq!(report.top_professionals.len(), 2);
    assert_eq!(report.top_clients.len(), 2);
    assert!(report.clients.returning_clients > 0);
}

#[test]
fn test_report_ignores_bookings_without_service() {
    let now = reference_now();
    let mut bookings = vec![booking(0, now - Duration::days(1), "Balayage", BookingStatus::Completed, 80.0)];
    for i in 1..5 {
        let mut b = booking(i, now - Duration::days(2), "unused", BookingStatus::Completed, 200.0);
        b.service_ref = None;
        b.client_ref = None;
        bookings.push(b);
    }

    let report = BookingReport::compute(
        &BookingSnapshot::new(bookings, Vec::new()),
        RangeToken::Last7Days,
        now,
        &AnalyticsConfig::default(),
    );

    assert_eq!(report.period.counts.total, 5);
    assert_eq!(report.top_services.len(), 1);
    assert_eq!(report.top_services[0].key, "Balayage");
    assert_eq!(report.top_categories.len(), 1);
    assert_eq!(report.top_clients.len(), 1);

    let top_service = report
        .insights
        .iter()
        .find(|i| i.kind == InsightKind::TopService)
        .expect("one real service exists");
    assert!(top_service.description.starts_with("Balayage leads with 1 booking."));
}

#[test]
fn test_report_without_any_service_skips_top_service_insight() {
    let now = reference_now();
    let bookings: Vec<BookingRecord> = (0..3)
        .map(|i| BookingRecord {
            start_time: Some(now - Duration::hours(i + 1)),
            status: BookingStatus::Completed,
            ..Default::default()
        })
        .collect();

    let report = BookingReport::compute(
        &BookingSnapshot::new(bookings, Vec::new()),
        RangeToken::Last7Days,
        now,
        &AnalyticsConfig::default(),
    );

    assert!(report.top_services.is_empty());
    assert!(report.insights.iter().all(|i| i.kind != InsightKind::TopService));
}

#[test]
fn test_report_revenue_keeps_sub_cent_prices() {
    let now = reference_now();
    let bookings: Vec<BookingRecord> = (0..3)
        .map(|i| booking(i, now - Duration::days(1), "Sample", BookingStatus::Completed, 0.004))
        .collect();

    let report = BookingReport::compute(
        &BookingSnapshot::new(bookings, Vec::new()),
        RangeToken::Last7Days,
        now,
        &AnalyticsConfig::default(),
    );

    assert_eq!(report.period.revenue, Money::from_major(0.012));
    assert!(report.period.revenue > Money::ZERO);
}

#[test]
fn test_report_rejects_unknown_token() {
    let result = BookingReport::compute_for_token(
        &BookingSnapshot::default(),
        "fortnight",
        reference_now(),
        &AnalyticsConfig::default(),
    );
    assert!(matches!(result, Err(crate::CoreError::InvalidRange { .. })));
}

#[test]
fn test_weekday_sunday_first_view() {
    let bookings = generate_test_bookings(30, 7);
    let report = BookingReport::compute(
        &BookingSnapshot::new(bookings, Vec::new()),
        RangeToken::Last7Days,
        reference_now(),
        &AnalyticsConfig::default(),
    );

    let sunday_first = report.weekday_bookings_sunday_first();
    assert_eq!(sunday_first[0].label, "Sun");
    assert_eq!(sunday_first[1].label, "Mon");
    assert_eq!(sunday_first[0].value, report.weekday_bookings[6].value);
}

#[test]
fn test_report_serializes_for_presentation() {
    let report = BookingReport::compute(
        &BookingSnapshot::new(generate_test_bookings(10, 5), Vec::new()),
        RangeToken::Last30Days,
        reference_now(),
        &AnalyticsConfig::default(),
    );

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["range"], "30d");
    assert!(json["monthlyBookings"].is_array());
    assert_eq!(json["placeholders"]["averageRating"]["status"], "unavailable");
}

// ============================================================================
// Properties
// ============================================================================

fn status_from(index: u8) -> BookingStatus {
    match index % 6 {
        0 => BookingStatus::Pending,
        1 => BookingStatus::Confirmed,
        2 => BookingStatus::Completed,
        3 => BookingStatus::Cancelled,
        4 => BookingStatus::NoShow,
        _ => BookingStatus::Unknown,
    }
}

fn arb_bookings() -> impl Strategy<Value = Vec<BookingRecord>> {
    prop::collection::vec((0u8..6, prop::option::of(0i64..500_000)), 0..200).prop_map(|rows| {
        rows.into_iter()
            .map(|(status, cents)| BookingRecord {
                status: status_from(status),
                pricing: cents.map(|c| Pricing {
                    total_price: Some(c as f64 / 100.0),
                    currency: None,
                }),
                ..Default::default()
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn prop_aggregation_is_associative(bookings in arb_bookings(), split in 0usize..200) {
        let split = split.min(bookings.len());
        let (left, right) = bookings.split_at(split);

        let combined = MetricSet::from_records(left) + MetricSet::from_records(right);
        prop_assert_eq!(combined, MetricSet::from_records(&bookings));
        prop_assert_eq!(
            compute_revenue(left) + compute_revenue(right),
            compute_revenue(&bookings)
        );
        prop_assert_eq!(
            compute_counts(left) + compute_counts(right),
            compute_counts(&bookings)
        );
    }

    #[test]
    fn prop_rates_sum_to_hundred(bookings in arb_bookings()) {
        let counts = compute_counts(&bookings);
        let rates = compute_rates(&counts);
        let sum = rates.completion_rate + rates.cancellation_rate + rates.no_show_rate + rates.pending_rate;

        if counts.total > 0 {
            prop_assert!((sum - 100.0).abs() < 1e-9, "sum was {}", sum);
        } else {
            prop_assert_eq!(sum, 0.0);
        }
    }

    #[test]
    fn prop_month_buckets_always_complete(offsets in prop::collection::vec(0i64..2_000, 0..50)) {
        let now = reference_now();
        let bookings: Vec<BookingRecord> = offsets
            .iter()
            .map(|&days| BookingRecord {
                start_time: Some(now - Duration::days(days)),
                ..Default::default()
            })
            .collect();

        let months = group_by_month(&bookings, now, 12, TimeField::StartTime, utc());
        prop_assert_eq!(months.len(), 12);
        prop_assert!(months.windows(2).all(|w| w[0].key < w[1].key));
        prop_assert_eq!(months[11].key, MonthKey { year: 2026, month: 10 });
    }
}

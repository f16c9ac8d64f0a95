//! CLI helpers for report commands
//!
//! Argument parsing helpers and table/JSON formatters over `BookingReport`.

use anyhow::{Context, Result};
use bookboard_core::analytics::{BookingReport, CategoryGroup, Insight, Impact};
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Color, ContentArrangement, Row, Table};

// ============================================================================
// Argument helpers
// ============================================================================

/// Parse the reference time: RFC 3339, or the current time when absent
pub fn parse_now(value: Option<&str>) -> Result<DateTime<Utc>> {
    match value {
        Some(s) => {
            let parsed = DateTime::parse_from_rfc3339(s.trim())
                .with_context(|| format!("Invalid --now '{}' (expected RFC 3339)", s))?;
            Ok(parsed.with_timezone(&Utc))
        }
        None => Ok(Utc::now()),
    }
}

// ============================================================================
// Formatters
// ============================================================================

fn new_table(headers: &[&str], no_color: bool) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    if no_color {
        table.set_header(headers.to_vec());
    } else {
        table.set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).fg(Color::Cyan))
                .collect::<Vec<_>>(),
        );
    }
    table
}

/// Format the full report (human) or JSON
pub fn format_report(report: &BookingReport, json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string());
    }

    let mut sections = vec![format!(
        "bookboard - {} ({} → {})",
        report.range.label(),
        report.windows.current.start().format("%Y-%m-%d %H:%M"),
        report.windows.current.end().format("%Y-%m-%d %H:%M")
    )];

    if report.period.counts.total == 0 {
        sections.push("No bookings in this range.".to_string());
        return sections.join("\n\n");
    }

    let counts = &report.period.counts;
    let rates = &report.rates;
    let growth = &report.comparison.growth;
    let mut summary = new_table(&["Metric", "Value", "vs previous"], no_color);
    summary.add_row(Row::from(vec![
        "Bookings".to_string(),
        counts.total.to_string(),
        format_growth(growth.bookings),
    ]));
    summary.add_row(Row::from(vec![
        "Revenue".to_string(),
        format_money(report.period.revenue.as_major()),
        format_growth(growth.revenue),
    ]));
    summary.add_row(Row::from(vec![
        "Completed".to_string(),
        format!("{} ({})", counts.completed, format_percent(rates.completion_rate)),
        format_growth(growth.completed),
    ]));
    summary.add_row(Row::from(vec![
        "Cancelled".to_string(),
        format!("{} ({})", counts.cancelled, format_percent(rates.cancellation_rate)),
        String::new(),
    ]));
    summary.add_row(Row::from(vec![
        "No-show".to_string(),
        format!("{} ({})", counts.no_show, format_percent(rates.no_show_rate)),
        String::new(),
    ]));
    summary.add_row(Row::from(vec![
        "Pending".to_string(),
        format!("{} ({})", counts.pending, format_percent(rates.pending_rate)),
        String::new(),
    ]));
    summary.add_row(Row::from(vec![
        "Average ticket".to_string(),
        format_money(report.average_ticket),
        String::new(),
    ]));
    summary.add_row(Row::from(vec![
        "New clients".to_string(),
        report.clients.new_clients.to_string(),
        format_growth(growth.new_clients),
    ]));
    summary.add_row(Row::from(vec![
        "Returning clients".to_string(),
        report.clients.returning_clients.to_string(),
        String::new(),
    ]));
    sections.push(summary.to_string());

    sections.push(format!(
        "Top services\n{}",
        format_leaderboard(&report.top_services, no_color)
    ));
    sections.push(format!(
        "Top professionals\n{}",
        format_leaderboard(&report.top_professionals, no_color)
    ));

    if report.undated_bookings > 0 {
        sections.push(format!(
            "{} booking(s) without a date are counted in totals only.",
            report.undated_bookings
        ));
    }

    sections.push(format_insights(&report.insights, false, no_color));
    sections.join("\n\n")
}

fn format_leaderboard(groups: &[CategoryGroup], no_color: bool) -> String {
    if groups.is_empty() {
        return "  -".to_string();
    }

    let mut table = new_table(&["#", "Name", "Bookings", "Completed", "Revenue"], no_color);
    for (rank, group) in groups.iter().enumerate() {
        table.add_row(Row::from(vec![
            (rank + 1).to_string(),
            truncate(&group.label, 30),
            group.metrics.counts.total.to_string(),
            group.metrics.counts.completed.to_string(),
            format_money(group.metrics.revenue.as_major()),
        ]));
    }
    table.to_string()
}

/// Format the monthly trend series (human or JSON)
pub fn format_trend(report: &BookingReport, json: bool, no_color: bool) -> String {
    if json {
        let trend = serde_json::json!({
            "bookings": report.monthly_bookings,
            "revenue": report.monthly_revenue,
            "newClients": report.monthly_new_clients,
        });
        return serde_json::to_string_pretty(&trend).unwrap_or_else(|_| "{}".to_string());
    }

    let mut table = new_table(&["Month", "Bookings", "Revenue", "New clients"], no_color);
    let rows = report
        .monthly_bookings
        .iter()
        .zip(&report.monthly_revenue)
        .zip(&report.monthly_new_clients);
    for ((bookings, revenue), clients) in rows {
        table.add_row(Row::from(vec![
            bookings.label.clone(),
            format!("{}", bookings.value),
            format_money(revenue.value),
            format!("{}", clients.value),
        ]));
    }
    table.to_string()
}

/// Format insight cards (human or JSON)
pub fn format_insights(insights: &[Insight], json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(insights).unwrap_or_else(|_| "[]".to_string());
    }

    if insights.is_empty() {
        return "No insights for this range.".to_string();
    }

    let mut table = new_table(&["Impact", "Insight", "Details"], no_color);
    for insight in insights {
        let impact = match insight.impact {
            Impact::High => "HIGH",
            Impact::Medium => "MEDIUM",
        };
        let impact_cell = if no_color {
            Cell::new(impact)
        } else {
            let color = match insight.impact {
                Impact::High => Color::Red,
                Impact::Medium => Color::Yellow,
            };
            Cell::new(impact).fg(color)
        };
        table.add_row(Row::from(vec![
            impact_cell,
            Cell::new(&insight.title),
            Cell::new(&insight.description),
        ]));
    }
    table.to_string()
}

// ============================================================================
// Utilities
// ============================================================================

fn format_money(amount: f64) -> String {
    format!("{:.2}", amount)
}

fn format_percent(rate: f64) -> String {
    format!("{:.1}%", rate)
}

fn format_growth(rate: f64) -> String {
    format!("{:+.1}%", rate)
}

fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max - 1).collect::<String>() + "…"
    }
}

// ============================================================================
// Tests
// ============================================================================

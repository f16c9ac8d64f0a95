//! Temporal bucketing of booking and client records
//!
//! Groups records by calendar month, weekday, hour of day and daypart in the
//! business's local time. Each view is built in a single pass. Records without
//! the chosen timestamp are left out of every view here; they still count in
//! the global totals computed elsewhere.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::range::{month_keys, MonthKey, TimeWindow};
use crate::models::{BookingRecord, ClientRecord};

/// Which timestamp drives bucketing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeField {
    /// When the record was created ("new bookings" / "new clients")
    CreatedAt,
    /// When the appointment happens (scheduling views)
    #[default]
    StartTime,
}

/// Anything that can be placed on a timeline
pub trait Timestamped {
    fn timestamp(&self, field: TimeField) -> Option<DateTime<Utc>>;
}

impl Timestamped for BookingRecord {
    fn timestamp(&self, field: TimeField) -> Option<DateTime<Utc>> {
        match field {
            TimeField::CreatedAt => self.created_at,
            TimeField::StartTime => self.start_time,
        }
    }
}

impl Timestamped for ClientRecord {
    /// Clients only have a creation time; both fields resolve to it
    fn timestamp(&self, _field: TimeField) -> Option<DateTime<Utc>> {
        self.created_at
    }
}

/// Records assigned to one bucket
#[derive(Debug, Clone)]
pub struct RecordGroup<'a, K, T> {
    pub key: K,
    pub label: String,
    pub records: Vec<&'a T>,
}

impl<'a, K, T> RecordGroup<'a, K, T> {
    fn new(key: K, label: String) -> Self {
        Self {
            key,
            label,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Morning / afternoon / evening split of the day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Daypart {
    /// Before 12:00
    Morning,
    /// 12:00 to 17:59
    Afternoon,
    /// 18:00 onwards
    Evening,
}

impl Daypart {
    pub const ALL: [Daypart; 3] = [Daypart::Morning, Daypart::Afternoon, Daypart::Evening];

    pub fn from_hour(hour: u32) -> Self {
        match hour {
            0..=11 => Self::Morning,
            12..=17 => Self::Afternoon,
            _ => Self::Evening,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Morning => 0,
            Self::Afternoon => 1,
            Self::Evening => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
        }
    }
}

/// Records split by daypart
#[derive(Debug, Clone)]
pub struct DaypartPartition<'a, T> {
    pub morning: Vec<&'a T>,
    pub afternoon: Vec<&'a T>,
    pub evening: Vec<&'a T>,
}

impl<'a, T> DaypartPartition<'a, T> {
    pub fn get(&self, daypart: Daypart) -> &[&'a T] {
        match daypart {
            Daypart::Morning => &self.morning,
            Daypart::Afternoon => &self.afternoon,
            Daypart::Evening => &self.evening,
        }
    }
}

/// Weekdays in canonical order (Monday first)
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Mon",
        Weekday::Tue => "Tue",
        Weekday::Wed => "Wed",
        Weekday::Thu => "Thu",
        Weekday::Fri => "Fri",
        Weekday::Sat => "Sat",
        Weekday::Sun => "Sun",
    }
}

/// Reorder a Monday-first weekday series to Sunday-first for legacy consumers
pub fn to_sunday_first<T: Clone>(monday_first: &[T; 7]) -> [T; 7] {
    let mut out = monday_first.clone();
    out.rotate_right(1);
    out
}

fn local(ts: DateTime<Utc>, offset: FixedOffset) -> DateTime<FixedOffset> {
    ts.with_timezone(&offset)
}

/// Keep records whose `field` timestamp falls inside `window`
pub fn filter_window<'a, T, I>(records: I, window: &TimeWindow, field: TimeField) -> Vec<&'a T>
where
    T: Timestamped + 'a,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter(|r| r.timestamp(field).is_some_and(|ts| window.contains(ts)))
        .collect()
}

/// Group by calendar month
///
/// Always returns exactly `months_back` buckets, oldest first, ending with the
/// month containing `now`. Months without records are present and empty.
/// Records outside those months are ignored.
pub fn group_by_month<'a, T, I>(
    records: I,
    now: DateTime<Utc>,
    months_back: usize,
    field: TimeField,
    offset: FixedOffset,
) -> Vec<RecordGroup<'a, MonthKey, T>>
where
    T: Timestamped + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let keys = month_keys(now, months_back, offset);
    let index: HashMap<MonthKey, usize> = keys.iter().enumerate().map(|(i, k)| (*k, i)).collect();
    let mut buckets: Vec<RecordGroup<'a, MonthKey, T>> = keys
        .into_iter()
        .map(|key| RecordGroup::new(key, key.label()))
        .collect();

    for record in records {
        let Some(ts) = record.timestamp(field) else {
            continue;
        };
        if let Some(&i) = index.get(&MonthKey::containing(ts, offset)) {
            buckets[i].records.push(record);
        }
    }

    buckets
}

/// Group by weekday: exactly seven buckets, Monday first
pub fn group_by_day_of_week<'a, T, I>(
    records: I,
    field: TimeField,
    offset: FixedOffset,
) -> Vec<RecordGroup<'a, Weekday, T>>
where
    T: Timestamped + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut buckets: Vec<RecordGroup<'a, Weekday, T>> = WEEKDAYS
        .iter()
        .map(|&day| RecordGroup::new(day, weekday_label(day).to_string()))
        .collect();

    for record in records {
        if let Some(ts) = record.timestamp(field) {
            let day = local(ts, offset).weekday();
            buckets[day.num_days_from_monday() as usize].records.push(record);
        }
    }

    buckets
}

/// Group by local hour, one bucket per hour in `[start_hour, end_hour)`
///
/// Records outside business hours are dropped from this view only.
/// `end_hour` is clamped to 24; an empty range yields no buckets.
pub fn group_by_hour_of_day<'a, T, I>(
    records: I,
    field: TimeField,
    start_hour: u32,
    end_hour: u32,
    offset: FixedOffset,
) -> Vec<RecordGroup<'a, u32, T>>
where
    T: Timestamped + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let end_hour = end_hour.min(24);
    let mut buckets: Vec<RecordGroup<'a, u32, T>> = (start_hour..end_hour)
        .map(|hour| RecordGroup::new(hour, format!("{:02}:00", hour)))
        .collect();

    for record in records {
        let Some(ts) = record.timestamp(field) else {
            continue;
        };
        let hour = local(ts, offset).hour();
        if (start_hour..end_hour).contains(&hour) {
            buckets[(hour - start_hour) as usize].records.push(record);
        }
    }

    buckets
}

/// Split records into morning, afternoon and evening
pub fn partition_by_daypart<'a, T, I>(
    records: I,
    field: TimeField,
    offset: FixedOffset,
) -> DaypartPartition<'a, T>
where
    T: Timestamped + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut partition = DaypartPartition {
        morning: Vec::new(),
        afternoon: Vec::new(),
        evening: Vec::new(),
    };

    for record in records {
        let Some(ts) = record.timestamp(field) else {
            continue;
        };
        match Daypart::from_hour(local(ts, offset).hour()) {
            Daypart::Morning => partition.morning.push(record),
            Daypart::Afternoon => partition.afternoon.push(record),
            Daypart::Evening => partition.evening.push(record),
        }
    }

    partition
}

/// Weekday x daypart record counts: `[weekday][daypart]`, weekday Monday first
pub fn weekday_daypart_matrix<'a, T, I>(
    records: I,
    field: TimeField,
    offset: FixedOffset,
) -> [[usize; 3]; 7]
where
    T: Timestamped + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut matrix = [[0usize; 3]; 7];
    for record in records {
        if let Some(ts) = record.timestamp(field) {
            let local_ts = local(ts, offset);
            let day = local_ts.weekday().num_days_from_monday() as usize;
            matrix[day][Daypart::from_hour(local_ts.hour()).index()] += 1;
        }
    }
    matrix
}

//! Booking and client records as delivered by the bookings API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

use super::money::Money;

/// Newtype for Booking ID - zero-cost type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookingId(String);

impl BookingId {
    pub fn new(id: String) -> Self {
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BookingId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for BookingId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Deref for BookingId {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Booking lifecycle label
///
/// The analytics engine only reads this; it never moves a booking between states.
/// Labels the API may add later land in `Unknown` and count as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    #[serde(alias = "no_show", alias = "noshow")]
    NoShow,
    #[serde(other)]
    Unknown,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no-show",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Service snapshot embedded in a booking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceRef {
    pub name: String,
    pub category: Option<String>,
    /// List price (the charged amount lives in `Pricing`)
    pub price: Option<f64>,
    /// Duration in minutes
    pub duration: Option<u32>,
}

/// Professional who performs the booking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfessionalRef {
    pub name: String,
}

/// Client who made the booking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientRef {
    pub id: String,
    pub name: String,
}

/// Charged amount for a booking
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Pricing {
    pub total_price: Option<f64>,
    pub currency: Option<String>,
}

/// One booking as returned by the bookings API
///
/// Every field except `id` may be absent in real payloads. Missing timestamps
/// keep a booking out of time-keyed views; a missing price counts as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: BookingId,

    #[serde(alias = "service")]
    pub service_ref: Option<ServiceRef>,

    #[serde(alias = "professional")]
    pub professional_ref: Option<ProfessionalRef>,

    #[serde(alias = "client")]
    pub client_ref: Option<ClientRef>,

    pub start_time: Option<DateTime<Utc>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,

    pub status: BookingStatus,

    pub pricing: Option<Pricing>,
}

impl BookingRecord {
    /// Charged amount; absent or non-finite prices read as zero
    pub fn total_price(&self) -> Money {
        self.pricing
            .as_ref()
            .and_then(|p| p.total_price)
            .map(Money::from_major)
            .unwrap_or_default()
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service_ref
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|n| !n.is_empty())
    }

    pub fn service_category(&self) -> Option<&str> {
        self.service_ref
            .as_ref()
            .and_then(|s| s.category.as_deref())
            .filter(|c| !c.is_empty())
    }

    pub fn professional_name(&self) -> Option<&str> {
        self.professional_ref
            .as_ref()
            .map(|p| p.name.as_str())
            .filter(|n| !n.is_empty())
    }

    pub fn client(&self) -> Option<&ClientRef> {
        self.client_ref.as_ref().filter(|c| !c.id.is_empty())
    }

    pub fn is_completed(&self) -> bool {
        self.status == BookingStatus::Completed
    }
}

/// Client account, used for new-client trends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
}

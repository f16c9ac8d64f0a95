//! bookboard-core - Core library for bookboard
//!
//! Provides booking models, range selection and the analytics engine that
//! powers the reporting pages of a booking dashboard.

pub mod analytics;
pub mod config;
pub mod error;
pub mod models;
pub mod snapshot;

pub use analytics::{BookingReport, RangeToken};
pub use config::AnalyticsConfig;
pub use error::CoreError;
pub use snapshot::BookingSnapshot;

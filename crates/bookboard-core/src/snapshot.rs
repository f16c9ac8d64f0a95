//! Booking snapshot input
//!
//! The dashboard fetches bookings and clients from the REST API and hands the
//! engine an immutable snapshot. This module reads the same payload from a
//! JSON document so reports can run offline.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{CoreError, Result};
use crate::models::{BookingRecord, ClientRecord};

/// Read-only input to a report run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookingSnapshot {
    pub bookings: Vec<BookingRecord>,
    pub clients: Vec<ClientRecord>,
}

impl BookingSnapshot {
    pub fn new(bookings: Vec<BookingRecord>, clients: Vec<ClientRecord>) -> Self {
        Self { bookings, clients }
    }

    /// Load `{"bookings": [...], "clients": [...]}`, or a bare array of bookings
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| CoreError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let snapshot = Self::parse(&content).map_err(|source| CoreError::SnapshotParse {
            path: path.to_path_buf(),
            message: source.to_string(),
            source,
        })?;

        tracing::debug!(
            bookings = snapshot.bookings.len(),
            clients = snapshot.clients.len(),
            "Loaded snapshot from {}",
            path.display()
        );
        Ok(snapshot)
    }

    fn parse(content: &str) -> std::result::Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Payload {
            Snapshot(BookingSnapshot),
            Bookings(Vec<BookingRecord>),
        }

        Ok(match serde_json::from_str::<Payload>(content)? {
            Payload::Snapshot(snapshot) => snapshot,
            Payload::Bookings(bookings) => Self::new(bookings, Vec::new()),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty() && self.clients.is_empty()
    }
}

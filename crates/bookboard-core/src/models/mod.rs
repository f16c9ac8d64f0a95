//! Data models for bookboard

pub mod booking;
pub mod money;

pub use booking::{
    BookingId, BookingRecord, BookingStatus, ClientRecord, ClientRef, Pricing, ProfessionalRef,
    ServiceRef,
};
pub use money::Money;

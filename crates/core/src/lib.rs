pub mod booking;
pub mod config;
pub mod fare;
pub mod ledger;
pub mod reporting;
pub mod service;

// Re-export transit from the transit crate
pub use seatline_transit as transit;

pub mod prelude {
    pub use crate::booking::{BookingEngine, BookingRequest};
    pub use crate::config::{BookingConfig, FareConfig};
    pub use crate::fare::{FareCalculator, PerSegmentFare};
    pub use crate::ledger::{SeatInterval, SeatIntervalLedger};
    pub use crate::reporting::ReportingQueries;
    pub use crate::service::RailwayService;
    pub use seatline_transit::prelude::*;
}

//! # seatline-transit
//!
//! Rail data models for seat booking over partial journeys.
//!
//! ## Features
//!
//! - **Typed stations**: exact-match station codes, never substring search
//! - **Route index**: station → position lookups built once per route
//! - **Pluggable storage**: the booking core only sees the store traits
//! - **In-memory store**: a thread-safe implementation of every store trait
//!
//! ## Example
//!
//! ```
//! use seatline_transit::prelude::*;
//! use chrono::NaiveTime;
//!
//! let route = Route::new(["A", "B", "C", "D"].map(Station::new)).unwrap();
//! let departure = NaiveTime::from_hms_opt(8, 30, 0).unwrap();
//!
//! let store = InMemoryStore::new();
//! let train = store.save_train(NewTrain::new(route, departure, 2).unwrap()).unwrap();
//!
//! // Resolve a journey from B to D
//! let journey = train.route.journey(&Station::new("B"), &Station::new("D")).unwrap();
//! assert_eq!((journey.boarding, journey.alighting), (1, 3));
//! assert!(!train.route.contains(&Station::new("AB")));
//! ```

pub mod identifiers;
pub mod models;
pub mod provider;

// Re-exports for convenience
pub mod prelude {
    pub use crate::identifiers::*;
    pub use crate::models::{entities::*, route::*, schedule::*, traits::*, types::*};
    pub use crate::provider::memory::InMemoryStore;
}

pub use prelude::*;

//! Rail data models, types, and store traits.

pub mod entities;
pub mod route;
pub mod schedule;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use entities::{NewPassenger, NewTicket, NewTrain, Passenger, Ticket, Train};
pub use route::{Journey, Route};
pub use schedule::{parse_time_of_day, TimeWindow};
pub use traits::{PassengerStore, TicketStore, TrainStore};
pub use types::{Age, Fare, Result, SeatCount, StationViolation, TransitError};

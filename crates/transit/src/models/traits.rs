//! Store traits the booking core depends on.
//!
//! The booking core only ever sees `get`, `save` and the listing queries
//! below, whatever the backing storage is.

use std::sync::Arc;

use crate::identifiers::*;
use crate::models::entities::*;
use crate::models::types::*;

// ============================================================================
// Store Traits
// ============================================================================

/// Registry of trains
pub trait TrainStore: Send + Sync {
    /// `TrainNotFound` if the id is unknown
    fn get_train(&self, id: TrainId) -> Result<Arc<Train>>;

    /// Persist a new train and assign its id
    fn save_train(&self, train: NewTrain) -> Result<Arc<Train>>;

    /// All trains in registry order (ascending id)
    fn all_trains(&self) -> Result<Vec<Arc<Train>>>;
}

/// Registry of passengers
pub trait PassengerStore: Send + Sync {
    /// `PassengerNotFound` if the id is unknown
    fn get_passenger(&self, id: PassengerId) -> Result<Passenger>;

    fn save_passenger(&self, passenger: NewPassenger) -> Result<Passenger>;
}

/// Durable storage of reservations
pub trait TicketStore: Send + Sync {
    /// `TicketNotFound` if the id is unknown
    fn get_ticket(&self, id: TicketId) -> Result<Arc<Ticket>>;

    /// Persist a ticket and append it to its booking person's ticket list.
    ///
    /// Both writes land together or not at all. Fails with `TrainNotFound` or
    /// `PassengerNotFound` for dangling references, `StorageFailure` otherwise.
    fn save_ticket(&self, ticket: NewTicket) -> Result<Arc<Ticket>>;

    /// Every ticket booked on a train, oldest first
    fn tickets_for_train(&self, train_id: TrainId) -> Result<Vec<Arc<Ticket>>>;
}

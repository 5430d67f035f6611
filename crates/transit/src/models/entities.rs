//! Trains, tickets and passengers as the stores hand them out.
//!
//! The `New*` types are what callers give to a store; the store assigns the id
//! and returns the persisted entity.

use std::sync::Arc;

use chrono::NaiveTime;

use crate::identifiers::*;
use crate::models::route::{Journey, Route};
use crate::models::types::*;

// ============================================================================
// Train
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Train {
    pub id: TrainId,
    pub route: Route,
    pub departure: NaiveTime,
    pub capacity: SeatCount,
}

#[derive(Clone, Debug)]
pub struct NewTrain {
    pub route: Route,
    pub departure: NaiveTime,
    pub capacity: SeatCount,
}

impl NewTrain {
    pub fn new(route: Route, departure: NaiveTime, capacity: SeatCount) -> Result<Self> {
        if capacity == 0 {
            return Err(TransitError::InvalidData(
                "a train needs at least one seat".into(),
            ));
        }
        Ok(Self {
            route,
            departure,
            capacity,
        })
    }

    pub fn with_id(self, id: TrainId) -> Train {
        Train {
            id,
            route: self.route,
            departure: self.departure,
            capacity: self.capacity,
        }
    }
}

// ============================================================================
// Ticket
// ============================================================================

/// A reservation of one seat per traveler over a journey. Never mutated.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Ticket {
    pub id: TicketId,
    pub train_id: TrainId,
    pub from: Station,
    pub to: Station,
    pub journey: Journey,
    pub fare: Fare,
    pub booked_by: PassengerId,
    pub travelers: Vec<PassengerId>,
}

impl Ticket {
    /// Seats held on every segment of the journey
    pub fn seats(&self) -> SeatCount {
        self.travelers.len() as SeatCount
    }
}

#[derive(Clone, Debug)]
pub struct NewTicket {
    pub train_id: TrainId,
    pub from: Station,
    pub to: Station,
    pub journey: Journey,
    pub fare: Fare,
    pub booked_by: PassengerId,
    pub travelers: Vec<PassengerId>,
}

impl NewTicket {
    pub fn with_id(self, id: TicketId) -> Ticket {
        Ticket {
            id,
            train_id: self.train_id,
            from: self.from,
            to: self.to,
            journey: self.journey,
            fare: self.fare,
            booked_by: self.booked_by,
            travelers: self.travelers,
        }
    }
}

// ============================================================================
// Passenger
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Passenger {
    pub id: PassengerId,
    pub name: Arc<str>,
    pub age: Age,
    /// Tickets this passenger booked, for themselves or others, oldest first.
    /// Lookup only; tickets belong to their train.
    pub booked_tickets: Vec<TicketId>,
}

#[derive(Clone, Debug)]
pub struct NewPassenger {
    pub name: Arc<str>,
    pub age: Age,
}

impl NewPassenger {
    pub fn new(name: impl Into<Arc<str>>, age: Age) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }

    pub fn with_id(self, id: PassengerId) -> Passenger {
        Passenger {
            id,
            name: self.name,
            age: self.age,
            booked_tickets: Vec::new(),
        }
    }
}

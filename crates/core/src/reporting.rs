//! Read-only views over trains, tickets and passengers.
//!
//! Each query reads straight from the stores. A query sees the tickets as of
//! the moment it asked the store; it never blocks or is blocked by bookings.

use std::sync::Arc;

use itertools::Itertools;
use seatline_transit::{
    Age, PassengerId, PassengerStore, Result, Station, StationViolation, Ticket, TicketStore,
    TimeWindow, TrainId, TrainStore, TransitError,
};
use tracing::debug;

pub struct ReportingQueries {
    trains: Arc<dyn TrainStore>,
    passengers: Arc<dyn PassengerStore>,
    tickets: Arc<dyn TicketStore>,
}

impl ReportingQueries {
    pub fn new(
        trains: Arc<dyn TrainStore>,
        passengers: Arc<dyn PassengerStore>,
        tickets: Arc<dyn TicketStore>,
    ) -> Self {
        Self {
            trains,
            passengers,
            tickets,
        }
    }

    /// Number of people boarding `train_id` at `station`: every traveler of
    /// every ticket that starts there
    pub fn boarding_count(&self, train_id: TrainId, station: &Station) -> Result<usize> {
        let train = self.trains.get_train(train_id)?;
        if !train.route.contains(station) {
            return Err(TransitError::InvalidStation(StationViolation::NotServed(
                station.clone(),
            )));
        }

        let count: usize = self
            .tickets
            .tickets_for_train(train_id)?
            .iter()
            .filter(|t| &t.from == station)
            .map(|t| t.seats() as usize)
            .sum();
        Ok(count)
    }

    /// Age of the oldest traveler on any ticket of the train; 0 when nobody
    /// is aboard. Travelers the passenger store cannot resolve are skipped.
    pub fn oldest_traveler(&self, train_id: TrainId) -> Result<Age> {
        self.trains.get_train(train_id)?;

        let tickets = self.tickets.tickets_for_train(train_id)?;
        let mut oldest: Age = 0;
        for id in tickets.iter().flat_map(|t| t.travelers.iter().copied()).unique() {
            match self.passengers.get_passenger(id) {
                Ok(passenger) => oldest = oldest.max(passenger.age),
                Err(e) if e.is_not_found() => {
                    debug!(passenger = %id, train = %train_id, "traveler not resolvable");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(oldest)
    }

    /// Trains stopping at `station` whose departure lies in `window`, in the
    /// store's registry order
    pub fn trains_serving(&self, station: &Station, window: TimeWindow) -> Result<Vec<TrainId>> {
        if window.is_empty() {
            return Ok(Vec::new());
        }

        Ok(self
            .trains
            .all_trains()?
            .iter()
            .filter(|t| t.route.contains(station) && window.contains(t.departure))
            .map(|t| t.id)
            .collect())
    }

    /// Tickets a passenger booked, for themselves or others, oldest first
    pub fn bookings_by(&self, passenger_id: PassengerId) -> Result<Vec<Arc<Ticket>>> {
        self.passengers
            .get_passenger(passenger_id)?
            .booked_tickets
            .iter()
            .map(|id| self.tickets.get_ticket(*id))
            .collect()
    }
}

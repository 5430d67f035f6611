use std::sync::Arc;

use anyhow::{Context, Result};
use seatline_core::prelude::*;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::scenario::{Operation, Scenario};

pub struct Replay {
    store: Arc<InMemoryStore>,
    service: RailwayService,
}

impl Replay {
    /// Build the service and register the scenario's passengers and trains
    pub fn new(scenario: &Scenario) -> Result<Self> {
        let store = Arc::new(InMemoryStore::new());
        let service = RailwayService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(PerSegmentFare::from(scenario.config.fare)),
        );

        for passenger in &scenario.passengers {
            let id = service.add_passenger(passenger.name.as_str(), passenger.age)?;
            debug!(passenger = %id, name = %passenger.name, "passenger registered");
        }

        for (i, train) in scenario.trains.iter().enumerate() {
            let departure = parse_time_of_day(&train.departure)
                .with_context(|| format!("Train #{} has a bad departure", i + 1))?;
            service
                .add_train(train.route.iter().cloned(), departure, train.capacity)
                .with_context(|| format!("Failed to add train #{}", i + 1))?;
        }

        info!(
            passengers = scenario.passengers.len(),
            trains = scenario.trains.len(),
            "scenario loaded"
        );
        Ok(Self { store, service })
    }

    /// Run one operation. Booking failures are results, not errors: they come
    /// back as `Err` for the caller to report.
    pub fn run(&self, operation: &Operation) -> seatline_transit::Result<Value> {
        let service = &self.service;
        match operation {
            Operation::Book {
                train,
                from,
                to,
                booked_by,
                travelers,
            } => {
                let request = BookingRequest::new(*train, from.clone(), to.clone(), *booked_by)
                    .with_travelers(travelers.iter().copied());
                let ticket = service.engine().book(&request)?;
                Ok(json!({ "ticket": ticket.id, "fare": ticket.fare, "seats": ticket.seats() }))
            }
            Operation::AvailableSeats { train, from, to } => {
                let seats = service.available_seats(*train, from.clone(), to.clone())?;
                Ok(json!({ "seats": seats }))
            }
            Operation::BoardingCount { train, station } => {
                let count = service.boarding_count(*train, station.clone())?;
                Ok(json!({ "count": count }))
            }
            Operation::OldestTraveler { train } => {
                let age = service.oldest_traveler(*train)?;
                Ok(json!({ "age": age }))
            }
            Operation::TrainsServing { station, start, end } => {
                let trains =
                    service.trains_serving(station.clone(), parse_time_of_day(start)?, parse_time_of_day(end)?)?;
                Ok(json!({ "trains": trains }))
            }
            Operation::BookingsBy { passenger } => {
                let tickets = service.bookings_by(*passenger)?;
                let ids: Vec<TicketId> = tickets.iter().map(|t| t.id).collect();
                Ok(json!({ "tickets": ids }))
            }
        }
    }

    /// Every train with its tickets and per-segment load
    pub fn dump(&self) -> Result<Value> {
        let mut trains = Vec::new();
        for train in self.store.all_trains()? {
            let tickets = self.store.tickets_for_train(train.id)?;
            let ledger = self.service.engine().ledger_snapshot(train.id)?;
            trains.push(json!({
                "train": train,
                "segmentLoad": ledger.segment_load(),
                "tickets": tickets,
            }));
        }
        Ok(json!({ "trains": trains }))
    }
}

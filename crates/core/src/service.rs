//! The railway booking service: one handle over the stores, the booking
//! engine and the reporting queries.
//!
//! ```
//! use seatline_core::prelude::*;
//! use chrono::NaiveTime;
//!
//! let service = RailwayService::in_memory(&BookingConfig::default());
//! let departure = NaiveTime::from_hms_opt(7, 15, 0).unwrap();
//! let train = service.add_train(["A", "B", "C"], departure, 1).unwrap();
//! let alice = service.add_passenger("Alice", 34).unwrap();
//!
//! service.book_ticket(&BookingRequest::new(train, "A", "B", alice)).unwrap();
//! assert_eq!(service.available_seats(train, "A", "C").unwrap(), 0);
//! assert_eq!(service.available_seats(train, "B", "C").unwrap(), 1);
//! ```

use std::sync::Arc;

use chrono::NaiveTime;
use seatline_transit::{
    Age, InMemoryStore, NewPassenger, NewTrain, PassengerId, PassengerStore, Result, Route,
    SeatCount, Station, Ticket, TicketId, TicketStore, TimeWindow, TrainId, TrainStore,
};
use tracing::info;

use crate::booking::{BookingEngine, BookingRequest};
use crate::config::BookingConfig;
use crate::fare::{FareCalculator, PerSegmentFare};
use crate::reporting::ReportingQueries;

pub struct RailwayService {
    trains: Arc<dyn TrainStore>,
    passengers: Arc<dyn PassengerStore>,
    engine: BookingEngine,
    reports: ReportingQueries,
}

impl RailwayService {
    pub fn new(
        trains: Arc<dyn TrainStore>,
        passengers: Arc<dyn PassengerStore>,
        tickets: Arc<dyn TicketStore>,
        fares: Arc<dyn FareCalculator>,
    ) -> Self {
        Self {
            engine: BookingEngine::new(trains.clone(), passengers.clone(), tickets.clone(), fares),
            reports: ReportingQueries::new(trains.clone(), passengers.clone(), tickets),
            trains,
            passengers,
        }
    }

    /// Service backed by a fresh [`InMemoryStore`]
    pub fn in_memory(config: &BookingConfig) -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self::new(
            store.clone(),
            store.clone(),
            store,
            Arc::new(PerSegmentFare::from(config.fare)),
        )
    }

    pub fn add_train<S>(
        &self,
        stations: impl IntoIterator<Item = S>,
        departure: NaiveTime,
        capacity: SeatCount,
    ) -> Result<TrainId>
    where
        S: Into<Station>,
    {
        let route = Route::new(stations.into_iter().map(Into::into))?;
        let train = self.trains.save_train(NewTrain::new(route, departure, capacity)?)?;
        info!(
            train = %train.id,
            stops = train.route.len(),
            capacity,
            %departure,
            "train added"
        );
        Ok(train.id)
    }

    pub fn add_passenger(&self, name: impl Into<Arc<str>>, age: Age) -> Result<PassengerId> {
        Ok(self.passengers.save_passenger(NewPassenger::new(name, age))?.id)
    }

    pub fn book_ticket(&self, request: &BookingRequest) -> Result<TicketId> {
        Ok(self.engine.book(request)?.id)
    }

    pub fn available_seats(
        &self,
        train_id: TrainId,
        from: impl Into<Station>,
        to: impl Into<Station>,
    ) -> Result<SeatCount> {
        self.engine
            .available_seats(train_id, &from.into(), &to.into())
    }

    pub fn boarding_count(&self, train_id: TrainId, station: impl Into<Station>) -> Result<usize> {
        self.reports.boarding_count(train_id, &station.into())
    }

    pub fn oldest_traveler(&self, train_id: TrainId) -> Result<Age> {
        self.reports.oldest_traveler(train_id)
    }

    /// Trains stopping at `station` that depart within `[start, end]`
    pub fn trains_serving(
        &self,
        station: impl Into<Station>,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Vec<TrainId>> {
        self.reports
            .trains_serving(&station.into(), TimeWindow::new(start, end))
    }

    pub fn bookings_by(&self, passenger_id: PassengerId) -> Result<Vec<Arc<Ticket>>> {
        self.reports.bookings_by(passenger_id)
    }

    pub fn engine(&self) -> &BookingEngine {
        &self.engine
    }

    pub fn reports(&self) -> &ReportingQueries {
        &self.reports
    }
}

//! Booking engine: validates a request, checks capacity, prices and persists
//! the ticket.
//!
//! **Concurrency**: every train has its own ledger behind its own mutex. A
//! booking holds that mutex from the capacity check until the ticket is
//! persisted and committed to the ledger, so two bookings on the same train
//! can never both pass the check against the same free seat. Bookings on
//! different trains never contend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use itertools::Itertools;
use seatline_transit::{
    NewTicket, PassengerId, PassengerStore, Result, SeatCount, Station, Ticket, TicketStore, Train,
    TrainId, TrainStore, TransitError,
};
use tracing::{debug, info, warn};

use crate::fare::FareCalculator;
use crate::ledger::{SeatInterval, SeatIntervalLedger, capacity_exceeded};

// ============================================================================
// Requests
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BookingRequest {
    pub train_id: TrainId,
    pub from: Station,
    pub to: Station,
    pub booking_person: PassengerId,
    /// Who travels on the ticket. Empty means the booking person alone.
    pub travelers: Vec<PassengerId>,
}

impl BookingRequest {
    pub fn new(
        train_id: TrainId,
        from: impl Into<Station>,
        to: impl Into<Station>,
        booking_person: PassengerId,
    ) -> Self {
        Self {
            train_id,
            from: from.into(),
            to: to.into(),
            booking_person,
            travelers: Vec::new(),
        }
    }

    pub fn with_travelers(mut self, travelers: impl IntoIterator<Item = PassengerId>) -> Self {
        self.travelers = travelers.into_iter().collect();
        self
    }

    fn travelers(&self) -> Vec<PassengerId> {
        if self.travelers.is_empty() {
            vec![self.booking_person]
        } else {
            self.travelers.clone()
        }
    }
}

// ============================================================================
// Engine
// ============================================================================

struct TrainLedger {
    train: Arc<Train>,
    seats: SeatIntervalLedger,
}

type SharedLedger = Arc<Mutex<TrainLedger>>;

/// Books tickets against the injected stores.
///
/// The engine must be the only writer of tickets for the trains it serves;
/// each train's ledger is loaded from the ticket store once and kept current
/// from then on.
pub struct BookingEngine {
    trains: Arc<dyn TrainStore>,
    passengers: Arc<dyn PassengerStore>,
    tickets: Arc<dyn TicketStore>,
    fares: Arc<dyn FareCalculator>,
    ledgers: RwLock<HashMap<TrainId, SharedLedger>>,
}

impl BookingEngine {
    pub fn new(
        trains: Arc<dyn TrainStore>,
        passengers: Arc<dyn PassengerStore>,
        tickets: Arc<dyn TicketStore>,
        fares: Arc<dyn FareCalculator>,
    ) -> Self {
        Self {
            trains,
            passengers,
            tickets,
            fares,
            ledgers: RwLock::new(HashMap::new()),
        }
    }

    /// Book a ticket. Nothing is written unless every check passes.
    ///
    /// # Errors
    ///
    /// - `TrainNotFound` / `PassengerNotFound` for unknown ids
    /// - `InvalidStation` if a station is off the route or the journey is not
    ///   strictly forward
    /// - `InvalidData` if a traveler is listed twice
    /// - `CapacityExceeded` if any segment of the journey is full
    /// - `StorageFailure` if the ticket store fails to persist
    pub fn book(&self, request: &BookingRequest) -> Result<Arc<Ticket>> {
        let shared = self.ledger_for(request.train_id)?;
        let mut ledger = lock(&shared);
        let train = ledger.train.clone();

        let journey = train.route.journey(&request.from, &request.to)?;
        let interval = SeatInterval::from(journey);

        let travelers = request.travelers();
        if travelers.iter().unique().count() != travelers.len() {
            return Err(TransitError::InvalidData(
                "a traveler is listed more than once".into(),
            ));
        }
        self.passengers.get_passenger(request.booking_person)?;
        for traveler in &travelers {
            self.passengers.get_passenger(*traveler)?;
        }
        let seats = travelers.len() as SeatCount;

        if !ledger.seats.can_book(interval, seats) {
            warn!(
                train = %train.id,
                from = %request.from,
                to = %request.to,
                seats,
                "booking rejected, segment full"
            );
            return Err(capacity_exceeded(&train, interval));
        }

        let fare = self
            .fares
            .fare(&train.route, journey, train.capacity)
            .saturating_mul(seats as u64);

        let ticket = self.tickets.save_ticket(NewTicket {
            train_id: train.id,
            from: request.from.clone(),
            to: request.to.clone(),
            journey,
            fare,
            booked_by: request.booking_person,
            travelers,
        })?;
        ledger.seats.commit(ticket.id, interval, seats, &train)?;

        info!(
            ticket = %ticket.id,
            train = %train.id,
            from = %ticket.from,
            to = %ticket.to,
            seats,
            fare,
            "ticket booked"
        );
        Ok(ticket)
    }

    /// Seats left between two stations, see [`SeatIntervalLedger::available_seats`].
    ///
    /// Read under the train's lock, so never stale with respect to bookings.
    pub fn available_seats(&self, train_id: TrainId, from: &Station, to: &Station) -> Result<SeatCount> {
        let shared = self.ledger_for(train_id)?;
        let ledger = lock(&shared);
        let journey = ledger.train.route.journey(from, to)?;
        let seats = ledger.seats.available_seats(journey.into());
        debug!(train = %train_id, %from, %to, seats, "availability queried");
        Ok(seats)
    }

    /// Copy of a train's ledger as of now
    pub fn ledger_snapshot(&self, train_id: TrainId) -> Result<SeatIntervalLedger> {
        let shared = self.ledger_for(train_id)?;
        let ledger = lock(&shared);
        Ok(ledger.seats.clone())
    }

    fn ledger_for(&self, train_id: TrainId) -> Result<SharedLedger> {
        if let Some(existing) = self
            .ledgers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&train_id)
        {
            return Ok(existing.clone());
        }

        // Load outside the map lock; if another thread wins the race its
        // ledger is kept and ours is dropped.
        let train = self.trains.get_train(train_id)?;
        let tickets = self.tickets.tickets_for_train(train_id)?;
        let seats = SeatIntervalLedger::from_tickets(&train, tickets.iter().map(Arc::as_ref))?;
        debug!(train = %train_id, tickets = tickets.len(), "ledger loaded");

        let mut ledgers = self.ledgers.write().unwrap_or_else(PoisonError::into_inner);
        Ok(ledgers
            .entry(train_id)
            .or_insert_with(|| Arc::new(Mutex::new(TrainLedger { train, seats })))
            .clone())
    }
}

// The ledger is only mutated after every fallible step, so a panic while it
// is held cannot leave it half-written.
fn lock(ledger: &Mutex<TrainLedger>) -> MutexGuard<'_, TrainLedger> {
    ledger.lock().unwrap_or_else(PoisonError::into_inner)
}

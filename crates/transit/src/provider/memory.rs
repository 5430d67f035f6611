//! In-memory store backing all three store traits.
//!
//! Every trait call takes the store lock once, so each call observes and
//! produces a consistent state. Ids are handed out from 1 upwards per entity
//! kind.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::identifiers::*;
use crate::models::{entities::*, traits::*, types::*};

#[derive(Default)]
struct Tables {
    // BTreeMap keeps registry iteration in id order
    trains: BTreeMap<TrainId, Arc<Train>>,
    passengers: HashMap<PassengerId, Passenger>,
    tickets: HashMap<TicketId, Arc<Ticket>>,
    tickets_by_train: HashMap<TrainId, Vec<TicketId>>,

    last_train: Option<TrainId>,
    last_passenger: Option<PassengerId>,
    last_ticket: Option<TicketId>,
}

impl Tables {
    fn next_train_id(&mut self) -> TrainId {
        let id = self.last_train.map_or(TrainId::new(1), TrainId::next);
        self.last_train = Some(id);
        id
    }

    fn next_passenger_id(&mut self) -> PassengerId {
        let id = self
            .last_passenger
            .map_or(PassengerId::new(1), PassengerId::next);
        self.last_passenger = Some(id);
        id
    }

    fn next_ticket_id(&mut self) -> TicketId {
        let id = self.last_ticket.map_or(TicketId::new(1), TicketId::next);
        self.last_ticket = Some(id);
        id
    }
}

// ============================================================================
// In-Memory Store
// ============================================================================

/// Thread-safe in-memory registry of trains, passengers and tickets
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| TransitError::StorageFailure("store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| TransitError::StorageFailure("store lock poisoned".into()))
    }
}

impl TrainStore for InMemoryStore {
    fn get_train(&self, id: TrainId) -> Result<Arc<Train>> {
        self.read()?
            .trains
            .get(&id)
            .cloned()
            .ok_or(TransitError::TrainNotFound(id))
    }

    fn save_train(&self, train: NewTrain) -> Result<Arc<Train>> {
        let mut tables = self.write()?;
        let id = tables.next_train_id();
        let train = Arc::new(train.with_id(id));
        tables.trains.insert(id, train.clone());
        Ok(train)
    }

    fn all_trains(&self) -> Result<Vec<Arc<Train>>> {
        Ok(self.read()?.trains.values().cloned().collect())
    }
}

impl PassengerStore for InMemoryStore {
    fn get_passenger(&self, id: PassengerId) -> Result<Passenger> {
        self.read()?
            .passengers
            .get(&id)
            .cloned()
            .ok_or(TransitError::PassengerNotFound(id))
    }

    fn save_passenger(&self, passenger: NewPassenger) -> Result<Passenger> {
        let mut tables = self.write()?;
        let id = tables.next_passenger_id();
        let passenger = passenger.with_id(id);
        tables.passengers.insert(id, passenger.clone());
        Ok(passenger)
    }
}

impl TicketStore for InMemoryStore {
    fn get_ticket(&self, id: TicketId) -> Result<Arc<Ticket>> {
        self.read()?
            .tickets
            .get(&id)
            .cloned()
            .ok_or(TransitError::TicketNotFound(id))
    }

    fn save_ticket(&self, ticket: NewTicket) -> Result<Arc<Ticket>> {
        let mut tables = self.write()?;

        // Validate every reference before touching any table
        if !tables.trains.contains_key(&ticket.train_id) {
            return Err(TransitError::TrainNotFound(ticket.train_id));
        }
        if !tables.passengers.contains_key(&ticket.booked_by) {
            return Err(TransitError::PassengerNotFound(ticket.booked_by));
        }
        if let Some(missing) = ticket
            .travelers
            .iter()
            .find(|id| !tables.passengers.contains_key(*id))
        {
            return Err(TransitError::PassengerNotFound(*missing));
        }

        let id = tables.next_ticket_id();
        let ticket = Arc::new(ticket.with_id(id));

        tables.tickets.insert(id, ticket.clone());
        tables
            .tickets_by_train
            .entry(ticket.train_id)
            .or_default()
            .push(id);
        if let Some(booker) = tables.passengers.get_mut(&ticket.booked_by) {
            booker.booked_tickets.push(id);
        }

        Ok(ticket)
    }

    fn tickets_for_train(&self, train_id: TrainId) -> Result<Vec<Arc<Ticket>>> {
        let tables = self.read()?;
        if !tables.trains.contains_key(&train_id) {
            return Err(TransitError::TrainNotFound(train_id));
        }

        Ok(tables
            .tickets_by_train
            .get(&train_id)
            .into_iter()
            .flatten()
            .filter_map(|id| tables.tickets.get(id).cloned())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::route::{Journey, Route};
    use chrono::NaiveTime;

    fn sample_train() -> NewTrain {
        let route = Route::new(["A", "B", "C"].map(Station::new)).unwrap();
        NewTrain::new(route, NaiveTime::from_hms_opt(9, 0, 0).unwrap(), 2).unwrap()
    }

    fn sample_ticket(train_id: TrainId, booked_by: PassengerId) -> NewTicket {
        NewTicket {
            train_id,
            from: Station::new("A"),
            to: Station::new("B"),
            journey: Journey {
                boarding: 0,
                alighting: 1,
            },
            fare: 300,
            booked_by,
            travelers: vec![booked_by],
        }
    }

    #[test]
    fn test_empty_store() {
        let store = InMemoryStore::new();
        assert_eq!(store.all_trains().unwrap().len(), 0);
        assert!(matches!(
            store.get_train(TrainId::new(1)),
            Err(TransitError::TrainNotFound(_))
        ));
        assert!(store.get_passenger(PassengerId::new(1)).is_err());
        assert!(store.get_ticket(TicketId::new(1)).is_err());
    }

    #[test]
    fn test_ids_increase_in_creation_order() {
        let store = InMemoryStore::new();
        let first = store.save_train(sample_train()).unwrap();
        let second = store.save_train(sample_train()).unwrap();

        assert_eq!(first.id, TrainId::new(1));
        assert_eq!(second.id, TrainId::new(2));

        let ids: Vec<_> = store.all_trains().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![TrainId::new(1), TrainId::new(2)]);
    }

    #[test]
    fn test_save_ticket_links_booker_and_train() {
        let store = InMemoryStore::new();
        let train = store.save_train(sample_train()).unwrap();
        let asha = store.save_passenger(NewPassenger::new("Asha", 34)).unwrap();

        let ticket = store.save_ticket(sample_ticket(train.id, asha.id)).unwrap();

        assert_eq!(ticket.id, TicketId::new(1));
        assert_eq!(store.get_ticket(ticket.id).unwrap(), ticket);
        assert_eq!(
            store.get_passenger(asha.id).unwrap().booked_tickets,
            vec![ticket.id]
        );
        assert_eq!(store.tickets_for_train(train.id).unwrap(), vec![ticket]);
    }

    #[test]
    fn test_save_ticket_rejects_dangling_references() {
        let store = InMemoryStore::new();
        let train = store.save_train(sample_train()).unwrap();
        let asha = store.save_passenger(NewPassenger::new("Asha", 34)).unwrap();

        assert!(matches!(
            store.save_ticket(sample_ticket(TrainId::new(99), asha.id)),
            Err(TransitError::TrainNotFound(_))
        ));

        let mut with_ghost = sample_ticket(train.id, asha.id);
        with_ghost.travelers.push(PassengerId::new(42));
        assert!(matches!(
            store.save_ticket(with_ghost),
            Err(TransitError::PassengerNotFound(id)) if id == PassengerId::new(42)
        ));

        // Nothing was written
        assert!(store.tickets_for_train(train.id).unwrap().is_empty());
        assert!(store.get_passenger(asha.id).unwrap().booked_tickets.is_empty());
    }

    #[test]
    fn test_tickets_for_unknown_train() {
        let store = InMemoryStore::new();
        assert!(matches!(
            store.tickets_for_train(TrainId::new(5)),
            Err(TransitError::TrainNotFound(_))
        ));
    }
}

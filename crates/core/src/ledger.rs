//! Seat-interval accounting for one train.
//!
//! Reservations are half-open intervals `[boarding, alighting)` over stop
//! positions. Unit segment `s` is the stretch between stop `s` and stop
//! `s + 1`, so a reservation covers segments `boarding..alighting`. Seat
//! occupancy is per segment: two tickets only compete for a seat where they
//! share at least one segment.

use std::ops::Range;

use seatline_transit::{Journey, SeatCount, Station, Ticket, TicketId, Train, TransitError};

// ============================================================================
// Intervals
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SeatInterval {
    boarding: usize,
    alighting: usize,
}

impl SeatInterval {
    /// `None` unless `boarding < alighting`
    pub fn new(boarding: usize, alighting: usize) -> Option<Self> {
        (boarding < alighting).then_some(Self {
            boarding,
            alighting,
        })
    }

    pub fn boarding(&self) -> usize {
        self.boarding
    }

    pub fn alighting(&self) -> usize {
        self.alighting
    }

    /// Share at least one segment. Touching endpoints do not overlap.
    pub fn overlaps(&self, other: &SeatInterval) -> bool {
        self.boarding < other.alighting && other.boarding < self.alighting
    }

    pub fn segments(&self) -> Range<usize> {
        self.boarding..self.alighting
    }
}

impl From<Journey> for SeatInterval {
    fn from(journey: Journey) -> Self {
        Self {
            boarding: journey.boarding,
            alighting: journey.alighting,
        }
    }
}

/// A committed reservation as the ledger sees it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Occupant {
    pub ticket: TicketId,
    pub interval: SeatInterval,
    pub seats: SeatCount,
}

// ============================================================================
// Queries over a plain reservation list
// ============================================================================

/// `capacity` minus the seats held by every reservation overlapping `query`.
///
/// Never negative: disjoint reservations inside a long query can jointly
/// exceed the capacity.
pub fn available_seats(capacity: SeatCount, existing: &[Occupant], query: SeatInterval) -> SeatCount {
    let overlapping: SeatCount = existing
        .iter()
        .filter(|o| o.interval.overlaps(&query))
        .map(|o| o.seats)
        .sum();
    capacity.saturating_sub(overlapping)
}

/// True iff `seats` more seats fit on every segment of `interval`
pub fn can_book(
    capacity: SeatCount,
    existing: &[Occupant],
    interval: SeatInterval,
    seats: SeatCount,
) -> bool {
    interval.segments().all(|segment| {
        let unit = SeatInterval {
            boarding: segment,
            alighting: segment + 1,
        };
        available_seats(capacity, existing, unit) >= seats
    })
}

// ============================================================================
// Ledger
// ============================================================================

/// Per-train reservation ledger with an incrementally maintained load per
/// segment, so capacity checks cost one pass over the requested segments.
#[derive(Clone, Debug)]
pub struct SeatIntervalLedger {
    capacity: SeatCount,
    occupants: Vec<Occupant>,
    // seats held on each unit segment, len = stops - 1
    segment_load: Vec<SeatCount>,
}

impl SeatIntervalLedger {
    pub fn new(capacity: SeatCount, segment_count: usize) -> Self {
        Self {
            capacity,
            occupants: Vec::new(),
            segment_load: vec![0; segment_count],
        }
    }

    /// Rebuild the ledger of `train` from its persisted tickets
    pub fn from_tickets<'a>(
        train: &Train,
        tickets: impl IntoIterator<Item = &'a Ticket>,
    ) -> Result<Self, TransitError> {
        let mut ledger = Self::new(train.capacity, train.route.segment_count());
        for ticket in tickets {
            let interval = SeatInterval::new(ticket.journey.boarding, ticket.journey.alighting)
                .filter(|i| i.alighting <= ledger.segment_load.len())
                .ok_or_else(|| {
                    TransitError::InvalidData(format!(
                        "ticket {} lies outside the route of train {}",
                        ticket.id, train.id
                    ))
                })?;
            // persisted tickets are taken as they are, even past capacity
            ledger.push(ticket.id, interval, ticket.seats());
        }
        Ok(ledger)
    }

    pub fn capacity(&self) -> SeatCount {
        self.capacity
    }

    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    pub fn segment_load(&self) -> &[SeatCount] {
        &self.segment_load
    }

    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    fn fits(&self, interval: SeatInterval) -> bool {
        interval.alighting <= self.segment_load.len()
    }

    /// See [`available_seats`]
    pub fn available_seats(&self, query: SeatInterval) -> SeatCount {
        available_seats(self.capacity, &self.occupants, query)
    }

    /// Free seats on the fullest segment of `query`: the most seats a single
    /// new booking over `query` could still take.
    pub fn tightest_free_seats(&self, query: SeatInterval) -> SeatCount {
        if !self.fits(query) {
            return 0;
        }
        self.segment_load[query.segments()]
            .iter()
            .map(|load| self.capacity.saturating_sub(*load))
            .min()
            .unwrap_or(0)
    }

    /// See [`can_book`]; answered from the segment loads.
    pub fn can_book(&self, interval: SeatInterval, seats: SeatCount) -> bool {
        self.fits(interval)
            && self.segment_load[interval.segments()]
                .iter()
                .all(|load| load.saturating_add(seats) <= self.capacity)
    }

    /// Record an accepted reservation. Refuses rather than overbook.
    pub fn commit(
        &mut self,
        ticket: TicketId,
        interval: SeatInterval,
        seats: SeatCount,
        train: &Train,
    ) -> Result<(), TransitError> {
        if !self.can_book(interval, seats) {
            return Err(capacity_exceeded(train, interval));
        }
        self.push(ticket, interval, seats);
        Ok(())
    }

    fn push(&mut self, ticket: TicketId, interval: SeatInterval, seats: SeatCount) {
        for load in &mut self.segment_load[interval.segments()] {
            *load = load.saturating_add(seats);
        }
        self.occupants.push(Occupant {
            ticket,
            interval,
            seats,
        });
    }
}

pub(crate) fn capacity_exceeded(train: &Train, interval: SeatInterval) -> TransitError {
    let station = |idx: usize| {
        train
            .route
            .station_at(idx)
            .cloned()
            .unwrap_or_else(|| Station::new(format!("#{idx}")))
    };
    TransitError::CapacityExceeded {
        train: train.id,
        from: station(interval.boarding),
        to: station(interval.alighting),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use seatline_transit::PassengerId;

    fn iv(b: usize, a: usize) -> SeatInterval {
        SeatInterval::new(b, a).unwrap()
    }

    fn occupant(ticket: u32, b: usize, a: usize) -> Occupant {
        Occupant {
            ticket: TicketId::new(ticket),
            interval: iv(b, a),
            seats: 1,
        }
    }

    #[test]
    fn test_interval_requires_forward_span() {
        assert!(SeatInterval::new(2, 2).is_none());
        assert!(SeatInterval::new(3, 1).is_none());
        assert_eq!(iv(1, 3).segments(), 1..3);
    }

    #[test]
    fn test_overlap_rules() {
        // partial overlap
        assert!(iv(0, 2).overlaps(&iv(1, 3)));
        assert!(iv(1, 3).overlaps(&iv(0, 2)));
        // identical
        assert!(iv(1, 2).overlaps(&iv(1, 2)));
        // containment
        assert!(iv(0, 3).overlaps(&iv(1, 2)));
        // touching endpoints share no segment
        assert!(!iv(0, 1).overlaps(&iv(1, 3)));
        assert!(!iv(1, 3).overlaps(&iv(0, 1)));
    }

    #[test]
    fn test_available_seats_counts_overlapping_reservations() {
        // route A B C D, capacity 2: [A,C) and [B,D)
        let existing = [occupant(1, 0, 2), occupant(2, 1, 3)];

        assert_eq!(available_seats(2, &existing, iv(1, 2)), 0);
        assert_eq!(available_seats(2, &existing, iv(0, 1)), 1);
        assert_eq!(available_seats(2, &existing, iv(2, 3)), 1);
    }

    #[test]
    fn test_available_seats_never_negative() {
        let existing = [occupant(1, 0, 1), occupant(2, 1, 2), occupant(3, 2, 3)];
        assert_eq!(available_seats(1, &existing, iv(0, 3)), 0);
    }

    #[test]
    fn test_can_book_checks_every_segment() {
        // [A,B) and [C,D) booked on a one-seat train
        let existing = [occupant(1, 0, 1), occupant(2, 2, 3)];

        assert!(can_book(1, &existing, iv(1, 2), 1));
        assert!(!can_book(1, &existing, iv(0, 2), 1));
        assert!(!can_book(2, &existing, iv(0, 3), 2));
        assert!(can_book(2, &existing, iv(0, 3), 1));
    }

    #[test]
    fn test_ledger_commit_and_loads() {
        let train = sample_train(2);
        let mut ledger = SeatIntervalLedger::new(2, 3);

        ledger.commit(TicketId::new(1), iv(0, 2), 1, &train).unwrap();
        ledger.commit(TicketId::new(2), iv(1, 3), 1, &train).unwrap();
        assert_eq!(ledger.segment_load(), &[1, 2, 1]);
        assert_eq!(ledger.tightest_free_seats(iv(0, 3)), 0);
        assert_eq!(ledger.tightest_free_seats(iv(0, 1)), 1);

        assert!(ledger.can_book(iv(0, 1), 1));
        assert!(!ledger.can_book(iv(0, 2), 1));
        assert!(matches!(
            ledger.commit(TicketId::new(3), iv(1, 2), 1, &train),
            Err(TransitError::CapacityExceeded { from, to, .. })
                if from.as_str() == "B" && to.as_str() == "C"
        ));
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_ledger_rejects_out_of_route_interval() {
        let ledger = SeatIntervalLedger::new(5, 3);
        assert!(!ledger.can_book(iv(2, 4), 1));
        assert_eq!(ledger.tightest_free_seats(iv(2, 4)), 0);
    }

    #[test]
    fn test_from_tickets() {
        let train = sample_train(3);
        let ticket = |id: u32, b: usize, a: usize, travelers: u32| Ticket {
            id: TicketId::new(id),
            train_id: train.id,
            from: train.route.station_at(b).unwrap().clone(),
            to: train.route.station_at(a).unwrap().clone(),
            journey: Journey {
                boarding: b,
                alighting: a,
            },
            fare: 0,
            booked_by: PassengerId::new(1),
            travelers: (1..=travelers).map(Into::into).collect(),
        };

        let tickets = [ticket(1, 0, 3, 2), ticket(2, 2, 3, 1)];
        let ledger = SeatIntervalLedger::from_tickets(&train, &tickets).unwrap();
        assert_eq!(ledger.segment_load(), &[2, 2, 3]);
        assert_eq!(ledger.available_seats(iv(0, 1)), 1);

        let broken = [ticket(3, 0, 1, 1)].map(|mut t| {
            t.journey.alighting = 9;
            t
        });
        assert!(matches!(
            SeatIntervalLedger::from_tickets(&train, &broken),
            Err(TransitError::InvalidData(_))
        ));
    }

    fn sample_train(capacity: SeatCount) -> Train {
        use chrono::NaiveTime;
        use seatline_transit::{NewTrain, Route, TrainId};

        let route = Route::new(["A", "B", "C", "D"].map(Station::new)).unwrap();
        NewTrain::new(route, NaiveTime::from_hms_opt(7, 0, 0).unwrap(), capacity)
            .unwrap()
            .with_id(TrainId::new(1))
    }

    fn arb_interval(stops: usize) -> impl Strategy<Value = SeatInterval> {
        (0..stops - 1)
            .prop_flat_map(move |b| (Just(b), b + 1..stops))
            .prop_map(|(b, a)| iv(b, a))
    }

    proptest! {
        #[test]
        fn prop_overlap_is_symmetric(x in arb_interval(8), y in arb_interval(8)) {
            prop_assert_eq!(x.overlaps(&y), y.overlaps(&x));
        }

        #[test]
        fn prop_segment_loads_never_exceed_capacity(
            capacity in 1u32..5,
            requests in prop::collection::vec((arb_interval(4), 1u32..3), 0..30),
        ) {
            let train = sample_train(capacity);
            let mut ledger = SeatIntervalLedger::new(capacity, train.route.segment_count());

            for (n, (interval, seats)) in requests.into_iter().enumerate() {
                let before = ledger.available_seats(interval);
                prop_assert_eq!(before, ledger.available_seats(interval));
                prop_assert!(before <= capacity);

                let allowed = can_book(capacity, ledger.occupants(), interval, seats);
                prop_assert_eq!(allowed, ledger.can_book(interval, seats));

                let committed = ledger.commit(TicketId::new(n as u32), interval, seats, &train);
                prop_assert_eq!(committed.is_ok(), allowed);
                prop_assert!(ledger.segment_load().iter().all(|load| *load <= capacity));
            }
        }
    }
}

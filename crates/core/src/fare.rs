//! Fare formulas.
//!
//! A fare depends only on how far a passenger travels and on the train's
//! capacity, never on how full the train already is, so quoting the same
//! journey twice always yields the same amount.

use seatline_transit::{Fare, Journey, Route, SeatCount};

pub trait FareCalculator: Send + Sync {
    /// Fare for one seat over `distance` segments
    fn fare_for_distance(&self, distance: usize, capacity: SeatCount) -> Fare;

    fn fare(&self, route: &Route, journey: Journey, capacity: SeatCount) -> Fare {
        debug_assert!(journey.alighting < route.len());
        self.fare_for_distance(journey.distance(), capacity)
    }
}

impl<F> FareCalculator for F
where
    F: Fn(usize, SeatCount) -> Fare + Send + Sync,
{
    fn fare_for_distance(&self, distance: usize, capacity: SeatCount) -> Fare {
        self(distance, capacity)
    }
}

/// `base_fare + per_segment * distance`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PerSegmentFare {
    pub base_fare: Fare,
    pub per_segment: Fare,
}

impl PerSegmentFare {
    pub const DEFAULT_PER_SEGMENT: Fare = 300;

    pub fn new(base_fare: Fare, per_segment: Fare) -> Self {
        Self {
            base_fare,
            per_segment,
        }
    }
}

impl Default for PerSegmentFare {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_PER_SEGMENT)
    }
}

impl FareCalculator for PerSegmentFare {
    fn fare_for_distance(&self, distance: usize, _capacity: SeatCount) -> Fare {
        self.per_segment
            .saturating_mul(distance as Fare)
            .saturating_add(self.base_fare)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seatline_transit::Station;

    fn route() -> Route {
        Route::new(["A", "B", "C", "D", "E"].map(Station::new)).unwrap()
    }

    #[test]
    fn test_default_fare_is_per_segment() {
        let fares = PerSegmentFare::default();
        let r = route();

        let short = r.journey(&Station::new("A"), &Station::new("B")).unwrap();
        let long = r.journey(&Station::new("A"), &Station::new("E")).unwrap();

        assert_eq!(fares.fare(&r, short, 10), 300);
        assert_eq!(fares.fare(&r, long, 10), 1200);
    }

    #[test]
    fn test_fare_grows_with_distance_not_capacity() {
        let fares = PerSegmentFare::new(50, 120);
        for distance in 1..10 {
            assert!(fares.fare_for_distance(distance + 1, 4) > fares.fare_for_distance(distance, 4));
            assert_eq!(
                fares.fare_for_distance(distance, 4),
                fares.fare_for_distance(distance, 400)
            );
        }
    }

    #[test]
    fn test_closure_fare() {
        let flat = |_: usize, _: SeatCount| -> Fare { 99 };
        let r = route();
        let j = r.journey(&Station::new("B"), &Station::new("D")).unwrap();
        assert_eq!(flat.fare(&r, j, 2), 99);
    }

    #[test]
    fn test_fare_saturates() {
        let fares = PerSegmentFare::new(Fare::MAX, Fare::MAX);
        assert_eq!(fares.fare_for_distance(3, 1), Fare::MAX);
    }
}

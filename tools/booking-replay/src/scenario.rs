use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use seatline_core::config::BookingConfig;
use seatline_transit::{Age, PassengerId, SeatCount, Station, TrainId};
use serde::Deserialize;

/// A scenario file: the service configuration, the fleet and passengers to
/// register, then the operations to replay in order.
///
/// Passengers and trains get ids `1..` in the order they are listed, which is
/// how operations refer to them.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    #[serde(default)]
    pub config: BookingConfig,
    #[serde(default)]
    pub passengers: Vec<PassengerSpec>,
    #[serde(default)]
    pub trains: Vec<TrainSpec>,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

#[derive(Debug, Deserialize)]
pub struct PassengerSpec {
    pub name: String,
    pub age: Age,
}

#[derive(Debug, Deserialize)]
pub struct TrainSpec {
    pub route: Vec<Station>,
    /// `HH:MM` or `HH:MM:SS`
    pub departure: String,
    pub capacity: SeatCount,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Operation {
    Book {
        train: TrainId,
        from: Station,
        to: Station,
        booked_by: PassengerId,
        #[serde(default)]
        travelers: Vec<PassengerId>,
    },
    AvailableSeats {
        train: TrainId,
        from: Station,
        to: Station,
    },
    BoardingCount {
        train: TrainId,
        station: Station,
    },
    OldestTraveler {
        train: TrainId,
    },
    TrainsServing {
        station: Station,
        start: String,
        end: String,
    },
    BookingsBy {
        passenger: PassengerId,
    },
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Book { .. } => "book",
            Operation::AvailableSeats { .. } => "availableSeats",
            Operation::BoardingCount { .. } => "boardingCount",
            Operation::OldestTraveler { .. } => "oldestTraveler",
            Operation::TrainsServing { .. } => "trainsServing",
            Operation::BookingsBy { .. } => "bookingsBy",
        }
    }
}

pub fn read_scenario(path: &Path) -> Result<Scenario> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario {}", path.display()))?;
    parse_scenario(&raw).with_context(|| format!("Invalid scenario {}", path.display()))
}

pub fn parse_scenario(raw: &str) -> Result<Scenario> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_operations() {
        let scenario = parse_scenario(
            r#"{
                "trains": [{ "route": ["A", "B"], "departure": "08:00", "capacity": 2 }],
                "passengers": [{ "name": "Ravi", "age": 52 }],
                "operations": [
                    { "op": "book", "train": 1, "from": "A", "to": "B", "bookedBy": 1 },
                    { "op": "trainsServing", "station": "A", "start": "07:00", "end": "09:00" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(scenario.config, BookingConfig::default());
        assert_eq!(scenario.trains[0].route, vec![Station::new("A"), Station::new("B")]);
        assert!(matches!(
            &scenario.operations[0],
            Operation::Book { booked_by, travelers, .. }
                if *booked_by == PassengerId::new(1) && travelers.is_empty()
        ));
        assert_eq!(scenario.operations[1].name(), "trainsServing");
    }

    #[test]
    fn test_unknown_operation_is_rejected() {
        assert!(parse_scenario(r#"{ "operations": [{ "op": "refund", "ticket": 1 }] }"#).is_err());
    }

    #[test]
    fn test_bundled_scenario_parses() {
        let scenario = parse_scenario(include_str!("../scenarios/partial-journeys.json")).unwrap();
        assert!(!scenario.operations.is_empty());
    }
}

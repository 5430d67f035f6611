//! Core scalar types and the error taxonomy shared by every crate.

use std::fmt;

use crate::identifiers::*;

// ============================================================================
// Scalars
// ============================================================================

/// Number of seats (capacity, occupancy, free seats)
pub type SeatCount = u32;

/// Ticket price in the smallest currency unit
pub type Fare = u64;

/// Passenger age in years
pub type Age = u32;

// ============================================================================
// Errors
// ============================================================================

/// Why a pair of stations cannot be booked on a route
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StationViolation {
    /// The route does not stop at this station
    NotServed(Station),

    /// The alighting station does not come after the boarding station
    NonForward { from: Station, to: Station },
}

impl fmt::Display for StationViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotServed(station) => write!(f, "train does not pass through {station}"),
            Self::NonForward { from, to } => {
                write!(f, "{to} is not served after {from} on this route")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    #[error("Train not found: {0}")]
    TrainNotFound(TrainId),

    #[error("Passenger not found: {0}")]
    PassengerNotFound(PassengerId),

    #[error("Ticket not found: {0}")]
    TicketNotFound(TicketId),

    #[error("Invalid stations: {0}")]
    InvalidStation(StationViolation),

    #[error("Less tickets are available on train {train} between {from} and {to}")]
    CapacityExceeded {
        train: TrainId,
        from: Station,
        to: Station,
    },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Storage failure: {0}")]
    StorageFailure(String),
}

impl TransitError {
    /// True for the unknown-id family (train, passenger, ticket)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::TrainNotFound(_) | Self::PassengerNotFound(_) | Self::TicketNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TransitError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_family() {
        assert!(TransitError::TrainNotFound(TrainId::new(1)).is_not_found());
        assert!(TransitError::PassengerNotFound(PassengerId::new(1)).is_not_found());
        assert!(TransitError::TicketNotFound(TicketId::new(1)).is_not_found());
        assert!(!TransitError::StorageFailure("disk".into()).is_not_found());
        assert!(
            !TransitError::InvalidStation(StationViolation::NotServed(Station::new("X")))
                .is_not_found()
        );
    }

    #[test]
    fn test_error_messages() {
        let err = TransitError::InvalidStation(StationViolation::NonForward {
            from: Station::new("C"),
            to: Station::new("A"),
        });
        assert_eq!(err.to_string(), "Invalid stations: A is not served after C on this route");

        let err = TransitError::CapacityExceeded {
            train: TrainId::new(3),
            from: Station::new("A"),
            to: Station::new("B"),
        };
        assert_eq!(
            err.to_string(),
            "Less tickets are available on train 3 between A and B"
        );
    }
}

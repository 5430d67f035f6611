use serde::Deserialize;
use seatline_transit::Fare;

use crate::fare::PerSegmentFare;

/// Settings for a booking service. Every field has a default, so an empty
/// JSON object is a valid configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BookingConfig {
    pub fare: FareConfig,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FareConfig {
    pub base_fare: Fare,
    pub per_segment: Fare,
}

impl Default for FareConfig {
    fn default() -> Self {
        let fare = PerSegmentFare::default();
        Self {
            base_fare: fare.base_fare,
            per_segment: fare.per_segment,
        }
    }
}

impl From<FareConfig> for PerSegmentFare {
    fn from(config: FareConfig) -> Self {
        PerSegmentFare::new(config.base_fare, config.per_segment)
    }
}

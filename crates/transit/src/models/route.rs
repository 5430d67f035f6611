//! Ordered stop sequences and the position index built over them.
//!
//! A [`Route`] is immutable once built. Station lookups go through an explicit
//! station → positions map, so membership is exact token equality and costs a
//! hash lookup rather than a scan.

use std::collections::HashMap;
use std::sync::Arc;

use crate::identifiers::Station;
use crate::models::types::*;

/// A resolved journey along a route: `[boarding, alighting)` in stop positions.
///
/// Only [`Route::journey`] hands these out for live bookings, which guarantees
/// `boarding < alighting < route.len()`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Journey {
    pub boarding: usize,
    pub alighting: usize,
}

impl Journey {
    /// Number of segments travelled
    pub fn distance(&self) -> usize {
        self.alighting - self.boarding
    }
}

/// The stops a train makes, index `0..len()`
#[derive(Clone, Debug)]
pub struct Route {
    stops: Arc<[Station]>,
    // ascending positions per station; stations may repeat on loop services
    positions: HashMap<Station, Vec<usize>>,
}

impl Route {
    pub fn new(stops: impl IntoIterator<Item = Station>) -> Result<Self> {
        let stops: Arc<[Station]> = stops.into_iter().collect();
        if stops.len() < 2 {
            return Err(TransitError::InvalidData(format!(
                "a route needs at least 2 stops, got {}",
                stops.len()
            )));
        }

        let mut positions: HashMap<Station, Vec<usize>> = HashMap::new();
        for (idx, station) in stops.iter().enumerate() {
            positions.entry(station.clone()).or_default().push(idx);
        }

        Ok(Self { stops, positions })
    }

    pub fn stops(&self) -> &[Station] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false; routes have at least two stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Number of unit segments between consecutive stops
    pub fn segment_count(&self) -> usize {
        self.stops.len() - 1
    }

    pub fn contains(&self, station: &Station) -> bool {
        self.positions.contains_key(station)
    }

    /// First position of `station` on this route
    pub fn index_of(&self, station: &Station) -> Result<usize> {
        self.positions
            .get(station)
            .and_then(|p| p.first().copied())
            .ok_or_else(|| TransitError::InvalidStation(StationViolation::NotServed(station.clone())))
    }

    pub fn station_at(&self, index: usize) -> Option<&Station> {
        self.stops.get(index)
    }

    /// Resolve a forward journey from `from` to `to`.
    ///
    /// Boards at the first occurrence of `from` and alights at the first
    /// occurrence of `to` after it.
    pub fn journey(&self, from: &Station, to: &Station) -> Result<Journey> {
        let boarding = self.index_of(from)?;
        let alighting_positions = self.positions.get(to).ok_or_else(|| {
            TransitError::InvalidStation(StationViolation::NotServed(to.clone()))
        })?;

        alighting_positions
            .iter()
            .copied()
            .find(|&idx| idx > boarding)
            .map(|alighting| Journey {
                boarding,
                alighting,
            })
            .ok_or_else(|| {
                TransitError::InvalidStation(StationViolation::NonForward {
                    from: from.clone(),
                    to: to.clone(),
                })
            })
    }
}

impl PartialEq for Route {
    fn eq(&self, other: &Self) -> bool {
        self.stops == other.stops
    }
}

impl Eq for Route {}

#[cfg(feature = "serde")]
impl serde::Serialize for Route {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.stops.iter())
    }
}

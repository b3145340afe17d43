//! The passenger trip lifecycle.

use crate::line::StationId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique ID of a [Passenger], assigned in creation order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PassengerId(pub(crate) u64);

impl fmt::Display for PassengerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// The stage of a passenger's trip.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerState {
    /// Waiting at the origin station.
    AtOrigin,
    /// Riding between stations.
    InTransit,
    /// Arrived at the destination station.
    AtDestination,
}

/// A simulated passenger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Passenger {
    /// The passenger's ID.
    id: PassengerId,
    /// The station the trip starts from.
    origin: StationId,
    /// The station the trip ends at.
    destination: StationId,
    /// The number of stops between origin and destination.
    distance: usize,
    /// The stage of the trip.
    state: PassengerState,
    /// The number of stops still to travel.
    remaining: usize,
    /// The step at which the passenger was created.
    created: usize,
}

impl Passenger {
    /// Creates a new passenger waiting at `origin`.
    ///
    /// The caller guarantees that `distance` is at least 1.
    pub(crate) fn new(
        id: PassengerId,
        origin: StationId,
        destination: StationId,
        distance: usize,
        created: usize,
    ) -> Self {
        Self {
            id,
            origin,
            destination,
            distance,
            state: PassengerState::AtOrigin,
            remaining: distance,
            created,
        }
    }

    /// Gets the passenger's ID.
    pub fn id(&self) -> PassengerId {
        self.id
    }

    /// The station the trip starts from.
    pub fn origin(&self) -> StationId {
        self.origin
    }

    /// The station the trip ends at.
    pub fn destination(&self) -> StationId {
        self.destination
    }

    /// The total number of stops travelled by the trip.
    pub fn distance(&self) -> usize {
        self.distance
    }

    /// The stage of the trip.
    pub fn state(&self) -> PassengerState {
        self.state
    }

    /// The number of stops still to travel.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// The step at which the passenger was created.
    pub fn created(&self) -> usize {
        self.created
    }

    /// The station at which the passenger is counted, if any.
    /// Passengers in transit are not at any station.
    pub fn station(&self) -> Option<StationId> {
        match self.state {
            PassengerState::AtOrigin => Some(self.origin),
            PassengerState::AtDestination if self.remaining == 0 => Some(self.destination),
            _ => None,
        }
    }

    /// Advances the trip by one step.
    pub(crate) fn advance(&mut self) {
        match self.state {
            PassengerState::AtOrigin => {
                self.state = PassengerState::InTransit;
            }
            PassengerState::InTransit => {
                self.remaining = self.remaining.saturating_sub(1);
                if self.remaining == 0 {
                    self.state = PassengerState::AtDestination;
                }
            }
            PassengerState::AtDestination => {}
        }
    }

    /// Whether the passenger has lingered at its destination past the grace window.
    ///
    /// # Parameters
    /// * `now` - The number of the step just completed
    /// * `grace` - The number of steps a passenger stays at its destination
    pub(crate) fn is_finished(&self, now: usize, grace: usize) -> bool {
        self.state == PassengerState::AtDestination
            && now.saturating_sub(self.created) > self.distance + grace
    }
}

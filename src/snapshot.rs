//! Per-step aggregate statistics.

use crate::passenger::{Passenger, PassengerState};
use serde::{Deserialize, Serialize};

/// The passengers counted at a single station.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StationCount {
    /// Passengers waiting to depart from the station.
    pub waiting: usize,
    /// Passengers that have arrived at the station.
    pub arrived: usize,
}

impl StationCount {
    /// The total number of passengers at the station.
    pub fn total(&self) -> usize {
        self.waiting + self.arrived
    }
}

/// The number of passengers in each [PassengerState].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub at_origin: usize,
    pub in_transit: usize,
    pub at_destination: usize,
}

impl StateCounts {
    /// Counts the passengers in each state.
    pub fn tally<'a>(passengers: impl IntoIterator<Item = &'a Passenger>) -> Self {
        let mut counts = Self::default();
        for passenger in passengers {
            match passenger.state() {
                PassengerState::AtOrigin => counts.at_origin += 1,
                PassengerState::InTransit => counts.in_transit += 1,
                PassengerState::AtDestination => counts.at_destination += 1,
            }
        }
        counts
    }

    /// The number of passengers in the given state.
    pub fn get(&self, state: PassengerState) -> usize {
        match state {
            PassengerState::AtOrigin => self.at_origin,
            PassengerState::InTransit => self.in_transit,
            PassengerState::AtDestination => self.at_destination,
        }
    }

    /// The total number of passengers.
    pub fn total(&self) -> usize {
        self.at_origin + self.in_transit + self.at_destination
    }
}

/// Computes the per-station counts of a population, indexed by station.
pub(crate) fn occupancy<'a>(
    num_stations: usize,
    passengers: impl IntoIterator<Item = &'a Passenger>,
) -> Vec<StationCount> {
    let mut counts = vec![StationCount::default(); num_stations];
    for passenger in passengers {
        if let Some(station) = passenger.station() {
            let count = &mut counts[station.index()];
            match passenger.state() {
                PassengerState::AtOrigin => count.waiting += 1,
                _ => count.arrived += 1,
            }
        }
    }
    counts
}

/// A record of the simulation state at the end of a step.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepSnapshot {
    /// The number of the step.
    step: usize,
    /// The passengers at each station, in line order.
    stations: Vec<StationCount>,
    /// The live population.
    population: usize,
    /// The live population by state.
    states: StateCounts,
}

impl StepSnapshot {
    pub(crate) fn new(
        step: usize,
        stations: Vec<StationCount>,
        population: usize,
        states: StateCounts,
    ) -> Self {
        Self {
            step,
            stations,
            population,
            states,
        }
    }

    /// The number of the step.
    pub fn step(&self) -> usize {
        self.step
    }

    /// The passengers at each station, in line order.
    pub fn stations(&self) -> &[StationCount] {
        &self.stations
    }

    /// The total number of passengers counted at stations.
    pub fn at_stations(&self) -> usize {
        self.stations.iter().map(StationCount::total).sum()
    }

    /// The live population after retirement.
    pub fn population(&self) -> usize {
        self.population
    }

    /// The live population by state.
    pub fn states(&self) -> StateCounts {
        self.states
    }
}

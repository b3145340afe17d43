//! Simulation parameters.

use serde::{Deserialize, Serialize};

/// What to do when a step lies beyond the intensity data.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HorizonPolicy {
    /// Abort the step with [Error::OutOfRange](crate::Error::OutOfRange).
    #[default]
    Fail,
    /// Keep using the last known rate.
    Clamp,
}

/// The parameters of a simulation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Seed of the simulation's random number generator.
    pub seed: u64,
    /// The number of steps a passenger is still counted at its destination
    /// station after the step in which it arrives.
    pub grace: usize,
    /// The intensity curve index of the first simulated step.
    pub start_step: usize,
    /// Behaviour when the simulation runs past the intensity data.
    pub horizon_policy: HorizonPolicy,
    /// The length of the historical ridership intervals, in minutes.
    pub source_interval: u32,
    /// The length of a simulation step, in minutes.
    pub target_interval: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            grace: 1,
            start_step: 0,
            horizon_policy: HorizonPolicy::Fail,
            source_interval: 15,
            target_interval: 5,
        }
    }
}

impl SimulationConfig {
    /// Parses a configuration from JSON; missing fields take their default values.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

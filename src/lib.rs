pub use config::{HorizonPolicy, SimulationConfig};
pub use error::{ConfigError, Error, Result};
pub use intensity::{HistogramIntensity, Intensity, IntensityCurve};
pub use line::{Line, StationId};
pub use passenger::{Passenger, PassengerId, PassengerState};
pub use ridership::{Ridership, RidershipRecord};
pub use sampler::ArrivalSampler;
pub use simulation::{CurrentState, Simulation};
pub use snapshot::{StateCounts, StationCount, StepSnapshot};
pub use util::Interval;

mod config;
mod error;
mod intensity;
mod line;
mod passenger;
mod ridership;
mod sampler;
mod simulation;
mod snapshot;
mod util;

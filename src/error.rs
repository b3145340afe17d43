//! Error types.

/// A specialised [Result](std::result::Result) for simulation operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The simulation could not be constructed from the supplied data.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// A step was requested beyond the horizon of the intensity data.
    #[error("step {step} is beyond the intensity horizon of station {station} ({horizon} steps)")]
    OutOfRange {
        /// The station whose rate was requested.
        station: String,
        /// The requested step.
        step: usize,
        /// The number of steps covered by the data.
        horizon: usize,
    },

    /// A passenger was created with the same origin and destination.
    #[error("invalid route: origin and destination are both {station}")]
    InvalidRoute {
        /// The offending station.
        station: String,
    },

    /// A station name that is not on the line.
    #[error("unknown station: {0}")]
    UnknownStation(String),
}

/// Problems detected while building a line, curve or simulation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("source interval {coarse} min is not a multiple of target interval {fine} min")]
    IndivisibleInterval { coarse: u32, fine: u32 },

    #[error("resampling intervals must be non-zero")]
    ZeroInterval,

    #[error("no ridership data for station {0}")]
    MissingStationData(String),

    #[error("ridership series for station {0} is empty")]
    EmptySeries(String),

    #[error("station {0} appears more than once on the line")]
    DuplicateStation(String),

    #[error("a line needs at least two stations, got {0}")]
    TooFewStations(usize),

    #[error("a histogram needs at least one bin")]
    InvalidBinCount,

    #[error("rate {rate} for station {station} is not a finite non-negative number")]
    InvalidRate { station: String, rate: f64 },
}

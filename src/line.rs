use crate::error::{ConfigError, Error, Result};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The position of a station along a [Line].
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StationId(pub(crate) usize);

impl StationId {
    /// The index of the station along the line.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An ordered sequence of uniquely named stations on a single subway line.
///
/// The travel distance between two stations is the difference of their indices.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Line {
    stations: Vec<String>,
}

impl Line {
    /// Creates a line from its station names, in order.
    ///
    /// Fails if a name repeats or if there are fewer than two stations,
    /// since no passenger could then choose a destination.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Result<Self> {
        let stations: Vec<String> = names.into_iter().map(Into::into).collect();
        if stations.len() < 2 {
            return Err(ConfigError::TooFewStations(stations.len()).into());
        }
        if let Some(name) = stations.iter().duplicates().next() {
            return Err(ConfigError::DuplicateStation(name.clone()).into());
        }
        Ok(Self { stations })
    }

    /// The number of stations on the line.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Always false; a line has at least two stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Looks up a station by name.
    pub fn station(&self, name: &str) -> Result<StationId> {
        self.stations
            .iter()
            .position(|s| s == name)
            .map(StationId)
            .ok_or_else(|| Error::UnknownStation(name.to_owned()))
    }

    /// The name of a station.
    pub fn name(&self, station: StationId) -> &str {
        &self.stations[station.0]
    }

    /// Returns an iterator over the stations, in line order.
    pub fn iter(&self) -> impl Iterator<Item = (StationId, &str)> + '_ {
        self.stations
            .iter()
            .enumerate()
            .map(|(idx, name)| (StationId(idx), name.as_str()))
    }

    /// The number of stops between two stations.
    pub fn distance(&self, a: StationId, b: StationId) -> usize {
        a.0.abs_diff(b.0)
    }
}

impl TryFrom<Vec<String>> for Line {
    type Error = Error;

    fn try_from(names: Vec<String>) -> Result<Self> {
        Self::new(names)
    }
}

impl From<Line> for Vec<String> {
    fn from(line: Line) -> Self {
        line.stations
    }
}

use crate::error::{ConfigError, Result};
use crate::line::Line;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Historical ridership: for each station, the number of passengers that
/// entered during each consecutive fixed-length interval.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ridership {
    series: BTreeMap<String, Vec<u32>>,
}

/// A single aggregated turnstile reading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RidershipRecord {
    /// The start of the measured interval. Any label that sorts chronologically
    /// works, e.g. `"07:45:00"` or minutes since midnight.
    pub interval_start: String,
    /// The station name.
    pub station: String,
    /// Passengers counted during the interval.
    pub count: u32,
}

impl Ridership {
    /// Creates an empty data set.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the series for a station, replacing any previous one.
    pub fn insert(&mut self, station: impl Into<String>, counts: Vec<u32>) {
        self.series.insert(station.into(), counts);
    }

    /// Builds per-station series from raw readings. Readings sharing a station
    /// and interval are summed; each series is ordered by interval start.
    pub fn from_records(records: impl IntoIterator<Item = RidershipRecord>) -> Self {
        let series = records
            .into_iter()
            .into_group_map_by(|record| record.station.clone())
            .into_iter()
            .map(|(station, records)| {
                let mut buckets = BTreeMap::<String, u32>::new();
                for record in records {
                    *buckets.entry(record.interval_start).or_default() += record.count;
                }
                (station, buckets.into_values().collect())
            })
            .collect();
        Self { series }
    }

    /// The series for a station, if there is one.
    pub fn series(&self, station: &str) -> Option<&[u32]> {
        self.series.get(station).map(Vec::as_slice)
    }

    /// The station names with data, in lexical order.
    pub fn stations(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.keys().map(String::as_str)
    }

    /// Returns the series of every station on the line, in line order.
    ///
    /// Fails if a station has no data or an empty series.
    pub(crate) fn line_series<'a>(&'a self, line: &Line) -> Result<Vec<&'a [u32]>> {
        line.iter()
            .map(|(_, name)| match self.series(name) {
                None => Err(ConfigError::MissingStationData(name.to_owned()).into()),
                Some([]) => Err(ConfigError::EmptySeries(name.to_owned()).into()),
                Some(series) => Ok(series),
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn record(interval_start: &str, station: &str, count: u32) -> RidershipRecord {
        RidershipRecord {
            interval_start: interval_start.into(),
            station: station.into(),
            count,
        }
    }

    #[test]
    fn groups_and_sums_records() {
        let data = Ridership::from_records([
            record("08:15", "Lima", 4),
            record("08:00", "Lima", 10),
            record("08:00", "Perú", 7),
            record("08:00", "Lima", 5),
        ]);
        assert_eq!(data.series("Lima"), Some(&[15, 4][..]));
        assert_eq!(data.series("Perú"), Some(&[7][..]));
        assert_eq!(data.series("Flores"), None);
        assert_eq!(data.stations().collect::<Vec<_>>(), vec!["Lima", "Perú"]);
    }

    #[test]
    fn line_series_requires_every_station() {
        let line = Line::new(["A", "B"]).unwrap();
        let mut data = Ridership::new();
        data.insert("A", vec![1, 2]);
        assert_eq!(
            data.line_series(&line),
            Err(ConfigError::MissingStationData("B".into()).into())
        );
        data.insert("B", vec![]);
        assert_eq!(
            data.line_series(&line),
            Err(ConfigError::EmptySeries("B".into()).into())
        );
    }

    #[test]
    fn reads_json() {
        let data: Ridership = serde_json::from_str(r#"{"A": [1, 2, 3], "B": [0]}"#).unwrap();
        assert_eq!(data.series("A"), Some(&[1, 2, 3][..]));
    }
}

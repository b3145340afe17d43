//! Arrival intensity: the expected number of passengers entering each station per step.

use crate::error::{ConfigError, Error, Result};
use crate::line::{Line, StationId};
use crate::ridership::Ridership;
use crate::util::Interval;
use itertools::repeat_n;
use log::info;

pub use histogram::HistogramIntensity;

mod histogram;

/// A source of per-station, per-step arrival rates.
pub trait Intensity {
    /// The expected number of arrivals at `station` during `step`.
    ///
    /// Fails with [Error::OutOfRange] if `step` lies beyond the data, and with
    /// [Error::UnknownStation] if `station` is not covered.
    fn rate_at(&self, station: StationId, step: usize) -> Result<f64>;

    /// The number of steps covered for `station`, or `None` if every step is.
    fn horizon(&self, station: StationId) -> Option<usize>;

    /// Whether the intensity has rates for `station`.
    fn covers(&self, station: StationId) -> bool;
}

/// Arrival rates obtained by spreading each historical interval's count
/// evenly over the simulation steps it spans.
#[derive(Clone, Debug)]
pub struct IntensityCurve {
    /// The rates of each station, in line order.
    stations: Vec<StationRates>,
    /// The number of steps per historical interval.
    factor: usize,
}

#[derive(Clone, Debug)]
struct StationRates {
    name: String,
    rates: Vec<f64>,
}

impl IntensityCurve {
    /// Builds the curve for every station on `line`.
    ///
    /// # Parameters
    /// * `data` - Counts per `source_interval` minutes for each station
    /// * `source_interval` - The historical bucket length in minutes
    /// * `target_interval` - The simulation step length in minutes; must divide `source_interval`
    pub fn build(
        data: &Ridership,
        line: &Line,
        source_interval: u32,
        target_interval: u32,
    ) -> Result<Self> {
        let factor = resampling_factor(source_interval, target_interval)?;
        let stations = line
            .iter()
            .zip(data.line_series(line)?)
            .map(|((_, name), counts)| StationRates {
                name: name.to_owned(),
                rates: resample(counts, factor),
            })
            .collect::<Vec<_>>();
        info!(
            "Built intensity curve for {} stations ({} min -> {} min, {} steps)",
            stations.len(),
            source_interval,
            target_interval,
            stations.iter().map(|s| s.rates.len()).min().unwrap_or(0),
        );
        Ok(Self { stations, factor })
    }

    /// Creates a curve with the same `rate` at every station for `horizon` steps.
    pub fn constant(line: &Line, rate: f64, horizon: usize) -> Result<Self> {
        let stations = line
            .iter()
            .map(|(_, name)| {
                if !(rate.is_finite() && rate >= 0.0) {
                    return Err(ConfigError::InvalidRate {
                        station: name.to_owned(),
                        rate,
                    });
                }
                if horizon == 0 {
                    return Err(ConfigError::EmptySeries(name.to_owned()));
                }
                Ok(StationRates {
                    name: name.to_owned(),
                    rates: vec![rate; horizon],
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self {
            stations,
            factor: 1,
        })
    }

    /// The number of simulation steps per historical interval.
    pub fn factor(&self) -> usize {
        self.factor
    }

    /// The per-step rates of a station.
    pub fn rates(&self, station: StationId) -> &[f64] {
        self.stations
            .get(station.index())
            .map(|s| s.rates.as_slice())
            .unwrap_or_default()
    }

    /// The steps spanned by the historical interval with index `bucket`.
    pub fn bucket_steps(&self, bucket: usize) -> Interval<usize> {
        Interval::new(bucket * self.factor, (bucket + 1) * self.factor)
    }
}

impl Intensity for IntensityCurve {
    fn rate_at(&self, station: StationId, step: usize) -> Result<f64> {
        let curve = self
            .stations
            .get(station.index())
            .ok_or_else(|| Error::UnknownStation(station.to_string()))?;
        curve
            .rates
            .get(step)
            .copied()
            .ok_or_else(|| Error::OutOfRange {
                station: curve.name.clone(),
                step,
                horizon: curve.rates.len(),
            })
    }

    fn horizon(&self, station: StationId) -> Option<usize> {
        self.stations.get(station.index()).map(|s| s.rates.len())
    }

    fn covers(&self, station: StationId) -> bool {
        station.index() < self.stations.len()
    }
}

/// Computes how many target intervals fit into one source interval.
pub(crate) fn resampling_factor(source_interval: u32, target_interval: u32) -> Result<usize> {
    if source_interval == 0 || target_interval == 0 {
        return Err(ConfigError::ZeroInterval.into());
    }
    if source_interval % target_interval != 0 {
        return Err(ConfigError::IndivisibleInterval {
            coarse: source_interval,
            fine: target_interval,
        }
        .into());
    }
    Ok((source_interval / target_interval) as usize)
}

/// Repeats each count `factor` times, divided by `factor`, so every
/// historical bucket keeps its total.
fn resample(counts: &[u32], factor: usize) -> Vec<f64> {
    counts
        .iter()
        .flat_map(|&count| repeat_n(count as f64 / factor as f64, factor))
        .collect()
}

use super::{resampling_factor, Intensity};
use crate::error::{ConfigError, Error, Result};
use crate::line::{Line, StationId};
use crate::ridership::Ridership;
use crate::util::Interval;
use itertools::{Itertools, MinMaxResult};
use log::info;
use rand::distributions::WeightedIndex;
use rand::Rng;
use rand_distr::Distribution;

/// Stationary arrival rates derived from the empirical distribution of each
/// station's historical counts.
///
/// Each station's counts are binned into a histogram; the rate at every step is
/// the histogram's expected value spread over the steps of one historical interval.
#[derive(Clone, Debug)]
pub struct HistogramIntensity {
    stations: Vec<Histogram>,
    factor: usize,
}

/// An empirical distribution over bin midpoints.
#[derive(Clone, Debug)]
struct Histogram {
    /// The midpoint of each bin.
    values: Vec<f64>,
    /// The relative frequency of each bin.
    probabilities: Vec<f64>,
    /// Sampler over the bins, weighted by frequency.
    index: WeightedIndex<f64>,
}

impl HistogramIntensity {
    /// Builds a histogram with `bins` equal-width bins for every station on `line`.
    pub fn build(
        data: &Ridership,
        line: &Line,
        bins: usize,
        source_interval: u32,
        target_interval: u32,
    ) -> Result<Self> {
        if bins == 0 {
            return Err(ConfigError::InvalidBinCount.into());
        }
        let factor = resampling_factor(source_interval, target_interval)?;
        let stations = line
            .iter()
            .zip(data.line_series(line)?)
            .map(|((_, name), counts)| Histogram::new(name, counts, bins))
            .collect::<Result<Vec<_>>>()?;
        info!(
            "Built {}-bin histogram intensity for {} stations",
            bins,
            stations.len()
        );
        Ok(Self { stations, factor })
    }

    /// The expected count per historical interval at a station.
    pub fn mean(&self, station: StationId) -> Result<f64> {
        Ok(self.histogram(station)?.mean())
    }

    /// The bin midpoints and their probabilities for a station.
    pub fn bins(&self, station: StationId) -> Result<impl Iterator<Item = (f64, f64)> + '_> {
        let histogram = self.histogram(station)?;
        Ok(histogram
            .values
            .iter()
            .copied()
            .zip(histogram.probabilities.iter().copied()))
    }

    /// Draws a count for one historical interval from a station's empirical distribution.
    pub fn sample_count<R: Rng + ?Sized>(&self, station: StationId, rng: &mut R) -> Result<u32> {
        let histogram = self.histogram(station)?;
        Ok(histogram.values[histogram.index.sample(rng)] as u32)
    }

    fn histogram(&self, station: StationId) -> Result<&Histogram> {
        self.stations
            .get(station.index())
            .ok_or_else(|| Error::UnknownStation(station.to_string()))
    }
}

impl Histogram {
    fn new(name: &str, counts: &[u32], bins: usize) -> Result<Self> {
        let range = match counts.iter().minmax() {
            MinMaxResult::MinMax(&min, &max) if min != max => {
                Interval::new(min as f64, max as f64)
            }
            MinMaxResult::MinMax(&value, _) | MinMaxResult::OneElement(&value) => {
                return Self::from_bins(name, vec![value as f64], vec![1.0]);
            }
            MinMaxResult::NoElements => {
                return Err(ConfigError::EmptySeries(name.to_owned()).into());
            }
        };

        let mut frequencies = vec![0usize; bins];
        for &count in counts {
            let bin = (range.inv_lerp(count as f64) * bins as f64) as usize;
            // The maximum falls on the closing edge of the last bin
            frequencies[bin.min(bins - 1)] += 1;
        }

        let total = counts.len() as f64;
        let values = (0..bins)
            .map(|i| {
                let bin = Interval::new(
                    range.lerp(i as f64 / bins as f64),
                    range.lerp((i + 1) as f64 / bins as f64),
                );
                bin.midpoint()
            })
            .collect();
        let probabilities = frequencies.iter().map(|&f| f as f64 / total).collect();
        Self::from_bins(name, values, probabilities)
    }

    fn from_bins(name: &str, values: Vec<f64>, probabilities: Vec<f64>) -> Result<Self> {
        let index = WeightedIndex::new(&probabilities)
            .map_err(|_| ConfigError::EmptySeries(name.to_owned()))?;
        Ok(Self {
            values,
            probabilities,
            index,
        })
    }

    fn mean(&self) -> f64 {
        self.values
            .iter()
            .zip(&self.probabilities)
            .map(|(v, p)| v * p)
            .sum()
    }
}

impl Intensity for HistogramIntensity {
    fn rate_at(&self, station: StationId, _step: usize) -> Result<f64> {
        Ok(self.mean(station)? / self.factor as f64)
    }

    fn horizon(&self, _station: StationId) -> Option<usize> {
        None
    }

    fn covers(&self, station: StationId) -> bool {
        station.index() < self.stations.len()
    }
}

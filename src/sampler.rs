//! Poisson sampling of passenger arrivals.

use crate::config::HorizonPolicy;
use crate::error::{ConfigError, Result};
use crate::intensity::Intensity;
use crate::line::StationId;
use log::warn;
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use std::cell::Cell;

/// Draws the number of new passengers at a station from a Poisson
/// distribution whose mean is the station's current intensity.
#[derive(Clone, Debug)]
pub struct ArrivalSampler<I> {
    /// The arrival rates.
    intensity: I,
    /// How steps past the end of the data are handled.
    policy: HorizonPolicy,
    /// Whether a step has already been clamped to the horizon.
    clamped: Cell<bool>,
}

impl<I: Intensity> ArrivalSampler<I> {
    /// Creates a new sampler.
    pub fn new(intensity: I, policy: HorizonPolicy) -> Self {
        Self {
            intensity,
            policy,
            clamped: Cell::new(false),
        }
    }

    /// Gets a reference to the underlying intensity.
    pub fn intensity(&self) -> &I {
        &self.intensity
    }

    /// The horizon policy in effect.
    pub fn policy(&self) -> HorizonPolicy {
        self.policy
    }

    /// The arrival rate for a station and step, after applying the horizon policy.
    pub fn rate(&self, station: StationId, step: usize) -> Result<f64> {
        let step = match (self.policy, self.intensity.horizon(station)) {
            (HorizonPolicy::Clamp, Some(horizon)) if step >= horizon && horizon > 0 => {
                if !self.clamped.replace(true) {
                    warn!(
                        "Step {} is past the intensity horizon of {} steps, holding the last rate",
                        step, horizon
                    );
                }
                horizon - 1
            }
            _ => step,
        };
        let rate = self.intensity.rate_at(station, step)?;
        if !(rate.is_finite() && rate >= 0.0) {
            return Err(ConfigError::InvalidRate {
                station: station.to_string(),
                rate,
            }
            .into());
        }
        Ok(rate)
    }

    /// Samples the number of passengers arriving at `station` during `step`.
    pub fn sample<R: Rng + ?Sized>(&self, station: StationId, step: usize, rng: &mut R) -> Result<u64> {
        let rate = self.rate(station, step)?;
        Ok(Self::draw(rate, rng))
    }

    /// Draws one Poisson sample with mean `rate`, which must come from [rate](Self::rate).
    ///
    /// A zero rate yields zero without consuming any randomness.
    pub(crate) fn draw<R: Rng + ?Sized>(rate: f64, rng: &mut R) -> u64 {
        if rate == 0.0 {
            return 0;
        }
        match Poisson::new(rate) {
            Ok(distr) => distr.sample(rng) as u64,
            // Finite positive means are always accepted
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::intensity::IntensityCurve;
    use crate::line::Line;
    use crate::Error;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn curve(rate: f64) -> (Line, IntensityCurve) {
        let line = Line::new(["A", "B"]).unwrap();
        let curve = IntensityCurve::constant(&line, rate, 4).unwrap();
        (line, curve)
    }

    #[test]
    fn zero_rate_consumes_no_randomness() {
        let (line, curve) = curve(0.0);
        let sampler = ArrivalSampler::new(curve, HorizonPolicy::Fail);
        let a = line.station("A").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut reference = rng.clone();
        for step in 0..4 {
            assert_eq!(sampler.sample(a, step, &mut rng), Ok(0));
        }
        assert_eq!(rng.gen::<u64>(), reference.gen::<u64>());
    }

    #[test]
    fn sample_mean_tracks_rate() {
        let (line, curve) = curve(4.0);
        let sampler = ArrivalSampler::new(curve, HorizonPolicy::Fail);
        let b = line.station("B").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let n = 20_000;
        let total: u64 = (0..n).map(|_| sampler.sample(b, 2, &mut rng).unwrap()).sum();
        let mean = total as f64 / n as f64;
        assert!((mean - 4.0).abs() < 0.1, "mean was {}", mean);
    }

    #[test]
    fn fail_policy_propagates() {
        let (line, curve) = curve(1.0);
        let sampler = ArrivalSampler::new(curve, HorizonPolicy::Fail);
        let a = line.station("A").unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            sampler.sample(a, 4, &mut rng),
            Err(Error::OutOfRange { step: 4, horizon: 4, .. })
        ));
    }

    /// An intensity that reports a fixed, possibly invalid, rate.
    struct FixedRate(f64);

    impl Intensity for FixedRate {
        fn rate_at(&self, _station: StationId, _step: usize) -> Result<f64> {
            Ok(self.0)
        }

        fn horizon(&self, _station: StationId) -> Option<usize> {
            None
        }

        fn covers(&self, _station: StationId) -> bool {
            true
        }
    }

    #[test]
    fn invalid_rates_are_rejected() {
        let a = StationId(0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for rate in [-3.0, f64::NAN, f64::INFINITY] {
            let sampler = ArrivalSampler::new(FixedRate(rate), HorizonPolicy::Fail);
            assert!(matches!(
                sampler.sample(a, 0, &mut rng),
                Err(Error::Configuration(ConfigError::InvalidRate { .. }))
            ));
        }
        let sampler = ArrivalSampler::new(FixedRate(0.0), HorizonPolicy::Fail);
        assert_eq!(sampler.sample(a, 0, &mut rng), Ok(0));
    }

    #[test]
    fn clamp_policy_holds_last_rate() {
        let line = Line::new(["A", "B"]).unwrap();
        let mut data = crate::Ridership::new();
        data.insert("A", vec![3, 9]);
        data.insert("B", vec![1]);
        let curve = IntensityCurve::build(&data, &line, 15, 15).unwrap();
        let sampler = ArrivalSampler::new(curve, HorizonPolicy::Clamp);
        let a = line.station("A").unwrap();
        assert_eq!(sampler.rate(a, 0), Ok(3.0));
        assert_eq!(sampler.rate(a, 1), Ok(9.0));
        assert_eq!(sampler.rate(a, 50), Ok(9.0));
    }
}

//! The step-driven simulation engine.

use crate::config::SimulationConfig;
use crate::error::{ConfigError, Error, Result};
use crate::intensity::{Intensity, IntensityCurve};
use crate::line::{Line, StationId};
use crate::passenger::{Passenger, PassengerId};
use crate::ridership::Ridership;
use crate::sampler::ArrivalSampler;
use crate::snapshot::{occupancy, StateCounts, StationCount, StepSnapshot};
use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A passenger flow simulation of a single subway line.
///
/// Each call to [step](Self::step) generates new passengers at every station,
/// advances every passenger's trip, counts the passengers at each station,
/// retires passengers that have lingered at their destination, and records a
/// [StepSnapshot].
///
/// Randomness is drawn from a single seeded generator in a fixed order:
/// stations in line order, and for each station one arrival draw followed by
/// one destination draw per new passenger.
#[derive(Clone, Debug)]
pub struct Simulation<I = IntensityCurve> {
    /// The stations of the line.
    line: Line,
    /// Samples passenger arrivals.
    sampler: ArrivalSampler<I>,
    /// The random number generator.
    rng: ChaCha8Rng,
    /// The live passengers, ordered by ID.
    passengers: Vec<Passenger>,
    /// The per-station counts from the latest step.
    occupancy: Vec<StationCount>,
    /// One snapshot per completed step.
    history: Vec<StepSnapshot>,
    /// The current step.
    step: usize,
    /// The ID of the next passenger.
    next_id: u64,
    /// Steps a passenger remains at its destination.
    grace: usize,
}

impl Simulation<IntensityCurve> {
    /// Creates a simulation driven by historical ridership, resampled to the
    /// step length given in `config`.
    pub fn from_ridership(line: Line, data: &Ridership, config: &SimulationConfig) -> Result<Self> {
        let curve = IntensityCurve::build(
            data,
            &line,
            config.source_interval,
            config.target_interval,
        )?;
        Self::new(line, curve, config)
    }
}

impl<I: Intensity> Simulation<I> {
    /// Creates a new simulation.
    ///
    /// Fails if `intensity` has no rates for one of the stations on `line`.
    pub fn new(line: Line, intensity: I, config: &SimulationConfig) -> Result<Self> {
        if let Some((_, name)) = line.iter().find(|(station, _)| !intensity.covers(*station)) {
            return Err(ConfigError::MissingStationData(name.to_owned()).into());
        }
        info!(
            "Creating simulation: {} stations, seed {}, grace {}, starting at step {}",
            line.len(),
            config.seed,
            config.grace,
            config.start_step
        );
        Ok(Self {
            occupancy: vec![StationCount::default(); line.len()],
            line,
            sampler: ArrivalSampler::new(intensity, config.horizon_policy),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            passengers: vec![],
            history: vec![],
            step: config.start_step,
            next_id: 0,
            grace: config.grace,
        })
    }

    /// Advances the simulation by one step.
    ///
    /// If the arrival rates for the step cannot be determined the error is
    /// returned and the simulation is left untouched.
    pub fn step(&mut self) -> Result<()> {
        let rates = self.arrival_rates()?;
        let created = self.generate_passengers(&rates);
        self.advance_passengers();
        self.step += 1;
        self.occupancy = occupancy(self.line.len(), &self.passengers);
        let retired = self.retire_passengers();
        self.record_snapshot();
        debug!(
            "Step {}: {} created, {} retired, {} live",
            self.step,
            created,
            retired,
            self.passengers.len()
        );
        Ok(())
    }

    /// Advances the simulation by `steps` steps, stopping at the first error.
    pub fn run(&mut self, steps: usize) -> Result<()> {
        for _ in 0..steps {
            self.step()?;
        }
        Ok(())
    }

    /// Adds a passenger waiting at `origin` who will travel to `destination`.
    pub fn create_passenger(
        &mut self,
        origin: StationId,
        destination: StationId,
    ) -> Result<PassengerId> {
        for station in [origin, destination] {
            if station.index() >= self.line.len() {
                return Err(Error::UnknownStation(station.to_string()));
            }
        }
        if origin == destination {
            return Err(Error::InvalidRoute {
                station: self.line.name(origin).to_owned(),
            });
        }
        Ok(self.spawn(origin, destination))
    }

    /// Gets the current step number: the number of the last completed step,
    /// and the intensity index used by the next one.
    pub fn current_step(&self) -> usize {
        self.step
    }

    /// Gets a reference to the line.
    pub fn line(&self) -> &Line {
        &self.line
    }

    /// Gets a reference to the arrival sampler.
    pub fn sampler(&self) -> &ArrivalSampler<I> {
        &self.sampler
    }

    /// Returns an iterator over the live passengers, in creation order.
    pub fn iter_passengers(&self) -> impl Iterator<Item = &Passenger> {
        self.passengers.iter()
    }

    /// Gets a reference to a live passenger, or `None` if it has been retired.
    pub fn get_passenger(&self, id: PassengerId) -> Option<&Passenger> {
        self.passengers
            .binary_search_by_key(&id, Passenger::id)
            .ok()
            .map(|idx| &self.passengers[idx])
    }

    /// The number of live passengers.
    pub fn population(&self) -> usize {
        self.passengers.len()
    }

    /// The number of live passengers in each state.
    pub fn count_by_state(&self) -> StateCounts {
        StateCounts::tally(&self.passengers)
    }

    /// The per-station counts from the latest step, in line order.
    pub fn occupancy(&self) -> &[StationCount] {
        &self.occupancy
    }

    /// The count from the latest step at the named station.
    pub fn station_count(&self, name: &str) -> Result<StationCount> {
        let station = self.line.station(name)?;
        Ok(self.occupancy[station.index()])
    }

    /// The snapshots of all completed steps, oldest first.
    pub fn snapshot_history(&self) -> &[StepSnapshot] {
        &self.history
    }

    /// The latest snapshot together with the live population.
    pub fn current_state(&self) -> CurrentState<'_> {
        CurrentState {
            step: self.step,
            snapshot: self.history.last(),
            population: self.passengers.len(),
        }
    }

    /// Looks up the arrival rate of every station for the current step.
    fn arrival_rates(&self) -> Result<Vec<f64>> {
        self.line
            .iter()
            .map(|(station, name)| {
                self.sampler
                    .rate(station, self.step)
                    .map_err(|err| match err {
                        Error::Configuration(ConfigError::InvalidRate { rate, .. }) => {
                            ConfigError::InvalidRate {
                                station: name.to_owned(),
                                rate,
                            }
                            .into()
                        }
                        err => err,
                    })
            })
            .collect()
    }

    /// Creates the passengers arriving at each station this step.
    /// Returns the number created.
    fn generate_passengers(&mut self, rates: &[f64]) -> u64 {
        let mut created = 0;
        for (idx, &rate) in rates.iter().enumerate() {
            let origin = StationId(idx);
            let count = ArrivalSampler::<I>::draw(rate, &mut self.rng);
            for _ in 0..count {
                let destination = self.choose_destination(origin);
                self.spawn(origin, destination);
            }
            created += count;
        }
        created
    }

    /// Picks a destination uniformly among the stations other than `origin`.
    fn choose_destination(&mut self, origin: StationId) -> StationId {
        let idx = self.rng.gen_range(0..self.line.len() - 1);
        if idx >= origin.index() {
            StationId(idx + 1)
        } else {
            StationId(idx)
        }
    }

    /// Adds a passenger with a validated route.
    fn spawn(&mut self, origin: StationId, destination: StationId) -> PassengerId {
        let id = PassengerId(self.next_id);
        self.next_id += 1;
        let distance = self.line.distance(origin, destination);
        trace!(
            "{} created at step {}: {} -> {}",
            id,
            self.step,
            self.line.name(origin),
            self.line.name(destination)
        );
        self.passengers
            .push(Passenger::new(id, origin, destination, distance, self.step));
        id
    }

    /// Advances every passenger's trip by one step.
    fn advance_passengers(&mut self) {
        for passenger in &mut self.passengers {
            passenger.advance();
        }
    }

    /// Removes passengers that have stayed at their destination past the grace window.
    /// Returns the number removed.
    fn retire_passengers(&mut self) -> usize {
        let (now, grace) = (self.step, self.grace);
        let before = self.passengers.len();
        self.passengers
            .retain(|passenger| !passenger.is_finished(now, grace));
        before - self.passengers.len()
    }

    /// Appends a snapshot of the completed step to the history.
    fn record_snapshot(&mut self) {
        let snapshot = StepSnapshot::new(
            self.step,
            self.occupancy.clone(),
            self.passengers.len(),
            StateCounts::tally(&self.passengers),
        );
        self.history.push(snapshot);
    }
}

/// The state of a simulation after its latest step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurrentState<'a> {
    /// The current step number.
    pub step: usize,
    /// The snapshot of the latest step, if any step has run.
    pub snapshot: Option<&'a StepSnapshot>,
    /// The number of live passengers.
    pub population: usize,
}

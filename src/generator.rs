//! Poisson spike train sampling.
//!
//! Time is discretized into bins of [`TIME_STEP`] seconds. In every trial, each bin consumes exactly one
//! uniform sample in [0, 1) and fires if the sample is below `firing_rate * TIME_STEP`.
//! For a fixed random number generator state, the output is therefore fully determined.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Uniform};
use std::str::FromStr;

use crate::error::SpikeError;
use crate::params::SimulationParameters;
use crate::spike_train::{SpikeTrain, SpikeTrainSet};
use crate::TIME_STEP;

/// How a firing bin is mapped to a firing time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum BinTiming {
    /// A spike in bin `j` occurs at `j * TIME_STEP`, i.e., at the onset of the bin.
    #[default]
    Onset,
    /// A spike in bin `j` is reported one bin earlier, at `(j - 1) * TIME_STEP`, and a spike in bin 0 at time 0.
    /// This matches the time indexing of the classic notebook version of the simulation, where the spikes of
    /// the first two bins collapse onto time 0.
    Lagged,
}

impl BinTiming {
    /// Returns the firing time associated with a spike in the given bin.
    pub fn firing_time(&self, bin: usize) -> f64 {
        match self {
            BinTiming::Onset => bin as f64 * TIME_STEP,
            BinTiming::Lagged => bin.saturating_sub(1) as f64 * TIME_STEP,
        }
    }
}

impl FromStr for BinTiming {
    type Err = SpikeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "onset" => Ok(BinTiming::Onset),
            "lagged" => Ok(BinTiming::Lagged),
            _ => Err(SpikeError::InvalidParameter(format!(
                "Invalid bin timing: {} (must be one of: onset, lagged)",
                s
            ))),
        }
    }
}

/// Samples spike trains from a discrete-time Poisson process.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SpikeGenerator {
    timing: BinTiming,
}

impl SpikeGenerator {
    pub fn new(timing: BinTiming) -> Self {
        SpikeGenerator { timing }
    }

    /// Returns how firing bins are mapped to firing times.
    pub fn timing(&self) -> BinTiming {
        self.timing
    }

    /// Samples one spike train per trial.
    ///
    /// # Parameters
    /// - `params`: The firing rate, the duration and the number of trials.
    /// - `rng`: A mutable reference to a random number generator implementing the `Rng` trait.
    ///   One uniform sample is drawn per trial and per bin, trial after trial.
    ///
    /// # Returns
    /// A set of spike trains indexed by trial, each with its firing times in increasing order.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        params: &SimulationParameters,
        rng: &mut R,
    ) -> SpikeTrainSet {
        let num_bins = params.num_bins();
        let p_spike = params.spike_probability();
        let uniform = Uniform::new(0.0, 1.0);

        log::debug!(
            "Sampling {} trials of {} bins with spike probability {} per bin ({:?} timing)",
            params.num_trials(),
            num_bins,
            p_spike,
            self.timing
        );

        let mut spike_trains = Vec::with_capacity(params.num_trials());
        for trial_id in 0..params.num_trials() {
            let mut firing_times = vec![];
            for bin in 0..num_bins {
                if uniform.sample(rng) < p_spike {
                    firing_times.push(self.timing.firing_time(bin));
                }
            }
            spike_trains.push(SpikeTrain::from_sorted(trial_id, firing_times));
        }

        let spike_trains = SpikeTrainSet::from_parts(spike_trains, params.duration());
        log::trace!(
            "{} spikes sampled over {} trials (expected number of spikes per trial is {})",
            spike_trains.num_spikes(),
            spike_trains.num_trials(),
            p_spike.min(1.0) * num_bins as f64
        );

        spike_trains
    }
}

/// Returns random spike trains with a given firing rate (in Hz), duration (in seconds) and number of trials.
/// The spikes are sampled with onset timing from a generator seeded with `seed`.
pub fn rand_poisson(
    firing_rate: f64,
    duration: f64,
    num_trials: usize,
    seed: u64,
) -> Result<SpikeTrainSet, SpikeError> {
    let params = SimulationParameters::build(firing_rate, duration, num_trials)?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(SpikeGenerator::default().generate(&params, &mut rng))
}

//! Parameters of a spike train simulation.
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::SpikeError;
use crate::TIME_STEP;

/// The parameters of a Poisson spike train simulation.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct SimulationParameters {
    /// The firing rate of the neuron, in spikes per second.
    firing_rate: f64,
    /// The duration of a trial, in seconds.
    duration: f64,
    /// The number of independent trials.
    num_trials: usize,
}

impl SimulationParameters {
    /// Create simulation parameters with the specified values.
    /// The function returns an error for a negative (or non-finite) firing rate,
    /// a non-positive (or non-finite) duration, a duration shorter than half a bin, or zero trials.
    pub fn build(firing_rate: f64, duration: f64, num_trials: usize) -> Result<Self, SpikeError> {
        if !firing_rate.is_finite() || firing_rate < 0.0 {
            return Err(SpikeError::InvalidParameter(
                "Invalid firing rate value: must be finite and non-negative".to_string(),
            ));
        }

        if !duration.is_finite() || duration <= 0.0 {
            return Err(SpikeError::InvalidParameter(
                "Invalid duration value: must be finite and positive".to_string(),
            ));
        }

        if (duration / TIME_STEP).round() < 1.0 {
            return Err(SpikeError::InvalidParameter(format!(
                "Invalid duration value: {} is too short for a time step of {}",
                duration, TIME_STEP
            )));
        }

        if num_trials == 0 {
            return Err(SpikeError::InvalidParameter(
                "Invalid number of trials: must be at least one".to_string(),
            ));
        }

        Ok(SimulationParameters {
            firing_rate,
            duration,
            num_trials,
        })
    }

    /// Returns the firing rate, in spikes per second.
    pub fn firing_rate(&self) -> f64 {
        self.firing_rate
    }

    /// Returns the duration of a trial, in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Returns the number of trials.
    pub fn num_trials(&self) -> usize {
        self.num_trials
    }

    /// Returns the number of bins per trial, i.e., the duration divided by the time step and rounded to the nearest integer.
    pub fn num_bins(&self) -> usize {
        (self.duration / TIME_STEP).round() as usize
    }

    /// Returns the probability for a bin to contain a spike.
    /// Rates above `1 / TIME_STEP` saturate, i.e., every bin fires.
    pub fn spike_probability(&self) -> f64 {
        self.firing_rate * TIME_STEP
    }

    /// Save the parameters to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SpikeError> {
        let file = File::create(path).map_err(|e| SpikeError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| SpikeError::IOError(e.to_string()))?;
        writer.flush().map_err(|e| SpikeError::IOError(e.to_string()))
    }

    /// Load parameters from a JSON file.
    /// The loaded values go through the same checks as [`SimulationParameters::build`].
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SpikeError> {
        let file = File::open(path).map_err(|e| SpikeError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        let params: SimulationParameters =
            serde_json::from_reader(reader).map_err(|e| SpikeError::IOError(e.to_string()))?;
        SimulationParameters::build(params.firing_rate, params.duration, params.num_trials)
    }
}

//! Module implementing the concept of a spike train, i.e., the firing times of a neuron over one trial.
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::SpikeError;
use crate::TIME_STEP;

/// Represents the spike train produced during a specific trial.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SpikeTrain {
    trial_id: usize,
    firing_times: Vec<f64>,
}

impl SpikeTrain {
    /// Create a spike train with the specified parameters.
    /// The function returns an error if a firing time is not finite, lies outside of [0, duration),
    /// or if the firing times are not sorted.
    pub fn build(trial_id: usize, firing_times: &[f64], duration: f64) -> Result<Self, SpikeError> {
        if let Some(t) = firing_times
            .iter()
            .find(|t| !t.is_finite() || **t < 0.0 || **t >= duration)
        {
            return Err(SpikeError::InvalidFiringTimes(format!(
                "{} is not in the simulation window [0, {})",
                t, duration
            )));
        }

        if let Some((t1, t2)) = firing_times.iter().tuple_windows().find(|(t1, t2)| t2 < t1) {
            return Err(SpikeError::InvalidFiringTimes(format!(
                "{} comes after {}",
                t2, t1
            )));
        }

        Ok(SpikeTrain {
            trial_id,
            firing_times: firing_times.to_vec(),
        })
    }

    /// Wrap firing times which are known to be sorted and within the simulation window.
    pub(crate) fn from_sorted(trial_id: usize, firing_times: Vec<f64>) -> Self {
        SpikeTrain {
            trial_id,
            firing_times,
        }
    }

    /// Returns the index of the trial that produced the spike train.
    pub fn trial_id(&self) -> usize {
        self.trial_id
    }

    /// Returns the firing times of the spike train.
    pub fn firing_times(&self) -> &[f64] {
        &self.firing_times[..]
    }

    pub fn num_spikes(&self) -> usize {
        self.firing_times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.firing_times.is_empty()
    }

    /// Returns the time elapsed between consecutive spikes.
    pub fn inter_spike_intervals(&self) -> Vec<f64> {
        self.firing_times
            .iter()
            .tuple_windows()
            .map(|(t1, t2)| t2 - t1)
            .collect()
    }
}

/// A collection of spike trains, one per trial, sampled over a common simulation window.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct SpikeTrainSet {
    duration: f64,
    spike_trains: Vec<SpikeTrain>,
}

impl SpikeTrainSet {
    /// Create a set of spike trains over a simulation window of the given duration.
    /// The spike trains must be non-empty in number, indexed by consecutive trials starting from 0,
    /// and have all their firing times in [0, duration).
    pub fn build(spike_trains: Vec<SpikeTrain>, duration: f64) -> Result<Self, SpikeError> {
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

        if spike_trains.is_empty() {
            return Err(SpikeError::InvalidParameter(
                "Invalid number of trials: must be at least one".to_string(),
            ));
        }

        if let Some((i, spike_train)) = spike_trains
            .iter()
            .enumerate()
            .find(|(i, spike_train)| spike_train.trial_id != *i)
        {
            return Err(SpikeError::InvalidParameter(format!(
                "Spike train at position {} belongs to trial {}",
                i, spike_train.trial_id
            )));
        }

        for spike_train in spike_trains.iter() {
            SpikeTrain::build(spike_train.trial_id, &spike_train.firing_times, duration)?;
        }

        Ok(SpikeTrainSet {
            duration,
            spike_trains,
        })
    }

    pub(crate) fn from_parts(spike_trains: Vec<SpikeTrain>, duration: f64) -> Self {
        SpikeTrainSet {
            duration,
            spike_trains,
        }
    }

    /// Returns the duration of a trial, in seconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Returns the width of a simulation bin, in seconds.
    pub fn time_step(&self) -> f64 {
        TIME_STEP
    }

    /// Returns the number of simulation bins per trial.
    pub fn num_bins(&self) -> usize {
        (self.duration / TIME_STEP).round() as usize
    }

    pub fn num_trials(&self) -> usize {
        self.spike_trains.len()
    }

    pub fn spike_trains(&self) -> &[SpikeTrain] {
        &self.spike_trains[..]
    }

    /// Returns the spike train of the specified trial, if any.
    pub fn get(&self, trial_id: usize) -> Option<&SpikeTrain> {
        self.spike_trains.get(trial_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpikeTrain> + '_ {
        self.spike_trains.iter()
    }

    /// Consumes the set and returns the firing times of every trial.
    pub fn into_firing_times(self) -> Vec<Vec<f64>> {
        self.spike_trains
            .into_iter()
            .map(|spike_train| spike_train.firing_times)
            .collect()
    }

    /// Returns the total number of spikes over all trials.
    pub fn num_spikes(&self) -> usize {
        self.spike_trains.iter().map(|spike_train| spike_train.num_spikes()).sum()
    }

    /// Returns the number of spikes of every trial.
    pub fn spike_counts(&self) -> Vec<usize> {
        self.spike_trains.iter().map(|spike_train| spike_train.num_spikes()).collect()
    }

    /// Returns the empirical firing rate, i.e., the total number of spikes per trial and per second.
    pub fn empirical_rate(&self) -> f64 {
        self.num_spikes() as f64 / (self.num_trials() as f64 * self.duration)
    }

    /// Returns the Fano factor of the spike counts across trials, i.e., their (unbiased) variance over their mean.
    /// It is undefined with a single trial or when no spike occurred.
    pub fn fano_factor(&self) -> Option<f64> {
        let n = self.num_trials();
        if n < 2 {
            return None;
        }

        let counts = self.spike_counts();
        let mean = counts.iter().sum::<usize>() as f64 / n as f64;
        if mean <= 0.0 {
            return None;
        }

        let variance = counts
            .iter()
            .map(|c| (*c as f64 - mean).powi(2))
            .sum::<f64>()
            / (n - 1) as f64;

        Some(variance / mean)
    }

    /// Returns the peri-stimulus time histogram, i.e., the trial-averaged firing rate (in Hz) in consecutive
    /// windows of `bin_width` seconds. The window width is rounded to a whole number of simulation bins and
    /// the last window is truncated at the end of the trial.
    pub fn psth(&self, bin_width: f64) -> Result<Vec<f64>, SpikeError> {
        if !bin_width.is_finite() || bin_width <= 0.0 {
            return Err(SpikeError::InvalidParameter(
                "Invalid bin width: must be finite and positive".to_string(),
            ));
        }

        let bins_per_window = (bin_width / TIME_STEP).round() as usize;
        if bins_per_window == 0 {
            return Err(SpikeError::InvalidParameter(format!(
                "Invalid bin width: {} is shorter than half a time step of {}",
                bin_width, TIME_STEP
            )));
        }

        let num_bins = self.num_bins();
        let num_windows = num_bins.div_ceil(bins_per_window);
        let mut counts = vec![0_usize; num_windows];
        for (_, t) in self.raster_points() {
            let bin = ((t / TIME_STEP).round() as usize).min(num_bins - 1);
            counts[bin / bins_per_window] += 1;
        }

        let num_trials = self.num_trials() as f64;
        Ok(counts
            .into_iter()
            .enumerate()
            .map(|(k, count)| {
                let window_bins = bins_per_window.min(num_bins - k * bins_per_window);
                count as f64 / (num_trials * window_bins as f64 * TIME_STEP)
            })
            .collect())
    }

    /// Returns one (trial, time) pair per spike, trial after trial.
    pub fn raster_points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.spike_trains.iter().flat_map(|spike_train| {
            spike_train
                .firing_times
                .iter()
                .map(move |t| (spike_train.trial_id, *t))
        })
    }

    /// Save the spike trains to a JSON file.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> Result<(), SpikeError> {
        let file = File::create(path).map_err(|e| SpikeError::IOError(e.to_string()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|e| SpikeError::IOError(e.to_string()))?;
        writer.flush().map_err(|e| SpikeError::IOError(e.to_string()))
    }

    /// Load spike trains from a JSON file.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, SpikeError> {
        let file = File::open(path).map_err(|e| SpikeError::IOError(e.to_string()))?;
        let reader = BufReader::new(file);
        let spike_trains: SpikeTrainSet =
            serde_json::from_reader(reader).map_err(|e| SpikeError::IOError(e.to_string()))?;
        SpikeTrainSet::build(spike_trains.spike_trains, spike_trains.duration)
    }
}

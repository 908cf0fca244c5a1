//! This crate provides tools for simulating neural spike trains in Rust.
//!
//! Spikes are sampled with a discrete-time approximation of a homogeneous Poisson process:
//! time is cut into bins of [`TIME_STEP`] seconds and, in every trial, each bin fires
//! independently with probability `firing_rate * TIME_STEP`.
//!
//! # Sampling Spike Trains
//!
//! ## From a Seed
//!
//! ```rust
//! use rusty_spikes::generator::rand_poisson;
//!
//! // Sample 10 trials of 2 seconds at 30 Hz
//! let spike_trains = rand_poisson(30.0, 2.0, 10, 42).unwrap();
//!
//! assert_eq!(spike_trains.num_trials(), 10);
//! assert_eq!(spike_trains.num_bins(), 2000);
//! assert!(spike_trains
//!     .iter()
//!     .all(|spike_train| spike_train.firing_times().iter().all(|t| *t >= 0.0 && *t < 2.0)));
//! ```
//!
//! ## From a Random Number Generator
//!
//! ```rust
//! use rusty_spikes::generator::{BinTiming, SpikeGenerator};
//! use rusty_spikes::params::SimulationParameters;
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let params = SimulationParameters::build(0.0, 1.0, 3).unwrap();
//! let generator = SpikeGenerator::new(BinTiming::Onset);
//!
//! // A silent neuron never fires
//! let mut rng = StdRng::seed_from_u64(42);
//! let spike_trains = generator.generate(&params, &mut rng);
//! assert_eq!(spike_trains.into_firing_times(), vec![Vec::<f64>::new(); 3]);
//! ```
//!
//! # Analyzing Spike Trains
//!
//! ```rust
//! use rusty_spikes::generator::rand_poisson;
//!
//! let spike_trains = rand_poisson(20.0, 5.0, 50, 7).unwrap();
//!
//! // The empirical firing rate is close to the nominal one
//! assert!((spike_trains.empirical_rate() - 20.0).abs() < 4.0);
//!
//! // One (trial, time) pair per spike, ready to be drawn as a raster plot
//! assert_eq!(spike_trains.raster_points().count(), spike_trains.num_spikes());
//! ```

pub mod error;
pub mod generator;
pub mod params;
pub mod spike_train;

/// The width of a simulation bin, in seconds.
pub const TIME_STEP: f64 = 1e-3;

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::tempdir;

use rusty_spikes::generator::{rand_poisson, BinTiming, SpikeGenerator};
use rusty_spikes::params::SimulationParameters;
use rusty_spikes::spike_train::SpikeTrainSet;

const SEED: u64 = 42;

#[test]
fn test_generate_from_saved_params() {
    let dir = tempdir().unwrap();
    let params_path = dir.path().join("params.json");
    let spike_trains_path = dir.path().join("spike_trains.json");

    SimulationParameters::build(40.0, 1.5, 12)
        .unwrap()
        .save_to(&params_path)
        .unwrap();
    let params = SimulationParameters::load_from(&params_path).unwrap();

    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let spike_trains = SpikeGenerator::new(BinTiming::Lagged).generate(&params, &mut rng);
    assert_eq!(spike_trains.num_trials(), 12);
    assert_eq!(spike_trains.num_bins(), 1500);
    assert_eq!(spike_trains.duration(), 1.5);

    spike_trains.save_to(&spike_trains_path).unwrap();
    assert_eq!(
        SpikeTrainSet::load_from(&spike_trains_path).unwrap(),
        spike_trains
    );
}

#[test]
fn test_generate_with_any_rng() {
    let params = SimulationParameters::build(25.0, 2.0, 8).unwrap();
    let generator = SpikeGenerator::default();

    // The same stream gives the same spike trains, whether the generator is used directly or as a trait object
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let spike_trains = generator.generate(&params, &mut rng);

    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let dyn_rng: &mut dyn RngCore = &mut rng;
    assert_eq!(generator.generate(&params, dyn_rng), spike_trains);

    // Consecutive calls continue the stream
    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let first = generator.generate(&params, &mut rng);
    let second = generator.generate(&params, &mut rng);
    assert_eq!(first, spike_trains);
    assert_ne!(first, second);
}

#[test]
fn test_one_draw_per_bin() {
    // Splitting the trials over two calls on the same stream gives the same spike trains as a single call
    let all_trials = SimulationParameters::build(60.0, 0.8, 6).unwrap();
    let half_trials = SimulationParameters::build(60.0, 0.8, 3).unwrap();
    let generator = SpikeGenerator::default();

    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let expected = generator.generate(&all_trials, &mut rng).into_firing_times();

    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let mut firing_times = generator.generate(&half_trials, &mut rng).into_firing_times();
    firing_times.extend(generator.generate(&half_trials, &mut rng).into_firing_times());

    assert_eq!(firing_times, expected);
}

#[test]
fn test_raster_points_match_spike_trains() {
    let spike_trains = rand_poisson(15.0, 4.0, 30, SEED).unwrap();

    let points: Vec<(usize, f64)> = spike_trains.raster_points().collect();
    assert_eq!(points.len(), spike_trains.num_spikes());
    assert!(points
        .windows(2)
        .all(|w| w[0].0 < w[1].0 || (w[0].0 == w[1].0 && w[0].1 < w[1].1)));
    assert!(points
        .iter()
        .all(|(trial_id, t)| spike_trains.get(*trial_id).unwrap().firing_times().contains(t)));
}

#[test]
fn test_psth_is_flat_for_homogeneous_process() {
    let spike_trains = rand_poisson(50.0, 2.0, 400, SEED).unwrap();

    let psth = spike_trains.psth(0.5).unwrap();
    assert_eq!(psth.len(), 4);
    assert!(psth.iter().all(|rate| (rate - 50.0).abs() < 5.0));
}

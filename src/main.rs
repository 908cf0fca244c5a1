use clap::Parser;
use log::LevelFilter;
use log4rs::append::file::FileAppender;
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use rand::rngs::StdRng;
use rand::SeedableRng;
use sha2::{Digest, Sha256};
use std::path::PathBuf;

use rusty_spikes::error::SpikeError;
use rusty_spikes::generator::{BinTiming, SpikeGenerator};
use rusty_spikes::params::SimulationParameters;

#[derive(Parser, Debug)]
struct Args {
    /// The seed used for spike train sampling
    #[arg(long)]
    seed: u64,
    /// The firing rate (in Hz)
    #[arg(short = 'r', long, default_value = "30.0")]
    firing_rate: f64,
    /// The duration of a trial (in seconds)
    #[arg(short = 'T', long, default_value = "1.0")]
    duration: f64,
    /// The number of trials
    #[arg(short = 'N', long, default_value = "20")]
    num_trials: usize,
    /// A JSON file with the simulation parameters, overriding the three options above
    #[arg(long)]
    params: Option<PathBuf>,
    /// How firing bins are mapped to firing times, must be one of: onset, lagged
    #[arg(long, default_value = "onset")]
    timing: BinTiming,
    /// The window width (in seconds) of the logged peri-stimulus time histogram
    #[arg(long, default_value = "0.1")]
    psth_width: f64,
    /// The directory where logs and spike trains are written
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,
    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,
}

/// Returns the simulation parameters from the JSON file if one is given, from the scalar options otherwise.
fn resolve_params(args: &Args) -> Result<SimulationParameters, SpikeError> {
    match &args.params {
        Some(path) => SimulationParameters::load_from(path),
        None => SimulationParameters::build(args.firing_rate, args.duration, args.num_trials),
    }
}

fn main() -> Result<(), SpikeError> {
    let args = Args::parse();

    let mut hasher = Sha256::new();
    hasher.update(format!("{:?}", args));
    let hash = hasher.finalize();
    let log_path = args.out_dir.join("log").join(format!("{:x}.log", hash));
    let params_path = args.out_dir.join(format!("{:x}_params.json", hash));
    let spike_trains_path = args.out_dir.join(format!("{:x}.json", hash));

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let logfile = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new("{d} {l} - {m}\n")))
        .build(log_path)
        .map_err(|e| SpikeError::IOError(e.to_string()))?;

    let config = Config::builder()
        .appender(Appender::builder().build("logfile", Box::new(logfile)))
        .build(Root::builder().appender("logfile").build(level))
        .map_err(|e| SpikeError::IOError(e.to_string()))?;

    log4rs::init_config(config).map_err(|e| SpikeError::IOError(e.to_string()))?;

    log::info!("{:?}", args);

    let params = resolve_params(&args)?;
    log::info!("Simulation parameters: {:?}", params);

    let mut rng = StdRng::seed_from_u64(args.seed);
    let generator = SpikeGenerator::new(args.timing);
    let spike_trains = generator.generate(&params, &mut rng);
    log::info!(
        "Spike train sampling: done! {} spikes over {} trials of {} bins ({:?} timing)",
        spike_trains.num_spikes(),
        spike_trains.num_trials(),
        spike_trains.num_bins(),
        generator.timing()
    );

    log::info!(
        "Empirical firing rate is {:.3} Hz (nominal is {:.3} Hz)",
        spike_trains.empirical_rate(),
        params.firing_rate()
    );
    match spike_trains.fano_factor() {
        Some(fano_factor) => log::info!("Fano factor of the spike counts is {:.3}", fano_factor),
        None => log::info!("Fano factor of the spike counts is undefined"),
    }
    for (k, rate) in spike_trains.psth(args.psth_width)?.iter().enumerate() {
        log::debug!(
            "PSTH window {} (from {:.3} s): {:.3} Hz",
            k,
            k as f64 * args.psth_width,
            rate
        );
    }

    params.save_to(&params_path)?;
    spike_trains.save_to(&spike_trains_path)?;
    log::info!(
        "Saving: done! Saved to {} and {}",
        params_path.display(),
        spike_trains_path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["rusty_spikes", "--seed", "42"]).unwrap();
        assert_eq!(args.timing, BinTiming::Onset);
        assert_eq!(
            resolve_params(&args).unwrap(),
            SimulationParameters::build(30.0, 1.0, 20).unwrap()
        );

        // The seed is mandatory
        assert!(Args::try_parse_from(["rusty_spikes"]).is_err());
    }

    #[test]
    fn test_args_scalar_options() {
        let args = Args::try_parse_from([
            "rusty_spikes", "--seed", "1", "-r", "12.5", "-T", "2.0", "-N", "4", "--timing", "lagged",
        ])
        .unwrap();
        assert_eq!(args.timing, BinTiming::Lagged);
        assert_eq!(
            resolve_params(&args).unwrap(),
            SimulationParameters::build(12.5, 2.0, 4).unwrap()
        );

        // Invalid values are reported, not sampled
        let args = Args::try_parse_from(["rusty_spikes", "--seed", "1", "-N", "0"]).unwrap();
        assert!(matches!(
            resolve_params(&args),
            Err(SpikeError::InvalidParameter(_))
        ));

        assert!(Args::try_parse_from(["rusty_spikes", "--seed", "1", "--timing", "late"]).is_err());
    }

    #[test]
    fn test_args_params_file_overrides_scalar_options() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("params.json");
        SimulationParameters::build(5.0, 0.5, 3).unwrap().save_to(&path).unwrap();

        let args = Args::try_parse_from([
            "rusty_spikes",
            "--seed",
            "7",
            "-r",
            "100",
            "--params",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert_eq!(
            resolve_params(&args).unwrap(),
            SimulationParameters::build(5.0, 0.5, 3).unwrap()
        );

        // A missing file is an I/O error
        let missing = dir.path().join("missing.json");
        let args = Args::try_parse_from([
            "rusty_spikes",
            "--seed",
            "7",
            "--params",
            missing.to_str().unwrap(),
        ])
        .unwrap();
        assert!(matches!(resolve_params(&args), Err(SpikeError::IOError(_))));
    }
}

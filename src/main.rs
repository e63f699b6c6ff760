use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use gpx_tcx_rs::config::RawConfig;
use gpx_tcx_rs::pipeline::convert;
use rayon::prelude::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert GPX traces into TCX activities with synthesized telemetry", long_about = None)]
struct Cli {
    /// GPX files to convert
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output TCX path (single input only; defaults to the input with a .tcx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// JSON file with conversion settings; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Resting heart rate used at low speed (bpm)
    #[arg(long)]
    base_hr: Option<f64>,

    /// Upper heart rate target (bpm)
    #[arg(long)]
    max_hr: Option<f64>,

    /// Heart rate response to speed
    #[arg(long)]
    hr_gain: Option<f64>,

    /// Cadence at walking speed (spm)
    #[arg(long)]
    base_cadence: Option<f64>,

    /// Cadence at full speed (spm)
    #[arg(long)]
    max_cadence: Option<f64>,

    /// Lower power bound (W)
    #[arg(long)]
    min_power: Option<f64>,

    /// Upper power bound (W)
    #[arg(long)]
    max_power: Option<f64>,

    /// Power response to speed and heart rate
    #[arg(long)]
    power_gain: Option<f64>,

    /// Speed below which the athlete is treated as stationary (m/s)
    #[arg(long)]
    speed_threshold: Option<f64>,

    /// Activity start, e.g. 2024-12-25T08:30:00Z or "2024-12-25 08:30:00"
    #[arg(long)]
    start_time: Option<String>,

    /// Running, Biking or Other
    #[arg(long)]
    activity_type: Option<String>,

    /// Device name written to the Creator block
    #[arg(long)]
    device_name: Option<String>,

    /// Device firmware version, "major.minor"
    #[arg(long)]
    device_version: Option<String>,

    #[arg(long)]
    calories_per_km: Option<f64>,

    /// Target pace per km, "m:ss" or minutes
    #[arg(long)]
    target_pace: Option<String>,

    /// Seed for the telemetry noise generator
    #[arg(long)]
    seed: Option<u64>,
}

impl Cli {
    fn overrides(&self) -> RawConfig {
        RawConfig {
            base_heart_rate: self.base_hr,
            max_heart_rate: self.max_hr,
            heart_rate_gain: self.hr_gain,
            base_cadence: self.base_cadence,
            max_cadence: self.max_cadence,
            min_power: self.min_power,
            max_power: self.max_power,
            power_gain: self.power_gain,
            movement_speed_threshold: self.speed_threshold,
            start_time: self.start_time.clone(),
            activity_kind: self.activity_type.clone(),
            device_label: self.device_name.clone(),
            device_version: self.device_version.clone(),
            calories_per_km: self.calories_per_km,
            target_pace: self.target_pace.clone(),
            seed: self.seed,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gpx_tcx_rs=info,gpx_tcx=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    if cli.output.is_some() && cli.inputs.len() > 1 {
        tracing::error!("--output can only be used with a single input");
        return ExitCode::FAILURE;
    }

    let file_config = match cli.config.as_deref().map(RawConfig::from_json_file) {
        Some(Ok(raw)) => raw,
        Some(Err(e)) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
        None => RawConfig::default(),
    };

    let config = match file_config.merge(cli.overrides()).into_config() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        "{} activity, HR {}-{} bpm, cadence {}-{} spm, power {}-{} W, pace {}/km",
        config.activity_kind.as_str(),
        config.base_heart_rate,
        config.max_heart_rate,
        config.base_cadence,
        config.max_cadence,
        config.min_power,
        config.max_power,
        config.target_pace
    );

    let failures = cli
        .inputs
        .par_iter()
        .filter(|input| {
            let output = cli
                .output
                .clone()
                .unwrap_or_else(|| default_output(input));
            !convert::convert(input, &output, &config)
        })
        .count();

    if failures > 0 {
        tracing::error!("{} of {} conversions failed", failures, cli.inputs.len());
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

fn default_output(input: &Path) -> PathBuf {
    input.with_extension("tcx")
}

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::ConversionConfig;
use crate::error::{ConvertError, WriteError};
use crate::pipeline::render::{render_tcx, TcxDocument};
use crate::pipeline::synth::{summarize, Synthesizer};
use crate::pipeline::{parse, process, timeline};
use crate::types::activity::LapMetrics;

/// Result of a successful in-memory conversion. `metrics.total_time_s` is the
/// reconciled lap duration.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub tcx: String,
    pub points: usize,
    pub metrics: LapMetrics,
}

/// Runs the whole pipeline on GPX bytes and returns the TCX document.
pub fn convert_bytes(bytes: &[u8], config: &ConversionConfig) -> Result<Conversion, ConvertError> {
    let parsed = parse::parse(bytes, config)?;
    tracing::info!("Parsed {} track points", parsed.points.len());

    let mut trace = process::process(parsed, config);
    let base = timeline::resolve_base_time(config, trace.source_start);
    let total_time_s = timeline::reconcile(&mut trace, base)?;

    let metrics = trace.metrics;
    tracing::info!(
        "Distance {:.2} m, time {:.0} s, avg speed {:.2} m/s, {} kcal",
        metrics.total_distance_m,
        total_time_s,
        metrics.avg_speed_mps,
        metrics.total_calories
    );

    let samples = Synthesizer::for_trace(config, &trace).synthesize(&trace);
    let summary = summarize(config, &samples);

    let tcx = render_tcx(&TcxDocument {
        trace: &trace,
        samples: &samples,
        summary: &summary,
        config,
    })?;

    Ok(Conversion {
        tcx,
        points: trace.points.len(),
        metrics,
    })
}

/// Reads `source`, converts, and writes `destination` in one step.
pub fn run(
    source: &Path,
    destination: &Path,
    config: &ConversionConfig,
) -> Result<Conversion, ConvertError> {
    let bytes = fs::read(source).map_err(|source_err| ConvertError::Read {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    let conversion = convert_bytes(&bytes, config)?;
    write_atomic(destination, conversion.tcx.as_bytes())?;

    tracing::info!(
        "Wrote {} ({:.1} KB)",
        destination.display(),
        conversion.tcx.len() as f64 / 1024.0
    );
    Ok(conversion)
}

/// Converts `source` into `destination`, logging any failure instead of returning it.
pub fn convert(source: &Path, destination: &Path, config: &ConversionConfig) -> bool {
    tracing::info!("Converting {} -> {}", source.display(), destination.display());
    match run(source, destination, config) {
        Ok(_) => true,
        Err(e) => {
            tracing::error!("Conversion of {} failed: {}", source.display(), e);
            false
        }
    }
}

/// Writes to a sibling temp file and renames it over `path`.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), WriteError> {
    let tmp = temp_path(path);
    let result = fs::File::create(&tmp)
        .and_then(|mut file| {
            file.write_all(contents)?;
            file.sync_all()
        })
        .and_then(|_| fs::rename(&tmp, path));

    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(WriteError::Io {
            path: path.to_path_buf(),
            source: e,
        });
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output.tcx".to_string());
    path.with_file_name(format!(".{}.{}.tmp", name, Uuid::new_v4()))
}

use crate::config::ConversionConfig;
use crate::pipeline::geo::haversine_distance;
use crate::pipeline::speed::SpeedBand;
use crate::types::activity::{LapMetrics, ParsedTrace, ProcessedTrace, TracePoint};

/// Fills cumulative distances and normalized segment speeds, and reduces them to
/// lap metrics. Segments with no elapsed time add distance but no speed.
pub fn process(parsed: ParsedTrace, config: &ConversionConfig) -> ProcessedTrace {
    let band = SpeedBand::from_pace(&config.target_pace);
    let mut points = parsed.points;
    let speeds = accumulate_segments(&mut points, &band);
    let metrics = compute_metrics(&points, &speeds, config);

    ProcessedTrace {
        points,
        speeds,
        metrics,
        source_start: parsed.source_start,
    }
}

fn accumulate_segments(points: &mut [TracePoint], band: &SpeedBand) -> Vec<Option<f64>> {
    let mut speeds = Vec::with_capacity(points.len());
    let mut total = 0.0;

    if let Some(first) = points.first_mut() {
        first.cumulative_distance = 0.0;
        speeds.push(None);
    }

    for i in 1..points.len() {
        let prev = &points[i - 1];
        let curr = &points[i];

        let segment = haversine_distance(prev.lat, prev.lon, curr.lat, curr.lon);
        let elapsed = (curr.time - prev.time).num_milliseconds() as f64 / 1000.0;

        speeds.push(if elapsed > 0.0 {
            Some(band.normalize(segment / elapsed))
        } else {
            None
        });

        total += segment;
        points[i].cumulative_distance = total;
    }

    speeds
}

fn compute_metrics(
    points: &[TracePoint],
    speeds: &[Option<f64>],
    config: &ConversionConfig,
) -> LapMetrics {
    let total_distance_m = points.last().map(|p| p.cumulative_distance).unwrap_or(0.0);

    let total_time_s = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (last.time - first.time).num_milliseconds() as f64 / 1000.0,
        _ => 0.0,
    };

    let normalized: Vec<f64> = speeds.iter().flatten().copied().collect();
    let avg_speed_mps = if normalized.is_empty() {
        0.0
    } else {
        normalized.iter().sum::<f64>() / normalized.len() as f64
    };
    let max_speed_mps = normalized.iter().copied().fold(0.0, f64::max);

    let total_calories = ((total_distance_m / 1000.0) * config.calories_per_km)
        .floor()
        .max(0.0) as u32;

    LapMetrics {
        total_distance_m,
        total_time_s,
        avg_speed_mps,
        max_speed_mps,
        total_calories,
    }
}

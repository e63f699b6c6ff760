mod common;

use chrono::{DateTime, Duration, TimeZone, Utc};
use gpx_tcx_rs::config::ConversionConfig;
use gpx_tcx_rs::error::TimelineError;
use gpx_tcx_rs::pipeline::speed::SpeedBand;
use gpx_tcx_rs::pipeline::{parse, process, timeline};
use gpx_tcx_rs::types::activity::ProcessedTrace;
use gpx_tcx_rs::types::time::default_anchor;

fn processed(gpx: &str, config: &ConversionConfig) -> ProcessedTrace {
    let parsed = parse::parse(gpx.as_bytes(), config).expect("parse");
    process::process(parsed, config)
}

#[test]
fn cumulative_distance_is_monotonic_and_totals_match() {
    let trace = processed(&common::timed_gpx(5, 60), &ConversionConfig::default());

    assert_eq!(trace.points[0].cumulative_distance, 0.0);
    for pair in trace.points.windows(2) {
        assert!(pair[1].cumulative_distance >= pair[0].cumulative_distance);
    }
    let last = trace.points.last().expect("points").cumulative_distance;
    assert_eq!(trace.metrics.total_distance_m, last);
    assert!((last - 400.3).abs() < 0.5, "{last}");
}

#[test]
fn segment_speeds_stay_in_band() {
    let config = ConversionConfig::default();
    let band = SpeedBand::from_pace(&config.target_pace);

    // slow walk, target pace, sprint, and a GPS jump
    let gpx = common::gpx(
        r#"<trkpt lat="52.5200" lon="13.405"><time>2024-06-01T07:00:00Z</time></trkpt>
           <trkpt lat="52.5209" lon="13.405"><time>2024-06-01T07:02:00Z</time></trkpt>
           <trkpt lat="52.5218" lon="13.405"><time>2024-06-01T07:02:33Z</time></trkpt>
           <trkpt lat="52.5227" lon="13.405"><time>2024-06-01T07:02:53Z</time></trkpt>
           <trkpt lat="52.5327" lon="13.405"><time>2024-06-01T07:02:54Z</time></trkpt>"#,
    );
    let trace = processed(&gpx, &config);

    assert_eq!(trace.speeds[0], None);
    for speed in trace.speeds.iter().skip(1) {
        let speed = speed.expect("timed segment");
        assert!(band.contains(speed), "{speed}");
    }
}

#[test]
fn average_and_max_come_from_normalized_speeds() {
    let trace = processed(&common::timed_gpx(5, 60), &ConversionConfig::default());
    let speeds: Vec<f64> = trace.speeds.iter().flatten().copied().collect();

    assert_eq!(speeds.len(), 4);
    let mean = speeds.iter().sum::<f64>() / speeds.len() as f64;
    assert_eq!(trace.metrics.avg_speed_mps, mean);
    assert_eq!(
        trace.metrics.max_speed_mps,
        speeds.iter().copied().fold(0.0, f64::max)
    );
    assert_eq!(trace.metrics.total_time_s, 240.0);
}

#[test]
fn zero_duration_segments_add_distance_but_no_speed() {
    let gpx = common::gpx(
        r#"<trkpt lat="52.5200" lon="13.405"><time>2024-06-01T07:00:00Z</time></trkpt>
           <trkpt lat="52.5209" lon="13.405"><time>2024-06-01T07:00:00Z</time></trkpt>
           <trkpt lat="52.5218" lon="13.405"><time>2024-06-01T07:00:30Z</time></trkpt>"#,
    );
    let trace = processed(&gpx, &ConversionConfig::default());

    assert_eq!(trace.speeds[1], None);
    assert!(trace.speeds[2].is_some());
    assert!(trace.points[1].cumulative_distance > 99.0);
    assert!(trace.metrics.total_distance_m > 199.0);
    assert_eq!(trace.metrics.avg_speed_mps, trace.speeds[2].expect("speed"));
}

#[test]
fn calories_are_floored_per_km() {
    let trace = processed(&common::timed_gpx(5, 60), &ConversionConfig::default());
    // 400.3 m at 60 kcal/km
    assert_eq!(trace.metrics.total_calories, 24);
}

#[test]
fn single_point_has_empty_metrics() {
    let trace = processed(&common::timed_gpx(1, 60), &ConversionConfig::default());

    assert_eq!(trace.metrics.total_distance_m, 0.0);
    assert_eq!(trace.metrics.avg_speed_mps, 0.0);
    assert_eq!(trace.metrics.total_calories, 0);
    assert_eq!(timeline::realistic_total_time(&trace), 0.0);
}

#[test]
fn reconciled_time_matches_average_pace() {
    let mut trace = processed(&common::timed_gpx(6, 45), &ConversionConfig::default());
    let base = timeline::resolve_base_time(&ConversionConfig::default(), trace.source_start);
    let total = timeline::reconcile(&mut trace, base).expect("reconcile");

    let metrics = trace.metrics;
    assert!((total * metrics.avg_speed_mps - metrics.total_distance_m).abs() < 1e-6);
    assert_eq!(metrics.total_time_s, total);

    let span = (trace.points[5].time - trace.points[0].time).num_milliseconds() as f64 / 1000.0;
    assert!((span - total).abs() <= 0.001, "{span} vs {total}");
}

#[test]
fn reconciled_points_are_evenly_spaced() {
    let mut trace = processed(&common::untimed_gpx(5), &ConversionConfig::default());
    let base = timeline::resolve_base_time(&ConversionConfig::default(), trace.source_start);
    let total = timeline::reconcile(&mut trace, base).expect("reconcile");
    let step_ms = total / 4.0 * 1000.0;

    assert_eq!(trace.points[0].time, default_anchor());
    for (i, point) in trace.points.iter().enumerate() {
        let offset = (point.time - base).num_milliseconds() as f64;
        assert!((offset - i as f64 * step_ms).abs() <= 1.0);
    }
    for pair in trace.points.windows(2) {
        assert!(pair[1].time >= pair[0].time);
    }
}

#[test]
fn base_time_prefers_override_then_source() {
    let source = Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap();
    let custom = Utc.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
    let overridden = ConversionConfig {
        start_time: Some(custom),
        ..ConversionConfig::default()
    };

    assert_eq!(timeline::resolve_base_time(&overridden, Some(source)), custom);
    assert_eq!(
        timeline::resolve_base_time(&ConversionConfig::default(), Some(source)),
        source
    );
    assert_eq!(
        timeline::resolve_base_time(&ConversionConfig::default(), None),
        default_anchor()
    );
}

#[test]
fn reconcile_keeps_segment_speeds() {
    let mut trace = processed(&common::timed_gpx(5, 60), &ConversionConfig::default());
    let before = trace.speeds.clone();
    timeline::reconcile(&mut trace, default_anchor() + Duration::hours(1)).expect("reconcile");

    assert_eq!(trace.speeds, before);
}

#[test]
fn reconcile_past_the_end_of_time_is_an_error() {
    let mut trace = processed(&common::timed_gpx(5, 60), &ConversionConfig::default());
    let before: Vec<_> = trace.points.iter().map(|p| p.time).collect();
    let total_before = trace.metrics.total_time_s;

    let err = timeline::reconcile(&mut trace, DateTime::<Utc>::MAX_UTC).unwrap_err();

    assert!(matches!(err, TimelineError::OutOfRange { .. }));
    assert_eq!(trace.points.iter().map(|p| p.time).collect::<Vec<_>>(), before);
    assert_eq!(trace.metrics.total_time_s, total_before);
}

#[test]
fn reconcile_rejects_durations_beyond_the_calendar() {
    let mut trace = processed(&common::timed_gpx(5, 60), &ConversionConfig::default());
    trace.metrics.avg_speed_mps = 1e-12;

    let err = timeline::reconcile(&mut trace, default_anchor()).unwrap_err();
    assert!(matches!(err, TimelineError::OutOfRange { .. }));
}

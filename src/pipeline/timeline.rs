use chrono::{DateTime, Duration, Utc};

use crate::config::ConversionConfig;
use crate::error::TimelineError;
use crate::types::activity::ProcessedTrace;
use crate::types::time::default_anchor;

/// Override first, then the first real timestamp in the source, then the fixed anchor.
pub fn resolve_base_time(
    config: &ConversionConfig,
    source_start: Option<DateTime<Utc>>,
) -> DateTime<Utc> {
    config
        .start_time
        .or(source_start)
        .unwrap_or_else(default_anchor)
}

/// Duration implied by the normalized average speed; the wall-clock span when no
/// segment produced a speed.
pub fn realistic_total_time(trace: &ProcessedTrace) -> f64 {
    let metrics = &trace.metrics;
    if metrics.avg_speed_mps > 0.0 {
        metrics.total_distance_m / metrics.avg_speed_mps
    } else {
        metrics.total_time_s.max(0.0)
    }
}

/// Spreads the points evenly over the realistic duration starting at `base`, and
/// records that duration as the lap time. Segment speeds are left untouched.
/// Fails without touching the trace when the last point would land outside the
/// representable time range.
pub fn reconcile(trace: &mut ProcessedTrace, base: DateTime<Utc>) -> Result<f64, TimelineError> {
    let total = realistic_total_time(trace);
    let intervals = trace.points.len().saturating_sub(1).max(1);
    let step = total / intervals as f64;
    let out_of_range = || TimelineError::OutOfRange {
        base,
        total_s: total,
    };

    let times = (0..trace.points.len())
        .map(|i| {
            let offset_ms = (i as f64 * step * 1000.0).round();
            if !offset_ms.is_finite() || offset_ms >= i64::MAX as f64 {
                return None;
            }
            Duration::try_milliseconds(offset_ms as i64)
                .and_then(|offset| base.checked_add_signed(offset))
        })
        .collect::<Option<Vec<_>>>()
        .ok_or_else(out_of_range)?;

    for (point, time) in trace.points.iter_mut().zip(times) {
        point.time = time;
    }

    trace.metrics.total_time_s = total;
    tracing::debug!(
        "Reconciled {} points over {:.1} s from {}",
        trace.points.len(),
        total,
        base
    );
    Ok(total)
}

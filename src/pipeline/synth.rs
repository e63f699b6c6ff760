use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::ConversionConfig;
use crate::types::activity::{ProcessedTrace, TelemetrySample, TelemetrySummary, TracePoint};

pub const HEART_RATE_NOISE: (f64, f64) = (-8.0, 12.0);
pub const CADENCE_NOISE: (f64, f64) = (-3.0, 3.0);
pub const POWER_NOISE: (f64, f64) = (-8.0, 8.0);

const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Below this there is no gait at all.
const GAIT_SPEED: f64 = 0.5;
const HEART_RATE_SPEED_WINDOW: f64 = 2.0;
const CADENCE_SPEED_WINDOW: f64 = 3.0;
const POWER_SPEED_WINDOW: f64 = 2.0;

fn progress(index: usize, count: usize) -> f64 {
    index as f64 / count.saturating_sub(1).max(1) as f64
}

/// Truncates toward zero, then bounds. Never panics on an inverted range.
fn bounded(value: f64, low: f64, high: f64) -> u16 {
    whole(value.trunc().max(low).min(high))
}

fn whole(value: f64) -> u16 {
    value.trunc().max(0.0) as u16
}

pub fn heart_rate(
    config: &ConversionConfig,
    speed: f64,
    index: usize,
    count: usize,
    noise: f64,
) -> u16 {
    let base = config.base_heart_rate;
    let max = config.max_heart_rate;
    let threshold = config.movement_speed_threshold;

    let mut target = if speed < threshold {
        base
    } else {
        let speed_factor = ((speed - threshold) / HEART_RATE_SPEED_WINDOW).min(1.0);
        base + (max - base) * speed_factor * config.heart_rate_gain / 2.0
    };

    // warm-up ramps 0.95 -> 1.0, fatigue ramps 1.0 -> 1.15
    let progress = progress(index, count);
    if progress < 0.2 {
        target *= 0.95 + progress * 0.25;
    } else if progress > 0.8 {
        target *= 1.0 + (progress - 0.8) * 0.75;
    }

    bounded(target + noise, base - 15.0, max + 15.0)
}

pub fn cadence(config: &ConversionConfig, speed: f64, noise: f64) -> u16 {
    let base = config.base_cadence;
    let max = config.max_cadence;
    let threshold = config.movement_speed_threshold;

    if speed < GAIT_SPEED {
        return 0;
    }
    if speed < threshold {
        return bounded(base, base - 5.0, max + 5.0);
    }

    let speed_factor = ((speed - threshold) / CADENCE_SPEED_WINDOW).min(1.0);
    bounded(
        base + (max - base) * speed_factor + noise,
        base - 5.0,
        max + 5.0,
    )
}

pub fn power(config: &ConversionConfig, speed: f64, heart_rate: u16, noise: f64) -> u16 {
    let threshold = config.movement_speed_threshold;
    if speed < threshold {
        return 0;
    }

    let min = config.min_power;
    let max = config.max_power;
    let hr_span = (config.max_heart_rate - config.base_heart_rate).max(1.0);

    let speed_factor = ((speed - threshold) / POWER_SPEED_WINDOW).min(1.0);
    let hr_factor = ((f64::from(heart_rate) - config.base_heart_rate) / hr_span).clamp(0.0, 1.0);
    let combined = (speed_factor * 0.6 + hr_factor * 0.4) * config.power_gain / 3.0;

    bounded(min + (max - min) * combined + noise, min - 10.0, max + 10.0)
}

/// Per-trace seed for runs that do not pin one: FNV-1a over the point count and
/// the coordinate bits, so it stays the same across builds and platforms.
pub fn derive_seed(points: &[TracePoint]) -> u64 {
    let words = std::iter::once(points.len() as u64).chain(
        points
            .iter()
            .flat_map(|p| [p.lat.to_bits(), p.lon.to_bits(), p.elevation.to_bits()]),
    );

    words
        .flat_map(u64::to_le_bytes)
        .fold(FNV_OFFSET_BASIS, |hash, byte| {
            (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME)
        })
}

pub struct Synthesizer<'a> {
    config: &'a ConversionConfig,
    rng: StdRng,
}

impl<'a> Synthesizer<'a> {
    pub fn new(config: &'a ConversionConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn for_trace(config: &'a ConversionConfig, trace: &ProcessedTrace) -> Self {
        let seed = config
            .seed
            .unwrap_or_else(|| derive_seed(&trace.points));
        Self::new(config, seed)
    }

    pub fn sample(&mut self, speed: f64, index: usize, count: usize) -> TelemetrySample {
        let hr_noise = self.rng.gen_range(HEART_RATE_NOISE.0..=HEART_RATE_NOISE.1);
        let cadence_noise = self.rng.gen_range(CADENCE_NOISE.0..=CADENCE_NOISE.1);
        let power_noise = self.rng.gen_range(POWER_NOISE.0..=POWER_NOISE.1);

        let heart_rate_bpm = heart_rate(self.config, speed, index, count, hr_noise);
        TelemetrySample {
            heart_rate_bpm,
            cadence_spm: cadence(self.config, speed, cadence_noise),
            power_w: power(self.config, speed, heart_rate_bpm, power_noise),
        }
    }

    /// One sample per point, in order.
    pub fn synthesize(&mut self, trace: &ProcessedTrace) -> Vec<TelemetrySample> {
        let count = trace.points.len();
        (0..count)
            .map(|i| self.sample(trace.point_speed(i), i, count))
            .collect()
    }
}

/// Reduces per-point samples to lap figures. The first point carries no segment
/// and is left out; zero cadence and zero power count as "not moving".
pub fn summarize(config: &ConversionConfig, samples: &[TelemetrySample]) -> TelemetrySummary {
    let moving = samples.get(1..).unwrap_or(&[]);

    let heart_rates: Vec<u16> = moving.iter().map(|s| s.heart_rate_bpm).collect();
    let cadences: Vec<u16> = moving.iter().map(|s| s.cadence_spm).filter(|&c| c > 0).collect();
    let powers: Vec<u16> = moving.iter().map(|s| s.power_w).filter(|&p| p > 0).collect();

    TelemetrySummary {
        avg_heart_rate: mean(&heart_rates).unwrap_or(whole(config.base_heart_rate + 20.0)),
        max_heart_rate: heart_rates
            .iter()
            .copied()
            .max()
            .unwrap_or(whole(config.max_heart_rate - 10.0)),
        avg_cadence: mean(&cadences).unwrap_or(whole(config.base_cadence)),
        max_cadence: cadences
            .iter()
            .copied()
            .max()
            .unwrap_or(whole(config.max_cadence)),
        avg_power: mean(&powers).unwrap_or(whole(config.min_power)),
        max_power: powers
            .iter()
            .copied()
            .max()
            .unwrap_or(whole(config.max_power)),
    }
}

fn mean(values: &[u16]) -> Option<u16> {
    if values.is_empty() {
        return None;
    }
    let sum: u64 = values.iter().map(|&v| u64::from(v)).sum();
    Some((sum / values.len() as u64) as u16)
}

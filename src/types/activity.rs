use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct TracePoint {
    pub lat: f64,
    pub lon: f64,
    pub elevation: f64,
    pub time: DateTime<Utc>,
    pub cumulative_distance: f64,
}

#[derive(Debug, Clone)]
pub struct ParsedTrace {
    pub points: Vec<TracePoint>,
    /// First timestamp actually present in the source, before any synthesis.
    pub source_start: Option<DateTime<Utc>>,
}

/// Lap-level totals. Speeds are normalized, not raw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LapMetrics {
    pub total_distance_m: f64,
    pub total_time_s: f64,
    pub avg_speed_mps: f64,
    pub max_speed_mps: f64,
    pub total_calories: u32,
}

#[derive(Debug, Clone)]
pub struct ProcessedTrace {
    pub points: Vec<TracePoint>,
    /// Normalized speed of the segment ending at each point; `None` for the first
    /// point and for zero-duration segments.
    pub speeds: Vec<Option<f64>>,
    pub metrics: LapMetrics,
    pub source_start: Option<DateTime<Utc>>,
}

impl ProcessedTrace {
    /// Speed carried by point `idx` when emitted, 0 where no segment speed exists.
    pub fn point_speed(&self, idx: usize) -> f64 {
        self.speeds.get(idx).copied().flatten().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetrySample {
    pub heart_rate_bpm: u16,
    pub cadence_spm: u16,
    pub power_w: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TelemetrySummary {
    pub avg_heart_rate: u16,
    pub max_heart_rate: u16,
    pub avg_cadence: u16,
    pub max_cadence: u16,
    pub avg_power: u16,
    pub max_power: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityKind {
    #[default]
    Running,
    Biking,
    Other,
}

impl ActivityKind {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "running" | "run" => ActivityKind::Running,
            "biking" | "cycling" | "bike" | "ride" => ActivityKind::Biking,
            _ => ActivityKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Running => "Running",
            ActivityKind::Biking => "Biking",
            ActivityKind::Other => "Other",
        }
    }
}

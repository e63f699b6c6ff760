use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::types::activity::ActivityKind;
use crate::types::pace::TargetPace;
use crate::types::time::parse_time;

/// Settings for one conversion. Built once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    pub base_heart_rate: f64,
    pub max_heart_rate: f64,
    pub heart_rate_gain: f64,
    pub base_cadence: f64,
    pub max_cadence: f64,
    pub min_power: f64,
    pub max_power: f64,
    pub power_gain: f64,
    /// m/s below which the athlete counts as standing still.
    pub movement_speed_threshold: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub activity_kind: ActivityKind,
    pub device_label: String,
    pub device_version: String,
    pub calories_per_km: f64,
    pub target_pace: TargetPace,
    pub seed: Option<u64>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            base_heart_rate: 135.0,
            max_heart_rate: 165.0,
            heart_rate_gain: 1.5,
            base_cadence: 50.0,
            max_cadence: 70.0,
            min_power: 150.0,
            max_power: 300.0,
            power_gain: 1.0,
            movement_speed_threshold: 0.8,
            start_time: None,
            activity_kind: ActivityKind::Running,
            device_label: "Forerunner 570".to_string(),
            device_version: "12.70".to_string(),
            calories_per_km: 60.0,
            target_pace: TargetPace::default(),
            seed: None,
        }
    }
}

/// Loosely typed form, as read from a JSON file or assembled from CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub base_heart_rate: Option<f64>,
    pub max_heart_rate: Option<f64>,
    pub heart_rate_gain: Option<f64>,
    pub base_cadence: Option<f64>,
    pub max_cadence: Option<f64>,
    pub min_power: Option<f64>,
    pub max_power: Option<f64>,
    pub power_gain: Option<f64>,
    pub movement_speed_threshold: Option<f64>,
    pub start_time: Option<String>,
    pub activity_kind: Option<String>,
    pub device_label: Option<String>,
    pub device_version: Option<String>,
    pub calories_per_km: Option<f64>,
    pub target_pace: Option<String>,
    pub seed: Option<u64>,
}

impl RawConfig {
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Fields set in `other` win.
    pub fn merge(self, other: RawConfig) -> RawConfig {
        RawConfig {
            base_heart_rate: other.base_heart_rate.or(self.base_heart_rate),
            max_heart_rate: other.max_heart_rate.or(self.max_heart_rate),
            heart_rate_gain: other.heart_rate_gain.or(self.heart_rate_gain),
            base_cadence: other.base_cadence.or(self.base_cadence),
            max_cadence: other.max_cadence.or(self.max_cadence),
            min_power: other.min_power.or(self.min_power),
            max_power: other.max_power.or(self.max_power),
            power_gain: other.power_gain.or(self.power_gain),
            movement_speed_threshold: other
                .movement_speed_threshold
                .or(self.movement_speed_threshold),
            start_time: other.start_time.or(self.start_time),
            activity_kind: other.activity_kind.or(self.activity_kind),
            device_label: other.device_label.or(self.device_label),
            device_version: other.device_version.or(self.device_version),
            calories_per_km: other.calories_per_km.or(self.calories_per_km),
            target_pace: other.target_pace.or(self.target_pace),
            seed: other.seed.or(self.seed),
        }
    }

    /// Applies defaults and parses string fields eagerly. An unreadable start time
    /// or pace is dropped with a warning; inverted ranges are rejected.
    pub fn into_config(self) -> Result<ConversionConfig, ConfigError> {
        let defaults = ConversionConfig::default();

        let start_time = self
            .start_time
            .filter(|s| !s.trim().is_empty())
            .and_then(|s| match parse_time(&s) {
                Ok(time) => Some(time),
                Err(e) => {
                    tracing::warn!("Ignoring start time override: {}", e);
                    None
                }
            });

        let target_pace = match self.target_pace.as_deref().map(str::parse::<TargetPace>) {
            Some(Ok(pace)) => pace,
            Some(Err(e)) => {
                tracing::warn!("{}; using {}/km", e, defaults.target_pace);
                defaults.target_pace
            }
            None => defaults.target_pace,
        };

        let config = ConversionConfig {
            base_heart_rate: self.base_heart_rate.unwrap_or(defaults.base_heart_rate),
            max_heart_rate: self.max_heart_rate.unwrap_or(defaults.max_heart_rate),
            heart_rate_gain: self.heart_rate_gain.unwrap_or(defaults.heart_rate_gain),
            base_cadence: self.base_cadence.unwrap_or(defaults.base_cadence),
            max_cadence: self.max_cadence.unwrap_or(defaults.max_cadence),
            min_power: self.min_power.unwrap_or(defaults.min_power),
            max_power: self.max_power.unwrap_or(defaults.max_power),
            power_gain: self.power_gain.unwrap_or(defaults.power_gain),
            movement_speed_threshold: self
                .movement_speed_threshold
                .unwrap_or(defaults.movement_speed_threshold),
            start_time,
            activity_kind: self
                .activity_kind
                .as_deref()
                .map(ActivityKind::from_str)
                .unwrap_or(defaults.activity_kind),
            device_label: self.device_label.unwrap_or(defaults.device_label),
            device_version: self.device_version.unwrap_or(defaults.device_version),
            calories_per_km: self.calories_per_km.unwrap_or(defaults.calories_per_km),
            target_pace,
            seed: self.seed,
        };

        config.validate()?;
        Ok(config)
    }
}

impl ConversionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ranges = [
            ("heart rate", self.base_heart_rate, self.max_heart_rate),
            ("cadence", self.base_cadence, self.max_cadence),
            ("power", self.min_power, self.max_power),
        ];

        for (field, low, high) in ranges {
            if low > high {
                return Err(ConfigError::InvertedRange { field, low, high });
            }
        }
        Ok(())
    }
}

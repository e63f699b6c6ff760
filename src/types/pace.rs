use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

const DEFAULT_PACE_SECONDS: f64 = 5.0 * 60.0 + 30.0;
/// 0:30/km, faster than any bike on the flat.
const MIN_PACE_SECONDS: f64 = 30.0;
/// 60:00/km, slower than a hike.
const MAX_PACE_SECONDS: f64 = 60.0 * 60.0;

/// Desired pace, stored as seconds per kilometre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetPace {
    seconds_per_km: f64,
}

impl TargetPace {
    pub fn from_seconds_per_km(seconds_per_km: f64) -> Result<Self, ConfigError> {
        if !(MIN_PACE_SECONDS..=MAX_PACE_SECONDS).contains(&seconds_per_km) {
            return Err(ConfigError::InvalidPace(seconds_per_km.to_string()));
        }
        Ok(Self { seconds_per_km })
    }

    pub fn seconds_per_km(&self) -> f64 {
        self.seconds_per_km
    }

    pub fn target_speed_mps(&self) -> f64 {
        1000.0 / self.seconds_per_km
    }
}

impl Default for TargetPace {
    fn default() -> Self {
        Self {
            seconds_per_km: DEFAULT_PACE_SECONDS,
        }
    }
}

/// Accepts `m:ss` or bare minutes (`"5.5"`).
impl FromStr for TargetPace {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || ConfigError::InvalidPace(s.to_string());

        let seconds = match s.split_once(':') {
            Some((minutes, seconds)) => {
                let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;
                let seconds: u32 = seconds.trim().parse().map_err(|_| invalid())?;
                let total = minutes
                    .checked_mul(60)
                    .and_then(|m| m.checked_add(seconds))
                    .ok_or_else(invalid)?;
                f64::from(total)
            }
            None => s.parse::<f64>().map_err(|_| invalid())? * 60.0,
        };

        Self::from_seconds_per_km(seconds).map_err(|_| invalid())
    }
}

impl fmt::Display for TargetPace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.seconds_per_km.round() as u64;
        write!(f, "{}:{:02}", total / 60, total % 60)
    }
}

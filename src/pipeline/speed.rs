use crate::types::pace::TargetPace;

const BAND_LOW: f64 = 0.85;
const BAND_HIGH: f64 = 1.15;
/// Above `max * FAR_FACTOR` the raw speed is treated as a GPS artefact.
const FAR_FACTOR: f64 = 1.5;
/// Share of a moderate overshoot that survives compression.
const OVERSHOOT_PASS: f64 = 0.1;

/// Plausible speed range around the target pace.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedBand {
    pub target: f64,
    pub min: f64,
    pub max: f64,
}

impl SpeedBand {
    pub fn from_pace(pace: &TargetPace) -> Self {
        let target = pace.target_speed_mps();
        Self {
            target,
            min: target * BAND_LOW,
            max: target * BAND_HIGH,
        }
    }

    /// Maps a raw speed into `[min, max]`.
    ///
    /// A far overshoot goes through `excess / (excess + target)`, which starts at
    /// the bottom of the band and creeps toward the top as the overshoot grows, so
    /// jitter spikes can never leave the band.
    pub fn normalize(&self, raw: f64) -> f64 {
        let far = self.max * FAR_FACTOR;

        let compressed = if raw > far {
            let excess = raw - far;
            self.min + excess / (excess + self.target) * (self.max - self.min)
        } else if raw > self.max {
            self.max + (raw - self.max) * OVERSHOOT_PASS
        } else {
            raw
        };

        compressed.clamp(self.min, self.max)
    }

    pub fn contains(&self, speed: f64) -> bool {
        speed >= self.min && speed <= self.max
    }
}

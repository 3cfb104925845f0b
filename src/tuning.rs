//! Data-driven game balance
//!
//! Defaults mirror `consts`; the browser shell can override any field with a
//! JSON blob (missing fields keep their defaults).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Largest accepted per-virus reward
pub const MAX_REWARD: u64 = 1_000_000;
/// Largest accepted spark count per burst
pub const MAX_PARTICLES: usize = 256;

/// One difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierSpec {
    /// Elapsed session time (ms) at which this tier takes over
    pub threshold_ms: u64,
    /// Fall speed for viruses spawned during this tier (px per motion tick)
    pub speed: f32,
    /// Delay between spawns (ms)
    pub spawn_interval_ms: u64,
}

/// Rejected tuning values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TuningError {
    #[error("tier table is empty")]
    NoTiers,
    #[error("tier table has {0} entries, at most 255 are supported")]
    TooManyTiers(usize),
    #[error("first tier must start at 0 ms, found {0} ms")]
    FirstTierDelayed(u64),
    #[error("tier {index} starts at {threshold_ms} ms, not after the previous tier")]
    TiersOutOfOrder { index: usize, threshold_ms: u64 },
    #[error("{0} must be greater than zero")]
    NotPositive(&'static str),
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
    #[error("{name} is {value}, at most {max} is supported")]
    TooLarge {
        name: &'static str,
        value: u64,
        max: u64,
    },
}

/// Game balance and geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Spawn RNG seed
    pub seed: u64,

    // === Geometry ===
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Side length of the (square) virus sprite
    pub object_size: f32,

    // === Timing ===
    pub motion_tick_ms: u64,
    pub removal_delay_ms: u64,

    // === Scoring ===
    pub reward: u64,

    // === Difficulty ===
    pub tiers: Vec<TierSpec>,

    // === Feedback ===
    pub particle_count: usize,
    pub particle_speed: f32,
    pub particle_fade: f32,
    pub particle_tick_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x1e_5eed,

            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            object_size: OBJECT_SIZE,

            motion_tick_ms: MOTION_TICK_MS,
            removal_delay_ms: REMOVAL_DELAY_MS,

            reward: DESTROY_REWARD,

            tiers: TIERS
                .iter()
                .map(|&(threshold_ms, speed, spawn_interval_ms)| TierSpec {
                    threshold_ms,
                    speed,
                    spawn_interval_ms,
                })
                .collect(),

            particle_count: PARTICLE_COUNT,
            particle_speed: PARTICLE_SPEED,
            particle_fade: PARTICLE_FADE,
            particle_tick_ms: PARTICLE_TICK_MS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Same tuning with a different spawn seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the values the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let first = self.tiers.first().ok_or(TuningError::NoTiers)?;
        if self.tiers.len() > u8::MAX as usize {
            return Err(TuningError::TooManyTiers(self.tiers.len()));
        }
        if first.threshold_ms != 0 {
            return Err(TuningError::FirstTierDelayed(first.threshold_ms));
        }
        for (index, pair) in self.tiers.windows(2).enumerate() {
            if pair[1].threshold_ms <= pair[0].threshold_ms {
                return Err(TuningError::TiersOutOfOrder {
                    index: index + 1,
                    threshold_ms: pair[1].threshold_ms,
                });
            }
        }
        for tier in &self.tiers {
            // Zero speed would leave a virus hanging forever; negative would rise
            if !(tier.speed > 0.0) {
                return Err(TuningError::NotPositive("tier speed"));
            }
            if !tier.speed.is_finite() {
                return Err(TuningError::NotFinite("tier speed"));
            }
            if tier.spawn_interval_ms == 0 {
                return Err(TuningError::NotPositive("tier spawn interval"));
            }
        }

        let positive_floats = [
            ("viewport width", self.viewport_width),
            ("viewport height", self.viewport_height),
            ("object size", self.object_size),
            ("particle fade", self.particle_fade),
        ];
        for (name, value) in positive_floats {
            if !(value > 0.0) {
                return Err(TuningError::NotPositive(name));
            }
            if !value.is_finite() {
                return Err(TuningError::NotFinite(name));
            }
        }
        if !self.particle_speed.is_finite() {
            return Err(TuningError::NotFinite("particle speed"));
        }
        if self.reward > MAX_REWARD {
            return Err(TuningError::TooLarge {
                name: "reward",
                value: self.reward,
                max: MAX_REWARD,
            });
        }
        if self.particle_count > MAX_PARTICLES {
            return Err(TuningError::TooLarge {
                name: "particle count",
                value: self.particle_count as u64,
                max: MAX_PARTICLES as u64,
            });
        }
        if self.motion_tick_ms == 0 {
            return Err(TuningError::NotPositive("motion tick"));
        }
        if self.particle_tick_ms == 0 {
            return Err(TuningError::NotPositive("particle tick"));
        }
        Ok(())
    }

    /// Tier spec for a 1-based tier number (clamped to the table)
    pub fn tier(&self, tier: u8) -> TierSpec {
        let index = (tier.max(1) as usize - 1).min(self.tiers.len().saturating_sub(1));
        self.tiers.get(index).copied().unwrap_or(TierSpec {
            threshold_ms: 0,
            speed: TIERS[0].1,
            spawn_interval_ms: TIERS[0].2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert_eq!(tuning.validate(), Ok(()));
        assert_eq!(tuning.tiers.len(), 3);
        assert_eq!(tuning.tier(1).speed, 2.0);
        assert_eq!(tuning.tier(2).spawn_interval_ms, 1200);
        assert_eq!(tuning.tier(3).threshold_ms, 30_000);
    }

    #[test]
    fn test_tier_lookup_clamps() {
        let tuning = Tuning::default();
        assert_eq!(tuning.tier(0), tuning.tier(1));
        assert_eq!(tuning.tier(9), tuning.tier(3));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "seed": 7, "viewport_height": 900.0 }"#).unwrap();
        assert_eq!(tuning.seed, 7);
        assert_eq!(tuning.viewport_height, 900.0);
        assert_eq!(tuning.viewport_width, DEFAULT_VIEWPORT_WIDTH);
        assert_eq!(tuning.tiers.len(), 3);
    }

    #[test]
    fn test_json_survives_serialization() {
        let tuning = Tuning::default().with_seed(42);
        let json = tuning.to_json().unwrap();
        assert_eq!(Tuning::from_json(&json).unwrap(), tuning);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(Tuning::from_json("{ seed: }").is_err());
    }

    #[test]
    fn test_validate_rejects_bad_tables() {
        let mut tuning = Tuning::default();
        tuning.tiers.clear();
        assert_eq!(tuning.validate(), Err(TuningError::NoTiers));

        let mut tuning = Tuning::default();
        tuning.tiers[0].threshold_ms = 10;
        assert_eq!(tuning.validate(), Err(TuningError::FirstTierDelayed(10)));

        let mut tuning = Tuning::default();
        tuning.tiers[2].threshold_ms = 15_000;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::TiersOutOfOrder {
                index: 2,
                threshold_ms: 15_000
            })
        );

        let mut tuning = Tuning::default();
        tuning.tiers[1].speed = 0.0;
        assert_eq!(tuning.validate(), Err(TuningError::NotPositive("tier speed")));
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut tuning = Tuning::default();
        tuning.object_size = -1.0;
        assert_eq!(tuning.validate(), Err(TuningError::NotPositive("object size")));

        let mut tuning = Tuning::default();
        tuning.viewport_width = f32::NAN;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::NotPositive("viewport width"))
        );

        let mut tuning = Tuning::default();
        tuning.motion_tick_ms = 0;
        assert_eq!(tuning.validate(), Err(TuningError::NotPositive("motion tick")));

        let mut tuning = Tuning::default();
        tuning.viewport_width = f32::INFINITY;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::NotFinite("viewport width"))
        );

        let mut tuning = Tuning::default();
        tuning.tiers[2].speed = f32::INFINITY;
        assert_eq!(tuning.validate(), Err(TuningError::NotFinite("tier speed")));

        let mut tuning = Tuning::default();
        tuning.particle_speed = f32::NEG_INFINITY;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::NotFinite("particle speed"))
        );
    }

    #[test]
    fn test_validate_caps_reward_and_particles() {
        let tuning = Tuning::from_json(r#"{ "reward": 18446744073709551615 }"#).unwrap();
        assert_eq!(
            tuning.validate(),
            Err(TuningError::TooLarge {
                name: "reward",
                value: u64::MAX,
                max: MAX_REWARD,
            })
        );

        let tuning = Tuning::from_json(r#"{ "particle_count": 18446744073709551615 }"#).unwrap();
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::TooLarge {
                name: "particle count",
                ..
            })
        ));

        let mut tuning = Tuning::default();
        tuning.reward = MAX_REWARD;
        tuning.particle_count = MAX_PARTICLES;
        assert_eq!(tuning.validate(), Ok(()));
    }
}

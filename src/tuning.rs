//! Data-driven game balance
//!
//! Every number the world simulator uses to pace a run lives here so a host
//! can load alternatives from JSON. Missing fields fall back to defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Simulator balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// RNG seed for spawning and boss attacks
    pub seed: u64,

    // === Spawning ===
    /// Spawn another batch while the frontier is closer than this
    pub spawn_distance: f32,
    /// Frontier used when the track is empty
    pub fallback_frontier_z: f32,
    /// Minimum gap between batches at zero speed
    pub base_gap: f32,
    /// Extra gap per unit of speed
    pub gap_speed_factor: f32,
    /// Gap multiplier during the boss fight
    pub boss_density: f32,
    /// Distance between letters on level 1 (grows 1.5x per level)
    pub letter_interval: f32,
    /// Chance a spawn cycle produces anything
    pub spawn_chance: f32,
    /// Chance a batch is obstacles rather than a lone gem
    pub obstacle_chance: f32,
    /// Chance an obstacle batch is aliens instead (level 2+)
    pub alien_chance: f32,
    /// Chance of a gem floating above each obstacle
    pub bonus_gem_chance: f32,

    // === Movement & collision ===
    /// Missiles close on the player this much faster than the scroll
    pub missile_speed: f32,
    /// Aliens fire once they scroll past this z
    pub alien_fire_z: f32,
    /// Objects past this z are dropped
    pub removal_z: f32,
    /// Only objects within this z-distance of the player are collision tested
    pub collision_band: f32,
    /// Lateral reach for hits and pickups
    pub lane_hit_width: f32,
    /// Vertical reach for pickups
    pub pickup_reach: f32,
    /// z-distance at which the shop portal triggers
    pub portal_reach: f32,
    /// Where the shop portal appears after a level-up
    pub shop_portal_z: f32,

    // === Boss ===
    pub boss_z: f32,
    pub boss_height: f32,
    pub boss_attack_interval: f32,
    /// Beam telegraph length
    pub beam_warning_time: f32,
    /// Beam disappears at this age
    pub beam_end_time: f32,
    /// Lateral reach of an active beam
    pub beam_hit_width: f32,
    /// Chance the boss fires a second beam
    pub double_beam_chance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            seed: 0x5eed_cafe,

            spawn_distance: 140.0,
            fallback_frontier_z: -20.0,
            base_gap: 12.0,
            gap_speed_factor: 0.4,
            boss_density: 1.5,
            letter_interval: 150.0,
            spawn_chance: 0.9,
            obstacle_chance: 0.8,
            alien_chance: 0.2,
            bonus_gem_chance: 0.3,

            missile_speed: 30.0,
            alien_fire_z: -90.0,
            removal_z: 10.0,
            collision_band: 2.0,
            lane_hit_width: 0.9,
            pickup_reach: 2.5,
            portal_reach: 2.0,
            shop_portal_z: -100.0,

            boss_z: -45.0,
            boss_height: 6.0,
            boss_attack_interval: 3.5,
            beam_warning_time: 2.0,
            beam_end_time: 3.0,
            beam_hit_width: 0.9,
            double_beam_chance: 0.5,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break pacing invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let probabilities = [
            ("spawn_chance", self.spawn_chance),
            ("obstacle_chance", self.obstacle_chance),
            ("alien_chance", self.alien_chance),
            ("bonus_gem_chance", self.bonus_gem_chance),
            ("double_beam_chance", self.double_beam_chance),
        ];
        for (field, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("{p} is not a probability"),
                });
            }
        }

        let positives = [
            ("spawn_distance", self.spawn_distance),
            ("base_gap", self.base_gap),
            ("letter_interval", self.letter_interval),
            ("boss_attack_interval", self.boss_attack_interval),
            ("collision_band", self.collision_band),
        ];
        for (field, v) in positives {
            if v <= 0.0 {
                return Err(TuningError::Invalid {
                    field,
                    reason: format!("{v} must be positive"),
                });
            }
        }

        if self.gap_speed_factor < 0.0 {
            return Err(TuningError::Invalid {
                field: "gap_speed_factor",
                reason: "must not be negative".into(),
            });
        }
        if self.boss_density < 1.0 {
            return Err(TuningError::Invalid {
                field: "boss_density",
                reason: "boss fight can't be denser than a normal level".into(),
            });
        }
        if self.beam_warning_time >= self.beam_end_time {
            return Err(TuningError::Invalid {
                field: "beam_warning_time",
                reason: "warning must end before the beam does".into(),
            });
        }
        Ok(())
    }

    /// Distance between consecutive spawn batches
    pub fn spawn_gap(&self, speed: f32, boss_fight: bool) -> f32 {
        let density = if boss_fight { self.boss_density } else { 1.0 };
        (self.base_gap + speed * self.gap_speed_factor) * density
    }

    /// Letter spacing grows geometrically with level
    pub fn letter_interval_for(&self, level: u32) -> f32 {
        self.letter_interval * 1.5f32.powi(level.saturating_sub(1) as i32)
    }
}

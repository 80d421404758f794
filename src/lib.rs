//! Lane Runner - gameplay core of a lane-based endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (run state, spawning, collisions, boss)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use sim::{GameStatus, RunState, SimEvent, WorldSimulator};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Initial world scroll rate (units/s)
    pub const BASE_SPEED: f32 = 20.0;
    /// Largest simulated step; bigger frame hitches are clamped to this
    pub const MAX_STEP_DT: f32 = 0.05;

    /// Run progression
    pub const MAX_LEVEL: u32 = 3;
    pub const START_LANE_COUNT: u32 = 3;
    pub const MAX_LANE_COUNT: u32 = 9;
    pub const START_LIVES: u32 = 3;

    /// Letters of the target word
    pub const WORD_LENGTH: usize = 6;

    /// Combo scoring
    pub const MAX_MULTIPLIER: u32 = 5;
    pub const COMBO_WINDOW_MS: f64 = 2000.0;

    /// Score values
    pub const LETTER_SCORE: u64 = 500;
    pub const VICTORY_BONUS: u64 = 5000;
    pub const GEM_POINTS: u64 = 50;
    pub const BONUS_GEM_POINTS: u64 = 100;

    /// Immortality lasts this long once activated
    pub const IMMORTALITY_DURATION_MS: f64 = 5000.0;

    /// Lane geometry
    pub const LANE_WIDTH: f32 = 2.2;
    /// Player hitbox height above its feet
    pub const PLAYER_HEIGHT: f32 = 1.8;
}

/// World x-offset of a lane index (lane 0 is the track center)
#[inline]
pub fn lane_offset(lane: i32) -> f32 {
    lane as f32 * consts::LANE_WIDTH
}

/// Nearest lane index to a world x-offset
#[inline]
pub fn lane_at(x: f32) -> i32 {
    (x / consts::LANE_WIDTH).round() as i32
}

/// Valid lane indices for an odd lane count, e.g. 3 -> [-1, 0, 1]
pub fn lanes_for(lane_count: u32) -> Vec<i32> {
    let half = (lane_count / 2) as i32;
    (-half..=half).collect()
}

//! Output events produced by a simulation step
//!
//! The simulator never calls into rendering, audio or damage handling
//! directly. Each `step` returns the events it produced and the host decides
//! what to do with them (e.g. call `RunState::take_damage` on `PlayerHit`).

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Audio cues for the sound layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    /// Gem picked up
    GemCollect,
    /// Letter picked up
    LetterCollect,
    /// Player struck by an obstacle, alien, missile or beam
    Damage,
    /// Alien fired its missile
    MissileLaunch,
    /// Boss beam started its warning phase
    BeamCharge,
    /// Player drove through the shop portal
    PortalEnter,
}

/// Something the presentation layer should react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// The player was hit; the listener applies damage
    PlayerHit,
    /// Visual explosion / sparkle at a world position
    ParticleBurst { position: Vec3, color: u32 },
    /// Fire-and-forget audio cue
    Sound(SoundCue),
    /// Player touched the shop portal and the run moved to the shop
    ShopEntered,
    /// The level boss appeared
    BossSpawned,
    /// The boss fired beams down these lanes
    BossAttack { lanes: Vec<i32> },
}

/// Particle colors (0xRRGGBB)
pub mod colors {
    pub const GEM: u32 = 0x00e5ff;
    pub const EXPLOSION: u32 = 0xff4400;
    pub const ALIEN_FIRE: u32 = 0xff00ff;
    pub const PORTAL: u32 = 0x00ff88;
}

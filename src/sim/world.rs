//! World objects owned by the simulator
//!
//! Objects live on the track in world space: x is the lane offset, y is height
//! above the road, z runs along the track. The player sits near z = 0 and
//! objects spawn at negative z and scroll toward positive z.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::consts::WORD_LENGTH;

/// Word the player spells by collecting letters
pub const TARGET_WORD: [char; WORD_LENGTH] = ['G', 'E', 'M', 'I', 'N', 'I'];

/// Display color of each letter (0xRRGGBB)
pub const LETTER_COLORS: [u32; WORD_LENGTH] =
    [0x2979ff, 0xff1744, 0xffea00, 0x2979ff, 0x00e676, 0xff1744];

/// Letter character for an index into the target word
pub fn letter_for(index: usize) -> Option<char> {
    TARGET_WORD.get(index).copied()
}

/// Phase of a boss beam
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BeamState {
    /// Telegraph only, harmless
    Warning,
    /// Damages anyone in its lane
    Active,
}

/// Object variants with their kind-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Ground barrier spanning full height
    Obstacle,
    Gem {
        points: u64,
    },
    Letter {
        /// Index into the target word
        target_index: usize,
        value: char,
        color: u32,
    },
    /// Hovering enemy that fires a single missile
    Alien {
        has_fired: bool,
    },
    Missile,
    /// Gate into the shop after a level-up
    ShopPortal,
    Boss {
        attack_timer: f32,
    },
    BossBeam {
        state: BeamState,
        timer: f32,
        lane: i32,
        /// Beam already reported a hit this activation
        has_hit: bool,
    },
}

/// A transient entity on the track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldObject {
    pub id: u32,
    pub kind: ObjectKind,
    pub position: Vec3,
    /// Inactive objects are invisible, never collide and get removed
    pub active: bool,
}

impl WorldObject {
    pub fn new(id: u32, kind: ObjectKind, position: Vec3) -> Self {
        Self {
            id,
            kind,
            position,
            active: true,
        }
    }

    /// Objects that make up the spawn frontier (everything the spawner
    /// places on the road itself)
    pub fn is_track_object(&self) -> bool {
        !matches!(
            self.kind,
            ObjectKind::Missile | ObjectKind::Boss { .. } | ObjectKind::BossBeam { .. }
        )
    }

    /// Objects that hurt the player on contact
    pub fn is_damaging(&self) -> bool {
        matches!(
            self.kind,
            ObjectKind::Obstacle | ObjectKind::Alien { .. } | ObjectKind::Missile
        )
    }

    pub fn is_boss(&self) -> bool {
        matches!(self.kind, ObjectKind::Boss { .. })
    }

    /// Short name for logs
    pub fn kind_name(&self) -> &'static str {
        match self.kind {
            ObjectKind::Obstacle => "obstacle",
            ObjectKind::Gem { .. } => "gem",
            ObjectKind::Letter { .. } => "letter",
            ObjectKind::Alien { .. } => "alien",
            ObjectKind::Missile => "missile",
            ObjectKind::ShopPortal => "shop_portal",
            ObjectKind::Boss { .. } => "boss",
            ObjectKind::BossBeam { .. } => "boss_beam",
        }
    }
}

//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped frame steps only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or input dependencies

pub mod boss;
pub mod collision;
pub mod events;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{Contact, Interval, check_contact};
pub use events::{SimEvent, SoundCue};
pub use spawn::Spawner;
pub use state::{GameStatus, RunState, ShopItem};
pub use tick::WorldSimulator;
pub use world::{BeamState, ObjectKind, TARGET_WORD, WorldObject, letter_for};

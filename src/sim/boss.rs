//! Final-level boss
//!
//! The boss hovers at a fixed distance ahead of the player and periodically
//! fires beams down one or two lanes. Each beam telegraphs for a while before
//! it turns damaging, then fades out.

use glam::Vec3;
use rand::Rng;

use super::collision::in_beam;
use super::spawn::Spawner;
use super::world::{BeamState, ObjectKind, WorldObject};
use crate::lane_offset;
use crate::tuning::Tuning;

/// Create the boss pinned at its track offset
pub fn spawn_boss(spawner: &mut Spawner, tuning: &Tuning) -> WorldObject {
    WorldObject::new(
        spawner.next_entity_id(),
        ObjectKind::Boss { attack_timer: 0.0 },
        Vec3::new(0.0, tuning.boss_height, tuning.boss_z),
    )
}

/// Choose one lane, and with some probability a second distinct one
pub fn pick_beam_lanes<R: Rng>(rng: &mut R, lanes: &[i32], double_chance: f32) -> Vec<i32> {
    if lanes.is_empty() {
        return Vec::new();
    }
    let first = lanes[rng.random_range(0..lanes.len())];
    let mut picked = vec![first];

    if lanes.len() > 1 && rng.random::<f32>() < double_chance {
        let mut second = first;
        while second == first {
            second = lanes[rng.random_range(0..lanes.len())];
        }
        picked.push(second);
    }
    picked
}

/// Re-pin the boss and run its attack timer. Returns the beams fired this
/// frame, if the timer elapsed.
pub fn update_boss(
    boss: &mut WorldObject,
    dt: f32,
    lanes: &[i32],
    spawner: &mut Spawner,
    tuning: &Tuning,
) -> Option<Vec<WorldObject>> {
    boss.position = Vec3::new(0.0, tuning.boss_height, tuning.boss_z);

    let ObjectKind::Boss { attack_timer } = &mut boss.kind else {
        return None;
    };
    *attack_timer += dt;
    if *attack_timer < tuning.boss_attack_interval {
        return None;
    }
    *attack_timer = 0.0;

    let beam_lanes = pick_beam_lanes(spawner.rng(), lanes, tuning.double_beam_chance);
    log::debug!("Boss fires beams on lanes {:?}", beam_lanes);

    let beams = beam_lanes
        .into_iter()
        .map(|lane| {
            WorldObject::new(
                spawner.next_entity_id(),
                ObjectKind::BossBeam {
                    state: BeamState::Warning,
                    timer: 0.0,
                    lane,
                    has_hit: false,
                },
                Vec3::new(lane_offset(lane), 0.0, tuning.boss_z),
            )
        })
        .collect();
    Some(beams)
}

/// Result of advancing one beam
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BeamUpdate {
    /// The beam struck the player this frame
    pub hit: bool,
    /// The beam has finished and should be removed
    pub expired: bool,
}

/// Advance a beam through warning -> active -> gone
pub fn update_beam(beam: &mut WorldObject, dt: f32, player: Vec3, tuning: &Tuning) -> BeamUpdate {
    let beam_x = beam.position.x;
    let ObjectKind::BossBeam {
        state,
        timer,
        has_hit,
        ..
    } = &mut beam.kind
    else {
        return BeamUpdate::default();
    };

    *timer += dt;
    if *timer >= tuning.beam_end_time {
        beam.active = false;
        return BeamUpdate {
            hit: false,
            expired: true,
        };
    }

    if *timer < tuning.beam_warning_time {
        *state = BeamState::Warning;
        return BeamUpdate::default();
    }

    *state = BeamState::Active;
    let hit = !*has_hit && in_beam(beam_x, player.x, tuning);
    if hit {
        *has_hit = true;
    }
    BeamUpdate {
        hit,
        expired: false,
    }
}

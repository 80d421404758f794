//! Procedural spawning of track objects
//!
//! The track is filled one batch at a time: whenever the furthest spawned
//! object (the frontier) scrolls closer than `spawn_distance`, a new batch is
//! placed one gap further out. Gap length scales with speed so reaction time
//! stays roughly constant as the run accelerates.

use glam::Vec3;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::RunState;
use super::world::{LETTER_COLORS, ObjectKind, WorldObject, letter_for};
use crate::consts::*;
use crate::lane_offset;
use crate::tuning::Tuning;

/// Height of floating pickups
pub const PICKUP_HEIGHT: f32 = 1.0;
/// Height of a gem hovering over an obstacle
pub const BONUS_GEM_HEIGHT: f32 = 2.5;
/// Hover height of aliens
pub const ALIEN_HEIGHT: f32 = 1.5;

/// Furthest z among spawned track objects, or `fallback` if there are none
pub fn frontier(objects: &[WorldObject], fallback: f32) -> f32 {
    objects
        .iter()
        .filter(|o| o.active && o.is_track_object())
        .map(|o| o.position.z)
        .reduce(f32::min)
        .unwrap_or(fallback)
}

/// Owns the RNG, entity ids and the letter schedule
#[derive(Debug, Clone)]
pub struct Spawner {
    rng: Pcg32,
    next_id: u32,
    /// Distance at which the next letter is due
    next_letter_distance: f32,
}

impl Spawner {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
            next_letter_distance: tuning.letter_interval_for(1),
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn next_letter_distance(&self) -> f32 {
        self.next_letter_distance
    }

    /// Schedule the first letter of `level` one interval past `distance`
    pub fn schedule_letters(&mut self, distance: f32, level: u32, tuning: &Tuning) {
        self.next_letter_distance = distance + tuning.letter_interval_for(level);
    }

    /// Pick `count` distinct lanes in random order
    pub fn pick_lanes(&mut self, lanes: &[i32], count: usize) -> Vec<i32> {
        let mut picked = lanes.to_vec();
        picked.shuffle(&mut self.rng);
        picked.truncate(count);
        picked
    }

    fn random_lane(&mut self, lanes: &[i32]) -> i32 {
        if lanes.is_empty() {
            return 0;
        }
        lanes[self.rng.random_range(0..lanes.len())]
    }

    fn object(&mut self, kind: ObjectKind, lane: i32, y: f32, z: f32) -> WorldObject {
        let id = self.next_entity_id();
        WorldObject::new(id, kind, Vec3::new(lane_offset(lane), y, z))
    }

    /// Generate one batch of objects at track position `z`.
    ///
    /// Letters take priority when their distance is due; otherwise most
    /// cycles produce obstacles (or aliens from level 2), some produce a
    /// lone gem and a few produce nothing.
    pub fn spawn_batch(
        &mut self,
        z: f32,
        run: &RunState,
        distance: f32,
        tuning: &Tuning,
    ) -> Vec<WorldObject> {
        let lanes = run.lanes();
        let boss_fight = run.level >= MAX_LEVEL;
        let mut batch = Vec::new();

        if distance >= self.next_letter_distance {
            self.next_letter_distance += tuning.letter_interval_for(run.level);

            let remaining: Vec<usize> = (0..WORD_LENGTH)
                .filter(|i| !run.collected_letters.contains(i))
                .collect();
            let lane = self.random_lane(&lanes);

            if remaining.is_empty() {
                batch.push(self.object(
                    ObjectKind::Gem {
                        points: BONUS_GEM_POINTS,
                    },
                    lane,
                    PICKUP_HEIGHT,
                    z,
                ));
            } else {
                let target_index = remaining[self.rng.random_range(0..remaining.len())];
                let kind = ObjectKind::Letter {
                    target_index,
                    value: letter_for(target_index).unwrap_or('?'),
                    color: LETTER_COLORS[target_index],
                };
                batch.push(self.object(kind, lane, PICKUP_HEIGHT, z));
            }
            log::debug!("Letter batch at z={z:.1} (distance {distance:.1})");
            return batch;
        }

        if self.rng.random::<f32>() >= tuning.spawn_chance {
            // Empty cycle keeps the rhythm irregular
            return batch;
        }

        if self.rng.random::<f32>() < tuning.obstacle_chance {
            let alien_chance = if run.level >= 2 { tuning.alien_chance } else { 0.0 };

            if self.rng.random::<f32>() < alien_chance {
                let count = if lanes.len() > 1 && self.rng.random_bool(0.5) { 2 } else { 1 };
                for lane in self.pick_lanes(&lanes, count) {
                    batch.push(self.object(
                        ObjectKind::Alien { has_fired: false },
                        lane,
                        ALIEN_HEIGHT,
                        z,
                    ));
                }
            } else {
                let roll = self.rng.random::<f32>();
                let mut count = if roll < 0.6 {
                    1
                } else if roll < 0.9 {
                    2
                } else {
                    3
                };
                if boss_fight {
                    count = count.min(2);
                }
                let count = count.min(lanes.len());

                for lane in self.pick_lanes(&lanes, count) {
                    batch.push(self.object(ObjectKind::Obstacle, lane, 0.0, z));
                    if self.rng.random::<f32>() < tuning.bonus_gem_chance {
                        batch.push(self.object(
                            ObjectKind::Gem {
                                points: GEM_POINTS,
                            },
                            lane,
                            BONUS_GEM_HEIGHT,
                            z,
                        ));
                    }
                }
            }
        } else {
            let lane = self.random_lane(&lanes);
            batch.push(self.object(
                ObjectKind::Gem {
                    points: GEM_POINTS,
                },
                lane,
                PICKUP_HEIGHT,
                z,
            ));
        }

        log::debug!("Spawned {} objects at z={z:.1}", batch.len());
        batch
    }
}

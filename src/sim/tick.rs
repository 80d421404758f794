//! Per-frame world simulation
//!
//! `WorldSimulator::step` advances the world by one host frame: combo decay,
//! distance, the boss, object movement and collisions, then spawning. It reads
//! and writes the `RunState` through its operations and returns the events the
//! frame produced.

use glam::Vec3;

use super::boss;
use super::collision::{self, Contact};
use super::events::{SimEvent, SoundCue, colors};
use super::spawn::{self, Spawner};
use super::state::{GameStatus, RunState};
use super::world::{ObjectKind, WorldObject};
use crate::consts::*;
use crate::tuning::Tuning;

/// Owns every live world object and the spawn machinery
#[derive(Debug, Clone)]
pub struct WorldSimulator {
    tuning: Tuning,
    objects: Vec<WorldObject>,
    spawner: Spawner,
    /// Distance scrolled this run (drives the letter schedule)
    distance_traveled: f32,
    /// Status and level seen on the last sync, for transition detection
    last_status: GameStatus,
    last_level: u32,
    last_run_id: u64,
    /// Bumped whenever objects are added or removed
    revision: u64,
}

impl Default for WorldSimulator {
    fn default() -> Self {
        Self::new(Tuning::default())
    }
}

impl WorldSimulator {
    pub fn new(tuning: Tuning) -> Self {
        let spawner = Spawner::new(tuning.seed, &tuning);
        Self {
            tuning,
            objects: Vec::new(),
            spawner,
            distance_traveled: 0.0,
            last_status: GameStatus::Menu,
            last_level: 1,
            last_run_id: 0,
            revision: 0,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Live objects, in spawn order
    pub fn objects(&self) -> &[WorldObject] {
        &self.objects
    }

    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    /// Structural change counter; unchanged on frames that only moved objects
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn boss(&self) -> Option<&WorldObject> {
        self.objects.iter().find(|o| o.is_boss())
    }

    /// React to status and level changes made outside the simulator.
    ///
    /// A new run, or entering or leaving the menu or an end screen, clears
    /// the world. A level-up keeps nearby objects and puts a shop portal ahead.
    pub fn sync(&mut self, run: &RunState) {
        let resets = |s: GameStatus| {
            matches!(
                s,
                GameStatus::Menu | GameStatus::GameOver | GameStatus::Victory
            )
        };

        let status_changed = run.status != self.last_status;
        if run.run_id() != self.last_run_id
            || (status_changed && (resets(run.status) || resets(self.last_status)))
            || run.level < self.last_level
        {
            self.hard_reset(run);
        } else if run.level > self.last_level {
            self.soft_reset(run);
        }

        self.last_status = run.status;
        self.last_level = run.level;
        self.last_run_id = run.run_id();
    }

    fn hard_reset(&mut self, run: &RunState) {
        log::debug!("World reset ({:?})", run.status);
        self.objects.clear();
        self.distance_traveled = 0.0;
        self.spawner.schedule_letters(0.0, run.level, &self.tuning);
        self.revision += 1;
    }

    fn soft_reset(&mut self, run: &RunState) {
        let band = self.tuning.collision_band;
        self.objects.retain(|o| o.position.z <= band);

        let id = self.spawner.next_entity_id();
        self.objects.push(WorldObject::new(
            id,
            ObjectKind::ShopPortal,
            Vec3::new(0.0, 0.0, self.tuning.shop_portal_z),
        ));
        self.spawner
            .schedule_letters(self.distance_traveled, run.level, &self.tuning);
        self.revision += 1;
        log::debug!(
            "Level {} soft reset: {} objects kept, portal at z={}",
            run.level,
            self.objects.len() - 1,
            self.tuning.shop_portal_z
        );
    }

    /// Advance the world by one frame. Does nothing unless the run is playing.
    pub fn step(&mut self, run: &mut RunState, dt: f32, player: Vec3) -> Vec<SimEvent> {
        let mut events = Vec::new();

        self.sync(run);
        if !run.is_playing() {
            return events;
        }

        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_STEP_DT)
        } else {
            0.0
        };
        run.advance_clock(dt);
        run.tick_combo();

        self.distance_traveled += run.speed * dt;
        run.record_distance(self.distance_traveled);

        let lanes = run.lanes();
        let mut spawned: Vec<WorldObject> = Vec::new();
        let mut changed = false;

        // Boss lifecycle
        if run.level == MAX_LEVEL && self.boss().is_none() {
            let boss = boss::spawn_boss(&mut self.spawner, &self.tuning);
            log::info!("Boss spawned at z={}", boss.position.z);
            spawned.push(boss);
            events.push(SimEvent::BossSpawned);
        }
        for object in self.objects.iter_mut().filter(|o| o.is_boss()) {
            if let Some(beams) =
                boss::update_boss(object, dt, &lanes, &mut self.spawner, &self.tuning)
            {
                let fired = beams
                    .iter()
                    .filter_map(|b| match b.kind {
                        ObjectKind::BossBeam { lane, .. } => Some(lane),
                        _ => None,
                    })
                    .collect();
                events.push(SimEvent::BossAttack { lanes: fired });
                events.push(SimEvent::Sound(SoundCue::BeamCharge));
                spawned.extend(beams);
            }
        }

        // Move, fire and collide
        let speed = run.speed;
        for object in self.objects.iter_mut() {
            if !object.active || object.is_boss() {
                continue;
            }

            if matches!(object.kind, ObjectKind::BossBeam { .. }) {
                let update = boss::update_beam(object, dt, player, &self.tuning);
                if update.hit && run.is_playing() {
                    events.push(SimEvent::PlayerHit);
                    events.push(SimEvent::Sound(SoundCue::Damage));
                }
                changed |= update.expired;
                continue;
            }

            object.position.z += speed * dt;
            if object.kind == ObjectKind::Missile {
                object.position.z += self.tuning.missile_speed * dt;
            }

            if let ObjectKind::Alien { has_fired } = &mut object.kind {
                if !*has_fired && object.position.z > self.tuning.alien_fire_z {
                    *has_fired = true;
                    spawned.push(WorldObject::new(
                        self.spawner.next_entity_id(),
                        ObjectKind::Missile,
                        object.position,
                    ));
                    events.push(SimEvent::ParticleBurst {
                        position: object.position,
                        color: colors::ALIEN_FIRE,
                    });
                    events.push(SimEvent::Sound(SoundCue::MissileLaunch));
                }
            }

            if !run.is_playing() {
                continue;
            }
            let Some(contact) = collision::check_contact(object, player, &self.tuning) else {
                continue;
            };
            log::debug!(
                "{:?} with {} #{} at z={:.1}",
                contact,
                object.kind_name(),
                object.id,
                object.position.z
            );

            match contact {
                Contact::Portal => {
                    run.open_shop();
                    events.push(SimEvent::ShopEntered);
                    events.push(SimEvent::Sound(SoundCue::PortalEnter));
                    events.push(SimEvent::ParticleBurst {
                        position: object.position,
                        color: colors::PORTAL,
                    });
                }
                Contact::Hit => {
                    events.push(SimEvent::PlayerHit);
                    events.push(SimEvent::Sound(SoundCue::Damage));
                    if object.kind == ObjectKind::Missile {
                        events.push(SimEvent::ParticleBurst {
                            position: object.position,
                            color: colors::EXPLOSION,
                        });
                    }
                }
                Contact::Pickup => match object.kind {
                    ObjectKind::Gem { points } => {
                        run.collect_gem(points);
                        events.push(SimEvent::Sound(SoundCue::GemCollect));
                        events.push(SimEvent::ParticleBurst {
                            position: object.position,
                            color: colors::GEM,
                        });
                    }
                    ObjectKind::Letter {
                        target_index,
                        color,
                        ..
                    } => {
                        run.collect_letter(target_index);
                        events.push(SimEvent::Sound(SoundCue::LetterCollect));
                        events.push(SimEvent::ParticleBurst {
                            position: object.position,
                            color,
                        });
                    }
                    _ => {}
                },
            }
            object.active = false;
            changed = true;
        }

        // Spawn the next batch once the frontier comes close enough
        if run.is_playing() {
            let frontier = spawn::frontier(&self.objects, self.tuning.fallback_frontier_z);
            if frontier > -self.tuning.spawn_distance {
                let boss_fight = run.level == MAX_LEVEL;
                let gap = self.tuning.spawn_gap(run.speed, boss_fight);
                let batch = self.spawner.spawn_batch(
                    frontier - gap,
                    run,
                    self.distance_traveled,
                    &self.tuning,
                );
                spawned.extend(batch);
            }
        }

        // Commit: drop finished objects, append new ones
        let removal_z = self.tuning.removal_z;
        let before = self.objects.len();
        self.objects
            .retain(|o| o.active && o.position.z <= removal_z);
        if changed || self.objects.len() != before || !spawned.is_empty() {
            self.objects.extend(spawned);
            self.revision += 1;
        }

        // Pickups this frame may have levelled up or ended the run
        self.sync(run);
        events
    }
}
